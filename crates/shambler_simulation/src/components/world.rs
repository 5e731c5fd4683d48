//! Связь simulation entity ↔ visual entity
//!
//! Simulation entity владеет физикой (Transform + PhysicsBody).
//! Visual entity: то, что рисует render collaborator (mesh/model + animation).
//! Связь двусторонняя, как пара HasVisual/VisualOf у клиента.

use bevy::prelude::*;

/// Link: simulation entity → visual entity
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HasVisual(pub Entity);

/// Link: visual entity → simulation entity
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisualOf(pub Entity);

/// Что рисовать для visual entity (render collaborator решает как)
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub enum VisualModel {
    /// Куб 1x1x1 заданного цвета (sRGB)
    Cube { color: Color },
    /// Загруженная модель (путь как у loader-а)
    Model { path: String },
}

impl VisualModel {
    pub fn player_cube() -> Self {
        Self::Cube {
            color: Color::srgb(0.0, 1.0, 0.0),
        }
    }

    pub fn chaser_cube() -> Self {
        Self::Cube {
            color: Color::srgb(1.0, 0.0, 0.0),
        }
    }
}

/// Куда смотрит visual (yaw-only, без наклона)
///
/// Пишет AI, читает visual sync.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Component)]
pub struct Heading(pub Quat);

impl Heading {
    /// Yaw-only look-at: target берётся на высоте `from`, поэтому модель не наклоняется.
    ///
    /// Совпадающие позиции (или target прямо над/под) → None, heading не меняется.
    pub fn facing(from: Vec3, target: Vec3) -> Option<Self> {
        let flat_target = Vec3::new(target.x, from.y, target.z);
        let forward = flat_target - from;
        if forward.length_squared() <= f32::EPSILON {
            return None;
        }
        Some(Self(Transform::from_translation(from).looking_at(flat_target, Vec3::Y).rotation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_heading_ignores_vertical_offset() {
        let heading = Heading::facing(Vec3::new(0.0, 0.5, 0.0), Vec3::new(0.0, 10.0, -5.0)).unwrap();

        // Bevy forward = -Z; target по -Z → поворот без наклона
        let forward = heading.0 * Vec3::NEG_Z;
        assert_relative_eq!(forward.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(forward.z, -1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_heading_faces_target_on_plane() {
        let heading = Heading::facing(Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0)).unwrap();
        let forward = heading.0 * Vec3::NEG_Z;
        assert_relative_eq!(forward.x, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_heading_same_spot_is_none() {
        assert!(Heading::facing(Vec3::ONE, Vec3::new(1.0, 7.0, 1.0)).is_none());
    }

    #[test]
    fn test_cube_visuals_are_green_player_red_chaser() {
        let VisualModel::Cube { color: player } = VisualModel::player_cube() else {
            panic!("player visual must be a cube");
        };
        let VisualModel::Cube { color: chaser } = VisualModel::chaser_cube() else {
            panic!("chaser visual must be a cube");
        };

        assert_eq!(player.to_srgba(), Srgba::rgb(0.0, 1.0, 0.0));
        assert_eq!(chaser.to_srgba(), Srgba::rgb(1.0, 0.0, 0.0));
    }
}
