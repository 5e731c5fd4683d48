//! Follow camera: за спиной и выше игрока, смотрит на него
//!
//! Камера следует за VISUAL игрока (после VisualSync), а не за body.

use bevy::prelude::*;

use crate::components::{FollowCamera, HasVisual, Player, VisualOf};
use crate::config::GameConfig;
use crate::frame::FrameSet;

/// Событие: host изменил размер окна
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ViewportResized {
    pub width: f32,
    pub height: f32,
}

/// Transform камеры для позиции игрока
pub fn follow_transform(target: Vec3, offset: Vec3) -> Transform {
    let eye = target + offset;
    if offset.length_squared() <= f32::EPSILON {
        return Transform::from_translation(eye);
    }
    Transform::from_translation(eye).looking_at(target, Vec3::Y)
}

/// Система: камера за игроком
pub fn follow_player(
    config: Res<GameConfig>,
    players: Query<&HasVisual, With<Player>>,
    visuals: Query<&Transform, (With<VisualOf>, Without<FollowCamera>)>,
    mut cameras: Query<&mut Transform, (With<FollowCamera>, Without<VisualOf>)>,
) {
    let Ok(has_visual) = players.single() else {
        return;
    };
    let Ok(target) = visuals.get(has_visual.0) else {
        return;
    };

    for mut camera_transform in cameras.iter_mut() {
        *camera_transform = follow_transform(target.translation, config.camera_offset);
    }
}

/// Система: ViewportResized → aspect
pub fn apply_viewport_resize(
    mut events: EventReader<ViewportResized>,
    mut cameras: Query<&mut FollowCamera>,
) {
    for event in events.read() {
        if event.height <= 0.0 || event.width <= 0.0 {
            crate::log_warning(&format!(
                "Viewport resize ignored: {}x{}",
                event.width, event.height
            ));
            continue;
        }

        for mut camera in cameras.iter_mut() {
            camera.aspect = event.width / event.height;
        }
    }
}

/// Follow Camera Plugin
pub struct FollowCameraPlugin;

impl Plugin for FollowCameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ViewportResized>().add_systems(
            Update,
            (apply_viewport_resize, follow_player)
                .chain()
                .in_set(FrameSet::Camera),
        );
    }
}
