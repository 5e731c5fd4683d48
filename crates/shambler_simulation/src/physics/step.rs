//! Headless physics step
//!
//! Stand-in для внешнего rigid-body solver-а: один fixed step на кадр.
//! - gravity → velocity.y
//! - velocity → Transform.translation (semi-implicit Euler)
//! - контакт с полом y = 0: box не проваливается, vy гасится
//! - пол без трения: горизонтальная скорость сохраняется
//!
//! Коллизий между телами нет (non-goal). Rapier Velocity синхронизируем
//! для host-а, который подключает RapierPhysicsPlugin ради collision events.

use bevy::prelude::*;
use bevy_rapier3d::prelude::{Collider, RigidBody, Velocity};

use crate::components::PhysicsBody;
use crate::config::GameConfig;

/// Параметры одного шага
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepParams {
    pub dt: f32,
    pub gravity: f32,
    /// Центр box-а не опускается ниже этой высоты (пол на y = 0)
    pub half_extent: f32,
}

impl StepParams {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            dt: config.fixed_dt,
            gravity: config.gravity,
            half_extent: config.body_half_extent,
        }
    }
}

/// Один шаг для одного тела. Возвращает true, если тело стоит на полу после шага.
pub fn integrate_body(translation: &mut Vec3, body: &mut PhysicsBody, params: StepParams) -> bool {
    body.velocity.y += params.gravity * params.dt;
    *translation += body.velocity * params.dt;

    if translation.y <= params.half_extent {
        translation.y = params.half_extent;
        if body.velocity.y < 0.0 {
            body.velocity.y = 0.0;
        }
        return true;
    }

    false
}

/// Система: fixed step для всех тел
pub fn physics_step(config: Res<GameConfig>, mut bodies: Query<(&mut Transform, &mut PhysicsBody)>) {
    let params = StepParams::from_config(&config);

    for (mut transform, mut body) in bodies.iter_mut() {
        integrate_body(&mut transform.translation, &mut body, params);
    }
}

/// Система: PhysicsBody.velocity → Rapier Velocity
pub fn sync_velocity_to_rapier(mut query: Query<(&PhysicsBody, &mut Velocity)>) {
    for (body, mut rapier_velocity) in query.iter_mut() {
        rapier_velocity.linvel = body.velocity;
    }
}

/// Bundle физического тела: куб со стороной 2 * half_extent
///
/// RigidBody::KinematicPositionBased: позицию ведём сами, Rapier только для коллайдеров.
pub fn body_bundle(position: Vec3, half_extent: f32) -> impl Bundle {
    (
        Transform::from_translation(position),
        PhysicsBody::default(),
        RigidBody::KinematicPositionBased,
        Collider::cuboid(half_extent, half_extent, half_extent),
        Velocity::default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params(dt: f32) -> StepParams {
        StepParams {
            dt,
            gravity: -9.82,
            half_extent: 0.5,
        }
    }

    #[test]
    fn test_gravity_accelerates_falling_body() {
        let mut translation = Vec3::new(0.0, 2.0, 0.0);
        let mut body = PhysicsBody::default();

        let grounded = integrate_body(&mut translation, &mut body, params(1.0 / 60.0));

        assert!(!grounded);
        assert_relative_eq!(body.velocity.y, -9.82 / 60.0, epsilon = 1e-5);
        assert!(translation.y < 2.0);
    }

    #[test]
    fn test_body_rests_on_floor() {
        let mut translation = Vec3::new(0.0, 0.5, 0.0);
        let mut body = PhysicsBody::default();

        for _ in 0..120 {
            integrate_body(&mut translation, &mut body, params(1.0 / 60.0));
        }

        assert_eq!(translation.y, 0.5);
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn test_frictionless_floor_keeps_horizontal_velocity() {
        let mut translation = Vec3::new(0.0, 0.5, 0.0);
        let mut body = PhysicsBody {
            velocity: Vec3::new(2.0, 0.0, -1.0),
        };

        integrate_body(&mut translation, &mut body, params(0.5));

        assert_eq!(body.velocity.x, 2.0);
        assert_eq!(body.velocity.z, -1.0);
        assert_relative_eq!(translation.x, 1.0);
        assert_relative_eq!(translation.z, -0.5);
    }

    #[test]
    fn test_jump_leaves_floor() {
        let mut translation = Vec3::new(0.0, 0.5, 0.0);
        let mut body = PhysicsBody {
            velocity: Vec3::new(0.0, 6.0, 0.0),
        };

        let grounded = integrate_body(&mut translation, &mut body, params(1.0 / 60.0));

        assert!(!grounded);
        assert!(translation.y > 0.5);
        assert!(body.velocity.y > 0.0);
    }
}
