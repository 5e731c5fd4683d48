//! Follow camera component
//!
//! Камера за спиной игрока. Projection параметры читает render collaborator.

use bevy::prelude::*;

/// Perspective follow camera
///
/// Transform камеры выставляет `camera::follow_player` каждый кадр.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct FollowCamera {
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for FollowCamera {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}
