//! Movement компоненты: скорость тела

use bevy::prelude::*;

/// Линейная скорость тела (m/s)
///
/// Позиция живёт в Transform, скорость: здесь.
/// Пишут: player control (x/z + прыжок по y), AI (x/z), physics step (gravity, contact).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PhysicsBody {
    pub velocity: Vec3,
}

impl PhysicsBody {
    pub fn horizontal_speed(&self) -> f32 {
        Vec2::new(self.velocity.x, self.velocity.z).length()
    }
}
