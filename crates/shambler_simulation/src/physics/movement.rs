//! Player control: InputState → velocity игрока
//!
//! Архитектура:
//! - Игрок без pathfinding, velocity пишется напрямую (x/z каждый кадр)
//! - Y velocity не трогаем, кроме прыжка (gravity: в physics step)
//! - Прыжок только с земли: |vy| ≈ 0 и y ниже порога

use bevy::prelude::*;

use crate::components::{PhysicsBody, Player};
use crate::config::GameConfig;
use crate::input::InputState;

/// Горизонтальная скорость (x, z) из зажатых клавиш
///
/// Forward = -Z. Противоположные клавиши гасят друг друга,
/// соседние складываются БЕЗ нормализации: диагональ в √2 раз быстрее оси.
pub fn movement_velocity(input: &InputState, move_speed: f32) -> Vec2 {
    let axis = |positive: bool, negative: bool| {
        (if positive { move_speed } else { 0.0 }) + (if negative { -move_speed } else { 0.0 })
    };

    Vec2::new(
        axis(input.right, input.left),
        axis(input.back, input.forward),
    )
}

/// Grounded check: почти нулевая вертикальная скорость и низко над полом
pub fn is_grounded(translation: Vec3, body: &PhysicsBody, config: &GameConfig) -> bool {
    body.velocity.y.abs() < config.grounded_velocity_epsilon && translation.y < config.grounded_height
}

/// Прыжок, если стоим на земле. Возвращает true, если impulse применён.
pub fn try_jump(translation: Vec3, body: &mut PhysicsBody, config: &GameConfig) -> bool {
    if !is_grounded(translation, body, config) {
        return false;
    }
    body.velocity.y = config.jump_impulse;
    true
}

/// Система: input snapshot → velocity игрока
pub fn apply_player_input(
    input: Res<InputState>,
    config: Res<GameConfig>,
    mut players: Query<(&Transform, &mut PhysicsBody), With<Player>>,
) {
    let snapshot = input.sample();

    for (transform, mut body) in players.iter_mut() {
        let horizontal = movement_velocity(&snapshot, config.move_speed);
        body.velocity.x = horizontal.x;
        body.velocity.z = horizontal.y;

        if snapshot.jump && try_jump(transform.translation, &mut body, &config) {
            crate::log("Player jump");
        }
    }
}
