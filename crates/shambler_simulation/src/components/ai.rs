//! AI компоненты: behavior state
//!
//! Пишет только `ai::chase_player`, читают логи и тесты.

use bevy::prelude::*;

/// Поведение chaser-а
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub enum Behavior {
    /// Заспавнен, ещё не обработан AI
    #[default]
    Idle,
    /// Бежит к игроку
    Approach,
    /// В радиусе атаки, наносит урон каждый кадр
    Attack,
}

/// Текущее + предыдущее поведение (для детекта переходов анимацией/логами)
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
#[reflect(Component)]
pub struct BehaviorState {
    pub current: Behavior,
    pub previous: Option<Behavior>,
}

impl BehaviorState {
    /// Записать новое поведение. Возвращает true, если поведение сменилось.
    pub fn set(&mut self, next: Behavior) -> bool {
        self.previous = Some(self.current);
        self.current = next;
        self.previous != Some(next)
    }
}
