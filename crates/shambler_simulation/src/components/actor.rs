//! Базовые компоненты акторов: Player, Chaser, Health

use bevy::prelude::*;

/// Marker component для player-controlled entity
///
/// AI systems его не трогают, input systems пишут только в него.
/// В игре ровно один такой entity.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Player;

/// Marker: враждебный актор, который бежит к игроку
///
/// Вешается только когда entity полностью собран (body + visual + state),
/// поэтому AI никогда не видит полуготовый chaser.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Chaser;

/// Результат `Health::apply_delta`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthChange {
    Alive,
    /// Здоровье дошло до нуля: нужен reset
    Died,
}

/// Здоровье игрока
///
/// Инвариант: 0 ≤ current ≤ max после каждой мутации.
/// f32, потому что урон дробный (0.2 / 0.5 за кадр).
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    /// Ширина health bar в процентах
    pub fn percent(&self) -> f32 {
        if self.max <= 0.0 {
            return 0.0;
        }
        self.current / self.max * 100.0
    }

    /// Добавить delta (урон отрицательный), clamp в [0, max]
    pub fn apply_delta(&mut self, amount: f32) -> HealthChange {
        let next = self.current + amount;
        // NaN delta не должен ломать инвариант
        self.current = if next.is_nan() {
            self.current
        } else {
            next.clamp(0.0, self.max)
        };

        if self.current <= 0.0 {
            HealthChange::Died
        } else {
            HealthChange::Alive
        }
    }

    pub fn reset(&mut self) {
        self.current = self.max;
    }
}
