//! Damage / health model
//!
//! Урон приходит событиями `HealthDelta` (AI пишет по одному на атакующего chaser-а за кадр).
//! `apply_health_deltas` применяет их по порядку:
//! 1. Health::apply_delta (clamp в [0, max])
//! 2. sync HealthBar (display collaborator)
//! 3. если дошли до 0: reset: полное здоровье, игрок на respawn point, velocity = 0
//!
//! Reset происходит ровно один раз на достижение нуля: после него health = max,
//! следующие deltas того же кадра применяются уже к восстановленному значению.

use bevy::prelude::*;

use crate::components::{Health, HealthChange, PhysicsBody, Player};
use crate::config::GameConfig;
use crate::frame::FrameSet;

/// Событие: изменить здоровье (amount < 0: урон)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct HealthDelta {
    pub target: Entity,
    pub amount: f32,
    /// Кто нанёс (chaser), None: системный источник
    pub source: Option<Entity>,
}

/// Событие: игрок умер и был сброшен на respawn point
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PlayerReset {
    pub player: Entity,
    pub killer: Option<Entity>,
}

/// Health bar widget (display collaborator)
///
/// Renderer рисует полосу шириной `width_percent`.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Resource)]
pub struct HealthBar {
    pub width_percent: f32,
    /// Сколько раз игрок умирал (для HUD/тестов)
    pub resets: u32,
}

impl Default for HealthBar {
    fn default() -> Self {
        Self {
            width_percent: 100.0,
            resets: 0,
        }
    }
}

impl HealthBar {
    pub fn sync(&mut self, health: &Health) {
        self.width_percent = health.percent();
    }
}

/// Полный reset игрока после смерти
pub fn reset_player(
    health: &mut Health,
    transform: &mut Transform,
    body: &mut PhysicsBody,
    respawn_point: Vec3,
) {
    health.reset();
    transform.translation = respawn_point;
    body.velocity = Vec3::ZERO;
}

/// Система: HealthDelta → Health + HealthBar, reset при смерти
pub fn apply_health_deltas(
    mut deltas: EventReader<HealthDelta>,
    mut resets: EventWriter<PlayerReset>,
    mut players: Query<(&mut Health, &mut Transform, &mut PhysicsBody), With<Player>>,
    mut bar: ResMut<HealthBar>,
    config: Res<GameConfig>,
) {
    for delta in deltas.read() {
        let Ok((mut health, mut transform, mut body)) = players.get_mut(delta.target) else {
            crate::log_warning(&format!(
                "HealthDelta: target {:?} is not a player with Health",
                delta.target
            ));
            continue;
        };

        let change = health.apply_delta(delta.amount);
        bar.sync(&health);

        if change == HealthChange::Died {
            crate::log_info("Player died, resetting");

            reset_player(&mut health, &mut transform, &mut body, config.respawn_point);
            bar.sync(&health);
            bar.resets += 1;

            resets.write(PlayerReset {
                player: delta.target,
                killer: delta.source,
            });
        }
    }
}

/// Health Plugin
pub struct HealthPlugin;

impl Plugin for HealthPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<HealthDelta>()
            .add_event::<PlayerReset>()
            .init_resource::<HealthBar>()
            .add_systems(Update, apply_health_deltas.in_set(FrameSet::Health));
    }
}
