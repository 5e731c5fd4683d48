//! Chase FSM + steering
//!
//! Конечный автомат chaser-а, состояние выводится заново каждый кадр из дистанции:
//! Idle (только что заспавнен) → Approach ⇄ Attack
//!
//! - d > approach_threshold: бежим к игроку с chase_speed, смотрим на него
//! - иначе: Attack, урон игроку каждый кадр + recoil по горизонтальной скорости
//!
//! Один порог без гистерезиса: на границе возможны переключения каждый кадр.
//! Дистанция плоская (x/z), вертикальную скорость не трогаем.

use bevy::prelude::*;

use crate::components::{Behavior, BehaviorState, Chaser, Heading, PhysicsBody, Player};
use crate::config::{AttackRecoil, GameConfig};
use crate::health::HealthDelta;
use crate::registry::EntityRegistry;

/// Параметры steering (выжимка из GameConfig)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteeringParams {
    pub chase_speed: f32,
    pub approach_threshold: f32,
    pub attack_recoil: AttackRecoil,
    pub face_player_always: bool,
}

impl SteeringParams {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            chase_speed: config.chase_speed,
            approach_threshold: config.approach_threshold,
            attack_recoil: config.attack_recoil,
            face_player_always: config.face_player_always,
        }
    }
}

/// Решение steering на один кадр
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteeringOutput {
    pub behavior: Behavior,
    /// Новая горизонтальная скорость (x, z)
    pub velocity: Vec2,
    /// Плоская дистанция до игрока
    pub distance: f32,
    /// Новый heading visual-а (None: не менять)
    pub heading: Option<Heading>,
    /// true: в этом кадре наносим урон
    pub attack: bool,
}

/// Steering одного chaser-а относительно игрока
///
/// `d == 0` не делит на ноль: считается "в радиусе атаки".
pub fn steer(
    entity_pos: Vec3,
    player_pos: Vec3,
    current_velocity: Vec3,
    params: &SteeringParams,
) -> SteeringOutput {
    let dx = player_pos.x - entity_pos.x;
    let dz = player_pos.z - entity_pos.z;
    let distance = (dx * dx + dz * dz).sqrt();

    let approaching = distance > params.approach_threshold && distance > 0.0;

    let heading = if approaching || params.face_player_always {
        Heading::facing(entity_pos, player_pos)
    } else {
        None
    };

    if approaching {
        return SteeringOutput {
            behavior: Behavior::Approach,
            velocity: Vec2::new(dx / distance, dz / distance) * params.chase_speed,
            distance,
            heading,
            attack: false,
        };
    }

    let current = Vec2::new(current_velocity.x, current_velocity.z);
    let velocity = match params.attack_recoil {
        AttackRecoil::Damp(factor) => current * factor,
        AttackRecoil::Nudge(nudge) => current + nudge,
    };

    SteeringOutput {
        behavior: Behavior::Attack,
        velocity,
        distance,
        heading,
        attack: true,
    }
}

/// Система: steering для всех chasers в порядке registry
///
/// Пишет velocity (x/z), BehaviorState, Heading; в Attack шлёт HealthDelta игроку.
pub fn chase_player(
    registry: Res<EntityRegistry>,
    config: Res<GameConfig>,
    players: Query<(Entity, &Transform), (With<Player>, Without<Chaser>)>,
    mut chasers: Query<
        (&Transform, &mut PhysicsBody, &mut BehaviorState, &mut Heading),
        (With<Chaser>, Without<Player>),
    >,
    mut damage_events: EventWriter<HealthDelta>,
) {
    let Ok((player_entity, player_transform)) = players.single() else {
        return;
    };

    let params = SteeringParams::from_config(&config);

    for &entity in registry.iter() {
        let Ok((transform, mut body, mut state, mut heading)) = chasers.get_mut(entity) else {
            continue;
        };

        let output = steer(
            transform.translation,
            player_transform.translation,
            body.velocity,
            &params,
        );

        body.velocity.x = output.velocity.x;
        body.velocity.z = output.velocity.y;

        if let Some(new_heading) = output.heading {
            *heading = new_heading;
        }

        if state.set(output.behavior) {
            crate::log(&format!(
                "AI: {:?} {:?} → {:?} (distance {:.2})",
                entity,
                state.previous.unwrap_or_default(),
                output.behavior,
                output.distance
            ));
        }

        if output.attack {
            damage_events.write(HealthDelta {
                target: player_entity,
                amount: -config.damage_per_tick,
                source: Some(entity),
            });
        }
    }
}
