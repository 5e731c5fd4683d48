//! GameConfig: параметры симуляции
//!
//! Два варианта игры (classic / extended) отличаются только числами и флагами,
//! поэтому один orchestrator + один config resource вместо двух копий кода.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Ошибки загрузки/валидации config
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Что делает chaser с горизонтальной скоростью, когда он в радиусе атаки
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
pub enum AttackRecoil {
    /// velocity.xz *= factor (classic: -0.5, отскок с затуханием)
    Damp(f32),
    /// velocity.xz += (x, z) каждый кадр (extended: (-1, -1))
    Nudge(Vec2),
}

/// Параметры анимаций (только для variant с моделями)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
pub struct AnimationConfig {
    /// Путь модели, которую грузит render collaborator
    pub model_path: String,
    /// Дистанция, ближе которой играет Attack clip
    pub attack_anim_distance: f32,
    /// Скорость, выше которой играет Run clip
    pub run_speed_epsilon: f32,
    /// Длительность cross-fade (секунды)
    pub crossfade_secs: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            model_path: "/Skeleton.glb".to_string(),
            attack_anim_distance: 2.2,
            run_speed_epsilon: 0.5,
            crossfade_secs: 0.2,
        }
    }
}

/// Главный config resource
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[reflect(Resource)]
pub struct GameConfig {
    // --- Player ---
    /// Скорость игрока по одной оси (m/s)
    pub move_speed: f32,
    /// Вертикальная скорость прыжка
    pub jump_impulse: f32,
    /// Grounded check: |vy| меньше этого
    pub grounded_velocity_epsilon: f32,
    /// Grounded check: y меньше этого
    pub grounded_height: f32,
    pub player_start: Vec3,
    /// Куда переносим игрока после смерти
    pub respawn_point: Vec3,

    // --- Chasers ---
    pub chase_speed: f32,
    pub approach_threshold: f32,
    pub attack_recoil: AttackRecoil,
    /// true: chaser поворачивается к игроку каждый кадр, false: только в Approach
    pub face_player_always: bool,
    /// Spawn list (x, z)
    pub enemy_spawns: Vec<Vec2>,
    pub enemy_spawn_height: f32,
    /// Смещение visual относительно body по Y (модель скелета ниже центра куба)
    pub visual_y_offset: f32,

    // --- Health ---
    pub max_health: f32,
    /// Урон за кадр, пока chaser в Attack
    pub damage_per_tick: f32,

    // --- World ---
    pub gravity: f32,
    /// Один physics step на кадр, длительностью fixed_dt
    pub fixed_dt: f32,
    /// Половина высоты box-коллайдера (player и chasers: кубы 1x1x1)
    pub body_half_extent: f32,
    pub camera_offset: Vec3,

    /// None: chasers кубы без анимаций
    pub animations: Option<AnimationConfig>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::classic()
    }
}

impl GameConfig {
    /// Первый прототип: кубы, 100 HP, быстрые chasers
    pub fn classic() -> Self {
        Self {
            move_speed: 7.0,
            jump_impulse: 6.0,
            grounded_velocity_epsilon: 0.1,
            grounded_height: 0.6,
            player_start: Vec3::new(0.0, 2.0, 0.0),
            respawn_point: Vec3::new(0.0, 5.0, 0.0),

            chase_speed: 3.0,
            approach_threshold: 1.2,
            attack_recoil: AttackRecoil::Damp(-0.5),
            face_player_always: false,
            enemy_spawns: default_enemy_spawns(),
            enemy_spawn_height: 2.0,
            visual_y_offset: 0.0,

            max_health: 100.0,
            damage_per_tick: 0.2,

            gravity: -9.82,
            fixed_dt: 1.0 / 60.0,
            body_half_extent: 0.5,
            camera_offset: Vec3::new(0.0, 5.0, 10.0),

            animations: None,
        }
    }

    /// Второй прототип: скелеты с анимациями, 100000 HP
    pub fn extended() -> Self {
        Self {
            chase_speed: 2.0,
            approach_threshold: 2.0,
            attack_recoil: AttackRecoil::Nudge(Vec2::new(-1.0, -1.0)),
            face_player_always: true,
            visual_y_offset: -0.4,
            max_health: 100_000.0,
            damage_per_tick: 0.5,
            animations: Some(AnimationConfig::default()),
            ..Self::classic()
        }
    }

    pub fn has_animations(&self) -> bool {
        self.animations.is_some()
    }

    /// Загрузить config из json файла (поля целиком, без merge с preset)
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("move_speed", self.move_speed)?;
        positive("chase_speed", self.chase_speed)?;
        positive("approach_threshold", self.approach_threshold)?;
        positive("max_health", self.max_health)?;
        positive("fixed_dt", self.fixed_dt)?;
        positive("body_half_extent", self.body_half_extent)?;

        if !self.damage_per_tick.is_finite() || self.damage_per_tick < 0.0 {
            return Err(ConfigError::Invalid {
                field: "damage_per_tick",
                reason: "must be finite and non-negative",
            });
        }

        if !self.gravity.is_finite() || !self.jump_impulse.is_finite() {
            return Err(ConfigError::Invalid {
                field: "gravity/jump_impulse",
                reason: "must be finite",
            });
        }

        if let Some(anim) = &self.animations {
            positive("animations.crossfade_secs", anim.crossfade_secs)?;
            positive("animations.attack_anim_distance", anim.attack_anim_distance)?;
            if anim.model_path.is_empty() {
                return Err(ConfigError::Invalid {
                    field: "animations.model_path",
                    reason: "must not be empty",
                });
            }
        }

        Ok(())
    }
}

fn default_enemy_spawns() -> Vec<Vec2> {
    vec![
        Vec2::new(10.0, -10.0),
        Vec2::new(-10.0, -5.0),
        Vec2::new(5.0, -15.0),
    ]
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: "must be finite and positive",
        })
    }
}
