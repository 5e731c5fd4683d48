//! Entity registry + spawn
//!
//! Registry: упорядоченный список chasers: AI и анимации обходят его
//! в порядке добавления (детерминизм, не зависит от порядка archetype таблиц).
//!
//! Два пути spawn:
//! - без анимаций: body + куб-visual сразу, chaser в registry сразу
//! - с моделью: body сразу (+ ModelRequest), render collaborator грузит модель
//!   асинхронно и отвечает ModelLoadEvent. Только на Loaded entity получает
//!   Chaser/BehaviorState/Animator одним батчем команд и попадает в registry.
//!   AI не видит полусобранный chaser: либо целиком, либо никак.
//!
//! Failed: лог + body удаляется, повторной загрузки нет.
//! Первый ответ на request окончательный: Loaded и Failed для одного body
//! в одном батче событий не смешиваются, второй игнорируется.

use bevy::prelude::*;
use std::collections::HashSet;

use crate::animation::{Animator, ClipSet};
use crate::components::{BehaviorState, Chaser, FollowCamera, HasVisual, Health, Heading, Player, VisualModel, VisualOf};
use crate::config::GameConfig;
use crate::frame::FrameSet;
use crate::physics::body_bundle;

/// Упорядоченный список активных chasers
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityRegistry {
    entities: Vec<Entity>,
}

impl EntityRegistry {
    /// Добавить в конец. Повторная регистрация игнорируется.
    pub fn register(&mut self, entity: Entity) -> bool {
        if self.entities.contains(&entity) {
            return false;
        }
        self.entities.push(entity);
        true
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.contains(&entity)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Marker: body заспавнен, модель ещё грузится
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct ModelRequest {
    pub path: String,
}

/// Ответ render collaborator-а на загрузку модели
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub enum ModelLoadEvent {
    /// Модель готова, clip_names: имена всех анимаций в ней
    Loaded {
        request: Entity,
        clip_names: Vec<String>,
    },

    /// Загрузка не удалась
    Failed { request: Entity, error: String },
}

/// Spawn игрока (body + куб-visual)
pub fn spawn_player(commands: &mut Commands, config: &GameConfig) -> Entity {
    let player = commands
        .spawn((
            Player,
            Health::new(config.max_health),
            body_bundle(config.player_start, config.body_half_extent),
        ))
        .id();

    let visual = commands
        .spawn((
            VisualOf(player),
            VisualModel::player_cube(),
            Transform::from_translation(config.player_start),
        ))
        .id();

    commands.entity(player).insert(HasVisual(visual));
    player
}

/// Spawn follow camera (первый кадр её выставит `camera::follow_player`)
pub fn spawn_follow_camera(commands: &mut Commands, config: &GameConfig) -> Entity {
    let eye = config.player_start + config.camera_offset;
    commands
        .spawn((
            FollowCamera::default(),
            Transform::from_translation(eye).looking_at(config.player_start, Vec3::Y),
        ))
        .id()
}

/// Spawn chaser-а на позиции (x, spawn_height, z)
///
/// С анимациями возвращается pending body (ещё не Chaser, не в registry).
pub fn spawn_chaser(
    commands: &mut Commands,
    registry: &mut EntityRegistry,
    config: &GameConfig,
    position: Vec3,
) -> Entity {
    let body = commands
        .spawn(body_bundle(position, config.body_half_extent))
        .id();

    if let Some(anim) = config.animations.as_ref() {
        commands.entity(body).insert(ModelRequest {
            path: anim.model_path.clone(),
        });
        crate::log(&format!(
            "Spawn: {:?} requested model {} at {:?}",
            body, anim.model_path, position
        ));
        return body;
    }

    let visual = commands
        .spawn((
            VisualOf(body),
            VisualModel::chaser_cube(),
            Transform::from_translation(position + Vec3::Y * config.visual_y_offset),
        ))
        .id();

    commands.entity(body).insert((
        Chaser,
        BehaviorState::default(),
        Heading::default(),
        HasVisual(visual),
    ));
    registry.register(body);

    crate::log(&format!("Spawn: chaser {:?} at {:?}", body, position));
    body
}

/// Startup система: игрок, камера, chasers из spawn list
pub fn spawn_world(
    mut commands: Commands,
    mut registry: ResMut<EntityRegistry>,
    config: Res<GameConfig>,
) {
    spawn_player(&mut commands, &config);
    spawn_follow_camera(&mut commands, &config);

    for spawn in &config.enemy_spawns {
        let position = Vec3::new(spawn.x, config.enemy_spawn_height, spawn.y);
        spawn_chaser(&mut commands, &mut registry, &config, position);
    }

    crate::log_info(&format!(
        "World spawned: {} chasers requested, animations: {}",
        config.enemy_spawns.len(),
        config.has_animations()
    ));
}

/// Система: ModelLoadEvent → готовый chaser (или отказ)
pub fn handle_model_loads(
    mut commands: Commands,
    mut events: EventReader<ModelLoadEvent>,
    mut registry: ResMut<EntityRegistry>,
    config: Res<GameConfig>,
    pending: Query<(&Transform, &ModelRequest), Without<Chaser>>,
) {
    // Команды этого батча ещё не применены: pending query их не видит
    let mut resolved: HashSet<Entity> = HashSet::new();

    for event in events.read() {
        match event {
            ModelLoadEvent::Loaded {
                request,
                clip_names,
            } => {
                if registry.contains(*request) || resolved.contains(request) {
                    crate::log_warning(&format!("ModelLoad: {:?} already resolved, ignoring", request));
                    continue;
                }
                let Ok((transform, model)) = pending.get(*request) else {
                    crate::log_warning(&format!("ModelLoad: {:?} is not a pending request", request));
                    continue;
                };

                let visual = commands
                    .spawn((
                        VisualOf(*request),
                        VisualModel::Model {
                            path: model.path.clone(),
                        },
                        Transform::from_translation(
                            transform.translation + Vec3::Y * config.visual_y_offset,
                        ),
                    ))
                    .id();

                let mut entity = commands.entity(*request);
                entity.remove::<ModelRequest>().insert((
                    Chaser,
                    BehaviorState::default(),
                    Heading::default(),
                    HasVisual(visual),
                ));

                let clips = ClipSet::resolve(clip_names);
                match Animator::new(clips) {
                    Some(animator) => {
                        entity.insert(animator);
                    }
                    None => {
                        crate::log_warning(&format!(
                            "ModelLoad: {} has no Idle clip, {:?} will not animate",
                            model.path, request
                        ));
                    }
                }

                registry.register(*request);
                resolved.insert(*request);
                crate::log(&format!("ModelLoad: chaser {:?} ready ({} clips)", request, clip_names.len()));
            }

            ModelLoadEvent::Failed { request, error } => {
                if registry.contains(*request) || resolved.contains(request) {
                    crate::log_warning(&format!(
                        "ModelLoad: {:?} already resolved, ignoring failure: {}",
                        request, error
                    ));
                    continue;
                }

                crate::log_error(&format!("ModelLoad: {:?} failed: {}", request, error));
                if pending.contains(*request) {
                    commands.entity(*request).despawn();
                    resolved.insert(*request);
                }
            }
        }
    }
}

/// Registry Plugin
///
/// Startup spawn мира не регистрирует: его добавляет SimulationPlugin (populate_world).
pub struct RegistryPlugin;

impl Plugin for RegistryPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EntityRegistry>()
            .add_event::<ModelLoadEvent>()
            .add_systems(Update, handle_model_loads.in_set(FrameSet::Spawn));
    }
}
