//! Shambler Simulation Core
//!
//! ECS-ядро zombie-chase на Bevy 0.16: игрок бегает по плоскости,
//! chasers (зомби) бегут к нему и бьют, когда догнали.
//!
//! Один кадр = фиксированная цепочка шагов (см. `frame`):
//! input → player control → physics step → AI → health → visual sync → animation → camera
//!
//! Рендер, загрузка glTF и DOM: на стороне host-а (collaborators).
//! Здесь только game state + события, которыми host и ядро обмениваются:
//! - host → ядро: `KeyChanged`, `ModelLoadEvent`, `ViewportResized`
//! - ядро → host: transforms visual-entities, `Animator` веса, `HealthBar`

use bevy::prelude::*;

// Публичные модули
pub mod ai;
pub mod animation;
pub mod camera;
pub mod components;
pub mod config;
pub mod frame;
pub mod health;
pub mod input;
pub mod logger;
pub mod physics;
pub mod registry;
pub mod viewer;
pub mod visual_sync;

// Re-export базовых типов для удобства
pub use ai::{AIPlugin, Behavior, BehaviorState};
pub use animation::{AnimationPlugin, Animator, ClipRole, ClipSet};
pub use camera::{FollowCameraPlugin, ViewportResized};
pub use components::*;
pub use config::{AnimationConfig, AttackRecoil, ConfigError, GameConfig};
pub use frame::{FrameOrchestratorPlugin, FrameSet};
pub use health::{HealthBar, HealthDelta, HealthPlugin, PlayerReset};
pub use input::{InputAction, InputState, KeyChanged, KeyboardInputPlugin};
pub use logger::*;
pub use physics::KinematicPhysicsPlugin;
pub use registry::{EntityRegistry, ModelLoadEvent, ModelRequest, RegistryPlugin};
pub use viewer::ViewerPlugin;
pub use visual_sync::VisualSyncPlugin;

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// `populate_world = false`: мир не спавнится на Startup (тесты собирают сцену сами).
pub struct SimulationPlugin {
    pub populate_world: bool,
}

impl Default for SimulationPlugin {
    fn default() -> Self {
        Self {
            populate_world: true,
        }
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // Конфиг мог вставить host до plugin-а: не перетираем
        app.init_resource::<GameConfig>()
            .add_plugins(FrameOrchestratorPlugin)
            .add_plugins((
                KeyboardInputPlugin,
                RegistryPlugin,
                KinematicPhysicsPlugin,
                AIPlugin,
                HealthPlugin,
                VisualSyncPlugin,
                AnimationPlugin,
                FollowCameraPlugin,
            ));

        if self.populate_world {
            app.add_systems(Startup, registry::spawn_world);
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Без SimulationPlugin: вызывающий добавляет его сам (и решает про populate_world).
pub fn create_headless_app(config: GameConfig) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins).insert_resource(config);

    app
}

/// Snapshot мира для сравнения детерминизма
///
/// Entities в порядке index, компонент через Debug.
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
