//! Model viewer scenes
//!
//! Отдельные сцены "покрутить модель": камера + модель в display container-е.
//! Orbit controls, свет и рендер: на стороне renderer-а, здесь только:
//! - setup сцены под container (нет container-а → сцена пропускается)
//! - авто-центрирование модели по bounding box + отъезд камеры под размер
//! - resize → aspect

use bevy::prelude::*;
use std::collections::HashMap;
use thiserror::Error;

/// Ошибки setup viewer-сцены (не фатальные: сцена просто не создаётся)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SetupError {
    #[error("display container `{0}` not found")]
    MissingContainer(String),

    #[error("model bounds are empty")]
    EmptyBounds,
}

/// Что показать и где
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerTarget {
    pub container_id: String,
    pub model_path: String,
}

impl ViewerTarget {
    pub fn new(container_id: impl Into<String>, model_path: impl Into<String>) -> Self {
        Self {
            container_id: container_id.into(),
            model_path: model_path.into(),
        }
    }
}

/// Display containers host-а: id → размер в пикселях
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct DisplayContainers {
    pub sizes: HashMap<String, Vec2>,
}

impl DisplayContainers {
    pub fn with(mut self, id: impl Into<String>, size: Vec2) -> Self {
        self.sizes.insert(id.into(), size);
        self
    }
}

/// Список сцен, которые надо поднять на старте
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct ViewerTargets(pub Vec<ViewerTarget>);

/// Axis-aligned bounds модели в её локальных координатах (до поворота на VIEWER_MODEL_YAW)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl ModelBounds {
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn is_empty(&self) -> bool {
        let size = self.size();
        !(size.is_finite() && size.x >= 0.0 && size.y >= 0.0 && size.z >= 0.0)
            || size.max_element() <= 0.0
    }
}

/// Perspective камера viewer-а
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerCamera {
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
}

/// Модель в сцене после fit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedModel {
    /// Сдвиг (в координатах сцены), который ставит центр повёрнутой модели в начало координат
    pub offset: Vec3,
    pub yaw: f32,
}

/// Поворот модели в viewer-е (модели экспортированы боком)
pub const VIEWER_MODEL_YAW: f32 = -std::f32::consts::FRAC_PI_2;

/// Камера отъезжает на max_dim * этот коэффициент
pub const FIT_DISTANCE_FACTOR: f32 = 1.2;

/// Одна viewer-сцена
#[derive(Component, Debug, Clone, PartialEq)]
pub struct ViewerScene {
    pub container_id: String,
    pub model_path: String,
    pub background: Color,
    pub camera: ViewerCamera,
    pub model: Option<PlacedModel>,
}

impl ViewerScene {
    pub fn setup(containers: &DisplayContainers, target: &ViewerTarget) -> Result<Self, SetupError> {
        let size = containers
            .sizes
            .get(&target.container_id)
            .copied()
            .ok_or_else(|| SetupError::MissingContainer(target.container_id.clone()))?;

        Ok(Self {
            container_id: target.container_id.clone(),
            model_path: target.model_path.clone(),
            background: Color::WHITE,
            camera: ViewerCamera {
                fov_degrees: 50.0,
                aspect: aspect_of(size),
                near: 0.1,
                far: 1000.0,
                position: Vec3::new(0.0, 1.0, 2.0),
            },
            model: None,
        })
    }

    /// Центрировать модель и отодвинуть камеру под её размер
    ///
    /// Модель сначала поворачивается на yaw, потом сдвигается:
    /// центр bounds поворачиваем тем же yaw, иначе смещённая по x/z модель уедет.
    pub fn fit_model(&mut self, bounds: ModelBounds) -> Result<(), SetupError> {
        if bounds.is_empty() {
            return Err(SetupError::EmptyBounds);
        }

        let rotated_center = Quat::from_rotation_y(VIEWER_MODEL_YAW) * bounds.center();
        self.model = Some(PlacedModel {
            offset: -rotated_center,
            yaw: VIEWER_MODEL_YAW,
        });
        self.camera.position.z = bounds.size().max_element() * FIT_DISTANCE_FACTOR;
        Ok(())
    }

    pub fn resize(&mut self, size: Vec2) {
        if size.y > 0.0 && size.x > 0.0 {
            self.camera.aspect = aspect_of(size);
        }
    }
}

fn aspect_of(size: Vec2) -> f32 {
    if size.y > 0.0 {
        size.x / size.y
    } else {
        1.0
    }
}

/// Ответ renderer-а на загрузку модели viewer-а
#[derive(Event, Debug, Clone, PartialEq)]
pub enum ViewerModelEvent {
    Loaded { scene: Entity, bounds: ModelBounds },
    Failed { scene: Entity, error: String },
}

/// Событие: container изменил размер
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ContainerResized {
    pub container_id: String,
    pub size: Vec2,
}

/// Startup система: сцена на каждый target, отсутствующие container-ы пропускаем
pub fn setup_viewer_scenes(
    mut commands: Commands,
    containers: Res<DisplayContainers>,
    targets: Res<ViewerTargets>,
) {
    for target in &targets.0 {
        match ViewerScene::setup(&containers, target) {
            Ok(scene) => {
                crate::log_info(&format!(
                    "Viewer: scene `{}` → {}",
                    scene.container_id, scene.model_path
                ));
                commands.spawn(scene);
            }
            Err(err) => {
                crate::log_warning(&format!("Viewer: skipping `{}`: {}", target.model_path, err));
            }
        }
    }
}

/// Система: результат загрузки модели → fit
pub fn apply_viewer_models(
    mut events: EventReader<ViewerModelEvent>,
    mut scenes: Query<&mut ViewerScene>,
) {
    for event in events.read() {
        match event {
            ViewerModelEvent::Loaded { scene, bounds } => {
                let Ok(mut viewer) = scenes.get_mut(*scene) else {
                    continue;
                };
                if let Err(err) = viewer.fit_model(*bounds) {
                    crate::log_warning(&format!("Viewer: `{}`: {}", viewer.model_path, err));
                }
            }
            ViewerModelEvent::Failed { scene, error } => {
                crate::log_error(&format!("Viewer: model for {:?} failed to load: {}", scene, error));
            }
        }
    }
}

/// Система: resize container-а → aspect камеры
pub fn apply_container_resize(
    mut events: EventReader<ContainerResized>,
    mut containers: ResMut<DisplayContainers>,
    mut scenes: Query<&mut ViewerScene>,
) {
    for event in events.read() {
        containers.sizes.insert(event.container_id.clone(), event.size);
        for mut scene in scenes.iter_mut() {
            if scene.container_id == event.container_id {
                scene.resize(event.size);
            }
        }
    }
}

/// Viewer Plugin (независим от игры, можно подключать отдельно)
pub struct ViewerPlugin;

impl Plugin for ViewerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DisplayContainers>()
            .init_resource::<ViewerTargets>()
            .add_event::<ViewerModelEvent>()
            .add_event::<ContainerResized>()
            .add_systems(Startup, setup_viewer_scenes)
            .add_systems(Update, (apply_viewer_models, apply_container_resize));
    }
}
