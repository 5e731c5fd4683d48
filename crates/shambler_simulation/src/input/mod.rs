//! Input sampler
//!
//! Host (окно/браузер) шлёт `KeyChanged` на каждое key-down/key-up.
//! Первый шаг кадра сворачивает события в `InputState`, дальше кадр читает snapshot.
//!
//! ```text
//! keyboard callback → KeyChanged (event) → apply_key_events → InputState (resource)
//!                                                                  ↓ sample()
//!                                                        player control systems
//! ```

use bevy::prelude::*;

use crate::frame::FrameSet;

/// Действие, к которому привязана клавиша
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum InputAction {
    Forward,
    Back,
    Left,
    Right,
    Jump,
}

impl InputAction {
    /// Нормализует идентификатор клавиши (lowercase) и мапит в действие.
    ///
    /// Пробел приходит как `" "`, поэтому его не trim-им.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "w" => Some(Self::Forward),
            "s" => Some(Self::Back),
            "a" => Some(Self::Left),
            "d" => Some(Self::Right),
            " " | "space" => Some(Self::Jump),
            _ => None,
        }
    }
}

/// Какие клавиши сейчас зажаты
///
/// Живёт весь процесс, сбрасывается только событиями отпускания.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Resource)]
pub struct InputState {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

impl InputState {
    /// Обновить state по событию клавиши. Незнакомые клавиши игнорируются.
    ///
    /// Возвращает true, если клавиша распознана.
    pub fn on_key_change(&mut self, key: &str, is_down: bool) -> bool {
        match InputAction::from_key(key) {
            Some(action) => {
                self.set(action, is_down);
                true
            }
            None => false,
        }
    }

    pub fn set(&mut self, action: InputAction, held: bool) {
        match action {
            InputAction::Forward => self.forward = held,
            InputAction::Back => self.back = held,
            InputAction::Left => self.left = held,
            InputAction::Right => self.right = held,
            InputAction::Jump => self.jump = held,
        }
    }

    pub fn is_held(&self, action: InputAction) -> bool {
        match action {
            InputAction::Forward => self.forward,
            InputAction::Back => self.back,
            InputAction::Left => self.left,
            InputAction::Right => self.right,
            InputAction::Jump => self.jump,
        }
    }

    /// Snapshot на кадр (by value)
    pub fn sample(&self) -> InputState {
        *self
    }
}

/// Событие клавиатуры от host-а
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct KeyChanged {
    pub key: String,
    pub pressed: bool,
}

impl KeyChanged {
    pub fn down(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            pressed: true,
        }
    }

    pub fn up(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            pressed: false,
        }
    }
}

/// Система: KeyChanged → InputState
pub fn apply_key_events(mut events: EventReader<KeyChanged>, mut input: ResMut<InputState>) {
    for event in events.read() {
        input.on_key_change(&event.key, event.pressed);
    }
}

/// Input Plugin
///
/// Регистрирует KeyChanged + InputState, система в FrameSet::Input.
pub struct KeyboardInputPlugin;

impl Plugin for KeyboardInputPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<KeyChanged>()
            .init_resource::<InputState>()
            .add_systems(Update, apply_key_events.in_set(FrameSet::Input));
    }
}
