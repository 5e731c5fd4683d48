//! Frame orchestrator: фиксированный порядок шагов одного кадра
//!
//! Все шаги в `Update`, один раз на кадр (display refresh host-а):
//!
//! ```text
//! Spawn → Input → PlayerControl → PhysicsStep → Ai → Health → VisualSync → Animation → Camera
//!                                                                                     ↓
//!                                                              render (host, после Update)
//! ```
//!
//! Physics step обязан идти до AI (AI видит позиции после шага),
//! AI: до VisualSync (visual показывает текущий кадр).
//! Spawn первым: модель, загруженная "между кадрами", целиком попадает в этот кадр.

use bevy::prelude::*;

/// Шаги кадра. Цепочка строгая, ни один шаг не пропускается и не переставляется.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameSet {
    /// Завершённые загрузки моделей → registry
    Spawn,
    /// KeyChanged → InputState
    Input,
    /// InputState → player velocity (+ прыжок)
    PlayerControl,
    /// Один fixed step физики
    PhysicsStep,
    /// Steering по всем chasers в порядке registry
    Ai,
    /// Урон за кадр, reset при смерти
    Health,
    /// Physics transform → visual transform
    VisualSync,
    /// Время анимаций + cross-fade
    Animation,
    /// Follow camera
    Camera,
}

/// Plugin: выстраивает FrameSet в цепочку
pub struct FrameOrchestratorPlugin;

impl Plugin for FrameOrchestratorPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (
                FrameSet::Spawn,
                FrameSet::Input,
                FrameSet::PlayerControl,
                FrameSet::PhysicsStep,
                FrameSet::Ai,
                FrameSet::Health,
                FrameSet::VisualSync,
                FrameSet::Animation,
                FrameSet::Camera,
            )
                .chain(),
        );
    }
}
