//! AI decision-making module
//!
//! Chase FSM: каждый chaser бежит к игроку по прямой и бьёт, когда рядом.
//! Pathfinding и avoidance между chasers: не делаем.

use bevy::prelude::*;

use crate::frame::FrameSet;

pub mod steering;

// Re-export основных типов
pub use crate::components::{Behavior, BehaviorState};
pub use steering::{chase_player, steer, SteeringOutput, SteeringParams};

/// AI Plugin
///
/// chase_player в FrameSet::Ai: после physics step (видим позиции этого кадра),
/// до FrameSet::Health (урон применяется в том же кадре).
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, chase_player.in_set(FrameSet::Ai));
    }
}
