//! Physics module
//!
//! - movement: player control (input → velocity, прыжок)
//! - step: fixed step физики (gravity, integration, пол)

use bevy::prelude::*;

use crate::frame::FrameSet;

pub mod movement;
pub mod step;

// Re-export основных типов
pub use movement::{apply_player_input, is_grounded, movement_velocity, try_jump};
pub use step::{body_bundle, integrate_body, physics_step, sync_velocity_to_rapier, StepParams};

/// Plugin для player control + physics step
///
/// Порядок:
/// 1. apply_player_input (FrameSet::PlayerControl)
/// 2. physics_step → sync_velocity_to_rapier (FrameSet::PhysicsStep)
pub struct KinematicPhysicsPlugin;

impl Plugin for KinematicPhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, apply_player_input.in_set(FrameSet::PlayerControl))
            .add_systems(
                Update,
                (physics_step, sync_velocity_to_rapier)
                    .chain()
                    .in_set(FrameSet::PhysicsStep),
            );
    }
}
