//! Visual sync: physics transform → visual transform
//!
//! Simulation entity (Transform от physics step) копируется на свой visual entity.
//! - player: translation + rotation
//! - chaser: translation + visual_y_offset, rotation = Heading (yaw-only, от AI)
//!
//! Visual без живого simulation entity (body удалён): не трогаем, это дело renderer-а.

use bevy::prelude::*;

use crate::components::{Chaser, HasVisual, Heading, Player, VisualOf};
use crate::config::GameConfig;
use crate::frame::FrameSet;

/// Система: player body → player visual
pub fn sync_player_visual(
    players: Query<(&Transform, &HasVisual), (With<Player>, Without<VisualOf>)>,
    mut visuals: Query<&mut Transform, (With<VisualOf>, Without<HasVisual>)>,
) {
    for (body_transform, has_visual) in players.iter() {
        if let Ok(mut visual_transform) = visuals.get_mut(has_visual.0) {
            visual_transform.translation = body_transform.translation;
            visual_transform.rotation = body_transform.rotation;
        }
    }
}

/// Система: chaser body → chaser visual
pub fn sync_chaser_visuals(
    config: Res<GameConfig>,
    chasers: Query<(&Transform, &Heading, &HasVisual), (With<Chaser>, Without<VisualOf>)>,
    mut visuals: Query<&mut Transform, (With<VisualOf>, Without<HasVisual>)>,
) {
    let offset = Vec3::Y * config.visual_y_offset;

    for (body_transform, heading, has_visual) in chasers.iter() {
        if let Ok(mut visual_transform) = visuals.get_mut(has_visual.0) {
            visual_transform.translation = body_transform.translation + offset;
            visual_transform.rotation = heading.0;
        }
    }
}

/// Visual Sync Plugin
pub struct VisualSyncPlugin;

impl Plugin for VisualSyncPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (sync_player_visual, sync_chaser_visuals)
                .chain()
                .in_set(FrameSet::VisualSync),
        );
    }
}
