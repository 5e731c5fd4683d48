//! Animation module (variant с моделями)
//!
//! - clips: ClipRole + ClipSet (резолв по подстроке при загрузке)
//! - crossfade: Animator (веса, время клипов, cross-fade)
//!
//! Роль выбирается каждый кадр из дистанции и скорости chaser-а,
//! время анимаций идёт по реальному времени кадра (не по fixed_dt физики).

use bevy::prelude::*;

use crate::components::{Chaser, PhysicsBody, Player};
use crate::config::{AnimationConfig, GameConfig};
use crate::frame::FrameSet;
use crate::registry::EntityRegistry;

pub mod clips;
pub mod crossfade;

pub use clips::{ClipRole, ClipSet};
pub use crossfade::{Animator, ClipPlayback, Fade};

/// Какую роль должен играть chaser
///
/// Attack ближе attack_anim_distance, Run если быстрее run_speed_epsilon, иначе Idle.
/// Death не выбирается никогда.
pub fn select_role(distance: f32, speed: f32, config: &AnimationConfig) -> ClipRole {
    if distance < config.attack_anim_distance {
        ClipRole::Attack
    } else if speed > config.run_speed_epsilon {
        ClipRole::Run
    } else {
        ClipRole::Idle
    }
}

/// Система: время анимаций + переходы
pub fn advance_animations(
    time: Res<Time>,
    config: Res<GameConfig>,
    registry: Res<EntityRegistry>,
    players: Query<&Transform, (With<Player>, Without<Chaser>)>,
    mut chasers: Query<(&Transform, &PhysicsBody, &mut Animator), (With<Chaser>, Without<Player>)>,
) {
    let Some(anim_config) = config.animations.as_ref() else {
        return;
    };
    let Ok(player_transform) = players.single() else {
        return;
    };

    let delta = time.delta_secs();

    for &entity in registry.iter() {
        let Ok((transform, body, mut animator)) = chasers.get_mut(entity) else {
            continue;
        };

        animator.advance(delta);

        let offset = player_transform.translation - transform.translation;
        let distance = Vec2::new(offset.x, offset.z).length();
        let role = select_role(distance, body.velocity.length(), anim_config);

        if animator.transition_to(role, anim_config.crossfade_secs) {
            crate::log(&format!("Animation: {:?} → {:?}", entity, role));
        }
    }
}

/// Animation Plugin
pub struct AnimationPlugin;

impl Plugin for AnimationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, advance_animations.in_set(FrameSet::Animation));
    }
}
