//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: Player / Chaser markers, Health
//! - movement: PhysicsBody (velocity)
//! - ai: Behavior + BehaviorState (chase FSM)
//! - world: связь simulation ↔ visual (HasVisual, VisualOf, VisualModel, Heading)
//! - camera: FollowCamera

pub mod actor;
pub mod movement;
pub mod ai;
pub mod world;
pub mod camera;

// Re-exports для удобного импорта
pub use actor::*;
pub use movement::*;
pub use ai::*;
pub use world::*;
pub use camera::*;
