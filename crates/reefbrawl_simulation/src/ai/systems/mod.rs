//! AI systems: Sense → Decide → Present

pub mod behavior;
pub mod facing;
pub mod sense;

pub use behavior::update_enemy_behavior;
pub use facing::update_facing;
pub use sense::{sense_targets_obstacle_field, sense_targets_rapier};
