//! Physics: навигация, интеграция движения, collision groups Rapier

pub mod collision;
pub mod movement;

// Re-export основных систем
pub use movement::{
    drive_navigation,
    integrate_velocity_to_transform,
    navigation_step,
    sync_velocity_to_rapier,
};
