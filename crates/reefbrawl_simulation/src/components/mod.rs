//! ECS Components для агентов
//!
//! Организация по доменам:
//! - actor: враг, здоровье, урон при контакте, facing, цель
//! - combat: хитбоксы
//! - movement: Navigation Port, rigid body velocity
//!
//! AI/combat state machines лежат рядом со своими системами (`ai`, `combat`).

pub mod actor;
pub mod combat;
pub mod movement;

// Re-exports для удобного импорта
pub use actor::*;
pub use combat::*;
pub use movement::*;
