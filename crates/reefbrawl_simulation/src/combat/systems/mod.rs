//! Combat systems (hit resolution, interrupts, outputs).

pub mod damage;
pub mod machine;
pub mod reaction;


// Re-export all systems
pub use damage::*;
pub use machine::*;
pub use reaction::*;
