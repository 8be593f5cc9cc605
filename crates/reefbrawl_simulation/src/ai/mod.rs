//! AI module: perception + outer behavior FSM
//!
//! Outer машина (Patrolling / Chasing / Searching / Combat) одна на всех
//! врагов; в Combat управление отдаётся inner combat machine archetype'а.
//!
//! Тик агента разложен по фазам `SimulationSet`:
//! - Sense: один raycast агент → цель (`TargetSense`)
//! - Decide: outer FSM, затем inner machine
//! - Present: facing

use bevy::prelude::*;

pub mod components;
pub mod perception;
pub mod systems;

// Re-export основных типов
pub use components::{
    random_point_in_circle, BehaviorConfig, BehaviorKind, BehaviorState, BehaviorTransition, EnemyBrain,
};
pub use perception::{ObstacleField, ObstacleMask, PerceptionBackend, PerceptionSettings, TargetSense};

use crate::combat::BehaviorChanged;
use crate::SimulationSet;

/// AI Plugin
///
/// Регистрирует AI системы в FixedUpdate для детерминизма.
/// Backend perception выбирается resource'ом `PerceptionBackend`.
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<BehaviorChanged>()
            .init_resource::<ObstacleField>()
            .init_resource::<PerceptionSettings>()
            .init_resource::<PerceptionBackend>();

        app.add_systems(
            FixedUpdate,
            (
                systems::sense_targets_obstacle_field
                    .run_if(resource_equals(PerceptionBackend::ObstacleField)),
                systems::sense_targets_rapier.run_if(resource_equals(PerceptionBackend::Rapier)),
            )
                .in_set(SimulationSet::Sense),
        )
        .add_systems(
            FixedUpdate,
            systems::update_enemy_behavior.in_set(SimulationSet::Decide),
        )
        .add_systems(FixedUpdate, systems::update_facing.in_set(SimulationSet::Present));
    }
}
