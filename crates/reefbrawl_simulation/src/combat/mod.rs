//! Combat module: archetypes, inner combat machines, hit reactions
//!
//! ECS ответственность:
//! - Archetype config (RON / пресеты) → компоненты агента при спавне
//! - Inner combat machine (dash / hybrid / shell), тикает из Decide фазы AI
//! - onHit: knockback + i-frames + урон + death hook
//! - Events: PresentationCue, ProjectileReleased, AreaBurst, DamageTaken, EnemyDied, TargetContact
//!
//! Снаружи (движок/рендер): спавн снарядов и взрывов, анимации, звук.

use bevy::prelude::*;
use bevy_rapier2d::prelude::CollisionEvent;

pub mod archetype;
pub mod events;
pub mod machine;
pub mod reaction;
pub mod systems;

// Re-export основных типов
pub use archetype::{
    ArchetypeConfig, ArchetypeId, CombatStyle, DashParams, DeathPolicy, IFrameParams, KnockbackMode,
    KnockbackParams, RangedParams, StrafeParams,
};
pub use events::{
    AreaBurst, BehaviorChanged, Cue, DamageTaken, EnemyDied, HitContact, PresentationCue, ProjectileReleased,
    TargetContact,
};
pub use machine::{CombatContext, CombatEffect, CombatMachine, CombatPhase, CombatStep};
pub use reaction::{HitReaction, IFrameStep, IFrames, KnockbackStep, KnockbackTask, ReactionProfile};
pub use systems::{CombatOutputs, Dead, DespawnAfter};

use crate::ai::perception::PerceptionBackend;
use crate::SimulationSet;

/// Combat Plugin
///
/// Регистрирует combat системы в FixedUpdate.
///
/// Порядок выполнения:
/// 1. Contact: хитбоксы → HitContact (headless overlap ИЛИ Rapier CollisionEvent) → onHit,
///    тело врага × цель → TargetContact
/// 2. Interrupts: шаг knockback / i-frames (после Decide, заморозка видна в том же тике)
/// 3. Present: возврат управления после knockback, death animation таймеры → despawn
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<HitContact>()
            .add_event::<DamageTaken>()
            .add_event::<EnemyDied>()
            .add_event::<PresentationCue>()
            .add_event::<ProjectileReleased>()
            .add_event::<AreaBurst>()
            .add_event::<TargetContact>()
            // Rapier plugin регистрирует сам; здесь, чтобы reader был валиден в headless
            .add_event::<CollisionEvent>();

        app.add_systems(
            FixedUpdate,
            (
                systems::detect_hitbox_overlaps
                    .run_if(resource_equals(PerceptionBackend::ObstacleField)),
                systems::collect_rapier_hits.run_if(resource_equals(PerceptionBackend::Rapier)),
                systems::resolve_hit_contacts,
                systems::detect_target_contacts,
            )
                .chain()
                .in_set(SimulationSet::Contact),
        )
        .add_systems(
            FixedUpdate,
            systems::step_hit_reactions.in_set(SimulationSet::Interrupts),
        )
        .add_systems(
            FixedUpdate,
            (systems::release_knockback_control, systems::despawn_after_timeout).in_set(SimulationSet::Present),
        );
    }
}
