//! Interrupts: шаг knockback / i-frame задач (каждый тик, даже у замороженных)
//! Present: возврат управления навигации после knockback

use bevy::prelude::*;

use crate::combat::events::{Cue, PresentationCue};
use crate::combat::reaction::{HitReaction, IFrameStep, KnockbackStep};
use crate::components::{NavigationAgent, PhysicsBody};

pub fn step_hit_reactions(
    mut agents: Query<(
        Entity,
        &mut HitReaction,
        Option<&mut PhysicsBody>,
        Option<&mut NavigationAgent>,
    )>,
    mut cues: EventWriter<PresentationCue>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, mut reaction, mut body, mut nav) in agents.iter_mut() {
        match reaction.step_knockback(body.as_deref_mut(), nav.as_deref_mut(), delta) {
            KnockbackStep::Finished => {
                crate::log(&format!("🌀 {:?} knockback finished", entity));
            }
            KnockbackStep::Aborted => {
                crate::log_warning(&format!(
                    "{:?} knockback aborted: physics body or navigation is gone",
                    entity
                ));
            }
            KnockbackStep::Active | KnockbackStep::Inactive => {}
        }

        match reaction.step_iframes(delta) {
            IFrameStep::Flash { visible } => {
                cues.write(PresentationCue {
                    entity,
                    cue: Cue::Flash { visible },
                });
            }
            IFrameStep::Finished => {
                cues.write(PresentationCue {
                    entity,
                    cue: Cue::Flash { visible: true },
                });
            }
            IFrameStep::Active | IFrameStep::Inactive => {}
        }
    }
}

/// Knockback закончился в Interrupts, тело отлетело в Motion → стоп и навигация
pub fn release_knockback_control(
    mut agents: Query<(
        Entity,
        &mut HitReaction,
        Option<&mut PhysicsBody>,
        Option<&mut NavigationAgent>,
    )>,
) {
    for (entity, mut reaction, mut body, mut nav) in agents.iter_mut() {
        if reaction.release_control(body.as_deref_mut(), nav.as_deref_mut()) {
            crate::log(&format!("↩️ {:?} control returned to navigation", entity));
        }
    }
}
