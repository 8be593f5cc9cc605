//! Decide фаза: outer FSM → inner combat machine
//!
//! На агента за тик:
//! 1. Dead / knocked back → пропуск (обе машины заморожены, не сброшены)
//! 2. Outer машина: переходы, потом поведение состояния
//! 3. Вход/выход из Combat → inner machine reset в Idle
//! 4. Inner machine, только если агент был в Combat на начало тика и остался
//! 5. Disengage от inner machine → outer принудительно в Chasing
//! 6. Posture hook (shell archetype)

use bevy::prelude::*;

use crate::ai::perception::TargetSense;
use crate::ai::{BehaviorConfig, BehaviorTransition, EnemyBrain};
use crate::combat::{BehaviorChanged, CombatContext, CombatMachine, CombatOutputs, CombatStep, Dead, HitReaction};
use crate::components::{NavigationAgent, PhysicsBody};
use crate::DeterministicRng;

type DecidingAgents<'w, 's> = Query<
    'w,
    's,
    (
        Entity,
        &'static Transform,
        &'static TargetSense,
        &'static BehaviorConfig,
        &'static HitReaction,
        &'static mut EnemyBrain,
        &'static mut CombatMachine,
        &'static mut NavigationAgent,
        &'static mut PhysicsBody,
    ),
    Without<Dead>,
>;

pub fn update_enemy_behavior(
    mut agents: DecidingAgents,
    mut rng: ResMut<DeterministicRng>,
    mut behavior_events: EventWriter<BehaviorChanged>,
    mut outputs: CombatOutputs,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();
    let mut effects = Vec::new();

    for (entity, transform, sense, config, reaction, mut brain, mut machine, mut nav, mut body) in
        agents.iter_mut()
    {
        if reaction.is_knocked_back() {
            continue;
        }

        let position = transform.translation.truncate();
        let was_in_combat = brain.state.is_combat();

        let transition = brain.update(position, sense, config, &mut nav, &mut body, &mut rng.rng, delta);
        if let Some(transition) = transition {
            on_transition(entity, transition, &mut machine, &mut behavior_events);
        }

        if was_in_combat && brain.state.is_combat() {
            let ctx = CombatContext {
                position,
                sense: *sense,
                detection_range: config.detection_range,
                dt: delta,
            };

            let step = machine.update(&ctx, &mut nav, &mut body, &mut rng.rng, &mut effects);
            if step == CombatStep::Disengage {
                crate::log(&format!("🔙 {:?} lost target in combat → re-pursuit", entity));
                if let Some(transition) = brain.force_chasing(&mut nav, &mut body) {
                    on_transition(entity, transition, &mut machine, &mut behavior_events);
                }
            }
        }

        machine.observe_posture(brain.state.kind(), &mut effects);
        outputs.emit_all(entity, &mut effects);
    }
}

fn on_transition(
    entity: Entity,
    transition: BehaviorTransition,
    machine: &mut CombatMachine,
    behavior_events: &mut EventWriter<BehaviorChanged>,
) {
    if transition.enters_combat() || transition.exits_combat() {
        machine.reset();
    }

    crate::log(&format!(
        "🧠 {:?}: {:?} → {:?}",
        entity, transition.from, transition.to
    ));

    behavior_events.write(BehaviorChanged {
        entity,
        from: transition.from,
        to: transition.to,
    });
}
