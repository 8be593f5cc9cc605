//! Sense фаза: снимок perception (TargetSense) на тик

use bevy::prelude::*;
use bevy_rapier2d::prelude::ReadRapierContext;

use crate::ai::perception::{ObstacleField, ObstacleQuery, PerceptionSettings, TargetSense};
use crate::combat::Dead;
use crate::components::ChaseTarget;

type SensingAgents<'w, 's> =
    Query<'w, 's, (&'static Transform, &'static ChaseTarget, &'static mut TargetSense), Without<Dead>>;

/// Один raycast на агента: позиция цели + line of sight
///
/// Despawned цель = `None` (MissingTarget), не ошибка.
fn refresh_target_sense<Q: ObstacleQuery + ?Sized>(
    obstacles: &Q,
    settings: &PerceptionSettings,
    agents: &mut SensingAgents,
    targets: &Query<&Transform>,
) {
    for (transform, chase_target, mut sense) in agents.iter_mut() {
        let target_position = chase_target
            .0
            .and_then(|target| targets.get(target).ok())
            .map(|target| target.translation.truncate());

        *sense = TargetSense::observe(
            obstacles,
            transform.translation.truncate(),
            target_position,
            settings.obstacle_mask,
        );
    }
}

/// Система: perception через ObstacleField (headless)
pub fn sense_targets_obstacle_field(
    field: Res<ObstacleField>,
    settings: Res<PerceptionSettings>,
    mut agents: SensingAgents,
    targets: Query<&Transform>,
) {
    refresh_target_sense(field.as_ref(), &settings, &mut agents, &targets);
}

/// Система: perception через Rapier ray cast
pub fn sense_targets_rapier(
    rapier: ReadRapierContext,
    settings: Res<PerceptionSettings>,
    mut agents: SensingAgents,
    targets: Query<&Transform>,
) {
    let Ok(context) = rapier.single() else {
        // Rapier контекст ещё не создан, цели не видны
        for (_, _, mut sense) in agents.iter_mut() {
            *sense = TargetSense::default();
        }
        return;
    };

    refresh_target_sense(&context, &settings, &mut agents, &targets);
}
