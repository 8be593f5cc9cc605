//! Combat outputs: CombatEffect → ECS события

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::combat::events::{AreaBurst, PresentationCue, ProjectileReleased};
use crate::combat::machine::CombatEffect;

/// Writers для side effects inner machine (один SystemParam вместо трёх)
#[derive(SystemParam)]
pub struct CombatOutputs<'w> {
    cues: EventWriter<'w, PresentationCue>,
    projectiles: EventWriter<'w, ProjectileReleased>,
    bursts: EventWriter<'w, AreaBurst>,
}

impl CombatOutputs<'_> {
    pub fn emit(&mut self, entity: Entity, effect: CombatEffect) {
        match effect {
            CombatEffect::Cue(cue) => {
                self.cues.write(PresentationCue { entity, cue });
            }
            CombatEffect::Projectile { origin, direction } => {
                crate::log(&format!("🏹 {:?} released projectile → {:?}", entity, direction));
                self.projectiles.write(ProjectileReleased {
                    shooter: entity,
                    origin,
                    direction,
                });
            }
            CombatEffect::Burst { position } => {
                crate::log(&format!("💥 {:?} area burst at {:?}", entity, position));
                self.bursts.write(AreaBurst {
                    source: entity,
                    position,
                });
            }
        }
    }

    pub fn emit_all(&mut self, entity: Entity, effects: &mut Vec<CombatEffect>) {
        for effect in effects.drain(..) {
            self.emit(entity, effect);
        }
    }
}
