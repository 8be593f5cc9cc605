//! Passive shell: Idle ⇄ Shell, без таймеров и без цели

use super::{CombatEffect, CombatMachine, CombatPhase};
use crate::ai::BehaviorKind;
use crate::combat::events::Cue;

impl CombatMachine {
    pub(super) fn update_shell(&mut self, outer: BehaviorKind, effects: &mut Vec<CombatEffect>) {
        let posture = if outer == BehaviorKind::Patrolling {
            CombatPhase::Shell
        } else {
            CombatPhase::Idle
        };

        if posture == self.phase {
            return;
        }

        self.phase = posture;
        effects.push(CombatEffect::Cue(match posture {
            CombatPhase::Shell => Cue::ShellClosed,
            _ => Cue::ShellOpened,
        }));
    }
}
