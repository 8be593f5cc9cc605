//! Dash path: Idle → WindUp → Dashing → Recover → Idle

use super::{drive_velocity, freeze_movement, CombatContext, CombatEffect, CombatMachine, CombatPhase, CombatStep};
use crate::combat::archetype::DashParams;
use crate::combat::events::Cue;
use crate::components::{NavigationAgent, PhysicsBody};

impl CombatMachine {
    /// Dash archetype: в Idle всегда выбираем WindUp
    pub(super) fn update_dash(
        &mut self,
        dash: DashParams,
        ctx: &CombatContext,
        nav: &mut NavigationAgent,
        body: &mut PhysicsBody,
        effects: &mut Vec<CombatEffect>,
    ) -> CombatStep {
        self.timer -= ctx.dt;

        if self.phase == CombatPhase::Idle {
            self.begin_wind_up(dash, nav, body, effects);
        } else {
            self.tick_dash_path(dash, ctx, nav, body, effects);
        }

        CombatStep::Continue
    }

    pub(super) fn begin_wind_up(
        &mut self,
        dash: DashParams,
        nav: &mut NavigationAgent,
        body: &mut PhysicsBody,
        effects: &mut Vec<CombatEffect>,
    ) {
        self.enter(CombatPhase::WindUp, dash.wind_up_duration);
        freeze_movement(nav, body);
        effects.push(CombatEffect::Cue(Cue::WindUp));
    }

    /// WindUp / Dashing / Recover (таймер уже уменьшен)
    pub(super) fn tick_dash_path(
        &mut self,
        dash: DashParams,
        ctx: &CombatContext,
        nav: &mut NavigationAgent,
        body: &mut PhysicsBody,
        effects: &mut Vec<CombatEffect>,
    ) {
        match self.phase {
            CombatPhase::WindUp => {
                freeze_movement(nav, body);
                if self.timer <= 0.0 {
                    // Направление снимаем ОДИН раз: dash не доворачивает за целью
                    self.dash_direction = ctx.direction_to_target();
                    self.enter(CombatPhase::Dashing, dash.dash_duration);
                    drive_velocity(nav, body, self.dash_direction * dash.dash_speed);
                    effects.push(CombatEffect::Cue(Cue::Dash));
                }
            }

            CombatPhase::Dashing => {
                drive_velocity(nav, body, self.dash_direction * dash.dash_speed);
                if self.timer <= 0.0 {
                    self.enter(CombatPhase::Recover, dash.recover_duration);
                    freeze_movement(nav, body);
                    effects.push(CombatEffect::Cue(Cue::Recover));
                    if dash.recover_burst {
                        effects.push(CombatEffect::Burst { position: ctx.position });
                    }
                }
            }

            CombatPhase::Recover => {
                freeze_movement(nav, body);
                if self.timer <= 0.0 {
                    self.enter(CombatPhase::Idle, 0.0);
                }
            }

            _ => {}
        }
    }
}
