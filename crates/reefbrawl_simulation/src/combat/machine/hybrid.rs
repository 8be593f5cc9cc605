//! Hybrid archetype: dash path + RangedAttack + Strafing
//!
//! Решение в Idle (priority-then-random):
//! 1. cooldown истёк И цель в ranged range И видна → RangedAttack
//! 2. иначе с вероятностью `strafe.probability` → Strafing
//! 3. иначе → WindUp (dash path)

use bevy::prelude::*;
use rand::Rng;

use super::{drive_velocity, freeze_movement, CombatContext, CombatEffect, CombatMachine, CombatPhase, CombatStep};
use crate::combat::archetype::{DashParams, RangedParams, StrafeParams};
use crate::combat::events::Cue;
use crate::components::{NavigationAgent, PhysicsBody};

impl CombatMachine {
    #[allow(clippy::too_many_arguments)]
    pub(super) fn update_hybrid<R: Rng + ?Sized>(
        &mut self,
        dash: DashParams,
        ranged: RangedParams,
        strafe: StrafeParams,
        ctx: &CombatContext,
        nav: &mut NavigationAgent,
        body: &mut PhysicsBody,
        rng: &mut R,
        effects: &mut Vec<CombatEffect>,
    ) -> CombatStep {
        self.timer -= ctx.dt;
        // Cooldown тикает только в combat тиках
        self.ranged_cooldown = (self.ranged_cooldown - ctx.dt).max(0.0);

        match self.phase {
            CombatPhase::Idle => self.decide(dash, ranged, strafe, ctx, nav, body, rng, effects),

            CombatPhase::WindUp | CombatPhase::Dashing | CombatPhase::Recover => {
                self.tick_dash_path(dash, ctx, nav, body, effects);
            }

            CombatPhase::RangedAttack => {
                freeze_movement(nav, body);
                self.ranged_elapsed += ctx.dt;

                if !self.projectile_released && self.ranged_elapsed >= ranged.release_at {
                    self.projectile_released = true;
                    // Направление считаем в момент выпуска, не на входе
                    let direction = ctx.direction_to_target();
                    if direction != Vec2::ZERO {
                        effects.push(CombatEffect::Projectile {
                            origin: ctx.position,
                            direction,
                        });
                    }
                }

                if self.timer <= 0.0 {
                    self.enter(CombatPhase::Idle, 0.0);
                }
            }

            CombatPhase::Strafing => {
                drive_velocity(nav, body, self.strafe_velocity);
                if self.timer <= 0.0 {
                    self.enter(CombatPhase::Idle, 0.0);
                }
            }

            CombatPhase::Shell => {}
        }

        CombatStep::Continue
    }

    #[allow(clippy::too_many_arguments)]
    fn decide<R: Rng + ?Sized>(
        &mut self,
        dash: DashParams,
        ranged: RangedParams,
        strafe: StrafeParams,
        ctx: &CombatContext,
        nav: &mut NavigationAgent,
        body: &mut PhysicsBody,
        rng: &mut R,
        effects: &mut Vec<CombatEffect>,
    ) {
        if self.ranged_cooldown <= 0.0 && ctx.sense.is_engageable(ctx.position, ranged.range) {
            self.enter(CombatPhase::RangedAttack, ranged.attack_duration);
            // Cooldown на входе: вторая ranged атака не пересечётся с текущей
            self.ranged_cooldown = ranged.cooldown;
            self.ranged_elapsed = 0.0;
            self.projectile_released = false;
            freeze_movement(nav, body);
            effects.push(CombatEffect::Cue(Cue::Attack));
        } else if rng.gen_bool(strafe.probability) {
            // Перпендикуляр к направлению на цель (поворот на 90°)
            self.strafe_velocity = ctx.direction_to_target().perp() * strafe.speed;
            self.enter(CombatPhase::Strafing, strafe.duration);
            drive_velocity(nav, body, self.strafe_velocity);
            effects.push(CombatEffect::Cue(Cue::Strafe));
        } else {
            self.begin_wind_up(dash, nav, body, effects);
        }
    }
}
