//! Inner combat state machine (активна только пока outer == Combat)
//!
//! Один компонент на агента, вариант выбирается archetype'ом при спавне:
//! - Dash: Idle → WindUp → Dashing → Recover → Idle
//! - Hybrid: dash path + RangedAttack + Strafing (priority-then-random в Idle)
//! - Shell: Idle ⇄ Shell по outer posture, атак нет
//!
//! Машина не знает про ECS: пишет в NavigationAgent/PhysicsBody и складывает
//! side effects (`CombatEffect`) в буфер, система превращает их в события.

use bevy::prelude::*;
use rand::Rng;

use crate::ai::perception::TargetSense;
use crate::ai::BehaviorKind;
use crate::combat::archetype::CombatStyle;
use crate::combat::events::Cue;
use crate::components::{NavigationAgent, PhysicsBody};

mod dash;
mod hybrid;
mod shell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum CombatPhase {
    #[default]
    Idle,
    WindUp,
    Dashing,
    Recover,
    RangedAttack,
    Strafing,
    Shell,
}

/// Что машина видит на этом тике
#[derive(Debug, Clone, Copy)]
pub struct CombatContext {
    pub position: Vec2,
    pub sense: TargetSense,
    /// Радиус exit-check (тот же, что у outer машины)
    pub detection_range: f32,
    pub dt: f32,
}

impl CombatContext {
    fn target_engageable(&self) -> bool {
        self.sense.is_engageable(self.position, self.detection_range)
    }

    /// Нормализованное направление на цель (ZERO если цели нет)
    fn direction_to_target(&self) -> Vec2 {
        self.sense
            .target_position
            .map(|target| (target - self.position).normalize_or_zero())
            .unwrap_or(Vec2::ZERO)
    }
}

/// Side effect тика (в события превращает система)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CombatEffect {
    Cue(Cue),
    Projectile { origin: Vec2, direction: Vec2 },
    Burst { position: Vec2 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatStep {
    Continue,
    /// Цель перестала быть engageable (обычно ссылка пропала):
    /// движение отпущено, outer → Chasing
    Disengage,
}

#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct CombatMachine {
    style: CombatStyle,
    phase: CombatPhase,
    /// State timer (ставится на входе в фазу, тикает вниз)
    timer: f32,
    /// Направление dash (фиксируется на WindUp → Dashing)
    dash_direction: Vec2,
    /// Velocity strafe (фиксируется на входе в Strafing)
    strafe_velocity: Vec2,
    ranged_cooldown: f32,
    /// Сколько прошло от входа в RangedAttack
    ranged_elapsed: f32,
    projectile_released: bool,
}

impl CombatMachine {
    pub fn new(style: CombatStyle) -> Self {
        Self {
            style,
            phase: CombatPhase::Idle,
            timer: 0.0,
            dash_direction: Vec2::ZERO,
            strafe_velocity: Vec2::ZERO,
            ranged_cooldown: 0.0,
            ranged_elapsed: 0.0,
            projectile_released: false,
        }
    }

    pub fn phase(&self) -> CombatPhase {
        self.phase
    }

    pub fn style(&self) -> &CombatStyle {
        &self.style
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    pub fn dash_direction(&self) -> Vec2 {
        self.dash_direction
    }

    pub fn ranged_cooldown(&self) -> f32 {
        self.ranged_cooldown
    }

    /// Вход/выход из Combat: фаза → Idle. Cooldown ranged атаки сохраняется.
    pub fn reset(&mut self) {
        self.phase = CombatPhase::Idle;
        self.timer = 0.0;
        self.ranged_elapsed = 0.0;
        self.projectile_released = false;
    }

    /// Один combat тик (только когда outer == Combat и агент не заморожен)
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        ctx: &CombatContext,
        nav: &mut NavigationAgent,
        body: &mut PhysicsBody,
        rng: &mut R,
        effects: &mut Vec<CombatEffect>,
    ) -> CombatStep {
        // Exit-check общий для всех стилей, включая shell
        if !ctx.target_engageable() {
            return self.disengage(nav, body);
        }

        match self.style {
            CombatStyle::Dash(dash) => self.update_dash(dash, ctx, nav, body, effects),
            CombatStyle::Hybrid { dash, ranged, strafe } => {
                self.update_hybrid(dash, ranged, strafe, ctx, nav, body, rng, effects)
            }
            CombatStyle::Shell => CombatStep::Continue,
        }
    }

    /// Posture hook: каждый (не замороженный) тик, после outer машины
    pub fn observe_posture(&mut self, outer: BehaviorKind, effects: &mut Vec<CombatEffect>) {
        if let CombatStyle::Shell = self.style {
            self.update_shell(outer, effects);
        }
    }

    fn enter(&mut self, phase: CombatPhase, timer: f32) {
        self.phase = phase;
        self.timer = timer;
    }

    /// Потеряли цель: стоп, навигация обратно, фаза → Idle
    fn disengage(&mut self, nav: &mut NavigationAgent, body: &mut PhysicsBody) -> CombatStep {
        body.velocity = Vec2::ZERO;
        nav.enabled = true;
        self.reset();
        CombatStep::Disengage
    }
}

/// WindUp/Recover/RangedAttack: стоим на месте, навигация выключена
fn freeze_movement(nav: &mut NavigationAgent, body: &mut PhysicsBody) {
    body.velocity = Vec2::ZERO;
    nav.enabled = false;
}

/// Dashing/Strafing: velocity задаёт машина, навигация выключена
fn drive_velocity(nav: &mut NavigationAgent, body: &mut PhysicsBody, velocity: Vec2) {
    nav.enabled = false;
    body.velocity = velocity;
}

#[cfg(test)]
mod machine_tests;
