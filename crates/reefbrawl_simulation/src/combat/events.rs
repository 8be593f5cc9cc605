//! Combat events (ECS outputs + hit input)
//!
//! Presentation/gameplay слои подписываются через `EventReader`.
//! Core никогда не ждёт их обработки.

use bevy::prelude::*;

use crate::ai::BehaviorKind;

/// Визуальный cue (одноразовый trigger анимации/спрайта)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum Cue {
    WindUp,
    Dash,
    Recover,
    Attack,
    Strafe,
    Death,
    ShellClosed,
    ShellOpened,
    /// I-frame мигание: показать/спрятать sprite
    Flash { visible: bool },
}

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PresentationCue {
    pub entity: Entity,
    pub cue: Cue,
}

/// Снаряд выпущен (спавнит внешний слой)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ProjectileReleased {
    pub shooter: Entity,
    pub origin: Vec2,
    /// Нормализованное направление на цель в момент выпуска
    pub direction: Vec2,
}

/// Взрыв в точке (recover burst / смерть Cocogrunt)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct AreaBurst {
    pub source: Entity,
    pub position: Vec2,
}

/// Хитбокс коснулся врага
///
/// `source`, entity хитбокса; корень ищется по `ChildOf` (свой корень = не урон).
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitContact {
    pub victim: Entity,
    pub source: Entity,
}

/// Тело врага коснулось цели: урон игроку применяет внешний слой
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetContact {
    pub enemy: Entity,
    pub target: Entity,
    pub damage: i32,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageTaken {
    pub victim: Entity,
    pub attacker: Entity,
    pub amount: i32,
    pub health_after: i32,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Outer machine сменила состояние
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BehaviorChanged {
    pub entity: Entity,
    pub from: BehaviorKind,
    pub to: BehaviorKind,
}
