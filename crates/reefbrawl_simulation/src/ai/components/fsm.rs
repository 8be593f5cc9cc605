//! Outer behavior FSM: Patrolling → Chasing → Searching / Combat
//!
//! Переходы (каждый тик, кроме dead / knocked back):
//! - Patrolling → Chasing: цель в detection range И видна
//! - Chasing → Combat: цель в combat range (строго меньше detection) И видна
//! - Chasing → Searching: цель не видна ИЛИ дальше detection range
//! - Searching → Chasing: re-acquire (detection range + видимость)
//! - Searching → Patrolling: search timer истёк
//! - Combat → Searching: как Chasing → Searching (inner machine сбрасывается снаружи)
//! - Combat → Chasing: ссылка на цель пропала. Этот выход делает inner machine
//!   (`CombatStep::Disengage` → `force_chasing`), re-pursuit вместо полного поиска

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ai::perception::TargetSense;
use crate::components::{NavigationAgent, PhysicsBody};
use crate::error::{ensure_positive, SimulationError, SimulationResult};

/// Outer (macro) состояние агента
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum BehaviorState {
    /// Бродим вокруг patrol center
    Patrolling,
    /// Преследуем живую позицию цели
    Chasing,
    /// Ищем вокруг last known position
    Searching {
        /// Сколько ещё ищем (секунды)
        timer: f32,
    },
    /// Движением управляет inner combat machine
    Combat,
}

impl Default for BehaviorState {
    fn default() -> Self {
        Self::Patrolling
    }
}

impl BehaviorState {
    pub fn kind(&self) -> BehaviorKind {
        match self {
            BehaviorState::Patrolling => BehaviorKind::Patrolling,
            BehaviorState::Chasing => BehaviorKind::Chasing,
            BehaviorState::Searching { .. } => BehaviorKind::Searching,
            BehaviorState::Combat => BehaviorKind::Combat,
        }
    }

    pub fn is_combat(&self) -> bool {
        matches!(self, BehaviorState::Combat)
    }
}

/// Состояние без данных (для событий/логов/сравнений)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum BehaviorKind {
    Patrolling,
    Chasing,
    Searching,
    Combat,
}

/// Переход outer машины за тик
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BehaviorTransition {
    pub from: BehaviorKind,
    pub to: BehaviorKind,
}

impl BehaviorTransition {
    pub fn enters_combat(&self) -> bool {
        self.to == BehaviorKind::Combat && self.from != BehaviorKind::Combat
    }

    pub fn exits_combat(&self) -> bool {
        self.from == BehaviorKind::Combat && self.to != BehaviorKind::Combat
    }
}

/// Параметры outer FSM (часть archetype config)
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Радиус обнаружения (метры)
    pub detection_range: f32,
    /// Радиус входа в бой (строго меньше detection_range)
    pub combat_range: f32,
    /// Радиус патруля вокруг точки спавна
    pub patrol_radius: f32,
    pub patrol_speed: f32,
    pub chase_speed: f32,
    /// Длительность поиска (секунды)
    pub search_duration: f32,
    /// Радиус блуждания вокруг last known position
    pub search_wander_radius: f32,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            detection_range: 5.0,
            combat_range: 1.0,
            patrol_radius: 10.0,
            patrol_speed: 2.0,
            chase_speed: 4.0,
            search_duration: 2.0,
            search_wander_radius: 3.0,
        }
    }
}

impl BehaviorConfig {
    pub fn validate(&self, archetype: &str) -> SimulationResult<()> {
        ensure_positive(archetype, "detection_range", self.detection_range)?;
        ensure_positive(archetype, "combat_range", self.combat_range)?;
        ensure_positive(archetype, "patrol_radius", self.patrol_radius)?;
        ensure_positive(archetype, "patrol_speed", self.patrol_speed)?;
        ensure_positive(archetype, "chase_speed", self.chase_speed)?;
        ensure_positive(archetype, "search_duration", self.search_duration)?;
        ensure_positive(archetype, "search_wander_radius", self.search_wander_radius)?;

        if self.combat_range >= self.detection_range {
            return Err(SimulationError::invalid(
                archetype,
                "combat_range",
                format!(
                    "must be strictly tighter than detection_range ({} >= {})",
                    self.combat_range, self.detection_range
                ),
            ));
        }

        Ok(())
    }
}

/// Outer state machine агента + память (patrol center, last known position)
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct EnemyBrain {
    pub state: BehaviorState,
    /// Центр патруля (точка спавна)
    pub patrol_center: Vec2,
    /// Последняя замеченная позиция цели
    pub last_known_position: Vec2,
}

impl EnemyBrain {
    pub fn new(spawn_position: Vec2) -> Self {
        Self {
            state: BehaviorState::Patrolling,
            patrol_center: spawn_position,
            last_known_position: spawn_position,
        }
    }

    /// Один тик outer машины: сначала переходы, потом поведение состояния.
    ///
    /// Возвращает переход, если он был (caller сбрасывает inner machine
    /// на входе/выходе из Combat). В Combat движением не управляем.
    #[allow(clippy::too_many_arguments)]
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        position: Vec2,
        sense: &TargetSense,
        config: &BehaviorConfig,
        nav: &mut NavigationAgent,
        body: &mut PhysicsBody,
        rng: &mut R,
        dt: f32,
    ) -> Option<BehaviorTransition> {
        let transition = self
            .next_state(position, sense, config)
            .map(|next| self.enter(next, nav, body));

        if transition.is_some_and(|t| t.to == BehaviorKind::Patrolling) {
            // Вернулись к патрулю, сразу новая точка вокруг центра
            self.pick_patrol_point(config, nav, rng);
        }

        self.tick_state(position, sense, config, nav, rng, dt);

        transition
    }

    /// Принудительный выход из боя (inner machine потеряла цель) → Chasing
    pub fn force_chasing(
        &mut self,
        nav: &mut NavigationAgent,
        body: &mut PhysicsBody,
    ) -> Option<BehaviorTransition> {
        if matches!(self.state, BehaviorState::Chasing) {
            return None;
        }
        Some(self.enter(BehaviorState::Chasing, nav, body))
    }

    fn next_state(
        &self,
        position: Vec2,
        sense: &TargetSense,
        config: &BehaviorConfig,
    ) -> Option<BehaviorState> {
        let detected = sense.is_engageable(position, config.detection_range);

        match self.state {
            BehaviorState::Patrolling => detected.then_some(BehaviorState::Chasing),

            BehaviorState::Chasing => {
                if !detected {
                    Some(BehaviorState::Searching { timer: config.search_duration })
                } else if sense.is_engageable(position, config.combat_range) {
                    Some(BehaviorState::Combat)
                } else {
                    None
                }
            }

            BehaviorState::Searching { timer } => {
                if detected {
                    Some(BehaviorState::Chasing)
                } else if timer <= 0.0 {
                    Some(BehaviorState::Patrolling)
                } else {
                    None
                }
            }

            // Пропавшую ссылку на цель обрабатывает inner machine
            BehaviorState::Combat => {
                if sense.target_position.is_some() && !detected {
                    Some(BehaviorState::Searching { timer: config.search_duration })
                } else {
                    None
                }
            }
        }
    }

    fn enter(
        &mut self,
        next: BehaviorState,
        nav: &mut NavigationAgent,
        body: &mut PhysicsBody,
    ) -> BehaviorTransition {
        let from = self.state.kind();

        if from == BehaviorKind::Combat {
            // Снимаем dash/strafe override в том же тике
            body.velocity = Vec2::ZERO;
        }

        nav.enabled = true;

        if let BehaviorState::Searching { .. } = next {
            nav.set_destination(self.last_known_position);
        }

        self.state = next;

        BehaviorTransition {
            from,
            to: next.kind(),
        }
    }

    fn tick_state<R: Rng + ?Sized>(
        &mut self,
        position: Vec2,
        sense: &TargetSense,
        config: &BehaviorConfig,
        nav: &mut NavigationAgent,
        rng: &mut R,
        dt: f32,
    ) {
        match &mut self.state {
            BehaviorState::Patrolling => {
                if nav.reached_destination() {
                    self.pick_patrol_point(config, nav, rng);
                }
            }

            BehaviorState::Chasing => {
                if let Some(target) = sense.target_position {
                    nav.set_destination(target);
                    nav.set_speed(config.chase_speed);
                    self.last_known_position = target;
                }
            }

            BehaviorState::Searching { timer } => {
                *timer -= dt;
                if nav.reached_destination() && *timer > 0.0 {
                    let point = random_point_in_circle(
                        rng,
                        self.last_known_position,
                        config.search_wander_radius,
                    );
                    nav.set_destination(point);
                }
            }

            BehaviorState::Combat => {
                if sense.is_engageable(position, config.detection_range) {
                    if let Some(target) = sense.target_position {
                        self.last_known_position = target;
                    }
                }
            }
        }
    }

    fn pick_patrol_point<R: Rng + ?Sized>(
        &self,
        config: &BehaviorConfig,
        nav: &mut NavigationAgent,
        rng: &mut R,
    ) {
        let point = random_point_in_circle(rng, self.patrol_center, config.patrol_radius);
        nav.set_destination(point);
        nav.set_speed(config.patrol_speed);
    }
}

/// Равномерная точка внутри круга
pub fn random_point_in_circle<R: Rng + ?Sized>(rng: &mut R, center: Vec2, radius: f32) -> Vec2 {
    let angle = rng.gen::<f32>() * std::f32::consts::TAU;
    let distance = radius * rng.gen::<f32>().sqrt();
    center + Vec2::from_angle(angle) * distance
}
