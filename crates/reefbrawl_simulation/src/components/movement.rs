//! Movement компоненты: Navigation Port и rigid body velocity

use bevy::prelude::*;

/// Navigation Port (pathfinder снаружи, в headless, `drive_navigation`)
///
/// Архитектура:
/// - AI пишет high-level intent: `set_destination` + `set_speed`
/// - Pathfinder читает и двигает агента, выставляет `reached` и `velocity`
/// - `enabled = false`: навигация отдаёт движение (knockback, dash, strafe)
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct NavigationAgent {
    destination: Option<Vec2>,
    speed: f32,
    pub enabled: bool,
    reached: bool,
    velocity: Vec2,
    /// Дистанция, на которой считаем что дошли
    pub arrival_tolerance: f32,
}

impl Default for NavigationAgent {
    fn default() -> Self {
        Self {
            destination: None,
            speed: 2.0,
            enabled: true,
            reached: false,
            velocity: Vec2::ZERO,
            arrival_tolerance: 0.1,
        }
    }
}

impl NavigationAgent {
    pub fn set_destination(&mut self, point: Vec2) {
        self.destination = Some(point);
        self.reached = false;
    }

    pub fn destination(&self) -> Option<Vec2> {
        self.destination
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Без destination считаем что "пришли" (первый тик патруля выберет точку)
    pub fn reached_destination(&self) -> bool {
        self.destination.is_none() || self.reached
    }

    pub fn current_velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Вызывается pathfinder'ом после шага
    pub fn report_progress(&mut self, velocity: Vec2, reached: bool) {
        self.velocity = velocity;
        self.reached = reached;
    }
}

/// Скорость rigid body (м/с)
///
/// Пишут: pathfinder (когда navigation enabled), dash/strafe, knockback.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PhysicsBody {
    pub velocity: Vec2,
}
