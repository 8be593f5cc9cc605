//! Motion: headless навигация + интеграция velocity
//!
//! Архитектура:
//! - `drive_navigation`: straight-line pathfinder (вместо navmesh), пишет
//!   PhysicsBody.velocity только когда NavigationAgent.enabled
//! - `integrate_velocity_to_transform`: headless интеграция (без Rapier)
//! - `sync_velocity_to_rapier`: Rapier backend (KinematicVelocityBased тело)
//!
//! Детерминизм: fixed timestep, те же dt что у state machines

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::combat::Dead;
use crate::components::{NavigationAgent, PhysicsBody};

/// Один шаг straight-line навигации
///
/// Возвращает (velocity, reached). Скорость режется у цели, чтобы
/// не перелетать destination за один тик.
pub fn navigation_step(position: Vec2, nav: &NavigationAgent, dt: f32) -> (Vec2, bool) {
    let Some(destination) = nav.destination() else {
        return (Vec2::ZERO, true);
    };

    let offset = destination - position;
    let distance = offset.length();
    if distance <= nav.arrival_tolerance {
        return (Vec2::ZERO, true);
    }

    let mut speed = nav.speed();
    if dt > 0.0 {
        speed = speed.min(distance / dt);
    }

    (offset / distance * speed, false)
}

/// Система: navigation port (headless pathfinder)
pub fn drive_navigation(
    mut agents: Query<(&Transform, &mut NavigationAgent, &mut PhysicsBody), Without<Dead>>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (transform, mut nav, mut body) in agents.iter_mut() {
        if !nav.enabled {
            continue;
        }

        let (velocity, reached) = navigation_step(transform.translation.truncate(), &nav, delta);
        body.velocity = velocity;
        nav.report_progress(velocity, reached);
    }
}

/// Система: velocity → Transform (headless режим, без Rapier)
pub fn integrate_velocity_to_transform(
    mut query: Query<(&PhysicsBody, &mut Transform)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (body, mut transform) in query.iter_mut() {
        transform.translation += (body.velocity * delta).extend(0.0);
    }
}

/// Система: наш PhysicsBody → Rapier Velocity
///
/// Rapier сам интегрирует KinematicVelocityBased тела.
pub fn sync_velocity_to_rapier(mut query: Query<(&PhysicsBody, &mut Velocity)>) {
    for (body, mut rapier_velocity) in query.iter_mut() {
        rapier_velocity.linvel = body.velocity;
    }
}
