//! Spawn helpers: враги, хитбоксы, препятствия
//!
//! `spawn_enemy` единственная точка конструирования агента. Конфиг
//! валидируется ДО спавна, невалидный archetype не создаёт entity.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::ai::perception::{Obstacle, ObstacleField, TargetSense};
use crate::ai::EnemyBrain;
use crate::combat::{ArchetypeConfig, CombatMachine, HitReaction, ReactionProfile};
use crate::components::{ChaseTarget, ContactDamage, Enemy, Facing, Health, Hitbox, NavigationAgent, PhysicsBody};
use crate::error::SimulationResult;
use crate::physics::collision::{enemy_groups, hitbox_groups, obstacle_groups, ENEMY_RADIUS, OBSTACLE};

/// Враг по archetype config
///
/// Rapier компоненты добавляются всегда: без RapierPhysicsPlugin они инертны.
pub fn spawn_enemy(
    commands: &mut Commands,
    config: &ArchetypeConfig,
    position: Vec2,
    target: Option<Entity>,
) -> SimulationResult<Entity> {
    config.validate()?;

    let entity = commands
        .spawn((
            Enemy { archetype: config.id },
            Transform::from_translation(position.extend(0.0)),
            Health::new(config.max_health),
            ContactDamage(config.contact_damage),
            Facing::default(),
            ChaseTarget(target),
        ))
        .insert((
            // AI: perception snapshot + outer FSM + inner combat machine
            TargetSense::default(),
            config.behavior.clone(),
            EnemyBrain::new(position),
            CombatMachine::new(config.combat),
            HitReaction::default(),
            ReactionProfile::from(config),
        ))
        .insert((
            NavigationAgent::default(),
            PhysicsBody::default(),
            RigidBody::KinematicVelocityBased,
            Collider::ball(ENEMY_RADIUS),
            Velocity::zero(),
            enemy_groups(),
            ActiveEvents::COLLISION_EVENTS,
            ActiveCollisionTypes::default()
                | ActiveCollisionTypes::KINEMATIC_STATIC
                | ActiveCollisionTypes::KINEMATIC_KINEMATIC,
        ))
        .id();

    crate::log(&format!(
        "🦀 Spawned {} {:?} at {:?} (hp {})",
        config.id.name(),
        entity,
        position,
        config.max_health
    ));

    Ok(entity)
}

/// Наносящий урон коллайдер (атака игрока, снаряд, взрыв)
///
/// `owner` → ChildOf: свой хитбокс не бьёт своего владельца.
pub fn spawn_hitbox(
    commands: &mut Commands,
    damage: i32,
    radius: f32,
    position: Vec2,
    owner: Option<Entity>,
) -> Entity {
    let mut hitbox = commands.spawn((
        Hitbox::new(damage, radius),
        Transform::from_translation(position.extend(0.0)),
        Collider::ball(radius),
        Sensor,
        hitbox_groups(),
        ActiveEvents::COLLISION_EVENTS,
        ActiveCollisionTypes::default() | ActiveCollisionTypes::KINEMATIC_STATIC,
    ));

    if let Some(owner) = owner {
        hitbox.insert(ChildOf(owner));
    }

    hitbox.id()
}

/// Стена/камень: в ObstacleField (headless) и статический коллайдер (Rapier)
pub fn spawn_obstacle(commands: &mut Commands, field: &mut ObstacleField, min: Vec2, max: Vec2) -> Entity {
    field.add(Obstacle::new(min, max, OBSTACLE.bits()));

    let center = (min + max) * 0.5;
    let half = (max - min).abs() * 0.5;

    commands
        .spawn((
            Transform::from_translation(center.extend(0.0)),
            RigidBody::Fixed,
            Collider::cuboid(half.x, half.y),
            obstacle_groups(),
        ))
        .id()
}
