//! Hit resolution (onHit) + death hook + despawn
//!
//! Порядок на один HitContact:
//! 1. Root хитбокса == жертва → игнор (свой коллайдер)
//! 2. Жертва мертва или неуязвима → игнор целиком (без урона, без re-trigger)
//! 3. Knockback (от атакующего к жертве) + i-frames
//! 4. Health −= hitbox.damage
//! 5. Death hook: health ≤ 0 → Dead, стоп, Death cue, EnemyDied, despawn policy

use std::collections::HashSet;

use bevy::prelude::*;
use bevy_rapier2d::prelude::CollisionEvent;

use crate::combat::archetype::DeathPolicy;
use crate::combat::events::{AreaBurst, Cue, DamageTaken, EnemyDied, HitContact, PresentationCue, TargetContact};
use crate::combat::reaction::{HitReaction, ReactionProfile};
use crate::components::{ChaseTarget, ContactDamage, Enemy, Health, Hitbox, NavigationAgent, PhysicsBody};
use crate::physics::collision::{ENEMY_RADIUS, TARGET_RADIUS};

/// Компонент-маркер: entity мертв (Health <= 0)
///
/// Dead агенты пропускаются Sense/Decide/Motion и игнорируют удары.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Dead;

/// Деспавн после death animation
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct DespawnAfter {
    /// Сколько ещё ждём (секунды)
    pub remaining: f32,
    /// AreaBurst в точке смерти при деспавне
    pub burst: bool,
}

/// Корень иерархии (идём по ChildOf вверх)
pub fn root_of(entity: Entity, parents: &Query<&ChildOf>) -> Entity {
    let mut current = entity;
    while let Ok(child_of) = parents.get(current) {
        current = child_of.parent();
    }
    current
}

/// Система: headless overlap хитбоксов с врагами
///
/// Событие только на НАЧАЛО контакта (как CollisionEvent::Started в Rapier).
pub fn detect_hitbox_overlaps(
    hitboxes: Query<(Entity, &Hitbox, &Transform)>,
    enemies: Query<(Entity, &Transform), (With<Enemy>, Without<Dead>)>,
    mut touching: Local<HashSet<(Entity, Entity)>>,
    mut contacts: EventWriter<HitContact>,
) {
    let mut current = HashSet::new();

    for (source, hitbox, hitbox_transform) in hitboxes.iter() {
        let hitbox_pos = hitbox_transform.translation.truncate();

        for (victim, victim_transform) in enemies.iter() {
            let distance = hitbox_pos.distance(victim_transform.translation.truncate());
            if distance > hitbox.radius + ENEMY_RADIUS {
                continue;
            }

            current.insert((victim, source));
            if !touching.contains(&(victim, source)) {
                contacts.write(HitContact { victim, source });
            }
        }
    }

    *touching = current;
}

/// Система: contact damage врага по своей цели
///
/// Тоже только на начало контакта. Дистанция, не Rapier: цель (игрок)
/// живёт во внешнем слое и своего коллайдера у нас нет.
pub fn detect_target_contacts(
    enemies: Query<(Entity, &Transform, &ChaseTarget, &ContactDamage), Without<Dead>>,
    targets: Query<&Transform>,
    mut touching: Local<HashSet<(Entity, Entity)>>,
    mut contacts: EventWriter<TargetContact>,
) {
    let mut current = HashSet::new();

    for (enemy, transform, chase_target, contact_damage) in enemies.iter() {
        let Some(target) = chase_target.0 else {
            continue;
        };
        let Ok(target_transform) = targets.get(target) else {
            continue;
        };

        let distance = transform
            .translation
            .truncate()
            .distance(target_transform.translation.truncate());
        if distance > ENEMY_RADIUS + TARGET_RADIUS {
            continue;
        }

        current.insert((enemy, target));
        if !touching.contains(&(enemy, target)) {
            crate::log(&format!("🩸 {:?} touched {:?} ({} dmg)", enemy, target, contact_damage.0));
            contacts.write(TargetContact {
                enemy,
                target,
                damage: contact_damage.0,
            });
        }
    }

    *touching = current;
}

/// Система: Rapier CollisionEvent::Started (враг × хитбокс) → HitContact
pub fn collect_rapier_hits(
    mut collisions: EventReader<CollisionEvent>,
    enemies: Query<(), With<Enemy>>,
    hitboxes: Query<(), With<Hitbox>>,
    mut contacts: EventWriter<HitContact>,
) {
    for collision in collisions.read() {
        let CollisionEvent::Started(a, b, _) = collision else {
            continue;
        };

        for (victim, source) in [(*a, *b), (*b, *a)] {
            if enemies.contains(victim) && hitboxes.contains(source) {
                contacts.write(HitContact { victim, source });
            }
        }
    }
}

/// Система: onHit для каждого HitContact
#[allow(clippy::too_many_arguments)]
pub fn resolve_hit_contacts(
    mut commands: Commands,
    mut contacts: EventReader<HitContact>,
    mut victims: Query<
        (
            &Transform,
            &mut Health,
            &mut HitReaction,
            &mut NavigationAgent,
            &mut PhysicsBody,
            &ReactionProfile,
            Has<Dead>,
        ),
        With<Enemy>,
    >,
    hitboxes: Query<&Hitbox>,
    parents: Query<&ChildOf>,
    positions: Query<&Transform>,
    mut damage_events: EventWriter<DamageTaken>,
    mut died_events: EventWriter<EnemyDied>,
    mut cues: EventWriter<PresentationCue>,
) {
    for contact in contacts.read() {
        let Ok((transform, mut health, mut reaction, mut nav, mut body, profile, dead)) =
            victims.get_mut(contact.victim)
        else {
            continue;
        };

        let Ok(hitbox) = hitboxes.get(contact.source) else {
            crate::log_warning(&format!(
                "HitContact: source {:?} has no Hitbox, ignoring",
                contact.source
            ));
            continue;
        };

        let attacker = root_of(contact.source, &parents);
        if attacker == contact.victim {
            continue;
        }

        if dead || health.is_dead() {
            continue;
        }

        if reaction.is_invulnerable() {
            crate::log(&format!("🛡️ {:?} invulnerable, hit from {:?} ignored", contact.victim, attacker));
            continue;
        }

        let victim_pos = transform.translation.truncate();
        let attacker_pos = positions
            .get(attacker)
            .or_else(|_| positions.get(contact.source))
            .map(|t| t.translation.truncate())
            .unwrap_or(victim_pos);
        let direction = (victim_pos - attacker_pos).normalize_or_zero();

        reaction.request_knockback(direction, profile.knockback, &mut nav);
        reaction.request_iframes(profile.iframes);

        health.apply_damage(hitbox.damage);
        damage_events.write(DamageTaken {
            victim: contact.victim,
            attacker,
            amount: hitbox.damage,
            health_after: health.current_health(),
        });

        crate::log(&format!(
            "💥 {:?} hit by {:?}: -{} HP (now {})",
            contact.victim,
            attacker,
            hitbox.damage,
            health.current_health()
        ));

        if health.is_dead() {
            on_enemy_death(
                &mut commands,
                contact.victim,
                Some(attacker),
                profile.death,
                &mut reaction,
                &mut nav,
                &mut body,
                &mut cues,
                &mut died_events,
            );
        }
    }
}

/// Death hook (ровно один раз: дальше агент Dead и удары игнорируются)
#[allow(clippy::too_many_arguments)]
fn on_enemy_death(
    commands: &mut Commands,
    entity: Entity,
    killer: Option<Entity>,
    policy: DeathPolicy,
    reaction: &mut HitReaction,
    nav: &mut NavigationAgent,
    body: &mut PhysicsBody,
    cues: &mut EventWriter<PresentationCue>,
    died_events: &mut EventWriter<EnemyDied>,
) {
    reaction.clear();
    body.velocity = Vec2::ZERO;
    nav.enabled = false;

    cues.write(PresentationCue {
        entity,
        cue: Cue::Death,
    });
    died_events.write(EnemyDied { entity, killer });

    match policy {
        DeathPolicy::Immediate => {
            crate::log_info(&format!("💀 {:?} died (despawn now)", entity));
            commands.entity(entity).despawn();
        }
        DeathPolicy::Animated { duration, burst } => {
            crate::log_info(&format!("💀 {:?} died (despawn in {:.2}s)", entity, duration));
            commands.entity(entity).insert((
                Dead,
                DespawnAfter {
                    remaining: duration,
                    burst,
                },
            ));
        }
    }
}

/// Система: death animation закончилась → (burst) → despawn
pub fn despawn_after_timeout(
    mut commands: Commands,
    mut dying: Query<(Entity, &Transform, &mut DespawnAfter)>,
    mut bursts: EventWriter<AreaBurst>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, transform, mut despawn) in dying.iter_mut() {
        despawn.remaining -= delta;
        if despawn.remaining > 0.0 {
            continue;
        }

        if despawn.burst {
            bursts.write(AreaBurst {
                source: entity,
                position: transform.translation.truncate(),
            });
        }
        commands.entity(entity).despawn();
    }
}
