//! Headless арена Reefbrawl
//!
//! По врагу каждого archetype против неподвижной "цели-игрока" за стеной.
//! Раз в секунду симуляции печатает состояние врагов и счётчики событий.
//!
//! Использование: `reefbrawl_simulation [seed] [ticks]`

use bevy::prelude::*;
use reefbrawl_simulation::combat::{DamageTaken, EnemyDied, ProjectileReleased};
use reefbrawl_simulation::spawn::{spawn_hitbox, spawn_obstacle};
use reefbrawl_simulation::*;

fn main() {
    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let ticks: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(600);

    let mut app = create_headless_app(seed);
    log_info(&format!("🌊 Reefbrawl arena (seed: {}, ticks: {})", seed, ticks));

    let player = app.world_mut().spawn(Transform::from_xyz(0.0, 0.0, 0.0)).id();

    let enemies = {
        let world = app.world_mut();
        let mut field = world.resource::<ObstacleField>().clone();
        let spawned = {
            let mut commands = world.commands();

            // Риф между игроком и ReefTitan, тот не видит цель
            spawn_obstacle(&mut commands, &mut field, Vec2::new(-4.5, -1.0), Vec2::new(-4.0, 1.0));

            ArchetypeId::ALL
                .iter()
                .zip([Vec2::new(3.0, 0.0), Vec2::new(0.0, 4.0), Vec2::new(2.5, -2.5), Vec2::new(-6.0, 0.0)])
                .map(|(id, position)| {
                    let config = ArchetypeConfig::preset(*id);
                    (*id, spawn_enemy(&mut commands, &config, position, Some(player)))
                })
                .collect::<Vec<(ArchetypeId, SimulationResult<Entity>)>>()
        };

        world.insert_resource(field);
        world.flush();
        spawned
    };

    let mut alive = Vec::new();
    for (id, result) in enemies {
        match result {
            Ok(entity) => alive.push((id, entity)),
            Err(err) => log_error(&format!("Failed to spawn {}: {}", id.name(), err)),
        }
    }

    let mut damage_count = 0usize;
    let mut projectile_count = 0usize;
    let mut deaths = 0usize;

    for tick in 1..=ticks {
        // Через 3 секунды игрок бьёт мечом вокруг себя
        if tick == 180 {
            let world = app.world_mut();
            spawn_hitbox(&mut world.commands(), 40, 1.2, Vec2::ZERO, Some(player));
            world.flush();
            log_info("⚔️ Player swings sword");
        }

        run_fixed_ticks(&mut app, 1);

        let world = app.world_mut();
        damage_count += world.resource_mut::<Events<DamageTaken>>().drain().count();
        projectile_count += world.resource_mut::<Events<ProjectileReleased>>().drain().count();
        deaths += world.resource_mut::<Events<EnemyDied>>().drain().count();

        if tick % 60 == 0 {
            log_info(&format!(
                "Tick {}: damage={} projectiles={} deaths={}",
                tick, damage_count, projectile_count, deaths
            ));

            for (id, entity) in &alive {
                let Some(brain) = world.get::<EnemyBrain>(*entity) else {
                    continue;
                };
                let phase = world.get::<CombatMachine>(*entity).map(|m| m.phase());
                let position = world.get::<Transform>(*entity).map(|t| t.translation.truncate());
                let health = world.get::<Health>(*entity).map(|h| h.current_health());

                log_info(&format!(
                    "  {} {:?}: {:?} / {:?} at {:?} hp {:?}",
                    id.name(),
                    entity,
                    brain.state,
                    phase,
                    position,
                    health
                ));
            }
        }
    }

    log_info("Simulation complete!");
}
