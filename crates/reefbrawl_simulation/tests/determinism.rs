//! Тесты детерминизма
//!
//! Одинаковый seed + одинаковые входы → идентичный мир.
//! Cocogrunt strafe решения идут через DeterministicRng, так что арена
//! реально зависит от seed.

use bevy::prelude::*;
use reefbrawl_simulation::spawn::spawn_hitbox;
use reefbrawl_simulation::*;

const TICK_COUNT: u32 = 600;

/// Запускает арену и возвращает snapshot мира
fn run_arena(seed: u64) -> Vec<u8> {
    let mut app = create_headless_app(seed);

    {
        let world = app.world_mut();
        let player = world.spawn(Transform::from_xyz(0.0, 0.0, 0.0)).id();
        {
            let mut commands = world.commands();

            for (i, id) in ArchetypeId::ALL.iter().enumerate() {
                let angle = i as f32 * std::f32::consts::FRAC_PI_2;
                let position = Vec2::from_angle(angle) * 2.5;
                spawn_enemy(&mut commands, &ArchetypeConfig::preset(*id), position, Some(player))
                    .expect("valid preset");
            }

            // Несколько cocogrunt'ов: больше RNG решений
            for i in 0..4 {
                let position = Vec2::new(-3.0 + i as f32 * 2.0, 3.0);
                spawn_enemy(
                    &mut commands,
                    &ArchetypeConfig::preset(ArchetypeId::Cocogrunt),
                    position,
                    Some(player),
                )
                .expect("valid preset");
            }

            spawn_hitbox(&mut commands, 30, 1.0, Vec2::ZERO, Some(player));
        }
        world.flush();
    }

    run_fixed_ticks(&mut app, TICK_COUNT);

    let world = app.world_mut();
    let mut snapshot = world_snapshot::<Transform>(world);
    snapshot.extend(world_snapshot::<EnemyBrain>(world));
    snapshot.extend(world_snapshot::<CombatMachine>(world));
    snapshot.extend(world_snapshot::<Health>(world));
    snapshot
}

#[test]
fn test_determinism_same_seed() {
    const SEED: u64 = 12345;

    let snapshot1 = run_arena(SEED);
    let snapshot2 = run_arena(SEED);

    assert!(!snapshot1.is_empty());
    assert_eq!(
        snapshot1, snapshot2,
        "Симуляция с одинаковым seed ({}) дала разные результаты!",
        SEED
    );
}

#[test]
fn test_determinism_multiple_runs() {
    const SEED: u64 = 42;

    // Запускаем 3 раза, все должны быть идентичны
    let snapshots: Vec<_> = (0..3).map(|_| run_arena(SEED)).collect();

    for (i, snapshot) in snapshots.iter().enumerate().skip(1) {
        assert_eq!(
            snapshots[0], *snapshot,
            "Прогон {} дал результат отличный от прогона 0",
            i
        );
    }
}
