//! Logger integration test
//!
//! Отдельный бинарь: глобальный printer и уровень не делятся с другими тестами.

use bevy::prelude::*;
use reefbrawl_simulation::combat::EnemyDied;
use reefbrawl_simulation::logger::CaptureLogger;
use reefbrawl_simulation::spawn::spawn_hitbox;
use reefbrawl_simulation::*;

fn captured(capture: &CaptureLogger) -> Vec<String> {
    capture.lines.lock().expect("capture lock").clone()
}

#[test]
fn test_capture_logger_honours_log_level() {
    let capture = CaptureLogger::default();
    set_logger(Box::new(capture.clone()));
    set_log_level(LogLevel::Info);

    // init_logger внутри не перетирает уже установленный printer
    let mut app = create_headless_app(42);
    let player = app.world_mut().spawn(Transform::from_xyz(0.0, 0.0, 0.0)).id();
    let slime = {
        let world = app.world_mut();
        let slime = {
            let mut commands = world.commands();
            let slime = spawn_enemy(
                &mut commands,
                &ArchetypeConfig::preset(ArchetypeId::Slime),
                Vec2::new(3.0, 0.0),
                Some(player),
            )
            .expect("valid preset");
            spawn_hitbox(&mut commands, 150, 0.5, Vec2::new(3.3, 0.0), None);
            slime
        };
        world.flush();
        slime
    };

    run_fixed_ticks(&mut app, 1);
    assert_eq!(app.world_mut().resource_mut::<Events<EnemyDied>>().drain().count(), 1);
    assert!(app.world().get_entity(slime).is_err());

    log("debug line below threshold");
    log_warning("warning line above threshold");

    let lines = captured(&capture);
    // Info из plugin'а и смерти прошли, debug (спавн, onHit) отфильтрован
    assert!(lines.iter().any(|line| line.starts_with("[INFO]") && line.contains("SimulationPlugin")));
    assert!(lines.iter().any(|line| line.starts_with("[INFO]") && line.contains("died")));
    assert!(lines.iter().any(|line| line.contains("warning line above threshold")));
    assert!(!lines.iter().any(|line| line.contains("debug line below threshold")));
    assert!(!lines.iter().any(|line| line.starts_with("[DEBUG]")));

    // Обратно на Debug: всё проходит
    set_log_level(LogLevel::Debug);
    log("debug line after reset");
    assert!(captured(&capture)
        .iter()
        .any(|line| line.starts_with("[DEBUG]") && line.contains("debug line after reset")));
}
