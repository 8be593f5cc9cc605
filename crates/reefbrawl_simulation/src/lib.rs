//! Reefbrawl Simulation Core
//!
//! Headless ECS-симуляция вражеского AI на Bevy 0.16.
//!
//! Каждый враг = две вложенные state machines:
//! - outer FSM (Patrolling / Chasing / Searching / Combat), общая для всех
//! - inner combat machine archetype'а (dash / hybrid / shell), активна только в Combat
//!
//! Движок снаружи (рендер, navmesh, анимации) подключается через порты:
//! NavigationAgent, PhysicsBody, Health, Hitbox, события `combat::events`.

use bevy::prelude::*;
use bevy::transform::TransformPlugin;
use bevy_rapier2d::prelude::{NoUserData, RapierPhysicsPlugin};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod error;
pub mod logger;
pub mod physics;
pub mod spawn;

// Re-export базовых типов для удобства
pub use ai::perception::{Obstacle, ObstacleField, ObstacleMask, PerceptionBackend, PerceptionSettings};
pub use ai::{AIPlugin, BehaviorConfig, BehaviorKind, BehaviorState, EnemyBrain};
pub use combat::{ArchetypeConfig, ArchetypeId, CombatMachine, CombatPhase, CombatPlugin, Dead, HitReaction};
pub use components::*;
pub use error::{SimulationError, SimulationResult};
pub use logger::{init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger, LogLevel};
pub use spawn::spawn_enemy;

/// Фазы одного fixed тика (строго по порядку)
///
/// Contact → Sense → Decide → Interrupts → Motion → Present
///
/// Interrupts идёт ПОСЛЕ Decide: knockback, начатый в Contact, замораживает
/// обе машины уже в этом тике, а шаг knockback двигает тело до Motion.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Хитбоксы → HitContact → onHit
    Contact,
    /// Perception snapshot
    Sense,
    /// Outer FSM + inner combat machine
    Decide,
    /// Knockback / i-frames
    Interrupts,
    /// Навигация + интеграция
    Motion,
    /// Facing, death animation таймеры
    Present,
}

/// Главный plugin симуляции (объединяет все подсистемы)
#[derive(Debug, Clone, Copy)]
pub struct SimulationPlugin {
    pub seed: u64,
    /// Частота fixed тика
    pub tick_hz: f64,
    pub perception: PerceptionBackend,
    pub obstacle_mask: ObstacleMask,
}

impl Default for SimulationPlugin {
    fn default() -> Self {
        Self {
            seed: 42,
            tick_hz: 60.0,
            perception: PerceptionBackend::ObstacleField,
            obstacle_mask: ObstacleMask::OBSTACLES,
        }
    }
}

impl SimulationPlugin {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            FixedUpdate,
            (
                SimulationSet::Contact,
                SimulationSet::Sense,
                SimulationSet::Decide,
                SimulationSet::Interrupts,
                SimulationSet::Motion,
                SimulationSet::Present,
            )
                .chain(),
        );

        app
            // Fixed timestep (легче считать таймеры)
            .insert_resource(Time::<Fixed>::from_hz(self.tick_hz))
            // Детерминистичный RNG (все случайные решения AI идут через него)
            .insert_resource(DeterministicRng::new(self.seed))
            .insert_resource(self.perception)
            .insert_resource(PerceptionSettings {
                obstacle_mask: self.obstacle_mask,
            })
            .add_plugins((CombatPlugin, AIPlugin));

        match self.perception {
            PerceptionBackend::ObstacleField => {
                app.add_systems(
                    FixedUpdate,
                    (physics::drive_navigation, physics::integrate_velocity_to_transform)
                        .chain()
                        .in_set(SimulationSet::Motion),
                );
            }
            PerceptionBackend::Rapier => {
                if !app.is_plugin_added::<TransformPlugin>() {
                    app.add_plugins(TransformPlugin);
                }
                app.add_plugins(RapierPhysicsPlugin::<NoUserData>::default()).add_systems(
                    FixedUpdate,
                    (physics::drive_navigation, physics::sync_velocity_to_rapier)
                        .chain()
                        .in_set(SimulationSet::Motion),
                );
            }
        }

        log_info(&format!(
            "🌊 SimulationPlugin: seed={} tick={}Hz perception={:?}",
            self.seed, self.tick_hz, self.perception
        ));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции (ObstacleField perception)
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .add_plugins(SimulationPlugin::with_seed(seed));

    app
}

/// Прогоняет ровно `ticks` fixed тиков, минуя wall clock
///
/// Для тестов и headless прогонов: каждый тик = один timestep `Time<Fixed>`.
pub fn run_fixed_ticks(app: &mut App, ticks: u32) {
    for _ in 0..ticks {
        let world = app.world_mut();
        let timestep = world.resource::<Time<Fixed>>().timestep();
        world.resource_mut::<Time<Fixed>>().advance_by(timestep);
        world.run_schedule(FixedUpdate);
    }
}

/// Snapshot мира для сравнения детерминизма
///
/// Компоненты сортируются по Entity index и сериализуются через Debug.
pub fn world_snapshot<T: Component + std::fmt::Debug>(world: &mut World) -> Vec<u8> {
    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    let mut snapshot = Vec::new();
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
