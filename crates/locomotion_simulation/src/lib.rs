//! Locomotion Simulation Core
//!
//! Third-person locomotion state machine на Bevy 0.16 (FixedUpdate tick):
//! movement (Grounded/InAir) × jump (Start/Loop/LandLow/LandHigh) ×
//! character (Walking/Running/Crouching/Sliding).
//!
//! Разделение ответственности:
//! - locomotion = состояния, guard'ы, slide, high landing probe
//! - input = перевод input/animation событий в guarded запросы
//! - physics = headless collaborator (velocity, gravity, floor, Rapier collider)

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

// Публичные модули
pub mod animation;
pub mod components;
pub mod config;
pub mod input;
pub mod locomotion;
pub mod logger;
pub mod physics;

// Re-export для удобства
pub use animation::JumpAnimationTimeline;
pub use components::*;
pub use config::{ConfigError, LocomotionConfig};
pub use input::RandomInputDriver;
pub use locomotion::{
    AnimationNotify, GroundTraceBackend, InputAction, Locomotion, LocomotionInput, LocomotionPlugin,
    LocomotionSet, LocomotionSnapshot, LocomotionStateChanged, PhysicsCommand,
};
pub use logger::{
    init_logger, log, log_error, log_info, log_level, log_warning, log_with_level, set_log_level,
    set_printer, set_printer_if_needed, LogLevel, LogPrinter,
};
pub use physics::{
    spawn_locomotion_character, spawn_static_ground, FlatGround, GroundTraceWorld, HeadlessPhysicsPlugin,
};

/// Главный plugin симуляции (state machine + headless physics + drivers)
#[derive(Default)]
pub struct LocomotionSimulationPlugin {
    pub config: LocomotionConfig,
    /// Rapier backend требует RapierPhysicsPlugin в App
    pub ground_trace: GroundTraceBackend,
}

impl LocomotionSimulationPlugin {
    pub fn new(config: LocomotionConfig) -> Self {
        Self {
            config,
            ground_trace: GroundTraceBackend::World,
        }
    }
}

impl Plugin for LocomotionSimulationPlugin {
    fn build(&self, app: &mut App) {
        let tick_hz = self.config.physics.tick_hz;

        app.insert_resource(self.config.clone())
            .insert_resource(Time::<Fixed>::from_hz(tick_hz));

        // Headless: шаг ручного времени = fixed шаг (один update = один тик)
        if let Some(mut strategy) = app.world_mut().get_resource_mut::<TimeUpdateStrategy>() {
            if matches!(*strategy, TimeUpdateStrategy::ManualDuration(_)) {
                *strategy = TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(1.0 / tick_hz));
            }
        }

        // Seed из create_headless_app не перетираем
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app.add_plugins((
            LocomotionPlugin {
                ground_trace: self.ground_trace,
            },
            HeadlessPhysicsPlugin {
                ground_trace: self.ground_trace,
            },
        ));

        // Источники событий (до их обработки в том же тике)
        app.add_systems(
            FixedUpdate,
            (input::drive_random_input, animation::drive_jump_animation)
                .in_set(LocomotionSet::Input)
                .before(input::process_animation_notifies),
        );
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

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время ручное: каждый `app.update()` (кроме самого первого, он только
/// стартует часы) продвигает FixedUpdate ровно на один тик.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();

    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)) // 60Hz FixedUpdate
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(1.0 / 60.0)));

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Debug формат — сравниваем байты, не значения
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
