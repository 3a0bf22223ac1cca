//! Headless locomotion симуляция
//!
//! Один персонаж на плоском полу, input — RandomInputDriver (seeded),
//! jump анимация — JumpAnimationTimeline.
//!
//! Использование: `locomotion_simulation [seed] [config.toml]`

use bevy::prelude::*;
use std::path::Path;

use locomotion_simulation::{
    create_headless_app, log_error, log_info, spawn_locomotion_character, JumpAnimationTimeline,
    Locomotion, LocomotionConfig, LocomotionSimulationPlugin, RandomInputDriver,
};

const TICK_COUNT: u32 = 3000;

fn main() {
    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);

    let config = match args.next() {
        Some(path) => match LocomotionConfig::from_file(Path::new(&path)) {
            Ok(config) => config,
            Err(e) => {
                locomotion_simulation::init_logger();
                log_error(&format!("{}", e));
                std::process::exit(1);
            }
        },
        None => LocomotionConfig::default(),
    };

    println!("Starting locomotion headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins(LocomotionSimulationPlugin::new(config.clone()));

    // Центр капсулы на полу (FlatGround на y = 0)
    let spawn_height = config.physics.capsule_half_height;
    let world = app.world_mut();
    let character = {
        let mut commands = world.commands();
        let entity =
            spawn_locomotion_character(&mut commands, Vec3::new(0.0, spawn_height, 0.0), &config);
        commands
            .entity(entity)
            .insert((RandomInputDriver::default(), JumpAnimationTimeline::default()));
        entity
    };
    world.flush();

    for tick in 0..TICK_COUNT {
        app.update();

        if tick % 100 == 0 {
            if let Some(locomotion) = app.world().get::<Locomotion>(character) {
                let s = locomotion.snapshot();
                log_info(&format!(
                    "Tick {}: {} / jump {} / {} (can_jump: {}, slide speed {:.1})",
                    tick,
                    s.movement_state,
                    s.jump_state,
                    s.character_state,
                    s.can_jump,
                    locomotion.slide_settings().slide_speed
                ));
            }
        }
    }

    println!("Simulation complete!");
}
