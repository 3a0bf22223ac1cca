//! Locomotion domain — state machine персонажа
//!
//! Содержит:
//! - Locomotion (movement / jump / character FSM + jump/slide settings)
//! - per-tick системы (physics sampling, ground probe, slide integration)
//! - события: LocomotionInput, AnimationNotify, PhysicsCommand, LocomotionStateChanged
//!
//! Архитектура:
//! ```text
//! Input dispatcher ─ LocomotionInput ─┐
//! Animation graph ── AnimationNotify ─┤→ LocomotionSet::Input
//!                                     ↓
//!                          LocomotionSet::Tick (sample → FSM → probe → slide)
//!                                     ↓
//!            MovementIntent + PhysicsCommand → LocomotionSet::Physics
//! ```

use bevy::prelude::*;

pub mod events;
pub mod machine;
pub mod systems;


pub use events::*;
pub use machine::{Locomotion, LocomotionSnapshot, ReportedLocomotion};

use crate::config::LocomotionConfig;
use crate::physics::GroundTraceWorld;

/// Фазы тика (выполняются строго последовательно)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum LocomotionSet {
    /// Input + animation notifies (асинхронные события, собранные на тиковом потоке)
    Input,
    /// Physics sampling + state machine
    Tick,
    /// Physics collaborator потребляет movement intents
    Physics,
}

/// Чем отвечать на ground trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroundTraceBackend {
    /// `GroundTraceWorld` resource (headless, тесты)
    #[default]
    World,
    /// Rapier query pipeline (нужен RapierPhysicsPlugin)
    Rapier,
}

/// Locomotion Plugin
///
/// Регистрирует события и state machine системы в FixedUpdate.
pub struct LocomotionPlugin {
    pub ground_trace: GroundTraceBackend,
}

impl Default for LocomotionPlugin {
    fn default() -> Self {
        Self {
            ground_trace: GroundTraceBackend::World,
        }
    }
}

impl Plugin for LocomotionPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<LocomotionInput>()
            .add_event::<AnimationNotify>()
            .add_event::<PhysicsCommand>()
            .add_event::<LocomotionStateChanged>()
            .register_type::<Locomotion>()
            .init_resource::<LocomotionConfig>();

        if self.ground_trace == GroundTraceBackend::World {
            app.init_resource::<GroundTraceWorld>();
        }

        app.configure_sets(
            FixedUpdate,
            (LocomotionSet::Input, LocomotionSet::Tick, LocomotionSet::Physics).chain(),
        );

        app.add_systems(
            FixedUpdate,
            (
                crate::input::process_animation_notifies,
                crate::input::process_locomotion_input,
            )
                .chain()
                .in_set(LocomotionSet::Input),
        );

        let tick_head = (systems::sample_ground_speed, systems::update_movement_state).chain();
        let tick_tail = (
            systems::update_character_state,
            systems::integrate_slide,
            systems::report_state_changes,
        )
            .chain();

        match self.ground_trace {
            GroundTraceBackend::World => {
                app.add_systems(
                    FixedUpdate,
                    (tick_head, systems::probe_high_landing, tick_tail)
                        .chain()
                        .in_set(LocomotionSet::Tick),
                );
            }
            GroundTraceBackend::Rapier => {
                app.add_systems(
                    FixedUpdate,
                    (tick_head, systems::probe_high_landing_rapier, tick_tail)
                        .chain()
                        .in_set(LocomotionSet::Tick),
                );
            }
        }
    }
}
