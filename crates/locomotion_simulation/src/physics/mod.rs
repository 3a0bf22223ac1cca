//! Physics collaborator module
//!
//! - collision: Rapier collision groups (trace channel)
//! - trace: line trace backends для ground probe
//! - movement: headless kinematic movement (gravity, jump, floor, orient)

use bevy::prelude::*;

pub mod collision;
pub mod movement;
pub mod trace;

pub use movement::{spawn_locomotion_character, spawn_static_ground, CharacterMovement};
pub use trace::{rapier_line_trace, FlatGround, GroundTrace, GroundTraceWorld, TraceHit};

use crate::locomotion::{GroundTraceBackend, LocomotionSet};

/// Plugin для headless physics collaborator
///
/// Системы в LocomotionSet::Physics — после того как state machine
/// выдала movement intents этого тика. Floor check использует тот же
/// collision backend, что и high landing probe.
#[derive(Default)]
pub struct HeadlessPhysicsPlugin {
    pub ground_trace: GroundTraceBackend,
}

impl Plugin for HeadlessPhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<CharacterMovement>();

        let integrate = (
            movement::apply_physics_commands,
            movement::apply_movement_intent,
            movement::perform_jump,
            movement::apply_gravity,
            movement::integrate_velocity_to_transform,
        )
            .chain();
        let finish = (
            movement::orient_rotation_to_movement,
            movement::sync_velocity_to_rapier,
        )
            .chain();

        match self.ground_trace {
            GroundTraceBackend::World => {
                app.init_resource::<GroundTraceWorld>();
                app.add_systems(
                    FixedUpdate,
                    (integrate, movement::ground_detection, finish)
                        .chain()
                        .in_set(LocomotionSet::Physics),
                );
            }
            GroundTraceBackend::Rapier => {
                app.add_systems(
                    FixedUpdate,
                    (integrate, movement::ground_detection_rapier, finish)
                        .chain()
                        .in_set(LocomotionSet::Physics),
                );
            }
        }
    }
}
