//! Per-tick locomotion systems (FixedUpdate, LocomotionSet::Tick)
//!
//! Порядок (chain):
//! 1. sample_ground_speed — горизонтальная скорость из CharacterBody
//! 2. update_movement_state — is_falling → Grounded/InAir
//! 3. probe_high_landing — ground trace в воздухе (resource или Rapier backend)
//! 4. update_character_state — классификация по скорости (только на земле)
//! 5. integrate_slide — затухание слайда + movement intent
//! 6. report_state_changes — LocomotionStateChanged для animation

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::events::LocomotionStateChanged;
use super::machine::{Locomotion, ReportedLocomotion};
use crate::components::{CharacterBody, CharacterCapsule, GroundSpeed, JumpState, MovementIntent, MovementState};
use crate::physics::{rapier_line_trace, GroundTraceWorld, TraceHit};

/// Система: ground speed = |velocity.xz|, пересчёт каждый тик
pub fn sample_ground_speed(mut query: Query<(&CharacterBody, &mut GroundSpeed)>) {
    for (body, mut ground_speed) in query.iter_mut() {
        ground_speed.0 = body.ground_speed();
    }
}

/// Система: movement state из is_falling (каждый тик, даже без изменений)
pub fn update_movement_state(mut query: Query<(&CharacterBody, &mut Locomotion)>) {
    for (body, mut locomotion) in query.iter_mut() {
        locomotion.update_movement_state(body.is_falling);
    }
}

/// Общая логика probe: условия → trace от основания капсулы вниз → LandHigh при попадании
fn probe_character(
    entity: Entity,
    transform: &Transform,
    capsule: &CharacterCapsule,
    body: &CharacterBody,
    locomotion: &mut Locomotion,
    line_trace: impl Fn(Vec3, Vec3, Entity) -> Option<TraceHit>,
) {
    if !locomotion.wants_ground_probe(body.velocity.y) {
        return;
    }

    let down = -transform.up().as_vec3();
    let start = capsule.base_point(transform);
    let end = start + down * locomotion.jump_settings().jump_ground_trace_length;

    // Нет попадания → ничего, повторим на следующем тике
    let Some(hit) = line_trace(start, end, entity) else {
        return;
    };

    crate::log(&format!(
        "Locomotion: {:?} high landing imminent (vz {:.0}, ground {:.1} below)",
        entity, body.velocity.y, hit.distance
    ));
    locomotion.transition_jump_state(JumpState::LandHigh);
}

/// Система: high landing probe через GroundTraceWorld resource
pub fn probe_high_landing(
    trace_world: Option<Res<GroundTraceWorld>>,
    mut query: Query<(Entity, &Transform, &CharacterCapsule, &CharacterBody, &mut Locomotion)>,
) {
    let Some(trace_world) = trace_world else {
        return;
    };

    for (entity, transform, capsule, body, mut locomotion) in query.iter_mut() {
        probe_character(
            entity,
            transform,
            capsule,
            body,
            &mut locomotion,
            |start, end, ignore| trace_world.line_trace(start, end, ignore),
        );
    }
}

/// Система: high landing probe через Rapier query pipeline
pub fn probe_high_landing_rapier(
    rapier: ReadRapierContext,
    mut query: Query<(Entity, &Transform, &CharacterCapsule, &CharacterBody, &mut Locomotion)>,
) {
    let Ok(context) = rapier.single() else {
        return;
    };

    for (entity, transform, capsule, body, mut locomotion) in query.iter_mut() {
        probe_character(
            entity,
            transform,
            capsule,
            body,
            &mut locomotion,
            |start, end, ignore| rapier_line_trace(&context, start, end, ignore),
        );
    }
}

/// Система: классификация character state (только Grounded)
pub fn update_character_state(mut query: Query<(&GroundSpeed, &mut Locomotion)>) {
    for (ground_speed, mut locomotion) in query.iter_mut() {
        if locomotion.movement_state() != MovementState::Grounded {
            continue;
        }
        locomotion.update_character_state(ground_speed.0);
    }
}

/// Система: slide integration (каждый тик пока Sliding)
pub fn integrate_slide(mut query: Query<(&GroundSpeed, &mut Locomotion, &mut MovementIntent)>) {
    for (ground_speed, mut locomotion, mut intent) in query.iter_mut() {
        if !locomotion.is_sliding() {
            continue;
        }

        if let Some(impulse) = locomotion.tick_slide(ground_speed.0) {
            intent.add(impulse, 1.0);
        } else {
            crate::log_info("Locomotion: slide finished");
        }
    }
}

/// Система: LocomotionStateChanged при любом изменении снимка
pub fn report_state_changes(
    mut query: Query<(Entity, &Locomotion, &mut ReportedLocomotion)>,
    mut changes: EventWriter<LocomotionStateChanged>,
) {
    for (entity, locomotion, mut reported) in query.iter_mut() {
        let current = locomotion.snapshot();
        if current == reported.0 {
            continue;
        }

        changes.write(LocomotionStateChanged {
            entity,
            previous: reported.0,
            current,
        });
        reported.0 = current;
    }
}
