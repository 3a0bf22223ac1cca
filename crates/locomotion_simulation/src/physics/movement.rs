//! Headless physics collaborator для локомоции
//!
//! Архитектура:
//! - Локомоция только ЧИТАЕТ CharacterBody и ПИШЕТ MovementIntent / PhysicsCommand
//! - Эти системы потребляют intent, интегрируют velocity и решают is_falling
//! - Rapier: RigidBody::KinematicPositionBased + коллайдер для scene queries,
//!   velocity интегрируем сами (не используем Rapier forces)
//!
//! Детерминизм: fixed timestep (config.physics.tick_hz)

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::collision::{character_groups, world_static_groups};
use super::trace::{rapier_line_trace, GroundTraceWorld, TraceHit};
use crate::components::{CharacterBody, CharacterCapsule, ControlRotation, MovementIntent};
use crate::config::{LocomotionConfig, PhysicsConfig};
use crate::locomotion::{Locomotion, PhysicsCommand};

/// Floor check дотягивается чуть ниже основания капсулы (cm)
const FLOOR_PROBE_DISTANCE: f32 = 2.4;

/// Горизонтальная скорость ниже — не поворачиваем персонажа (cm/s)
const MIN_ORIENT_SPEED: f32 = 1.0;

/// Movement component персонажа (walking / falling параметры + jump input)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct CharacterMovement {
    pub max_walk_speed: f32,
    pub max_acceleration: f32,
    pub jump_z_velocity: f32,
    pub gravity: f32,
    pub air_control: f32,
    pub braking_deceleration_walking: f32,
    pub braking_deceleration_falling: f32,
    pub rotation_rate_degrees: f32,
    /// Jump нажат, ещё не исполнен (сбрасывается прыжком или StopJumping)
    pub pending_jump: bool,
}

impl Default for CharacterMovement {
    fn default() -> Self {
        Self::from_config(&PhysicsConfig::default())
    }
}

impl CharacterMovement {
    pub fn from_config(config: &PhysicsConfig) -> Self {
        Self {
            max_walk_speed: config.max_walk_speed,
            max_acceleration: config.max_acceleration,
            jump_z_velocity: config.jump_z_velocity,
            gravity: config.gravity,
            air_control: config.air_control,
            braking_deceleration_walking: config.braking_deceleration_walking,
            braking_deceleration_falling: config.braking_deceleration_falling,
            rotation_rate_degrees: config.rotation_rate_degrees,
            pending_jump: false,
        }
    }
}

/// Сдвинуть `current` к `target` не больше чем на `max_delta`
fn approach(current: Vec2, target: Vec2, max_delta: f32) -> Vec2 {
    let delta = target - current;
    let distance = delta.length();
    if distance <= max_delta || distance <= f32::EPSILON {
        target
    } else {
        current + delta / distance * max_delta
    }
}

/// Горизонтальная скорость после одного шага (walking/falling)
pub fn step_horizontal_velocity(
    movement: &CharacterMovement,
    body: &CharacterBody,
    input: Vec3,
    delta: f32,
) -> Vec2 {
    // Input длиннее единицы (напр. slide impulse) режется до полной скорости
    let input = Vec2::new(input.x, input.z).clamp_length_max(1.0);
    let velocity = Vec2::new(body.velocity.x, body.velocity.z);

    if input.length_squared() > 0.0 {
        let acceleration = if body.is_falling {
            movement.max_acceleration * movement.air_control
        } else {
            movement.max_acceleration
        };
        approach(velocity, input * movement.max_walk_speed, acceleration * delta)
    } else {
        let braking = if body.is_falling {
            movement.braking_deceleration_falling
        } else {
            movement.braking_deceleration_walking
        };
        approach(velocity, Vec2::ZERO, braking * delta)
    }
}

/// Система: PhysicsCommand → jump input
pub fn apply_physics_commands(
    mut commands: EventReader<PhysicsCommand>,
    mut query: Query<&mut CharacterMovement>,
) {
    for command in commands.read() {
        match *command {
            PhysicsCommand::Jump { entity } => {
                if let Ok(mut movement) = query.get_mut(entity) {
                    movement.pending_jump = true;
                }
            }
            PhysicsCommand::StopJumping { entity } => {
                if let Ok(mut movement) = query.get_mut(entity) {
                    movement.pending_jump = false;
                }
            }
        }
    }
}

/// Система: movement intent → горизонтальная velocity
///
/// Intent накопленный за тик забирается целиком (accumulator обнуляется).
pub fn apply_movement_intent(
    mut query: Query<(&CharacterMovement, &mut MovementIntent, &mut CharacterBody)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (movement, mut intent, mut body) in query.iter_mut() {
        let input = intent.consume();
        let horizontal = step_horizontal_velocity(movement, &body, input, delta);
        body.velocity.x = horizontal.x;
        body.velocity.z = horizontal.y;
    }
}

/// Система: jump impulse (только с земли)
pub fn perform_jump(mut query: Query<(Entity, &mut CharacterMovement, &mut CharacterBody)>) {
    for (entity, mut movement, mut body) in query.iter_mut() {
        if !movement.pending_jump || body.is_falling {
            continue;
        }

        movement.pending_jump = false;
        body.velocity.y = movement.jump_z_velocity;
        body.is_falling = true;
        crate::log(&format!("Physics: {:?} jump impulse {:.0}", entity, movement.jump_z_velocity));
    }
}

/// Система применения gravity к velocity
pub fn apply_gravity(
    mut query: Query<(&CharacterMovement, &mut CharacterBody)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (movement, mut body) in query.iter_mut() {
        if body.is_falling {
            body.velocity.y += movement.gravity * delta;
        }
    }
}

/// Система интеграции velocity → Transform
pub fn integrate_velocity_to_transform(
    mut query: Query<(&CharacterBody, &mut Transform), With<CharacterMovement>>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (body, mut transform) in query.iter_mut() {
        transform.translation += body.velocity * delta;
    }
}

/// Floor check одного персонажа: trace от центра капсулы чуть ниже основания
///
/// Нашли пол и не летим вверх → snap на пол, is_falling = false.
fn detect_floor(
    entity: Entity,
    transform: &mut Transform,
    capsule: &CharacterCapsule,
    body: &mut CharacterBody,
    line_trace: impl Fn(Vec3, Vec3, Entity) -> Option<TraceHit>,
) {
    let up = transform.up().as_vec3();
    let start = transform.translation;
    let end = capsule.base_point(transform) - up * FLOOR_PROBE_DISTANCE;

    match line_trace(start, end, entity) {
        Some(floor) if body.velocity.y <= 0.0 => {
            transform.translation = floor.point + up * capsule.half_height;
            body.velocity.y = 0.0;
            body.is_falling = false;
        }
        _ => body.is_falling = true,
    }
}

/// Система ground detection через GroundTraceWorld resource
pub fn ground_detection(
    trace_world: Option<Res<GroundTraceWorld>>,
    mut query: Query<(Entity, &mut Transform, &CharacterCapsule, &mut CharacterBody), With<CharacterMovement>>,
) {
    let Some(trace_world) = trace_world else {
        return;
    };

    for (entity, mut transform, capsule, mut body) in query.iter_mut() {
        detect_floor(entity, &mut transform, capsule, &mut body, |start, end, ignore| {
            trace_world.line_trace(start, end, ignore)
        });
    }
}

/// Система ground detection через Rapier query pipeline (тот же мир, что и у probe)
pub fn ground_detection_rapier(
    rapier: ReadRapierContext,
    mut query: Query<(Entity, &mut Transform, &CharacterCapsule, &mut CharacterBody), With<CharacterMovement>>,
) {
    let Ok(context) = rapier.single() else {
        return;
    };

    for (entity, mut transform, capsule, mut body) in query.iter_mut() {
        detect_floor(entity, &mut transform, capsule, &mut body, |start, end, ignore| {
            rapier_line_trace(&context, start, end, ignore)
        });
    }
}

/// Система: orient rotation to movement (yaw к горизонтальной velocity)
pub fn orient_rotation_to_movement(
    mut query: Query<(&CharacterMovement, &CharacterBody, &mut Transform)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (movement, body, mut transform) in query.iter_mut() {
        let horizontal = Vec2::new(body.velocity.x, body.velocity.z);
        if horizontal.length() < MIN_ORIENT_SPEED {
            continue;
        }

        // forward = -Z, yaw θ даёт forward = (-sin θ, 0, -cos θ)
        let target = Quat::from_rotation_y(f32::atan2(-horizontal.x, -horizontal.y));
        let max_angle = movement.rotation_rate_degrees.to_radians() * delta;
        let angle = transform.rotation.angle_between(target);

        transform.rotation = if angle <= max_angle {
            target
        } else {
            transform.rotation.slerp(target, max_angle / angle)
        };
    }
}

/// Система: синхронизация нашей velocity с Rapier (kinematic body)
pub fn sync_velocity_to_rapier(
    mut query: Query<(&CharacterBody, &mut Velocity), With<CharacterMovement>>,
) {
    for (body, mut rapier_velocity) in query.iter_mut() {
        rapier_velocity.linvel = body.velocity;
    }
}

/// Spawn helper: полный набор компонентов locomotion персонажа
///
/// - Transform (центр капсулы)
/// - Locomotion (+ required: GroundSpeed, MovementIntent, ControlRotation, ReportedLocomotion)
/// - CharacterBody / CharacterCapsule / CharacterMovement
/// - Rapier: RigidBody + Collider (capsule) + Velocity + collision groups
pub fn spawn_locomotion_character(
    commands: &mut Commands,
    position: Vec3,
    config: &LocomotionConfig,
) -> Entity {
    let capsule = CharacterCapsule {
        radius: config.physics.capsule_radius,
        half_height: config.physics.capsule_half_height,
    };

    commands
        .spawn((
            Transform::from_translation(position),
            Locomotion::new(config),
            ControlRotation::default(),
            CharacterBody::default(),
            capsule,
            CharacterMovement::from_config(&config.physics),
            // Rapier physics (цилиндрическая часть = half_height - radius)
            RigidBody::KinematicPositionBased,
            Collider::capsule_y((capsule.half_height - capsule.radius).max(0.0), capsule.radius),
            Velocity::default(),
            character_groups(),
        ))
        .id()
}

/// Spawn helper: статический пол/платформа уровня (Rapier cuboid, world static канал)
pub fn spawn_static_ground(commands: &mut Commands, center: Vec3, half_extents: Vec3) -> Entity {
    commands
        .spawn((
            Transform::from_translation(center),
            RigidBody::Fixed,
            Collider::cuboid(half_extents.x, half_extents.y, half_extents.z),
            world_static_groups(),
        ))
        .id()
}
