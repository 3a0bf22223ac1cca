//! Input systems (ECS)
//!
//! События приходят асинхронно относительно тика, но читаются здесь —
//! в LocomotionSet::Input, до state machine и physics.

use bevy::prelude::*;

use crate::components::{CharacterBody, ControlRotation, MovementIntent};
use crate::config::LocomotionConfig;
use crate::locomotion::{AnimationNotify, InputAction, Locomotion, LocomotionInput, PhysicsCommand};

/// Применить одно input действие к персонажу.
///
/// Вынесено из системы, чтобы guard'ы тестировались без App.
#[allow(clippy::too_many_arguments)]
pub fn apply_input_action(
    entity: Entity,
    action: InputAction,
    locomotion: &mut Locomotion,
    body: &CharacterBody,
    transform: &Transform,
    intent: &mut MovementIntent,
    rotation: &mut ControlRotation,
    config: &LocomotionConfig,
) -> Option<PhysicsCommand> {
    match action {
        InputAction::JumpStarted => {
            locomotion.request_jump_start();
            None
        }
        // JumpState не трогаем — только отпускаем прыжок в physics
        InputAction::JumpEnded => Some(PhysicsCommand::StopJumping { entity }),
        InputAction::SlideStarted => {
            locomotion.request_slide_start(transform.forward().as_vec3());
            None
        }
        InputAction::SlideEnded => {
            locomotion.request_slide_end();
            None
        }
        InputAction::Move { forward, right } => {
            if locomotion.accepts_move_input(body.velocity.y) {
                intent.add(rotation.forward(), forward);
                intent.add(rotation.right(), right);
            }
            None
        }
        InputAction::Look { yaw, pitch } => {
            rotation.add_yaw_input(yaw);
            rotation.add_pitch_input(pitch, config.look.pitch_limit_degrees);
            None
        }
    }
}

/// Система: LocomotionInput → state machine requests / movement intent
pub fn process_locomotion_input(
    mut inputs: EventReader<LocomotionInput>,
    mut physics_commands: EventWriter<PhysicsCommand>,
    config: Res<LocomotionConfig>,
    mut characters: Query<(
        &mut Locomotion,
        &CharacterBody,
        &Transform,
        &mut MovementIntent,
        &mut ControlRotation,
    )>,
) {
    for input in inputs.read() {
        let Ok((mut locomotion, body, transform, mut intent, mut rotation)) =
            characters.get_mut(input.entity)
        else {
            crate::log_warning(&format!(
                "Locomotion input for {:?} dropped: no locomotion character",
                input.entity
            ));
            continue;
        };

        if let Some(command) = apply_input_action(
            input.entity,
            input.action,
            &mut locomotion,
            body,
            transform,
            &mut intent,
            &mut rotation,
            &config,
        ) {
            physics_commands.write(command);
        }
    }
}

/// Система: animation notify hooks
///
/// - JumpAnimStarted → physics jump impulse
/// - JumpAnimEnded → can_jump = true, JumpState → None
pub fn process_animation_notifies(
    mut notifies: EventReader<AnimationNotify>,
    mut physics_commands: EventWriter<PhysicsCommand>,
    mut characters: Query<&mut Locomotion>,
) {
    for notify in notifies.read() {
        match *notify {
            AnimationNotify::JumpAnimStarted { entity } => {
                physics_commands.write(PhysicsCommand::Jump { entity });
            }
            AnimationNotify::JumpAnimEnded { entity } => {
                let Ok(mut locomotion) = characters.get_mut(entity) else {
                    continue;
                };
                locomotion.on_jump_anim_ended();
            }
        }
    }
}
