//! Tests for input intent translation.

#[cfg(test)]
mod tests {
    use super::super::systems::apply_input_action;
    use crate::components::{CharacterBody, CharacterState, ControlRotation, JumpState, MovementIntent};
    use crate::config::LocomotionConfig;
    use crate::locomotion::{InputAction, Locomotion, PhysicsCommand};
    use bevy::prelude::*;

    struct Rig {
        entity: Entity,
        locomotion: Locomotion,
        body: CharacterBody,
        transform: Transform,
        intent: MovementIntent,
        rotation: ControlRotation,
        config: LocomotionConfig,
    }

    impl Rig {
        fn grounded() -> Self {
            let mut locomotion = Locomotion::default();
            locomotion.update_movement_state(false);
            Self {
                entity: Entity::from_raw(7),
                locomotion,
                body: CharacterBody::default(),
                transform: Transform::default(),
                intent: MovementIntent::default(),
                rotation: ControlRotation::default(),
                config: LocomotionConfig::default(),
            }
        }

        fn send(&mut self, action: InputAction) -> Option<PhysicsCommand> {
            apply_input_action(
                self.entity,
                action,
                &mut self.locomotion,
                &self.body,
                &self.transform,
                &mut self.intent,
                &mut self.rotation,
                &self.config,
            )
        }
    }

    #[test]
    fn test_move_adds_camera_relative_intent() {
        let mut rig = Rig::grounded();
        rig.send(InputAction::Move { forward: 1.0, right: 0.5 });

        // yaw = 0: forward = -Z, right = +X
        assert!((rig.intent.consume() - Vec3::new(0.5, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_move_uses_yaw_only() {
        let mut rig = Rig::grounded();
        rig.rotation.add_pitch_input(0.8, 89.0);
        rig.send(InputAction::Move { forward: 1.0, right: 0.0 });

        let intent = rig.intent.consume();
        assert_eq!(intent.y, 0.0);
        assert!((intent - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn test_move_dropped_before_liftoff() {
        let mut rig = Rig::grounded();
        rig.send(InputAction::JumpStarted);
        assert_eq!(rig.locomotion.jump_state(), JumpState::Start);

        rig.body.velocity.y = 0.0;
        rig.send(InputAction::Move { forward: 1.0, right: 0.0 });
        assert!(rig.intent.is_empty());

        // Оторвались от земли — движение снова принимается
        rig.body.velocity.y = 650.0;
        rig.send(InputAction::Move { forward: 1.0, right: 0.0 });
        assert!(!rig.intent.is_empty());
    }

    #[test]
    fn test_move_dropped_during_high_landing() {
        let mut rig = Rig::grounded();
        assert!(rig.locomotion.transition_jump_state(JumpState::LandHigh));

        rig.send(InputAction::Move { forward: 1.0, right: 1.0 });
        assert!(rig.intent.is_empty());
    }

    #[test]
    fn test_move_dropped_while_sliding() {
        let mut rig = Rig::grounded();
        rig.locomotion.update_character_state(300.0);
        rig.send(InputAction::SlideStarted);
        assert_eq!(rig.locomotion.character_state(), CharacterState::Sliding);

        rig.send(InputAction::Move { forward: 1.0, right: 0.0 });
        assert!(rig.intent.is_empty());
    }

    #[test]
    fn test_slide_captures_character_forward() {
        let mut rig = Rig::grounded();
        rig.transform = Transform::default().looking_to(Vec3::X, Vec3::Y);
        rig.locomotion.update_character_state(300.0);

        rig.send(InputAction::SlideStarted);

        let slide = rig.locomotion.slide_settings();
        assert_eq!(slide.slide_speed, 1000.0);
        assert!((slide.slide_direction - Vec3::X).length() < 1e-5);

        // Поворот после старта не меняет направление слайда
        rig.transform = Transform::default().looking_to(Vec3::Z, Vec3::Y);
        rig.send(InputAction::SlideEnded);
        assert!((rig.locomotion.slide_settings().slide_direction - Vec3::X).length() < 1e-5);
        assert_eq!(rig.locomotion.character_state(), CharacterState::Sliding);
    }

    #[test]
    fn test_slide_start_while_walking_fails() {
        let mut rig = Rig::grounded();
        rig.locomotion.update_character_state(100.0);

        rig.send(InputAction::SlideStarted);
        assert_eq!(rig.locomotion.character_state(), CharacterState::Walking);
    }

    #[test]
    fn test_jump_end_only_stops_physics_jump() {
        let mut rig = Rig::grounded();
        rig.send(InputAction::JumpStarted);

        let command = rig.send(InputAction::JumpEnded);
        assert_eq!(command, Some(PhysicsCommand::StopJumping { entity: rig.entity }));
        assert_eq!(rig.locomotion.jump_state(), JumpState::Start);
        assert!(!rig.locomotion.can_jump());
    }

    #[test]
    fn test_jump_while_sliding_cancels_slide() {
        let mut rig = Rig::grounded();
        rig.locomotion.update_character_state(300.0);
        rig.send(InputAction::SlideStarted);

        assert_eq!(rig.send(InputAction::JumpStarted), None);
        assert_eq!(rig.locomotion.character_state(), CharacterState::None);
        assert_eq!(rig.locomotion.jump_state(), JumpState::None);
        assert!(rig.locomotion.can_jump());
    }

    #[test]
    fn test_look_always_forwarded() {
        let mut rig = Rig::grounded();
        assert!(rig.locomotion.transition_jump_state(JumpState::LandHigh));

        rig.send(InputAction::Look { yaw: 0.25, pitch: -0.1 });
        assert!((rig.rotation.yaw - 0.25).abs() < 1e-6);
        assert!((rig.rotation.pitch + 0.1).abs() < 1e-6);
    }
}
