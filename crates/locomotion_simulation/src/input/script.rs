//! Random input driver (headless прогоны, демо, тесты детерминизма)
//!
//! Вместо живого input dispatcher'а генерирует LocomotionInput из
//! DeterministicRng: одинаковый seed → одинаковая последовательность.

use bevy::prelude::*;
use rand::Rng;

use crate::locomotion::{InputAction, LocomotionInput};
use crate::DeterministicRng;

/// Вероятности за тик (60Hz)
const JUMP_CHANCE: f64 = 1.0 / 90.0;
const JUMP_RELEASE_CHANCE: f64 = 1.0 / 12.0;
const SLIDE_CHANCE: f64 = 1.0 / 120.0;
const SLIDE_RELEASE_CHANCE: f64 = 1.0 / 30.0;
const STICK_CHANGE_CHANCE: f64 = 1.0 / 120.0;
const MAX_LOOK_STEP: f32 = 0.02;

/// Персонаж, управляемый случайным input
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct RandomInputDriver {
    /// Текущее положение стика (forward, right)
    pub stick: Vec2,
    pub jump_held: bool,
    pub slide_held: bool,
}

/// Система: один тик случайного input для каждого RandomInputDriver
pub fn drive_random_input(
    mut rng: ResMut<DeterministicRng>,
    mut drivers: Query<(Entity, &mut RandomInputDriver)>,
    mut inputs: EventWriter<LocomotionInput>,
) {
    for (entity, mut driver) in drivers.iter_mut() {
        let rng = &mut rng.rng;
        let mut send = |action: InputAction| {
            inputs.write(LocomotionInput { entity, action });
        };

        if driver.jump_held {
            if rng.gen_bool(JUMP_RELEASE_CHANCE) {
                driver.jump_held = false;
                send(InputAction::JumpEnded);
            }
        } else if rng.gen_bool(JUMP_CHANCE) {
            driver.jump_held = true;
            send(InputAction::JumpStarted);
        }

        if driver.slide_held {
            if rng.gen_bool(SLIDE_RELEASE_CHANCE) {
                driver.slide_held = false;
                send(InputAction::SlideEnded);
            }
        } else if rng.gen_bool(SLIDE_CHANCE) {
            driver.slide_held = true;
            send(InputAction::SlideStarted);
        }

        if rng.gen_bool(STICK_CHANGE_CHANCE) {
            // Чаще вперёд: бег нужен, чтобы слайд вообще срабатывал
            driver.stick = Vec2::new(rng.gen_range(-0.3..=1.0), rng.gen_range(-1.0..=1.0))
                .clamp_length_max(1.0);
        }
        if driver.stick != Vec2::ZERO {
            send(InputAction::Move {
                forward: driver.stick.x,
                right: driver.stick.y,
            });
        }

        send(InputAction::Look {
            yaw: rng.gen_range(-MAX_LOOK_STEP..=MAX_LOOK_STEP),
            pitch: rng.gen_range(-MAX_LOOK_STEP..=MAX_LOOK_STEP),
        });
    }
}
