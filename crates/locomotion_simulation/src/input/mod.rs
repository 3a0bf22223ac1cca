//! Input intent translator
//!
//! Обрабатывает LocomotionInput / AnimationNotify и превращает их в guarded
//! запросы к state machine + movement intents / physics commands.
//!
//! # Архитектура
//!
//! ```text
//! Input dispatcher (jump/slide/move/look)
//!     ↓
//! LocomotionInput (ECS event)
//!     ↓
//! process_locomotion_input — guard'ы Locomotion
//!     ↓
//! MovementIntent / ControlRotation / PhysicsCommand
//! ```
//!
//! script: RandomInputDriver (seeded input для headless прогонов)

pub mod script;
pub mod systems;

#[cfg(test)]
mod systems_tests;

pub use script::{drive_random_input, RandomInputDriver};
pub use systems::*;
