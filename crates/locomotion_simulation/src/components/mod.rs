//! ECS компоненты локомоции
//!
//! Организация:
//! - state: MovementState, JumpState, CharacterState
//! - settings: JumpSettings, SlideSettings
//! - body: physics-facing компоненты (CharacterBody, MovementIntent, ControlRotation, ...)

pub mod state;
pub mod settings;
pub mod body;

pub use state::*;
pub use settings::*;
pub use body::*;
