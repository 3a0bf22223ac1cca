//! Locomotion events
//!
//! Входы (от input dispatcher / animation) и выходы (physics commands,
//! уведомления для animation graph).

use bevy::prelude::*;

use super::machine::LocomotionSnapshot;

/// Input dispatcher → локомоция (уже на тиковом потоке)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct LocomotionInput {
    pub entity: Entity,
    pub action: InputAction,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputAction {
    JumpStarted,
    JumpEnded,
    SlideStarted,
    /// Слайд заканчивается затуханием, событие принимается но ничего не меняет
    SlideEnded,
    /// Нормализованные оси: forward (+вперёд), right (+вправо)
    Move { forward: f32, right: f32 },
    /// Радианы за событие
    Look { yaw: f32, pitch: f32 },
}

/// Animation graph → локомоция (anim notify callbacks)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationNotify {
    /// Notify в jump start анимации: пора дать physics импульс
    JumpAnimStarted { entity: Entity },
    /// Jump/land анимация доиграла
    JumpAnimEnded { entity: Entity },
}

/// Локомоция → physics collaborator
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicsCommand {
    Jump { entity: Entity },
    StopJumping { entity: Entity },
}

/// Любое наблюдаемое изменение состояний за тик (для animation/gameplay)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct LocomotionStateChanged {
    pub entity: Entity,
    pub previous: LocomotionSnapshot,
    pub current: LocomotionSnapshot,
}
