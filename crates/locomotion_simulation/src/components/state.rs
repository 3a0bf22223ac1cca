//! Три дискретных измерения локомоции: movement / jump / character.
//!
//! Animation и gameplay читают их как есть, поэтому debug-имена стабильны.

use bevy::prelude::*;

/// Контакт с землёй (пишется только physics sampler'ом каждый тик)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub enum MovementState {
    /// Sentinel до первого тика — после него не встречается
    #[default]
    None,
    Grounded,
    InAir,
}

impl MovementState {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementState::None => "None",
            MovementState::Grounded => "Grounded",
            MovementState::InAir => "InAir",
        }
    }
}

/// Фаза прыжка (ведёт jump animation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub enum JumpState {
    #[default]
    None,
    Start,
    Loop,
    /// Приземление с небольшой высоты
    LandLow,
    /// Жёсткое приземление (ground trace сработал на большой вертикальной скорости)
    LandHigh,
}

impl JumpState {
    pub fn as_str(&self) -> &'static str {
        match self {
            JumpState::None => "None",
            JumpState::Start => "Start",
            JumpState::Loop => "Loop",
            JumpState::LandLow => "LandLow",
            JumpState::LandHigh => "LandHigh",
        }
    }

    /// Start/Loop — прыжок "в полёте": can_jump latch закрыт
    pub fn holds_jump_latch(&self) -> bool {
        matches!(self, JumpState::Start | JumpState::Loop)
    }
}

/// Gameplay-состояние персонажа на земле
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub enum CharacterState {
    /// Стоим (или в воздухе после прыжка с места)
    #[default]
    None,
    Walking,
    Running,
    /// Только внешний crouch input; speed classification его не выбирает
    Crouching,
    Sliding,
}

impl CharacterState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CharacterState::None => "None",
            CharacterState::Walking => "Walking",
            CharacterState::Running => "Running",
            CharacterState::Crouching => "Crouching",
            CharacterState::Sliding => "Sliding",
        }
    }
}

impl std::fmt::Display for MovementState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for JumpState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for CharacterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_none() {
        assert_eq!(MovementState::default(), MovementState::None);
        assert_eq!(JumpState::default(), JumpState::None);
        assert_eq!(CharacterState::default(), CharacterState::None);
    }

    #[test]
    fn test_debug_names() {
        assert_eq!(MovementState::InAir.as_str(), "InAir");
        assert_eq!(JumpState::LandHigh.to_string(), "LandHigh");
        assert_eq!(CharacterState::Sliding.to_string(), "Sliding");
    }

    #[test]
    fn test_jump_latch_phases() {
        assert!(JumpState::Start.holds_jump_latch());
        assert!(JumpState::Loop.holds_jump_latch());
        assert!(!JumpState::None.holds_jump_latch());
        assert!(!JumpState::LandLow.holds_jump_latch());
        assert!(!JumpState::LandHigh.holds_jump_latch());
    }
}
