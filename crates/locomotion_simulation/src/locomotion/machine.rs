//! Locomotion state machine: три связанных FSM (movement / jump / character).
//!
//! Все переходы идут через `transition_*` — guard'ы и побочные эффекты на
//! соседние измерения живут только здесь. Rejected переход = чистый no-op
//! (кроме slide cancel), вызывающий смотрит на возвращённый bool.

use bevy::prelude::*;

use crate::components::{
    CharacterState, ControlRotation, GroundSpeed, JumpSettings, JumpState, MovementIntent,
    MovementState, SlideSettings,
};
use crate::config::LocomotionConfig;

/// Агрегат состояния локомоции персонажа
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(GroundSpeed, MovementIntent, ControlRotation, ReportedLocomotion)]
pub struct Locomotion {
    movement_state: MovementState,
    jump_state: JumpState,
    character_state: CharacterState,
    jump: JumpSettings,
    slide: SlideSettings,
    /// ground speed > порога → Running
    run_speed_threshold: f32,
    /// JumpState::Start + velocity.y ниже → move input заблокирован
    liftoff_velocity_z: f32,
}

/// Плоский снимок трёх состояний + latch (для events/логов/тестов)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocomotionSnapshot {
    pub movement_state: MovementState,
    pub jump_state: JumpState,
    pub character_state: CharacterState,
    pub can_jump: bool,
}

impl Default for LocomotionSnapshot {
    /// Состояние только что созданного персонажа
    fn default() -> Self {
        Self {
            movement_state: MovementState::None,
            jump_state: JumpState::None,
            character_state: CharacterState::None,
            can_jump: true,
        }
    }
}

/// Последний снимок, о котором уже отправлен LocomotionStateChanged
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct ReportedLocomotion(pub LocomotionSnapshot);

impl Default for Locomotion {
    fn default() -> Self {
        Self::new(&LocomotionConfig::default())
    }
}

impl Locomotion {
    pub fn new(config: &LocomotionConfig) -> Self {
        Self {
            movement_state: MovementState::None,
            jump_state: JumpState::None,
            character_state: CharacterState::None,
            jump: JumpSettings::from_config(&config.jump),
            slide: SlideSettings::from_config(&config.slide),
            run_speed_threshold: config.movement.run_speed_threshold,
            liftoff_velocity_z: config.movement.liftoff_velocity_z,
        }
    }

    pub fn movement_state(&self) -> MovementState {
        self.movement_state
    }

    pub fn jump_state(&self) -> JumpState {
        self.jump_state
    }

    pub fn character_state(&self) -> CharacterState {
        self.character_state
    }

    pub fn can_jump(&self) -> bool {
        self.jump.can_jump
    }

    pub fn jump_settings(&self) -> &JumpSettings {
        &self.jump
    }

    pub fn slide_settings(&self) -> &SlideSettings {
        &self.slide
    }

    pub fn is_sliding(&self) -> bool {
        self.character_state == CharacterState::Sliding
    }

    pub fn snapshot(&self) -> LocomotionSnapshot {
        LocomotionSnapshot {
            movement_state: self.movement_state,
            jump_state: self.jump_state,
            character_state: self.character_state,
            can_jump: self.jump.can_jump,
        }
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    /// Movement transition — всегда успешна.
    ///
    /// InAir → Grounded сбрасывает JumpState в None, кроме LandHigh
    /// (high landing анимация доигрывает и чистится через anim ended hook).
    pub fn transition_movement_state(&mut self, new_state: MovementState) -> bool {
        let landing = self.movement_state == MovementState::InAir
            && new_state == MovementState::Grounded;
        if landing && self.jump_state != JumpState::LandHigh {
            self.transition_jump_state(JumpState::None);
        }

        if self.movement_state != new_state {
            crate::log(&format!(
                "Locomotion: movement {} → {}",
                self.movement_state, new_state
            ));
        }
        self.movement_state = new_state;
        true
    }

    /// Character transition. Guard: в Sliding только из Running при JumpState::None.
    pub fn transition_character_state(&mut self, new_state: CharacterState) -> bool {
        if new_state == CharacterState::Sliding {
            if self.character_state != CharacterState::Running {
                crate::log(&format!(
                    "Locomotion: slide rejected (character state {})",
                    self.character_state
                ));
                return false;
            }
            if self.jump_state != JumpState::None {
                crate::log(&format!(
                    "Locomotion: slide rejected (jump state {})",
                    self.jump_state
                ));
                return false;
            }
        }

        if self.character_state != new_state {
            crate::log(&format!(
                "Locomotion: character {} → {}",
                self.character_state, new_state
            ));
        }
        self.character_state = new_state;
        true
    }

    /// Jump transition. Guard: во время слайда отклоняется И завершает слайд.
    ///
    /// can_jump закрыт ровно в Start/Loop: любой принятый переход в другую
    /// фазу (приземление, None) открывает latch.
    pub fn transition_jump_state(&mut self, new_state: JumpState) -> bool {
        if self.character_state == CharacterState::Sliding {
            crate::log(&format!(
                "Locomotion: jump {} rejected while sliding, slide cancelled",
                new_state
            ));
            self.character_state = CharacterState::None;
            return false;
        }

        if self.jump_state != new_state {
            crate::log(&format!(
                "Locomotion: jump {} → {}",
                self.jump_state, new_state
            ));
        }
        self.jump.can_jump = !new_state.holds_jump_latch();
        self.jump_state = new_state;
        true
    }

    // ------------------------------------------------------------------
    // Per-tick updates
    // ------------------------------------------------------------------

    /// Вызывается каждый тик, даже если состояние не меняется
    pub fn update_movement_state(&mut self, is_falling: bool) {
        if is_falling {
            self.transition_movement_state(MovementState::InAir);
        } else {
            self.transition_movement_state(MovementState::Grounded);
        }
    }

    /// Классификация по ground speed (вызывать только на земле).
    ///
    /// Слайд замораживает классификацию до своего окончания.
    pub fn update_character_state(&mut self, ground_speed: f32) {
        if self.is_sliding() {
            return;
        }

        let classified = if ground_speed > self.run_speed_threshold {
            CharacterState::Running
        } else if ground_speed > 0.0 {
            CharacterState::Walking
        } else {
            CharacterState::None
        };

        // Running/Walking/None guard'ов не имеют — пишем напрямую
        if self.character_state != classified {
            crate::log(&format!(
                "Locomotion: character {} → {} (ground speed {:.1})",
                self.character_state, classified, ground_speed
            ));
        }
        self.character_state = classified;
    }

    /// High landing probe нужен: в воздухе, падаем быстрее порога, LandHigh ещё не выставлен
    pub fn wants_ground_probe(&self, vertical_velocity: f32) -> bool {
        self.movement_state == MovementState::InAir
            && vertical_velocity < self.jump.high_min_jump_velocity_z
            && self.jump_state != JumpState::LandHigh
    }

    /// Слайд за тик: либо заканчивается (обе скорости ниже порога),
    /// либо затухает и возвращает вклад в movement intent.
    pub fn tick_slide(&mut self, ground_speed: f32) -> Option<Vec3> {
        if !self.is_sliding() {
            return None;
        }

        if self.slide.is_exhausted(ground_speed) {
            self.transition_character_state(CharacterState::None);
            return None;
        }

        self.slide.decelerate();
        Some(self.slide.impulse())
    }

    // ------------------------------------------------------------------
    // Input requests
    // ------------------------------------------------------------------

    /// Jump start: только при открытом latch, latch закрывается только если переход принят
    pub fn request_jump_start(&mut self) -> bool {
        if !self.jump.can_jump {
            crate::log("Locomotion: jump start dropped (can_jump latched)");
            return false;
        }

        if self.transition_jump_state(JumpState::Start) {
            self.jump.can_jump = false;
            true
        } else {
            false
        }
    }

    /// Slide start: guard'ы в transition_character_state; при успехе фиксируем скорость и направление
    pub fn request_slide_start(&mut self, forward: Vec3) -> bool {
        if !self.transition_character_state(CharacterState::Sliding) {
            return false;
        }
        self.slide.begin(forward);
        true
    }

    /// Slide end ничего не делает: слайд заканчивается только затуханием в `tick_slide`
    pub fn request_slide_end(&mut self) {
        if self.is_sliding() {
            crate::log(&format!(
                "Locomotion: slide end ignored (slide speed {:.1}, decays on its own)",
                self.slide.slide_speed
            ));
        }
    }

    /// Move input разрешён? (LandHigh, ещё не оторвались от земли, слайд — нет)
    pub fn accepts_move_input(&self, vertical_velocity: f32) -> bool {
        match self.jump_state {
            JumpState::LandHigh => return false,
            JumpState::Start if vertical_velocity < self.liftoff_velocity_z => return false,
            _ => {}
        }
        !self.is_sliding()
    }

    // ------------------------------------------------------------------
    // Animation hooks
    // ------------------------------------------------------------------

    /// Jump/land анимация закончилась: latch открыт, JumpState принудительно None
    pub fn on_jump_anim_ended(&mut self) {
        if self.jump_state != JumpState::None {
            crate::log(&format!(
                "Locomotion: jump anim ended ({} → None)",
                self.jump_state
            ));
        }
        self.jump.can_jump = true;
        self.jump_state = JumpState::None;
    }
}
