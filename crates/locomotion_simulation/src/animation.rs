//! Headless stand-in для animation graph
//!
//! Настоящий animation graph шлёт AnimationNotify из anim notifies.
//! В headless прогонах этот timeline делает то же по тикам:
//! - JumpState::Start → через `start_notify_ticks` → JumpAnimStarted (импульс)
//! - start montage доигрывает за `start_montage_ticks` после notify; если
//!   персонаж так и не оторвался от земли (прыжок отпущен в тот же тик) →
//!   JumpAnimEnded
//! - LandHigh на земле → через `land_high_ticks` → JumpAnimEnded

use bevy::prelude::*;

use crate::components::{JumpState, MovementState};
use crate::locomotion::{AnimationNotify, Locomotion};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingNotify {
    JumpStart,
    /// Конец start montage (проверка: взлетели ли)
    StartMontageEnd,
    JumpEnd,
}

/// Тайминги jump анимации (в fixed тиках)
#[derive(Component, Debug, Clone, Copy)]
pub struct JumpAnimationTimeline {
    pub start_notify_ticks: u32,
    pub start_montage_ticks: u32,
    pub land_high_ticks: u32,
    pending: Option<(PendingNotify, u32)>,
    last_jump_state: JumpState,
}

impl Default for JumpAnimationTimeline {
    fn default() -> Self {
        Self::new(6, 20, 30)
    }
}

impl JumpAnimationTimeline {
    pub fn new(start_notify_ticks: u32, start_montage_ticks: u32, land_high_ticks: u32) -> Self {
        Self {
            start_notify_ticks,
            start_montage_ticks,
            land_high_ticks,
            pending: None,
            last_jump_state: JumpState::None,
        }
    }

    /// Один тик timeline: возвращает notify, если пора его отправить
    fn tick(&mut self, entity: Entity, locomotion: &Locomotion) -> Option<AnimationNotify> {
        let jump_state = locomotion.jump_state();
        let grounded = locomotion.movement_state() == MovementState::Grounded;

        if jump_state != self.last_jump_state {
            // Land анимацию ждём только после касания земли (ниже)
            self.pending = (jump_state == JumpState::Start)
                .then_some((PendingNotify::JumpStart, self.start_notify_ticks));
            self.last_jump_state = jump_state;
        }

        if jump_state == JumpState::LandHigh && grounded && self.pending.is_none() {
            self.pending = Some((PendingNotify::JumpEnd, self.land_high_ticks));
        }

        let (kind, remaining) = self.pending?;
        if remaining > 0 {
            self.pending = Some((kind, remaining - 1));
            return None;
        }

        self.pending = None;
        match kind {
            PendingNotify::JumpStart => {
                self.pending = Some((PendingNotify::StartMontageEnd, self.start_montage_ticks));
                Some(AnimationNotify::JumpAnimStarted { entity })
            }
            // В воздухе montage переходит в loop, latch держится до приземления
            PendingNotify::StartMontageEnd => (jump_state == JumpState::Start && grounded)
                .then_some(AnimationNotify::JumpAnimEnded { entity }),
            PendingNotify::JumpEnd => Some(AnimationNotify::JumpAnimEnded { entity }),
        }
    }
}

/// Система: timeline → AnimationNotify
pub fn drive_jump_animation(
    mut query: Query<(Entity, &Locomotion, &mut JumpAnimationTimeline)>,
    mut notifies: EventWriter<AnimationNotify>,
) {
    for (entity, locomotion, mut timeline) in query.iter_mut() {
        if let Some(notify) = timeline.tick(entity, locomotion) {
            notifies.write(notify);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grounded_jump_start() -> Locomotion {
        let mut locomotion = Locomotion::default();
        locomotion.update_movement_state(false);
        assert!(locomotion.request_jump_start());
        locomotion
    }

    #[test]
    fn test_jump_start_notify_after_delay() {
        let entity = Entity::from_raw(1);
        let mut timeline = JumpAnimationTimeline::new(2, 20, 5);
        let locomotion = grounded_jump_start();

        assert_eq!(timeline.tick(entity, &locomotion), None);
        assert_eq!(timeline.tick(entity, &locomotion), None);
        assert_eq!(
            timeline.tick(entity, &locomotion),
            Some(AnimationNotify::JumpAnimStarted { entity })
        );
        // Один раз на прыжок
        assert_eq!(timeline.tick(entity, &locomotion), None);
    }

    #[test]
    fn test_start_montage_ends_jump_left_on_ground() {
        let entity = Entity::from_raw(1);
        let mut timeline = JumpAnimationTimeline::new(0, 2, 5);
        let locomotion = grounded_jump_start();

        assert_eq!(
            timeline.tick(entity, &locomotion),
            Some(AnimationNotify::JumpAnimStarted { entity })
        );
        // Импульса не было: всё ещё Start на земле
        assert_eq!(timeline.tick(entity, &locomotion), None);
        assert_eq!(timeline.tick(entity, &locomotion), None);
        assert_eq!(
            timeline.tick(entity, &locomotion),
            Some(AnimationNotify::JumpAnimEnded { entity })
        );
        assert_eq!(timeline.tick(entity, &locomotion), None);
    }

    #[test]
    fn test_start_montage_end_in_air_keeps_jump() {
        let entity = Entity::from_raw(1);
        let mut timeline = JumpAnimationTimeline::new(0, 1, 5);
        let mut locomotion = grounded_jump_start();

        assert_eq!(
            timeline.tick(entity, &locomotion),
            Some(AnimationNotify::JumpAnimStarted { entity })
        );
        locomotion.update_movement_state(true);

        for _ in 0..10 {
            assert_eq!(timeline.tick(entity, &locomotion), None);
        }
        assert_eq!(locomotion.jump_state(), JumpState::Start);
    }

    #[test]
    fn test_land_high_waits_for_ground() {
        let entity = Entity::from_raw(1);
        let mut timeline = JumpAnimationTimeline::new(0, 20, 1);
        let mut locomotion = Locomotion::default();
        locomotion.update_movement_state(true);
        assert!(locomotion.transition_jump_state(JumpState::LandHigh));

        // Ещё в воздухе — land анимация не идёт
        assert_eq!(timeline.tick(entity, &locomotion), None);
        assert_eq!(timeline.tick(entity, &locomotion), None);

        locomotion.update_movement_state(false);
        assert_eq!(timeline.tick(entity, &locomotion), None);
        assert_eq!(
            timeline.tick(entity, &locomotion),
            Some(AnimationNotify::JumpAnimEnded { entity })
        );
    }
}
