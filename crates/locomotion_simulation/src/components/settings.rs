//! Jump/slide settings, принадлежащие персонажу

use bevy::prelude::*;

use crate::config::{JumpConfig, SlideConfig};

/// Настройки прыжка + can_jump latch
///
/// Инвариант: can_jump == false ⇔ JumpState ∈ {Start, Loop}
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct JumpSettings {
    pub can_jump: bool,
    /// Отрицательный порог вертикальной скорости для high landing probe
    pub high_min_jump_velocity_z: f32,
    pub jump_ground_trace_length: f32,
}

impl Default for JumpSettings {
    fn default() -> Self {
        Self::from_config(&JumpConfig::default())
    }
}

impl JumpSettings {
    pub fn from_config(config: &JumpConfig) -> Self {
        Self {
            can_jump: true,
            high_min_jump_velocity_z: config.high_min_jump_velocity_z,
            jump_ground_trace_length: config.jump_ground_trace_length,
        }
    }
}

/// Настройки и текущее состояние слайда
///
/// slide_direction фиксируется один раз на старте (forward персонажа)
/// и дальше не обновляется.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct SlideSettings {
    pub slide_speed: f32,
    pub slide_direction: Vec3,
    pub deceleration_rate: f32,
    /// slide_speed сбрасывается в это значение на каждом старте слайда
    pub initial_speed: f32,
    pub stop_speed: f32,
}

impl Default for SlideSettings {
    fn default() -> Self {
        Self::from_config(&SlideConfig::default())
    }
}

impl SlideSettings {
    pub fn from_config(config: &SlideConfig) -> Self {
        Self {
            slide_speed: config.initial_speed,
            slide_direction: Vec3::NEG_Z,
            deceleration_rate: config.deceleration_rate,
            initial_speed: config.initial_speed,
            stop_speed: config.stop_speed,
        }
    }

    /// Старт слайда: полная скорость + направление "куда смотрим сейчас"
    pub fn begin(&mut self, forward: Vec3) {
        self.slide_speed = self.initial_speed;
        // Горизонтальная проекция; вырожденный forward → оставляем прошлое направление
        let flat = Vec3::new(forward.x, 0.0, forward.z);
        if let Some(direction) = flat.try_normalize() {
            self.slide_direction = direction;
        }
    }

    /// Линейное затухание; скорость не уходит в минус
    pub fn decelerate(&mut self) {
        self.slide_speed = (self.slide_speed - self.deceleration_rate).max(0.0);
    }

    /// Вклад слайда в movement intent этого тика
    pub fn impulse(&self) -> Vec3 {
        self.slide_direction * self.slide_speed
    }

    pub fn is_exhausted(&self, ground_speed: f32) -> bool {
        ground_speed < self.stop_speed && self.slide_speed < self.stop_speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jump_settings_start_unlatched() {
        let settings = JumpSettings::default();
        assert!(settings.can_jump);
        assert_eq!(settings.high_min_jump_velocity_z, -600.0);
        assert_eq!(settings.jump_ground_trace_length, 20.0);
    }

    #[test]
    fn test_slide_begin_captures_flat_forward() {
        let mut slide = SlideSettings::default();
        slide.slide_speed = 3.0;

        slide.begin(Vec3::new(1.0, 0.5, 0.0));

        assert_eq!(slide.slide_speed, 1000.0);
        assert!((slide.slide_direction - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_slide_decelerate_floors_at_zero() {
        let mut slide = SlideSettings {
            slide_speed: 0.05,
            ..default()
        };

        slide.decelerate();
        assert_eq!(slide.slide_speed, 0.0);

        slide.decelerate();
        assert_eq!(slide.slide_speed, 0.0);
    }

    #[test]
    fn test_slide_exhausted_needs_both_speeds_low() {
        let slide = SlideSettings {
            slide_speed: 5.0,
            ..default()
        };
        assert!(slide.is_exhausted(3.0));
        assert!(!slide.is_exhausted(12.0));

        let fast = SlideSettings::default();
        assert!(!fast.is_exhausted(0.0));
    }
}
