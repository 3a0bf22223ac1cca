//! Designer-tunable константы локомоции
//!
//! Загружаются один раз (TOML или Default) и потребляются при spawn персонажа.
//! Единицы: сантиметры / секунды, ось Y — вверх.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Полная конфигурация локомоции (Resource)
#[derive(Resource, Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    pub movement: MovementConfig,
    pub jump: JumpConfig,
    pub slide: SlideConfig,
    pub look: LookConfig,
    pub physics: PhysicsConfig,
}

/// Классификация скорости + блокировка движения на старте прыжка
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// ground speed > порога → Running, иначе (> 0) → Walking
    pub run_speed_threshold: f32,
    /// Пока JumpState::Start и velocity.y ниже — move input игнорируется
    pub liftoff_velocity_z: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            run_speed_threshold: 150.0,
            liftoff_velocity_z: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpConfig {
    /// Отрицательный порог: падаем быстрее → high landing probe активен
    pub high_min_jump_velocity_z: f32,
    /// Длина ground trace от основания капсулы
    pub jump_ground_trace_length: f32,
}

impl Default for JumpConfig {
    fn default() -> Self {
        Self {
            high_min_jump_velocity_z: -600.0,
            jump_ground_trace_length: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlideConfig {
    /// slide_speed на старте слайда
    pub initial_speed: f32,
    /// Линейное затухание slide_speed за тик
    pub deceleration_rate: f32,
    /// Слайд заканчивается когда И ground speed, И slide speed ниже порога
    pub stop_speed: f32,
}

impl Default for SlideConfig {
    fn default() -> Self {
        Self {
            initial_speed: 1000.0,
            deceleration_rate: 0.1,
            stop_speed: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookConfig {
    /// Камера не переворачивается через зенит/надир
    pub pitch_limit_degrees: f32,
}

impl Default for LookConfig {
    fn default() -> Self {
        Self {
            pitch_limit_degrees: 89.0,
        }
    }
}

/// Параметры headless physics collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub tick_hz: f64,
    pub capsule_radius: f32,
    pub capsule_half_height: f32,
    pub max_walk_speed: f32,
    pub max_acceleration: f32,
    pub jump_z_velocity: f32,
    pub gravity: f32,
    pub air_control: f32,
    pub braking_deceleration_walking: f32,
    pub braking_deceleration_falling: f32,
    /// Orient rotation to movement (градусы/сек)
    pub rotation_rate_degrees: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            tick_hz: 60.0,
            capsule_radius: 42.0,
            capsule_half_height: 96.0,
            max_walk_speed: 500.0,
            max_acceleration: 2048.0,
            jump_z_velocity: 700.0,
            gravity: -980.0,
            air_control: 0.35,
            braking_deceleration_walking: 2000.0,
            braking_deceleration_falling: 1500.0,
            rotation_rate_degrees: 500.0,
        }
    }
}

impl LocomotionConfig {
    /// Парсит TOML; отсутствующие поля берутся из Default
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse(None, e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(Some(path.to_path_buf()), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Проверка знаков/диапазонов (guard'ы state machine опираются на них)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jump.high_min_jump_velocity_z >= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "jump.high_min_jump_velocity_z must be negative (got {})",
                self.jump.high_min_jump_velocity_z
            )));
        }
        if self.jump.jump_ground_trace_length <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "jump.jump_ground_trace_length must be positive (got {})",
                self.jump.jump_ground_trace_length
            )));
        }
        if self.movement.run_speed_threshold < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "movement.run_speed_threshold must be >= 0 (got {})",
                self.movement.run_speed_threshold
            )));
        }
        if self.slide.deceleration_rate < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "slide.deceleration_rate must be >= 0 (got {})",
                self.slide.deceleration_rate
            )));
        }
        if self.slide.initial_speed < 0.0 || self.slide.stop_speed < 0.0 {
            return Err(ConfigError::Invalid(
                "slide speeds must be >= 0".to_string(),
            ));
        }
        if self.physics.tick_hz <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "physics.tick_hz must be positive (got {})",
                self.physics.tick_hz
            )));
        }
        Ok(())
    }
}

/// Ошибки загрузки конфигурации
#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(Option<PathBuf>, toml::de::Error),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => {
                write!(f, "failed to read {}: {}", path.display(), e)
            }
            ConfigError::Parse(Some(path), e) => {
                write!(f, "failed to parse {}: {}", path.display(), e)
            }
            ConfigError::Parse(None, e) => write!(f, "failed to parse config: {}", e),
            ConfigError::Invalid(reason) => write!(f, "invalid config: {}", reason),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(_, e) => Some(e),
            ConfigError::Parse(_, e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}
