//! Physics-facing компоненты: что локомоция читает и что отдаёт physics collaborator'у
//!
//! Контракт:
//! - CharacterBody (velocity, is_falling) — пишет physics, читает локомоция
//! - MovementIntent — пишет локомоция, потребляет physics (один раз за тик)
//! - ControlRotation — look input → yaw/pitch камеры, yaw задаёт basis для move input

use bevy::prelude::*;

/// Физическое тело персонажа (состояние movement component)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct CharacterBody {
    /// Линейная скорость (cm/s), Y — вверх
    pub velocity: Vec3,
    /// Movement component считает что мы падаем (не на полу)
    pub is_falling: bool,
}

impl CharacterBody {
    /// Модуль горизонтальной проекции скорости
    pub fn ground_speed(&self) -> f32 {
        Vec2::new(self.velocity.x, self.velocity.z).length()
    }
}

/// Капсула персонажа (основание = center - up * half_height)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct CharacterCapsule {
    pub radius: f32,
    pub half_height: f32,
}

impl Default for CharacterCapsule {
    fn default() -> Self {
        Self {
            radius: 42.0,
            half_height: 96.0,
        }
    }
}

impl CharacterCapsule {
    /// Точка основания капсулы в world space
    pub fn base_point(&self, transform: &Transform) -> Vec3 {
        transform.translation - transform.up() * self.half_height
    }
}

/// Ground speed текущего тика (пересчитывается каждый тик)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct GroundSpeed(pub f32);

/// Накопитель movement intent за тик
///
/// Каждый вклад = direction * scale. Physics забирает сумму через `consume()`.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct MovementIntent {
    pub pending: Vec3,
}

impl MovementIntent {
    pub fn add(&mut self, direction: Vec3, scale: f32) {
        self.pending += direction * scale;
    }

    /// Забрать накопленное и обнулить
    pub fn consume(&mut self) -> Vec3 {
        std::mem::take(&mut self.pending)
    }

    pub fn is_empty(&self) -> bool {
        self.pending == Vec3::ZERO
    }
}

/// Controller rotation (yaw/pitch, радианы)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct ControlRotation {
    pub yaw: f32,
    pub pitch: f32,
}

impl ControlRotation {
    pub fn add_yaw_input(&mut self, amount: f32) {
        self.yaw = (self.yaw + amount).rem_euclid(std::f32::consts::TAU);
    }

    pub fn add_pitch_input(&mut self, amount: f32, limit_degrees: f32) {
        let limit = limit_degrees.to_radians();
        self.pitch = (self.pitch + amount).clamp(-limit, limit);
    }

    /// Yaw-only rotation (pitch не влияет на направление ходьбы)
    pub fn yaw_rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }

    pub fn forward(&self) -> Vec3 {
        self.yaw_rotation() * Vec3::NEG_Z
    }

    pub fn right(&self) -> Vec3 {
        self.yaw_rotation() * Vec3::X
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ground_speed_ignores_vertical() {
        let body = CharacterBody {
            velocity: Vec3::new(3.0, -900.0, 4.0),
            is_falling: true,
        };
        assert!((body.ground_speed() - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_capsule_base_point() {
        let capsule = CharacterCapsule::default();
        let transform = Transform::from_xyz(10.0, 96.0, -5.0);
        let base = capsule.base_point(&transform);
        assert!((base - Vec3::new(10.0, 0.0, -5.0)).length() < 1e-4);
    }

    #[test]
    fn test_movement_intent_accumulates_and_drains() {
        let mut intent = MovementIntent::default();
        intent.add(Vec3::NEG_Z, 1.0);
        intent.add(Vec3::X, 0.5);

        assert_eq!(intent.consume(), Vec3::new(0.5, 0.0, -1.0));
        assert!(intent.is_empty());
    }

    #[test]
    fn test_control_rotation_basis() {
        let mut rotation = ControlRotation::default();
        assert!((rotation.forward() - Vec3::NEG_Z).length() < 1e-5);
        assert!((rotation.right() - Vec3::X).length() < 1e-5);

        // 90° влево: forward смотрит в -X
        rotation.add_yaw_input(std::f32::consts::FRAC_PI_2);
        assert!((rotation.forward() - Vec3::NEG_X).length() < 1e-5);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut rotation = ControlRotation::default();
        rotation.add_pitch_input(10.0, 89.0);
        assert!((rotation.pitch - 89f32.to_radians()).abs() < 1e-5);

        rotation.add_pitch_input(-20.0, 89.0);
        assert!((rotation.pitch + 89f32.to_radians()).abs() < 1e-5);
    }
}
