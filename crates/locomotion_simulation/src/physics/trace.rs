//! Line trace для ground probe.
//!
//! Два backend'а:
//! - `GroundTraceWorld` resource (любая `GroundTrace` реализация, напр. `FlatGround`)
//!   — headless симуляция и тесты без Rapier pipeline
//! - Rapier query pipeline (`rapier_line_trace`) — полноценная сцена с коллайдерами
//!
//! Запрос синхронный, отвечает в том же тике.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::collision::ground_trace_groups;

/// Результат line trace
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceHit {
    /// Во что попали (None для аналитической геометрии вроде FlatGround)
    pub entity: Option<Entity>,
    pub point: Vec3,
    /// Расстояние от start до point
    pub distance: f32,
}

/// Collision/world collaborator: трассировка отрезка start → end
pub trait GroundTrace: Send + Sync + 'static {
    /// `ignore` — сам персонаж (не должен блокировать свой trace)
    fn line_trace(&self, start: Vec3, end: Vec3, ignore: Entity) -> Option<TraceHit>;
}

/// Бесконечная горизонтальная плоскость y = height
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatGround {
    pub height: f32,
}

impl Default for FlatGround {
    fn default() -> Self {
        Self { height: 0.0 }
    }
}

impl GroundTrace for FlatGround {
    fn line_trace(&self, start: Vec3, end: Vec3, _ignore: Entity) -> Option<TraceHit> {
        let above_start = start.y - self.height;
        let above_end = end.y - self.height;

        // Отрезок должен пересечь плоскость (или начинаться на ней)
        if above_start < 0.0 || above_end > 0.0 {
            return None;
        }

        let span = above_start - above_end;
        let t = if span > f32::EPSILON { above_start / span } else { 0.0 };
        let point = start.lerp(end, t);

        Some(TraceHit {
            entity: None,
            point,
            distance: start.distance(point),
        })
    }
}

/// Resource-backend: collision world, доступный probe системе
#[derive(Resource)]
pub struct GroundTraceWorld {
    trace: Box<dyn GroundTrace>,
}

impl GroundTraceWorld {
    pub fn new(trace: impl GroundTrace) -> Self {
        Self {
            trace: Box::new(trace),
        }
    }

    pub fn line_trace(&self, start: Vec3, end: Vec3, ignore: Entity) -> Option<TraceHit> {
        self.trace.line_trace(start, end, ignore)
    }
}

impl Default for GroundTraceWorld {
    fn default() -> Self {
        Self::new(FlatGround::default())
    }
}

/// Rapier backend: ray cast по world каналу, исключая rigid body персонажа
pub fn rapier_line_trace(
    context: &RapierContext,
    start: Vec3,
    end: Vec3,
    ignore: Entity,
) -> Option<TraceHit> {
    let delta = end - start;
    let length = delta.length();
    let direction = delta.try_normalize()?;

    let filter = QueryFilter::default()
        .exclude_rigid_body(ignore)
        .groups(ground_trace_groups());

    context
        .cast_ray(start, direction, length, true, filter)
        .map(|(entity, distance)| TraceHit {
            entity: Some(entity),
            point: start + direction * distance,
            distance,
        })
}
