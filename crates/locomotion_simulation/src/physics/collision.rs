//! Collision groups (Rapier) — centralised константы для всего крейта.
//!
//! ## Группы:
//! - GROUP_1: Reserved
//! - GROUP_2: Characters (kinematic капсулы)
//! - GROUP_3: World static (пол, стены, terrain)
//! - GROUP_4: World dynamic (ящики, платформы, props)
//!
//! Ground trace идёт по "world" каналу: static + dynamic, персонажи не блокируют.

use bevy_rapier3d::prelude::*;

pub const GROUP_CHARACTERS: Group = Group::GROUP_2;
pub const GROUP_WORLD_STATIC: Group = Group::GROUP_3;
pub const GROUP_WORLD_DYNAMIC: Group = Group::GROUP_4;

/// Что блокирует ground trace
pub const TRACE_CHANNEL_WORLD: Group = GROUP_WORLD_STATIC.union(GROUP_WORLD_DYNAMIC);

/// Капсула персонажа: коллайдит с другими персонажами и миром
pub fn character_groups() -> CollisionGroups {
    CollisionGroups::new(
        GROUP_CHARACTERS,
        GROUP_CHARACTERS | GROUP_WORLD_STATIC | GROUP_WORLD_DYNAMIC,
    )
}

/// Статическая геометрия уровня
pub fn world_static_groups() -> CollisionGroups {
    CollisionGroups::new(GROUP_WORLD_STATIC, Group::ALL)
}

/// Membership/filter для ground trace query
pub fn ground_trace_groups() -> CollisionGroups {
    CollisionGroups::new(Group::ALL, TRACE_CHANNEL_WORLD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_channel_skips_characters() {
        let trace = ground_trace_groups();
        assert!(trace.filters.contains(GROUP_WORLD_STATIC));
        assert!(trace.filters.contains(GROUP_WORLD_DYNAMIC));
        assert!(!trace.filters.intersects(GROUP_CHARACTERS));
    }

    #[test]
    fn test_static_ground_blocks_trace() {
        let ground = world_static_groups();
        let trace = ground_trace_groups();
        // Rapier: пересечение в обе стороны
        assert!(ground.memberships.intersects(trace.filters));
        assert!(trace.memberships.intersects(ground.filters));
        assert!(!character_groups().memberships.intersects(trace.filters));
    }

    #[test]
    fn test_character_collides_with_world() {
        let character = character_groups();
        assert!(character.memberships.contains(GROUP_CHARACTERS));
        assert!(character.filters.contains(GROUP_WORLD_STATIC));
    }
}
