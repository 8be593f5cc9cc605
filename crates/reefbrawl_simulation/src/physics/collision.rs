//! Collision groups (Rapier backend)
//!
//! - GROUP_1: враги
//! - GROUP_2: хитбоксы (атаки игрока, снаряды, взрывы)
//! - GROUP_7: препятствия (стены, камни), их видит perception raycast

use bevy_rapier2d::prelude::*;

use crate::ai::perception::ObstacleMask;

pub const ENEMY: Group = Group::GROUP_1;
pub const HITBOX: Group = Group::GROUP_2;
pub const OBSTACLE: Group = Group::GROUP_7;

/// Радиус тела врага (Collider::ball и headless overlap)
pub const ENEMY_RADIUS: f32 = 0.4;

/// Радиус цели (игрока) для contact damage
pub const TARGET_RADIUS: f32 = 0.5;

/// Враг: сталкивается с хитбоксами и препятствиями
pub fn enemy_groups() -> CollisionGroups {
    CollisionGroups::new(ENEMY, HITBOX | OBSTACLE)
}

/// Хитбокс: задевает только врагов
pub fn hitbox_groups() -> CollisionGroups {
    CollisionGroups::new(HITBOX, ENEMY)
}

pub fn obstacle_groups() -> CollisionGroups {
    CollisionGroups::new(OBSTACLE, Group::ALL)
}

/// Те же биты, что у `ObstacleMask::OBSTACLES`
pub fn obstacle_mask() -> ObstacleMask {
    ObstacleMask(OBSTACLE.bits())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_obstacle_group_matches_perception_mask() {
        assert_eq!(obstacle_mask(), ObstacleMask::OBSTACLES);
    }

    #[test]
    fn test_hitbox_and_enemy_groups_interact() {
        let enemy = enemy_groups();
        let hitbox = hitbox_groups();
        assert!(enemy.filters.contains(hitbox.memberships));
        assert!(hitbox.filters.contains(enemy.memberships));
    }
}
