//! Rapier backend: line-of-sight через ray cast bevy_rapier2d
//!
//! Луч ищет ТОЛЬКО коллайдеры, чьи membership пересекаются с маской препятствий.
//! Попадание в любой такой коллайдер между агентом и целью = видимость закрыта.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::{ObstacleMask, ObstacleQuery};

pub(crate) fn obstacle_filter(mask: ObstacleMask) -> QueryFilter<'static> {
    QueryFilter::new().groups(CollisionGroups::new(
        Group::ALL,
        Group::from_bits_truncate(mask.0),
    ))
}

impl ObstacleQuery for RapierContext<'_> {
    fn raycast_blocked(&self, from: Vec2, to: Vec2, mask: ObstacleMask) -> bool {
        let delta = to - from;
        let distance = delta.length();
        if distance <= f32::EPSILON {
            return false;
        }

        self.cast_ray(from, delta / distance, distance, true, obstacle_filter(mask))
            .is_some()
    }
}
