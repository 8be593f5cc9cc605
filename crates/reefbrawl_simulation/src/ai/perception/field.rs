//! ObstacleField: headless backend для perception (AABB препятствия)

use bevy::math::bounding::{Aabb2d, RayCast2d};
use bevy::prelude::*;

use super::{ObstacleMask, ObstacleQuery};

/// Прямоугольное препятствие (axis-aligned)
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct Obstacle {
    pub min: Vec2,
    pub max: Vec2,
    /// Слои коллизий препятствия (сверяются с `ObstacleMask`)
    pub layers: u32,
}

impl Obstacle {
    pub fn new(a: Vec2, b: Vec2, layers: u32) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
            layers,
        }
    }

    pub fn aabb(&self) -> Aabb2d {
        Aabb2d {
            min: self.min,
            max: self.max,
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Пересекает ли отрезок from → to прямоугольник (ray cast длиной отрезка)
    ///
    /// Отрезок, начинающийся внутри препятствия, считается заблокированным.
    pub fn intersects_segment(&self, from: Vec2, to: Vec2) -> bool {
        let delta = to - from;
        // Нулевой отрезок: направления нет, только точка
        let Ok(direction) = Dir2::new(delta) else {
            return self.contains(from);
        };

        RayCast2d::new(from, direction, delta.length())
            .aabb_intersection_at(&self.aabb())
            .is_some()
    }
}

/// Набор препятствий уровня (Resource)
#[derive(Resource, Debug, Clone, Default, Reflect)]
#[reflect(Resource)]
pub struct ObstacleField {
    pub obstacles: Vec<Obstacle>,
}

impl ObstacleField {
    pub fn add(&mut self, obstacle: Obstacle) -> &mut Self {
        self.obstacles.push(obstacle);
        self
    }

    pub fn with(mut self, obstacle: Obstacle) -> Self {
        self.obstacles.push(obstacle);
        self
    }
}

impl ObstacleQuery for ObstacleField {
    fn raycast_blocked(&self, from: Vec2, to: Vec2, mask: ObstacleMask) -> bool {
        self.obstacles
            .iter()
            .filter(|obstacle| mask.intersects(obstacle.layers))
            .any(|obstacle| obstacle.intersects_segment(from, to))
    }
}
