//! Perception: line-of-sight и range проверки агент → цель
//!
//! Два примитива, которые переиспользуют ВСЕ range-gated переходы
//! (outer FSM и exit-check каждого combat archetype):
//! - `can_see`: прямой raycast по слою препятствий ничего не задел
//! - `in_range`: евклидова дистанция ≤ R
//!
//! Обе функции без side effects. Отсутствующая цель (`None`) никогда не engageable.
//!
//! Backends (`ObstacleQuery`):
//! - `ObstacleField`: AABB препятствия, headless/tests
//! - `RapierContext`: raycast через bevy_rapier2d

use bevy::prelude::*;

mod field;
mod rapier;

pub use field::{Obstacle, ObstacleField};

/// Битовая маска слоёв коллизий, которые блокируют видимость
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub struct ObstacleMask(pub u32);

impl ObstacleMask {
    /// Стены/камни/кораллы (GROUP_7 в collision groups движка)
    pub const OBSTACLES: ObstacleMask = ObstacleMask(1 << 6);
    pub const NONE: ObstacleMask = ObstacleMask(0);

    pub fn intersects(self, layers: u32) -> bool {
        self.0 & layers != 0
    }
}

impl Default for ObstacleMask {
    fn default() -> Self {
        Self::OBSTACLES
    }
}

/// Какой backend отвечает на raycast (и откуда берутся hit contacts)
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
#[reflect(Resource)]
pub enum PerceptionBackend {
    /// `ObstacleField` resource + headless overlap хитбоксов
    #[default]
    ObstacleField,
    /// Ray cast / collision events bevy_rapier2d
    Rapier,
}

#[derive(Resource, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Resource)]
pub struct PerceptionSettings {
    pub obstacle_mask: ObstacleMask,
}

/// Perception Port: "есть ли препятствие на отрезке from → to"
pub trait ObstacleQuery {
    fn raycast_blocked(&self, from: Vec2, to: Vec2, mask: ObstacleMask) -> bool;
}

pub fn can_see<Q: ObstacleQuery + ?Sized>(obstacles: &Q, from: Vec2, to: Vec2, mask: ObstacleMask) -> bool {
    !obstacles.raycast_blocked(from, to, mask)
}

pub fn in_range(from: Vec2, to: Vec2, range: f32) -> bool {
    from.distance(to) <= range
}

/// Цель в радиусе И видна
pub fn is_engageable<Q: ObstacleQuery + ?Sized>(
    obstacles: &Q,
    from: Vec2,
    target: Option<Vec2>,
    range: f32,
    mask: ObstacleMask,
) -> bool {
    match target {
        Some(target) => in_range(from, target, range) && can_see(obstacles, from, target, mask),
        None => false,
    }
}

/// Снимок perception на текущий тик (пишет Sense фаза, читает Decide)
///
/// Raycast делаем один раз на тик: все проверки агента используют
/// одну и ту же пару точек агент → цель, меняется только радиус.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct TargetSense {
    /// Позиция цели (`None` — цели нет или она despawned)
    pub target_position: Option<Vec2>,
    /// Прямая видимость (false если цели нет)
    pub line_of_sight: bool,
}

impl TargetSense {
    pub fn observe<Q: ObstacleQuery + ?Sized>(
        obstacles: &Q,
        from: Vec2,
        target: Option<Vec2>,
        mask: ObstacleMask,
    ) -> Self {
        let line_of_sight = target.is_some_and(|to| can_see(obstacles, from, to, mask));
        Self {
            target_position: target,
            line_of_sight,
        }
    }

    pub fn distance_from(&self, position: Vec2) -> Option<f32> {
        self.target_position.map(|target| position.distance(target))
    }

    /// Тот же контракт что `is_engageable`, но по снимку
    pub fn is_engageable(&self, position: Vec2, range: f32) -> bool {
        match self.target_position {
            Some(target) => self.line_of_sight && in_range(position, target, range),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall_between() -> ObstacleField {
        let mut field = ObstacleField::default();
        field.add(Obstacle::new(Vec2::new(1.0, -1.0), Vec2::new(1.5, 1.0), ObstacleMask::OBSTACLES.0));
        field
    }

    #[test]
    fn test_in_range_is_inclusive() {
        assert!(in_range(Vec2::ZERO, Vec2::new(3.0, 4.0), 5.0));
        assert!(!in_range(Vec2::ZERO, Vec2::new(3.0, 4.01), 5.0));
    }

    #[test]
    fn test_missing_target_never_engageable() {
        let field = ObstacleField::default();
        assert!(!is_engageable(&field, Vec2::ZERO, None, 100.0, ObstacleMask::OBSTACLES));

        let sense = TargetSense::observe(&field, Vec2::ZERO, None, ObstacleMask::OBSTACLES);
        assert!(!sense.line_of_sight);
        assert!(!sense.is_engageable(Vec2::ZERO, 100.0));
        assert_eq!(sense.distance_from(Vec2::ZERO), None);
    }

    #[test]
    fn test_wall_blocks_visibility() {
        let field = wall_between();
        let target = Some(Vec2::new(3.0, 0.0));

        assert!(!can_see(&field, Vec2::ZERO, Vec2::new(3.0, 0.0), ObstacleMask::OBSTACLES));
        assert!(!is_engageable(&field, Vec2::ZERO, target, 5.0, ObstacleMask::OBSTACLES));

        // Над стеной, видно
        assert!(can_see(&field, Vec2::new(0.0, 2.0), Vec2::new(3.0, 2.0), ObstacleMask::OBSTACLES));
    }

    #[test]
    fn test_mask_filters_layers() {
        let field = wall_between();
        // Маска без слоя стены, стена не мешает
        assert!(can_see(&field, Vec2::ZERO, Vec2::new(3.0, 0.0), ObstacleMask(1 << 2)));
    }

    #[test]
    fn test_sense_snapshot_matches_primitives() {
        let field = ObstacleField::default();
        let target = Some(Vec2::new(0.0, 3.0));
        let sense = TargetSense::observe(&field, Vec2::ZERO, target, ObstacleMask::OBSTACLES);

        assert!(sense.line_of_sight);
        assert_eq!(
            sense.is_engageable(Vec2::ZERO, 5.0),
            is_engageable(&field, Vec2::ZERO, target, 5.0, ObstacleMask::OBSTACLES)
        );
        assert!(!sense.is_engageable(Vec2::ZERO, 1.0));
    }
}
