//! Базовые компоненты врагов: Enemy, Health, ContactDamage, Facing

use bevy::prelude::*;

use crate::combat::ArchetypeId;

/// Враг (агент с perception + двумя state machines)
///
/// Всё остальное (brain, combat machine, navigation) спавнится в `spawn_enemy`.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Enemy {
    pub archetype: ArchetypeId,
}

/// Здоровье (Health Port)
///
/// В отличие от игрока урон НЕ клампится: 10 HP − 15 урона = −5.
/// Смерть: `current <= 0`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Health {
    pub fn new(max: i32) -> Self {
        Self { current: max, max }
    }

    pub fn current_health(&self) -> i32 {
        self.current
    }

    pub fn apply_damage(&mut self, amount: i32) {
        self.current -= amount;
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0
    }

    pub fn is_alive(&self) -> bool {
        !self.is_dead()
    }
}

/// Урон, который враг наносит при контакте
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct ContactDamage(pub i32);

/// Направление спрайта (flip_x = смотрит влево)
///
/// Латчится только на ненулевой горизонтальной скорости.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Facing {
    pub flip_x: bool,
}

impl Facing {
    pub fn update_from_velocity(&mut self, velocity: Vec2) {
        if velocity.x > 0.0 {
            self.flip_x = false;
        } else if velocity.x < 0.0 {
            self.flip_x = true;
        }
    }
}

/// Кого преследуем (target provider, инжектится при спавне)
///
/// `None` или despawned entity = цели нет, perception всегда fails.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct ChaseTarget(pub Option<Entity>);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_goes_negative() {
        let mut health = Health::new(10);
        health.apply_damage(15);
        assert_eq!(health.current_health(), -5);
        assert!(health.is_dead());
    }

    #[test]
    fn test_health_zero_is_dead() {
        let mut health = Health::new(20);
        health.apply_damage(20);
        assert!(health.is_dead());
        assert!(!health.is_alive());
    }

    #[test]
    fn test_facing_latches_on_zero_velocity() {
        let mut facing = Facing::default();

        facing.update_from_velocity(Vec2::new(-2.0, 1.0));
        assert!(facing.flip_x);

        // Стоим на месте → направление не меняется
        facing.update_from_velocity(Vec2::ZERO);
        assert!(facing.flip_x);

        // Чисто вертикальное движение тоже не трогает flip
        facing.update_from_velocity(Vec2::new(0.0, 3.0));
        assert!(facing.flip_x);

        facing.update_from_velocity(Vec2::new(0.5, 0.0));
        assert!(!facing.flip_x);
    }
}
