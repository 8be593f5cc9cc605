//! Combat компоненты

use bevy::prelude::*;

/// Наносящий урон коллайдер (меч игрока, снаряд, взрыв)
///
/// Контакт такого коллайдера с врагом → `HitContact`.
/// Хитбокс, принадлежащий тому же root, что и жертва, игнорируется.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Hitbox {
    pub damage: i32,
    /// Радиус круга (headless overlap; в Rapier режиме, Collider::ball)
    pub radius: f32,
}

impl Hitbox {
    pub fn new(damage: i32, radius: f32) -> Self {
        Self { damage, radius }
    }
}
