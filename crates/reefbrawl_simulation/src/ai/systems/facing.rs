//! Present фаза: flip спрайта по горизонтальной скорости

use bevy::prelude::*;

use crate::components::{Facing, PhysicsBody};

pub fn update_facing(mut agents: Query<(&PhysicsBody, &mut Facing), Changed<PhysicsBody>>) {
    for (body, mut facing) in agents.iter_mut() {
        facing.update_from_velocity(body.velocity);
    }
}
