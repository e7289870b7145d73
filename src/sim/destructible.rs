//! Destructible Props
//!
//! Inert damageable props. They never act; their only behavior is dying and
//! rolling reward drops, resolved by the damage pipeline.

use bevy::prelude::*;

use crate::sim::tuning::DestructibleTuning;

/// Drop table for a single destructible, copied from tuning at spawn
#[derive(Component, Debug)]
pub struct Destructible {
    pub stamina_restore: i32,
    pub health_restore: i32,
    pub stamina_drop_chance: f32,
    pub health_drop_chance: f32,
}

impl Destructible {
    pub fn from_tuning(tuning: &DestructibleTuning) -> Self {
        Self {
            stamina_restore: tuning.stamina_restore,
            health_restore: tuning.health_restore,
            stamina_drop_chance: tuning.stamina_drop_chance,
            health_drop_chance: tuning.health_drop_chance,
        }
    }
}
