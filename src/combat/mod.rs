//! Combat infrastructure
//!
//! Implements the cross-cutting combat plumbing:
//! - Combat events (damage, deaths, drops, animation/facing sinks)
//! - The structured combat log and its recording system
//!
//! The per-agent behavior state machines live in [`crate::sim`]; they emit
//! the events defined here and the resolver in `sim::resolver` consumes them.

use bevy::prelude::*;

pub mod events;
pub mod log;
pub mod systems;

use events::*;

/// Plugin registering combat events and the combat log
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app
            // Combat events
            .add_event::<DamageEvent>()
            .add_event::<DeathEvent>()
            .add_event::<DropEvent>()
            .add_event::<AnimationEvent>()
            .add_event::<FacingEvent>()
            // Resources
            .init_resource::<log::CombatLog>();
    }
}
