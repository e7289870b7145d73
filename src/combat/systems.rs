//! Combat log recording systems
//!
//! Translates the frame's combat events into structured log entries. Damage
//! entries are written by the resolver at the point a hit applies; this
//! recorder covers the remaining event streams at the end of the resolution
//! phase.

use bevy::prelude::*;

use super::events::*;
use super::log::{CombatLog, CombatLogEventType};

/// Advance the log clock by the frame delta.
///
/// Runs first in the frame so every entry recorded this tick carries the
/// same timestamp.
pub fn advance_log_clock(time: Res<Time>, mut combat_log: ResMut<CombatLog>) {
    combat_log.sim_time += time.delta_secs();
}

fn name_of(names: &Query<&Name>, entity: Entity) -> String {
    names
        .get(entity)
        .map(|n| n.as_str().to_string())
        .unwrap_or_else(|_| "Unknown".to_string())
}

/// Record events to the combat log
pub fn record_combat_log(
    mut combat_log: ResMut<CombatLog>,
    mut death_events: EventReader<DeathEvent>,
    mut drop_events: EventReader<DropEvent>,
    mut animation_events: EventReader<AnimationEvent>,
    mut facing_events: EventReader<FacingEvent>,
    names: Query<&Name>,
) {
    for event in death_events.read() {
        let victim_name = name_of(&names, event.victim);
        let killer_name = name_of(&names, event.killer);
        let message = format!("{} has been slain by {}", victim_name, killer_name);
        combat_log.log(CombatLogEventType::Death, message);
    }

    for event in drop_events.read() {
        let source_name = name_of(&names, event.source);
        if let Some(amount) = event.stamina_restored {
            combat_log.log(
                CombatLogEventType::Drop,
                format!("{} restores {} stamina", source_name, amount),
            );
        }
        if let Some(amount) = event.health_restored {
            combat_log.log(
                CombatLogEventType::Drop,
                format!("{} restores {} health", source_name, amount),
            );
        }
        if event.stamina_restored.is_none() && event.health_restored.is_none() {
            combat_log.log(
                CombatLogEventType::Drop,
                format!("{} drops nothing", source_name),
            );
        }
    }

    for event in animation_events.read() {
        let name = name_of(&names, event.entity());
        let message = match event {
            AnimationEvent::Trigger { name: anim, .. } => format!("{} triggers {}", name, anim),
            AnimationEvent::SetFlag {
                name: flag, value, ..
            } => format!("{} sets {} = {}", name, flag, value),
        };
        combat_log.log(CombatLogEventType::Animation, message);
    }

    for event in facing_events.read() {
        let name = name_of(&names, event.entity);
        combat_log.log(
            CombatLogEventType::Animation,
            format!("{} faces {:?}", name, event.facing),
        );
    }
}
