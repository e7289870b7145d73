//! Simulation System Ordering
//!
//! Every tick runs three phases in a fixed order: timers fire completions,
//! agents decide and act, then damage and its consequences resolve. Within
//! the decisions phase each agent handles completions before new decisions,
//! so a follow-up timer started by an expiry (settle, cooldown) gates the
//! same tick's activation attempts.

use bevy::prelude::*;

use crate::combat::systems::{advance_log_clock, record_combat_log};
use crate::sim::boss::{boss_decide, check_boss_phase, handle_boss_completions};
use crate::sim::enemy::{enemy_decide, handle_enemy_completions};
use crate::sim::player::{apply_player_commands, handle_player_completions, player_movement};
use crate::sim::resolver::{apply_damage_events, resolve_drops, tick_despawn_after};
use crate::sim::scheduler::tick_action_timers;
use crate::sim::script::replay_player_script;
use crate::sim::apply_velocity;

/// The three phases of a simulation tick
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimSystemPhase {
    /// Advance clocks and timers; emit completion events
    Timers,
    /// Agent state machines consume commands and completions, set velocity,
    /// and emit damage
    Decisions,
    /// Integrate motion, resolve damage, deaths, phase shifts, and drops
    Resolution,
}

/// Chain the tick phases
pub fn configure_sim_system_ordering(app: &mut App) {
    app.configure_sets(
        Update,
        (
            SimSystemPhase::Timers,
            SimSystemPhase::Decisions,
            SimSystemPhase::Resolution,
        )
            .chain(),
    );
}

/// Register the core simulation systems into their phases
pub fn add_core_sim_systems(app: &mut App) {
    app.add_systems(
        Update,
        (
            advance_log_clock,
            replay_player_script,
            tick_action_timers,
            tick_despawn_after,
        )
            .chain()
            .in_set(SimSystemPhase::Timers),
    );
    app.add_systems(
        Update,
        (
            handle_player_completions,
            apply_player_commands,
            player_movement,
            handle_enemy_completions,
            enemy_decide,
            handle_boss_completions,
            boss_decide,
        )
            .chain()
            .in_set(SimSystemPhase::Decisions),
    );
    app.add_systems(
        Update,
        (
            apply_velocity,
            apply_damage_events,
            check_boss_phase,
            resolve_drops,
            record_combat_log,
        )
            .chain()
            .in_set(SimSystemPhase::Resolution),
    );
}
