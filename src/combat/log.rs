//! Combat logging
//!
//! Records everything that happens during a simulation run for post-run
//! analysis and for the JSON report the headless runner writes.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single entry in the combat log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatLogEntry {
    /// Timestamp in simulation time (seconds since run start)
    pub timestamp: f32,
    /// The type of event
    pub event_type: CombatLogEventType,
    /// Human-readable description of the event
    pub message: String,
    /// Structured payload for damage entries (enables aggregation queries)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<DamageData>,
}

/// Structured payload attached to damage entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DamageData {
    pub source: String,
    pub target: String,
    pub amount: i32,
}

/// Types of combat log events for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatLogEventType {
    /// Damage dealt
    Damage,
    /// Agent or destructible died
    Death,
    /// Destructible reward drop resolved
    Drop,
    /// Animation trigger/flag emitted to the render sink
    Animation,
    /// Boss phase transition
    Phase,
    /// Simulation event (start, end, configuration warnings)
    SimEvent,
}

/// The combat log resource storing all events
#[derive(Resource, Default)]
pub struct CombatLog {
    /// All log entries in chronological order
    pub entries: Vec<CombatLogEntry>,
    /// Current simulation time
    pub sim_time: f32,
}

impl CombatLog {
    /// Clear the log for a new run
    pub fn clear(&mut self) {
        self.entries.clear();
        self.sim_time = 0.0;
    }

    /// Add a new entry to the log
    pub fn log(&mut self, event_type: CombatLogEventType, message: String) {
        self.entries.push(CombatLogEntry {
            timestamp: self.sim_time,
            event_type,
            message,
            damage: None,
        });
    }

    /// Add a damage entry with its structured payload
    pub fn log_damage(&mut self, source: String, target: String, amount: i32, message: String) {
        self.entries.push(CombatLogEntry {
            timestamp: self.sim_time,
            event_type: CombatLogEventType::Damage,
            message,
            damage: Some(DamageData {
                source,
                target,
                amount,
            }),
        });
    }

    /// Get entries filtered by event type
    pub fn filter_by_type(&self, event_type: CombatLogEventType) -> Vec<&CombatLogEntry> {
        self.entries
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Total damage dealt per target, keyed by target name, for one source
    pub fn damage_by_target(&self, source: &str) -> HashMap<String, i32> {
        let mut totals = HashMap::new();
        for entry in &self.entries {
            if let Some(ref data) = entry.damage {
                if data.source == source {
                    *totals.entry(data.target.clone()).or_insert(0) += data.amount;
                }
            }
        }
        totals
    }

    /// Total damage dealt by one source across all targets
    pub fn total_damage_dealt(&self, source: &str) -> i32 {
        self.entries
            .iter()
            .filter_map(|e| e.damage.as_ref())
            .filter(|d| d.source == source)
            .map(|d| d.amount)
            .sum()
    }

    /// Total damage taken by one target from all sources
    pub fn total_damage_taken(&self, target: &str) -> i32 {
        self.entries
            .iter()
            .filter_map(|e| e.damage.as_ref())
            .filter(|d| d.target == target)
            .map(|d| d.amount)
            .sum()
    }

    /// Number of death entries recorded
    pub fn death_count(&self) -> usize {
        self.filter_by_type(CombatLogEventType::Death).len()
    }

    /// Get the last N entries
    pub fn recent(&self, count: usize) -> Vec<&CombatLogEntry> {
        self.entries.iter().rev().take(count).rev().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_entries_carry_current_sim_time() {
        let mut log = CombatLog::default();
        log.sim_time = 1.5;
        log.log(CombatLogEventType::SimEvent, "hello".to_string());
        assert_eq!(log.entries[0].timestamp, 1.5);
    }

    #[test]
    fn test_clear_resets_time_and_entries() {
        let mut log = CombatLog::default();
        log.sim_time = 3.0;
        log.log(CombatLogEventType::Death, "gone".to_string());
        log.clear();
        assert!(log.entries.is_empty());
        assert_eq!(log.sim_time, 0.0);
    }
}
