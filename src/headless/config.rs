//! Scenario Configuration
//!
//! JSON description of a single run: which agents exist, where they start,
//! the player's input script, and run-level settings (duration cap, seed,
//! output path). Numeric tuning lives in the RON config, not here.

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::sim::script::ScriptEntry;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSetup {
    pub position: [f32; 2],
    /// Timed input script; empty means the player stands idle
    #[serde(default)]
    pub script: Vec<ScriptEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemySetup {
    pub position: [f32; 2],
    /// Patrol loop; empty means the enemy holds position until aware
    #[serde(default)]
    pub waypoints: Vec<[f32; 2]>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossSetup {
    pub position: [f32; 2],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestructibleSetup {
    pub position: [f32; 2],
}

/// A complete scenario. Every agent section is optional; the simulation
/// runs whatever is present.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub player: Option<PlayerSetup>,
    #[serde(default)]
    pub enemies: Vec<EnemySetup>,
    #[serde(default)]
    pub boss: Option<BossSetup>,
    #[serde(default)]
    pub destructibles: Vec<DestructibleSetup>,

    /// Hard cap on simulation time; the run reports a timeout when reached
    #[serde(default = "default_max_duration")]
    pub max_duration_secs: f32,
    /// Seed for deterministic runs; omitted means system entropy
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Where to write the JSON report; omitted means the default filename
    #[serde(default)]
    pub output_path: Option<String>,
    /// Random-walk length for boss room carving (used only with a boss)
    #[serde(default = "default_room_walk_length")]
    pub room_walk_length: usize,
}

fn default_max_duration() -> f32 {
    300.0
}

fn default_room_walk_length() -> usize {
    60
}

impl ScenarioConfig {
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
        let config: ScenarioConfig = serde_json::from_str(&contents)
            .map_err(|e| format!("failed to parse {}: {}", path.display(), e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_duration_secs <= 0.0 {
            return Err(format!(
                "max_duration_secs must be positive, got {}",
                self.max_duration_secs
            ));
        }
        if self.room_walk_length == 0 {
            return Err("room_walk_length must be at least 1".to_string());
        }
        if self.player.is_none()
            && self.enemies.is_empty()
            && self.boss.is_none()
            && self.destructibles.is_empty()
        {
            return Err("scenario has no agents to simulate".to_string());
        }
        if let Some(player) = &self.player {
            for entry in &player.script {
                if entry.at < 0.0 {
                    return Err(format!(
                        "script entry has negative timestamp {}",
                        entry.at
                    ));
                }
            }
        }
        Ok(())
    }

    /// True when the scenario contains anything that can fight the player
    pub fn has_hostiles(&self) -> bool {
        !self.enemies.is_empty() || self.boss.is_some()
    }
}
