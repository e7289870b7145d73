//! Data-Driven Combat Tuning
//!
//! Numeric constants (speeds, costs, cooldowns, windups, drop chances) are
//! loaded from `assets/config/tuning.ron` at startup instead of being
//! hardcoded, so balance passes don't require recompilation.
//!
//! ## Usage
//! ```ignore
//! fn my_system(tuning: Res<Tuning>) {
//!     let speed = tuning.player.move_speed;
//! }
//! ```

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Player tuning values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerTuning {
    pub max_health: i32,
    pub max_stamina: i32,
    /// Movement speed in units per second
    pub move_speed: f32,
    /// Dash speed in units per second (overrides movement while dashing)
    pub dash_speed: f32,
    /// Seconds of forced dash motion
    pub dash_duration: f32,
    /// Seconds between dash motion ending and the roll flag clearing
    pub dash_settle: f32,
    /// Seconds of cooldown after the settle delay before the next dash
    pub dash_cooldown: f32,
    /// Stamina cost per dash
    pub dash_cost: i32,
    pub attack_damage: i32,
    /// Seconds between attacks
    pub attack_cooldown: f32,
    /// Radius of the attack circle
    pub attack_range: f32,
    /// Distance from the player's center to the attack point
    pub attack_offset: f32,
    /// Seconds between death and removal
    pub death_grace: f32,
}

/// Patrol enemy tuning values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyTuning {
    pub max_health: i32,
    pub patrol_speed: f32,
    pub chase_speed: f32,
    /// Detection radius; once the player is inside, awareness latches
    pub chase_range: f32,
    pub attack_damage: i32,
    /// Engage radius; attacks only start within this distance
    pub attack_range: f32,
    /// Seconds of cooldown after the windup completes
    pub attack_cooldown: f32,
    /// Seconds between attack start and damage application
    pub attack_windup: f32,
    /// Arrival threshold for waypoints
    pub waypoint_epsilon: f32,
    pub death_grace: f32,
}

/// Boss tuning values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossTuning {
    pub max_health: i32,
    pub move_speed: f32,
    pub detection_range: f32,
    pub attack_damage: i32,
    pub attack_range: f32,
    pub attack_cooldown: f32,
    pub attack_windup: f32,
    /// Health value at or below which the one-shot phase transition fires
    pub phase2_threshold: i32,
    /// Permanent movement speed multiplier applied when phase 2 begins
    pub phase2_speed_multiplier: f32,
    /// Seconds the boss holds still while transitioning to phase 2
    pub stun_duration: f32,
    pub death_grace: f32,
}

/// Destructible prop tuning values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestructibleTuning {
    pub max_health: i32,
    /// Stamina restored to the player when the stamina trial succeeds
    pub stamina_restore: i32,
    /// Health restored to the player when the health trial succeeds
    pub health_restore: i32,
    /// Probability in [0, 1] of the stamina trial succeeding
    pub stamina_drop_chance: f32,
    /// Probability in [0, 1] of the health trial succeeding
    pub health_drop_chance: f32,
}

/// Resource containing all combat tuning values.
///
/// Loaded from `assets/config/tuning.ron` at startup.
/// Access via `Res<Tuning>` in systems.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct Tuning {
    pub player: PlayerTuning,
    pub enemy: EnemyTuning,
    pub boss: BossTuning,
    pub destructible: DestructibleTuning,
}

impl Default for Tuning {
    /// In-code defaults matching `assets/config/tuning.ron`, used by tests
    /// that don't want file IO.
    fn default() -> Self {
        Self {
            player: PlayerTuning {
                max_health: 100,
                max_stamina: 75,
                move_speed: 5.0,
                dash_speed: 15.0,
                dash_duration: 1.0,
                dash_settle: 0.1,
                dash_cooldown: 2.0,
                dash_cost: 25,
                attack_damage: 10,
                attack_cooldown: 0.5,
                attack_range: 1.0,
                attack_offset: 0.75,
                death_grace: 2.0,
            },
            enemy: EnemyTuning {
                max_health: 100,
                patrol_speed: 2.0,
                chase_speed: 3.0,
                chase_range: 5.0,
                attack_damage: 10,
                attack_range: 1.0,
                attack_cooldown: 1.0,
                attack_windup: 1.06,
                waypoint_epsilon: 0.2,
                death_grace: 1.0,
            },
            boss: BossTuning {
                max_health: 100,
                move_speed: 3.0,
                detection_range: 10.0,
                attack_damage: 15,
                attack_range: 1.0,
                attack_cooldown: 3.0,
                attack_windup: 0.3,
                phase2_threshold: 50,
                phase2_speed_multiplier: 1.5,
                stun_duration: 2.0,
                death_grace: 1.0,
            },
            destructible: DestructibleTuning {
                max_health: 3,
                stamina_restore: 15,
                health_restore: 20,
                stamina_drop_chance: 0.5,
                health_drop_chance: 0.5,
            },
        }
    }
}

impl Tuning {
    /// Sanity checks on loaded values. Probabilities must be in [0, 1];
    /// durations, speeds, and pool sizes must be positive.
    pub fn validate(&self) -> Result<(), String> {
        let chances = [
            ("stamina_drop_chance", self.destructible.stamina_drop_chance),
            ("health_drop_chance", self.destructible.health_drop_chance),
        ];
        for (name, value) in chances {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{} must be in [0, 1], got {}", name, value));
            }
        }

        let positives = [
            ("player.max_health", self.player.max_health as f32),
            ("player.max_stamina", self.player.max_stamina as f32),
            ("player.dash_duration", self.player.dash_duration),
            ("player.dash_cooldown", self.player.dash_cooldown),
            ("player.attack_cooldown", self.player.attack_cooldown),
            ("enemy.max_health", self.enemy.max_health as f32),
            ("enemy.attack_windup", self.enemy.attack_windup),
            ("enemy.attack_cooldown", self.enemy.attack_cooldown),
            ("enemy.waypoint_epsilon", self.enemy.waypoint_epsilon),
            ("boss.max_health", self.boss.max_health as f32),
            ("boss.attack_windup", self.boss.attack_windup),
            ("boss.stun_duration", self.boss.stun_duration),
            ("destructible.max_health", self.destructible.max_health as f32),
        ];
        for (name, value) in positives {
            if value <= 0.0 {
                return Err(format!("{} must be positive, got {}", name, value));
            }
        }

        if self.boss.phase2_threshold >= self.boss.max_health {
            return Err(format!(
                "boss.phase2_threshold ({}) must be below boss.max_health ({})",
                self.boss.phase2_threshold, self.boss.max_health
            ));
        }

        Ok(())
    }
}

/// Load tuning values from assets/config/tuning.ron
pub fn load_tuning() -> Result<Tuning, String> {
    let config_path = "assets/config/tuning.ron";

    let contents = std::fs::read_to_string(config_path)
        .map_err(|e| format!("Failed to read {}: {}", config_path, e))?;

    let tuning: Tuning =
        ron::from_str(&contents).map_err(|e| format!("Failed to parse {}: {}", config_path, e))?;

    tuning.validate()?;

    info!("Loaded combat tuning from {}", config_path);

    Ok(tuning)
}

/// Bevy plugin for tuning configuration loading
pub struct TuningPlugin;

impl Plugin for TuningPlugin {
    fn build(&self, app: &mut App) {
        match load_tuning() {
            Ok(tuning) => {
                app.insert_resource(tuning);
            }
            Err(e) => {
                // A broken tuning file is a packaging error; fail loudly
                panic!("Failed to load combat tuning: {}", e);
            }
        }
    }
}
