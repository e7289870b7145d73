//! Scripted Input Timeline
//!
//! Headless runs have no input devices; player intent comes from a timed
//! script in the scenario config. Entries fire in timestamp order once the
//! simulation clock passes them, each becoming a [`PlayerCommand`] event.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::sim::player::PlayerCommand;

/// One scriptable player intent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptCommand {
    Move { x: f32, y: f32 },
    StopMove,
    Dash,
    Attack,
}

/// A command and the simulation time (seconds) at which it fires
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScriptEntry {
    pub at: f32,
    pub command: ScriptCommand,
}

/// The player's input timeline for this run
#[derive(Resource, Debug, Default)]
pub struct PlayerScript {
    entries: Vec<ScriptEntry>,
    cursor: usize,
    elapsed: f32,
}

impl PlayerScript {
    /// Build a script, sorting entries by timestamp. Ties keep their
    /// config order.
    pub fn new(mut entries: Vec<ScriptEntry>) -> Self {
        entries.sort_by(|a, b| a.at.total_cmp(&b.at));
        Self {
            entries,
            cursor: 0,
            elapsed: 0.0,
        }
    }
}

/// Emit every script entry whose timestamp has been reached
pub fn replay_player_script(
    time: Res<Time>,
    mut script: ResMut<PlayerScript>,
    mut player_commands: EventWriter<PlayerCommand>,
) {
    script.elapsed += time.delta_secs();
    while script.cursor < script.entries.len() && script.entries[script.cursor].at <= script.elapsed
    {
        let command = script.entries[script.cursor].command;
        player_commands.send(match command {
            ScriptCommand::Move { x, y } => PlayerCommand::Move(Vec2::new(x, y)),
            ScriptCommand::StopMove => PlayerCommand::StopMove,
            ScriptCommand::Dash => PlayerCommand::Dash,
            ScriptCommand::Attack => PlayerCommand::Attack,
        });
        script.cursor += 1;
    }
}
