//! Headless simulation mode
//!
//! Runs complete scenarios without rendering, at a fixed tick rate, and
//! writes a structured JSON report. This is the only mode the binary has;
//! visualization is an external concern.
//!
//! # Example scenario
//!
//! ```json
//! {
//!   "player": {
//!     "position": [0.0, 0.0],
//!     "script": [
//!       { "at": 0.1, "command": { "move": { "x": 1.0, "y": 0.0 } } },
//!       { "at": 2.0, "command": "attack" }
//!     ]
//!   },
//!   "enemies": [
//!     { "position": [6.0, 0.0], "waypoints": [[6.0, 0.0], [6.0, 4.0]] }
//!   ],
//!   "random_seed": 42
//! }
//! ```

pub mod config;
pub mod runner;

pub use config::ScenarioConfig;
pub use runner::{run_headless_sim, AgentResult, SimOutcome, SimResult};
