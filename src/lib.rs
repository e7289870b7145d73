//! CrawlSim - Headless Top-Down Combat Simulation Prototype
//!
//! A deterministic, tick-based simulation of a small combat scene: a scripted
//! player, a patrolling melee enemy, a two-phase boss, and destructible props.
//! Agents run per-frame behavior state machines that gate abilities behind
//! named countdown timers and resource costs; damage flows through a uniform
//! damageable capability.
//!
//! This library exposes the core simulation modules for testing and reuse.

pub mod cli;
pub mod combat;
pub mod headless;
pub mod sim;

// Re-export commonly used types
pub use combat::log::{CombatLog, CombatLogEventType};
pub use headless::ScenarioConfig;
pub use sim::components::ResourcePool;
pub use sim::scheduler::{ActionKind, ActionTimers};
