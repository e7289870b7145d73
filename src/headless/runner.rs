//! Headless Simulation Runner
//!
//! Builds a windowless Bevy app around the simulation core, spawns the
//! scenario's agents, runs at a fixed 60 ticks per second until an end
//! condition hits, then writes a JSON report (outcome, per-agent numbers,
//! and the full combat log).

use bevy::app::ScheduleRunnerPlugin;
use bevy::app::{App, AppExit};
use bevy::hierarchy::HierarchyPlugin;
use bevy::prelude::*;
use bevy::transform::TransformPlugin;
use serde::Serialize;
use std::fs;
use std::time::Duration;

use crate::combat::log::{CombatLog, CombatLogEntry, CombatLogEventType};
use crate::combat::CombatPlugin;
use crate::headless::config::ScenarioConfig;
use crate::sim::boss::Boss;
use crate::sim::components::{CombatStats, Dead, GameRng, Health, PlayerHandle};
use crate::sim::enemy::PatrolEnemy;
use crate::sim::player::Player;
use crate::sim::resolver::Graveyard;
use crate::sim::roomgen::simple_random_walk;
use crate::sim::script::PlayerScript;
use crate::sim::tuning::{Tuning, TuningPlugin};
use crate::sim::{
    spawn_boss, spawn_destructible, spawn_patrol_enemy, spawn_player, SimPlugin,
};

const TICK_RATE: f64 = 60.0;
const DEFAULT_REPORT_PATH: &str = "crawlsim_report.json";

/// How the run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SimOutcome {
    /// Every hostile died while the player (if any) survived
    AreaCleared,
    /// The player died
    PlayerFell,
    /// The duration cap elapsed first
    TimedOut,
}

/// Final numbers for one agent
#[derive(Debug, Clone, Serialize)]
pub struct AgentResult {
    pub name: String,
    pub max_health: i32,
    pub final_health: i32,
    pub survived: bool,
    pub damage_dealt: i32,
    pub damage_taken: i32,
}

/// Everything the run produced, also serialized into the report
#[derive(Debug, Clone, Serialize)]
pub struct SimResult {
    pub outcome: SimOutcome,
    pub sim_time: f32,
    pub random_seed: Option<u64>,
    /// Floor tile count of the carved boss room, when a boss was present
    pub boss_room_tiles: Option<usize>,
    pub agents: Vec<AgentResult>,
}

/// The full JSON report written at the end of a run
#[derive(Serialize)]
struct SimReport<'a> {
    #[serde(flatten)]
    result: &'a SimResult,
    log: &'a [CombatLogEntry],
}

/// Run-level bookkeeping for the headless app
#[derive(Resource)]
pub struct HeadlessSimState {
    pub max_duration: f32,
    pub elapsed_time: f32,
    pub output_path: Option<String>,
    pub sim_complete: bool,
    pub random_seed: Option<u64>,
    pub had_player: bool,
    pub had_hostiles: bool,
    pub boss_room_tiles: Option<usize>,
    pub result: Option<SimResult>,
}

/// Plugin wiring a scenario into the simulation core
pub struct HeadlessPlugin {
    pub config: ScenarioConfig,
}

impl Plugin for HeadlessPlugin {
    fn build(&self, app: &mut App) {
        let config = self.config.clone();

        app.insert_resource(HeadlessSimState {
            max_duration: config.max_duration_secs,
            elapsed_time: 0.0,
            output_path: config.output_path.clone(),
            sim_complete: false,
            random_seed: config.random_seed,
            had_player: config.player.is_some(),
            had_hostiles: config.has_hostiles(),
            boss_room_tiles: None,
            result: None,
        });

        match config.random_seed {
            Some(seed) => app.insert_resource(GameRng::from_seed(seed)),
            None => app.insert_resource(GameRng::from_entropy()),
        };
        app.insert_resource(PlayerScript::new(
            config
                .player
                .as_ref()
                .map(|p| p.script.clone())
                .unwrap_or_default(),
        ));
        app.insert_resource(config);

        app.add_systems(Startup, setup_scenario).add_systems(
            Update,
            (headless_track_time, headless_check_sim_end)
                .chain()
                .after(crate::sim::systems::SimSystemPhase::Resolution),
        );
        app.add_systems(PostUpdate, headless_exit_on_complete);
    }
}

fn setup_scenario(
    mut commands: Commands,
    config: Res<ScenarioConfig>,
    tuning: Res<Tuning>,
    mut rng: ResMut<GameRng>,
    mut player_handle: ResMut<PlayerHandle>,
    mut combat_log: ResMut<CombatLog>,
    mut state: ResMut<HeadlessSimState>,
) {
    combat_log.clear();
    combat_log.log(
        CombatLogEventType::SimEvent,
        "Simulation started".to_string(),
    );

    if let Some(player) = &config.player {
        spawn_player(
            &mut commands,
            &mut player_handle,
            &tuning,
            Vec2::from(player.position),
        );
    } else {
        warn!("scenario has no player; player-relative behaviors are disabled");
        combat_log.log(
            CombatLogEventType::SimEvent,
            "No player in scenario".to_string(),
        );
    }

    for (i, enemy) in config.enemies.iter().enumerate() {
        let name = format!("Patrol Enemy {}", i + 1);
        if enemy.waypoints.is_empty() {
            warn!("{} has no patrol waypoints; it will hold position", name);
        }
        let waypoints = enemy.waypoints.iter().map(|&p| Vec2::from(p)).collect();
        spawn_patrol_enemy(
            &mut commands,
            &tuning,
            name,
            Vec2::from(enemy.position),
            waypoints,
        );
    }

    if let Some(boss) = &config.boss {
        spawn_boss(&mut commands, &tuning, Vec2::from(boss.position));
        let floor = simple_random_walk(IVec2::ZERO, config.room_walk_length, &mut rng);
        state.boss_room_tiles = Some(floor.len());
        combat_log.log(
            CombatLogEventType::SimEvent,
            format!("Carved boss room with {} floor tiles", floor.len()),
        );
    }

    for (i, prop) in config.destructibles.iter().enumerate() {
        spawn_destructible(
            &mut commands,
            &tuning,
            format!("Crate {}", i + 1),
            Vec2::from(prop.position),
        );
    }

    info!(
        "Scenario ready: player={}, enemies={}, boss={}, destructibles={}",
        config.player.is_some(),
        config.enemies.len(),
        config.boss.is_some(),
        config.destructibles.len()
    );
}

fn headless_track_time(time: Res<Time>, mut state: ResMut<HeadlessSimState>) {
    if !state.sim_complete {
        state.elapsed_time += time.delta_secs();
    }
}

/// Check end conditions and assemble the result once one hits.
///
/// Player death ends the run the tick it happens, so the report still sees
/// every agent before corpses despawn. An all-hostiles-dead sweep ends it
/// with a clear.
fn headless_check_sim_end(
    mut state: ResMut<HeadlessSimState>,
    player_handle: Res<PlayerHandle>,
    players: Query<Option<&Dead>, With<Player>>,
    live_hostiles: Query<(), (Or<(With<PatrolEnemy>, With<Boss>)>, Without<Dead>)>,
    agents: Query<(&Name, &Health, &CombatStats, Option<&Dead>)>,
    graveyard: Res<Graveyard>,
    mut combat_log: ResMut<CombatLog>,
) {
    if state.sim_complete {
        return;
    }

    let player_fell = state.had_player
        && match player_handle.0 {
            Some(entity) => players.get(entity).map(|d| d.is_some()).unwrap_or(true),
            None => true,
        };

    let outcome = if player_fell {
        Some(SimOutcome::PlayerFell)
    } else if state.had_hostiles && live_hostiles.is_empty() {
        Some(SimOutcome::AreaCleared)
    } else if state.elapsed_time >= state.max_duration {
        Some(SimOutcome::TimedOut)
    } else {
        None
    };
    let Some(outcome) = outcome else {
        return;
    };

    state.sim_complete = true;

    let mut results: Vec<AgentResult> = graveyard
        .0
        .iter()
        .map(|fallen| AgentResult {
            name: fallen.name.clone(),
            max_health: fallen.max_health,
            final_health: fallen.final_health,
            survived: false,
            damage_dealt: fallen.damage_dealt,
            damage_taken: fallen.damage_taken,
        })
        .collect();
    for (name, health, stats, dead) in agents.iter() {
        results.push(AgentResult {
            name: name.as_str().to_string(),
            max_health: health.0.max(),
            final_health: health.0.current(),
            survived: dead.is_none(),
            damage_dealt: stats.damage_dealt,
            damage_taken: stats.damage_taken,
        });
    }

    let result = SimResult {
        outcome,
        sim_time: state.elapsed_time,
        random_seed: state.random_seed,
        boss_room_tiles: state.boss_room_tiles,
        agents: results,
    };

    combat_log.log(
        CombatLogEventType::SimEvent,
        format!("Simulation ended: {:?} after {:.2}s", outcome, state.elapsed_time),
    );
    info!("Simulation ended: {:?} after {:.2}s", outcome, state.elapsed_time);

    save_sim_report(&result, &combat_log, state.output_path.as_deref());
    state.result = Some(result);
}

fn save_sim_report(result: &SimResult, combat_log: &CombatLog, output_path: Option<&str>) {
    let report = SimReport {
        result,
        log: &combat_log.entries,
    };
    let path = output_path.unwrap_or(DEFAULT_REPORT_PATH);
    match serde_json::to_string_pretty(&report) {
        Ok(json) => match fs::write(path, json) {
            Ok(()) => info!("Report written to {}", path),
            Err(e) => error!("Failed to write report to {}: {}", path, e),
        },
        Err(e) => error!("Failed to serialize report: {}", e),
    }
}

fn headless_exit_on_complete(state: Res<HeadlessSimState>, mut exit: EventWriter<AppExit>) {
    if state.sim_complete {
        exit.send(AppExit::Success);
    }
}

/// Run a scenario to completion. Blocks until an end condition hits.
pub fn run_headless_sim(config: ScenarioConfig) -> Result<(), String> {
    config.validate()?;

    println!("Starting headless simulation");
    println!("  Max duration: {}s", config.max_duration_secs);
    match config.random_seed {
        Some(seed) => println!("  Seed: {} (deterministic)", seed),
        None => println!("  Seed: system entropy"),
    }

    App::new()
        .add_plugins(
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
                1.0 / TICK_RATE,
            ))),
        )
        .add_plugins(bevy::log::LogPlugin::default())
        .add_plugins(TransformPlugin)
        .add_plugins(HierarchyPlugin)
        .add_plugins(TuningPlugin)
        .add_plugins(CombatPlugin)
        .add_plugins(SimPlugin)
        .add_plugins(HeadlessPlugin { config })
        .run();

    Ok(())
}
