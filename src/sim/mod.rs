//! Combat Simulation Core
//!
//! Agents (player, patrol enemies, a boss, destructible props) driven by
//! per-agent action timers and per-tick decision logic, with all health
//! mutation funneled through the damage resolver. Rendering, physics, and
//! input devices are out of scope; animation and facing changes surface as
//! events for an external sink.

use bevy::prelude::*;

pub mod boss;
pub mod components;
pub mod destructible;
pub mod enemy;
pub mod player;
pub mod resolver;
pub mod roomgen;
pub mod scheduler;
pub mod script;
pub mod spatial;
pub mod systems;
pub mod tuning;

use components::{
    CombatStats, Damageable, DeathGrace, Facing, GameRng, Health, LayerMask, PlayerHandle,
    ResourcePool, Stamina, Velocity,
};
use resolver::Graveyard;
use scheduler::ActionTimers;
use script::PlayerScript;
use tuning::Tuning;

pub struct SimPlugin;

impl Plugin for SimPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerHandle>()
            .init_resource::<GameRng>()
            .init_resource::<PlayerScript>()
            .init_resource::<Graveyard>()
            .add_event::<scheduler::ActionCompleted>()
            .add_event::<player::PlayerCommand>();

        systems::configure_sim_system_ordering(app);
        systems::add_core_sim_systems(app);
    }
}

/// Integrate velocity into position
pub fn apply_velocity(time: Res<Time>, mut movers: Query<(&Velocity, &mut Transform)>) {
    let dt = time.delta_secs();
    for (velocity, mut transform) in movers.iter_mut() {
        transform.translation += velocity.0.extend(0.0) * dt;
    }
}

/// Spawn the player and register it in the player slot
pub fn spawn_player(
    commands: &mut Commands,
    player_handle: &mut PlayerHandle,
    tuning: &Tuning,
    position: Vec2,
) -> Entity {
    let entity = commands
        .spawn((
            Name::new("Player"),
            player::Player::default(),
            Health(ResourcePool::new(tuning.player.max_health)),
            Stamina(ResourcePool::new(tuning.player.max_stamina)),
            Velocity::default(),
            Facing::default(),
            ActionTimers::default(),
            CombatStats::default(),
            Damageable {
                layer: LayerMask::PLAYER,
            },
            DeathGrace(tuning.player.death_grace),
            Transform::from_translation(position.extend(0.0)),
        ))
        .id();
    player_handle.0 = Some(entity);
    entity
}

/// Spawn a patrol enemy. An empty waypoint list is legal; the enemy holds
/// position until it becomes aware.
pub fn spawn_patrol_enemy(
    commands: &mut Commands,
    tuning: &Tuning,
    name: String,
    position: Vec2,
    waypoints: Vec<Vec2>,
) -> Entity {
    commands
        .spawn((
            Name::new(name),
            enemy::PatrolEnemy::new(waypoints),
            Health(ResourcePool::new(tuning.enemy.max_health)),
            Velocity::default(),
            Facing::default(),
            ActionTimers::default(),
            CombatStats::default(),
            Damageable {
                layer: LayerMask::HOSTILE,
            },
            DeathGrace(tuning.enemy.death_grace),
            Transform::from_translation(position.extend(0.0)),
        ))
        .id()
}

pub fn spawn_boss(commands: &mut Commands, tuning: &Tuning, position: Vec2) -> Entity {
    commands
        .spawn((
            Name::new("Boss"),
            boss::Boss::new(tuning.boss.move_speed),
            Health(ResourcePool::new(tuning.boss.max_health)),
            Velocity::default(),
            Facing::default(),
            ActionTimers::default(),
            CombatStats::default(),
            Damageable {
                layer: LayerMask::HOSTILE,
            },
            DeathGrace(tuning.boss.death_grace),
            Transform::from_translation(position.extend(0.0)),
        ))
        .id()
}

/// Spawn a destructible prop. No grace period; props vanish on death.
pub fn spawn_destructible(
    commands: &mut Commands,
    tuning: &Tuning,
    name: String,
    position: Vec2,
) -> Entity {
    commands
        .spawn((
            Name::new(name),
            destructible::Destructible::from_tuning(&tuning.destructible),
            Health(ResourcePool::new(tuning.destructible.max_health)),
            CombatStats::default(),
            Damageable {
                layer: LayerMask::DESTRUCTIBLE,
            },
            DeathGrace(0.0),
            Transform::from_translation(position.extend(0.0)),
        ))
        .id()
}
