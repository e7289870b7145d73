//! Damage resolution and death handling
//!
//! Consumes the frame's [`DamageEvent`]s: every eligible target is hit
//! exactly once per event, death triggers exactly once per entity, and a
//! dead entity absorbs further damage as a no-op. Also resolves destructible
//! reward drops and the deferred removal of corpses.

use bevy::prelude::*;

use crate::combat::events::{AnimationEvent, DamageEvent, DeathEvent, DropEvent};
use crate::combat::log::CombatLog;
use crate::sim::components::{
    CombatStats, Dead, DeathGrace, DespawnAfter, GameRng, Health, PlayerHandle, Stamina, Velocity,
};
use crate::sim::destructible::Destructible;
use crate::sim::player::Player;
use crate::sim::scheduler::ActionTimers;

fn display_name(names: &Query<&Name>, entity: Entity) -> String {
    names
        .get(entity)
        .map(|n| n.as_str().to_string())
        .unwrap_or_else(|_| "Unknown".to_string())
}

/// Apply this frame's damage events and trigger deaths.
///
/// Death is a two-step protocol: the entity is marked `Dead` and its own
/// pending timers are cancelled immediately, then a pure removal is
/// scheduled after the agent's grace period. Damage against a target that
/// died earlier this frame (or any earlier frame) is absorbed, and absorbed
/// hits never reach the combat log; logged hits correspond one-to-one with
/// applied damage.
pub fn apply_damage_events(
    mut commands: Commands,
    mut damage_events: EventReader<DamageEvent>,
    mut targets: Query<(
        &mut Health,
        Option<&mut Velocity>,
        Option<&mut ActionTimers>,
        Option<&DeathGrace>,
        Option<&Dead>,
    )>,
    mut stats: Query<&mut CombatStats>,
    names: Query<&Name>,
    mut combat_log: ResMut<CombatLog>,
    mut death_events: EventWriter<DeathEvent>,
    mut animation_events: EventWriter<AnimationEvent>,
) {
    // Dead markers inserted below only land after this system's commands
    // flush; track same-frame deaths locally to keep death single-fire.
    let mut died_this_frame: Vec<Entity> = Vec::new();

    for event in damage_events.read() {
        let Ok((mut health, velocity, timers, grace, dead)) = targets.get_mut(event.target) else {
            // Target already removed from the simulation
            continue;
        };
        if dead.is_some() || died_this_frame.contains(&event.target) {
            continue;
        }

        health.0.damage(event.amount);
        animation_events.send(AnimationEvent::Trigger {
            entity: event.target,
            name: "take_damage",
        });

        if let Ok(mut source_stats) = stats.get_mut(event.source) {
            source_stats.damage_dealt += event.amount;
        }
        if let Ok(mut target_stats) = stats.get_mut(event.target) {
            target_stats.damage_taken += event.amount;
        }

        let source_name = display_name(&names, event.source);
        let target_name = display_name(&names, event.target);
        let message = format!(
            "{} hits {} for {} ({} HP left)",
            source_name,
            target_name,
            event.amount,
            health.0.current()
        );
        combat_log.log_damage(source_name, target_name, event.amount, message);

        if health.0.is_depleted() {
            died_this_frame.push(event.target);

            if let Some(mut velocity) = velocity {
                velocity.0 = Vec2::ZERO;
            }
            if let Some(mut timers) = timers {
                timers.cancel_all();
            }

            let grace = grace.map(|g| g.0).unwrap_or(0.0);
            commands
                .entity(event.target)
                .insert((Dead, DespawnAfter { remaining: grace }));

            animation_events.send(AnimationEvent::Trigger {
                entity: event.target,
                name: "die",
            });
            death_events.send(DeathEvent {
                victim: event.target,
                killer: event.source,
            });
        }
    }
}

/// Resolve destructible reward drops.
///
/// Two independent Bernoulli trials per destructible death, one for stamina
/// and one for health; each success restores a fixed amount to the player's
/// corresponding pool. With no (living) player the drop degrades to a no-op.
pub fn resolve_drops(
    mut death_events: EventReader<DeathEvent>,
    destructibles: Query<&Destructible>,
    player_handle: Res<PlayerHandle>,
    mut players: Query<(&mut Health, &mut Stamina), (With<Player>, Without<Dead>)>,
    mut rng: ResMut<GameRng>,
    mut drop_events: EventWriter<DropEvent>,
) {
    for event in death_events.read() {
        let Ok(destructible) = destructibles.get(event.victim) else {
            continue;
        };
        let Some(player_entity) = player_handle.0 else {
            continue;
        };
        let Ok((mut health, mut stamina)) = players.get_mut(player_entity) else {
            continue;
        };

        let stamina_restored = if rng.random_f32() < destructible.stamina_drop_chance {
            stamina.0.restore(destructible.stamina_restore);
            Some(destructible.stamina_restore)
        } else {
            None
        };

        let health_restored = if rng.random_f32() < destructible.health_drop_chance {
            health.0.restore(destructible.health_restore);
            Some(destructible.health_restore)
        } else {
            None
        };

        drop_events.send(DropEvent {
            source: event.victim,
            stamina_restored,
            health_restored,
        });
    }
}

/// A removed agent's final numbers, kept for the end-of-run report
#[derive(Debug, Clone)]
pub struct FallenAgent {
    pub name: String,
    pub max_health: i32,
    pub final_health: i32,
    pub damage_dealt: i32,
    pub damage_taken: i32,
}

/// Agents removed from the simulation after their death grace elapsed
#[derive(Resource, Default)]
pub struct Graveyard(pub Vec<FallenAgent>);

/// Advance removal grace timers and despawn expired corpses.
///
/// Final numbers are recorded in the [`Graveyard`] before the entity goes
/// away so the report still covers agents that fell early.
pub fn tick_despawn_after(
    time: Res<Time>,
    mut commands: Commands,
    mut player_handle: ResMut<PlayerHandle>,
    mut graveyard: ResMut<Graveyard>,
    mut corpses: Query<(
        Entity,
        &mut DespawnAfter,
        Option<&Name>,
        Option<&Health>,
        Option<&CombatStats>,
    )>,
) {
    let dt = time.delta_secs();
    for (entity, mut despawn, name, health, stats) in corpses.iter_mut() {
        despawn.remaining -= dt;
        if despawn.remaining > 0.0 {
            continue;
        }

        graveyard.0.push(FallenAgent {
            name: name
                .map(|n| n.as_str().to_string())
                .unwrap_or_else(|| "Unknown".to_string()),
            max_health: health.map(|h| h.0.max()).unwrap_or(0),
            final_health: health.map(|h| h.0.current()).unwrap_or(0),
            damage_dealt: stats.map(|s| s.damage_dealt).unwrap_or(0),
            damage_taken: stats.map(|s| s.damage_taken).unwrap_or(0),
        });

        if player_handle.0 == Some(entity) {
            player_handle.0 = None;
        }
        commands.entity(entity).despawn();
    }
}
