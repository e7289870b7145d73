//! Boss Agent
//!
//! Chaser with a short-windup directional attack and a one-shot phase
//! transition: the first time health falls to the phase threshold or below,
//! the boss is stunned for a fixed recovery, then resumes permanently
//! faster. Detection is re-evaluated every tick and does not latch.

use bevy::prelude::*;

use crate::combat::events::{AnimationEvent, DamageEvent, FacingEvent};
use crate::combat::log::{CombatLog, CombatLogEventType};
use crate::sim::components::{Dead, Facing, Health, PlayerHandle, Velocity};
use crate::sim::enemy::steer_towards;
use crate::sim::scheduler::{ActionCompleted, ActionKind, ActionTimers};
use crate::sim::tuning::Tuning;

#[derive(Component, Debug)]
pub struct Boss {
    /// Current speed; multiplied once by the phase-two recovery
    pub move_speed: f32,
    /// Last non-zero heading, drives the attack animation direction
    pub last_move_direction: Vec2,
    /// Movement and attack transitions are ignored while stunned
    pub stunned: bool,
    /// One-way latch, set the first time health crosses the threshold
    pub entered_phase2: bool,
    walking: bool,
}

impl Boss {
    pub fn new(move_speed: f32) -> Self {
        Self {
            move_speed,
            last_move_direction: Vec2::NEG_Y,
            stunned: false,
            entered_phase2: false,
            walking: false,
        }
    }
}

/// Directional attack animation from the last heading, 0.5 thresholds,
/// default down
fn boss_attack_animation(direction: Vec2) -> &'static str {
    if direction.y > 0.5 {
        "attack_up"
    } else if direction.y < -0.5 {
        "attack_down"
    } else if direction.x > 0.5 {
        "attack_right"
    } else if direction.x < -0.5 {
        "attack_left"
    } else {
        "attack_down"
    }
}

/// Follow the player while detected and start attack windups in range.
///
/// Unlike the patrol enemy, losing detection stops the boss on the spot.
/// While stunned, both following and attack activation are suppressed, but
/// an already-started windup keeps running.
pub fn boss_decide(
    player_handle: Res<PlayerHandle>,
    players: Query<&Transform, Without<Boss>>,
    mut bosses: Query<
        (
            Entity,
            &Transform,
            &mut Boss,
            &mut Velocity,
            &mut Facing,
            &mut ActionTimers,
        ),
        Without<Dead>,
    >,
    tuning: Res<Tuning>,
    mut animation_events: EventWriter<AnimationEvent>,
    mut facing_events: EventWriter<FacingEvent>,
) {
    let player_pos = player_handle
        .0
        .and_then(|entity| players.get(entity).ok())
        .map(|transform| transform.translation.truncate());

    for (entity, transform, mut boss, mut velocity, mut facing, mut timers) in bosses.iter_mut() {
        let pos = transform.translation.truncate();

        let distance = player_pos.map(|p| pos.distance(p));
        let following = distance.is_some_and(|d| d <= tuning.boss.detection_range);

        if following && !boss.stunned {
            let player_pos = player_pos.unwrap_or(pos);
            steer_towards(
                pos,
                player_pos,
                boss.move_speed,
                entity,
                &mut velocity,
                &mut facing,
                &mut facing_events,
            );
            let direction = (player_pos - pos).normalize_or_zero();
            if direction != Vec2::ZERO {
                boss.last_move_direction = direction;
            }
            set_walking(&mut boss, entity, true, &mut animation_events);

            let in_range = distance.is_some_and(|d| d <= tuning.boss.attack_range);
            if in_range
                && !timers.is_pending(ActionKind::AttackWindup)
                && !timers.is_pending(ActionKind::AttackCooldown)
            {
                animation_events.send(AnimationEvent::Trigger {
                    entity,
                    name: boss_attack_animation(boss.last_move_direction),
                });
                timers.start(ActionKind::AttackWindup, tuning.boss.attack_windup);
            }
        } else {
            velocity.0 = Vec2::ZERO;
            set_walking(&mut boss, entity, false, &mut animation_events);
        }
    }
}

fn set_walking(
    boss: &mut Boss,
    entity: Entity,
    walking: bool,
    animation_events: &mut EventWriter<AnimationEvent>,
) {
    if boss.walking != walking {
        boss.walking = walking;
        animation_events.send(AnimationEvent::SetFlag {
            entity,
            name: "is_walking",
            value: walking,
        });
    }
}

/// One-shot phase-two transition.
///
/// Fires the first time health lands at or below the threshold, including
/// when a single hit jumps past it. A hit that would also be lethal never
/// triggers the phase; death handling has already claimed the entity by the
/// time this runs.
pub fn check_boss_phase(
    mut bosses: Query<
        (Entity, &Health, &mut Boss, &mut Velocity, &mut ActionTimers),
        (Changed<Health>, Without<Dead>),
    >,
    tuning: Res<Tuning>,
    mut combat_log: ResMut<CombatLog>,
    mut animation_events: EventWriter<AnimationEvent>,
) {
    for (entity, health, mut boss, mut velocity, mut timers) in bosses.iter_mut() {
        if boss.entered_phase2 || health.0.current() > tuning.boss.phase2_threshold {
            continue;
        }
        boss.entered_phase2 = true;
        boss.stunned = true;
        velocity.0 = Vec2::ZERO;
        set_walking(&mut boss, entity, false, &mut animation_events);
        timers.start(ActionKind::PhaseRecovery, tuning.boss.stun_duration);

        info!("Boss entering phase two");
        combat_log.log(
            CombatLogEventType::Phase,
            "Boss staggers and enters phase two".to_string(),
        );
    }
}

/// Fire boss windups and finish the phase-two recovery.
///
/// Windup damage re-resolves against the current player-slot occupant, and
/// the cooldown starts whether or not anything was hit. Recovery completion
/// applies the permanent speed multiplier and clears the stun.
pub fn handle_boss_completions(
    mut completed: EventReader<ActionCompleted>,
    mut bosses: Query<(&mut Boss, &mut ActionTimers), Without<Dead>>,
    player_handle: Res<PlayerHandle>,
    tuning: Res<Tuning>,
    mut damage_events: EventWriter<DamageEvent>,
    mut combat_log: ResMut<CombatLog>,
) {
    for event in completed.read() {
        let Ok((mut boss, mut timers)) = bosses.get_mut(event.agent) else {
            continue;
        };
        match event.action {
            ActionKind::AttackWindup => {
                if let Some(player_entity) = player_handle.0 {
                    damage_events.send(DamageEvent {
                        source: event.agent,
                        target: player_entity,
                        amount: tuning.boss.attack_damage,
                    });
                }
                timers.start(ActionKind::AttackCooldown, tuning.boss.attack_cooldown);
            }
            ActionKind::PhaseRecovery => {
                boss.move_speed *= tuning.boss.phase2_speed_multiplier;
                boss.stunned = false;
                combat_log.log(
                    CombatLogEventType::Phase,
                    "Boss recovers and moves with renewed speed".to_string(),
                );
            }
            _ => {}
        }
    }
}
