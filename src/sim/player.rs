//! Player Agent
//!
//! Command-driven agent: movement, a timer-chained dash (motion, settle,
//! cooldown), and a four-way melee attack with an availability cooldown.
//! Commands arrive as [`PlayerCommand`] events, normally emitted by the
//! scripted input timeline.

use bevy::prelude::*;

use crate::combat::events::{AnimationEvent, DamageEvent, FacingEvent};
use crate::sim::components::{Dead, Facing, LayerMask, PlayerHandle, Stamina, Velocity};
use crate::sim::scheduler::{ActionCompleted, ActionKind, ActionTimers};
use crate::sim::spatial::{query_circle, DamageableQuery};
use crate::sim::tuning::Tuning;

/// Player locomotion state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerState {
    #[default]
    Free,
    Dashing,
}

#[derive(Component, Debug, Default)]
pub struct Player {
    pub state: PlayerState,
    /// Current movement input, zero when idle
    pub move_input: Vec2,
    /// Input held before the last stop, used for idle attack direction
    pub last_input: Vec2,
    /// Direction captured at dash activation
    pub dash_direction: Vec2,
}

/// Discrete player intents, applied in arrival order within a tick
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum PlayerCommand {
    Move(Vec2),
    StopMove,
    Dash,
    Attack,
}

/// Dash availability: no stage of the previous dash chain may be pending
pub fn dash_ready(timers: &ActionTimers) -> bool {
    !timers.is_pending(ActionKind::DashMotion)
        && !timers.is_pending(ActionKind::DashSettle)
        && !timers.is_pending(ActionKind::DashCooldown)
}

/// Four-way attack direction from movement input, vertical wins ties.
/// Defaults to down when there is no input to go by.
fn attack_direction(input: Vec2) -> (&'static str, Vec2) {
    if input.y > 0.0 {
        ("attack_up", Vec2::Y)
    } else if input.y < 0.0 {
        ("attack_down", Vec2::NEG_Y)
    } else if input.x > 0.0 {
        ("attack_right", Vec2::X)
    } else if input.x < 0.0 {
        ("attack_left", Vec2::NEG_X)
    } else {
        ("attack_down", Vec2::NEG_Y)
    }
}

/// Consume this tick's [`PlayerCommand`]s.
///
/// Dash activates only when the whole previous chain has elapsed and the
/// stamina spend succeeds; a rejected spend leaves the pool untouched. Attack
/// activates unless its cooldown is pending, fixing direction and targets at
/// the instant of activation. Attacking during a dash is allowed.
pub fn apply_player_commands(
    mut player_commands: EventReader<PlayerCommand>,
    player_handle: Res<PlayerHandle>,
    mut players: Query<
        (Entity, &Transform, &mut Player, &mut Stamina, &mut ActionTimers),
        Without<Dead>,
    >,
    targets: DamageableQuery,
    tuning: Res<Tuning>,
    mut damage_events: EventWriter<DamageEvent>,
    mut animation_events: EventWriter<AnimationEvent>,
) {
    let Some(player_entity) = player_handle.0 else {
        player_commands.clear();
        return;
    };
    let Ok((entity, transform, mut player, mut stamina, mut timers)) =
        players.get_mut(player_entity)
    else {
        player_commands.clear();
        return;
    };

    for command in player_commands.read() {
        match *command {
            PlayerCommand::Move(input) => {
                player.move_input = input;
                animation_events.send(AnimationEvent::SetFlag {
                    entity,
                    name: "is_walking",
                    value: true,
                });
            }
            PlayerCommand::StopMove => {
                player.last_input = player.move_input;
                player.move_input = Vec2::ZERO;
                animation_events.send(AnimationEvent::SetFlag {
                    entity,
                    name: "is_walking",
                    value: false,
                });
            }
            PlayerCommand::Dash => {
                if !dash_ready(&timers) {
                    continue;
                }
                if !stamina.0.spend(tuning.player.dash_cost) {
                    continue;
                }
                player.state = PlayerState::Dashing;
                player.dash_direction = player.move_input.normalize_or_zero();
                timers.start(ActionKind::DashMotion, tuning.player.dash_duration);
                animation_events.send(AnimationEvent::SetFlag {
                    entity,
                    name: "is_rolling",
                    value: true,
                });
            }
            PlayerCommand::Attack => {
                if timers.is_pending(ActionKind::AttackCooldown) {
                    continue;
                }
                let input = if player.move_input != Vec2::ZERO {
                    player.move_input
                } else {
                    player.last_input
                };
                let (animation, direction) = attack_direction(input);
                animation_events.send(AnimationEvent::Trigger {
                    entity,
                    name: animation,
                });

                let attack_point =
                    transform.translation.truncate() + direction * tuning.player.attack_offset;
                let mask = LayerMask::HOSTILE.union(LayerMask::DESTRUCTIBLE);
                for target in query_circle(attack_point, tuning.player.attack_range, mask, &targets)
                {
                    if target == entity {
                        continue;
                    }
                    damage_events.send(DamageEvent {
                        source: entity,
                        target,
                        amount: tuning.player.attack_damage,
                    });
                }
                timers.start(ActionKind::AttackCooldown, tuning.player.attack_cooldown);
            }
        }
    }
}

/// Advance the dash chain when its stages complete.
///
/// Motion end zeroes velocity and starts the settle delay; settle end clears
/// the roll flag, returns control, and starts the cooldown. The dash is
/// available again only once the cooldown itself has elapsed.
pub fn handle_player_completions(
    mut completed: EventReader<ActionCompleted>,
    mut players: Query<(&mut Player, &mut Velocity, &mut ActionTimers), Without<Dead>>,
    tuning: Res<Tuning>,
    mut animation_events: EventWriter<AnimationEvent>,
) {
    for event in completed.read() {
        let Ok((mut player, mut velocity, mut timers)) = players.get_mut(event.agent) else {
            continue;
        };
        match event.action {
            ActionKind::DashMotion => {
                velocity.0 = Vec2::ZERO;
                timers.start(ActionKind::DashSettle, tuning.player.dash_settle);
            }
            ActionKind::DashSettle => {
                player.state = PlayerState::Free;
                timers.start(ActionKind::DashCooldown, tuning.player.dash_cooldown);
                animation_events.send(AnimationEvent::SetFlag {
                    entity: event.agent,
                    name: "is_rolling",
                    value: false,
                });
            }
            // Cooldown expiry needs no action: availability is the absence
            // of the pending timer.
            _ => {}
        }
    }
}

/// Derive velocity and facing from the player's state.
///
/// Input steers movement only in the `Free` state; the dash overrides it
/// with the captured direction for the motion stage, and the settle stage
/// keeps the body planted.
pub fn player_movement(
    mut players: Query<(Entity, &Player, &ActionTimers, &mut Velocity, &mut Facing), Without<Dead>>,
    tuning: Res<Tuning>,
    mut facing_events: EventWriter<FacingEvent>,
) {
    for (entity, player, timers, mut velocity, mut facing) in players.iter_mut() {
        match player.state {
            PlayerState::Free => {
                velocity.0 = player.move_input * tuning.player.move_speed;
            }
            PlayerState::Dashing => {
                if timers.is_pending(ActionKind::DashMotion) {
                    velocity.0 = player.dash_direction * tuning.player.dash_speed;
                }
                // Settle stage: velocity stays at the zero set on motion end
            }
        }

        let desired = if player.move_input.x > 0.0 {
            Some(Facing::Right)
        } else if player.move_input.x < 0.0 {
            Some(Facing::Left)
        } else {
            None
        };
        if let Some(desired) = desired {
            if *facing != desired {
                *facing = desired;
                facing_events.send(FacingEvent {
                    entity,
                    facing: desired,
                });
            }
        }
    }
}
