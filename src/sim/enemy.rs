//! Patrol Enemy Agent
//!
//! Three-state melee grunt: patrols a waypoint loop until the player comes
//! close enough, then chases forever (awareness latches) and attacks with a
//! long windup when in range.

use bevy::prelude::*;

use crate::combat::events::{AnimationEvent, DamageEvent, FacingEvent};
use crate::sim::components::{Dead, Facing, PlayerHandle, Velocity};
use crate::sim::scheduler::{ActionCompleted, ActionKind, ActionTimers};
use crate::sim::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnemyState {
    #[default]
    Patrolling,
    Chasing,
    Attacking,
}

#[derive(Component, Debug)]
pub struct PatrolEnemy {
    pub state: EnemyState,
    /// Waypoint loop walked while patrolling; empty means hold position
    pub waypoints: Vec<Vec2>,
    pub waypoint_index: usize,
    /// Latched on first player contact, never resets
    pub aware: bool,
}

impl PatrolEnemy {
    pub fn new(waypoints: Vec<Vec2>) -> Self {
        Self {
            state: EnemyState::Patrolling,
            waypoints,
            waypoint_index: 0,
            aware: false,
        }
    }
}

/// Recompute each enemy's state from player distance and act on it.
///
/// Awareness is a one-way latch: once the player has come within chase
/// range, the enemy never returns to patrolling, even if the player later
/// outruns it or dies. With no player present the current state is kept.
pub fn enemy_decide(
    player_handle: Res<PlayerHandle>,
    players: Query<&Transform, Without<PatrolEnemy>>,
    mut enemies: Query<
        (
            Entity,
            &Transform,
            &mut PatrolEnemy,
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

    for (entity, transform, mut enemy, mut velocity, mut facing, mut timers) in enemies.iter_mut()
    {
        let pos = transform.translation.truncate();

        if let Some(player_pos) = player_pos {
            let distance = pos.distance(player_pos);
            if distance < tuning.enemy.chase_range {
                enemy.aware = true;
            }
            enemy.state = if !enemy.aware {
                EnemyState::Patrolling
            } else if distance <= tuning.enemy.attack_range {
                EnemyState::Attacking
            } else {
                EnemyState::Chasing
            };
        }

        match enemy.state {
            EnemyState::Patrolling => {
                if enemy.waypoints.is_empty() {
                    velocity.0 = Vec2::ZERO;
                    continue;
                }
                let target = enemy.waypoints[enemy.waypoint_index];
                steer_towards(
                    pos,
                    target,
                    tuning.enemy.patrol_speed,
                    entity,
                    &mut velocity,
                    &mut facing,
                    &mut facing_events,
                );
                if pos.distance(target) < tuning.enemy.waypoint_epsilon {
                    enemy.waypoint_index = (enemy.waypoint_index + 1) % enemy.waypoints.len();
                }
            }
            EnemyState::Chasing => {
                if let Some(player_pos) = player_pos {
                    steer_towards(
                        pos,
                        player_pos,
                        tuning.enemy.chase_speed,
                        entity,
                        &mut velocity,
                        &mut facing,
                        &mut facing_events,
                    );
                } else {
                    velocity.0 = Vec2::ZERO;
                }
            }
            EnemyState::Attacking => {
                velocity.0 = Vec2::ZERO;
                if !timers.is_pending(ActionKind::AttackWindup)
                    && !timers.is_pending(ActionKind::AttackCooldown)
                {
                    animation_events.send(AnimationEvent::Trigger {
                        entity,
                        name: "attack",
                    });
                    timers.start(ActionKind::AttackWindup, tuning.enemy.attack_windup);
                }
            }
        }
    }
}

/// Fire enemy windups that completed this tick.
///
/// The hit re-resolves at fire time: whoever holds the player slot then
/// takes the damage, and a vanished player makes the hit a no-op. The
/// cooldown starts either way.
pub fn handle_enemy_completions(
    mut completed: EventReader<ActionCompleted>,
    mut enemies: Query<&mut ActionTimers, (With<PatrolEnemy>, Without<Dead>)>,
    player_handle: Res<PlayerHandle>,
    tuning: Res<Tuning>,
    mut damage_events: EventWriter<DamageEvent>,
) {
    for event in completed.read() {
        if event.action != ActionKind::AttackWindup {
            continue;
        }
        let Ok(mut timers) = enemies.get_mut(event.agent) else {
            continue;
        };
        if let Some(player_entity) = player_handle.0 {
            damage_events.send(DamageEvent {
                source: event.agent,
                target: player_entity,
                amount: tuning.enemy.attack_damage,
            });
        }
        timers.start(ActionKind::AttackCooldown, tuning.enemy.attack_cooldown);
    }
}

/// Point velocity at `target` and flip facing when the heading crosses zero
pub(crate) fn steer_towards(
    pos: Vec2,
    target: Vec2,
    speed: f32,
    entity: Entity,
    velocity: &mut Velocity,
    facing: &mut Facing,
    facing_events: &mut EventWriter<FacingEvent>,
) {
    let direction = (target - pos).normalize_or_zero();
    velocity.0 = direction * speed;

    let desired = if direction.x > 0.0 {
        Some(Facing::Right)
    } else if direction.x < 0.0 {
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
