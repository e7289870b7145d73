//! Timed Action Scheduler
//!
//! Per-agent registry of named countdown timers. Abilities that take time
//! (attack windups, attack cooldowns, the dash window, the boss stun) are
//! modeled as non-blocking timers owned by the agent that started them: the
//! remainder of the action executes later, when the timer expires, while
//! every other agent keeps ticking.
//!
//! Contract:
//! - at most one live timer per [`ActionKind`] per agent; `start` on a
//!   pending kind is rejected (the ability is on cooldown)
//! - the tick system decrements all timers by the frame delta and fires the
//!   ones that cross zero in the order they were registered, as
//!   [`ActionCompleted`] events consumed later in the same frame
//! - `cancel_all` removes every timer without firing; invoked exactly once,
//!   at the moment an agent is confirmed dead
//!
//! Chained sequences (windup -> cooldown, dash motion -> settle -> cooldown)
//! are modeled as the completion handler starting the next timer under a
//! different kind.

use bevy::prelude::*;
use smallvec::SmallVec;

/// The named timed actions agents may have in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Player dash: forced motion along the captured direction
    DashMotion,
    /// Player dash: short settle delay that clears the roll flag
    DashSettle,
    /// Player dash: cooldown before the next dash
    DashCooldown,
    /// Delay between an attack starting and its damage applying
    AttackWindup,
    /// Mandatory delay before the next attack
    AttackCooldown,
    /// Boss phase-2 stun/recovery window
    PhaseRecovery,
}

/// A single in-flight countdown owned by one agent
#[derive(Debug, Clone, Copy)]
pub struct TimedAction {
    pub action: ActionKind,
    pub remaining: f32,
}

/// Event fired when a timer crosses zero. The owning agent's completion
/// handler decides what the expiry means.
#[derive(Event, Debug, Clone, Copy)]
pub struct ActionCompleted {
    pub agent: Entity,
    pub action: ActionKind,
}

/// Per-agent set of in-flight timers, in registration order.
///
/// Owned exclusively by the agent; nothing outside the owning entity's
/// systems mutates it except death-time cancellation.
#[derive(Component, Debug, Default)]
pub struct ActionTimers {
    timers: SmallVec<[TimedAction; 4]>,
}

impl ActionTimers {
    /// Start a timer. Returns false (no-op) when a timer of the same kind is
    /// already pending.
    pub fn start(&mut self, action: ActionKind, duration: f32) -> bool {
        if self.is_pending(action) {
            return false;
        }
        self.timers.push(TimedAction {
            action,
            remaining: duration,
        });
        true
    }

    /// Mid-flight availability query
    pub fn is_pending(&self, action: ActionKind) -> bool {
        self.timers.iter().any(|t| t.action == action)
    }

    /// Remaining time of a pending timer, if any
    pub fn remaining(&self, action: ActionKind) -> Option<f32> {
        self.timers
            .iter()
            .find(|t| t.action == action)
            .map(|t| t.remaining)
    }

    /// Remove every timer without firing completions
    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Advance all timers by `dt`, returning the kinds that crossed zero in
    /// registration order. Fired timers are removed.
    pub fn advance(&mut self, dt: f32) -> SmallVec<[ActionKind; 4]> {
        let mut fired = SmallVec::new();
        let mut i = 0;
        while i < self.timers.len() {
            self.timers[i].remaining -= dt;
            if self.timers[i].remaining <= 0.0 {
                fired.push(self.timers.remove(i).action);
            } else {
                i += 1;
            }
        }
        fired
    }
}

/// Advance every agent's timers and fire completion events.
///
/// Runs in the timers phase, before state machines make this frame's
/// decisions, so a completion and the decision it unblocks land in the same
/// frame in a deterministic order.
pub fn tick_action_timers(
    time: Res<Time>,
    mut agents: Query<(Entity, &mut ActionTimers)>,
    mut completed: EventWriter<ActionCompleted>,
) {
    let dt = time.delta_secs();
    for (entity, mut timers) in agents.iter_mut() {
        for action in timers.advance(dt) {
            completed.send(ActionCompleted {
                agent: entity,
                action,
            });
        }
    }
}
