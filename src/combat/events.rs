//! Combat events
//!
//! Defines the events that flow between the behavior state machines, the
//! damage resolver, and the external sinks (animation, facing).

use bevy::prelude::*;

use crate::sim::components::Facing;

/// Event requesting damage application against a single target.
///
/// The sole combat path to health mutation: state machines and timer
/// completions emit these, and `sim::resolver::apply_damage_events` consumes
/// them. Damage against an already-dead target is absorbed as a no-op.
#[derive(Event, Debug, Clone)]
pub struct DamageEvent {
    /// Entity dealing the damage
    pub source: Entity,
    /// Entity receiving the damage
    pub target: Entity,
    /// Amount of damage (integer, never negative)
    pub amount: i32,
}

/// Event fired exactly once when an agent or destructible dies
#[derive(Event, Debug, Clone)]
pub struct DeathEvent {
    /// Entity that died
    pub victim: Entity,
    /// Entity that dealt the killing blow
    pub killer: Entity,
}

/// Event fired when a destructible's death resolves its reward drops.
///
/// Both trials are independent; both, one, or neither field may be set.
#[derive(Event, Debug, Clone)]
pub struct DropEvent {
    /// The destructible that dropped
    pub source: Entity,
    /// Stamina restored to the player, if the stamina trial succeeded
    pub stamina_restored: Option<i32>,
    /// Health restored to the player, if the health trial succeeded
    pub health_restored: Option<i32>,
}

/// Fire-and-forget animation sink events.
///
/// The core emits named triggers and flags; a renderer would interpret them.
/// Here they are recorded in the combat log and otherwise ignored.
#[derive(Event, Debug, Clone)]
pub enum AnimationEvent {
    /// One-shot animation trigger (attack direction, take-damage, roll, die)
    Trigger { entity: Entity, name: &'static str },
    /// Persistent animation flag (walking, rolling)
    SetFlag {
        entity: Entity,
        name: &'static str,
        value: bool,
    },
}

impl AnimationEvent {
    pub fn entity(&self) -> Entity {
        match self {
            AnimationEvent::Trigger { entity, .. } => *entity,
            AnimationEvent::SetFlag { entity, .. } => *entity,
        }
    }
}

/// Purely observational horizontal facing flip, for a render sink
#[derive(Event, Debug, Clone)]
pub struct FacingEvent {
    pub entity: Entity,
    pub facing: Facing,
}
