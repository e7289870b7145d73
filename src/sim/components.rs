//! Core Simulation Components
//!
//! Shared components and resources used by every agent kind: bounded resource
//! pools, velocity/facing, the damageable capability, death markers, and the
//! seeded RNG resource.

use bevy::prelude::*;
use rand::prelude::*;
use rand::rngs::StdRng;

// ============================================================================
// RNG
// ============================================================================

/// Seeded random number generator for deterministic simulation runs.
///
/// When a seed is provided (e.g., via the scenario config), the same seed
/// always produces the same run. Without a seed, uses system entropy.
#[derive(Resource)]
pub struct GameRng {
    rng: StdRng,
    /// The seed used to initialize this RNG (if deterministic)
    pub seed: Option<u64>,
}

impl GameRng {
    /// Create a new GameRng with a specific seed for deterministic behavior
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Create a new GameRng with random entropy (non-deterministic)
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            seed: None,
        }
    }

    /// Generate a random f32 in the range [0.0, 1.0)
    pub fn random_f32(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Pick a uniform random index in `0..len`. `len` must be non-zero.
    pub fn random_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

// ============================================================================
// Resource pools
// ============================================================================

/// Bounded numeric stock (health or stamina).
///
/// `spend` and `restore` uphold `0 <= current <= max`. `damage` is the one
/// deliberate exception: it subtracts without a floor, so the current value
/// may be transiently negative until same-tick death handling consumes it.
/// Restores never apply to a dead owner (callers check the `Dead` marker).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourcePool {
    current: i32,
    max: i32,
}

impl ResourcePool {
    /// Create a full pool
    pub fn new(max: i32) -> Self {
        Self { current: max, max }
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    /// Spend `n` from the pool. Returns false without mutation when the
    /// pool holds less than `n`.
    pub fn spend(&mut self, n: i32) -> bool {
        if n < 0 || self.current < n {
            return false;
        }
        self.current -= n;
        true
    }

    /// Restore `n` to the pool, clamping at max. Always succeeds;
    /// non-positive amounts are a no-op.
    pub fn restore(&mut self, n: i32) {
        if n <= 0 {
            return;
        }
        self.current = (self.current + n).min(self.max);
    }

    /// Raw subtraction used only by the damage capability. No floor.
    pub fn damage(&mut self, n: i32) {
        self.current -= n;
    }

    pub fn is_depleted(&self) -> bool {
        self.current <= 0
    }
}

/// Health pool. Every damageable entity has one.
#[derive(Component, Debug)]
pub struct Health(pub ResourcePool);

/// Stamina pool. Spent by the player's dash, restored by drops.
#[derive(Component, Debug)]
pub struct Stamina(pub ResourcePool);

// ============================================================================
// Movement & facing
// ============================================================================

/// Desired velocity in units per second, integrated each tick
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct Velocity(pub Vec2);

/// Horizontal sprite facing, informed to the render sink on flips
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

// ============================================================================
// Damage capability & layers
// ============================================================================

/// Collision layer bitmask used by spatial queries.
///
/// Replaces the physics engine's layer mask: attacks supply a mask and only
/// damageables on matching layers are returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerMask(pub u8);

impl LayerMask {
    pub const PLAYER: LayerMask = LayerMask(1 << 0);
    pub const HOSTILE: LayerMask = LayerMask(1 << 1);
    pub const DESTRUCTIBLE: LayerMask = LayerMask(1 << 2);

    /// True if the two masks share any layer
    pub fn overlaps(&self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }

    pub fn union(self, other: LayerMask) -> LayerMask {
        LayerMask(self.0 | other.0)
    }
}

/// The "can be damaged" capability.
///
/// Every entity that can die carries this; applying damage through the
/// resolver is the sole combat path to health mutation.
#[derive(Component, Debug)]
pub struct Damageable {
    pub layer: LayerMask,
}

/// Marker: entity is dead.
///
/// Inserted exactly once by the resolver; damage and restores against a dead
/// entity are no-ops. The corpse stays until its removal grace elapses.
#[derive(Component, Debug)]
pub struct Dead;

/// Deferred removal: despawn the entity once the grace period elapses.
///
/// Kept separate from the agent's action timers so that death-time timer
/// cancellation never cancels the removal itself.
#[derive(Component, Debug)]
pub struct DespawnAfter {
    /// Seconds until the entity is removed from the simulation
    pub remaining: f32,
}

/// Seconds of grace between death and removal, set at spawn from tuning
#[derive(Component, Debug, Clone, Copy)]
pub struct DeathGrace(pub f32);

/// Running damage totals for the end-of-run report
#[derive(Component, Debug, Default)]
pub struct CombatStats {
    pub damage_dealt: i32,
    pub damage_taken: i32,
}

// ============================================================================
// Shared handles
// ============================================================================

/// The player entity, if one exists in the scenario.
///
/// Player-relative behaviors (chase, windup damage, drops) degrade to no-ops
/// when this is empty; a missing player never halts the simulation.
#[derive(Resource, Default)]
pub struct PlayerHandle(pub Option<Entity>);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_spend_within_bounds() {
        let mut pool = ResourcePool::new(75);
        assert!(pool.spend(25));
        assert_eq!(pool.current(), 50);
        assert!(pool.current() >= 0 && pool.current() <= pool.max());
    }

    #[test]
    fn test_pool_spend_insufficient_leaves_pool_unchanged() {
        let mut pool = ResourcePool::new(10);
        assert!(!pool.spend(11));
        assert_eq!(pool.current(), 10);
    }

    #[test]
    fn test_pool_spend_negative_rejected() {
        let mut pool = ResourcePool::new(10);
        assert!(!pool.spend(-5));
        assert_eq!(pool.current(), 10);
    }

    #[test]
    fn test_pool_restore_clamps_at_max() {
        let mut pool = ResourcePool::new(100);
        pool.spend(30);
        pool.restore(1000);
        assert_eq!(pool.current(), 100);
    }

    #[test]
    fn test_pool_restore_non_positive_is_noop() {
        let mut pool = ResourcePool::new(100);
        pool.spend(30);
        pool.restore(0);
        pool.restore(-10);
        assert_eq!(pool.current(), 70);
    }

    #[test]
    fn test_pool_damage_may_go_negative() {
        let mut pool = ResourcePool::new(100);
        pool.damage(30);
        assert_eq!(pool.current(), 70);
        assert!(!pool.is_depleted());
        pool.damage(80);
        assert_eq!(pool.current(), -10);
        assert!(pool.is_depleted());
    }

    #[test]
    fn test_layer_mask_overlap() {
        let mask = LayerMask::HOSTILE.union(LayerMask::DESTRUCTIBLE);
        assert!(mask.overlaps(LayerMask::HOSTILE));
        assert!(mask.overlaps(LayerMask::DESTRUCTIBLE));
        assert!(!mask.overlaps(LayerMask::PLAYER));
    }

    #[test]
    fn test_game_rng_is_deterministic_for_same_seed() {
        let mut a = GameRng::from_seed(99);
        let mut b = GameRng::from_seed(99);
        for _ in 0..32 {
            assert_eq!(a.random_f32(), b.random_f32());
        }
    }
}
