//! Boss Room Generation
//!
//! Random-walk floor carving for the boss arena. Purely cosmetic to the
//! simulation (no collision), but it consumes the seeded RNG and its tile
//! count lands in the report, so it stays part of the deterministic run.

use bevy::prelude::*;
use std::collections::HashSet;

use crate::sim::components::GameRng;

const DIRECTIONS: [IVec2; 4] = [IVec2::Y, IVec2::X, IVec2::NEG_Y, IVec2::NEG_X];

/// Carve a floor by walking `walk_length` random cardinal steps from
/// `start`. Revisited tiles collapse, so the result can hold fewer than
/// `walk_length + 1` positions.
pub fn simple_random_walk(
    start: IVec2,
    walk_length: usize,
    rng: &mut GameRng,
) -> HashSet<IVec2> {
    let mut floor = HashSet::new();
    floor.insert(start);

    let mut current = start;
    for _ in 0..walk_length {
        current += DIRECTIONS[rng.random_index(DIRECTIONS.len())];
        floor.insert(current);
    }
    floor
}
