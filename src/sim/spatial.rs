//! Spatial queries
//!
//! The simulation has no physics engine; melee target discovery is a circle
//! overlap test over damageable entities, filtered by layer mask. This is the
//! SpatialQueryService the combat resolver consumes.

use bevy::prelude::*;

use super::components::{Damageable, Dead, LayerMask};

/// Query alias for the damageable-entity view spatial lookups run against.
/// Corpses are excluded; damage against them would be a no-op anyway.
pub type DamageableQuery<'w, 's> =
    Query<'w, 's, (Entity, &'static Transform, &'static Damageable), Without<Dead>>;

/// All damageable entities within `radius` of `center` whose layer overlaps
/// `mask`. Order is unspecified but every eligible entity appears exactly
/// once.
pub fn query_circle(
    center: Vec2,
    radius: f32,
    mask: LayerMask,
    targets: &DamageableQuery,
) -> Vec<Entity> {
    targets
        .iter()
        .filter(|(_, transform, damageable)| {
            damageable.layer.overlaps(mask)
                && transform.translation.truncate().distance(center) <= radius
        })
        .map(|(entity, _, _)| entity)
        .collect()
}
