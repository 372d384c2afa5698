//! Pairwise short-range agent interactions.
//!
//! Both functions read a snapshot of the agent list and skip the agent at
//! `index`. Neighbours closer than [`MIN_SEPARATION`] are ignored so that
//! co-located agents never divide by zero.

use crate::agent::Agent;
use crate::geometry::Vec2;

/// Distances at or below this are treated as "same point".
pub const MIN_SEPARATION: f64 = 1e-6;

/// Averaged unit push away from every neighbour within `avoid_radius`.
///
/// The mean of the unit vectors is scaled by `avoid_strength`. Returns zero
/// when no neighbour is in range.
pub fn avoid(index: usize, agents: &[Agent], avoid_radius: f64, avoid_strength: f64) -> Vec2 {
    let Some(me) = agents.get(index) else {
        return Vec2::zeros();
    };

    let mut push = Vec2::zeros();
    let mut count = 0usize;

    for (j, other) in agents.iter().enumerate() {
        if j == index {
            continue;
        }
        let away = me.position - other.position;
        let dist = away.norm();
        if dist < avoid_radius && dist > MIN_SEPARATION {
            push += away / dist;
            count += 1;
        }
    }

    if count == 0 {
        return Vec2::zeros();
    }
    push / count as f64 * avoid_strength
}

/// Summed inverse-distance repulsion from every neighbour within `repel_radius`.
///
/// Each neighbour contributes a unit vector away from it scaled by
/// `repel_strength / distance`. The sum is not normalised.
pub fn repel(index: usize, agents: &[Agent], repel_radius: f64, repel_strength: f64) -> Vec2 {
    let Some(me) = agents.get(index) else {
        return Vec2::zeros();
    };

    let mut push = Vec2::zeros();
    let min_sq = MIN_SEPARATION;

    for (j, other) in agents.iter().enumerate() {
        if j == index {
            continue;
        }
        let away = me.position - other.position;
        let dist_sq = away.norm_squared();
        if dist_sq < repel_radius * repel_radius && dist_sq > min_sq {
            let dist = dist_sq.sqrt();
            push += away / dist * (repel_strength / dist);
        }
    }

    push
}
