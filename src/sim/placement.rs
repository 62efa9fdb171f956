//! Rejection-sampling placement of level entities
//!
//! Candidates are drawn uniformly on the integer pixel grid and rejected if they
//! overlap an exclusion rect, overlap something already placed in the batch, or
//! sit too close (center to center) to an earlier item of the batch.

use glam::Vec2;
use rand::Rng;

use super::error::SimError;
use super::rect::Rect;

/// Parameters for one scattered placement batch
#[derive(Debug, Clone)]
pub struct PlacementRequest {
    /// How many boxes to place
    pub count: usize,
    /// Size of each box
    pub box_size: Vec2,
    /// Region every box must lie in
    pub bounds: Rect,
    /// Minimum center distance between boxes of this batch (0 = overlap check only)
    pub min_distance: f32,
    /// Total trials before giving up
    pub max_attempts: u32,
}

/// Outcome of a placement batch. May hold fewer rects than requested.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub rects: Vec<Rect>,
    pub requested: usize,
    /// Trials actually spent
    pub attempts: u32,
}

impl Placement {
    pub fn is_complete(&self) -> bool {
        self.rects.len() >= self.requested
    }

    /// How many boxes are missing
    pub fn shortfall(&self) -> usize {
        self.requested.saturating_sub(self.rects.len())
    }

    /// Demand a full layout
    pub fn into_complete(self) -> Result<Vec<Rect>, SimError> {
        if self.is_complete() {
            Ok(self.rects)
        } else {
            Err(SimError::PlacementIncomplete {
                placed: self.rects.len(),
                requested: self.requested,
            })
        }
    }
}

/// Place `request.count` boxes by rejection sampling
pub fn place<R: Rng + ?Sized>(request: &PlacementRequest, existing: &[Rect], rng: &mut R) -> Placement {
    place_with(request, existing, || {
        sample_position(rng, &request.bounds, request.box_size)
    })
}

/// Rejection loop over an arbitrary candidate source (top-left positions).
///
/// A source returning `None` means no candidate can ever fit and ends the batch.
pub fn place_with<F>(request: &PlacementRequest, existing: &[Rect], mut next_candidate: F) -> Placement
where
    F: FnMut() -> Option<Vec2>,
{
    let mut rects: Vec<Rect> = Vec::with_capacity(request.count);
    let mut attempts = 0;

    while rects.len() < request.count && attempts < request.max_attempts {
        attempts += 1;
        let Some(pos) = next_candidate() else {
            break;
        };
        let candidate = Rect {
            pos,
            size: request.box_size,
        };
        if accepts(&candidate, existing, &rects, request.min_distance) {
            rects.push(candidate);
        }
    }

    Placement {
        rects,
        requested: request.count,
        attempts,
    }
}

/// Parameters for clustered placement (hard layouts)
#[derive(Debug, Clone)]
pub struct ClusterRequest {
    pub clusters: usize,
    pub per_cluster: usize,
    /// Max offset of a cluster member from its center, per axis
    pub spread: f32,
    pub box_size: Vec2,
    pub bounds: Rect,
    /// Trials for each cluster member
    pub attempts_per_box: u32,
}

/// Place boxes in clusters around random centers.
///
/// Members are clamped into bounds and must not overlap anything placed so far.
/// Clusters themselves may overlap or touch each other.
pub fn place_clustered<R: Rng + ?Sized>(
    request: &ClusterRequest,
    existing: &[Rect],
    rng: &mut R,
) -> Placement {
    let requested = request.clusters * request.per_cluster;
    let mut rects: Vec<Rect> = Vec::with_capacity(requested);
    let mut attempts = 0;
    let spread = request.spread.max(0.0).floor() as i32;

    for _ in 0..request.clusters {
        let Some(center) = sample_position(rng, &request.bounds, request.box_size) else {
            break;
        };

        for _ in 0..request.per_cluster {
            for _ in 0..request.attempts_per_box {
                attempts += 1;
                let offset = Vec2::new(
                    rng.random_range(-spread..=spread) as f32,
                    rng.random_range(-spread..=spread) as f32,
                );
                let candidate = Rect {
                    pos: center + offset,
                    size: request.box_size,
                }
                .clamped_within(&request.bounds);

                if accepts(&candidate, existing, &rects, 0.0) {
                    rects.push(candidate);
                    break;
                }
            }
        }
    }

    Placement {
        rects,
        requested,
        attempts,
    }
}

fn accepts(candidate: &Rect, existing: &[Rect], placed: &[Rect], min_distance: f32) -> bool {
    if existing.iter().any(|r| candidate.intersects(r)) {
        return false;
    }
    placed
        .iter()
        .all(|r| !candidate.intersects(r) && candidate.center_distance(r) >= min_distance)
}

/// Uniform integer-aligned top-left position for a box inside `bounds`
fn sample_position<R: Rng + ?Sized>(rng: &mut R, bounds: &Rect, box_size: Vec2) -> Option<Vec2> {
    let span = (bounds.size - box_size).floor();
    if span.x < 0.0 || span.y < 0.0 {
        return None;
    }
    let x = rng.random_range(0..=span.x as u32) as f32;
    let y = rng.random_range(0..=span.y as u32) as f32;
    Some(bounds.pos + Vec2::new(x, y))
}
