//! One level: rocks, stars and the player
//!
//! Owns every entity for the life of a run. Generation builds a fresh layout,
//! `tick` resolves movement, lava and pickups in a fixed order.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::actor::{Actor, HeldDirections};
use super::entities::{Collectible, Obstacle};
use super::error::SimError;
use super::placement::{ClusterRequest, PlacementRequest, place, place_clustered};
use super::rect::Rect;
use crate::settings::{LayoutStyle, Settings};

/// State of the run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    #[default]
    InProgress,
    Won,
    Lost,
}

/// Something that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArenaEvent {
    HazardHit { lives_left: u8 },
    Collected { id: u32, collected: usize },
    Won,
    Lost,
}

/// Result of one arena tick
#[derive(Debug, Clone, Default)]
pub struct ArenaTick {
    pub outcome: Outcome,
    pub events: Vec<ArenaEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena {
    pub bounds: Rect,
    pub actor: Actor,
    pub obstacles: Vec<Obstacle>,
    pub collectibles: Vec<Collectible>,
    /// Stars picked up so far
    pub collected: usize,
    /// Stars needed to win
    pub goal: usize,
    pub outcome: Outcome,
    pub started_at_ms: u64,
    pub finished_at_ms: Option<u64>,
    next_id: u32,
}

impl Arena {
    /// Build a fresh level.
    ///
    /// `previous` holds the last level's rocks; new rocks avoid them for one pass so
    /// consecutive layouts differ.
    pub fn generate<R: Rng + ?Sized>(
        settings: &Settings,
        previous: &[Obstacle],
        rng: &mut R,
        now_ms: u64,
    ) -> Result<Self, SimError> {
        let bounds = settings.arena_bounds();
        let rocks = generate_rocks(settings, previous, rng);
        let spawn = find_spawn(&bounds, settings.player_size, &rocks, settings.spawn_step)?;

        let mut excluded = rocks.clone();
        excluded.push(spawn);
        let stars = generate_stars(settings, &excluded, rng)?;

        log::info!(
            "Level generated: {} rocks, {} stars, spawn at ({}, {})",
            rocks.len(),
            stars.len(),
            spawn.pos.x,
            spawn.pos.y
        );
        Ok(Self::from_layout(settings, &rocks, &stars, spawn, now_ms))
    }

    /// Build a level from explicit positions (no validation)
    pub fn from_layout(settings: &Settings, rocks: &[Rect], stars: &[Rect], spawn: Rect, now_ms: u64) -> Self {
        let mut arena = Self {
            bounds: settings.arena_bounds(),
            actor: Actor::new(spawn, settings),
            obstacles: Vec::with_capacity(rocks.len()),
            collectibles: Vec::with_capacity(stars.len()),
            collected: 0,
            goal: stars.len(),
            outcome: Outcome::InProgress,
            started_at_ms: now_ms,
            finished_at_ms: None,
            next_id: 1,
        };
        for rock in rocks {
            let id = arena.next_entity_id();
            arena.obstacles.push(Obstacle::new(id, *rock, settings.rock_shrink));
        }
        for star in stars {
            let id = arena.next_entity_id();
            arena.collectibles.push(Collectible::new(id, *star, settings.star_shrink));
        }
        arena
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Stars still on the field
    pub fn active_collectibles(&self) -> impl Iterator<Item = &Collectible> {
        self.collectibles.iter().filter(|c| c.is_active())
    }

    /// Run time in seconds, frozen once the run ends
    pub fn elapsed_secs(&self, now_ms: u64) -> f64 {
        let end = self.finished_at_ms.unwrap_or(now_ms);
        end.saturating_sub(self.started_at_ms) as f64 / 1000.0
    }

    /// Advance one tick: move, check lava, collect stars
    pub fn tick(&mut self, held: HeldDirections, now_ms: u64) -> ArenaTick {
        let mut events = Vec::new();
        if self.outcome != Outcome::InProgress {
            return ArenaTick {
                outcome: self.outcome,
                events,
            };
        }

        self.actor.step(held, &self.obstacles, &self.bounds, now_ms);

        if self.actor.touches_trail(now_ms) {
            let lives_left = self.actor.take_hazard_hit(now_ms);
            log::debug!("Lava hit, {} lives left", lives_left);
            events.push(ArenaEvent::HazardHit { lives_left });
            if lives_left == 0 {
                self.finish(Outcome::Lost, now_ms);
                events.push(ArenaEvent::Lost);
                return ArenaTick {
                    outcome: self.outcome,
                    events,
                };
            }
        }

        let player = self.actor.collision_box();
        for star in self.collectibles.iter_mut().filter(|c| c.is_active()) {
            if player.intersects(&star.collision) {
                star.collected = true;
                self.collected += 1;
                events.push(ArenaEvent::Collected {
                    id: star.id,
                    collected: self.collected,
                });
            }
        }

        if self.collected >= self.goal {
            self.finish(Outcome::Won, now_ms);
            events.push(ArenaEvent::Won);
        }

        ArenaTick {
            outcome: self.outcome,
            events,
        }
    }

    fn finish(&mut self, outcome: Outcome, now_ms: u64) {
        self.outcome = outcome;
        self.finished_at_ms = Some(now_ms);
        log::info!("Run ended: {:?} after {:.1}s", outcome, self.elapsed_secs(now_ms));
    }
}

/// Find a rock-free spawn box, preferring the arena center.
///
/// Searches outward in a plus shape: for each radius, below, above, right, then left.
pub fn find_spawn(bounds: &Rect, size: f32, rocks: &[Rect], step: f32) -> Result<Rect, SimError> {
    let center = (bounds.center() - Vec2::splat(size / 2.0)).floor();
    let is_free = |pos: Vec2| {
        let candidate = Rect::square(pos, size);
        bounds.contains_rect(&candidate) && !rocks.iter().any(|r| r.intersects(&candidate))
    };

    if is_free(center) {
        return Ok(Rect::square(center, size));
    }

    let limit = bounds.size.max_element();
    let mut radius = step;
    while radius < limit {
        let offsets = [
            Vec2::new(0.0, radius),
            Vec2::new(0.0, -radius),
            Vec2::new(radius, 0.0),
            Vec2::new(-radius, 0.0),
        ];
        if let Some(pos) = offsets.into_iter().map(|o| center + o).find(|&p| is_free(p)) {
            log::debug!("Center spawn blocked, using ({}, {}) at radius {}", pos.x, pos.y, radius);
            return Ok(Rect::square(pos, size));
        }
        radius += step;
    }

    Err(SimError::SpawnUnresolvable {
        width: bounds.size.x as u32,
        height: bounds.size.y as u32,
    })
}

fn generate_rocks<R: Rng + ?Sized>(settings: &Settings, previous: &[Obstacle], rng: &mut R) -> Vec<Rect> {
    let bounds = settings.arena_bounds();
    let box_size = Vec2::splat(settings.rock_size);
    let previous: Vec<Rect> = previous.iter().map(|o| o.visual).collect();

    let scattered = place(
        &PlacementRequest {
            count: settings.rock_count,
            box_size,
            bounds,
            min_distance: 0.0,
            max_attempts: settings.rock_attempts,
        },
        &previous,
        rng,
    );
    if !scattered.is_complete() {
        log::warn!(
            "Rock placement short by {}, playing with {}",
            scattered.shortfall(),
            scattered.rects.len()
        );
    }
    let mut rocks = scattered.rects;

    if settings.layout == LayoutStyle::Clustered {
        let taken: Vec<Rect> = rocks.iter().chain(&previous).copied().collect();
        let clustered = place_clustered(
            &ClusterRequest {
                clusters: settings.cluster_count,
                per_cluster: settings.rocks_per_cluster,
                spread: settings.cluster_spread,
                box_size,
                bounds,
                attempts_per_box: (settings.rock_attempts / 10).max(1),
            },
            &taken,
            rng,
        );
        if !clustered.is_complete() {
            log::warn!("Cluster placement short by {}", clustered.shortfall());
        }
        rocks.extend(clustered.rects);
    }

    rocks
}

/// Place stars in bounded rounds.
///
/// A short layout after every round lowers the goal to what was placed; an
/// empty one is an error since the run could never be won.
fn generate_stars<R: Rng + ?Sized>(settings: &Settings, excluded: &[Rect], rng: &mut R) -> Result<Vec<Rect>, SimError> {
    let request = PlacementRequest {
        count: settings.star_count,
        box_size: Vec2::splat(settings.star_size),
        bounds: settings.arena_bounds(),
        min_distance: settings.min_star_distance,
        max_attempts: settings.star_attempts,
    };

    let mut best = place(&request, excluded, rng);
    for round in 1..settings.star_rounds.max(1) {
        if best.is_complete() {
            break;
        }
        log::debug!("Star placement round {} short by {}, retrying", round, best.shortfall());
        let retry = place(&request, excluded, rng);
        if retry.rects.len() > best.rects.len() {
            best = retry;
        }
    }

    if best.is_complete() || best.rects.is_empty() {
        return best.into_complete();
    }
    log::warn!(
        "Only {} of {} stars fit, lowering the goal",
        best.rects.len(),
        best.requested
    );
    Ok(best.rects)
}
