//! The player-controlled astronaut
//!
//! Every successful step leaves lava behind. Old lava kills; the freshest
//! tiles are exempt so the player can't trip over the tile it just made.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entities::Obstacle;
use super::rect::{Rect, first_overlap};
use crate::settings::Settings;

/// Directions currently held down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldDirections {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl HeldDirections {
    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }

    /// Per-tick displacement; opposite keys cancel
    pub fn delta(&self, speed: f32) -> Vec2 {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        Vec2::new(axis(self.left, self.right), axis(self.up, self.down)) * speed
    }
}

/// Whether the last tick moved the actor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Motion {
    #[default]
    Idle,
    Moving,
}

/// The player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub rect: Rect,
    /// Movement per tick, per axis
    pub speed: f32,
    pub motion: Motion,
    /// Lava tiles, oldest first
    pub trail: Vec<Rect>,
    /// Absolute deadline (ms) of the current invulnerability window
    pub invulnerable_until: Option<u64>,
    pub lives: u8,
    trail_size: f32,
    trail_spacing: f32,
    trail_grace: usize,
    hitbox_shrink: f32,
    invulnerable_ms: u64,
}

impl Actor {
    pub fn new(spawn: Rect, settings: &Settings) -> Self {
        Self {
            rect: spawn,
            speed: settings.player_speed,
            motion: Motion::Idle,
            trail: Vec::new(),
            invulnerable_until: None,
            lives: settings.lives,
            trail_size: settings.lava_size,
            trail_spacing: settings.lava_spacing,
            trail_grace: settings.lava_grace,
            hitbox_shrink: settings.lava_hitbox_shrink,
            invulnerable_ms: settings.invulnerable_ms,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.rect.center()
    }

    /// Box tested against rocks and stars
    #[inline]
    pub fn collision_box(&self) -> Rect {
        self.rect
    }

    /// Smaller box tested against lava
    #[inline]
    pub fn hazard_hitbox(&self) -> Rect {
        self.rect.shrink(self.hitbox_shrink)
    }

    pub fn is_invulnerable(&self, now_ms: u64) -> bool {
        self.invulnerable_until.is_some_and(|until| now_ms < until)
    }

    /// Try to move one tick.
    ///
    /// The move is clamped to `bounds`, then dropped entirely if the new box hits a
    /// rock. Returns true if the actor ended up somewhere new.
    pub fn step(&mut self, held: HeldDirections, obstacles: &[Obstacle], bounds: &Rect, now_ms: u64) -> bool {
        if self.invulnerable_until.is_some_and(|until| now_ms >= until) {
            self.invulnerable_until = None;
        }

        let delta = held.delta(self.speed);
        if delta == Vec2::ZERO {
            self.motion = Motion::Idle;
            return false;
        }

        let target = self.rect.translated(delta).clamped_within(bounds);
        let blocked = first_overlap(&target, obstacles.iter().map(|o| &o.collision)).is_some();
        if blocked || target.pos == self.rect.pos {
            self.motion = Motion::Idle;
            return false;
        }

        self.rect = target;
        self.motion = Motion::Moving;
        if !self.is_invulnerable(now_ms) {
            self.emit_trail();
        }
        true
    }

    /// Drop a lava tile under the actor unless the last one is too close
    fn emit_trail(&mut self) -> bool {
        let center = self.center();
        let far_enough = self
            .trail
            .last()
            .is_none_or(|last| last.center().distance(center) > self.trail_spacing);
        if far_enough {
            self.trail.push(Rect::centered(center, self.trail_size));
        }
        far_enough
    }

    /// True if the actor stands on lava old enough to hurt
    pub fn touches_trail(&self, now_ms: u64) -> bool {
        if self.is_invulnerable(now_ms) || self.trail.len() <= self.trail_grace {
            return false;
        }
        let hitbox = self.hazard_hitbox();
        let old = &self.trail[..self.trail.len() - self.trail_grace];
        old.iter().any(|tile| hitbox.intersects(tile))
    }

    /// Apply a lava hit and return the lives left.
    ///
    /// A survivor gets an invulnerability window and a clean slate.
    pub fn take_hazard_hit(&mut self, now_ms: u64) -> u8 {
        self.lives = self.lives.saturating_sub(1);
        if self.lives > 0 {
            self.invulnerable_until = Some(now_ms.saturating_add(self.invulnerable_ms));
            self.trail.clear();
        }
        self.lives
    }
}
