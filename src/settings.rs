//! Game tuning
//!
//! Defaults live in [`crate::consts`]. A JSON file can override any subset of fields.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::Rect;

/// Obstacle layout style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LayoutStyle {
    /// Rocks scattered uniformly
    #[default]
    Scattered,
    /// Scattered rocks plus tight clusters
    Clustered,
}

impl LayoutStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutStyle::Scattered => "Scattered",
            LayoutStyle::Clustered => "Clustered",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "scattered" | "normal" | "easy" => Some(LayoutStyle::Scattered),
            "clustered" | "hard" => Some(LayoutStyle::Clustered),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Game settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Loop ===
    /// Frame-rate cap
    pub fps: u32,
    /// RNG seed; wall clock when absent
    pub seed: Option<u64>,

    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,

    // === Player ===
    pub player_size: f32,
    pub player_speed: f32,
    pub lives: u8,
    pub invulnerable_ms: u64,
    pub heart_flash_ms: u64,
    /// Distance between spawn search rings
    pub spawn_step: f32,

    // === Lava trail ===
    pub lava_size: f32,
    pub lava_spacing: f32,
    /// Most recent tiles exempt from collision
    pub lava_grace: usize,
    pub lava_hitbox_shrink: f32,

    // === Rocks ===
    pub rock_size: f32,
    pub rock_count: usize,
    pub rock_attempts: u32,
    /// Collision box margin per side
    pub rock_shrink: f32,
    pub layout: LayoutStyle,
    pub cluster_count: usize,
    pub rocks_per_cluster: usize,
    pub cluster_spread: f32,

    // === Stars ===
    pub star_size: f32,
    pub star_count: usize,
    pub min_star_distance: f32,
    pub star_attempts: u32,
    pub star_rounds: u32,
    pub star_shrink: f32,

    // === Presentation ===
    pub light_radius: f32,
    pub fade_speed: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fps: TARGET_FPS,
            seed: None,

            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,

            player_size: PLAYER_SIZE,
            player_speed: PLAYER_SPEED,
            lives: PLAYER_LIVES,
            invulnerable_ms: INVULNERABLE_MS,
            heart_flash_ms: HEART_FLASH_MS,
            spawn_step: SPAWN_STEP,

            lava_size: LAVA_SIZE,
            lava_spacing: LAVA_SPACING,
            lava_grace: LAVA_GRACE,
            lava_hitbox_shrink: LAVA_HITBOX_SHRINK,

            rock_size: ROCK_SIZE,
            rock_count: ROCK_COUNT,
            rock_attempts: ROCK_ATTEMPTS,
            rock_shrink: ROCK_SHRINK,
            layout: LayoutStyle::Scattered,
            cluster_count: CLUSTER_COUNT,
            rocks_per_cluster: ROCKS_PER_CLUSTER,
            cluster_spread: CLUSTER_SPREAD,

            star_size: STAR_SIZE,
            star_count: STAR_COUNT,
            min_star_distance: MIN_STAR_DISTANCE,
            star_attempts: STAR_ATTEMPTS,
            star_rounds: STAR_ROUNDS,
            star_shrink: STAR_SHRINK,

            light_radius: LIGHT_RADIUS,
            fade_speed: FADE_SPEED,
        }
    }
}

impl Settings {
    /// Whole arena as a rect
    pub fn arena_bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.arena_width, self.arena_height)
    }

    pub fn arena_size(&self) -> Vec2 {
        Vec2::new(self.arena_width, self.arena_height)
    }

    /// Load settings from a JSON file. No path, or a missing file, means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let Some(path) = path else {
            log::info!("Using default settings");
            return Ok(Self::default());
        };

        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(SettingsError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let settings = Self::from_json(&text).map_err(|e| match e {
            SettingsError::Parse { source, .. } => SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Parse and validate a JSON document
    pub fn from_json(text: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(text).map_err(|source| SettingsError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject combinations the level generator can't work with
    pub fn validate(&self) -> Result<(), SettingsError> {
        let invalid = |msg: String| Err(SettingsError::Invalid(msg));

        if self.fps == 0 {
            return invalid("fps must be positive".into());
        }
        let sizes = [
            ("player_size", self.player_size),
            ("rock_size", self.rock_size),
            ("star_size", self.star_size),
            ("lava_size", self.lava_size),
        ];
        for (name, size) in sizes {
            if !(size > 0.0) {
                return invalid(format!("{name} must be positive"));
            }
            if size > self.arena_width || size > self.arena_height {
                return invalid(format!("{name} {size} does not fit the arena"));
            }
        }
        if !(self.spawn_step > 0.0) {
            return invalid("spawn_step must be positive".into());
        }
        if self.lives == 0 {
            return invalid("lives must be at least 1".into());
        }
        if self.star_count == 0 {
            return invalid("star_count must be at least 1".into());
        }
        if self.star_shrink * 2.0 >= self.star_size {
            return invalid("star_shrink leaves no collision box".into());
        }
        if !(self.rock_shrink >= 0.0) || self.rock_shrink * 2.0 >= self.rock_size {
            return invalid("rock_shrink leaves no collision box".into());
        }
        Ok(())
    }
}
