//! Moon Odyssey - a top-down survival game where your own footsteps turn to lava
//!
//! Core modules:
//! - `sim`: Deterministic simulation (placement, collisions, game state)
//! - `renderer`: Presentation-neutral frame description
//! - `platform`: Clock, frame limiting and input abstraction
//! - `assets`: Asset loading contract with default-font fallback
//! - `settings`: Data-driven game tuning

pub mod assets;
pub mod game_loop;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use game_loop::{AppError, GameLoop};
pub use highscores::BestTimes;
pub use settings::{LayoutStyle, Settings};

/// Game configuration constants (defaults for [`Settings`])
pub mod consts {
    /// Frame-rate cap for the fixed-tick loop
    pub const TARGET_FPS: u32 = 60;

    /// Arena (window) dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Entity sizes (square boxes)
    pub const PLAYER_SIZE: f32 = 60.0;
    pub const STAR_SIZE: f32 = 60.0;
    pub const ROCK_SIZE: f32 = 40.0;
    pub const LAVA_SIZE: f32 = 30.0;

    /// Minimum distance between consecutive lava tiles
    pub const LAVA_SPACING: f32 = 20.0;
    /// Most recent lava tiles that can't hurt the player
    pub const LAVA_GRACE: usize = 10;

    /// Player movement per tick, per axis
    pub const PLAYER_SPEED: f32 = 5.0;
    /// Starting lives
    pub const PLAYER_LIVES: u8 = 1;
    /// Invulnerability after a lava hit (ms)
    pub const INVULNERABLE_MS: u64 = 1000;
    /// Heart flash duration after a lava hit (ms)
    pub const HEART_FLASH_MS: u64 = 1000;

    /// Stars to collect for a win
    pub const STAR_COUNT: usize = 3;
    /// Minimum distance between star centers
    pub const MIN_STAR_DISTANCE: f32 = 150.0;
    /// Trials per star placement round
    pub const STAR_ATTEMPTS: u32 = 100;
    /// Placement rounds before accepting a short star layout
    pub const STAR_ROUNDS: u32 = 5;
    /// Star collision box margin (per side)
    pub const STAR_SHRINK: f32 = 15.0;
    /// Rock collision box margin (per side)
    pub const ROCK_SHRINK: f32 = 12.0;

    /// Number of scattered rocks
    pub const ROCK_COUNT: usize = 10;
    /// Trials for rock placement
    pub const ROCK_ATTEMPTS: u32 = 1000;
    /// Clustered layout: clusters and rocks per cluster
    pub const CLUSTER_COUNT: usize = 3;
    pub const ROCKS_PER_CLUSTER: usize = 4;
    /// Clustered layout: max offset from a cluster center
    pub const CLUSTER_SPREAD: f32 = 80.0;

    /// Lava hitbox margin on the player (per side)
    pub const LAVA_HITBOX_SHRINK: f32 = PLAYER_SIZE / 4.0;

    /// Spawn search ring step
    pub const SPAWN_STEP: f32 = 10.0;

    /// Light radius around the player in limited-light mode
    pub const LIGHT_RADIUS: f32 = 100.0;

    /// Story fade-in: starting opacity and decay per tick
    pub const FADE_START: f32 = 255.0;
    pub const FADE_SPEED: f32 = 2.0;
}

/// Story text, one entry per page
pub const STORY_TEXTS: [&str; 3] = [
    "You are an astronaut on a critical mission to retrieve magical stars from a mysterious moon.",
    "But beware! The ground beneath you is unstable. Where you walk the rocky surface crumbles away revealing deadly lava below.",
    "Large rocks will block your path, and darkness limits your vision. Be careful where you step - you are your own enemy! Good luck!",
];
