//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestamps only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod actor;
pub mod arena;
pub mod entities;
pub mod error;
pub mod placement;
pub mod rect;
pub mod session;
pub mod state;
pub mod tick;

pub use actor::{Actor, HeldDirections, Motion};
pub use arena::{Arena, ArenaEvent, ArenaTick, Outcome, find_spawn};
pub use entities::{Collectible, Obstacle};
pub use error::SimError;
pub use placement::{ClusterRequest, Placement, PlacementRequest, place, place_clustered, place_with};
pub use rect::{Rect, first_overlap};
pub use session::{GameSession, RunResult, SessionEvent};
pub use state::{Effect, Fade, Screen, StateEvent, Transition, VisibilityMode, transition};
pub use tick::{InputEvent, TickInput, tick};
