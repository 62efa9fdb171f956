//! Static level entities: rocks (obstacles) and stars (collectibles)

use serde::{Deserialize, Serialize};

use super::rect::Rect;

/// A rock blocking movement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Drawn box
    pub visual: Rect,
    /// Box used for movement blocking
    pub collision: Rect,
}

impl Obstacle {
    pub fn new(id: u32, visual: Rect, shrink: f32) -> Self {
        Self {
            id,
            visual,
            collision: visual.shrink(shrink),
        }
    }
}

/// A star the player has to collect
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    pub visual: Rect,
    /// Smaller pickup box for fairer collection
    pub collision: Rect,
    pub collected: bool,
}

impl Collectible {
    pub fn new(id: u32, visual: Rect, shrink: f32) -> Self {
        Self {
            id,
            visual,
            collision: visual.shrink(shrink),
            collected: false,
        }
    }

    /// Still on the field
    #[inline]
    pub fn is_active(&self) -> bool {
        !self.collected
    }
}
