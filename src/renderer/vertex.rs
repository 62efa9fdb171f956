//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }
}

/// Fill colors, used by backends that draw flat quads instead of sprites
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.16, 0.15, 0.18, 1.0];
    pub const ROCK: [f32; 4] = [0.45, 0.42, 0.40, 1.0];
    pub const LAVA: [f32; 4] = [1.0, 0.35, 0.05, 1.0];
    pub const STAR: [f32; 4] = [1.0, 0.9, 0.3, 1.0];
    pub const ASTRONAUT: [f32; 4] = [0.9, 0.9, 1.0, 1.0];
    pub const HEART: [f32; 4] = [0.9, 0.15, 0.2, 1.0];
    pub const TEXT: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const BEST_TIME: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
    pub const TEXT_WIN: [f32; 4] = [150.0 / 255.0, 1.0, 150.0 / 255.0, 1.0];
    pub const TEXT_LOSE: [f32; 4] = [1.0, 150.0 / 255.0, 150.0 / 255.0, 1.0];
    pub const BUTTON: [f32; 4] = [70.0 / 255.0, 70.0 / 255.0, 70.0 / 255.0, 1.0];

    /// Black at an 8-bit alpha
    pub fn black(alpha: f32) -> [f32; 4] {
        [0.0, 0.0, 0.0, alpha / 255.0]
    }
}
