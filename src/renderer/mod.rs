//! Rendering module
//!
//! The simulation is turned into a backend-neutral [`Frame`]; a [`Renderer`]
//! puts it on screen. [`HeadlessRenderer`] keeps the last frame for tests and
//! the headless binary.

pub mod frame;
pub mod shapes;
pub mod vertex;

use thiserror::Error;

use crate::assets::{Assets, ImageData};

pub use frame::{Frame, Hud, Light, Mask, Sprite, SpriteQuad, TextLine, build_frame};
pub use vertex::Vertex;

/// A frame that couldn't be presented. The loop logs it and carries on.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("render surface lost")]
    SurfaceLost,
    #[error("render backend error: {0}")]
    Backend(String),
}

pub trait Renderer {
    fn render(&mut self, frame: &Frame) -> Result<(), RenderError>;
}

/// Image drawn for a sprite. Buttons are flat colored.
pub fn texture_for(assets: &Assets, sprite: Sprite) -> Option<&ImageData> {
    match sprite {
        Sprite::Background | Sprite::Rock => Some(&assets.background),
        Sprite::Lava => Some(&assets.lava),
        Sprite::Star => Some(&assets.star),
        Sprite::Astronaut => Some(&assets.astronaut),
        Sprite::Heart => Some(&assets.heart),
        Sprite::Button => None,
    }
}

/// Renderer with no output
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    assets: Option<Assets>,
    pub frames: u64,
    pub last_frame: Option<Frame>,
    /// Vertices in the last frame
    pub last_vertex_count: usize,
    /// Sprites in the last frame that resolved to an image
    pub last_textured: usize,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_assets(assets: Assets) -> Self {
        Self {
            assets: Some(assets),
            ..Self::default()
        }
    }

    pub fn assets(&self) -> Option<&Assets> {
        self.assets.as_ref()
    }
}

impl Renderer for HeadlessRenderer {
    fn render(&mut self, frame: &Frame) -> Result<(), RenderError> {
        self.frames += 1;
        self.last_vertex_count = frame.vertices().len();
        self.last_textured = match &self.assets {
            Some(assets) => frame.sprites().filter(|q| texture_for(assets, q.sprite).is_some()).count(),
            None => 0,
        };
        self.last_frame = Some(frame.clone());
        Ok(())
    }
}
