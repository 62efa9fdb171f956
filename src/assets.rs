//! Asset loading
//!
//! Images are required: a missing image is a startup error. Fonts are
//! optional: a missing font falls back to the built-in default with a warning.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Logical asset names mapped to file names under the asset directory
pub mod manifest {
    pub const BACKGROUND: &str = "background.png";
    pub const HEART: &str = "heart.png";
    pub const STAR: &str = "potion2.png";
    pub const ASTRONAUT: &str = "astronaut.png";
    pub const LAVA: &str = "lava.png";
    pub const PIXEL_FONT: &str = "pixel_font.ttf";

    /// Title, body and HUD text sizes
    pub const FONT_SIZES: [u32; 3] = [54, 24, 20];
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to load {name} from {path}")]
    ResourceLoadFailure {
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Raw image bytes; decoding is up to the renderer backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// A font at a fixed pixel size
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontHandle {
    /// Backend's default font
    Builtin { size: u32 },
    File { name: String, size: u32, bytes: Vec<u8> },
}

impl FontHandle {
    pub fn builtin(size: u32) -> Self {
        FontHandle::Builtin { size }
    }

    pub fn size(&self) -> u32 {
        match self {
            FontHandle::Builtin { size } | FontHandle::File { size, .. } => *size,
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, FontHandle::Builtin { .. })
    }
}

/// Source of images and fonts by logical name
pub trait AssetLoader {
    fn load_image(&self, name: &str) -> Result<ImageData, AssetError>;
    fn load_font(&self, name: &str, size: u32) -> Result<FontHandle, AssetError>;
}

/// Loads assets from files under a root directory
#[derive(Debug, Clone)]
pub struct DirLoader {
    root: PathBuf,
}

impl DirLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read(&self, name: &str) -> Result<Vec<u8>, AssetError> {
        let path = self.root.join(name);
        std::fs::read(&path).map_err(|source| AssetError::ResourceLoadFailure {
            name: name.to_string(),
            path,
            source,
        })
    }
}

impl AssetLoader for DirLoader {
    fn load_image(&self, name: &str) -> Result<ImageData, AssetError> {
        let bytes = self.read(name)?;
        log::debug!("Loaded image {} ({} bytes)", name, bytes.len());
        Ok(ImageData {
            name: name.to_string(),
            bytes,
        })
    }

    fn load_font(&self, name: &str, size: u32) -> Result<FontHandle, AssetError> {
        Ok(FontHandle::File {
            name: name.to_string(),
            size,
            bytes: self.read(name)?,
        })
    }
}

/// Font at `size`, or the built-in font if it can't be loaded
pub fn load_font_or_default(loader: &dyn AssetLoader, name: &str, size: u32) -> FontHandle {
    loader.load_font(name, size).unwrap_or_else(|e| {
        log::warn!("{}, using the default font", e);
        FontHandle::builtin(size)
    })
}

/// Everything the game draws with
#[derive(Debug, Clone)]
pub struct Assets {
    pub background: ImageData,
    pub heart: ImageData,
    pub star: ImageData,
    pub astronaut: ImageData,
    pub lava: ImageData,
    /// Title, body and HUD fonts
    pub fonts: [FontHandle; 3],
}

impl Assets {
    pub fn load(loader: &dyn AssetLoader) -> Result<Self, AssetError> {
        let fonts = manifest::FONT_SIZES.map(|size| load_font_or_default(loader, manifest::PIXEL_FONT, size));
        Ok(Self {
            background: loader.load_image(manifest::BACKGROUND)?,
            heart: loader.load_image(manifest::HEART)?,
            star: loader.load_image(manifest::STAR)?,
            astronaut: loader.load_image(manifest::ASTRONAUT)?,
            lava: loader.load_image(manifest::LAVA)?,
            fonts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fresh scratch directory per test
    fn scratch_dir(test: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("moon-odyssey-{}-{}", test, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_images(dir: &Path) {
        for name in [
            manifest::BACKGROUND,
            manifest::HEART,
            manifest::STAR,
            manifest::ASTRONAUT,
            manifest::LAVA,
        ] {
            std::fs::write(dir.join(name), b"png").unwrap();
        }
    }

    #[test]
    fn test_missing_font_falls_back() {
        let dir = scratch_dir("font-fallback");
        write_images(&dir);

        let assets = Assets::load(&DirLoader::new(&dir)).unwrap();
        assert!(assets.fonts.iter().all(FontHandle::is_builtin));
        assert_eq!(assets.fonts.map(|f| f.size()), [54, 24, 20]);
        assert_eq!(assets.heart.bytes, b"png");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_font_file_is_used_when_present() {
        let dir = scratch_dir("font-file");
        write_images(&dir);
        std::fs::write(dir.join(manifest::PIXEL_FONT), b"ttf").unwrap();

        let assets = Assets::load(&DirLoader::new(&dir)).unwrap();
        assert!(!assets.fonts[0].is_builtin());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_image_is_fatal() {
        let dir = scratch_dir("missing-image");
        let err = Assets::load(&DirLoader::new(&dir)).unwrap_err();

        let AssetError::ResourceLoadFailure { name, path, .. } = err;
        assert_eq!(name, manifest::BACKGROUND);
        assert_eq!(path, dir.join(manifest::BACKGROUND));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
