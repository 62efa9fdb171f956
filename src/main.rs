//! Moon Odyssey entry point
//!
//! Runs the game headless on autopilot: `moon-odyssey [settings.json] [frames] [layout]`.
//! A windowed backend plugs in through `Renderer` and `InputSource`.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use moon_odyssey::assets::{Assets, DirLoader};
use moon_odyssey::platform::{ScriptedInput, SystemClock};
use moon_odyssey::renderer::HeadlessRenderer;
use moon_odyssey::sim::GameSession;
use moon_odyssey::{AppError, GameLoop, LayoutStyle, Settings};

/// Default run length: one minute at 60 fps
const DEFAULT_FRAMES: u64 = 60 * 60;

fn main() -> Result<(), AppError> {
    env_logger::init();
    log::info!("Moon Odyssey starting...");

    let mut args = std::env::args().skip(1);
    let settings_path = args.next().map(PathBuf::from);
    let frames = args.next().and_then(|s| s.parse().ok()).unwrap_or(DEFAULT_FRAMES);
    let layout = args.next();

    let mut settings = Settings::load(settings_path.as_deref())?;
    if let Some(name) = layout {
        match LayoutStyle::from_str(&name) {
            Some(style) => settings.layout = style,
            None => log::warn!("Unknown layout '{}', keeping {}", name, settings.layout.as_str()),
        }
    }

    let asset_dir = Path::new("assets");
    let renderer = if asset_dir.is_dir() {
        let assets = Assets::load(&DirLoader::new(asset_dir))?;
        log::info!("Assets loaded from {}", asset_dir.display());
        HeadlessRenderer::with_assets(assets)
    } else {
        log::info!("No asset directory, drawing flat colors");
        HeadlessRenderer::new()
    };

    let seed = settings.seed.unwrap_or_else(wall_clock_seed);
    let session = GameSession::new(settings, seed);

    let mut game = GameLoop::new(session, ScriptedInput::autopilot(), renderer, SystemClock::new());
    game.run(Some(frames))?;

    let best = &game.session().best_times;
    for mode in moon_odyssey::sim::VisibilityMode::ALL {
        log::info!("{}", best.describe(mode));
    }
    Ok(())
}

fn wall_clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
