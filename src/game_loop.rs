//! Fixed-tick driver
//!
//! One frame = poll input, tick the session once, render once, then sleep
//! until the next frame slice.

use thiserror::Error;

use crate::assets::AssetError;
use crate::platform::{Clock, FrameLimiter, InputSource};
use crate::renderer::{Renderer, build_frame};
use crate::settings::SettingsError;
use crate::sim::{GameSession, SessionEvent, SimError, tick};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to load settings: {0}")]
    Settings(#[from] SettingsError),
    #[error("failed to load assets: {0}")]
    Assets(#[from] AssetError),
    #[error("simulation failed: {0}")]
    Sim(#[from] SimError),
}

pub struct GameLoop<I, R, C> {
    session: GameSession,
    input: I,
    renderer: R,
    clock: C,
    limiter: FrameLimiter,
    frames: u64,
    failed_renders: u64,
}

impl<I: InputSource, R: Renderer, C: Clock> GameLoop<I, R, C> {
    pub fn new(session: GameSession, input: I, renderer: R, clock: C) -> Self {
        let limiter = FrameLimiter::new(session.settings.fps);
        Self {
            session,
            input,
            renderer,
            clock,
            limiter,
            frames: 0,
            failed_renders: 0,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run a single frame
    pub fn run_frame(&mut self) -> Result<(), AppError> {
        let input = self.input.poll();
        let now_ms = self.clock.now_ms();

        for event in tick(&mut self.session, &input, now_ms)? {
            log_event(&event);
        }

        let frame = build_frame(&self.session);
        if let Err(e) = self.renderer.render(&frame) {
            self.failed_renders += 1;
            log::warn!("Render error: {}", e);
        }

        self.frames += 1;
        self.limiter.wait(&self.clock);
        Ok(())
    }

    /// Run until quit is requested or `max_frames` have run. Returns the frame count.
    pub fn run(&mut self, max_frames: Option<u64>) -> Result<u64, AppError> {
        log::info!("Game loop running at {} fps", self.session.settings.fps);

        while !self.session.quit_requested && max_frames.is_none_or(|max| self.frames < max) {
            self.run_frame()?;
        }

        log::info!(
            "Game loop stopped after {} frames ({} failed renders)",
            self.frames,
            self.failed_renders
        );
        Ok(self.frames)
    }
}

fn log_event(event: &SessionEvent) {
    match event {
        SessionEvent::ScreenChanged { from, to } => log::debug!("{:?} -> {:?}", from, to),
        SessionEvent::RunStarted { mode } => log::info!("Run started ({})", mode.label()),
        SessionEvent::HazardHit { lives_left } => log::info!("Stepped in lava, {} lives left", lives_left),
        SessionEvent::Collected { collected, goal } => log::info!("Star collected ({}/{})", collected, goal),
        SessionEvent::RunWon { secs, new_best } => {
            log::info!("Run won in {:.1}s{}", secs, if *new_best { " (new best)" } else { "" })
        }
        SessionEvent::RunLost { secs } => log::info!("Run lost after {:.1}s", secs),
    }
}
