//! The live game: current screen, the running level and best times
//!
//! Owned by the loop driver and handed to `tick` by `&mut`.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::arena::Arena;
use super::error::SimError;
use super::state::{Effect, Fade, Screen, StateEvent, VisibilityMode, transition};
use crate::STORY_TEXTS;
use crate::highscores::BestTimes;
use crate::settings::Settings;

/// Notable things that happened during a tick (for logging, audio, HUD)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionEvent {
    ScreenChanged { from: Screen, to: Screen },
    RunStarted { mode: VisibilityMode },
    HazardHit { lives_left: u8 },
    Collected { collected: usize, goal: usize },
    RunWon { secs: f64, new_best: bool },
    RunLost { secs: f64 },
}

/// Summary of the last finished run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunResult {
    pub mode: VisibilityMode,
    pub secs: f64,
    pub won: bool,
    pub new_best: bool,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    pub settings: Settings,
    /// Seed the RNG started from
    pub seed: u64,
    pub screen: Screen,
    /// Mode of the current (or last) run
    pub mode: Option<VisibilityMode>,
    /// Current (or last) level; replaced on every reset
    pub arena: Option<Arena>,
    pub best_times: BestTimes,
    pub fade: Fade,
    pub fullscreen: bool,
    pub quit_requested: bool,
    /// Lives counter blinks until this deadline (ms)
    pub heart_flash_until: Option<u64>,
    pub last_result: Option<RunResult>,
    /// Timestamp of the latest tick (ms)
    pub now_ms: u64,
    rng: Pcg32,
}

impl GameSession {
    pub fn new(settings: Settings, seed: u64) -> Self {
        log::info!("New session with seed {}", seed);
        Self {
            fade: Fade::new(settings.fade_speed),
            settings,
            seed,
            screen: Screen::default(),
            mode: None,
            arena: None,
            best_times: BestTimes::new(),
            fullscreen: false,
            quit_requested: false,
            heart_flash_until: None,
            last_result: None,
            now_ms: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn story_pages(&self) -> usize {
        STORY_TEXTS.len()
    }

    /// Run time of the current level in seconds (0 outside a run)
    pub fn elapsed_secs(&self) -> f64 {
        self.arena.as_ref().map_or(0.0, |a| a.elapsed_secs(self.now_ms))
    }

    /// False during the "off" half of a heart flash blink
    pub fn heart_visible(&self) -> bool {
        match self.heart_flash_until {
            Some(until) if self.now_ms < until => (self.now_ms / 100) % 2 == 0,
            _ => true,
        }
    }

    /// Feed one event through the transition table and carry out its effect.
    ///
    /// A failed level reset leaves the screen where it was.
    pub fn apply(&mut self, event: StateEvent, now_ms: u64) -> Result<Vec<SessionEvent>, SimError> {
        self.now_ms = now_ms;
        let from = self.screen;
        let t = transition(from, event, self.story_pages());
        let mut events = Vec::new();

        match t.effect {
            Some(Effect::ResetArena(mode)) => {
                self.reset_arena(mode, now_ms)?;
                events.push(SessionEvent::RunStarted { mode });
            }
            Some(Effect::RecordWin) => {
                if let Some(result) = self.finish_run(true) {
                    events.push(SessionEvent::RunWon {
                        secs: result.secs,
                        new_best: result.new_best,
                    });
                }
            }
            Some(Effect::RecordLoss) => {
                if let Some(result) = self.finish_run(false) {
                    events.push(SessionEvent::RunLost { secs: result.secs });
                }
            }
            None => {}
        }

        if t.changed(from) {
            self.screen = t.next;
            self.fade.restart();
            log::debug!("Screen {:?} -> {:?}", from, t.next);
            events.insert(0, SessionEvent::ScreenChanged { from, to: t.next });
        }
        Ok(events)
    }

    fn reset_arena(&mut self, mode: VisibilityMode, now_ms: u64) -> Result<(), SimError> {
        let previous = self.arena.as_ref().map_or(&[][..], |a| a.obstacles.as_slice());
        let arena = Arena::generate(&self.settings, previous, &mut self.rng, now_ms).inspect_err(|e| {
            log::error!("Level reset failed: {}", e);
        })?;

        log::info!("Starting {} run", mode.label());
        self.arena = Some(arena);
        self.mode = Some(mode);
        self.heart_flash_until = None;
        self.last_result = None;
        Ok(())
    }

    fn finish_run(&mut self, won: bool) -> Option<RunResult> {
        let mode = self.mode?;
        let secs = self.arena.as_ref()?.elapsed_secs(self.now_ms);
        let new_best = won && self.best_times.record(mode, secs);
        let result = RunResult {
            mode,
            secs,
            won,
            new_best,
        };
        self.last_result = Some(result);
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::LayoutStyle;
    use crate::sim::Rect;

    fn session() -> GameSession {
        GameSession::new(
            Settings {
                lives: 3,
                ..Settings::default()
            },
            1234,
        )
    }

    fn to_menu(session: &mut GameSession) {
        for _ in 0..session.story_pages() {
            session.apply(StateEvent::Advance, 0).unwrap();
        }
        assert_eq!(session.screen, Screen::ModeSelect);
    }

    #[test]
    fn test_story_advance_restarts_fade() {
        let mut s = session();
        s.fade.alpha = 10.0;
        let events = s.apply(StateEvent::Advance, 0).unwrap();

        assert_eq!(s.screen, Screen::Story { page: 1 });
        assert_eq!(s.fade.alpha, 255.0);
        assert_eq!(
            events,
            vec![SessionEvent::ScreenChanged {
                from: Screen::Story { page: 0 },
                to: Screen::Story { page: 1 }
            }]
        );
    }

    #[test]
    fn test_select_mode_builds_level() {
        let mut s = session();
        to_menu(&mut s);

        let events = s.apply(StateEvent::SelectMode(VisibilityMode::Blind), 500).unwrap();
        assert_eq!(s.screen, Screen::Playing);
        assert_eq!(s.mode, Some(VisibilityMode::Blind));
        assert!(events.contains(&SessionEvent::RunStarted {
            mode: VisibilityMode::Blind
        }));
        let arena = s.arena.as_ref().unwrap();
        assert_eq!(arena.started_at_ms, 500);
        assert_eq!(arena.goal, 3);
    }

    #[test]
    fn test_failed_reset_keeps_menu() {
        let mut s = GameSession::new(
            Settings {
                arena_width: 100.0,
                arena_height: 100.0,
                rock_count: 0,
                ..Settings::default()
            },
            1,
        );
        to_menu(&mut s);

        let result = s.apply(StateEvent::SelectMode(VisibilityMode::Limited), 0);
        assert!(matches!(result, Err(SimError::PlacementIncomplete { .. })));
        assert_eq!(s.screen, Screen::ModeSelect);
        assert!(s.arena.is_none());
    }

    #[test]
    fn test_win_records_best_time_once_improved() {
        let mut s = session();
        to_menu(&mut s);
        s.apply(StateEvent::SelectMode(VisibilityMode::Limited), 1000).unwrap();

        s.arena.as_mut().unwrap().finished_at_ms = Some(31_000);
        s.now_ms = 31_000;
        let events = s.apply(StateEvent::AllCollected, 31_000).unwrap();
        assert_eq!(s.screen, Screen::Won);
        assert!(events.contains(&SessionEvent::RunWon {
            secs: 30.0,
            new_best: true
        }));
        assert_eq!(s.best_times.get(VisibilityMode::Limited), 30.0);

        // Slower second run doesn't replace the record
        s.apply(StateEvent::Restart, 32_000).unwrap();
        s.apply(StateEvent::SelectMode(VisibilityMode::Limited), 40_000).unwrap();
        s.arena.as_mut().unwrap().finished_at_ms = Some(80_000);
        let events = s.apply(StateEvent::AllCollected, 80_000).unwrap();
        assert!(events.contains(&SessionEvent::RunWon {
            secs: 40.0,
            new_best: false
        }));
        assert_eq!(s.best_times.get(VisibilityMode::Limited), 30.0);
        assert!(s.best_times.get(VisibilityMode::Blind).is_infinite());
    }

    #[test]
    fn test_loss_never_records() {
        let mut s = session();
        to_menu(&mut s);
        s.apply(StateEvent::SelectMode(VisibilityMode::Blind), 0).unwrap();
        s.now_ms = 5000;

        let events = s.apply(StateEvent::LivesExhausted, 5000).unwrap();
        assert_eq!(s.screen, Screen::Lost);
        assert!(events.contains(&SessionEvent::RunLost { secs: 5.0 }));
        assert!(s.best_times.get(VisibilityMode::Blind).is_infinite());
        assert_eq!(s.last_result.map(|r| r.won), Some(false));
    }

    #[test]
    fn test_reset_avoids_previous_rocks() {
        for layout in [LayoutStyle::Scattered, LayoutStyle::Clustered] {
            let mut s = GameSession::new(Settings { layout, ..Settings::default() }, 7);
            to_menu(&mut s);
            s.apply(StateEvent::SelectMode(VisibilityMode::Limited), 0).unwrap();
            let old: Vec<Rect> = s.arena.as_ref().unwrap().obstacles.iter().map(|o| o.visual).collect();

            s.apply(StateEvent::LivesExhausted, 0).unwrap();
            s.apply(StateEvent::Restart, 0).unwrap();
            s.apply(StateEvent::SelectMode(VisibilityMode::Limited), 0).unwrap();

            for rock in &s.arena.as_ref().unwrap().obstacles {
                assert!(old.iter().all(|o| !o.intersects(&rock.visual)), "{:?} reused a rock position", layout);
            }
        }
    }

    #[test]
    fn test_heart_flash_blinks() {
        let mut s = session();
        s.heart_flash_until = Some(1000);
        s.now_ms = 50;
        assert!(s.heart_visible());
        s.now_ms = 150;
        assert!(!s.heart_visible());
        s.now_ms = 1150;
        assert!(s.heart_visible());
    }
}
