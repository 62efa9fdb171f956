//! Top-level game screens and their transition table
//!
//! `transition` is pure: it maps (screen, event) to the next screen plus an
//! optional side effect the session must carry out.

use serde::{Deserialize, Serialize};

/// How much of the arena the player can see
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisibilityMode {
    /// Everything is drawn, then darkened except a light circle around the player
    Limited,
    /// Only the player and the stars show through the darkness
    Blind,
}

impl VisibilityMode {
    pub const ALL: [VisibilityMode; 2] = [VisibilityMode::Limited, VisibilityMode::Blind];

    pub fn label(&self) -> &'static str {
        match self {
            VisibilityMode::Limited => "Limited Light",
            VisibilityMode::Blind => "No Light",
        }
    }

    /// Short tag used in the best-time table
    pub fn tag(&self) -> &'static str {
        match self {
            VisibilityMode::Limited => "NORMAL",
            VisibilityMode::Blind => "BLIND",
        }
    }
}

/// Current screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    /// Intro story, one page at a time
    Story { page: usize },
    /// Mode selection menu
    ModeSelect,
    /// How-to-play page, reached from the menu
    Instructions,
    /// A run is in progress
    Playing,
    /// All stars collected
    Won,
    /// Out of lives
    Lost,
}

impl Default for Screen {
    fn default() -> Self {
        Screen::Story { page: 0 }
    }
}

/// Inputs to the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateEvent {
    /// Space or click: next story page, leave instructions
    Advance,
    SelectMode(VisibilityMode),
    ShowInstructions,
    Restart,
    /// Raised by the arena
    AllCollected,
    /// Raised by the arena
    LivesExhausted,
}

/// Side effect requested by a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Build a new level for this mode
    ResetArena(VisibilityMode),
    /// Compare the finished run against the best time
    RecordWin,
    /// Close out a lost run
    RecordLoss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub next: Screen,
    pub effect: Option<Effect>,
}

impl Transition {
    fn to(next: Screen) -> Self {
        Self { next, effect: None }
    }

    /// True if the screen (or story page) changed
    pub fn changed(&self, from: Screen) -> bool {
        self.next != from
    }
}

/// Apply one event. Unknown pairs leave the screen unchanged.
pub fn transition(screen: Screen, event: StateEvent, story_pages: usize) -> Transition {
    use StateEvent::*;

    match (screen, event) {
        (Screen::Story { page }, Advance) => {
            if page + 1 < story_pages {
                Transition::to(Screen::Story { page: page + 1 })
            } else {
                Transition::to(Screen::ModeSelect)
            }
        }
        (Screen::ModeSelect, SelectMode(mode)) => Transition {
            next: Screen::Playing,
            effect: Some(Effect::ResetArena(mode)),
        },
        (Screen::ModeSelect, ShowInstructions) => Transition::to(Screen::Instructions),
        (Screen::Instructions, Advance) => Transition::to(Screen::ModeSelect),
        (Screen::Playing, AllCollected) => Transition {
            next: Screen::Won,
            effect: Some(Effect::RecordWin),
        },
        (Screen::Playing, LivesExhausted) => Transition {
            next: Screen::Lost,
            effect: Some(Effect::RecordLoss),
        },
        (Screen::Won | Screen::Lost, Restart) => Transition::to(Screen::ModeSelect),
        _ => Transition::to(screen),
    }
}

/// Fade-in overlay opacity, restarted on every screen change
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fade {
    /// 255 = fully covered, 0 = clear
    pub alpha: f32,
    /// Decrease per tick
    pub speed: f32,
}

impl Fade {
    pub fn new(speed: f32) -> Self {
        Self {
            alpha: crate::consts::FADE_START,
            speed,
        }
    }

    pub fn restart(&mut self) {
        self.alpha = crate::consts::FADE_START;
    }

    pub fn tick(&mut self) {
        self.alpha = (self.alpha - self.speed).max(0.0);
    }

    pub fn is_done(&self) -> bool {
        self.alpha <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGES: usize = 3;

    #[test]
    fn test_story_pages_then_menu() {
        let mut screen = Screen::default();
        let mut seen = vec![screen];
        for _ in 0..PAGES {
            screen = transition(screen, StateEvent::Advance, PAGES).next;
            seen.push(screen);
        }
        assert_eq!(
            seen,
            vec![
                Screen::Story { page: 0 },
                Screen::Story { page: 1 },
                Screen::Story { page: 2 },
                Screen::ModeSelect,
            ]
        );
    }

    #[test]
    fn test_select_mode_resets_arena() {
        let t = transition(Screen::ModeSelect, StateEvent::SelectMode(VisibilityMode::Blind), PAGES);
        assert_eq!(t.next, Screen::Playing);
        assert_eq!(t.effect, Some(Effect::ResetArena(VisibilityMode::Blind)));
    }

    #[test]
    fn test_run_endings_and_restart() {
        let won = transition(Screen::Playing, StateEvent::AllCollected, PAGES);
        assert_eq!(won.next, Screen::Won);
        assert_eq!(won.effect, Some(Effect::RecordWin));

        let lost = transition(Screen::Playing, StateEvent::LivesExhausted, PAGES);
        assert_eq!(lost.next, Screen::Lost);
        assert_eq!(lost.effect, Some(Effect::RecordLoss));

        for end in [Screen::Won, Screen::Lost] {
            assert_eq!(transition(end, StateEvent::Restart, PAGES).next, Screen::ModeSelect);
        }
    }

    #[test]
    fn test_instructions_round_trip() {
        let t = transition(Screen::ModeSelect, StateEvent::ShowInstructions, PAGES);
        assert_eq!(t.next, Screen::Instructions);
        let back = transition(t.next, StateEvent::Advance, PAGES);
        assert_eq!(back.next, Screen::ModeSelect);
    }

    #[test]
    fn test_unhandled_events_are_ignored() {
        let cases = [
            (Screen::Story { page: 1 }, StateEvent::Restart),
            (Screen::Story { page: 0 }, StateEvent::SelectMode(VisibilityMode::Limited)),
            (Screen::ModeSelect, StateEvent::Advance),
            (Screen::Playing, StateEvent::Restart),
            (Screen::Playing, StateEvent::SelectMode(VisibilityMode::Blind)),
            (Screen::Won, StateEvent::AllCollected),
            (Screen::Lost, StateEvent::Advance),
            (Screen::Instructions, StateEvent::Restart),
        ];
        for (screen, event) in cases {
            let t = transition(screen, event, PAGES);
            assert_eq!(t.next, screen, "{screen:?} + {event:?}");
            assert_eq!(t.effect, None);
            assert!(!t.changed(screen));
        }
    }

    #[test]
    fn test_fade_decays_and_restarts() {
        let mut fade = Fade::new(2.0);
        for _ in 0..100 {
            fade.tick();
        }
        assert_eq!(fade.alpha, 55.0);
        for _ in 0..100 {
            fade.tick();
        }
        assert!(fade.is_done());
        assert_eq!(fade.alpha, 0.0);

        fade.restart();
        assert_eq!(fade.alpha, 255.0);
    }
}
