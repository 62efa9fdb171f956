//! Fixed timestep session tick
//!
//! Applies the frame's input events, advances the level exactly once and
//! decays screen animations.

use super::actor::HeldDirections;
use super::arena::{ArenaEvent, Outcome};
use super::error::SimError;
use super::session::{GameSession, SessionEvent};
use super::state::{Screen, StateEvent, VisibilityMode};

/// Discrete, edge-triggered input events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Space
    Advance,
    /// Mouse click. Hits the restart button on the result screens, advances elsewhere.
    Click,
    SelectMode(VisibilityMode),
    ShowInstructions,
    Restart,
    ToggleFullscreen,
    ExitFullscreen,
    Quit,
}

impl InputEvent {
    /// Events the screen state machine understands, as seen from `screen`
    pub fn as_state_event(&self, screen: Screen) -> Option<StateEvent> {
        match *self {
            InputEvent::Advance => Some(StateEvent::Advance),
            InputEvent::Click => match screen {
                Screen::Won | Screen::Lost => Some(StateEvent::Restart),
                _ => Some(StateEvent::Advance),
            },
            InputEvent::SelectMode(mode) => Some(StateEvent::SelectMode(mode)),
            InputEvent::ShowInstructions => Some(StateEvent::ShowInstructions),
            InputEvent::Restart => Some(StateEvent::Restart),
            InputEvent::ToggleFullscreen | InputEvent::ExitFullscreen | InputEvent::Quit => None,
        }
    }
}

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Everything pressed since the last tick, in order
    pub events: Vec<InputEvent>,
    /// Movement keys currently held
    pub held: HeldDirections,
    /// Demo mode - the game plays itself
    pub autopilot: bool,
}

/// How long the autopilot lingers on the result screen (ms)
const AUTOPILOT_RESULT_PAUSE_MS: u64 = 2000;

/// Advance the session by one tick at time `now_ms`
pub fn tick(session: &mut GameSession, input: &TickInput, now_ms: u64) -> Result<Vec<SessionEvent>, SimError> {
    session.now_ms = now_ms;
    let mut out = Vec::new();

    let mut input = input.clone();
    if input.autopilot {
        autopilot(session, &mut input, now_ms);
    }
    let input = &input;

    for event in &input.events {
        match event {
            InputEvent::ToggleFullscreen => session.fullscreen = !session.fullscreen,
            InputEvent::ExitFullscreen => session.fullscreen = false,
            InputEvent::Quit => session.quit_requested = true,
            other => {
                if let Some(state_event) = other.as_state_event(session.screen) {
                    out.extend(session.apply(state_event, now_ms)?);
                }
            }
        }
    }

    if session.screen == Screen::Playing {
        let flash_ms = session.settings.heart_flash_ms;
        let mut ending = None;

        if let Some(arena) = session.arena.as_mut() {
            let result = arena.tick(input.held, now_ms);
            for event in result.events {
                match event {
                    ArenaEvent::HazardHit { lives_left } => {
                        session.heart_flash_until = Some(now_ms.saturating_add(flash_ms));
                        out.push(SessionEvent::HazardHit { lives_left });
                    }
                    ArenaEvent::Collected { collected, .. } => {
                        out.push(SessionEvent::Collected {
                            collected,
                            goal: arena.goal,
                        });
                    }
                    ArenaEvent::Won | ArenaEvent::Lost => {}
                }
            }
            ending = match result.outcome {
                Outcome::Won => Some(StateEvent::AllCollected),
                Outcome::Lost => Some(StateEvent::LivesExhausted),
                Outcome::InProgress => None,
            };
        }

        if let Some(event) = ending {
            out.extend(session.apply(event, now_ms)?);
        }
    }

    session.fade.tick();
    Ok(out)
}

/// Drive menus and steer toward the nearest star
fn autopilot(session: &GameSession, input: &mut TickInput, now_ms: u64) {
    match session.screen {
        Screen::Story { .. } | Screen::Instructions => input.events.push(InputEvent::Advance),
        Screen::ModeSelect => {
            // Try the mode without a record first
            let mode = VisibilityMode::ALL
                .into_iter()
                .find(|&m| session.best_times.get(m).is_infinite())
                .unwrap_or(VisibilityMode::Limited);
            input.events.push(InputEvent::SelectMode(mode));
        }
        Screen::Won | Screen::Lost => {
            let finished = session
                .arena
                .as_ref()
                .and_then(|a| a.finished_at_ms)
                .unwrap_or(now_ms);
            if now_ms >= finished + AUTOPILOT_RESULT_PAUSE_MS {
                input.events.push(InputEvent::Restart);
            }
        }
        Screen::Playing => {
            let Some(arena) = session.arena.as_ref() else {
                return;
            };
            let center = arena.actor.center();
            let target = arena.active_collectibles().min_by(|a, b| {
                let da = a.collision.center().distance_squared(center);
                let db = b.collision.center().distance_squared(center);
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            });
            let Some(target) = target else {
                return;
            };

            let to_target = target.collision.center() - center;
            let dead_zone = arena.actor.speed / 2.0;
            let mut held = HeldDirections {
                up: to_target.y < -dead_zone,
                down: to_target.y > dead_zone,
                left: to_target.x < -dead_zone,
                right: to_target.x > dead_zone,
            };

            let blocked = |h: HeldDirections| {
                let target = arena.actor.rect.translated(h.delta(arena.actor.speed)).clamped_within(&arena.bounds);
                target.pos == arena.actor.rect.pos || arena.obstacles.iter().any(|o| o.collision.intersects(&target))
            };

            // Straight line blocked: try each axis alone, then sidestep (flipping now and then)
            if held.any() && blocked(held) {
                let only = |up, down, left, right| HeldDirections { up, down, left, right };
                let horizontal = only(false, false, held.left, held.right);
                let vertical = only(held.up, held.down, false, false);
                let sides = if to_target.x.abs() > to_target.y.abs() {
                    [only(true, false, false, false), only(false, true, false, false)]
                } else {
                    [only(false, false, true, false), only(false, false, false, true)]
                };
                let [first, second] = if (now_ms / 600) % 2 == 0 { sides } else { [sides[1], sides[0]] };
                held = [horizontal, vertical, first, second]
                    .into_iter()
                    .find(|h| h.any() && !blocked(*h))
                    .unwrap_or(held);
            }
            input.held = held;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::{Arena, Rect};

    const DT_MS: u64 = 16;

    fn session() -> GameSession {
        GameSession::new(
            Settings {
                lives: 3,
                ..Settings::default()
            },
            42,
        )
    }

    fn press(event: InputEvent) -> TickInput {
        TickInput {
            events: vec![event],
            ..Default::default()
        }
    }

    fn start_run(session: &mut GameSession, mode: VisibilityMode) {
        let mut now = 0;
        for _ in 0..session.story_pages() {
            tick(session, &press(InputEvent::Advance), now).unwrap();
            now += DT_MS;
        }
        tick(session, &press(InputEvent::SelectMode(mode)), now).unwrap();
        assert_eq!(session.screen, Screen::Playing);
    }

    #[test]
    fn test_tick_story_to_playing() {
        let mut s = session();
        tick(&mut s, &TickInput::default(), 0).unwrap();
        assert_eq!(s.screen, Screen::Story { page: 0 });

        start_run(&mut s, VisibilityMode::Limited);
        assert_eq!(s.mode, Some(VisibilityMode::Limited));
        assert!(s.arena.is_some());
    }

    #[test]
    fn test_fade_decays_per_tick() {
        let mut s = session();
        for i in 0..10 {
            tick(&mut s, &TickInput::default(), i * DT_MS).unwrap();
        }
        assert_eq!(s.fade.alpha, 235.0);

        tick(&mut s, &press(InputEvent::Advance), 200).unwrap();
        // Restarted by the page change, then one tick of decay
        assert_eq!(s.fade.alpha, 253.0);
    }

    #[test]
    fn test_window_toggles() {
        let mut s = session();
        tick(&mut s, &press(InputEvent::ToggleFullscreen), 0).unwrap();
        assert!(s.fullscreen);
        tick(&mut s, &press(InputEvent::ExitFullscreen), 16).unwrap();
        assert!(!s.fullscreen);
        tick(&mut s, &press(InputEvent::Quit), 32).unwrap();
        assert!(s.quit_requested);
        assert_eq!(s.screen, Screen::Story { page: 0 });
    }

    #[test]
    fn test_collecting_last_star_wins() {
        let mut s = session();
        start_run(&mut s, VisibilityMode::Limited);

        // Swap in a known layout: one star one step to the right
        let spawn = Rect::new(100.0, 100.0, 60.0, 60.0);
        let star = Rect::new(135.0, 100.0, 60.0, 60.0);
        s.arena = Some(Arena::from_layout(&s.settings, &[], &[star], spawn, 1000));

        let input = TickInput {
            held: HeldDirections {
                right: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let events = tick(&mut s, &input, 13_500).unwrap();

        assert_eq!(s.screen, Screen::Won);
        assert!(events.contains(&SessionEvent::Collected { collected: 1, goal: 1 }));
        assert!(events.contains(&SessionEvent::RunWon {
            secs: 12.5,
            new_best: true
        }));
        assert_eq!(s.best_times.get(VisibilityMode::Limited), 12.5);

        // Restart returns to the menu
        tick(&mut s, &press(InputEvent::Restart), 14_000).unwrap();
        assert_eq!(s.screen, Screen::ModeSelect);
    }

    #[test]
    fn test_click_restarts_from_result_screen() {
        let mut s = session();
        tick(&mut s, &press(InputEvent::Click), 0).unwrap();
        assert_eq!(s.screen, Screen::Story { page: 1 });

        start_run(&mut s, VisibilityMode::Blind);
        s.apply(StateEvent::LivesExhausted, 1000).unwrap();
        assert_eq!(s.screen, Screen::Lost);

        // Space does nothing here, a click hits the restart button
        tick(&mut s, &press(InputEvent::Advance), 1016).unwrap();
        assert_eq!(s.screen, Screen::Lost);
        tick(&mut s, &press(InputEvent::Click), 1032).unwrap();
        assert_eq!(s.screen, Screen::ModeSelect);
    }

    #[test]
    fn test_lava_hit_flashes_hearts_then_loses() {
        let mut s = session();
        start_run(&mut s, VisibilityMode::Blind);
        let spawn = Rect::new(300.0, 300.0, 60.0, 60.0);
        s.arena = Some(Arena::from_layout(&s.settings, &[], &[Rect::new(0.0, 0.0, 60.0, 60.0)], spawn, 0));

        let mut hits = 0;
        let mut now = 0;
        while s.screen == Screen::Playing && now < 20_000 {
            now += 2000;
            let arena = s.arena.as_mut().unwrap();
            arena.actor.trail = vec![Rect::centered(spawn.center(), 30.0); 11];
            let events = tick(&mut s, &TickInput::default(), now).unwrap();
            hits += events
                .iter()
                .filter(|e| matches!(e, SessionEvent::HazardHit { .. }))
                .count();
            assert_eq!(s.heart_flash_until, Some(now + 1000));
        }

        assert_eq!(hits, 3);
        assert_eq!(s.screen, Screen::Lost);
        assert!(s.best_times.get(VisibilityMode::Blind).is_infinite());
    }

    #[test]
    fn test_huge_heart_flash_saturates() {
        let mut s = GameSession::new(
            Settings {
                lives: 3,
                heart_flash_ms: u64::MAX,
                ..Settings::default()
            },
            42,
        );
        start_run(&mut s, VisibilityMode::Limited);
        let spawn = Rect::new(300.0, 300.0, 60.0, 60.0);
        s.arena = Some(Arena::from_layout(&s.settings, &[], &[Rect::new(0.0, 0.0, 60.0, 60.0)], spawn, 0));
        s.arena.as_mut().unwrap().actor.trail = vec![Rect::centered(spawn.center(), 30.0); 11];

        let events = tick(&mut s, &TickInput::default(), 5000).unwrap();
        assert!(events.contains(&SessionEvent::HazardHit { lives_left: 2 }));
        assert_eq!(s.heart_flash_until, Some(u64::MAX));
        assert_eq!(s.screen, Screen::Playing);
    }

    #[test]
    fn test_autopilot_walks_menus() {
        let mut s = session();
        let auto = TickInput {
            autopilot: true,
            ..Default::default()
        };
        let mut now = 0;
        for _ in 0..=s.story_pages() {
            tick(&mut s, &auto, now).unwrap();
            now += DT_MS;
        }

        assert_eq!(s.screen, Screen::Playing);
        assert_eq!(s.mode, Some(VisibilityMode::Limited));
    }

    #[test]
    fn test_autopilot_steers_toward_star() {
        let mut s = session();
        start_run(&mut s, VisibilityMode::Limited);
        let spawn = Rect::new(100.0, 300.0, 60.0, 60.0);
        let star = Rect::new(600.0, 300.0, 60.0, 60.0);
        s.arena = Some(Arena::from_layout(&s.settings, &[], &[star], spawn, 0));

        let mut input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        autopilot(&s, &mut input, 0);
        assert!(input.held.right);
        assert!(!input.held.left && !input.held.up && !input.held.down);
    }

    #[test]
    fn test_autopilot_sidesteps_rock() {
        let mut s = session();
        start_run(&mut s, VisibilityMode::Limited);
        let spawn = Rect::new(100.0, 300.0, 60.0, 60.0);
        let rock = Rect::new(150.0, 300.0, 40.0, 40.0);
        let star = Rect::new(600.0, 300.0, 60.0, 60.0);
        s.arena = Some(Arena::from_layout(&s.settings, &[rock], &[star], spawn, 0));

        let mut input = TickInput::default();
        autopilot(&s, &mut input, 0);
        assert!(input.held.up);
        assert!(!input.held.right);

        // Other side once the flip timer turns over
        let mut input = TickInput::default();
        autopilot(&s, &mut input, 600);
        assert!(input.held.down);
    }
}
