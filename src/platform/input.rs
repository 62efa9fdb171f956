//! Input sources and key mapping
//!
//! A windowing backend feeds raw key presses into [`KeyboardInput`]; headless
//! runs and tests use [`ScriptedInput`]. Both hand the loop one [`TickInput`]
//! per frame.

use std::collections::{HashMap, VecDeque};

use crate::sim::{HeldDirections, InputEvent, TickInput, VisibilityMode};

/// Produces the input for the next tick
pub trait InputSource {
    /// Drain everything pending since the last call (non-blocking)
    fn poll(&mut self) -> TickInput;
}

/// Physical keys (and the mouse button) the game cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Space,
    MouseLeft,
    Digit1,
    Digit2,
    H,
    R,
    F11,
    Escape,
    Up,
    Down,
    Left,
    Right,
    W,
    A,
    S,
    D,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Binding {
    Event(InputEvent),
    Move(Direction),
}

/// Key to action table
#[derive(Debug, Clone)]
pub struct KeyMap {
    bindings: HashMap<Key, Binding>,
}

impl Default for KeyMap {
    fn default() -> Self {
        use Binding::*;

        let bindings = HashMap::from([
            (Key::Space, Event(InputEvent::Advance)),
            (Key::MouseLeft, Event(InputEvent::Click)),
            (Key::Digit1, Event(InputEvent::SelectMode(VisibilityMode::Limited))),
            (Key::Digit2, Event(InputEvent::SelectMode(VisibilityMode::Blind))),
            (Key::H, Event(InputEvent::ShowInstructions)),
            (Key::R, Event(InputEvent::Restart)),
            (Key::F11, Event(InputEvent::ToggleFullscreen)),
            (Key::Escape, Event(InputEvent::ExitFullscreen)),
            (Key::Up, Move(Direction::Up)),
            (Key::W, Move(Direction::Up)),
            (Key::Down, Move(Direction::Down)),
            (Key::S, Move(Direction::Down)),
            (Key::Left, Move(Direction::Left)),
            (Key::A, Move(Direction::Left)),
            (Key::Right, Move(Direction::Right)),
            (Key::D, Move(Direction::Right)),
        ]);
        Self { bindings }
    }
}

impl KeyMap {
    /// Discrete event fired when `key` goes down
    pub fn event_for(&self, key: Key) -> Option<InputEvent> {
        match self.bindings.get(&key)? {
            Binding::Event(event) => Some(*event),
            Binding::Move(_) => None,
        }
    }

    /// Rebuild held directions from the set of keys currently down
    pub fn held_from<'a>(&self, keys: impl IntoIterator<Item = &'a Key>) -> HeldDirections {
        let mut held = HeldDirections::default();
        for key in keys {
            if let Some(Binding::Move(dir)) = self.bindings.get(key) {
                match dir {
                    Direction::Up => held.up = true,
                    Direction::Down => held.down = true,
                    Direction::Left => held.left = true,
                    Direction::Right => held.right = true,
                }
            }
        }
        held
    }
}

/// Accumulates key presses between polls
#[derive(Debug, Default)]
pub struct KeyboardInput {
    keymap: KeyMap,
    pending: Vec<InputEvent>,
    down: Vec<Key>,
}

impl KeyboardInput {
    pub fn new(keymap: KeyMap) -> Self {
        Self {
            keymap,
            pending: Vec::new(),
            down: Vec::new(),
        }
    }

    pub fn press(&mut self, key: Key) {
        // Key repeat doesn't refire events
        if self.down.contains(&key) {
            return;
        }
        self.down.push(key);
        if let Some(event) = self.keymap.event_for(key) {
            self.pending.push(event);
        }
    }

    pub fn release(&mut self, key: Key) {
        self.down.retain(|k| *k != key);
    }

    /// Window close button
    pub fn request_quit(&mut self) {
        self.pending.push(InputEvent::Quit);
    }
}

impl InputSource for KeyboardInput {
    fn poll(&mut self) -> TickInput {
        TickInput {
            events: std::mem::take(&mut self.pending),
            held: self.keymap.held_from(&self.down),
            autopilot: false,
        }
    }
}

/// Replays a fixed queue of frames, then idles (or hands over to the autopilot)
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: VecDeque<TickInput>,
    autopilot: bool,
}

impl ScriptedInput {
    pub fn new(frames: impl IntoIterator<Item = TickInput>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            autopilot: false,
        }
    }

    /// Empty script that lets the game play itself
    pub fn autopilot() -> Self {
        Self {
            frames: VecDeque::new(),
            autopilot: true,
        }
    }

    pub fn push(&mut self, frame: TickInput) {
        self.frames.push_back(frame);
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> TickInput {
        self.frames.pop_front().unwrap_or_else(|| TickInput {
            autopilot: self.autopilot,
            ..Default::default()
        })
    }
}
