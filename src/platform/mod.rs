//! Platform abstraction layer
//!
//! Keeps the simulation free of OS concerns:
//! - Time (monotonic clock, frame limiting)
//! - Input (key mapping, scripted replay)

pub mod input;
pub mod time;

pub use input::{InputSource, Key, KeyMap, KeyboardInput, ScriptedInput};
pub use time::{Clock, FrameLimiter, ManualClock, SystemClock};
