//! Clocks and frame pacing

use std::cell::Cell;
use std::time::{Duration, Instant};

/// Monotonic millisecond clock
pub trait Clock {
    /// Milliseconds since the clock started
    fn now_ms(&self) -> u64;

    /// Block (or pretend to) for `ms` milliseconds
    fn sleep_ms(&self, ms: u64);
}

/// Wall clock backed by [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    fn sleep_ms(&self, ms: u64) {
        std::thread::sleep(Duration::from_millis(ms));
    }
}

/// Hand-driven clock for tests and headless runs; sleeping advances it
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self { now: Cell::new(start_ms) }
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }

    fn sleep_ms(&self, ms: u64) {
        self.advance(ms);
    }
}

/// Caps the loop at a fixed frame rate.
///
/// Deadlines accumulate in fractional ms so 60 Hz doesn't drift to 62.5 Hz.
/// A loop that falls more than a frame behind resyncs instead of bursting.
#[derive(Debug, Clone)]
pub struct FrameLimiter {
    frame_ms: f64,
    next_deadline: Option<f64>,
}

impl FrameLimiter {
    pub fn new(fps: u32) -> Self {
        Self {
            frame_ms: 1000.0 / fps.max(1) as f64,
            next_deadline: None,
        }
    }

    pub fn frame_ms(&self) -> f64 {
        self.frame_ms
    }

    /// Sleep until the next frame slice. Returns the time slept in ms.
    pub fn wait(&mut self, clock: &dyn Clock) -> u64 {
        let now = clock.now_ms() as f64;
        let deadline = self.next_deadline.unwrap_or(now) + self.frame_ms;

        if deadline <= now {
            // Behind schedule: start a fresh slice from here
            self.next_deadline = Some(now);
            return 0;
        }

        let sleep = (deadline - now).ceil() as u64;
        clock.sleep_ms(sleep);
        self.next_deadline = Some(deadline);
        sleep
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_sleep_advances() {
        let clock = ManualClock::new(100);
        clock.sleep_ms(16);
        clock.advance(4);
        assert_eq!(clock.now_ms(), 120);
    }

    #[test]
    fn test_limiter_paces_sixty_hz() {
        let clock = ManualClock::new(0);
        let mut limiter = FrameLimiter::new(60);

        for _ in 0..60 {
            limiter.wait(&clock);
        }
        // Rounding up per frame never runs ahead of the fractional schedule by a full frame
        let now = clock.now_ms();
        assert!((1000..1017).contains(&now), "60 frames took {now} ms");
    }

    #[test]
    fn test_limiter_accounts_for_work() {
        let clock = ManualClock::new(0);
        let mut limiter = FrameLimiter::new(50);

        limiter.wait(&clock);
        assert_eq!(clock.now_ms(), 20);

        // 15 ms of work leaves 5 ms to sleep
        clock.advance(15);
        assert_eq!(limiter.wait(&clock), 5);
        assert_eq!(clock.now_ms(), 40);
    }

    #[test]
    fn test_limiter_resyncs_when_behind() {
        let clock = ManualClock::new(0);
        let mut limiter = FrameLimiter::new(50);
        limiter.wait(&clock);

        clock.advance(100);
        assert_eq!(limiter.wait(&clock), 0);
        assert_eq!(limiter.wait(&clock), 20);
        assert_eq!(clock.now_ms(), 140);
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
    }
}
