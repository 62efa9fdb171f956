//! Best completion time per visibility mode
//!
//! Kept for the life of the process only.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::sim::VisibilityMode;

/// Fastest win per mode, in seconds
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BestTimes {
    entries: HashMap<VisibilityMode, f64>,
}

impl BestTimes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Best time for a mode; infinity when there is no record
    pub fn get(&self, mode: VisibilityMode) -> f64 {
        self.entries.get(&mode).copied().unwrap_or(f64::INFINITY)
    }

    /// True if `secs` would beat the stored record
    pub fn qualifies(&self, mode: VisibilityMode, secs: f64) -> bool {
        secs < self.get(mode)
    }

    /// Store `secs` if it strictly beats the record. Returns true on a new record.
    pub fn record(&mut self, mode: VisibilityMode, secs: f64) -> bool {
        if !self.qualifies(mode, secs) {
            return false;
        }
        self.entries.insert(mode, secs);
        log::info!("New best time for {}: {:.1}s", mode.tag(), secs);
        true
    }

    /// Menu line, e.g. `Best NORMAL: 12.3s`
    pub fn describe(&self, mode: VisibilityMode) -> String {
        let best = self.get(mode);
        if best.is_infinite() {
            format!("Best {}: No record", mode.tag())
        } else {
            format!("Best {}: {:.1}s", mode.tag(), best)
        }
    }
}
