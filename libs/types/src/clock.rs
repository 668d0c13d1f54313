//! Venue clock: ISO-8601 UTC timestamps with synthetic microseconds
//!
//! The wall clock only needs whole-second resolution. The sub-second field
//! is a counter of calls within the current second, reset when the second
//! advances, so two timestamps taken in the same second still order
//! correctly. It is not a real microsecond reading.

use chrono::{DateTime, Utc};

/// Stateful timestamp source owned by one engine.
///
/// Successive calls never produce a decreasing string: if the wall clock
/// steps backwards, the clock stays on the second it last saw and keeps
/// incrementing the synthetic field.
#[derive(Debug)]
pub struct Clock {
    second: i64,
    base: DateTime<Utc>,
    micro: u32,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            second: i64::MIN,
            base: Utc::now(),
            micro: 0,
        }
    }

    /// Current timestamp, e.g. `2015-07-05T22:16:18.000041Z`.
    pub fn now(&mut self) -> String {
        self.tick(Utc::now())
    }

    fn tick(&mut self, wall: DateTime<Utc>) -> String {
        if wall.timestamp() > self.second {
            self.second = wall.timestamp();
            self.base = wall;
            self.micro = 0;
        } else {
            // Same second, or the wall clock regressed: disambiguate.
            self.micro += 1;
        }
        format!("{}.{:06}Z", self.base.format("%Y-%m-%dT%H:%M:%S"), self.micro)
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
