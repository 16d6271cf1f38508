//! Time source for pricing
//!
//! Off-peak discounts depend on the local hour, so the cart builder takes
//! its notion of "now" from a [`Clock`] instead of reading the system time.

use chrono::{DateTime, FixedOffset, Local, Timelike};

/// Source of the current time, carrying its UTC offset
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;

    /// Local hour of [`Clock::now`] (0-23)
    fn hour(&self) -> u32 {
        self.now().hour()
    }
}

/// Wall clock in the process's local time zone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Clock frozen at a given instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<FixedOffset>);

impl FixedClock {
    pub fn new(at: DateTime<FixedOffset>) -> Self {
        Self(at)
    }

    /// Parses an RFC 3339 timestamp such as `2026-03-01T14:00:00+05:30`
    ///
    /// # Errors
    ///
    /// Returns the parse error message.
    pub fn parse(rfc3339: &str) -> Result<Self, String> {
        DateTime::parse_from_rfc3339(rfc3339)
            .map(Self)
            .map_err(|e| format!("invalid timestamp '{rfc3339}': {e}"))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_reports_local_hour() {
        let clock = FixedClock::parse("2026-03-01T23:30:00+05:30").unwrap();
        assert_eq!(clock.hour(), 23);
    }

    #[test]
    fn test_fixed_clock_rejects_garbage() {
        assert!(FixedClock::parse("yesterday").is_err());
    }
}
