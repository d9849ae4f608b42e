// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sources of "now" for test case and suite timestamps.
//!
//! Timestamps are recorded as `DateTime<FixedOffset>` so that reports render the offset the run
//! happened in. Tests use [`ManualClock`] to control elapsed times exactly.

use chrono::{DateTime, FixedOffset, Local, TimeDelta, Utc};
use std::{cell::Cell, rc::Rc, time::Duration};

/// A source of the current time.
pub trait Clock {
    /// Returns the current time.
    fn now(&self) -> DateTime<FixedOffset>;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<FixedOffset> {
        (**self).now()
    }
}

/// The realtime clock, in the local time zone.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same underlying time, so a test can hold on to one handle while a
/// [`ReportWriter`](crate::ReportWriter) owns another.
#[derive(Clone, Debug)]
pub struct ManualClock {
    now: Rc<Cell<DateTime<FixedOffset>>>,
}

impl ManualClock {
    /// Creates a new clock stopped at `start`.
    pub fn new(start: DateTime<FixedOffset>) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    /// Moves the clock forward by `by`, stopping at the latest representable time.
    pub fn advance(&self, by: Duration) {
        let next = TimeDelta::from_std(by)
            .ok()
            .and_then(|by| self.now.get().checked_add_signed(by))
            .unwrap_or_else(|| DateTime::<Utc>::MAX_UTC.fixed_offset());
        self.now.set(next);
    }

    /// Sets the clock to `to`, which may be earlier than the current time.
    pub fn set(&self, to: DateTime<FixedOffset>) {
        self.now.set(to);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_shared_between_clones() {
        let start = DateTime::parse_from_rfc3339("2024-03-01T10:00:00+01:00").unwrap();
        let clock = ManualClock::new(start);
        let other = clock.clone();

        other.advance(Duration::from_millis(1500));
        assert_eq!(
            clock.now() - start,
            TimeDelta::milliseconds(1500),
            "advancing a clone advances the original"
        );

        clock.set(start);
        assert_eq!(other.now(), start);
    }

    #[test]
    fn manual_clock_saturates() {
        let start = DateTime::parse_from_rfc3339("2024-03-01T10:00:00+01:00").unwrap();
        let clock = ManualClock::new(start);

        clock.advance(Duration::MAX);
        assert_eq!(clock.now(), DateTime::<Utc>::MAX_UTC.fixed_offset());

        clock.advance(Duration::from_secs(1));
        assert_eq!(clock.now(), DateTime::<Utc>::MAX_UTC.fixed_offset());
    }
}
