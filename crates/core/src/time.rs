use chrono::{DateTime, Datelike, Days, Duration, Utc};

/// A simple clock abstraction for deterministic time in services and tests.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// Returns a clock that uses the current system time.
    #[must_use]
    pub fn default_clock() -> Self {
        Self::Default
    }

    /// Returns a clock fixed at the given timestamp.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    /// Returns the current time according to the clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::Default => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// If this is a fixed clock, advance it by the given duration.
    ///
    /// Has no effect on `Clock::Default`.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(t) = self {
            *t += delta;
        }
    }

    /// Returns true if this clock represents real time.
    #[must_use]
    pub fn is_default(&self) -> bool {
        matches!(self, Clock::Default)
    }

    /// Returns true if this clock is fixed.
    #[must_use]
    pub fn is_fixed(&self) -> bool {
        matches!(self, Clock::Fixed(_))
    }
}

// ─── Calendar Helpers ──────────────────────────────────────────────────────────

/// Returns midnight (00:00:00 UTC) of the given instant's calendar day.
#[must_use]
pub fn start_of_day(at: DateTime<Utc>) -> DateTime<Utc> {
    at.date_naive()
        .and_hms_opt(0, 0, 0)
        .expect("midnight is always valid")
        .and_utc()
}

/// Returns midnight of the Sunday starting the calendar week containing `at`.
///
/// Weeks run Sunday 00:00:00 UTC through the following Saturday.
#[must_use]
pub fn start_of_week(at: DateTime<Utc>) -> DateTime<Utc> {
    let days_from_sunday = u64::from(at.weekday().num_days_from_sunday());
    let sunday = at
        .date_naive()
        .checked_sub_days(Days::new(days_from_sunday))
        .expect("week start is within chrono's date range");
    sunday
        .and_hms_opt(0, 0, 0)
        .expect("midnight is always valid")
        .and_utc()
}

/// Deterministic timestamp for tests and examples (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests and doc examples.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// Returns a `Clock` fixed at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    #[test]
    fn fixed_clock_stays_put_until_advanced() {
        let mut clock = fixed_clock();
        let before = clock.now();
        clock.advance(Duration::minutes(5));
        assert_eq!(clock.now(), before + Duration::minutes(5));
    }

    #[test]
    fn advance_is_a_noop_on_the_default_clock() {
        let mut clock = Clock::default_clock();
        assert!(clock.is_default());
        clock.advance(Duration::hours(1));
        assert!(clock.is_default());
    }

    #[test]
    fn start_of_day_truncates_time() {
        // 2023-11-14T22:13:20Z
        let midnight = start_of_day(fixed_now());
        assert_eq!(midnight.to_rfc3339(), "2023-11-14T00:00:00+00:00");
    }

    #[test]
    fn start_of_week_lands_on_sunday_midnight() {
        // fixed_now() is a Tuesday; the week began on Sunday 2023-11-12.
        assert_eq!(fixed_now().weekday(), Weekday::Tue);
        let sunday = start_of_week(fixed_now());
        assert_eq!(sunday.weekday(), Weekday::Sun);
        assert_eq!(sunday.to_rfc3339(), "2023-11-12T00:00:00+00:00");
    }

    #[test]
    fn start_of_week_is_idempotent_on_sunday_midnight() {
        let sunday = start_of_week(fixed_now());
        assert_eq!(start_of_week(sunday), sunday);
    }
}
