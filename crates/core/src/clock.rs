//! Clock abstraction so date-sensitive rules stay deterministic under test.

use chrono::{DateTime, NaiveDate, Utc};

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;

    /// Calendar date of [`Clock::now`] (UTC).
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Production clock that delegates to the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that always returns a fixed point in time.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Fixed clock at midnight UTC of the given date.
    pub fn on(date: NaiveDate) -> Self {
        Self(date.and_time(chrono::NaiveTime::MIN).and_utc())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn fixed_clock_today_is_utc_date() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2030, 3, 9, 23, 59, 59).unwrap());
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2030, 3, 9).unwrap());
    }

    #[test]
    fn fixed_clock_on_date_starts_at_midnight() {
        let date = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        let clock = FixedClock::on(date);
        assert_eq!(clock.today(), date);
        assert_eq!(clock.now(), Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap());
    }
}
