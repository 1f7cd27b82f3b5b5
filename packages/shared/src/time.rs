//! Time-related utilities with clock abstraction for testability.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{TimeZone, Utc};

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Get current Unix timestamp in UTC (milliseconds)
    fn now_millis(&self) -> i64;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        now_utc_millis()
    }
}

/// Fixed clock implementation for testing (returns a fixed time)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_time: i64,
}

impl FixedClock {
    /// Create a new fixed clock with the given timestamp
    pub fn new(fixed_time_millis: i64) -> Self {
        Self {
            fixed_time: fixed_time_millis,
        }
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.fixed_time
    }
}

/// Manually advanced clock for tests that step through logical time,
/// e.g. driving room eviction past a grace period without sleeping.
#[derive(Debug)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    /// Create a new manual clock starting at the given timestamp
    pub fn new(start_millis: i64) -> Self {
        Self {
            now: AtomicI64::new(start_millis),
        }
    }

    /// Advance the clock by the given number of milliseconds
    pub fn advance(&self, millis: i64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }

    /// Set the clock to an absolute timestamp
    pub fn set(&self, millis: i64) {
        self.now.store(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Get current Unix timestamp in UTC (milliseconds)
pub fn now_utc_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert Unix timestamp (milliseconds) to UTC RFC 3339 format
pub fn timestamp_to_rfc3339(timestamp_millis: i64) -> String {
    let seconds = timestamp_millis.div_euclid(1000);
    let nanos = (timestamp_millis.rem_euclid(1000) * 1_000_000) as u32;
    match Utc.timestamp_opt(seconds, nanos).single() {
        Some(dt) => dt.to_rfc3339(),
        None => String::from("invalid-timestamp"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_returns_non_zero_timestamp() {
        // given:
        let clock = SystemClock;

        // when:
        let timestamp = clock.now_millis();

        // then:
        assert!(timestamp > 0);
    }

    #[test]
    fn test_system_clock_returns_increasing_timestamps() {
        // given:
        let clock = SystemClock;

        // when:
        let timestamp1 = clock.now_millis();
        std::thread::sleep(std::time::Duration::from_millis(10));
        let timestamp2 = clock.now_millis();

        // then:
        assert!(timestamp2 >= timestamp1);
    }

    #[test]
    fn test_fixed_clock_returns_fixed_timestamp() {
        // given:
        let fixed_time = 1234567890123;
        let clock = FixedClock::new(fixed_time);

        // when:
        let timestamp = clock.now_millis();

        // then:
        assert_eq!(timestamp, fixed_time);
    }

    #[test]
    fn test_manual_clock_advances() {
        // given:
        let clock = ManualClock::new(1000);

        // when:
        clock.advance(500);

        // then:
        assert_eq!(clock.now_millis(), 1500);
    }

    #[test]
    fn test_manual_clock_set_absolute() {
        // given:
        let clock = ManualClock::new(1000);

        // when:
        clock.set(9999);

        // then:
        assert_eq!(clock.now_millis(), 9999);
    }

    #[test]
    fn test_timestamp_to_rfc3339_format() {
        // given: 2023-01-01 00:00:00 UTC in milliseconds
        let timestamp = 1672531200000;

        // when:
        let result = timestamp_to_rfc3339(timestamp);

        // then:
        assert!(result.starts_with("2023-01-01T00:00:00"));
        assert!(result.contains("+00:00"));
    }

    #[test]
    fn test_timestamp_to_rfc3339_with_milliseconds() {
        // given:
        let timestamp = 1672531200123;

        // when:
        let result = timestamp_to_rfc3339(timestamp);

        // then:
        assert!(result.starts_with("2023-01-01T00:00:00"));
    }
}
