//! Time-related utilities with clock abstraction for testability.

use chrono::{DateTime, Local, TimeZone};

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Get current Unix timestamp in local time (milliseconds)
    fn now_millis(&self) -> i64;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        get_local_timestamp()
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

/// Get current Unix timestamp (milliseconds)
pub fn get_local_timestamp() -> i64 {
    Local::now().timestamp_millis()
}

/// Format a Unix timestamp (milliseconds) as a wall-clock time, `HH:mm:ss`
pub fn format_clock_time(timestamp_millis: i64) -> String {
    to_local_datetime(timestamp_millis).format("%H:%M:%S").to_string()
}

/// Format a Unix timestamp (milliseconds) as a full local date,
/// `YYYY-MM-DD HH:mm:ss`
pub fn format_full_date(timestamp_millis: i64) -> String {
    to_local_datetime(timestamp_millis)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

fn to_local_datetime(timestamp_millis: i64) -> DateTime<Local> {
    let seconds = timestamp_millis.div_euclid(1000);
    let nanos = (timestamp_millis.rem_euclid(1000) * 1_000_000) as u32;
    Local.timestamp_opt(seconds, nanos).unwrap()
}
