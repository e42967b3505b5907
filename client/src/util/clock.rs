//! Wall-clock time and simulated latency.
//!
//! Browser builds use `Date.now()` and `gloo-timers`; native builds read the
//! system clock and skip simulated delays entirely.

#[cfg(test)]
#[path = "clock_test.rs"]
mod clock_test;

use std::time::Duration;

pub const MS_PER_HOUR: i64 = 60 * 60 * 1000;
pub const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Milliseconds since the Unix epoch.
pub fn now_ms() -> i64 {
    #[cfg(feature = "hydrate")]
    {
        #[allow(clippy::cast_possible_truncation)]
        let now = js_sys::Date::now() as i64;
        now
    }
    #[cfg(not(feature = "hydrate"))]
    {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
    }
}

/// Wait for `duration` in the browser. Resolves immediately elsewhere.
pub async fn sleep(duration: Duration) {
    #[cfg(feature = "hydrate")]
    {
        if !duration.is_zero() {
            gloo_timers::future::sleep(duration).await;
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = duration;
    }
}

/// Integer division rounded half away from zero.
pub fn div_round(value: i64, divisor: i64) -> i64 {
    let quotient = value / divisor;
    let remainder = value % divisor;
    if remainder.abs() * 2 >= divisor.abs() { quotient + value.signum() * divisor.signum() } else { quotient }
}
