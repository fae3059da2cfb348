//! Time utilities

use std::time::Duration as StdDuration;

use chrono::Duration;

/// Format elapsed wall time as seconds with millisecond precision
pub fn format_seconds(elapsed: StdDuration) -> String {
    format!("{:.3}", elapsed.as_secs_f64())
}

/// Human-readable run length for summaries
///
/// Sub-second values are shown in milliseconds; longer ones as hours,
/// minutes and whole seconds with zero units left out.
pub fn format_std_duration(elapsed: StdDuration) -> String {
    if elapsed.as_secs() == 0 {
        return format!("{}ms", elapsed.as_millis());
    }

    let Ok(elapsed) = Duration::from_std(elapsed) else {
        return format!("{}s", elapsed.as_secs());
    };

    let hours = elapsed.num_hours();
    let minutes = (elapsed - Duration::hours(hours)).num_minutes();
    let seconds = (elapsed - Duration::hours(hours) - Duration::minutes(minutes)).num_seconds();

    [(hours, "h"), (minutes, "m"), (seconds, "s")]
        .iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, unit)| format!("{value}{unit}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(StdDuration::from_millis(0)), "0.000");
        assert_eq!(format_seconds(StdDuration::from_micros(4_400)), "0.004");
        assert_eq!(format_seconds(StdDuration::from_millis(1_500)), "1.500");
        assert_eq!(format_seconds(StdDuration::from_secs(600)), "600.000");
    }

    #[test]
    fn test_format_std_duration() {
        assert_eq!(format_std_duration(StdDuration::ZERO), "0ms");
        assert_eq!(format_std_duration(StdDuration::from_millis(250)), "250ms");
        assert_eq!(format_std_duration(StdDuration::from_millis(30_400)), "30s");
        assert_eq!(format_std_duration(StdDuration::from_secs(601)), "10m 1s");
        assert_eq!(format_std_duration(StdDuration::from_secs(3600)), "1h");
        assert_eq!(format_std_duration(StdDuration::from_secs(3661)), "1h 1m 1s");
        assert_eq!(format_std_duration(StdDuration::from_secs(90_000)), "25h");
    }
}
