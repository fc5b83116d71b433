//! Timestamp and seek-fraction arithmetic.
//!
//! All display math lives here so the controller and the snapshot agree on
//! how unknown values render: a missing position or duration produces an
//! empty timestamp and a zero seek fraction rather than a guess.

use std::time::Duration;

/// Format a duration as zero-padded `mm:ss`, flooring sub-second remainders.
///
/// Minutes are not capped; an hour-long value renders as `60:00`.
pub fn format_mm_ss(value: Duration) -> String {
    let total_seconds = value.as_secs();
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

/// Format a `position / duration` pair as `"mm:ss / mm:ss"`.
///
/// Returns an empty string when either value is unknown, so the caller can
/// render the result unconditionally.
pub fn format_timestamp(position: Option<Duration>, duration: Option<Duration>) -> String {
    match (position, duration) {
        (Some(position), Some(duration)) => {
            format!("{} / {}", format_mm_ss(position), format_mm_ss(duration))
        }
        _ => String::new(),
    }
}

/// Fraction of the track elapsed, in `0.0..=1.0`.
///
/// Returns `0.0` when either value is unknown or the duration is zero.
pub fn seek_fraction(position: Option<Duration>, duration: Option<Duration>) -> f64 {
    match (position, duration) {
        (Some(position), Some(duration)) if !duration.is_zero() => {
            (position.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0)
        }
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn formats_zero_padded_mm_ss() {
        assert_eq!(format_mm_ss(ms(0)), "00:00");
        assert_eq!(format_mm_ss(ms(5_000)), "00:05");
        assert_eq!(format_mm_ss(ms(65_000)), "01:05");
        assert_eq!(format_mm_ss(ms(600_000)), "10:00");
    }

    #[test]
    fn floors_sub_second_remainders() {
        assert_eq!(format_mm_ss(ms(999)), "00:00");
        assert_eq!(format_mm_ss(ms(59_999)), "00:59");
    }

    #[test]
    fn minutes_are_not_capped() {
        assert_eq!(format_mm_ss(Duration::from_secs(3_600)), "60:00");
        assert_eq!(format_mm_ss(Duration::from_secs(6_005)), "100:05");
    }

    #[test]
    fn formats_position_over_duration() {
        assert_eq!(
            format_timestamp(Some(ms(65_000)), Some(ms(125_000))),
            "01:05 / 02:05"
        );
    }

    #[test]
    fn unknown_values_render_empty() {
        assert_eq!(format_timestamp(None, Some(ms(1_000))), "");
        assert_eq!(format_timestamp(Some(ms(1_000)), None), "");
        assert_eq!(format_timestamp(None, None), "");
    }

    #[test]
    fn seek_fraction_midpoint() {
        let fraction = seek_fraction(Some(ms(30_000)), Some(ms(60_000)));
        assert!((fraction - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn seek_fraction_defaults_to_zero() {
        assert_eq!(seek_fraction(None, Some(ms(60_000))), 0.0);
        assert_eq!(seek_fraction(Some(ms(30_000)), None), 0.0);
        assert_eq!(seek_fraction(Some(ms(30_000)), Some(ms(0))), 0.0);
    }

    #[test]
    fn seek_fraction_clamps_overshoot() {
        assert_eq!(seek_fraction(Some(ms(70_000)), Some(ms(60_000))), 1.0);
    }
}
