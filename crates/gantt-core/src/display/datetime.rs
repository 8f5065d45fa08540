//! DateTime display utilities.

use std::fmt;

use jiff::{tz::TimeZone, SignedDuration, Timestamp};

/// A wrapper around `Timestamp` that formats it in the system timezone.
///
/// The format is `YYYY-MM-DD HH:MM TZ`; step dates carry no meaningful
/// seconds.
pub struct LocalDateTime<'a>(pub &'a Timestamp);

impl<'a> fmt::Display for LocalDateTime<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .to_zoned(TimeZone::system())
                .strftime("%Y-%m-%d %H:%M %Z")
        )
    }
}

/// Compact day/hour/minute rendering of a step duration, e.g. `3d`,
/// `1d 4h` or `45m`.
pub struct HumanDuration(pub SignedDuration);

impl fmt::Display for HumanDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.0.as_secs();
        if total < 0 {
            write!(f, "-")?;
        }
        let total = total.unsigned_abs();
        let days = total / 86_400;
        let hours = total % 86_400 / 3_600;
        let minutes = total % 3_600 / 60;

        let parts: Vec<String> = [(days, "d"), (hours, "h"), (minutes, "m")]
            .into_iter()
            .filter(|(value, _)| *value > 0)
            .map(|(value, unit)| format!("{value}{unit}"))
            .collect();
        if parts.is_empty() {
            write!(f, "0m")
        } else {
            write!(f, "{}", parts.join(" "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_duration() {
        assert_eq!(HumanDuration(SignedDuration::from_hours(72)).to_string(), "3d");
        assert_eq!(HumanDuration(SignedDuration::from_hours(28)).to_string(), "1d 4h");
        assert_eq!(HumanDuration(SignedDuration::from_mins(45)).to_string(), "45m");
        assert_eq!(HumanDuration(SignedDuration::ZERO).to_string(), "0m");
        assert_eq!(HumanDuration(SignedDuration::from_hours(-2)).to_string(), "-2h");
    }

    #[test]
    fn test_local_date_time_has_date() {
        let ts = Timestamp::from_second(1_704_067_200).unwrap();
        let output = LocalDateTime(&ts).to_string();
        // Any timezone puts this instant on Dec 31 or Jan 1.
        assert!(output.starts_with("2023-12-31") || output.starts_with("2024-01-01"));
    }
}
