//! Durations given on the command line.

use anyhow::{anyhow, bail, Context};
use std::time::Duration;

/// Longest accepted duration: one year, the lifetime limit of a standard
/// state machine execution.
pub const MAX_DURATION: Duration = Duration::from_secs(366 * 24 * 3600);

/// Unit suffixes and their length in seconds. A bare number is seconds.
const UNITS: [(char, u64); 3] = [('h', 3600), ('m', 60), ('s', 1)];

/// Parse `"90"`, `"90s"`, `"15m"` or `"2h"` into a [`Duration`] no longer
/// than [`MAX_DURATION`].
pub fn parse_duration(s: &str) -> anyhow::Result<Duration> {
    let s = s.trim();
    if s.is_empty() {
        bail!("Empty duration string");
    }

    let (digits, unit_secs) = UNITS
        .iter()
        .find_map(|&(suffix, secs)| s.strip_suffix(suffix).map(|digits| (digits, secs)))
        .unwrap_or((s, 1));

    let count: u64 = digits
        .parse()
        .with_context(|| format!("Invalid duration value: {s}"))?;
    let secs = count
        .checked_mul(unit_secs)
        .filter(|&secs| secs <= MAX_DURATION.as_secs())
        .ok_or_else(|| {
            anyhow!(
                "Duration {s} exceeds the maximum of {}h",
                MAX_DURATION.as_secs() / 3600
            )
        })?;
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units() {
        assert_eq!(parse_duration("300").unwrap(), Duration::from_secs(300));
        assert_eq!(parse_duration("45s").unwrap(), Duration::from_secs(45));
        assert_eq!(parse_duration("30m").unwrap(), Duration::from_secs(1800));
        assert_eq!(parse_duration(" 1h ").unwrap(), Duration::from_secs(3600));
    }

    #[test]
    fn test_invalid() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("-5s").is_err());
        assert!(parse_duration("1d").is_err());
        assert!(parse_duration("abc").is_err());
        assert!(parse_duration("h").is_err());
    }

    #[test]
    fn test_upper_bound() {
        assert_eq!(parse_duration("8784h").unwrap(), MAX_DURATION);

        let err = parse_duration("8785h").unwrap_err();
        assert!(err.to_string().contains("exceeds the maximum"), "{err}");

        // Would overflow u64 seconds
        assert!(parse_duration("5124095576030433h").is_err());
        assert!(parse_duration("18446744073709551615").is_err());
        assert!(parse_duration("18446744073709551616").is_err());
    }
}
