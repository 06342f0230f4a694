//! `Duration` field values: seconds on the wire, `1d 2h 3m 4s` for display.

use std::sync::LazyLock;

use regex::Regex;

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: u64 = 24 * SECONDS_PER_HOUR;

static DURATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(\d+)d)?\s*(?:(\d+)h)?\s*(?:(\d+)m)?\s*(?:(\d+)s)?")
        .expect("Invalid duration regex")
});

/// Parse a `1d 2h 3m 4s` style string into seconds.
///
/// Every unit is optional but units must appear in that order; parsing stops
/// at the first text that does not fit. Returns `None` when the input is
/// empty or nothing before that point adds up to a non-zero duration.
pub fn parse_duration(input: &str) -> Option<u64> {
    if input.is_empty() {
        return None;
    }
    let captures = DURATION_REGEX.captures(input)?;
    let units = [SECONDS_PER_DAY, SECONDS_PER_HOUR, SECONDS_PER_MINUTE, 1];
    let mut total: u64 = 0;
    for (group, unit) in (1..=4).zip(units) {
        if let Some(digits) = captures.get(group) {
            let count: u64 = digits.as_str().parse().ok()?;
            total = total.checked_add(count.checked_mul(unit)?)?;
        }
    }
    (total > 0).then_some(total)
}

/// Render seconds as `1d 2h 3m 4s`, omitting zero units.
///
/// Zero renders as `0s`; a missing value renders as an empty string.
pub fn format_duration(seconds: Option<u64>) -> String {
    let Some(mut remaining) = seconds else {
        return String::new();
    };
    let mut parts = Vec::new();
    for (unit, suffix) in [
        (SECONDS_PER_DAY, 'd'),
        (SECONDS_PER_HOUR, 'h'),
        (SECONDS_PER_MINUTE, 'm'),
        (1, 's'),
    ] {
        let count = remaining / unit;
        remaining %= unit;
        if count > 0 {
            parts.push(format!("{count}{suffix}"));
        }
    }
    if parts.is_empty() {
        "0s".to_string()
    } else {
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_and_partial_forms() {
        assert_eq!(parse_duration("1d 2h 3m 4s"), Some(93_784));
        assert_eq!(parse_duration("2h"), Some(7_200));
        assert_eq!(parse_duration("1d2h"), Some(93_600));
        assert_eq!(parse_duration("90m"), Some(5_400));
        assert_eq!(parse_duration("45s"), Some(45));
    }

    #[test]
    fn empty_zero_and_garbage_are_none() {
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("0s"), None);
        assert_eq!(parse_duration("soon"), None);
        assert_eq!(parse_duration("99999999999999999999999d"), None);
    }

    #[test]
    fn parsing_stops_at_out_of_order_units() {
        assert_eq!(parse_duration("3m 2h"), Some(180));
    }

    #[test]
    fn formats_without_zero_units() {
        assert_eq!(format_duration(Some(93_784)), "1d 2h 3m 4s");
        assert_eq!(format_duration(Some(3_600)), "1h");
        assert_eq!(format_duration(Some(86_460)), "1d 1m");
        assert_eq!(format_duration(Some(0)), "0s");
        assert_eq!(format_duration(None), "");
    }

    #[test]
    fn format_then_parse_agrees() {
        for seconds in [1, 59, 61, 3_599, 90_061, 1_000_000] {
            assert_eq!(parse_duration(&format_duration(Some(seconds))), Some(seconds));
        }
    }
}
