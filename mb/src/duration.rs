//! Second-count formatting and parsing for result entry
//!
//! Two display forms exist: a long form shown on sliders and result
//! cards ("1:30 min", "45 sec") and a compact form used in history
//! listings ("1:30", "45s"). `parse_seconds` accepts both.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DurationParseError {
    #[error("Empty duration string")]
    Empty,

    #[error("Invalid duration: {0}")]
    Invalid(String),
}

/// Long display form: "1:30 min" above a minute, "45 sec" below
pub fn format_seconds(total: i64) -> String {
    let minutes = total / 60;
    let seconds = total % 60;
    if minutes > 0 {
        format!("{}:{:02} min", minutes, seconds)
    } else {
        format!("{} sec", seconds)
    }
}

/// Compact display form: "1:30" above a minute, "45s" below
pub fn format_compact(total: i64) -> String {
    let minutes = total / 60;
    let seconds = total % 60;
    if minutes > 0 {
        format!("{}:{:02}", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// Parse either display form (and bare numbers) back into seconds
pub fn parse_seconds(text: &str) -> Result<i64, DurationParseError> {
    let cleaned = text.trim().to_lowercase();
    if cleaned.is_empty() {
        return Err(DurationParseError::Empty);
    }

    let invalid = || DurationParseError::Invalid(text.to_string());

    let total = if let Some((minutes_part, seconds_part)) = cleaned.split_once(':') {
        let seconds_part = seconds_part
            .trim()
            .trim_end_matches("min")
            .trim_end_matches("sec")
            .trim();
        let minutes: i64 = minutes_part.trim().parse().map_err(|_| invalid())?;
        let seconds: i64 = seconds_part.parse().map_err(|_| invalid())?;
        if minutes < 0 || seconds < 0 {
            return Err(invalid());
        }
        minutes * 60 + seconds
    } else if let Some(minutes_part) = cleaned.strip_suffix("min") {
        let minutes: i64 = minutes_part.trim().parse().map_err(|_| invalid())?;
        minutes * 60
    } else {
        let seconds_part = match cleaned.strip_suffix("sec") {
            Some(stripped) => stripped,
            None => cleaned.strip_suffix('s').unwrap_or(&cleaned),
        };
        seconds_part.trim().parse().map_err(|_| invalid())?
    };

    if total < 0 {
        return Err(invalid());
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_format_seconds_under_a_minute() {
        assert_eq!(format_seconds(45), "45 sec");
        assert_eq!(format_seconds(0), "0 sec");
    }

    #[test]
    fn test_format_seconds_with_minutes() {
        assert_eq!(format_seconds(90), "1:30 min");
        assert_eq!(format_seconds(615), "10:15 min");
        assert_eq!(format_seconds(60), "1:00 min");
    }

    #[test]
    fn test_format_compact() {
        assert_eq!(format_compact(90), "1:30");
        assert_eq!(format_compact(45), "45s");
        assert_eq!(format_compact(0), "0s");
        assert_eq!(format_compact(61), "1:01");
    }

    #[test]
    fn test_parse_colon_forms() {
        assert_eq!(parse_seconds("1:30"), Ok(90));
        assert_eq!(parse_seconds("1:30 min"), Ok(90));
        assert_eq!(parse_seconds("10:15"), Ok(615));
    }

    #[test]
    fn test_parse_plain_and_suffixed_seconds() {
        assert_eq!(parse_seconds("45"), Ok(45));
        assert_eq!(parse_seconds("30 sec"), Ok(30));
        assert_eq!(parse_seconds("45s"), Ok(45));
    }

    #[test]
    fn test_parse_minute_suffix() {
        assert_eq!(parse_seconds("2 min"), Ok(120));
        assert_eq!(parse_seconds("2min"), Ok(120));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_seconds("").is_err());
        assert!(parse_seconds("   ").is_err());
        assert!(parse_seconds("abc").is_err());
        assert!(parse_seconds("1:xx").is_err());
        assert!(parse_seconds("-5").is_err());
    }

    proptest! {
        #[test]
        fn prop_long_form_round_trips(total in 0i64..86_400) {
            prop_assert_eq!(parse_seconds(&format_seconds(total)), Ok(total));
        }

        #[test]
        fn prop_compact_form_round_trips(total in 0i64..86_400) {
            prop_assert_eq!(parse_seconds(&format_compact(total)), Ok(total));
        }
    }
}
