//! Timestamp formatting for cells, tooltips and the "last updated" stamp.
//!
//! Formatting never fails: missing input renders as [`UNKNOWN_TIME`],
//! unparseable input as [`INVALID_DATE`].

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, Utc};

/// Rendered when a timestamp is absent or empty.
pub const UNKNOWN_TIME: &str = "Unknown";

/// Rendered when a timestamp is present but unreadable.
pub const INVALID_DATE: &str = "Invalid date";

/// `DD-MM-YYYY HH:mm:ss`
const DISPLAY_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// +05:30, the zone of the reference deployment.
const DEFAULT_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

pub fn default_display_offset() -> FixedOffset {
    FixedOffset::east_opt(DEFAULT_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// Parse a display offset such as `+05:30`, `-0800`, `Z` or `UTC`.
pub fn parse_offset(raw: &str) -> Option<FixedOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("utc") || raw.eq_ignore_ascii_case("z") {
        return Some(Utc.fix());
    }

    let (sign, rest) = match raw.split_at_checked(1)? {
        ("+", rest) => (1, rest),
        ("-", rest) => (-1, rest),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = digits.get(..2)?.parse().ok()?;
    let minutes: i32 = digits.get(2..)?.parse().ok()?;
    if minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Interpret a timestamp as wall-clock time in `offset`.
///
/// Offset-bearing timestamps are converted; naive ones are taken as-is.
pub fn parse_timestamp(raw: &str, offset: FixedOffset) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&offset).naive_local());
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Format a device or heartbeat timestamp for display.
pub fn format_timestamp(raw: Option<&str>, offset: FixedOffset) -> String {
    match raw {
        None => UNKNOWN_TIME.to_owned(),
        Some(s) if s.trim().is_empty() => UNKNOWN_TIME.to_owned(),
        Some(s) => parse_timestamp(s, offset).map_or_else(
            || INVALID_DATE.to_owned(),
            |t| t.format(DISPLAY_FORMAT).to_string(),
        ),
    }
}

/// Format the time of the last successful refresh.
pub fn format_refresh_time(at: DateTime<Utc>, offset: FixedOffset) -> String {
    at.with_timezone(&offset).format(DISPLAY_FORMAT).to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ist() -> FixedOffset {
        default_display_offset()
    }

    #[test]
    fn missing_or_blank_is_unknown() {
        assert_eq!(format_timestamp(None, ist()), "Unknown");
        assert_eq!(format_timestamp(Some("  "), ist()), "Unknown");
    }

    #[test]
    fn garbage_is_invalid_date() {
        assert_eq!(format_timestamp(Some("yesterday-ish"), ist()), "Invalid date");
        assert_eq!(format_timestamp(Some("2024-13-45T99:00:00"), ist()), "Invalid date");
    }

    #[test]
    fn naive_timestamps_render_verbatim() {
        assert_eq!(
            format_timestamp(Some("2024-06-15T10:30:00"), ist()),
            "15-06-2024 10:30:00"
        );
        assert_eq!(
            format_timestamp(Some("2024-06-15 08:05:09.1234567"), ist()),
            "15-06-2024 08:05:09"
        );
        assert_eq!(format_timestamp(Some("2024-06-15"), ist()), "15-06-2024 00:00:00");
    }

    #[test]
    fn offset_timestamps_convert_to_display_offset() {
        assert_eq!(
            format_timestamp(Some("2024-06-15T10:30:00Z"), ist()),
            "15-06-2024 16:00:00"
        );
        assert_eq!(
            format_timestamp(Some("2024-06-15T10:30:00+05:30"), ist()),
            "15-06-2024 10:30:00"
        );
    }

    #[test]
    fn refresh_time_uses_display_offset() {
        let at = Utc.with_ymd_and_hms(2024, 1, 31, 20, 0, 0).unwrap();
        assert_eq!(format_refresh_time(at, ist()), "01-02-2024 01:30:00");
    }

    #[test]
    fn offsets_parse() {
        assert_eq!(parse_offset("UTC"), Some(Utc.fix()));
        assert_eq!(parse_offset("+05:30"), Some(ist()));
        assert_eq!(parse_offset("-08:00").map(|o| o.local_minus_utc()), Some(-8 * 3600));
        assert_eq!(parse_offset("Mars/Olympus"), None);
    }
}
