//! Canonical calendar-date handling.
//!
//! Every date in the app is a plain `YYYY-MM-DD` calendar day with no
//! time-of-day or zone attached. Values are normalized once at the boundary
//! (form input, database rows) and compared as calendar dates everywhere else,
//! so a record dated `2024-06-15` stays on the 15th for users west of UTC.

use time::{
    Date, OffsetDateTime, UtcOffset,
    format_description::BorrowedFormatItem,
    macros::format_description,
};
use time_tz::{Offset, TimeZone};

/// The fixed-width, zero-padded format used for storage, comparison, and
/// sorting.
pub const CANONICAL_DATE_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]");

const SLASH_YMD_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]/[month]/[day]");
const SLASH_DMY_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[day]/[month]/[year]");

/// Get the current UTC offset for a canonical timezone name, e.g. "Asia/Karachi".
///
/// Returns `None` if the timezone name is not recognized.
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// Today's date on the local calendar.
pub fn local_today(local_offset: UtcOffset) -> Date {
    OffsetDateTime::now_utc().to_offset(local_offset).date()
}

/// Whether `text` has the shape `YYYY-MM-DD`.
///
/// This is a shape check only. Whether the digits form a real calendar day is
/// decided by [parse_canonical_date] when the value is actually used.
pub fn is_canonical_date(text: &str) -> bool {
    let bytes = text.as_bytes();

    bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[5..7].iter().all(u8::is_ascii_digit)
        && bytes[7] == b'-'
        && bytes[8..10].iter().all(u8::is_ascii_digit)
        && bytes[..4].iter().all(u8::is_ascii_digit)
}

/// Normalize a date-like string to canonical `YYYY-MM-DD` form.
///
/// Canonical input is returned unchanged, so the function is idempotent.
/// Recognized alternative forms (`YYYY/MM/DD`, `DD/MM/YYYY`, RFC 3339
/// timestamps) are re-rendered canonically; timestamps use the calendar day at
/// `local_offset` rather than the UTC day. Anything unrecognizable is
/// returned unchanged rather than rejected.
pub fn normalize_date_text(input: &str, local_offset: UtcOffset) -> String {
    let trimmed = input.trim();

    if is_canonical_date(trimmed) {
        return trimmed.to_owned();
    }

    if let Ok(date) = Date::parse(trimmed, SLASH_YMD_FORMAT) {
        return canonical_date_string(date);
    }

    if let Ok(date) = Date::parse(trimmed, SLASH_DMY_FORMAT) {
        return canonical_date_string(date);
    }

    if let Ok(timestamp) = OffsetDateTime::parse(
        trimmed,
        &time::format_description::well_known::Rfc3339,
    ) {
        return canonical_day(timestamp, local_offset);
    }

    // Timestamps without an offset, e.g. SQLite's `datetime('now')` output,
    // already describe a wall-clock day. Take it as written.
    if trimmed.len() >= 10 && trimmed.is_char_boundary(10) && is_canonical_date(&trimmed[..10]) {
        return trimmed[..10].to_owned();
    }

    input.to_owned()
}

/// Render the calendar day of `timestamp` at `local_offset` in canonical form.
pub fn canonical_day(timestamp: OffsetDateTime, local_offset: UtcOffset) -> String {
    canonical_date_string(timestamp.to_offset(local_offset).date())
}

/// Render a date in canonical form.
pub fn canonical_date_string(date: Date) -> String {
    date.format(CANONICAL_DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

/// Parse a canonical date string into a [Date].
pub fn parse_canonical_date(text: &str) -> Result<Date, time::error::Parse> {
    Date::parse(text, CANONICAL_DATE_FORMAT)
}

#[cfg(test)]
mod dates_tests {
    use time::{UtcOffset, macros::datetime};

    use super::{canonical_day, is_canonical_date, normalize_date_text, parse_canonical_date};

    #[test]
    fn canonical_input_is_returned_unchanged() {
        let got = normalize_date_text("2024-06-15", UtcOffset::UTC);

        assert_eq!(got, "2024-06-15");
    }

    #[test]
    fn normalize_is_idempotent() {
        let inputs = [
            "2024-06-15",
            "2024/06/15",
            "15/06/2024",
            "2024-12-31T23:30:00Z",
            "not a date",
            "",
        ];
        let offset = UtcOffset::from_hms(-7, 0, 0).unwrap();

        for input in inputs {
            let once = normalize_date_text(input, offset);
            let twice = normalize_date_text(&once, offset);

            assert_eq!(once, twice, "normalize(normalize({input:?})) changed");
        }
    }

    #[test]
    fn slash_formats_are_re_rendered() {
        assert_eq!(normalize_date_text("2024/06/05", UtcOffset::UTC), "2024-06-05");
        assert_eq!(normalize_date_text("05/06/2024", UtcOffset::UTC), "2024-06-05");
    }

    #[test]
    fn timestamps_use_the_local_calendar_day() {
        // 01:30 UTC on the 16th is still the 15th in a UTC-7 zone.
        let offset = UtcOffset::from_hms(-7, 0, 0).unwrap();

        let got = normalize_date_text("2024-06-16T01:30:00Z", offset);

        assert_eq!(got, "2024-06-15");
    }

    #[test]
    fn unparseable_input_is_returned_unchanged() {
        assert_eq!(normalize_date_text("yesterday", UtcOffset::UTC), "yesterday");
    }

    #[test]
    fn sqlite_timestamp_is_sliced_to_its_day() {
        let got = normalize_date_text("2024-06-15 08:30:00", UtcOffset::UTC);

        assert_eq!(got, "2024-06-15");
    }

    #[test]
    fn canonical_day_compensates_for_offset() {
        let offset = UtcOffset::from_hms(5, 0, 0).unwrap();

        let got = canonical_day(datetime!(2024-06-15 22:00 UTC), offset);

        assert_eq!(got, "2024-06-16");
    }

    #[test]
    fn shape_check_accepts_digits_and_dashes_only() {
        assert!(is_canonical_date("2024-06-15"));
        assert!(!is_canonical_date("2024-6-15"));
        assert!(!is_canonical_date("15-06-2024x"));
    }

    #[test]
    fn parse_canonical_rejects_impossible_days() {
        assert!(parse_canonical_date("2024-13-40").is_err());
        assert!(parse_canonical_date("2024-02-29").is_ok());
    }
}
