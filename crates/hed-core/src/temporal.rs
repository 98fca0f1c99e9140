//! # Temporal Values
//!
//! Acceptance checks for the time-like unit classes. A value such as
//! `14:30` or `2024-03-01T09:15:00` is legal under `clockTime`/`dateTime`
//! without any unit suffix.
//!
//! Both checks are strict: no timezone offset, no `Z`, and no fractional
//! seconds.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// True for `HH:MM` or `HH:MM:SS` with two-digit fields in range.
pub fn is_clock_face_time(value: &str) -> bool {
    if !has_clock_shape(value) {
        return false;
    }
    let format = if value.len() == 5 { "%H:%M" } else { "%H:%M:%S" };
    NaiveTime::parse_from_str(value, format).is_ok()
}

/// True for `YYYY-MM-DD`, optionally followed by `T` and a clock-face
/// time.
pub fn is_date_time(value: &str) -> bool {
    let (date, time) = match value.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (value, None),
    };
    if !has_date_shape(date) {
        return false;
    }
    match time {
        None => NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok(),
        Some(time) if has_clock_shape(time) => {
            let format = if time.len() == 5 {
                "%Y-%m-%dT%H:%M"
            } else {
                "%Y-%m-%dT%H:%M:%S"
            };
            NaiveDateTime::parse_from_str(value, format).is_ok()
        }
        Some(_) => false,
    }
}

/// `DD:DD` or `DD:DD:DD`, ASCII digits only.
fn has_clock_shape(value: &str) -> bool {
    let bytes = value.as_bytes();
    let digits_at = |positions: &[usize]| positions.iter().all(|&i| bytes[i].is_ascii_digit());
    match bytes.len() {
        5 => bytes[2] == b':' && digits_at(&[0, 1, 3, 4]),
        8 => bytes[2] == b':' && bytes[5] == b':' && digits_at(&[0, 1, 3, 4, 6, 7]),
        _ => false,
    }
}

/// `DDDD-DD-DD`, ASCII digits only.
fn has_date_shape(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_face_accepts_hours_and_minutes() {
        assert!(is_clock_face_time("00:00"));
        assert!(is_clock_face_time("23:59"));
        assert!(is_clock_face_time("12:30:45"));
    }

    #[test]
    fn clock_face_rejects_out_of_range() {
        assert!(!is_clock_face_time("24:00"));
        assert!(!is_clock_face_time("12:60"));
    }

    #[test]
    fn clock_face_rejects_loose_shapes() {
        assert!(!is_clock_face_time("9:30"));
        assert!(!is_clock_face_time("12:30:45.5"));
        assert!(!is_clock_face_time("12:30Z"));
        assert!(!is_clock_face_time("12:30+01:00"));
        assert!(!is_clock_face_time("3 s"));
        assert!(!is_clock_face_time(""));
    }

    #[test]
    fn date_time_accepts_date_and_date_time() {
        assert!(is_date_time("2024-03-01"));
        assert!(is_date_time("2024-03-01T09:15"));
        assert!(is_date_time("2024-03-01T09:15:30"));
    }

    #[test]
    fn date_time_rejects_offsets_and_fractions() {
        assert!(!is_date_time("2024-03-01T09:15:30Z"));
        assert!(!is_date_time("2024-03-01T09:15:30+02:00"));
        assert!(!is_date_time("2024-03-01T09:15:30.250"));
    }

    #[test]
    fn date_time_rejects_impossible_dates() {
        assert!(!is_date_time("2023-02-29"));
        assert!(!is_date_time("2024-13-01"));
        assert!(!is_date_time("20240301"));
        assert!(!is_date_time("2024-03-01t09:15"));
    }
}
