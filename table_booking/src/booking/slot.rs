//! Booking windows and the overlap rule.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::errors::{BookingError, BookingResult};

/// Every reservation occupies its table for this many hours.
pub const RESERVATION_DURATION_HOURS: i64 = 2;

/// Input format for `date` + `time`, e.g. `2025-07-01 18:00`.
const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Half-open interval `[start, end)` of local wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeSlot {
    /// Standard reservation window beginning at `start`.
    pub fn starting_at(start: NaiveDateTime) -> Self {
        Self {
            start,
            end: start + Duration::hours(RESERVATION_DURATION_HOURS),
        }
    }

    /// Parse `YYYY-MM-DD` and `HH:MM` into a standard window.
    ///
    /// # Errors
    ///
    /// * `BookingError::InvalidDateTime` - either part is malformed
    pub fn parse(date: &str, time: &str) -> BookingResult<Self> {
        let raw = format!("{} {}", date.trim(), time.trim());
        NaiveDateTime::parse_from_str(&raw, DATE_TIME_FORMAT)
            .map(Self::starting_at)
            .map_err(|_| BookingError::InvalidDateTime {
                date: date.to_string(),
                time: time.to_string(),
            })
    }

    /// Touching endpoints do not overlap.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start < other.end && self.end > other.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 7, 1)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_builds_two_hour_window() {
        let slot = TimeSlot::parse("2025-07-01", "18:00").unwrap();
        assert_eq!(slot.start, at(18, 0));
        assert_eq!(slot.end, at(20, 0));
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        for (date, time) in [
            ("2025-13-45", "18:00"),
            ("2025-07-01", "25:00"),
            ("07/01/2025", "18:00"),
            ("2025-07-01", "6pm"),
            ("", ""),
        ] {
            let err = TimeSlot::parse(date, time).unwrap_err();
            assert!(
                matches!(err, BookingError::InvalidDateTime { .. }),
                "{date} {time} should be rejected"
            );
        }
    }

    #[test]
    fn test_window_crossing_midnight() {
        let slot = TimeSlot::parse("2025-07-01", "23:30").unwrap();
        assert_eq!(slot.end.date(), NaiveDate::from_ymd_opt(2025, 7, 2).unwrap());
    }

    #[test]
    fn test_overlap_rule() {
        let evening = TimeSlot::starting_at(at(18, 0));

        assert!(evening.overlaps(&TimeSlot::starting_at(at(19, 0))));
        assert!(evening.overlaps(&TimeSlot::starting_at(at(17, 0))));
        assert!(evening.overlaps(&evening));

        // Touching endpoints are free.
        assert!(!evening.overlaps(&TimeSlot::starting_at(at(20, 0))));
        assert!(!evening.overlaps(&TimeSlot::starting_at(at(16, 0))));
    }
}
