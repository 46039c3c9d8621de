//! Timezone-aware wall-clock time matching
//!
//! Decides whether "now" in a user's timezone falls inside the firing window
//! of a stored `"HH:MM AM/PM"` time-of-day. The candidate instant is always
//! built from *today's* date in the target zone, so an unmatched reminder
//! re-arms daily until it fires or is deleted.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use chrono::{DateTime, Duration, LocalResult, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Strict 12-hour-clock-with-meridiem grammar accepted for reminder times.
pub const TIME_OF_DAY_FORMAT: &str = "%I:%M %p";

/// Parse a `"HH:MM AM/PM"` string, rejecting anything off-grammar.
pub fn parse_time_of_day(input: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(input.trim(), TIME_OF_DAY_FORMAT).ok()
}

/// True if `now` lies within `tolerance` of today's `time_of_day` in `tz`.
///
/// A string that fails to parse is simply not a match — malformed records
/// stay pending and are never an error here. A time-of-day that does not
/// exist today in `tz` (spring-forward gap) cannot match; an ambiguous one
/// (fall-back fold) resolves to the earlier instant.
pub fn evaluate(time_of_day: &str, tz: Tz, now: DateTime<Utc>, tolerance: Duration) -> bool {
    let Some(wall_time) = parse_time_of_day(time_of_day) else {
        return false;
    };

    let today = now.with_timezone(&tz).date_naive();
    let candidate = match tz.from_local_datetime(&today.and_time(wall_time)) {
        LocalResult::Single(instant) => instant,
        LocalResult::Ambiguous(earlier, _) => earlier,
        LocalResult::None => return false,
    };

    (candidate.with_timezone(&Utc) - now)
        .num_seconds()
        .abs()
        < tolerance.num_seconds()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::New_York;
    use chrono_tz::Asia::Tokyo;

    fn at(tz: Tz, y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        tz.with_ymd_and_hms(y, mo, d, h, mi, s)
            .unwrap()
            .with_timezone(&Utc)
    }

    const TOLERANCE: i64 = 60;

    #[test]
    fn test_parse_accepts_strict_grammar() {
        assert!(parse_time_of_day("2:30 PM").is_some());
        assert!(parse_time_of_day("12:00 AM").is_some());
        assert!(parse_time_of_day(" 5:00 PM ").is_some());
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        assert!(parse_time_of_day("25:61 PM").is_none());
        assert!(parse_time_of_day("14:30").is_none());
        assert!(parse_time_of_day("2:30").is_none());
        assert!(parse_time_of_day("soonish").is_none());
        assert!(parse_time_of_day("").is_none());
    }

    #[test]
    fn test_match_at_exact_time() {
        let now = at(New_York, 2024, 6, 3, 14, 30, 0);
        assert!(evaluate("2:30 PM", New_York, now, Duration::seconds(TOLERANCE)));
    }

    #[test]
    fn test_tolerance_boundaries() {
        let tol = Duration::seconds(TOLERANCE);

        // 59 s early: inside the window
        let now = at(New_York, 2024, 6, 3, 14, 29, 1);
        assert!(evaluate("2:30 PM", New_York, now, tol));

        // exactly 60 s early: outside (strict <)
        let now = at(New_York, 2024, 6, 3, 14, 29, 0);
        assert!(!evaluate("2:30 PM", New_York, now, tol));

        // 61 s late: outside
        let now = at(New_York, 2024, 6, 3, 14, 31, 1);
        assert!(!evaluate("2:30 PM", New_York, now, tol));
    }

    #[test]
    fn test_malformed_time_never_matches() {
        let now = at(New_York, 2024, 6, 3, 14, 30, 0);
        assert!(!evaluate("25:61 PM", New_York, now, Duration::seconds(TOLERANCE)));
    }

    #[test]
    fn test_same_instant_differs_by_zone() {
        // 14:30 New York is 03:30 next day in Tokyo
        let now = at(New_York, 2024, 6, 3, 14, 30, 0);
        assert!(evaluate("2:30 PM", New_York, now, Duration::seconds(TOLERANCE)));
        assert!(!evaluate("2:30 PM", Tokyo, now, Duration::seconds(TOLERANCE)));
        assert!(evaluate("3:30 AM", Tokyo, now, Duration::seconds(TOLERANCE)));
    }

    #[test]
    fn test_daily_re_arm_uses_todays_date() {
        // Same wall-clock time the next day still matches
        let now = at(New_York, 2024, 6, 4, 14, 30, 0);
        assert!(evaluate("2:30 PM", New_York, now, Duration::seconds(TOLERANCE)));
    }

    #[test]
    fn test_ambiguous_local_time_resolves_to_earlier_instant() {
        // 1:30 AM happens twice on the US fall-back day. The EDT occurrence
        // (05:30 UTC) is the one that fires; the EST repeat an hour later
        // (06:30 UTC) is not a match.
        let tol = Duration::seconds(TOLERANCE);

        let first = Utc.with_ymd_and_hms(2024, 11, 3, 5, 30, 0).unwrap();
        assert!(evaluate("1:30 AM", New_York, first, tol));

        let second = Utc.with_ymd_and_hms(2024, 11, 3, 6, 30, 0).unwrap();
        assert!(!evaluate("1:30 AM", New_York, second, tol));
    }

    #[test]
    fn test_nonexistent_local_time_does_not_match() {
        // 2:30 AM does not exist on the US spring-forward day
        let now = at(New_York, 2024, 3, 10, 3, 30, 0);
        assert!(!evaluate("2:30 AM", New_York, now, Duration::seconds(TOLERANCE)));
    }
}
