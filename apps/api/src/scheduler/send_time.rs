//! "Tomorrow at 09:00 local" send-time computation.

use chrono::{DateTime, Days, Duration, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Local wall-clock hour at which follow-up emails go out.
const SEND_HOUR: u32 = 9;

/// Looks up an IANA zone name. Missing, empty, or unrecognized input falls
/// back to UTC; this never fails.
pub fn resolve_zone(name: Option<&str>) -> Tz {
    name.and_then(|n| n.trim().parse::<Tz>().ok())
        .unwrap_or(Tz::UTC)
}

/// Computes 09:00 on the next local calendar day in `zone`, as a UTC instant.
///
/// The day boundary is taken in local time (one calendar day, not 24 hours),
/// so the result is correct across DST transitions. Deterministic: the
/// reference instant is an explicit argument and no clock is read here.
///
/// DST policy: if the zone skips 09:00 on that date (spring-forward gap),
/// the wall clock rolls forward in 15-minute steps to the first instant the
/// zone can represent; if 09:00 occurs twice (fall-back overlap), the
/// earlier instant wins.
pub fn next_morning_send_time(now_utc: DateTime<Utc>, zone: Tz) -> DateTime<Utc> {
    let next_day = now_utc
        .with_timezone(&zone)
        .date_naive()
        .checked_add_days(Days::new(1))
        .expect("calendar overflow is unreachable for clock-derived dates");
    let wall = next_day
        .and_hms_opt(SEND_HOUR, 0, 0)
        .expect("09:00:00 is a valid wall-clock time");
    resolve_wall_clock(wall, zone)
}

/// Maps a local wall-clock time onto the zone's timeline per the DST policy
/// above.
fn resolve_wall_clock(wall: NaiveDateTime, zone: Tz) -> DateTime<Utc> {
    let mut candidate = wall;
    // IANA gaps top out at two hours, so eight quarter-hour steps always
    // clear one.
    for _ in 0..8 {
        match zone.from_local_datetime(&candidate) {
            LocalResult::Single(instant) => return instant.with_timezone(&Utc),
            LocalResult::Ambiguous(earliest, _) => return earliest.with_timezone(&Utc),
            LocalResult::None => candidate += Duration::minutes(15),
        }
    }
    // Unreachable with real zone data; keep the result defined regardless.
    Utc.from_utc_datetime(&candidate)
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Timelike};
    use proptest::prelude::*;

    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_resolve_zone_known_name() {
        assert_eq!(resolve_zone(Some("Asia/Tokyo")), chrono_tz::Asia::Tokyo);
    }

    #[test]
    fn test_resolve_zone_degrades_to_utc() {
        assert_eq!(resolve_zone(None), Tz::UTC);
        assert_eq!(resolve_zone(Some("")), Tz::UTC);
        assert_eq!(resolve_zone(Some("Not/AZone")), Tz::UTC);
        assert_eq!(resolve_zone(Some("   ")), Tz::UTC);
    }

    #[test]
    fn test_utc_evening_rolls_to_next_calendar_day() {
        let send = next_morning_send_time(utc(2024, 1, 1, 23, 0, 0), Tz::UTC);
        assert_eq!(send, utc(2024, 1, 2, 9, 0, 0));
    }

    #[test]
    fn test_next_day_crosses_year_boundary() {
        let send = next_morning_send_time(utc(2024, 12, 31, 23, 30, 0), Tz::UTC);
        assert_eq!(send, utc(2025, 1, 1, 9, 0, 0));
    }

    #[test]
    fn test_day_boundary_is_local_not_utc() {
        // 20:00Z on Jan 1 is already 05:00 on Jan 2 in Tokyo, so "tomorrow"
        // is Jan 3 there: 09:00 JST = 00:00 UTC.
        let send = next_morning_send_time(utc(2024, 1, 1, 20, 0, 0), chrono_tz::Asia::Tokyo);
        assert_eq!(send, utc(2024, 1, 3, 0, 0, 0));
    }

    #[test]
    fn test_spring_forward_day_still_sends_at_nine_local() {
        // New York enters DST on 2024-03-10; 09:00 EDT is 13:00Z, one UTC
        // hour earlier than a naive +24h from the EST evening before.
        let send = next_morning_send_time(
            utc(2024, 3, 9, 12, 0, 0),
            chrono_tz::America::New_York,
        );
        assert_eq!(send, utc(2024, 3, 10, 13, 0, 0));
        let local = send.with_timezone(&chrono_tz::America::New_York);
        assert_eq!((local.hour(), local.minute(), local.second()), (9, 0, 0));
    }

    #[test]
    fn test_gap_rolls_forward_to_first_valid_instant() {
        // 02:30 does not exist in New York on 2024-03-10; policy resolves to
        // 03:00 EDT = 07:00Z.
        let wall = NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();
        let resolved = resolve_wall_clock(wall, chrono_tz::America::New_York);
        assert_eq!(resolved, utc(2024, 3, 10, 7, 0, 0));
    }

    #[test]
    fn test_overlap_resolves_to_earlier_instant() {
        // 01:30 happens twice in New York on 2024-11-03; policy takes the
        // EDT (first) pass: 05:30Z.
        let wall = NaiveDate::from_ymd_opt(2024, 11, 3)
            .unwrap()
            .and_hms_opt(1, 30, 0)
            .unwrap();
        let resolved = resolve_wall_clock(wall, chrono_tz::America::New_York);
        assert_eq!(resolved, utc(2024, 11, 3, 5, 30, 0));
    }

    proptest! {
        /// Same inputs, same instant — the function reads no clock.
        #[test]
        fn property_send_time_is_deterministic(
            secs in 0i64..4_000_000_000,
            zone_idx in 0usize..4,
        ) {
            let zones = [
                Tz::UTC,
                chrono_tz::America::New_York,
                chrono_tz::Asia::Tokyo,
                chrono_tz::Australia::Lord_Howe,
            ];
            let now = Utc.timestamp_opt(secs, 0).unwrap();
            let zone = zones[zone_idx];
            prop_assert_eq!(
                next_morning_send_time(now, zone),
                next_morning_send_time(now, zone)
            );
        }

        /// The result reads 09:00:00 on the next calendar day in local time.
        #[test]
        fn property_send_time_is_nine_am_local_next_day(
            secs in 0i64..4_000_000_000,
            zone_idx in 0usize..3,
        ) {
            let zones = [Tz::UTC, chrono_tz::America::New_York, chrono_tz::Asia::Tokyo];
            let now = Utc.timestamp_opt(secs, 0).unwrap();
            let zone = zones[zone_idx];
            let local = next_morning_send_time(now, zone).with_timezone(&zone);
            prop_assert_eq!(
                local.date_naive(),
                now.with_timezone(&zone).date_naive() + Days::new(1)
            );
            prop_assert_eq!((local.hour(), local.minute(), local.second()), (9, 0, 0));
        }
    }
}
