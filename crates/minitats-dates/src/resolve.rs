//! Turns a group of adjacent fragments into one absolute instant.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use crate::grammar::{ClockTime, Part};

fn noon() -> NaiveTime {
    NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN)
}

/// Local wall-clock to UTC. A time that falls in a DST gap moves forward one hour.
pub(crate) fn local_to_utc(tz: Tz, date: NaiveDate, time: NaiveTime) -> Option<DateTime<Utc>> {
    let naive = date.and_time(time);
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| {
            let shifted = naive.checked_add_signed(Duration::hours(1))?;
            tz.from_local_datetime(&shifted).earliest()
        })
        .map(|dt| dt.with_timezone(&Utc))
}

/// Resolve one expression relative to `reference`.
///
/// Returns `None` when the fragments describe an impossible date (31/02) or
/// one outside the representable range ("en 99999999 días").
pub(crate) fn resolve_group(parts: &[Part], reference: DateTime<Utc>, tz: Tz) -> Option<DateTime<Utc>> {
    let local_ref = reference.with_timezone(&tz);
    let today = local_ref.date_naive();

    let mut date_part = None;
    let mut clock: Option<ClockTime> = None;
    for part in parts {
        match part {
            Part::Offset(d) => return reference.checked_add_signed(*d),
            Part::Time(t) => clock = Some(*t),
            other => date_part = Some(*other),
        }
    }

    match date_part {
        None => {
            let t = clock?.time;
            let candidate = local_to_utc(tz, today, t)?;
            if candidate > reference {
                Some(candidate)
            } else {
                local_to_utc(tz, today.succ_opt()?, t)
            }
        }
        Some(Part::Day { offset, hour }) => {
            let date = today.checked_add_signed(Duration::days(offset))?;
            let time = match (clock, hour) {
                // "esta noche a las 10" means 22:00
                (Some(c), Some(h)) if !c.fixed && h >= 12 && c.time.hour() < 12 => {
                    c.time + Duration::hours(12)
                }
                (Some(c), _) => c.time,
                (None, Some(h)) => NaiveTime::from_hms_opt(h, 0, 0)?,
                (None, None) => local_ref.time(),
            };
            local_to_utc(tz, date, time)
        }
        Some(Part::Weekday(weekday)) => {
            let ahead = (7 + i64::from(weekday.num_days_from_monday())
                - i64::from(today.weekday().num_days_from_monday()))
                % 7;
            let time = clock.map(|c| c.time).unwrap_or_else(noon);
            let candidate = local_to_utc(tz, today.checked_add_signed(Duration::days(ahead))?, time)?;
            if candidate > reference {
                Some(candidate)
            } else {
                local_to_utc(tz, today.checked_add_signed(Duration::days(ahead + 7))?, time)
            }
        }
        Some(Part::Date { day, month, year }) => {
            let time = clock.map(|c| c.time).unwrap_or_else(noon);
            match year {
                Some(y) => local_to_utc(tz, NaiveDate::from_ymd_opt(y, month, day)?, time),
                None => {
                    let this_year = NaiveDate::from_ymd_opt(today.year(), month, day)
                        .and_then(|d| local_to_utc(tz, d, time));
                    match this_year {
                        Some(at) if at > reference => Some(at),
                        _ => local_to_utc(
                            tz,
                            NaiveDate::from_ymd_opt(today.year() + 1, month, day)?,
                            time,
                        ),
                    }
                }
            }
        }
        Some(Part::Offset(_)) | Some(Part::Time(_)) => None,
    }
}
