use anyhow::{anyhow, Result};
use chrono::{
    DateTime, Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, SubsecRound, TimeDelta,
    TimeZone, Utc, Weekday,
};

/// Current instant at the millisecond precision records are stored with.
pub fn now_millis() -> DateTime<Utc> {
    to_millis(Utc::now())
}

pub fn to_millis(date: DateTime<Utc>) -> DateTime<Utc> {
    date.trunc_subsecs(3)
}

/// Parses a fill date relative to now in the local zone.
///
/// Accepts `now`, `today`, `yesterday`, `-Nd`/`-Nw`, weekday names (`fri`, `2:fri`),
/// `YYYY-MM-DD` and `YYYY-MM-DD HH:MM[:SS]`.
pub fn parse_human_date(input: &str) -> Result<DateTime<Utc>> {
    let now = Local::now();
    let naive = parse_human_date_from(input, now.naive_local())?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| to_millis(dt.with_timezone(&Utc)))
        .ok_or_else(|| anyhow!("Date does not exist in the local time zone: {}", input))
}

/// Same as [`parse_human_date`] but relative to an explicit wall-clock `now`.
pub fn parse_human_date_from(input: &str, now: NaiveDateTime) -> Result<NaiveDateTime> {
    let input = input.trim();
    let today = now.date();

    // 1. Reserved keywords
    match input.to_lowercase().as_str() {
        "now" | "today" | "tod" => return Ok(now),
        "yesterday" | "yest" => return Ok(midday(days_before(today, 1, input)?)),
        _ => {}
    }

    // 2. Relative format (-Nd, -Nw)
    if let Some(rest) = input.strip_prefix('-') {
        if rest.len() >= 2 {
            let (num_str, unit) = rest.split_at(rest.len() - 1);
            let count: i64 = num_str.parse().map_err(|_| anyhow!("Invalid relative format"))?;
            let days = match unit {
                "d" => Some(count),
                "w" => count.checked_mul(7),
                _ => return Err(anyhow!("Unknown unit in relative time: {}", unit)),
            };
            let days = days.ok_or_else(|| out_of_range(input))?;
            return Ok(midday(days_before(today, days, input)?));
        }
    }

    // 3. Weekday format (fri, 2:fri) counting backwards
    if let Some((count, day_str)) = parse_weekday_token(input) {
        if let Ok(target_weekday) = parse_weekday_str(day_str) {
            let mut days_back = today.weekday().num_days_from_sunday() as i64
                - target_weekday.num_days_from_sunday() as i64;
            if days_back <= 0 {
                days_back += 7;
            }
            // count = 1 means the most recent one before today.
            let days_back = (count - 1)
                .checked_mul(7)
                .and_then(|weeks| weeks.checked_add(days_back))
                .ok_or_else(|| out_of_range(input))?;

            return Ok(midday(days_before(today, days_back, input)?));
        }
    }

    // 4. Fallback to standard formats
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(dt);
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(midday(d));
    }

    Err(anyhow!("Could not parse date: {}", input))
}

fn out_of_range(input: &str) -> anyhow::Error {
    anyhow!("Date is out of range: {}", input)
}

fn days_before(date: NaiveDate, days: i64, input: &str) -> Result<NaiveDate> {
    TimeDelta::try_days(days)
        .and_then(|delta| date.checked_sub_signed(delta))
        .ok_or_else(|| out_of_range(input))
}

fn midday(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN))
}

fn parse_weekday_token(input: &str) -> Option<(i64, &str)> {
    if input.contains(':') {
        let parts: Vec<&str> = input.split(':').collect();
        if parts.len() == 2 {
            if let Ok(count) = parts[0].parse::<i64>() {
                return Some((count.max(1), parts[1]));
            }
        }
    } else {
        // Just "fri" means 1:fri
        return Some((1, input));
    }
    None
}

fn parse_weekday_str(s: &str) -> Result<Weekday> {
    match s.to_lowercase().as_str() {
        "mon" | "monday" => Ok(Weekday::Mon),
        "tue" | "tuesday" => Ok(Weekday::Tue),
        "wed" | "wednesday" => Ok(Weekday::Wed),
        "thu" | "thursday" => Ok(Weekday::Thu),
        "fri" | "friday" => Ok(Weekday::Fri),
        "sat" | "saturday" => Ok(Weekday::Sat),
        "sun" | "sunday" => Ok(Weekday::Sun),
        _ => Err(anyhow!("Invalid weekday")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Wednesday, 2024-03-13 18:45
    fn anchor() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 13)
            .unwrap()
            .and_hms_opt(18, 45, 0)
            .unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
        midday(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_parse_weekday_token() {
        assert_eq!(parse_weekday_token("fri"), Some((1, "fri")));
        assert_eq!(parse_weekday_token("2:fri"), Some((2, "fri")));
        // Rejected later by the weekday parser
        assert_eq!(parse_weekday_token("invalid"), Some((1, "invalid")));
    }

    #[test]
    fn test_keywords() {
        assert_eq!(parse_human_date_from("now", anchor()).unwrap(), anchor());
        assert_eq!(parse_human_date_from("Yesterday", anchor()).unwrap(), day(2024, 3, 12));
    }

    #[test]
    fn test_relative() {
        assert_eq!(parse_human_date_from("-3d", anchor()).unwrap(), day(2024, 3, 10));
        assert_eq!(parse_human_date_from("-2w", anchor()).unwrap(), day(2024, 2, 28));
        assert!(parse_human_date_from("-3y", anchor()).is_err());
    }

    #[test]
    fn test_weekdays_count_backwards() {
        assert_eq!(parse_human_date_from("mon", anchor()).unwrap(), day(2024, 3, 11));
        assert_eq!(parse_human_date_from("wed", anchor()).unwrap(), day(2024, 3, 6));
        assert_eq!(parse_human_date_from("2:fri", anchor()).unwrap(), day(2024, 3, 1));
    }

    #[test]
    fn test_absolute_formats() {
        assert_eq!(parse_human_date_from("2024-01-05", anchor()).unwrap(), day(2024, 1, 5));
        let exact = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap().and_hms_opt(7, 15, 0).unwrap();
        assert_eq!(parse_human_date_from("2024-01-05 07:15", anchor()).unwrap(), exact);
        assert_eq!(parse_human_date_from("2024-01-05 07:15:00", anchor()).unwrap(), exact);
        assert!(parse_human_date_from("05/01/2024", anchor()).is_err());
    }

    #[test]
    fn test_huge_offsets_are_errors() {
        let inputs = [
            "-99999999d",
            "-999999999999999d",
            "-9999999999999999w",
            "9999999999999999:fri",
        ];
        for input in inputs {
            let err = parse_human_date_from(input, anchor()).unwrap_err();
            assert!(err.to_string().contains("out of range"), "{}: {}", input, err);
        }
    }

    #[test]
    fn test_timestamps_have_millisecond_precision() {
        let now = now_millis();
        assert_eq!(now.timestamp_subsec_nanos() % 1_000_000, 0);
        let precise = Utc.with_ymd_and_hms(2024, 1, 5, 10, 0, 0).unwrap()
            + TimeDelta::nanoseconds(123_456_789);
        assert_eq!(to_millis(precise).timestamp_subsec_nanos(), 123_000_000);
        assert_eq!(parse_human_date("now").unwrap().timestamp_subsec_nanos() % 1_000_000, 0);
    }
}
