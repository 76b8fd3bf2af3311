//! Human-readable relative dates for note cards.

use chrono::{DateTime, Utc};

const MINUTES_PER_HOUR: i64 = 60;
const MINUTES_PER_DAY: i64 = 1_440;
const MINUTES_PER_MONTH: i64 = 43_200;
const MINUTES_PER_YEAR: i64 = 525_600;

/// Describes `date` relative to `now`, e.g. `"5 minutes ago"` or
/// `"in about 2 hours"`.
///
/// Buckets: under a minute, minutes below 45, about N hours below a day,
/// days below 30, months below a year, then years qualified as
/// about/over/almost.
pub fn relative_label(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - date).num_seconds();
    let distance = describe_distance(seconds.abs());
    if seconds < 0 {
        format!("in {distance}")
    } else {
        format!("{distance} ago")
    }
}

fn describe_distance(seconds: i64) -> String {
    let minutes = (seconds + 30) / 60;

    if minutes < 1 {
        return "less than a minute".to_string();
    }
    if minutes < 45 {
        return plural(minutes, "minute");
    }
    if minutes < 90 {
        return "about 1 hour".to_string();
    }
    if minutes < MINUTES_PER_DAY {
        let hours = (minutes + MINUTES_PER_HOUR / 2) / MINUTES_PER_HOUR;
        return format!("about {}", plural(hours, "hour"));
    }
    if minutes < 2_520 {
        return "1 day".to_string();
    }
    if minutes < MINUTES_PER_MONTH {
        let days = (minutes + MINUTES_PER_DAY / 2) / MINUTES_PER_DAY;
        return plural(days, "day");
    }
    if minutes < 2 * MINUTES_PER_MONTH {
        let months = (minutes + MINUTES_PER_MONTH / 2) / MINUTES_PER_MONTH;
        return format!("about {}", plural(months, "month"));
    }
    if minutes < MINUTES_PER_YEAR {
        let months = (minutes + MINUTES_PER_MONTH / 2) / MINUTES_PER_MONTH;
        return plural(months.min(11), "month");
    }

    let years = minutes / MINUTES_PER_YEAR;
    let remainder_months = (minutes % MINUTES_PER_YEAR) / MINUTES_PER_MONTH;
    if remainder_months < 3 {
        format!("about {}", plural(years, "year"))
    } else if remainder_months < 9 {
        format!("over {}", plural(years, "year"))
    } else {
        format!("almost {}", plural(years + 1, "year"))
    }
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit}")
    } else {
        format!("{count} {unit}s")
    }
}
