/// Date formatting for query parameters
///
/// Range filters use the `<field>_start` / `<field>_end` naming convention and
/// are sent as ISO datetimes; every other date filter is sent as an ISO date.
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

pub const QUERY_DATE_FORMAT: &str = "%Y-%m-%d";
pub const QUERY_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// True for keys that carry a range boundary (`created_start`, `paid_end`)
pub fn is_boundary_key(key: &str) -> bool {
    key.ends_with("_start") || key.ends_with("_end")
}

/// First second of the day, for `_start` filters
pub fn day_start(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Last second of the day, for `_end` filters
pub fn day_end(date: NaiveDate) -> NaiveDateTime {
    day_start(date) + Duration::seconds(86_399)
}

/// Format a date for the query string: "2024-03-15", or
/// "2024-03-15T00:00:00" when the key is a range boundary
pub fn format_query_date(key: &str, date: NaiveDate) -> String {
    if is_boundary_key(key) {
        format_query_datetime(key, day_start(date))
    } else {
        date.format(QUERY_DATE_FORMAT).to_string()
    }
}

/// Format a datetime for the query string; non-boundary keys keep only the date
pub fn format_query_datetime(key: &str, datetime: NaiveDateTime) -> String {
    if is_boundary_key(key) {
        datetime.format(QUERY_DATETIME_FORMAT).to_string()
    } else {
        datetime.date().format(QUERY_DATE_FORMAT).to_string()
    }
}
