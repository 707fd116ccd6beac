use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone};

/// This is the standard way of converting a date to a storage key in routinely.
pub fn date_to_storage_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Returns start of the next day.
pub fn next_day_start<Tz: TimeZone>(date: DateTime<Tz>) -> DateTime<Tz> {
    (date + Duration::days(1)).with_time(NaiveTime::MIN).unwrap()
}

/// Parses the start of a catalog display range like "6:00 AM - 6:30 AM". Catalog times
/// are display strings first, so a value that doesn't parse is simply `None`.
pub fn parse_display_start(time: &str) -> Option<NaiveTime> {
    let start = time.split(" - ").next()?.trim();
    NaiveTime::parse_from_str(start, "%I:%M %p").ok()
}
