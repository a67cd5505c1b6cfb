use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, Timelike};

/// `days` calendar days ending at `today`, oldest first.
pub fn generate_dates(today: NaiveDate, days: usize) -> Vec<NaiveDate> {
    (0..days)
        .rev()
        .map(|offset| today - Duration::days(offset as i64))
        .collect()
}

/// `months` month labels (`YYYY-MM`) ending at the month containing `today`, oldest first.
pub fn generate_months(today: NaiveDate, months: usize) -> Vec<String> {
    let first_of_month = today - Duration::days(today.day0() as i64);
    (0..months)
        .rev()
        .filter_map(|offset| first_of_month.checked_sub_months(Months::new(offset as u32)))
        .map(|month| month.format("%Y-%m").to_string())
        .collect()
}

/// `HH:00` labels for the last `hours` hours ending at `now`, oldest first.
pub fn generate_hours(now: NaiveDateTime, hours: usize) -> Vec<String> {
    (0..hours)
        .rev()
        .map(|offset| (now - Duration::hours(offset as i64)).format("%H:00").to_string())
        .collect()
}

pub fn truncate_to_hour(moment: NaiveDateTime) -> NaiveDateTime {
    moment
        - Duration::minutes(moment.minute() as i64)
        - Duration::seconds(moment.second() as i64)
        - Duration::nanoseconds(moment.nanosecond() as i64)
}
