use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime};

/// Start of the given UTC day (00:00:00).
pub fn day_start(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Half-open `[start, end)` bounds of the given UTC day.
pub fn day_bounds(date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    (day_start(date), day_start(next_day(date)))
}

/// First instant of the calendar month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDateTime {
    day_start(first_of_month(date))
}

/// Half-open `[start, end)` bounds of the calendar month containing `date`.
pub fn month_bounds(date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = first_of_month(date);
    let end = if start.month() == 12 {
        NaiveDate::from_ymd_opt(start.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(start.year(), start.month() + 1, 1)
    };
    // Month arithmetic on a valid first-of-month date cannot fail.
    (day_start(start), day_start(end.unwrap_or(start)))
}

/// Half-open `[start, end)` bounds of the day before `today`.
pub fn yesterday_bounds(today: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let yesterday = today.checked_sub_days(Days::new(1)).unwrap_or(today);
    (day_start(yesterday), day_start(today))
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn next_day(date: NaiveDate) -> NaiveDate {
    date.checked_add_days(Days::new(1)).unwrap_or(date)
}
