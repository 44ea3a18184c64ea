//! Proleptic Gregorian calendar helpers shared by `date` and `date_time`.

pub fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub fn days_in_month(year: i64, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => unreachable!("month out of range"),
    }
}

/// Adds one day to a (year, month, day) triple, rolling over month/year boundaries.
pub fn add_one_day(year: i64, month: u8, day: u8) -> (i64, u8, u8) {
    if day < days_in_month(year, month) {
        (year, month, day + 1)
    } else if month < 12 {
        (year, month + 1, 1)
    } else {
        (year + 1, 1, 1)
    }
}

/// Subtracts one day from a (year, month, day) triple, rolling over month/year boundaries.
pub fn sub_one_day(year: i64, month: u8, day: u8) -> (i64, u8, u8) {
    if day > 1 {
        (year, month, day - 1)
    } else if month > 1 {
        let prev_month = month - 1;
        (year, prev_month, days_in_month(year, prev_month))
    } else {
        (year - 1, 12, 31)
    }
}

/// Shifts a civil (year, month, day, hour, minute, second) timestamp by a minute offset,
/// rolling the date forward or backward as needed. Used to normalize time-zoned values to UTC.
pub fn shift_by_minutes(
    year: i64,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
    offset_minutes: i16,
) -> (i64, u8, u8, u8, u8, u8) {
    let mut total_minutes = hour as i64 * 60 + minute as i64 - offset_minutes as i64;
    let mut year = year;
    let mut month = month;
    let mut day = day;
    while total_minutes < 0 {
        total_minutes += 24 * 60;
        let (y, m, d) = sub_one_day(year, month, day);
        year = y;
        month = m;
        day = d;
    }
    while total_minutes >= 24 * 60 {
        total_minutes -= 24 * 60;
        let (y, m, d) = add_one_day(year, month, day);
        year = y;
        month = m;
        day = d;
    }
    let hour = (total_minutes / 60) as u8;
    let minute = (total_minutes % 60) as u8;
    (year, month, day, hour, minute, second)
}
