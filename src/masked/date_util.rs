use chrono::{NaiveDate, NaiveDateTime};

/// Two-digit years at or below this value resolve to the 2000s, the rest to
/// the 1900s ("49" -> 1949, "23" -> 2023).
pub const TWO_DIGIT_YEAR_CUTOFF: u32 = 68;

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
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
        _ => 0,
    }
}

pub fn resolve_two_digit_year(year: u32) -> i32 {
    if year <= TWO_DIGIT_YEAR_CUTOFF {
        2000 + year as i32
    } else {
        1900 + year as i32
    }
}

/// 24-hour clock value rendered on a 12-hour dial (0 -> 12, 15 -> 3).
pub fn to_twelve_hour(hour: u32) -> u32 {
    match hour % 12 {
        0 => 12,
        rem => rem,
    }
}

pub fn to_twenty_four_hour(hour: u32, pm: bool) -> u32 {
    match (hour % 12, pm) {
        (rem, true) => rem + 12,
        (rem, false) => rem,
    }
}

/// Builds a date-time, clamping the day to the month's length
/// (Feb 30 -> Feb 28) so it survives a month/year step.
pub fn clamped_date_time(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
) -> Option<NaiveDateTime> {
    let day = day.min(days_in_month(year, month)).max(1);
    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)
}
