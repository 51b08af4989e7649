use time::{util::days_in_year_month, Date, Month};

use super::models::Quarter;

/// Due dates of Q1..Q4, indexed by [`Quarter::position`].
pub type DueDates = [Date; 4];

/// Days per reporting period used when estimating how many reports a
/// project should have filed (three 30-day months).
const DAYS_PER_PERIOD: i64 = 90;

/// Adds calendar months to a date, clamping the day to the end of the target
/// month (Nov 30 + 3 months = Feb 28/29).
///
/// Saturates at [`Date::MAX`] past the representable range.
pub fn add_months(date: Date, months: u32) -> Date {
    let zero_based = date.year() as i64 * 12 + (date.month() as i64 - 1) + months as i64;
    let year = zero_based.div_euclid(12);
    let month_number = zero_based.rem_euclid(12) as u8 + 1;

    let Ok(year) = i32::try_from(year) else {
        return Date::MAX;
    };
    let Ok(month) = Month::try_from(month_number) else {
        return Date::MAX;
    };

    let day = date.day().min(days_in_year_month(year, month));
    Date::from_calendar_date(year, month, day).unwrap_or(Date::MAX)
}

/// Due date of each quarter: `start + 3 * i` months for quarter index `i`.
pub fn derive_due_dates(start: Date) -> DueDates {
    Quarter::ALL.map(|quarter| add_months(start, 3 * quarter.index() as u32))
}

/// Number of reports a project funded on `funded_on` is expected to have
/// filed by `today`, capped at the four quarters of the timeline.
pub fn expected_report_count(funded_on: Date, today: Date) -> usize {
    let elapsed_days = (today - funded_on).whole_days();
    if elapsed_days <= 0 {
        return 0;
    }
    ((elapsed_days / DAYS_PER_PERIOD) as usize).min(Quarter::ALL.len())
}
