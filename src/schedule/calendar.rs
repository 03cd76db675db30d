use chrono::{Datelike, Months, NaiveDate, Weekday};
use crate::error::{Result, ScheduleError};
use super::types::{CalendarDay, EligibleDay, HolidaySet};

/// First day of the given month, or an error for a month chrono cannot represent
pub fn first_of_month(year: i32, month: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or(ScheduleError::InvalidPeriod { year, month })
}

/// Period that follows the one containing `today`
pub fn next_month(today: NaiveDate) -> (i32, u32) {
    if today.month() == 12 {
        (today.year() + 1, 1)
    } else {
        (today.year(), today.month() + 1)
    }
}

/// Every non-Sunday day of the month in ascending order.
/// Holidays stay in the sequence as holiday-only entries so they can be displayed.
pub fn month_days(year: i32, month: u32, holidays: &HolidaySet) -> Result<Vec<CalendarDay>> {
    let first = first_of_month(year, month)?;
    let next = first
        .checked_add_months(Months::new(1))
        .ok_or(ScheduleError::InvalidPeriod { year, month })?;

    let days = first
        .iter_days()
        .take_while(|d| *d < next)
        .filter(|d| d.weekday() != Weekday::Sun)
        .map(|date| match holidays.get(&date) {
            Some(label) => CalendarDay::Holiday { date, label: label.clone() },
            None => CalendarDay::Working(EligibleDay::new(date)),
        })
        .collect();

    Ok(days)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn day_date(day: &CalendarDay) -> NaiveDate {
        match day {
            CalendarDay::Working(d) => d.date,
            CalendarDay::Holiday { date, .. } => *date,
        }
    }

    fn working_days(days: Vec<CalendarDay>) -> Vec<EligibleDay> {
        days.into_iter()
            .filter_map(|day| match day {
                CalendarDay::Working(d) => Some(d),
                CalendarDay::Holiday { .. } => None,
            })
            .collect()
    }

    #[test]
    fn excludes_sundays_and_holidays() {
        // June 2025: 30 days, Sundays on 1, 8, 15, 22, 29
        let mut holidays = HolidaySet::new();
        holidays.insert(date(2025, 6, 20), "Paso a la Inmortalidad de Belgrano".to_string());

        let days = working_days(month_days(2025, 6, &holidays).unwrap());
        assert_eq!(days.len(), 30 - 5 - 1);
        assert!(days.iter().all(|d| d.weekday != Weekday::Sun));
        assert!(days.iter().all(|d| d.date != date(2025, 6, 20)));
        assert!(days.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(days[0].date, date(2025, 6, 2));
        assert_eq!(days[0].weekday_index(), 0);
    }

    #[test]
    fn holidays_are_retained_for_display() {
        let mut holidays = HolidaySet::new();
        holidays.insert(date(2025, 7, 9), "Día de la Independencia".to_string());

        let days = month_days(2025, 7, &holidays).unwrap();
        let holiday = days.iter().find(|d| day_date(d) == date(2025, 7, 9)).unwrap();
        assert_eq!(
            holiday,
            &CalendarDay::Holiday { date: date(2025, 7, 9), label: "Día de la Independencia".to_string() }
        );
    }

    #[test]
    fn sunday_holiday_is_dropped() {
        let mut holidays = HolidaySet::new();
        holidays.insert(date(2025, 6, 15), "Sunday holiday".to_string());

        let days = month_days(2025, 6, &holidays).unwrap();
        assert!(days.iter().all(|d| day_date(d) != date(2025, 6, 15)));
    }

    #[test]
    fn handles_leap_february_and_december() {
        let feb = month_days(2024, 2, &HolidaySet::new()).unwrap();
        assert_eq!(day_date(feb.last().unwrap()), date(2024, 2, 29));

        let dec = month_days(2025, 12, &HolidaySet::new()).unwrap();
        assert_eq!(day_date(dec.last().unwrap()), date(2025, 12, 31));
    }

    #[test]
    fn rejects_invalid_month() {
        assert!(matches!(
            month_days(2025, 13, &HolidaySet::new()),
            Err(ScheduleError::InvalidPeriod { month: 13, .. })
        ));
    }

    #[test]
    fn next_month_rolls_over_year() {
        assert_eq!(next_month(date(2025, 12, 10)), (2026, 1));
        assert_eq!(next_month(date(2025, 3, 31)), (2025, 4));
    }
}
