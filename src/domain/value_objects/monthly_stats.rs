use chrono::{Datelike, Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Per-month counters, derived on demand and never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MonthlyStats {
    pub total: i64,
    pub paid: i64,
    pub pending: i64,
    pub overdue: i64,
    pub monthly_revenue: Decimal,
}

pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn month_end(date: NaiveDate) -> NaiveDate {
    let next_month_start = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    };
    next_month_start
        .and_then(|d| d.checked_sub_days(Days::new(1)))
        .unwrap_or(date)
}

pub fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_bounds_cover_leap_february() {
        assert_eq!(month_start(date(2024, 2, 15)), date(2024, 2, 1));
        assert_eq!(month_end(date(2024, 2, 15)), date(2024, 2, 29));
        assert_eq!(month_end(date(2023, 2, 3)), date(2023, 2, 28));
    }

    #[test]
    fn month_end_rolls_over_december() {
        assert_eq!(month_end(date(2024, 12, 5)), date(2024, 12, 31));
    }

    #[test]
    fn same_month_compares_year_and_month() {
        assert!(same_month(date(2024, 3, 1), date(2024, 3, 31)));
        assert!(!same_month(date(2024, 3, 1), date(2023, 3, 1)));
        assert!(!same_month(date(2024, 3, 1), date(2024, 4, 1)));
    }
}
