use std::fmt::Display;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Last day of the grace period: an unpaid subscriber stays `pending`
/// through this day of the month and turns `overdue` from the next day on.
pub const GRACE_PERIOD_LAST_DAY: u32 = 5;

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentStatus {
    Paid,
    #[default]
    Pending,
    Overdue,
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Pending => "pending",
            PaymentStatus::Overdue => "overdue",
        };
        write!(f, "{}", status)
    }
}

impl PaymentStatus {
    /// Derives the payment status from the validity-end date.
    ///
    /// The status is never trusted from storage; every read re-derives it
    /// from `valid_until` and the caller-supplied `today`.
    pub fn evaluate(valid_until: Option<NaiveDate>, today: NaiveDate) -> Self {
        let current_month_start = today.with_day(1).unwrap_or(today);

        // Validity covering the current month start (inclusive) means paid
        if let Some(valid_until) = valid_until {
            if valid_until >= current_month_start {
                return PaymentStatus::Paid;
            }
        }

        if today.day() <= GRACE_PERIOD_LAST_DAY {
            PaymentStatus::Pending
        } else {
            PaymentStatus::Overdue
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn validity_through_end_of_current_month_is_paid() {
        let today = date(2024, 2, 10);
        let status = PaymentStatus::evaluate(Some(date(2024, 2, 29)), today);
        assert_eq!(status, PaymentStatus::Paid);
    }

    #[test]
    fn validity_exactly_on_month_start_is_paid() {
        let today = date(2024, 2, 20);
        let status = PaymentStatus::evaluate(Some(date(2024, 2, 1)), today);
        assert_eq!(status, PaymentStatus::Paid);
    }

    #[test]
    fn previous_month_validity_does_not_cover_current_month() {
        let today = date(2024, 2, 10);
        let status = PaymentStatus::evaluate(Some(date(2024, 1, 31)), today);
        assert_eq!(status, PaymentStatus::Overdue);
    }

    #[test]
    fn no_validity_within_grace_period_is_pending() {
        for day in 1..=5 {
            let status = PaymentStatus::evaluate(None, date(2024, 3, day));
            assert_eq!(status, PaymentStatus::Pending, "day {}", day);
        }
    }

    #[test]
    fn no_validity_after_grace_period_is_overdue() {
        for day in [6, 7, 15, 31] {
            let status = PaymentStatus::evaluate(None, date(2024, 3, day));
            assert_eq!(status, PaymentStatus::Overdue, "day {}", day);
        }
    }

    #[test]
    fn grace_period_cutoff_is_hard_between_day_5_and_6() {
        let expired = Some(date(2024, 2, 29));
        assert_eq!(
            PaymentStatus::evaluate(expired, date(2024, 3, 5)),
            PaymentStatus::Pending
        );
        assert_eq!(
            PaymentStatus::evaluate(expired, date(2024, 3, 6)),
            PaymentStatus::Overdue
        );
    }
}
