use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{error, info};

use crate::domain::{
    repositories::{payments::PaymentRepository, subscribers::SubscriberRepository},
    value_objects::{
        enums::payment_statuses::PaymentStatus,
        monthly_stats::{MonthlyStats, month_end, month_start, same_month},
    },
};

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("statistics cannot be projected into a future month")]
    InvalidRange,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl StatsError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            StatsError::InvalidRange => StatusCode::BAD_REQUEST,
            StatsError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, StatsError>;

pub struct MonthlyStatsUseCase<S, P>
where
    S: SubscriberRepository + Send + Sync + 'static,
    P: PaymentRepository + Send + Sync + 'static,
{
    subscriber_repo: Arc<S>,
    payment_repo: Arc<P>,
}

impl<S, P> MonthlyStatsUseCase<S, P>
where
    S: SubscriberRepository + Send + Sync + 'static,
    P: PaymentRepository + Send + Sync + 'static,
{
    pub fn new(subscriber_repo: Arc<S>, payment_repo: Arc<P>) -> Self {
        Self {
            subscriber_repo,
            payment_repo,
        }
    }

    /// Statistics for the month containing `reference`.
    ///
    /// The current month is classified live from subscriber state, with the
    /// monthly fee as the revenue proxy. Past months are reconstructed from
    /// the payments actually recorded in that window, so later fee changes
    /// never rewrite history. Future months are rejected.
    pub async fn get_stats(
        &self,
        reference: NaiveDate,
        today: NaiveDate,
    ) -> UseCaseResult<MonthlyStats> {
        if same_month(reference, today) {
            return self.current_month(today).await;
        }
        if month_start(reference) > month_start(today) {
            return Err(StatsError::InvalidRange);
        }
        self.past_month(reference).await
    }

    async fn current_month(&self, today: NaiveDate) -> UseCaseResult<MonthlyStats> {
        let subscribers = self.subscriber_repo.list_all().await.map_err(|err| {
            error!(db_error = ?err, "monthly_stats: failed to list subscribers");
            StatsError::Internal(err)
        })?;

        let mut stats = MonthlyStats::default();
        for subscriber in &subscribers {
            stats.total += 1;
            match PaymentStatus::evaluate(subscriber.validity_end, today) {
                PaymentStatus::Paid => {
                    stats.paid += 1;
                    stats.monthly_revenue += subscriber.monthly_fee;
                }
                PaymentStatus::Pending => stats.pending += 1,
                PaymentStatus::Overdue => stats.overdue += 1,
            }
        }

        info!(total = stats.total, paid = stats.paid, "monthly_stats: current month computed");
        Ok(stats)
    }

    async fn past_month(&self, reference: NaiveDate) -> UseCaseResult<MonthlyStats> {
        let window_start = month_start(reference);
        let window_end = month_end(reference);

        // Candidates: everyone created before the next month began, so the
        // final day of the window counts in full
        let cutoff = window_end
            .checked_add_days(Days::new(1))
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
            .ok_or_else(|| StatsError::Internal(anyhow::anyhow!("invalid cutoff date")))?;

        let candidates = self
            .subscriber_repo
            .list_created_before(cutoff)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "monthly_stats: failed to list historical subscribers");
                StatsError::Internal(err)
            })?;
        let candidate_ids: HashSet<_> = candidates.iter().map(|s| s.id).collect();

        let payments = self
            .payment_repo
            .list_in_window(window_start, window_end)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "monthly_stats: failed to list historical payments");
                StatsError::Internal(err)
            })?;

        let mut paid_subscribers = HashSet::new();
        let mut revenue = Decimal::ZERO;
        for payment in payments
            .iter()
            .filter(|p| candidate_ids.contains(&p.subscriber_id))
        {
            paid_subscribers.insert(payment.subscriber_id);
            // Actual recorded amounts, not the fee as it stands today
            revenue += payment.amount;
        }

        let total = candidates.len() as i64;
        let paid = paid_subscribers.len() as i64;

        Ok(MonthlyStats {
            total,
            paid,
            // Past months have no grace period; whoever did not pay is overdue
            pending: 0,
            overdue: total - paid,
            monthly_revenue: revenue,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::{payments::PaymentEntity, subscribers::SubscriberEntity},
        repositories::{payments::MockPaymentRepository, subscribers::MockSubscriberRepository},
    };
    use chrono::Utc;
    use mockall::predicate::eq;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn subscriber(fee: i64, validity_end: Option<NaiveDate>) -> SubscriberEntity {
        SubscriberEntity {
            id: Uuid::new_v4(),
            name: "Subscriber".to_string(),
            phone: "03 111 222".to_string(),
            car: "Toyota".to_string(),
            vehicle_plate: "B 123456".to_string(),
            monthly_fee: Decimal::new(fee, 0),
            last_payment_date: None,
            validity_end,
            status: "pending".to_string(),
            created_at: Utc::now(),
        }
    }

    fn payment(subscriber_id: Uuid, amount: i64, payment_date: NaiveDate) -> PaymentEntity {
        PaymentEntity {
            id: Uuid::new_v4(),
            subscriber_id,
            amount: Decimal::new(amount, 0),
            payment_date,
            recorded_by_username: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn current_month_counts_by_live_status_and_sums_fees() {
        let today = date(2024, 2, 10);

        let mut subscriber_repo = MockSubscriberRepository::new();
        subscriber_repo.expect_list_all().returning(move || {
            Box::pin(async move {
                Ok(vec![
                    subscriber(100, Some(date(2024, 2, 29))), // paid
                    subscriber(150, Some(date(2024, 3, 31))), // paid
                    subscriber(100, Some(date(2024, 1, 31))), // overdue
                    subscriber(100, None),                    // overdue (day 10)
                ])
            })
        });

        let usecase = MonthlyStatsUseCase::new(
            Arc::new(subscriber_repo),
            Arc::new(MockPaymentRepository::new()),
        );

        let stats = usecase.get_stats(today, today).await.unwrap();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.paid, 2);
        assert_eq!(stats.pending, 0);
        assert_eq!(stats.overdue, 2);
        assert_eq!(stats.monthly_revenue, Decimal::new(250, 0));
    }

    #[tokio::test]
    async fn current_month_grace_period_counts_pending() {
        let today = date(2024, 2, 3);

        let mut subscriber_repo = MockSubscriberRepository::new();
        subscriber_repo.expect_list_all().returning(move || {
            Box::pin(async move { Ok(vec![subscriber(100, None), subscriber(100, None)]) })
        });

        let usecase = MonthlyStatsUseCase::new(
            Arc::new(subscriber_repo),
            Arc::new(MockPaymentRepository::new()),
        );

        let stats = usecase.get_stats(today, today).await.unwrap();
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.overdue, 0);
        assert_eq!(stats.monthly_revenue, Decimal::ZERO);
    }

    #[tokio::test]
    async fn past_month_uses_recorded_amounts_not_current_fee() {
        let today = date(2024, 3, 15);
        let reference = date(2024, 1, 1);
        let payer = subscriber(100, None); // fee is 100 today
        let payer_id = payer.id;
        let silent = subscriber(100, None);

        let mut subscriber_repo = MockSubscriberRepository::new();
        subscriber_repo
            .expect_list_created_before()
            .returning(move |_| {
                let rows = vec![payer.clone(), silent.clone()];
                Box::pin(async move { Ok(rows) })
            });

        let mut payment_repo = MockPaymentRepository::new();
        payment_repo
            .expect_list_in_window()
            .with(eq(date(2024, 1, 1)), eq(date(2024, 1, 31)))
            .returning(move |_, _| {
                // What was actually collected back then was 80
                let rows = vec![payment(payer_id, 80, date(2024, 1, 12))];
                Box::pin(async move { Ok(rows) })
            });

        let usecase =
            MonthlyStatsUseCase::new(Arc::new(subscriber_repo), Arc::new(payment_repo));

        let stats = usecase.get_stats(reference, today).await.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.paid, 1);
        assert_eq!(stats.pending, 0);
        assert_eq!(stats.overdue, 1);
        assert_eq!(stats.monthly_revenue, Decimal::new(80, 0));
    }

    #[tokio::test]
    async fn past_month_ignores_payments_from_unknown_subscribers() {
        let today = date(2024, 3, 15);
        let candidate = subscriber(100, None);
        let candidate_id = candidate.id;

        let mut subscriber_repo = MockSubscriberRepository::new();
        subscriber_repo
            .expect_list_created_before()
            .returning(move |_| {
                let rows = vec![candidate.clone()];
                Box::pin(async move { Ok(rows) })
            });

        let mut payment_repo = MockPaymentRepository::new();
        payment_repo.expect_list_in_window().returning(move |_, _| {
            let rows = vec![
                payment(candidate_id, 50, date(2024, 1, 5)),
                // Subscriber created after the window; filtered out
                payment(Uuid::new_v4(), 999, date(2024, 1, 6)),
            ];
            Box::pin(async move { Ok(rows) })
        });

        let usecase =
            MonthlyStatsUseCase::new(Arc::new(subscriber_repo), Arc::new(payment_repo));

        let stats = usecase.get_stats(date(2024, 1, 1), today).await.unwrap();
        assert_eq!(stats.paid, 1);
        assert_eq!(stats.monthly_revenue, Decimal::new(50, 0));
    }

    #[tokio::test]
    async fn distinct_paid_count_with_two_payments_from_one_subscriber() {
        let today = date(2024, 3, 15);
        let candidate = subscriber(100, None);
        let candidate_id = candidate.id;

        let mut subscriber_repo = MockSubscriberRepository::new();
        subscriber_repo
            .expect_list_created_before()
            .returning(move |_| {
                let rows = vec![candidate.clone()];
                Box::pin(async move { Ok(rows) })
            });

        let mut payment_repo = MockPaymentRepository::new();
        payment_repo.expect_list_in_window().returning(move |_, _| {
            let rows = vec![
                payment(candidate_id, 50, date(2024, 1, 5)),
                payment(candidate_id, 50, date(2024, 1, 20)),
            ];
            Box::pin(async move { Ok(rows) })
        });

        let usecase =
            MonthlyStatsUseCase::new(Arc::new(subscriber_repo), Arc::new(payment_repo));

        let stats = usecase.get_stats(date(2024, 1, 1), today).await.unwrap();
        assert_eq!(stats.paid, 1);
        assert_eq!(stats.overdue, 0);
        assert_eq!(stats.monthly_revenue, Decimal::new(100, 0));
    }

    #[tokio::test]
    async fn past_month_candidate_cutoff_is_the_start_of_the_next_month() {
        let today = date(2024, 3, 15);
        let reference = date(2024, 1, 20);
        // Exclusive bound: a subscriber created at any instant of Jan 31,
        // sub-second precision included, is still a January candidate
        let expected_cutoff = date(2024, 2, 1).and_hms_opt(0, 0, 0).unwrap().and_utc();

        let mut subscriber_repo = MockSubscriberRepository::new();
        subscriber_repo
            .expect_list_created_before()
            .with(eq(expected_cutoff))
            .times(1)
            .returning(|_| Box::pin(async { Ok(vec![]) }));

        let mut payment_repo = MockPaymentRepository::new();
        payment_repo
            .expect_list_in_window()
            .returning(|_, _| Box::pin(async { Ok(vec![]) }));

        let usecase =
            MonthlyStatsUseCase::new(Arc::new(subscriber_repo), Arc::new(payment_repo));

        let stats = usecase.get_stats(reference, today).await.unwrap();
        assert_eq!(stats.total, 0);
    }

    #[tokio::test]
    async fn future_month_is_rejected() {
        let usecase = MonthlyStatsUseCase::new(
            Arc::new(MockSubscriberRepository::new()),
            Arc::new(MockPaymentRepository::new()),
        );

        let result = usecase.get_stats(date(2024, 4, 1), date(2024, 3, 15)).await;
        assert!(matches!(result, Err(StatsError::InvalidRange)));
    }
}
