use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::{
    entities::{
        activity_logs::InsertActivityLogEntity,
        payments::{InsertPaymentEntity, UpdatePaymentEntity},
        subscribers::{StampPaymentEntity, UpdateSubscriberEntity},
    },
    repositories::{
        activity_logs::ActivityLogRepository, payments::PaymentRepository,
        subscribers::SubscriberRepository, user_accounts::UserAccountRepository,
    },
    value_objects::{
        enums::{action_types::ActionType, app_roles::AppRole, payment_statuses::PaymentStatus},
        monthly_stats::month_end,
        operators::Operator,
        payments::{PaymentModel, UpdatePaymentModel},
        subscribers::{InsertSubscriberModel, SubscriberModel, UpdateSubscriberModel},
    },
};

#[derive(Debug, Error)]
pub enum SubscriberError {
    #[error("subscriber not found")]
    SubscriberNotFound,
    #[error("payment not found")]
    PaymentNotFound,
    #[error("operator is not allowed to modify payment history")]
    Forbidden,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl SubscriberError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            SubscriberError::SubscriberNotFound | SubscriberError::PaymentNotFound => {
                StatusCode::NOT_FOUND
            }
            SubscriberError::Forbidden => StatusCode::FORBIDDEN,
            SubscriberError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, SubscriberError>;

pub struct SubscriberUseCase<S, P, L, U>
where
    S: SubscriberRepository + Send + Sync + 'static,
    P: PaymentRepository + Send + Sync + 'static,
    L: ActivityLogRepository + Send + Sync + 'static,
    U: UserAccountRepository + Send + Sync + 'static,
{
    subscriber_repo: Arc<S>,
    payment_repo: Arc<P>,
    activity_log_repo: Arc<L>,
    user_account_repo: Arc<U>,
}

impl<S, P, L, U> SubscriberUseCase<S, P, L, U>
where
    S: SubscriberRepository + Send + Sync + 'static,
    P: PaymentRepository + Send + Sync + 'static,
    L: ActivityLogRepository + Send + Sync + 'static,
    U: UserAccountRepository + Send + Sync + 'static,
{
    pub fn new(
        subscriber_repo: Arc<S>,
        payment_repo: Arc<P>,
        activity_log_repo: Arc<L>,
        user_account_repo: Arc<U>,
    ) -> Self {
        Self {
            subscriber_repo,
            payment_repo,
            activity_log_repo,
            user_account_repo,
        }
    }

    /// Lists every subscriber with the status re-derived from the
    /// validity-end date and the caller-supplied `today`.
    pub async fn list(&self, today: NaiveDate) -> UseCaseResult<Vec<SubscriberModel>> {
        let subscribers = self.subscriber_repo.list_all().await.map_err(|err| {
            error!(db_error = ?err, "subscribers: failed to list subscribers");
            SubscriberError::Internal(err)
        })?;

        Ok(subscribers
            .into_iter()
            .map(|entity| SubscriberModel::from_entity(entity, today))
            .collect())
    }

    pub async fn add(
        &self,
        insert_subscriber_model: InsertSubscriberModel,
        operator: &Operator,
        today: NaiveDate,
    ) -> UseCaseResult<Uuid> {
        let subscriber_name = insert_subscriber_model.name.clone();
        let subscriber_id = self
            .subscriber_repo
            .insert(insert_subscriber_model.into_entity(today))
            .await
            .map_err(|err| {
                error!(db_error = ?err, "subscribers: failed to insert subscriber");
                SubscriberError::Internal(err)
            })?;

        info!(%subscriber_id, "subscribers: subscriber added");
        self.append_log(InsertActivityLogEntity {
            action_type: ActionType::SubscriberAdded.to_string(),
            performed_by_user_id: operator.user_id,
            performed_by_username: operator.username.clone(),
            subscriber_id: Some(subscriber_id),
            subscriber_name,
            amount: None,
            details: None,
        })
        .await;

        Ok(subscriber_id)
    }

    pub async fn update(
        &self,
        subscriber_id: Uuid,
        update_subscriber_model: UpdateSubscriberModel,
    ) -> UseCaseResult<()> {
        use crate::domain::value_objects::subscribers::UNKNOWN_CAR;

        let affected = self
            .subscriber_repo
            .update(
                subscriber_id,
                UpdateSubscriberEntity {
                    name: update_subscriber_model.name,
                    phone: update_subscriber_model.phone,
                    car: update_subscriber_model
                        .car
                        .unwrap_or_else(|| UNKNOWN_CAR.to_string()),
                    vehicle_plate: update_subscriber_model.vehicle_plate,
                    monthly_fee: update_subscriber_model.monthly_fee,
                },
            )
            .await
            .map_err(|err| {
                error!(%subscriber_id, db_error = ?err, "subscribers: failed to update subscriber");
                SubscriberError::Internal(err)
            })?;

        if affected == 0 {
            return Err(SubscriberError::SubscriberNotFound);
        }
        Ok(())
    }

    /// Deletes a subscriber and everything it owns. Payments go first; the
    /// store has no automatic cascade, so the ordering here is what keeps
    /// referential integrity.
    pub async fn delete(&self, subscriber_id: Uuid) -> UseCaseResult<()> {
        let deleted_payments = self
            .payment_repo
            .delete_by_subscriber(subscriber_id)
            .await
            .map_err(|err| {
                error!(%subscriber_id, db_error = ?err, "subscribers: failed to delete payments");
                SubscriberError::Internal(err)
            })?;

        let affected = self
            .subscriber_repo
            .delete(subscriber_id)
            .await
            .map_err(|err| {
                error!(%subscriber_id, db_error = ?err, "subscribers: failed to delete subscriber");
                SubscriberError::Internal(err)
            })?;

        if affected == 0 {
            return Err(SubscriberError::SubscriberNotFound);
        }

        info!(%subscriber_id, deleted_payments, "subscribers: subscriber deleted");
        Ok(())
    }

    /// Records a payment and stamps the subscriber paid through the end of
    /// the current month.
    ///
    /// The payment insert and the subscriber update are two independent
    /// statements. A failure between them leaves the payment recorded and
    /// the subscriber row stale; the stale status is harmless (it is
    /// re-derived on every read) but the validity-end date stays behind
    /// until the next payment or manual edit.
    pub async fn record_payment(
        &self,
        subscriber_id: Uuid,
        amount: Decimal,
        operator: &Operator,
        today: NaiveDate,
    ) -> UseCaseResult<Uuid> {
        let subscriber = self
            .subscriber_repo
            .find_by_id(subscriber_id)
            .await
            .map_err(SubscriberError::Internal)?
            .ok_or(SubscriberError::SubscriberNotFound)?;

        let payment_id = self
            .payment_repo
            .insert(InsertPaymentEntity {
                subscriber_id,
                amount,
                payment_date: today,
                recorded_by_username: Some(operator.username.clone()),
            })
            .await
            .map_err(|err| {
                error!(%subscriber_id, db_error = ?err, "subscribers: failed to insert payment");
                SubscriberError::Internal(err)
            })?;

        self.subscriber_repo
            .stamp_payment(
                subscriber_id,
                StampPaymentEntity {
                    last_payment_date: today,
                    validity_end: month_end(today),
                    status: PaymentStatus::Paid.to_string(),
                },
            )
            .await
            .map_err(|err| {
                error!(
                    %subscriber_id,
                    %payment_id,
                    db_error = ?err,
                    "subscribers: payment recorded but validity stamp failed"
                );
                SubscriberError::Internal(err)
            })?;

        info!(%subscriber_id, %payment_id, "subscribers: payment recorded");
        self.append_log(InsertActivityLogEntity {
            action_type: ActionType::PaymentRecorded.to_string(),
            performed_by_user_id: operator.user_id,
            performed_by_username: operator.username.clone(),
            subscriber_id: Some(subscriber_id),
            subscriber_name: subscriber.name,
            amount: Some(amount),
            details: None,
        })
        .await;

        Ok(payment_id)
    }

    pub async fn payment_history(&self, subscriber_id: Uuid) -> UseCaseResult<Vec<PaymentModel>> {
        let payments = self
            .payment_repo
            .list_by_subscriber(subscriber_id)
            .await
            .map_err(|err| {
                error!(%subscriber_id, db_error = ?err, "subscribers: failed to list payments");
                SubscriberError::Internal(err)
            })?;

        Ok(payments.into_iter().map(PaymentModel::from).collect())
    }

    /// Rewrites a history row. The owning subscriber's validity-end date is
    /// deliberately left untouched: the stamp written at recording time
    /// stands until the next payment.
    pub async fn update_payment(
        &self,
        payment_id: Uuid,
        update_payment_model: UpdatePaymentModel,
        operator: &Operator,
    ) -> UseCaseResult<()> {
        self.require_admin(operator).await?;

        let affected = self
            .payment_repo
            .update(
                payment_id,
                UpdatePaymentEntity {
                    amount: update_payment_model.amount,
                    payment_date: update_payment_model.payment_date,
                },
            )
            .await
            .map_err(SubscriberError::Internal)?;

        if affected == 0 {
            return Err(SubscriberError::PaymentNotFound);
        }
        Ok(())
    }

    /// Removes a history row without restamping the subscriber, same policy
    /// as `update_payment`.
    pub async fn delete_payment(&self, payment_id: Uuid, operator: &Operator) -> UseCaseResult<()> {
        self.require_admin(operator).await?;

        let affected = self
            .payment_repo
            .delete(payment_id)
            .await
            .map_err(SubscriberError::Internal)?;

        if affected == 0 {
            return Err(SubscriberError::PaymentNotFound);
        }
        Ok(())
    }

    async fn require_admin(&self, operator: &Operator) -> UseCaseResult<()> {
        let roles = self
            .user_account_repo
            .roles_for(operator.user_id)
            .await
            .map_err(SubscriberError::Internal)?;

        match AppRole::resolve(&roles) {
            Some(role) if role.is_admin_or_higher() => Ok(()),
            _ => Err(SubscriberError::Forbidden),
        }
    }

    // Audit writes never fail the operation they describe.
    async fn append_log(&self, entry: InsertActivityLogEntity) {
        if let Err(err) = self.activity_log_repo.insert(entry).await {
            warn!(db_error = ?err, "subscribers: failed to append activity log");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::subscribers::SubscriberEntity,
        repositories::{
            activity_logs::MockActivityLogRepository, payments::MockPaymentRepository,
            subscribers::MockSubscriberRepository, user_accounts::MockUserAccountRepository,
        },
    };
    use chrono::{NaiveDate, Utc};
    use mockall::predicate::eq;
    use rust_decimal::Decimal;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn operator() -> Operator {
        Operator {
            user_id: Uuid::new_v4(),
            username: "collector".to_string(),
        }
    }

    fn sample_subscriber(id: Uuid, validity_end: Option<NaiveDate>) -> SubscriberEntity {
        SubscriberEntity {
            id,
            name: "Subscriber".to_string(),
            phone: "03 123 456".to_string(),
            car: "Toyota".to_string(),
            vehicle_plate: "B 123456".to_string(),
            monthly_fee: Decimal::new(100, 0),
            last_payment_date: None,
            validity_end,
            status: "pending".to_string(),
            created_at: Utc::now(),
        }
    }

    fn usecase(
        subscriber_repo: MockSubscriberRepository,
        payment_repo: MockPaymentRepository,
        activity_log_repo: MockActivityLogRepository,
        user_account_repo: MockUserAccountRepository,
    ) -> SubscriberUseCase<
        MockSubscriberRepository,
        MockPaymentRepository,
        MockActivityLogRepository,
        MockUserAccountRepository,
    > {
        SubscriberUseCase::new(
            Arc::new(subscriber_repo),
            Arc::new(payment_repo),
            Arc::new(activity_log_repo),
            Arc::new(user_account_repo),
        )
    }

    #[tokio::test]
    async fn list_rederives_status_from_validity_end() {
        let mut subscriber_repo = MockSubscriberRepository::new();
        subscriber_repo.expect_list_all().returning(|| {
            Box::pin(async {
                Ok(vec![
                    // Stored status says pending, validity says paid
                    sample_subscriber(Uuid::new_v4(), Some(date(2024, 2, 29))),
                    sample_subscriber(Uuid::new_v4(), Some(date(2024, 1, 31))),
                ])
            })
        });

        let usecase = usecase(
            subscriber_repo,
            MockPaymentRepository::new(),
            MockActivityLogRepository::new(),
            MockUserAccountRepository::new(),
        );

        let subscribers = usecase.list(date(2024, 2, 10)).await.unwrap();
        assert_eq!(subscribers[0].status, PaymentStatus::Paid);
        assert_eq!(subscribers[1].status, PaymentStatus::Overdue);
    }

    #[tokio::test]
    async fn delete_removes_owned_payments_before_the_subscriber_row() {
        let subscriber_id = Uuid::new_v4();
        let mut sequence = mockall::Sequence::new();

        let mut payment_repo = MockPaymentRepository::new();
        let mut subscriber_repo = MockSubscriberRepository::new();

        payment_repo
            .expect_delete_by_subscriber()
            .with(eq(subscriber_id))
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_| Box::pin(async { Ok(3) }));

        subscriber_repo
            .expect_delete()
            .with(eq(subscriber_id))
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_| Box::pin(async { Ok(1) }));

        let usecase = usecase(
            subscriber_repo,
            payment_repo,
            MockActivityLogRepository::new(),
            MockUserAccountRepository::new(),
        );

        usecase.delete(subscriber_id).await.unwrap();
    }

    #[tokio::test]
    async fn record_payment_inserts_then_stamps_end_of_month_validity() {
        let subscriber_id = Uuid::new_v4();
        let payment_id = Uuid::new_v4();
        let today = date(2024, 2, 10);
        let mut sequence = mockall::Sequence::new();

        let mut subscriber_repo = MockSubscriberRepository::new();
        let mut payment_repo = MockPaymentRepository::new();
        let mut activity_log_repo = MockActivityLogRepository::new();

        subscriber_repo
            .expect_find_by_id()
            .with(eq(subscriber_id))
            .returning(move |id| Box::pin(async move { Ok(Some(sample_subscriber(id, None))) }));

        payment_repo
            .expect_insert()
            .times(1)
            .in_sequence(&mut sequence)
            .withf(move |payment| {
                payment.subscriber_id == subscriber_id
                    && payment.amount == Decimal::new(80, 0)
                    && payment.payment_date == date(2024, 2, 10)
            })
            .returning(move |_| Box::pin(async move { Ok(payment_id) }));

        subscriber_repo
            .expect_stamp_payment()
            .times(1)
            .in_sequence(&mut sequence)
            .withf(move |id, stamp| {
                *id == subscriber_id
                    && stamp.last_payment_date == date(2024, 2, 10)
                    && stamp.validity_end == date(2024, 2, 29)
                    && stamp.status == "paid"
            })
            .returning(|_, _| Box::pin(async { Ok(1) }));

        activity_log_repo
            .expect_insert()
            .withf(|entry| {
                entry.action_type == "payment_recorded" && entry.amount == Some(Decimal::new(80, 0))
            })
            .returning(|_| Box::pin(async { Ok(Uuid::new_v4()) }));

        let usecase = usecase(
            subscriber_repo,
            payment_repo,
            activity_log_repo,
            MockUserAccountRepository::new(),
        );

        let recorded = usecase
            .record_payment(subscriber_id, Decimal::new(80, 0), &operator(), today)
            .await
            .unwrap();
        assert_eq!(recorded, payment_id);
    }

    #[tokio::test]
    async fn record_payment_for_unknown_subscriber_is_not_found() {
        let mut subscriber_repo = MockSubscriberRepository::new();
        subscriber_repo
            .expect_find_by_id()
            .returning(|_| Box::pin(async { Ok(None) }));

        let usecase = usecase(
            subscriber_repo,
            MockPaymentRepository::new(),
            MockActivityLogRepository::new(),
            MockUserAccountRepository::new(),
        );

        let result = usecase
            .record_payment(
                Uuid::new_v4(),
                Decimal::new(80, 0),
                &operator(),
                date(2024, 2, 10),
            )
            .await;
        assert!(matches!(result, Err(SubscriberError::SubscriberNotFound)));
    }

    #[tokio::test]
    async fn payment_history_edits_require_admin_role() {
        let mut user_account_repo = MockUserAccountRepository::new();
        user_account_repo
            .expect_roles_for()
            .returning(|_| Box::pin(async { Ok(vec!["employee".to_string()]) }));

        let usecase = usecase(
            MockSubscriberRepository::new(),
            MockPaymentRepository::new(),
            MockActivityLogRepository::new(),
            user_account_repo,
        );

        let result = usecase.delete_payment(Uuid::new_v4(), &operator()).await;
        assert!(matches!(result, Err(SubscriberError::Forbidden)));
    }

    #[tokio::test]
    async fn deleting_a_payment_does_not_restamp_the_subscriber() {
        let payment_id = Uuid::new_v4();

        let mut user_account_repo = MockUserAccountRepository::new();
        user_account_repo
            .expect_roles_for()
            .returning(|_| Box::pin(async { Ok(vec!["admin".to_string()]) }));

        let mut payment_repo = MockPaymentRepository::new();
        payment_repo
            .expect_delete()
            .with(eq(payment_id))
            .returning(|_| Box::pin(async { Ok(1) }));

        // No stamp_payment expectation on the subscriber repo: any call panics.
        let usecase = usecase(
            MockSubscriberRepository::new(),
            payment_repo,
            MockActivityLogRepository::new(),
            user_account_repo,
        );

        usecase
            .delete_payment(payment_id, &operator())
            .await
            .unwrap();
    }
}
