// src/db/subscription_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use crate::{
    common::error::AppError,
    models::subscription::{PlanType, Subscription},
};

/// Operações de armazenamento usadas pelo resolvedor de assinaturas.
/// O trait existe para o serviço poder ser testado sem banco.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Subscription>, AppError>;

    /// Cria o registro de trial. Se outra requisição já criou, devolve
    /// `AppError::SubscriptionAlreadyExists`.
    async fn create_trial(
        &self,
        user_id: Uuid,
        trial_start: DateTime<Utc>,
        trial_end: DateTime<Utc>,
    ) -> Result<Subscription, AppError>;

    /// Marca como expirado só se o registro ainda for o que foi avaliado:
    /// ativo, do mesmo plano e com a janela vencida em `now`.
    /// Devolve `false` quando nada foi alterado.
    async fn mark_expired(
        &self,
        user_id: Uuid,
        plan_type: PlanType,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError>;

    async fn upsert_plan(
        &self,
        user_id: Uuid,
        plan_type: PlanType,
        subscription_start: DateTime<Utc>,
        subscription_end: DateTime<Utc>,
        payment_link: Option<&str>,
    ) -> Result<Subscription, AppError>;
}

#[derive(Clone)]
pub struct SubscriptionRepository {
    pool: PgPool,
}

impl SubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionStore for SubscriptionRepository {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Subscription>, AppError> {
        let subscription = sqlx::query_as::<_, Subscription>(
            "SELECT * FROM user_subscriptions WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(subscription)
    }

    async fn create_trial(
        &self,
        user_id: Uuid,
        trial_start: DateTime<Utc>,
        trial_end: DateTime<Utc>,
    ) -> Result<Subscription, AppError> {
        // ON CONFLICT DO NOTHING não devolve linha quando o registro já existe
        let created = sqlx::query_as::<_, Subscription>(
            r#"
            INSERT INTO user_subscriptions (user_id, plan_type, status, trial_start, trial_end)
            VALUES ($1, 'free_trial', 'active', $2, $3)
            ON CONFLICT (user_id) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(trial_start)
        .bind(trial_end)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::SubscriptionAlreadyExists;
                }
            }
            AppError::DatabaseError(e)
        })?;

        created.ok_or(AppError::SubscriptionAlreadyExists)
    }

    async fn mark_expired(
        &self,
        user_id: Uuid,
        plan_type: PlanType,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        // A janela segue o tipo de plano, como em Subscription::window_end
        let result = sqlx::query(
            r#"
            UPDATE user_subscriptions
            SET status = 'expired', updated_at = NOW()
            WHERE user_id = $1
              AND status = 'active'
              AND plan_type = $2
              AND (CASE WHEN plan_type = 'free_trial' THEN trial_end ELSE subscription_end END) <= $3
            "#,
        )
        .bind(user_id)
        .bind(plan_type)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn upsert_plan(
        &self,
        user_id: Uuid,
        plan_type: PlanType,
        subscription_start: DateTime<Utc>,
        subscription_end: DateTime<Utc>,
        payment_link: Option<&str>,
    ) -> Result<Subscription, AppError> {
        // UPSERT (Insert or Update): sobrescreve a janela paga anterior
        let subscription = sqlx::query_as::<_, Subscription>(
            r#"
            INSERT INTO user_subscriptions (
                user_id, plan_type, status,
                subscription_start, subscription_end, payment_link
            )
            VALUES ($1, $2, 'active', $3, $4, $5)
            ON CONFLICT (user_id)
            DO UPDATE SET
                plan_type = EXCLUDED.plan_type,
                status = 'active',
                subscription_start = EXCLUDED.subscription_start,
                subscription_end = EXCLUDED.subscription_end,
                payment_link = EXCLUDED.payment_link,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(plan_type)
        .bind(subscription_start)
        .bind(subscription_end)
        .bind(payment_link)
        .fetch_one(&self.pool)
        .await?;

        Ok(subscription)
    }
}
