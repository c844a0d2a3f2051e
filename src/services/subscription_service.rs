// src/services/subscription_service.rs

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::SubscriptionStore,
    models::subscription::{
        AccessStatus, PlanType, Subscription, SubscriptionStatus, TRIAL_DAYS,
    },
};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Dias restantes até `end`, arredondando para cima (pode ser negativo).
pub fn days_until(end: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let ms = (end - now).num_milliseconds();
    // Divisão inteira trunca em direção ao zero: para negativos já é o teto
    if ms > 0 && ms % DAY_MS != 0 {
        ms / DAY_MS + 1
    } else {
        ms / DAY_MS
    }
}

// Resultado da avaliação de um registro existente
#[derive(Debug)]
pub struct Evaluation {
    pub status: AccessStatus,
    // O registro venceu e ainda está "active" no banco
    pub needs_expiry_write: bool,
}

/// Avalia um registro sem tocar no banco.
pub fn evaluate(subscription: Subscription, now: DateTime<Utc>) -> Evaluation {
    let is_trial = !subscription.plan_type.is_paid();

    match subscription.status {
        SubscriptionStatus::Cancelled => Evaluation {
            status: AccessStatus {
                has_access: false,
                subscription: Some(subscription),
                days_remaining: 0,
                is_trial_expired: false,
            },
            needs_expiry_write: false,
        },
        SubscriptionStatus::Expired => Evaluation {
            status: AccessStatus {
                has_access: false,
                subscription: Some(subscription),
                days_remaining: 0,
                is_trial_expired: is_trial,
            },
            needs_expiry_write: false,
        },
        SubscriptionStatus::Active => match subscription.window_end() {
            Some(end) => {
                let days_remaining = days_until(end, now);
                if days_remaining <= 0 {
                    let mut expired = subscription;
                    expired.status = SubscriptionStatus::Expired;
                    Evaluation {
                        status: AccessStatus {
                            has_access: false,
                            subscription: Some(expired),
                            days_remaining: 0,
                            is_trial_expired: is_trial,
                        },
                        needs_expiry_write: true,
                    }
                } else {
                    Evaluation {
                        status: AccessStatus {
                            has_access: true,
                            subscription: Some(subscription),
                            days_remaining,
                            is_trial_expired: false,
                        },
                        needs_expiry_write: false,
                    }
                }
            }
            // Sem janela definida: vale o status
            None => Evaluation {
                status: AccessStatus {
                    has_access: true,
                    subscription: Some(subscription),
                    days_remaining: 0,
                    is_trial_expired: false,
                },
                needs_expiry_write: false,
            },
        },
    }
}

#[derive(Clone)]
pub struct SubscriptionService {
    store: Arc<dyn SubscriptionStore>,
}

impl SubscriptionService {
    pub fn new(store: Arc<dyn SubscriptionStore>) -> Self {
        Self { store }
    }

    /// Verifica se o usuário pode usar o sistema agora.
    /// Qualquer falha de acesso ao banco nega o acesso.
    pub async fn check_access(&self, user_id: Uuid, now: DateTime<Utc>) -> AccessStatus {
        match self.resolve(user_id, now).await {
            Ok(status) => status,
            Err(e) => {
                tracing::error!("🔥 Erro ao verificar assinatura do usuário {}: {}", user_id, e);
                AccessStatus::denied()
            }
        }
    }

    async fn resolve(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<AccessStatus, AppError> {
        let subscription = match self.store.find_by_user(user_id).await? {
            Some(subscription) => subscription,
            None => {
                let trial_end = now + Duration::days(TRIAL_DAYS);
                match self.store.create_trial(user_id, now, trial_end).await {
                    Ok(created) => {
                        tracing::info!("🎁 Trial de {} dias criado para o usuário {}", TRIAL_DAYS, user_id);
                        return Ok(AccessStatus {
                            has_access: true,
                            subscription: Some(created),
                            days_remaining: TRIAL_DAYS,
                            is_trial_expired: false,
                        });
                    }
                    // Outra requisição criou primeiro: avalia o registro dela
                    Err(AppError::SubscriptionAlreadyExists) => {
                        tracing::warn!("Trial do usuário {} criado em paralelo, relendo", user_id);
                        self.store
                            .find_by_user(user_id)
                            .await?
                            .ok_or(AppError::SubscriptionNotFound)?
                    }
                    Err(e) => return Err(e),
                }
            }
        };

        let plan_type = subscription.plan_type;
        let evaluation = evaluate(subscription, now);

        if !evaluation.needs_expiry_write {
            return Ok(evaluation.status);
        }

        if self.store.mark_expired(user_id, plan_type, now).await? {
            tracing::info!("⌛ Assinatura do usuário {} marcada como expirada", user_id);
            return Ok(evaluation.status);
        }

        // O registro mudou depois da leitura (ex.: plano contratado): vale o atual
        tracing::warn!("Assinatura do usuário {} mudou antes de expirar, relendo", user_id);
        let current = self
            .store
            .find_by_user(user_id)
            .await?
            .ok_or(AppError::SubscriptionNotFound)?;
        Ok(evaluate(current, now).status)
    }

    /// Troca para um plano pago. Sobrescreve a janela anterior.
    pub async fn change_plan(
        &self,
        user_id: Uuid,
        plan_type: PlanType,
        payment_link: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Subscription, AppError> {
        if !plan_type.is_paid() {
            return Err(AppError::InvalidPlan);
        }

        let end = plan_type
            .paid_window_end(now)
            .ok_or_else(|| anyhow::anyhow!("Data de término fora do intervalo suportado"))?;

        let subscription = self
            .store
            .upsert_plan(user_id, plan_type, now, end, payment_link)
            .await?;

        tracing::info!("💳 Usuário {} assinou o plano {:?} até {}", user_id, plan_type, end);
        Ok(subscription)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use tokio::sync::Mutex;

    // Store em memória que registra as escritas
    #[derive(Default)]
    struct MemoryStore {
        rows: Mutex<Vec<Subscription>>,
        expired_writes: Mutex<Vec<Uuid>>,
        fail_reads: bool,
        // Simula outra requisição criando o trial entre a leitura e o insert
        concurrent_row: Mutex<Option<Subscription>>,
        // Simula um plano contratado entre a leitura e a expiração
        plan_before_expiry: Mutex<Option<PlanType>>,
    }

    #[async_trait]
    impl SubscriptionStore for MemoryStore {
        async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Subscription>, AppError> {
            if self.fail_reads {
                return Err(AppError::InternalServerError(anyhow::anyhow!("banco fora do ar")));
            }
            Ok(self.rows.lock().await.iter().find(|s| s.user_id == user_id).cloned())
        }

        async fn create_trial(
            &self,
            user_id: Uuid,
            trial_start: DateTime<Utc>,
            trial_end: DateTime<Utc>,
        ) -> Result<Subscription, AppError> {
            if let Some(row) = self.concurrent_row.lock().await.take() {
                self.rows.lock().await.push(row);
                return Err(AppError::SubscriptionAlreadyExists);
            }
            let mut row = record(user_id, PlanType::FreeTrial, SubscriptionStatus::Active, trial_start);
            row.trial_start = Some(trial_start);
            row.trial_end = Some(trial_end);
            self.rows.lock().await.push(row.clone());
            Ok(row)
        }

        async fn mark_expired(
            &self,
            user_id: Uuid,
            plan_type: PlanType,
            now: DateTime<Utc>,
        ) -> Result<bool, AppError> {
            let paid = self.plan_before_expiry.lock().await.take();
            if let Some(paid) = paid {
                let end = paid.paid_window_end(now).unwrap();
                self.upsert_plan(user_id, paid, now, end, None).await?;
            }

            // Mesmas condições do UPDATE no Postgres
            let mut applied = false;
            for row in self.rows.lock().await.iter_mut().filter(|s| {
                s.user_id == user_id
                    && s.status == SubscriptionStatus::Active
                    && s.plan_type == plan_type
                    && s.window_end().is_some_and(|end| end <= now)
            }) {
                row.status = SubscriptionStatus::Expired;
                applied = true;
            }
            if applied {
                self.expired_writes.lock().await.push(user_id);
            }
            Ok(applied)
        }

        async fn upsert_plan(
            &self,
            user_id: Uuid,
            plan_type: PlanType,
            subscription_start: DateTime<Utc>,
            subscription_end: DateTime<Utc>,
            payment_link: Option<&str>,
        ) -> Result<Subscription, AppError> {
            let mut rows = self.rows.lock().await;
            rows.retain(|s| s.user_id != user_id);
            let mut row = record(user_id, plan_type, SubscriptionStatus::Active, subscription_start);
            row.subscription_start = Some(subscription_start);
            row.subscription_end = Some(subscription_end);
            row.payment_link = payment_link.map(str::to_string);
            rows.push(row.clone());
            Ok(row)
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap()
    }

    fn record(user_id: Uuid, plan_type: PlanType, status: SubscriptionStatus, at: DateTime<Utc>) -> Subscription {
        Subscription {
            id: Uuid::new_v4(),
            user_id,
            plan_type,
            status,
            trial_start: None,
            trial_end: None,
            subscription_start: None,
            subscription_end: None,
            payment_link: None,
            created_at: at,
            updated_at: at,
        }
    }

    fn trial_ending(user_id: Uuid, end: DateTime<Utc>) -> Subscription {
        let mut row = record(user_id, PlanType::FreeTrial, SubscriptionStatus::Active, now());
        row.trial_start = Some(end - Duration::days(TRIAL_DAYS));
        row.trial_end = Some(end);
        row
    }

    fn service_with(store: MemoryStore) -> (SubscriptionService, Arc<MemoryStore>) {
        let store = Arc::new(store);
        (SubscriptionService::new(store.clone()), store)
    }

    #[test]
    fn days_until_rounds_up() {
        assert_eq!(days_until(now() + Duration::days(3), now()), 3);
        assert_eq!(days_until(now() + Duration::hours(49), now()), 3);
        assert_eq!(days_until(now() + Duration::minutes(1), now()), 1);
        assert_eq!(days_until(now(), now()), 0);
        assert_eq!(days_until(now() - Duration::hours(30), now()), -1);
    }

    #[tokio::test]
    async fn first_access_creates_a_seven_day_trial() {
        let user = Uuid::new_v4();
        let (service, store) = service_with(MemoryStore::default());

        let status = service.check_access(user, now()).await;

        assert!(status.has_access);
        assert_eq!(status.days_remaining, 7);
        assert!(!status.is_trial_expired);
        let rows = store.rows.lock().await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].trial_end, Some(now() + Duration::days(7)));
    }

    #[tokio::test]
    async fn active_trial_reports_remaining_days() {
        let user = Uuid::new_v4();
        let store = MemoryStore::default();
        store.rows.lock().await.push(trial_ending(user, now() + Duration::days(3)));
        let (service, store) = service_with(store);

        let status = service.check_access(user, now()).await;

        assert!(status.has_access);
        assert_eq!(status.days_remaining, 3);
        assert!(!status.is_trial_expired);
        assert!(store.expired_writes.lock().await.is_empty());
    }

    #[tokio::test]
    async fn elapsed_trial_is_denied_and_marked_expired() {
        let user = Uuid::new_v4();
        let store = MemoryStore::default();
        store.rows.lock().await.push(trial_ending(user, now() - Duration::days(2)));
        let (service, store) = service_with(store);

        let status = service.check_access(user, now()).await;

        assert!(!status.has_access);
        assert!(status.is_trial_expired);
        assert_eq!(status.days_remaining, 0);
        assert_eq!(*store.expired_writes.lock().await, vec![user]);
        assert_eq!(store.rows.lock().await[0].status, SubscriptionStatus::Expired);
    }

    #[tokio::test]
    async fn plan_bought_before_the_expiry_write_stays_active() {
        let user = Uuid::new_v4();
        let store = MemoryStore::default();
        store.rows.lock().await.push(trial_ending(user, now() - Duration::days(1)));
        *store.plan_before_expiry.lock().await = Some(PlanType::Monthly);
        let (service, store) = service_with(store);

        let status = service.check_access(user, now()).await;

        assert!(status.has_access);
        assert_eq!(status.days_remaining, 31);
        assert!(store.expired_writes.lock().await.is_empty());
        let rows = store.rows.lock().await;
        assert_eq!(rows[0].plan_type, PlanType::Monthly);
        assert_eq!(rows[0].status, SubscriptionStatus::Active);
    }

    #[tokio::test]
    async fn already_expired_trial_is_not_rewritten() {
        let user = Uuid::new_v4();
        let store = MemoryStore::default();
        let mut row = trial_ending(user, now() - Duration::days(10));
        row.status = SubscriptionStatus::Expired;
        store.rows.lock().await.push(row);
        let (service, store) = service_with(store);

        let status = service.check_access(user, now()).await;

        assert!(!status.has_access);
        assert!(status.is_trial_expired);
        assert!(store.expired_writes.lock().await.is_empty());
    }

    #[tokio::test]
    async fn paid_plan_grants_access_until_the_end() {
        let user = Uuid::new_v4();
        let (service, _store) = service_with(MemoryStore::default());

        service
            .change_plan(user, PlanType::Monthly, Some("https://pay/abc"), now())
            .await
            .unwrap();
        let status = service.check_access(user, now()).await;

        assert!(status.has_access);
        assert_eq!(status.days_remaining, 31);
        assert!(!status.is_trial_expired);
    }

    #[tokio::test]
    async fn elapsed_paid_plan_is_marked_expired() {
        let user = Uuid::new_v4();
        let store = MemoryStore::default();
        let mut row = record(user, PlanType::Weekly, SubscriptionStatus::Active, now());
        row.subscription_start = Some(now() - Duration::days(8));
        row.subscription_end = Some(now() - Duration::days(1));
        store.rows.lock().await.push(row);
        let (service, store) = service_with(store);

        let status = service.check_access(user, now()).await;

        assert!(!status.has_access);
        assert!(!status.is_trial_expired);
        assert_eq!(*store.expired_writes.lock().await, vec![user]);
    }

    #[tokio::test]
    async fn record_without_window_follows_status() {
        let user = Uuid::new_v4();
        let store = MemoryStore::default();
        store
            .rows
            .lock()
            .await
            .push(record(user, PlanType::Yearly, SubscriptionStatus::Active, now()));
        let (service, _store) = service_with(store);

        let status = service.check_access(user, now()).await;

        assert!(status.has_access);
        assert_eq!(status.days_remaining, 0);
    }

    #[tokio::test]
    async fn cancelled_subscription_is_denied_without_writes() {
        let user = Uuid::new_v4();
        let store = MemoryStore::default();
        let mut row = record(user, PlanType::Monthly, SubscriptionStatus::Cancelled, now());
        row.subscription_end = Some(now() + Duration::days(20));
        store.rows.lock().await.push(row);
        let (service, store) = service_with(store);

        let status = service.check_access(user, now()).await;

        assert!(!status.has_access);
        assert!(store.expired_writes.lock().await.is_empty());
    }

    #[tokio::test]
    async fn store_failure_fails_closed() {
        let (service, _store) = service_with(MemoryStore {
            fail_reads: true,
            ..Default::default()
        });

        let status = service.check_access(Uuid::new_v4(), now()).await;

        assert!(!status.has_access);
        assert!(status.subscription.is_none());
    }

    #[tokio::test]
    async fn creation_race_evaluates_the_existing_record() {
        let user = Uuid::new_v4();
        let store = MemoryStore::default();
        *store.concurrent_row.lock().await = Some(trial_ending(user, now() + Duration::days(5)));
        let (service, _store) = service_with(store);

        let status = service.check_access(user, now()).await;

        assert!(status.has_access);
        assert_eq!(status.days_remaining, 5);
    }

    #[tokio::test]
    async fn change_plan_rejects_free_trial() {
        let (service, _store) = service_with(MemoryStore::default());

        let result = service
            .change_plan(Uuid::new_v4(), PlanType::FreeTrial, None, now())
            .await;

        assert!(matches!(result, Err(AppError::InvalidPlan)));
    }

    #[tokio::test]
    async fn change_plan_overwrites_the_paid_window() {
        let user = Uuid::new_v4();
        let (service, _store) = service_with(MemoryStore::default());

        service.change_plan(user, PlanType::Yearly, None, now()).await.unwrap();
        let later = now() + Duration::days(3);
        let weekly = service
            .change_plan(user, PlanType::Weekly, Some("https://pay/xyz"), later)
            .await
            .unwrap();

        assert_eq!(weekly.plan_type, PlanType::Weekly);
        assert_eq!(weekly.subscription_start, Some(later));
        assert_eq!(weekly.subscription_end, Some(later + Duration::days(7)));
        assert_eq!(weekly.payment_link.as_deref(), Some("https://pay/xyz"));
    }
}
