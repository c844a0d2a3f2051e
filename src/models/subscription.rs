// src/models/subscription.rs

use chrono::{DateTime, Duration, Months, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

pub const TRIAL_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "plan_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PlanType {
    FreeTrial,
    Weekly,
    Monthly,
    Yearly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "subscription_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Expired,
    Cancelled,
}

impl PlanType {
    pub fn is_paid(self) -> bool {
        !matches!(self, PlanType::FreeTrial)
    }

    /// Fim da janela paga contratada em `start`.
    /// Mês e ano são de calendário: 31/01 + 1 mês = último dia de fevereiro.
    pub fn paid_window_end(self, start: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            PlanType::FreeTrial => None,
            PlanType::Weekly => start.checked_add_signed(Duration::days(7)),
            PlanType::Monthly => start.checked_add_months(Months::new(1)),
            PlanType::Yearly => start.checked_add_months(Months::new(12)),
        }
    }

    // Preços da página de planos (R$)
    pub fn price(self) -> Decimal {
        match self {
            PlanType::FreeTrial => Decimal::ZERO,
            PlanType::Weekly => Decimal::new(999, 2),
            PlanType::Monthly => Decimal::new(1999, 2),
            PlanType::Yearly => Decimal::new(7999, 2),
        }
    }
}

// Uma linha por usuário
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: Uuid,
    #[schema(ignore)]
    pub user_id: Uuid,
    pub plan_type: PlanType,
    pub status: SubscriptionStatus,

    // Janela do trial (só para free_trial)
    pub trial_start: Option<DateTime<Utc>>,
    pub trial_end: Option<DateTime<Utc>>,

    // Janela paga
    pub subscription_start: Option<DateTime<Utc>>,
    pub subscription_end: Option<DateTime<Utc>>,

    pub payment_link: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    /// Fim da janela que governa o acesso, conforme o tipo de plano.
    pub fn window_end(&self) -> Option<DateTime<Utc>> {
        if self.plan_type.is_paid() {
            self.subscription_end
        } else {
            self.trial_end
        }
    }
}

// Resultado da verificação de acesso
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccessStatus {
    pub has_access: bool,
    pub subscription: Option<Subscription>,
    #[schema(example = 3)]
    pub days_remaining: i64,
    pub is_trial_expired: bool,
}

impl AccessStatus {
    // Resposta segura para qualquer falha
    pub fn denied() -> Self {
        Self {
            has_access: false,
            subscription: None,
            days_remaining: 0,
            is_trial_expired: false,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePlanPayload {
    #[schema(example = "monthly")]
    pub plan_type: PlanType,
    #[schema(example = "https://pagamento.exemplo.com/checkout/abc123")]
    pub payment_link: Option<String>,
}

// Item do catálogo de planos
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanOffer {
    pub plan_type: PlanType,
    #[schema(example = "Mensal")]
    pub name: String,
    #[schema(example = "19.99")]
    pub price: Decimal,
    #[schema(example = "mês")]
    pub period: String,
    pub popular: bool,
}

pub fn plan_catalog() -> Vec<PlanOffer> {
    vec![
        PlanOffer {
            plan_type: PlanType::Weekly,
            name: "Semanal".to_string(),
            price: PlanType::Weekly.price(),
            period: "semana".to_string(),
            popular: false,
        },
        PlanOffer {
            plan_type: PlanType::Monthly,
            name: "Mensal".to_string(),
            price: PlanType::Monthly.price(),
            period: "mês".to_string(),
            popular: true,
        },
        PlanOffer {
            plan_type: PlanType::Yearly,
            name: "Anual".to_string(),
            price: PlanType::Yearly.price(),
            period: "ano".to_string(),
            popular: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 10, 30, 0).unwrap()
    }

    #[test]
    fn monthly_adds_one_calendar_month() {
        assert_eq!(PlanType::Monthly.paid_window_end(at(2025, 3, 15)), Some(at(2025, 4, 15)));
        // Fevereiro mais curto: trava no último dia
        assert_eq!(PlanType::Monthly.paid_window_end(at(2025, 1, 31)), Some(at(2025, 2, 28)));
        assert_eq!(PlanType::Monthly.paid_window_end(at(2024, 1, 31)), Some(at(2024, 2, 29)));
    }

    #[test]
    fn yearly_and_weekly_windows() {
        assert_eq!(PlanType::Yearly.paid_window_end(at(2024, 2, 29)), Some(at(2025, 2, 28)));
        assert_eq!(PlanType::Weekly.paid_window_end(at(2025, 12, 29)), Some(at(2026, 1, 5)));
        assert_eq!(PlanType::FreeTrial.paid_window_end(at(2025, 1, 1)), None);
    }

    #[test]
    fn catalog_lists_only_paid_plans() {
        let catalog = plan_catalog();
        assert_eq!(catalog.len(), 3);
        assert!(catalog.iter().all(|p| p.plan_type.is_paid()));
        assert_eq!(catalog[1].price.to_string(), "19.99");
    }
}
