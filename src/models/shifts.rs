// src/models/shifts.rs

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::{
    error::AppError,
    formats::{deserialize_amount, hour_minute, RawAmount},
};

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending, // Pendente
    Paid,    // Pago
    Overdue, // Atrasado
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_method", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Pix,
    BankTransfer,
    Cash,
    Card,
}

// --- Structs ---

// Um plantão trabalhado
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    #[schema(ignore)]
    pub user_id: Uuid,

    // Pode apontar para uma instituição já excluída
    pub institution_id: Option<Uuid>,

    #[schema(value_type = String, format = Date, example = "2025-01-28")]
    pub date: NaiveDate,

    #[serde(with = "hour_minute")]
    #[schema(value_type = String, example = "19:00")]
    pub start_time: NaiveTime,
    #[serde(with = "hour_minute")]
    #[schema(value_type = String, example = "07:00")]
    pub end_time: NaiveTime,

    #[serde(deserialize_with = "deserialize_amount")]
    #[schema(example = "3200.00")]
    pub amount: Decimal,

    pub payment_status: PaymentStatus,
    pub payment_method: Option<PaymentMethod>,
    #[schema(value_type = Option<String>, format = Date, example = "2025-02-10")]
    pub payment_date: Option<NaiveDate>,
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Plantão com o nome/cor da instituição já resolvidos (join explícito)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShiftView {
    #[serde(flatten)]
    pub shift: Shift,
    #[schema(example = "Hospital Santa Casa")]
    pub institution_name: Option<String>,
    #[schema(example = "#3B82F6")]
    pub institution_color: Option<String>,
}

// Dados de um plantão já convertidos e prontos para gravar
#[derive(Debug, Clone, PartialEq)]
pub struct NewShift {
    pub institution_id: Option<Uuid>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub amount: Decimal,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<PaymentMethod>,
    pub payment_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl From<&Shift> for NewShift {
    fn from(shift: &Shift) -> Self {
        Self {
            institution_id: shift.institution_id,
            date: shift.date,
            start_time: shift.start_time,
            end_time: shift.end_time,
            amount: shift.amount,
            payment_status: shift.payment_status,
            payment_method: shift.payment_method,
            payment_date: shift.payment_date,
            notes: shift.notes.clone(),
        }
    }
}

// --- Repetição ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RepeatRule {
    None,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
    Weekends, // Alterna sábado e domingo
    Weekdays, // Segunda a sexta
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RepeatPayload {
    pub rule: RepeatRule,
    #[validate(range(min = 1, max = 104, message = "invalid_repeat_count"))]
    #[schema(example = 4)]
    pub count: u32,
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShiftPayload {
    pub institution_id: Option<Uuid>,

    #[schema(value_type = String, format = Date, example = "2025-01-28")]
    pub date: NaiveDate,

    #[serde(with = "hour_minute")]
    #[schema(value_type = String, example = "08:00")]
    pub start_time: NaiveTime,
    #[serde(with = "hour_minute")]
    #[schema(value_type = String, example = "20:00")]
    pub end_time: NaiveTime,

    // Número ou texto; convertido em `to_new_shift`
    #[schema(value_type = String, example = "2400.00")]
    pub amount: RawAmount,

    #[serde(default)]
    pub payment_status: PaymentStatus,
    pub payment_method: Option<PaymentMethod>,
    #[schema(value_type = Option<String>, format = Date)]
    pub payment_date: Option<NaiveDate>,
    pub notes: Option<String>,

    // Só é considerado na criação
    #[validate(nested)]
    pub repeat: Option<RepeatPayload>,
}

impl ShiftPayload {
    /// Converte o valor monetário e monta o registro a gravar.
    pub fn to_new_shift(&self) -> Result<NewShift, AppError> {
        Ok(NewShift {
            institution_id: self.institution_id,
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            amount: self.amount.to_decimal()?,
            payment_status: self.payment_status,
            payment_method: self.payment_method,
            payment_date: self.payment_date,
            notes: self.notes.clone(),
        })
    }
}

// Filtros da listagem
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ShiftFilter {
    /// pending, paid ou overdue
    pub status: Option<PaymentStatus>,
    /// Busca no nome da instituição ou nas observações
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_accepts_amount_as_text_or_number() {
        let as_text: ShiftPayload = serde_json::from_value(json!({
            "date": "2025-01-28",
            "startTime": "19:00",
            "endTime": "07:00",
            "amount": "1800,50"
        }))
        .unwrap();
        let as_number: ShiftPayload = serde_json::from_value(json!({
            "date": "2025-01-28",
            "startTime": "19:00",
            "endTime": "07:00",
            "amount": 1800.5
        }))
        .unwrap();

        let a = as_text.to_new_shift().unwrap();
        let b = as_number.to_new_shift().unwrap();
        assert_eq!(a.amount, Decimal::new(18005, 1));
        assert_eq!(a, b);
        assert_eq!(a.payment_status, PaymentStatus::Pending);
    }

    #[test]
    fn negative_amount_is_rejected() {
        let payload: ShiftPayload = serde_json::from_value(json!({
            "date": "2025-01-28",
            "startTime": "08:00",
            "endTime": "20:00",
            "amount": "-10"
        }))
        .unwrap();

        assert!(matches!(payload.to_new_shift(), Err(AppError::InvalidAmount(_))));
    }

    #[test]
    fn repeat_count_is_validated() {
        let payload: ShiftPayload = serde_json::from_value(json!({
            "date": "2025-01-28",
            "startTime": "08:00",
            "endTime": "20:00",
            "amount": 100,
            "repeat": { "rule": "weekends", "count": 0 }
        }))
        .unwrap();

        assert!(payload.validate().is_err());
    }
}
