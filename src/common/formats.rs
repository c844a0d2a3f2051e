// src/common/formats.rs
//
// Conversões na fronteira da API: valores monetários e horários.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

use crate::common::error::AppError;

// O front-end manda `valor` às vezes como número, às vezes como texto.
// Tudo passa por aqui antes de virar Decimal.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Number(serde_json::Number),
    Text(String),
}

impl RawAmount {
    pub fn to_decimal(&self) -> Result<Decimal, AppError> {
        match self {
            RawAmount::Number(n) => parse_amount(&n.to_string()),
            RawAmount::Text(s) => parse_amount(s),
        }
    }
}

/// Converte o texto em Decimal não negativo.
/// Aceita vírgula como separador decimal ("2400,50") quando não há ponto.
pub fn parse_amount(raw: &str) -> Result<Decimal, AppError> {
    let trimmed = raw.trim();
    let normalized = if trimmed.contains(',') && !trimmed.contains('.') {
        trimmed.replace(',', ".")
    } else {
        trimmed.to_string()
    };

    let value = Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .map_err(|_| AppError::InvalidAmount(raw.to_string()))?;

    if value.is_sign_negative() && !value.is_zero() {
        return Err(AppError::InvalidAmount(raw.to_string()));
    }

    // Cabe em NUMERIC(12, 2): até centavos e abaixo de 10 bilhões
    let value = value.normalize();
    if value.scale() > MAX_SCALE || value > max_amount() {
        return Err(AppError::InvalidAmount(raw.to_string()));
    }

    Ok(value)
}

const MAX_SCALE: u32 = 2;

fn max_amount() -> Decimal {
    Decimal::new(999_999_999_999, 2)
}

/// `deserialize_with` para campos `amount` vindos de JSON.
pub fn deserialize_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = RawAmount::deserialize(deserializer)?;
    raw.to_decimal().map_err(serde::de::Error::custom)
}

// Horários trafegam como "HH:MM" (o banco guarda TIME)
pub mod hour_minute {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub fn parse(raw: &str) -> Result<NaiveTime, String> {
        NaiveTime::parse_from_str(raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
            .map_err(|_| format!("horário inválido '{}', use HH:MM", raw))
    }
}
