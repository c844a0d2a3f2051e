// src/models/institutions.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

pub const DEFAULT_COLOR: &str = "#3B82F6";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Institution {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    #[schema(ignore)]
    pub user_id: Uuid,

    #[schema(example = "Hospital Santa Casa")]
    pub name: String,
    #[schema(example = "Rua das Flores, 123 - Centro")]
    pub address: Option<String>,
    #[schema(example = "(11) 99999-8888")]
    pub phone: Option<String>,
    #[schema(example = "escala@santacasa.org.br")]
    pub email: Option<String>,
    pub notes: Option<String>,

    // Cor de identificação nos gráficos
    #[schema(example = "#3B82F6")]
    pub color: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Usado tanto na criação quanto na edição
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InstitutionPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Hospital Santa Casa")]
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,
    pub notes: Option<String>,
    #[schema(example = "#10B981")]
    pub color: Option<String>,
}

impl InstitutionPayload {
    pub fn color_or_default(&self) -> &str {
        self.color
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(DEFAULT_COLOR)
    }
}
