// src/common/error.rs

use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::{common::i18n::I18nStore, middleware::i18n::Locale};

// Erro interno da aplicação. Nunca vai direto para o cliente:
// passa antes por `to_api_error`, que traduz a mensagem.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Valor inválido: {0}")]
    InvalidAmount(String),

    #[error("Plano inválido para troca")]
    InvalidPlan,

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Plantão não encontrado")]
    ShiftNotFound,

    #[error("Instituição não encontrada")]
    InstitutionNotFound,

    // Corrida na criação do trial: outra requisição criou o registro antes.
    #[error("Assinatura já existe para o usuário")]
    SubscriptionAlreadyExists,

    #[error("Assinatura não encontrada")]
    SubscriptionNotFound,

    #[error("Acesso exige assinatura ativa")]
    SubscriptionRequired,

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

// O erro que sai na resposta HTTP
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl AppError {
    /// Status HTTP e chave de tradução de cada variante.
    pub fn status_and_key(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::ValidationError(_) => (StatusCode::BAD_REQUEST, "validation_failed"),
            AppError::InvalidAmount(_) => (StatusCode::BAD_REQUEST, "invalid_amount"),
            AppError::InvalidPlan => (StatusCode::BAD_REQUEST, "invalid_plan"),
            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "email_exists"),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "invalid_credentials"),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid_token"),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "user_not_found"),
            AppError::ShiftNotFound => (StatusCode::NOT_FOUND, "shift_not_found"),
            AppError::InstitutionNotFound => (StatusCode::NOT_FOUND, "institution_not_found"),
            AppError::SubscriptionRequired => (StatusCode::PAYMENT_REQUIRED, "subscription_required"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }

    pub fn to_api_error(self, locale: &Locale, store: &I18nStore) -> ApiError {
        let (status, key) = self.status_and_key();
        let lang = locale.0.as_str();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            // O detalhe fica só no log
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        let details = match &self {
            AppError::ValidationError(errors) => {
                let mut details: HashMap<String, Vec<String>> = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages = field_errors
                        .iter()
                        .map(|e| match &e.message {
                            Some(message) => store.translate(lang, message),
                            None => store.translate(lang, &e.code),
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                Some(json!(details))
            }
            _ => None,
        };

        ApiError {
            status,
            error: store.translate(lang, key),
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Payload {
        #[validate(length(min = 1, message = "required"))]
        name: String,
    }

    #[test]
    fn validation_errors_are_translated_per_field() {
        let store = I18nStore::load().unwrap();
        let errors = Payload { name: String::new() }.validate().unwrap_err();

        let api = AppError::ValidationError(errors).to_api_error(&Locale("pt".into()), &store);

        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.error, "Um ou mais campos são inválidos.");
        let details = api.details.unwrap();
        assert_eq!(details["name"][0], "Campo obrigatório.");
    }

    #[test]
    fn subscription_required_maps_to_payment_required() {
        let store = I18nStore::load().unwrap();
        let api = AppError::SubscriptionRequired.to_api_error(&Locale("en".into()), &store);

        assert_eq!(api.status, StatusCode::PAYMENT_REQUIRED);
        assert!(api.error.starts_with("Your access period has ended"));
        assert!(api.details.is_none());
    }

    #[test]
    fn internal_errors_hide_the_cause() {
        let store = I18nStore::load().unwrap();
        let err = AppError::InternalServerError(anyhow::anyhow!("conexão recusada"));
        let api = err.to_api_error(&Locale("pt".into()), &store);

        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.error, "Ocorreu um erro inesperado.");
    }
}
