// src/middleware/subscription.rs

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::auth::User,
};

// Roda depois do auth_guard. Sem assinatura válida a resposta é 402.
pub async fn subscription_guard(
    State(app_state): State<AppState>,
    locale: Locale,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(user_id) = request.extensions().get::<User>().map(|u| u.id) else {
        return Err(AppError::InvalidToken.to_api_error(&locale, &app_state.i18n_store));
    };

    let access = app_state
        .subscription_service
        .check_access(user_id, Utc::now())
        .await;

    if !access.has_access {
        tracing::debug!("🔒 Acesso bloqueado para o usuário {} (assinatura)", user_id);
        return Err(AppError::SubscriptionRequired.to_api_error(&locale, &app_state.i18n_store));
    }

    Ok(next.run(request).await)
}
