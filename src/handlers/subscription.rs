// src/handlers/subscription.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::subscription::{plan_catalog, AccessStatus, ChangePlanPayload, PlanOffer, Subscription},
};

// GET /api/plans (público)
#[utoipa::path(
    get,
    path = "/api/plans",
    tag = "Subscription",
    responses(
        (status = 200, description = "Planos disponíveis", body = Vec<PlanOffer>)
    )
)]
pub async fn list_plans() -> Json<Vec<PlanOffer>> {
    Json(plan_catalog())
}

// GET /api/subscription
// Nunca falha: qualquer problema vira "sem acesso"
#[utoipa::path(
    get,
    path = "/api/subscription",
    tag = "Subscription",
    responses(
        (status = 200, description = "Situação de acesso do usuário", body = AccessStatus),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_status(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Json<AccessStatus> {
    let status = app_state
        .subscription_service
        .check_access(user.0.id, Utc::now())
        .await;

    Json(status)
}

// PUT /api/subscription/plan
#[utoipa::path(
    put,
    path = "/api/subscription/plan",
    tag = "Subscription",
    request_body = ChangePlanPayload,
    responses(
        (status = 200, description = "Plano contratado", body = Subscription),
        (status = 400, description = "Plano inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn change_plan(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Json(payload): Json<ChangePlanPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let subscription = app_state
        .subscription_service
        .change_plan(
            user.0.id,
            payload.plan_type,
            payload.payment_link.as_deref(),
            Utc::now(),
        )
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(subscription)))
}
