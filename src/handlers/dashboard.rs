// src/handlers/dashboard.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    common::{
        db_utils::begin_user_transaction,
        error::{ApiError, AppError},
    },
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::dashboard::{DashboardReport, FinancialSummary, ReportQuery},
};

// GET /api/dashboard/summary
#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    tag = "Dashboard",
    params(ReportQuery),
    responses(
        (status = 200, description = "Cards do topo: totais e médias do período", body = FinancialSummary),
        (status = 401, description = "Não autorizado"),
        (status = 402, description = "Assinatura expirada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let mut tx = begin_user_transaction(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let summary = app_state
        .dashboard_service
        .summary(&mut *tx, user.0.id, query.period, Utc::now().date_naive())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(summary)))
}

// GET /api/dashboard/report
#[utoipa::path(
    get,
    path = "/api/dashboard/report",
    tag = "Dashboard",
    params(ReportQuery),
    responses(
        (status = 200, description = "Relatório completo: ranking, série mensal e status", body = DashboardReport),
        (status = 400, description = "Parâmetros inválidos"),
        (status = 402, description = "Assinatura expirada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_report(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    query
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let mut tx = begin_user_transaction(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let report = app_state
        .dashboard_service
        .report(&mut *tx, user.0.id, query.period, query.months, Utc::now().date_naive())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(report)))
}
