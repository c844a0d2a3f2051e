// src/handlers/shifts.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        db_utils::begin_user_transaction,
        error::{ApiError, AppError},
    },
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::shifts::{Shift, ShiftFilter, ShiftPayload, ShiftView},
};

// GET /api/shifts
#[utoipa::path(
    get,
    path = "/api/shifts",
    tag = "Shifts",
    params(ShiftFilter),
    responses(
        (status = 200, description = "Plantões com a instituição resolvida", body = Vec<ShiftView>),
        (status = 402, description = "Assinatura expirada")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_shifts(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Query(filter): Query<ShiftFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let mut tx = begin_user_transaction(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let shifts = app_state
        .shift_service
        .list(&mut *tx, user.0.id, &filter)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(shifts)))
}

// POST /api/shifts
#[utoipa::path(
    post,
    path = "/api/shifts",
    tag = "Shifts",
    request_body = ShiftPayload,
    responses(
        (status = 201, description = "Plantão (ou série repetida) criado", body = Vec<Shift>),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Instituição não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_shift(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Json(payload): Json<ShiftPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let mut tx = begin_user_transaction(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    // Se qualquer inserção falhar, o drop do tx desfaz a série inteira
    let created = app_state
        .shift_service
        .create(&mut *tx, user.0.id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(created)))
}

// PUT /api/shifts/{id}
#[utoipa::path(
    put,
    path = "/api/shifts/{id}",
    tag = "Shifts",
    request_body = ShiftPayload,
    params(("id" = Uuid, Path, description = "ID do plantão")),
    responses(
        (status = 200, description = "Plantão atualizado", body = Shift),
        (status = 404, description = "Plantão não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_shift(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ShiftPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let mut tx = begin_user_transaction(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let shift = app_state
        .shift_service
        .update(&mut *tx, user.0.id, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(shift)))
}

// DELETE /api/shifts/{id}
#[utoipa::path(
    delete,
    path = "/api/shifts/{id}",
    tag = "Shifts",
    params(("id" = Uuid, Path, description = "ID do plantão")),
    responses(
        (status = 204, description = "Plantão removido"),
        (status = 404, description = "Plantão não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_shift(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut tx = begin_user_transaction(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .shift_service
        .delete(&mut *tx, user.0.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// POST /api/shifts/{id}/duplicate
#[utoipa::path(
    post,
    path = "/api/shifts/{id}/duplicate",
    tag = "Shifts",
    params(("id" = Uuid, Path, description = "ID do plantão a copiar")),
    responses(
        (status = 201, description = "Cópia criada", body = Shift),
        (status = 404, description = "Plantão não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn duplicate_shift(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut tx = begin_user_transaction(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let copy = app_state
        .shift_service
        .duplicate(&mut *tx, user.0.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(copy)))
}
