// src/handlers/institutions.rs

use axum::{
    extract::{Path, State},
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
    models::institutions::{Institution, InstitutionPayload},
};

// GET /api/institutions
#[utoipa::path(
    get,
    path = "/api/institutions",
    tag = "Institutions",
    responses(
        (status = 200, description = "Instituições do usuário", body = Vec<Institution>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_institutions(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let mut tx = begin_user_transaction(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let institutions = app_state
        .institution_service
        .list(&mut *tx, user.0.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(institutions)))
}

// POST /api/institutions
#[utoipa::path(
    post,
    path = "/api/institutions",
    tag = "Institutions",
    request_body = InstitutionPayload,
    responses(
        (status = 201, description = "Instituição cadastrada", body = Institution),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_institution(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Json(payload): Json<InstitutionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let mut tx = begin_user_transaction(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let institution = app_state
        .institution_service
        .create(&mut *tx, user.0.id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(institution)))
}

// PUT /api/institutions/{id}
#[utoipa::path(
    put,
    path = "/api/institutions/{id}",
    tag = "Institutions",
    request_body = InstitutionPayload,
    params(("id" = Uuid, Path, description = "ID da instituição")),
    responses(
        (status = 200, description = "Instituição atualizada", body = Institution),
        (status = 404, description = "Instituição não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_institution(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<InstitutionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let mut tx = begin_user_transaction(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let institution = app_state
        .institution_service
        .update(&mut *tx, user.0.id, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(institution)))
}

// DELETE /api/institutions/{id}
#[utoipa::path(
    delete,
    path = "/api/institutions/{id}",
    tag = "Institutions",
    params(("id" = Uuid, Path, description = "ID da instituição")),
    responses(
        (status = 204, description = "Instituição removida (plantões ligados são mantidos)"),
        (status = 404, description = "Instituição não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_institution(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut tx = begin_user_transaction(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .institution_service
        .delete(&mut *tx, user.0.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
