// src/handlers/technicians.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        modules::{ModMaintenance, RequireModule},
    },
    models::{
        filters::ListQuery,
        technician::{Technician, TechnicianPayload},
    },
};

#[utoipa::path(
    get,
    path = "/api/technicians",
    tag = "Maintenance",
    params(ListQuery),
    responses((status = 200, description = "Técnicos filtrados", body = Vec<Technician>)),
    security(("api_jwt" = []))
)]
pub async fn list_technicians(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireModule<ModMaintenance>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let technicians = app_state
        .technician_service
        .list_technicians(&user.scope(), &query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(technicians)))
}

#[utoipa::path(
    post,
    path = "/api/technicians",
    tag = "Maintenance",
    request_body = TechnicianPayload,
    responses((status = 201, description = "Técnico cadastrado", body = Technician)),
    security(("api_jwt" = []))
)]
pub async fn create_technician(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireModule<ModMaintenance>,
    Json(payload): Json<TechnicianPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let technician = app_state
        .technician_service
        .create_technician(&user.scope(), payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(technician)))
}

#[utoipa::path(
    get,
    path = "/api/technicians/{id}",
    tag = "Maintenance",
    params(("id" = Uuid, Path, description = "ID do técnico")),
    responses((status = 200, description = "Técnico", body = Technician)),
    security(("api_jwt" = []))
)]
pub async fn get_technician(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireModule<ModMaintenance>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let technician = app_state
        .technician_service
        .get_technician(&user.scope(), id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(technician)))
}

#[utoipa::path(
    put,
    path = "/api/technicians/{id}",
    tag = "Maintenance",
    params(("id" = Uuid, Path, description = "ID do técnico")),
    request_body = TechnicianPayload,
    responses((status = 200, description = "Técnico atualizado", body = Technician)),
    security(("api_jwt" = []))
)]
pub async fn update_technician(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireModule<ModMaintenance>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TechnicianPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let technician = app_state
        .technician_service
        .update_technician(&user.scope(), id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(technician)))
}

#[utoipa::path(
    delete,
    path = "/api/technicians/{id}",
    tag = "Maintenance",
    params(("id" = Uuid, Path, description = "ID do técnico")),
    responses((status = 204, description = "Técnico removido")),
    security(("api_jwt" = []))
)]
pub async fn delete_technician(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireModule<ModMaintenance>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .technician_service
        .delete_technician(&user.scope(), id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
