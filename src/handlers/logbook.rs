// src/handlers/logbook.rs

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
        modules::{ModLogbook, RequireModule},
    },
    models::{
        filters::ListQuery,
        logbook::{LogbookEntry, LogbookPayload},
    },
};

#[utoipa::path(
    get,
    path = "/api/logbook",
    tag = "Logbook",
    params(ListQuery),
    responses((status = 200, description = "Entradas do diário (status=important filtra destaques)", body = Vec<LogbookEntry>)),
    security(("api_jwt" = []))
)]
pub async fn list_entries(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireModule<ModLogbook>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let entries = app_state
        .logbook_service
        .list_entries(&user.scope(), &query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(entries)))
}

#[utoipa::path(
    post,
    path = "/api/logbook",
    tag = "Logbook",
    request_body = LogbookPayload,
    responses((status = 201, description = "Entrada registrada", body = LogbookEntry)),
    security(("api_jwt" = []))
)]
pub async fn create_entry(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequireModule<ModLogbook>,
    Json(payload): Json<LogbookPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let entry = app_state
        .logbook_service
        .create_entry(&user, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(entry)))
}

#[utoipa::path(
    delete,
    path = "/api/logbook/{id}",
    tag = "Logbook",
    params(("id" = Uuid, Path, description = "ID da entrada")),
    responses(
        (status = 204, description = "Entrada removida"),
        (status = 403, description = "Apenas o autor ou um administrador")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_entry(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireModule<ModLogbook>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .logbook_service
        .delete_entry(&user.scope(), id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
