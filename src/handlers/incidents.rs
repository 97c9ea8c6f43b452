// src/handlers/incidents.rs

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    handlers::files::read_upload,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        modules::{ModIncidents, RequireModule},
    },
    models::{
        filters::ListQuery,
        incident::{AttachmentLink, Incident, IncidentPayload},
    },
};

#[utoipa::path(
    get,
    path = "/api/incidents",
    tag = "Incidents",
    params(ListQuery),
    responses(
        (status = 200, description = "Incidentes filtrados (sem status = em andamento)", body = Vec<Incident>),
        (status = 403, description = "Sem acesso ao hotel ou ao módulo")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_incidents(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireModule<ModIncidents>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let incidents = app_state
        .incident_service
        .list_incidents(&user.scope(), &query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(incidents)))
}

#[utoipa::path(
    post,
    path = "/api/incidents",
    tag = "Incidents",
    request_body = IncidentPayload,
    responses(
        (status = 201, description = "Incidente criado", body = Incident),
        (status = 422, description = "Dados inválidos ou encerramento incompleto")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_incident(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireModule<ModIncidents>,
    Json(payload): Json<IncidentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let incident = app_state
        .incident_service
        .create_incident(&user.scope(), payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(incident)))
}

#[utoipa::path(
    get,
    path = "/api/incidents/{id}",
    tag = "Incidents",
    params(("id" = Uuid, Path, description = "ID do incidente")),
    responses(
        (status = 200, description = "Incidente", body = Incident),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_incident(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireModule<ModIncidents>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let incident = app_state
        .incident_service
        .get_incident(&user.scope(), id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(incident)))
}

#[utoipa::path(
    put,
    path = "/api/incidents/{id}",
    tag = "Incidents",
    params(("id" = Uuid, Path, description = "ID do incidente")),
    request_body = IncidentPayload,
    responses(
        (status = 200, description = "Incidente atualizado", body = Incident),
        (status = 422, description = "Encerramento sem os dados da resolução")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_incident(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireModule<ModIncidents>,
    Path(id): Path<Uuid>,
    Json(payload): Json<IncidentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let incident = app_state
        .incident_service
        .update_incident(&user.scope(), id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(incident)))
}

#[utoipa::path(
    delete,
    path = "/api/incidents/{id}",
    tag = "Incidents",
    params(("id" = Uuid, Path, description = "ID do incidente")),
    responses((status = 204, description = "Incidente removido")),
    security(("api_jwt" = []))
)]
pub async fn delete_incident(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireModule<ModIncidents>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .incident_service
        .delete_incident(&user.scope(), id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// POST /api/incidents/{id}/attachments (multipart, campo `file`)
#[utoipa::path(
    post,
    path = "/api/incidents/{id}/attachments",
    tag = "Incidents",
    params(("id" = Uuid, Path, description = "ID do incidente")),
    request_body(content_type = "multipart/form-data", description = "Campo `file`"),
    responses(
        (status = 201, description = "Anexo adicionado", body = Incident),
        (status = 422, description = "Arquivo ausente")
    ),
    security(("api_jwt" = []))
)]
pub async fn upload_attachment(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireModule<ModIncidents>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let (filename, bytes) = read_upload(&mut multipart)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let incident = app_state
        .incident_service
        .add_attachment(&user.scope(), id, &filename, &bytes)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(incident)))
}

#[utoipa::path(
    get,
    path = "/api/incidents/{id}/attachments",
    tag = "Incidents",
    params(("id" = Uuid, Path, description = "ID do incidente")),
    responses((status = 200, description = "URLs assinadas dos anexos", body = Vec<AttachmentLink>)),
    security(("api_jwt" = []))
)]
pub async fn list_attachments(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireModule<ModIncidents>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let links = app_state
        .incident_service
        .attachment_links(&user.scope(), id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(links)))
}
