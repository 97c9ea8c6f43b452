// src/handlers/checklists.rs

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
        modules::{ModChecklists, RequireModule},
    },
    models::checklist::{
        ChecklistDayQuery, ChecklistItem, ChecklistMission, DuplicateDayPayload, GenerateItemsPayload,
        MissionPayload, ToggleItemPayload,
    },
};

// ---
// Missões
// ---

#[utoipa::path(
    get,
    path = "/api/checklists/missions",
    tag = "Checklists",
    responses((status = 200, description = "Missões dos hotéis acessíveis", body = Vec<ChecklistMission>)),
    security(("api_jwt" = []))
)]
pub async fn list_missions(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireModule<ModChecklists>,
) -> Result<impl IntoResponse, ApiError> {
    let missions = app_state
        .checklist_service
        .list_missions(&user.scope())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(missions)))
}

#[utoipa::path(
    post,
    path = "/api/checklists/missions",
    tag = "Checklists",
    request_body = MissionPayload,
    responses(
        (status = 201, description = "Missão criada", body = ChecklistMission),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_mission(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireModule<ModChecklists>,
    Json(payload): Json<MissionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let mission = app_state
        .checklist_service
        .create_mission(&user.scope(), payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(mission)))
}

#[utoipa::path(
    put,
    path = "/api/checklists/missions/{id}",
    tag = "Checklists",
    params(("id" = Uuid, Path, description = "ID da missão")),
    request_body = MissionPayload,
    responses((status = 200, description = "Missão atualizada", body = ChecklistMission)),
    security(("api_jwt" = []))
)]
pub async fn update_mission(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireModule<ModChecklists>,
    Path(id): Path<Uuid>,
    Json(payload): Json<MissionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let mission = app_state
        .checklist_service
        .update_mission(&user.scope(), id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(mission)))
}

#[utoipa::path(
    delete,
    path = "/api/checklists/missions/{id}",
    tag = "Checklists",
    params(("id" = Uuid, Path, description = "ID da missão")),
    responses((status = 204, description = "Missão removida (itens gerados permanecem)")),
    security(("api_jwt" = []))
)]
pub async fn delete_mission(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireModule<ModChecklists>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .checklist_service
        .delete_mission(&user.scope(), id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// ---
// Itens do dia
// ---

#[utoipa::path(
    get,
    path = "/api/checklists/items",
    tag = "Checklists",
    params(ChecklistDayQuery),
    responses((status = 200, description = "Itens do hotel na data", body = Vec<ChecklistItem>)),
    security(("api_jwt" = []))
)]
pub async fn list_day_items(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireModule<ModChecklists>,
    Query(query): Query<ChecklistDayQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let items = app_state
        .checklist_service
        .list_day(&user.scope(), query.hotel_id, query.date)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(items)))
}

#[utoipa::path(
    post,
    path = "/api/checklists/generate",
    tag = "Checklists",
    request_body = GenerateItemsPayload,
    responses((status = 201, description = "Itens gerados a partir das missões", body = Vec<ChecklistItem>)),
    security(("api_jwt" = []))
)]
pub async fn generate_items(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireModule<ModChecklists>,
    Json(payload): Json<GenerateItemsPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let items = app_state
        .checklist_service
        .generate_from_missions(&user.scope(), payload.hotel_id, payload.date)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(items)))
}

#[utoipa::path(
    put,
    path = "/api/checklists/items/{id}/toggle",
    tag = "Checklists",
    params(("id" = Uuid, Path, description = "ID do item")),
    request_body = ToggleItemPayload,
    responses((status = 200, description = "Item marcado ou desmarcado", body = ChecklistItem)),
    security(("api_jwt" = []))
)]
pub async fn toggle_item(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireModule<ModChecklists>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ToggleItemPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let item = app_state
        .checklist_service
        .toggle_item(&user.scope(), id, payload.completed)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(item)))
}

#[utoipa::path(
    post,
    path = "/api/checklists/duplicate",
    tag = "Checklists",
    request_body = DuplicateDayPayload,
    responses(
        (status = 201, description = "Dia copiado, itens desmarcados", body = Vec<ChecklistItem>),
        (status = 409, description = "Dia de origem vazio ou incompleto"),
        (status = 422, description = "Data de destino não é posterior")
    ),
    security(("api_jwt" = []))
)]
pub async fn duplicate_day(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireModule<ModChecklists>,
    Json(payload): Json<DuplicateDayPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let items = app_state
        .checklist_service
        .duplicate_to_next_day(&user.scope(), payload.hotel_id, payload.from_date, payload.to_date)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(items)))
}
