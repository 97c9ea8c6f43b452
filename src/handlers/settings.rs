// src/handlers/settings.rs

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
        modules::{ModSettings, RequireModule},
    },
    models::{
        auth::RoleInfo,
        hotel::{Hotel, HotelPayload},
        module::ModuleInfo,
        parameter::{Parameter, ParameterPayload, ParameterQuery},
    },
};

// ---
// Hotéis
// ---

// GET /api/hotels (todos os formulários precisam da lista, sem guarda de módulo)
#[utoipa::path(
    get,
    path = "/api/hotels",
    tag = "Settings",
    responses((status = 200, description = "Hotéis acessíveis", body = Vec<Hotel>)),
    security(("api_jwt" = []))
)]
pub async fn list_hotels(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let hotels = app_state
        .settings_service
        .list_hotels(&user.scope())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(hotels)))
}

#[utoipa::path(
    post,
    path = "/api/hotels",
    tag = "Settings",
    request_body = HotelPayload,
    responses(
        (status = 201, description = "Hotel criado", body = Hotel),
        (status = 403, description = "Apenas system_admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_hotel(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireModule<ModSettings>,
    Json(payload): Json<HotelPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let hotel = app_state
        .settings_service
        .create_hotel(&user.scope(), payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(hotel)))
}

#[utoipa::path(
    put,
    path = "/api/hotels/{id}",
    tag = "Settings",
    params(("id" = Uuid, Path, description = "ID do hotel")),
    request_body = HotelPayload,
    responses(
        (status = 200, description = "Hotel atualizado", body = Hotel),
        (status = 403, description = "Sem acesso ao hotel")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_hotel(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireModule<ModSettings>,
    Path(id): Path<Uuid>,
    Json(payload): Json<HotelPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let hotel = app_state
        .settings_service
        .update_hotel(&user.scope(), id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(hotel)))
}

#[utoipa::path(
    delete,
    path = "/api/hotels/{id}",
    tag = "Settings",
    params(("id" = Uuid, Path, description = "ID do hotel")),
    responses(
        (status = 204, description = "Hotel removido"),
        (status = 403, description = "Apenas system_admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_hotel(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireModule<ModSettings>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .settings_service
        .delete_hotel(&user.scope(), id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// ---
// Parâmetros
// ---

#[utoipa::path(
    get,
    path = "/api/parameters",
    tag = "Settings",
    params(ParameterQuery),
    responses((status = 200, description = "Entradas da lista pedida, por posição", body = Vec<Parameter>)),
    security(("api_jwt" = []))
)]
pub async fn list_parameters(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    Query(query): Query<ParameterQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let parameters = app_state
        .settings_service
        .list_parameters(query.kind, query.include_inactive)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(parameters)))
}

#[utoipa::path(
    post,
    path = "/api/parameters",
    tag = "Settings",
    request_body = ParameterPayload,
    responses(
        (status = 201, description = "Parâmetro criado", body = Parameter),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_parameter(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireModule<ModSettings>,
    Json(payload): Json<ParameterPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let parameter = app_state
        .settings_service
        .create_parameter(&user.scope(), payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(parameter)))
}

#[utoipa::path(
    put,
    path = "/api/parameters/{id}",
    tag = "Settings",
    params(("id" = Uuid, Path, description = "ID do parâmetro")),
    request_body = ParameterPayload,
    responses(
        (status = 200, description = "Parâmetro atualizado", body = Parameter),
        (status = 403, description = "Status padrão não pode ser desativado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_parameter(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireModule<ModSettings>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ParameterPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let parameter = app_state
        .settings_service
        .update_parameter(&user.scope(), id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(parameter)))
}

// ---
// Catálogos fixos
// ---

#[utoipa::path(
    get,
    path = "/api/modules",
    tag = "Settings",
    responses((status = 200, description = "Módulos da aplicação", body = Vec<ModuleInfo>)),
    security(("api_jwt" = []))
)]
pub async fn list_modules(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let modules = app_state
        .settings_service
        .list_modules()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(modules)))
}

#[utoipa::path(
    get,
    path = "/api/roles",
    tag = "Settings",
    responses((status = 200, description = "Papéis e suas descrições", body = Vec<RoleInfo>)),
    security(("api_jwt" = []))
)]
pub async fn list_roles(State(app_state): State<AppState>) -> Json<Vec<RoleInfo>> {
    Json(app_state.settings_service.list_roles())
}
