// src/handlers/lost_items.rs

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
        modules::{ModLostFound, RequireModule},
    },
    models::{
        filters::ListQuery,
        lost_item::{LostItem, LostItemDetail, LostItemPayload},
    },
};

#[utoipa::path(
    get,
    path = "/api/lost-items",
    tag = "Lost & Found",
    params(ListQuery),
    responses((status = 200, description = "Objetos filtrados", body = Vec<LostItem>)),
    security(("api_jwt" = []))
)]
pub async fn list_lost_items(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireModule<ModLostFound>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let items = app_state
        .lost_item_service
        .list_items(&user.scope(), &query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(items)))
}

#[utoipa::path(
    post,
    path = "/api/lost-items",
    tag = "Lost & Found",
    request_body = LostItemPayload,
    responses(
        (status = 201, description = "Objeto registrado", body = LostItem),
        (status = 422, description = "Devolução sem responsável")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_lost_item(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireModule<ModLostFound>,
    Json(payload): Json<LostItemPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let item = app_state
        .lost_item_service
        .create_item(&user.scope(), payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(item)))
}

#[utoipa::path(
    get,
    path = "/api/lost-items/{id}",
    tag = "Lost & Found",
    params(("id" = Uuid, Path, description = "ID do objeto")),
    responses((status = 200, description = "Objeto com URL temporária da foto", body = LostItemDetail)),
    security(("api_jwt" = []))
)]
pub async fn get_lost_item(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireModule<ModLostFound>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = app_state
        .lost_item_service
        .get_item(&user.scope(), id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(detail)))
}

#[utoipa::path(
    put,
    path = "/api/lost-items/{id}",
    tag = "Lost & Found",
    params(("id" = Uuid, Path, description = "ID do objeto")),
    request_body = LostItemPayload,
    responses((status = 200, description = "Objeto atualizado", body = LostItem)),
    security(("api_jwt" = []))
)]
pub async fn update_lost_item(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireModule<ModLostFound>,
    Path(id): Path<Uuid>,
    Json(payload): Json<LostItemPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let item = app_state
        .lost_item_service
        .update_item(&user.scope(), id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(item)))
}

#[utoipa::path(
    delete,
    path = "/api/lost-items/{id}",
    tag = "Lost & Found",
    params(("id" = Uuid, Path, description = "ID do objeto")),
    responses((status = 204, description = "Objeto removido")),
    security(("api_jwt" = []))
)]
pub async fn delete_lost_item(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireModule<ModLostFound>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .lost_item_service
        .delete_item(&user.scope(), id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/lost-items/{id}/photo",
    tag = "Lost & Found",
    params(("id" = Uuid, Path, description = "ID do objeto")),
    request_body(content_type = "multipart/form-data", description = "Campo `file`"),
    responses((status = 200, description = "Foto substituída", body = LostItemDetail)),
    security(("api_jwt" = []))
)]
pub async fn upload_photo(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireModule<ModLostFound>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let (filename, bytes) = read_upload(&mut multipart)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let detail = app_state
        .lost_item_service
        .set_photo(&user.scope(), id, &filename, &bytes)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(detail)))
}
