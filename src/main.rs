//src/main.rs

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::{AppState, Config};
use crate::docs::ApiDoc;
use crate::middleware::auth::auth_guard;

// Limite dos uploads (anexos e fotos)
const UPLOAD_LIMIT_BYTES: usize = 20 * 1024 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;
    let app_state = AppState::new(config).await?;

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .context("Falha ao rodar as migrações do banco de dados")?;

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    if let Some((email, password)) = app_state.config.bootstrap_admin.clone() {
        app_state.user_service.bootstrap_admin(&email, &password).await?;
    }

    // --- Rotas públicas ---
    let public_routes = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/files", get(handlers::files::download_file));

    // --- Uploads (multipart, limite maior) ---
    let upload_routes = Router::new()
        .route("/api/incidents/{id}/attachments", post(handlers::incidents::upload_attachment))
        .route("/api/lost-items/{id}/photo", post(handlers::lost_items::upload_photo))
        .layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES));

    // --- Rotas protegidas ---
    let protected_routes = Router::new()
        // Usuários
        .route(
            "/api/users/me",
            get(handlers::auth::get_me).put(handlers::auth::update_my_profile),
        )
        .route(
            "/api/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/api/users/{id}",
            put(handlers::users::update_profile).delete(handlers::users::delete_user),
        )
        .route("/api/users/{id}/access", put(handlers::users::update_access))
        .route("/api/users/{id}/active", put(handlers::users::set_active))
        // Configurações
        .route(
            "/api/hotels",
            get(handlers::settings::list_hotels).post(handlers::settings::create_hotel),
        )
        .route(
            "/api/hotels/{id}",
            put(handlers::settings::update_hotel).delete(handlers::settings::delete_hotel),
        )
        .route(
            "/api/parameters",
            get(handlers::settings::list_parameters).post(handlers::settings::create_parameter),
        )
        .route("/api/parameters/{id}", put(handlers::settings::update_parameter))
        .route("/api/modules", get(handlers::settings::list_modules))
        .route("/api/roles", get(handlers::settings::list_roles))
        // Incidentes
        .route(
            "/api/incidents",
            get(handlers::incidents::list_incidents).post(handlers::incidents::create_incident),
        )
        .route(
            "/api/incidents/{id}",
            get(handlers::incidents::get_incident)
                .put(handlers::incidents::update_incident)
                .delete(handlers::incidents::delete_incident),
        )
        .route("/api/incidents/{id}/attachments", get(handlers::incidents::list_attachments))
        // Achados e perdidos
        .route(
            "/api/lost-items",
            get(handlers::lost_items::list_lost_items).post(handlers::lost_items::create_lost_item),
        )
        .route(
            "/api/lost-items/{id}",
            get(handlers::lost_items::get_lost_item)
                .put(handlers::lost_items::update_lost_item)
                .delete(handlers::lost_items::delete_lost_item),
        )
        // Manutenção
        .route(
            "/api/technicians",
            get(handlers::technicians::list_technicians).post(handlers::technicians::create_technician),
        )
        .route(
            "/api/technicians/{id}",
            get(handlers::technicians::get_technician)
                .put(handlers::technicians::update_technician)
                .delete(handlers::technicians::delete_technician),
        )
        // Checklists
        .route(
            "/api/checklists/missions",
            get(handlers::checklists::list_missions).post(handlers::checklists::create_mission),
        )
        .route(
            "/api/checklists/missions/{id}",
            put(handlers::checklists::update_mission).delete(handlers::checklists::delete_mission),
        )
        .route("/api/checklists/items", get(handlers::checklists::list_day_items))
        .route("/api/checklists/items/{id}/toggle", put(handlers::checklists::toggle_item))
        .route("/api/checklists/generate", post(handlers::checklists::generate_items))
        .route("/api/checklists/duplicate", post(handlers::checklists::duplicate_day))
        // Diário de bordo
        .route(
            "/api/logbook",
            get(handlers::logbook::list_entries).post(handlers::logbook::create_entry),
        )
        .route("/api/logbook/{id}", delete(handlers::logbook::delete_entry))
        // Painel e feed
        .route("/api/dashboard/summary", get(handlers::dashboard::get_summary))
        .route("/api/events", get(handlers::events::change_feed))
        .merge(upload_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let bind_addr = app_state.config.bind_addr.clone();

    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(app_state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Falha ao iniciar o listener TCP em {}", bind_addr))?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("Erro no servidor Axum")?;
    Ok(())
}
