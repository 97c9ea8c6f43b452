// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::i18n::I18nStore,
    db::{
        ChecklistRepository, DashboardRepository, IncidentRepository, LogbookRepository, LostItemRepository,
        SettingsRepository, TechnicianRepository, UserRepository,
    },
    services::{
        auth::AuthService,
        checklist_service::ChecklistService,
        dashboard_service::DashboardService,
        events::EventHub,
        incident_service::IncidentService,
        logbook_service::LogbookService,
        lost_item_service::LostItemService,
        settings_service::SettingsService,
        storage_service::{LocalObjectStore, StorageService},
        technician_service::TechnicianService,
        user_service::UserService,
    },
};

// Variáveis de ambiente lidas na inicialização
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub storage_dir: String,
    pub signed_url_ttl_secs: i64,
    pub bootstrap_admin: Option<(String, String)>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let storage_dir = env::var("STORAGE_DIR").unwrap_or_else(|_| "./storage".to_string());
        let signed_url_ttl_secs = match env::var("SIGNED_URL_TTL_SECS") {
            Ok(raw) => raw.parse().context("SIGNED_URL_TTL_SECS deve ser um número")?,
            Err(_) => 900,
        };

        let bootstrap_admin = match (env::var("BOOTSTRAP_ADMIN_EMAIL"), env::var("BOOTSTRAP_ADMIN_PASSWORD")) {
            (Ok(email), Ok(password)) if !email.is_empty() && !password.is_empty() => Some((email, password)),
            _ => None,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr,
            storage_dir,
            signed_url_ttl_secs,
            bootstrap_admin,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Config,
    pub i18n_store: I18nStore,
    pub events: EventHub,
    pub storage: StorageService,

    pub auth_service: AuthService,
    pub user_service: UserService,
    pub settings_service: SettingsService,
    pub incident_service: IncidentService,
    pub lost_item_service: LostItemService,
    pub technician_service: TechnicianService,
    pub checklist_service: ChecklistService,
    pub logbook_service: LogbookService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let events = EventHub::new();
        let i18n_store = I18nStore::load();
        let storage = StorageService::new(
            Arc::new(LocalObjectStore::new(&config.storage_dir)),
            config.jwt_secret.clone(),
            config.signed_url_ttl_secs,
        );

        let user_repo = UserRepository::new(db_pool.clone());
        let settings_repo = SettingsRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo.clone(), config.jwt_secret.clone());
        let user_service = UserService::new(user_repo, db_pool.clone(), events.clone());
        let settings_service = SettingsService::new(settings_repo.clone(), db_pool.clone(), events.clone());
        let incident_service = IncidentService::new(
            IncidentRepository::new(db_pool.clone()),
            settings_repo,
            storage.clone(),
            db_pool.clone(),
            events.clone(),
        );
        let lost_item_service = LostItemService::new(
            LostItemRepository::new(db_pool.clone()),
            storage.clone(),
            db_pool.clone(),
            events.clone(),
        );
        let technician_service =
            TechnicianService::new(TechnicianRepository::new(db_pool.clone()), db_pool.clone(), events.clone());
        let checklist_service =
            ChecklistService::new(ChecklistRepository::new(db_pool.clone()), db_pool.clone(), events.clone());
        let logbook_service =
            LogbookService::new(LogbookRepository::new(db_pool.clone()), db_pool.clone(), events.clone());
        let dashboard_service = DashboardService::new(DashboardRepository::new(db_pool.clone()));

        Ok(Self {
            db_pool,
            config,
            i18n_store,
            events,
            storage,
            auth_service,
            user_service,
            settings_service,
            incident_service,
            lost_item_service,
            technician_service,
            checklist_service,
            logbook_service,
            dashboard_service,
        })
    }
}
