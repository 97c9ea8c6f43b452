// src/middleware/modules.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::marker::PhantomData;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::module::AppModule,
};

/// 1. O Trait que define um módulo protegido
pub trait ModuleDef: Send + Sync + 'static {
    fn module() -> AppModule;
}

/// 2. O Extractor (Guardião)
pub struct RequireModule<T>(pub PhantomData<T>);

// 3. Implementação do FromRequestParts
impl<T, S> FromRequestParts<S> for RequireModule<T>
where
    T: ModuleDef,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let Ok(locale) = Locale::from_request_parts(parts, state).await;

        // A. Extrai Usuário (colocado pelo auth_guard)
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;

        // B. Verifica a lista de módulos (system_admin passa sempre)
        user.scope()
            .require_module(T::module())
            .map_err(|e: AppError| e.to_api_error(&locale, &app_state.i18n_store))?;

        Ok(RequireModule(PhantomData))
    }
}

// ---
// DEFINIÇÃO DOS MÓDULOS (TIPOS)
// ---

pub struct ModIncidents;
impl ModuleDef for ModIncidents {
    fn module() -> AppModule { AppModule::Incidents }
}

pub struct ModMaintenance;
impl ModuleDef for ModMaintenance {
    fn module() -> AppModule { AppModule::Maintenance }
}

pub struct ModLostFound;
impl ModuleDef for ModLostFound {
    fn module() -> AppModule { AppModule::LostFound }
}

pub struct ModLogbook;
impl ModuleDef for ModLogbook {
    fn module() -> AppModule { AppModule::Logbook }
}

pub struct ModChecklists;
impl ModuleDef for ModChecklists {
    fn module() -> AppModule { AppModule::Checklists }
}

pub struct ModUsers;
impl ModuleDef for ModUsers {
    fn module() -> AppModule { AppModule::Users }
}

pub struct ModSettings;
impl ModuleDef for ModSettings {
    fn module() -> AppModule { AppModule::Settings }
}
