// src/common/error.rs

use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use validator::{ValidationError, ValidationErrors};

use crate::{common::i18n::I18nStore, middleware::i18n::Locale};

// Nosso tipo de erro de domínio. Os handlers convertem para ApiError (já traduzido).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário desativado")]
    UserInactive,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Sem acesso ao hotel")]
    HotelAccessDenied,

    #[error("Nenhum hotel acessível")]
    NoAccessibleHotel,

    #[error("Sem acesso ao módulo {0}")]
    ModuleAccessDenied(String),

    #[error("Operação não permitida")]
    Forbidden,

    #[error("Recurso não encontrado: {0}")]
    ResourceNotFound(String),

    #[error("Checklist do dia ainda não está completo")]
    ChecklistDayIncomplete,

    #[error("Nenhum item de checklist para o dia")]
    ChecklistDayEmpty,

    #[error("Erro de armazenamento: {0}")]
    Storage(#[from] std::io::Error),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

// O erro que efetivamente sai pela API (status + mensagem traduzida)
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<HashMap<String, Vec<String>>>,
}

/// Erro de validação de um único campo, no mesmo formato do `validator`.
pub fn invalid_field(field: &'static str, message_key: &'static str) -> AppError {
    let mut err = ValidationError::new("invalid");
    err.message = Some(message_key.into());
    let mut errors = ValidationErrors::new();
    errors.add(field, err);
    AppError::ValidationError(errors)
}

impl AppError {
    /// Status HTTP e chave de tradução de cada variante.
    pub fn status_and_key(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::ValidationError(_) => (StatusCode::UNPROCESSABLE_ENTITY, "errors.validation"),
            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "errors.email_exists"),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "errors.invalid_credentials"),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "errors.invalid_token"),
            AppError::UserInactive => (StatusCode::FORBIDDEN, "errors.user_inactive"),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "errors.user_not_found"),
            AppError::HotelAccessDenied => (StatusCode::FORBIDDEN, "errors.hotel_access_denied"),
            AppError::NoAccessibleHotel => (StatusCode::FORBIDDEN, "errors.no_accessible_hotel"),
            AppError::ModuleAccessDenied(_) => (StatusCode::FORBIDDEN, "errors.module_access_denied"),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "errors.forbidden"),
            AppError::ResourceNotFound(_) => (StatusCode::NOT_FOUND, "errors.not_found"),
            AppError::ChecklistDayIncomplete => (StatusCode::CONFLICT, "errors.checklist_incomplete"),
            AppError::ChecklistDayEmpty => (StatusCode::CONFLICT, "errors.checklist_empty"),
            AppError::Storage(_)
            | AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "errors.internal"),
        }
    }

    pub fn to_api_error(self, locale: &Locale, i18n: &I18nStore) -> ApiError {
        let (status, key) = self.status_and_key();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            // O detalhe fica só no log, o cliente recebe a mensagem genérica
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        let mut message = i18n.translate(&locale.0, key);
        match &self {
            AppError::ModuleAccessDenied(module) => message = message.replace("{module}", module),
            AppError::ResourceNotFound(resource) => message = message.replace("{resource}", resource),
            _ => {}
        }

        let details = match self {
            AppError::ValidationError(errors) => {
                let mut details = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| match &e.message {
                            Some(m) => i18n.translate(&locale.0, m),
                            None => i18n.translate(&locale.0, &e.code),
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                Some(details)
            }
            _ => None,
        };

        ApiError { status, error: message, details }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn en() -> Locale {
        Locale("en".to_string())
    }

    #[test]
    fn access_errors_map_to_forbidden() {
        assert_eq!(AppError::HotelAccessDenied.status_and_key().0, StatusCode::FORBIDDEN);
        assert_eq!(AppError::NoAccessibleHotel.status_and_key().0, StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::ModuleAccessDenied("incidents".into()).status_and_key().0,
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn internal_errors_hide_their_detail() {
        let store = I18nStore::load();
        let api = AppError::InternalServerError(anyhow::anyhow!("pool exploded"))
            .to_api_error(&en(), &store);

        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!api.error.contains("pool exploded"));
    }

    #[test]
    fn module_name_is_interpolated() {
        let store = I18nStore::load();
        let api = AppError::ModuleAccessDenied("lost_found".into()).to_api_error(&en(), &store);
        assert!(api.error.contains("lost_found"));
    }

    #[test]
    fn validation_details_are_keyed_by_field() {
        let store = I18nStore::load();
        let mut errors = ValidationErrors::new();
        let mut err = ValidationError::new("length");
        err.message = Some("validation.resolution_description_min".into());
        errors.add("resolutionDescription", err);

        let api = AppError::ValidationError(errors).to_api_error(&en(), &store);
        let details = api.details.expect("details");

        assert_eq!(api.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(details["resolutionDescription"][0].contains("10"));
    }
}
