// src/services/settings_service.rs

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{db_utils::begin_audited_tx, error::AppError},
    db::SettingsRepository,
    models::{
        auth::{Role, RoleInfo},
        events::ChangeAction,
        hotel::{Hotel, HotelPayload},
        module::ModuleInfo,
        parameter::{
            Parameter, ParameterKind, ParameterPayload, INCIDENT_STATUS_CLOSED, INCIDENT_STATUS_IN_PROGRESS,
            INCIDENT_STATUS_OPEN,
        },
    },
    services::{access::AccessScope, events::EventHub},
};

/// Os três status de incidente vêm da migração e não podem ser desativados.
pub fn is_builtin_status(id: Uuid) -> bool {
    [INCIDENT_STATUS_OPEN, INCIDENT_STATUS_IN_PROGRESS, INCIDENT_STATUS_CLOSED].contains(&id)
}

#[derive(Clone)]
pub struct SettingsService {
    repo: SettingsRepository,
    pool: PgPool,
    events: EventHub,
}

impl SettingsService {
    pub fn new(repo: SettingsRepository, pool: PgPool, events: EventHub) -> Self {
        Self { repo, pool, events }
    }

    // =========================================================================
    //  HOTÉIS
    // =========================================================================

    pub async fn list_hotels(&self, scope: &AccessScope) -> Result<Vec<Hotel>, AppError> {
        let hotels = self.repo.list_hotels().await?;
        Ok(hotels.into_iter().filter(|h| scope.can_access_hotel(h.id)).collect())
    }

    // Só o administrador do sistema cria ou remove hotéis
    pub async fn create_hotel(&self, scope: &AccessScope, payload: HotelPayload) -> Result<Hotel, AppError> {
        payload.validate()?;
        if scope.role != Role::SystemAdmin {
            return Err(AppError::Forbidden);
        }

        let mut tx = begin_audited_tx(&self.pool, scope.user_id).await?;
        let hotel = self.repo.create_hotel(&mut *tx, &payload).await?;
        tx.commit().await?;

        tracing::info!("🏨 Hotel criado: {} ({})", hotel.name, hotel.id);
        self.events.publish("hotels", hotel.id, &[hotel.id], ChangeAction::Created);
        Ok(hotel)
    }

    pub async fn update_hotel(
        &self,
        scope: &AccessScope,
        id: Uuid,
        payload: HotelPayload,
    ) -> Result<Hotel, AppError> {
        payload.validate()?;
        if !scope.role.is_admin() {
            return Err(AppError::Forbidden);
        }
        scope.require_hotel(id)?;

        let mut tx = begin_audited_tx(&self.pool, scope.user_id).await?;
        let hotel = self.repo.update_hotel(&mut *tx, id, &payload).await?;
        tx.commit().await?;

        tracing::info!("🏨 Hotel atualizado: {}", id);
        self.events.publish("hotels", id, &[id], ChangeAction::Updated);
        Ok(hotel)
    }

    pub async fn delete_hotel(&self, scope: &AccessScope, id: Uuid) -> Result<(), AppError> {
        if scope.role != Role::SystemAdmin {
            return Err(AppError::Forbidden);
        }

        let mut tx = begin_audited_tx(&self.pool, scope.user_id).await?;
        self.repo.delete_hotel(&mut *tx, id).await?;
        tx.commit().await?;

        tracing::info!("🗑️ Hotel removido: {}", id);
        self.events.publish("hotels", id, &[id], ChangeAction::Deleted);
        Ok(())
    }

    // =========================================================================
    //  PARÂMETROS
    // =========================================================================

    pub async fn list_parameters(
        &self,
        kind: ParameterKind,
        include_inactive: bool,
    ) -> Result<Vec<Parameter>, AppError> {
        self.repo.list_parameters(kind, include_inactive).await
    }

    pub async fn create_parameter(
        &self,
        scope: &AccessScope,
        payload: ParameterPayload,
    ) -> Result<Parameter, AppError> {
        payload.validate()?;
        if !scope.role.is_admin() {
            return Err(AppError::Forbidden);
        }

        let mut tx = begin_audited_tx(&self.pool, scope.user_id).await?;
        let parameter = self.repo.create_parameter(&mut *tx, &payload).await?;
        tx.commit().await?;

        tracing::info!("⚙️ Parâmetro criado: {:?} {}", parameter.kind, parameter.id);
        self.events.publish("parameters", parameter.id, &[], ChangeAction::Created);
        Ok(parameter)
    }

    pub async fn update_parameter(
        &self,
        scope: &AccessScope,
        id: Uuid,
        payload: ParameterPayload,
    ) -> Result<Parameter, AppError> {
        payload.validate()?;
        if !scope.role.is_admin() {
            return Err(AppError::Forbidden);
        }
        if is_builtin_status(id) && !payload.active {
            return Err(AppError::Forbidden);
        }

        let mut tx = begin_audited_tx(&self.pool, scope.user_id).await?;
        let parameter = self.repo.update_parameter(&mut *tx, id, &payload).await?;
        tx.commit().await?;

        tracing::info!("⚙️ Parâmetro atualizado: {}", id);
        self.events.publish("parameters", id, &[], ChangeAction::Updated);
        Ok(parameter)
    }

    // =========================================================================
    //  CATÁLOGOS FIXOS
    // =========================================================================

    pub async fn list_modules(&self) -> Result<Vec<ModuleInfo>, AppError> {
        self.repo.list_modules().await
    }

    pub fn list_roles(&self) -> Vec<RoleInfo> {
        Role::ALL.into_iter().map(RoleInfo::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db::test_support::test_pool, services::access::tests::user_with};

    #[test]
    fn builtin_statuses_are_recognized() {
        assert!(is_builtin_status(INCIDENT_STATUS_CLOSED));
        assert!(!is_builtin_status(Uuid::new_v4()));
    }

    #[tokio::test]
    async fn missing_hotels_are_not_found() {
        let Some(pool) = test_pool().await else { return };
        let service = SettingsService::new(SettingsRepository::new(pool.clone()), pool, EventHub::new());
        let scope = AccessScope::from_user(&user_with(Role::SystemAdmin, vec![], vec![]));
        let payload = HotelPayload {
            name: "Fantasma".into(),
            address: None,
            locations: vec![],
            categories: vec![],
            active: true,
        };

        let missing = Uuid::new_v4();
        assert!(matches!(
            service.update_hotel(&scope, missing, payload).await,
            Err(AppError::ResourceNotFound(_))
        ));
        assert!(matches!(
            service.delete_hotel(&scope, missing).await,
            Err(AppError::ResourceNotFound(_))
        ));
    }
}
