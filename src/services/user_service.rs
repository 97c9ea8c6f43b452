// src/services/user_service.rs

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        db_utils::begin_audited_tx,
        error::{invalid_field, AppError},
    },
    db::UserRepository,
    models::{
        auth::{
            CreateUserPayload, MeResponse, Role, RoleInfo, UpdateAccessPayload, UpdateProfilePayload,
            User,
        },
        events::ChangeAction,
        filters::ListQuery,
        module::AppModule,
    },
    services::{
        access::AccessScope,
        auth::hash_password,
        events::EventHub,
        filtering::{active_status_filter, filter_records, RecordFilters},
    },
};

const COLLECTION: &str = "users";

/// Remove duplicatas mantendo a ordem e rejeita módulos desconhecidos.
pub fn normalize_access(hotels: &[Uuid], modules: &[String]) -> Result<(Vec<Uuid>, Vec<String>), AppError> {
    let mut clean_hotels: Vec<Uuid> = Vec::with_capacity(hotels.len());
    for hotel in hotels {
        if !clean_hotels.contains(hotel) {
            clean_hotels.push(*hotel);
        }
    }

    let mut clean_modules: Vec<String> = Vec::with_capacity(modules.len());
    for slug in modules {
        let module = AppModule::from_slug(slug.trim())
            .ok_or_else(|| invalid_field("modules", "validation.unknown_module"))?;
        let slug = module.slug().to_string();
        if !clean_modules.contains(&slug) {
            clean_modules.push(slug);
        }
    }

    Ok((clean_hotels, clean_modules))
}

/// Hotéis fora do alcance de quem edita continuam no usuário.
pub fn merge_hotels(scope: &AccessScope, current: &[Uuid], requested: Vec<Uuid>) -> Vec<Uuid> {
    let mut merged: Vec<Uuid> = current
        .iter()
        .copied()
        .filter(|h| !scope.can_access_hotel(*h))
        .collect();
    for hotel in requested {
        if !merged.contains(&hotel) {
            merged.push(hotel);
        }
    }
    merged
}

#[derive(Clone)]
pub struct UserService {
    repo: UserRepository,
    pool: PgPool,
    events: EventHub,
}

impl UserService {
    pub fn new(repo: UserRepository, pool: PgPool, events: EventHub) -> Self {
        Self { repo, pool, events }
    }

    pub fn me(&self, user: User) -> MeResponse {
        let role_info = RoleInfo::from(user.role);
        MeResponse { user, role_info }
    }

    pub async fn list_users(&self, scope: &AccessScope, query: &ListQuery) -> Result<Vec<User>, AppError> {
        let status = active_status_filter(query.status.as_deref())?;
        let filters = RecordFilters::from_query(query, status, scope)?;

        let users = self.repo.list_all().await?;
        let visible: Vec<User> = match scope.role {
            Role::SystemAdmin => users,
            _ => users.into_iter().filter(|u| scope.can_manage_user(u)).collect(),
        };

        Ok(filter_records(visible, &filters, scope, Utc::now()))
    }

    pub async fn get_user(&self, scope: &AccessScope, id: Uuid) -> Result<User, AppError> {
        let user = self.repo.find_by_id(id).await?.ok_or(AppError::UserNotFound)?;
        if !scope.can_manage_user(&user) {
            return Err(AppError::Forbidden);
        }
        Ok(user)
    }

    pub async fn create_user(&self, scope: &AccessScope, payload: CreateUserPayload) -> Result<User, AppError> {
        payload.validate()?;

        if !scope.can_assign_role(payload.role) {
            return Err(AppError::Forbidden);
        }
        let (hotels, modules) = normalize_access(&payload.hotels, &payload.modules)?;
        if !scope.can_grant_hotels(&hotels) {
            return Err(AppError::HotelAccessDenied);
        }

        let password_hash = hash_password(&payload.password).await?;

        let mut tx = begin_audited_tx(&self.pool, scope.user_id).await?;
        let user = self
            .repo
            .create_user(
                &mut *tx,
                payload.email.trim(),
                &password_hash,
                payload.full_name.trim(),
                payload.role,
                &hotels,
                &modules,
            )
            .await?;
        tx.commit().await?;

        tracing::info!("👤 Usuário {} criado por {}", user.id, scope.user_id);
        self.events.publish(COLLECTION, user.id, &user.hotels, ChangeAction::Created);
        Ok(user)
    }

    pub async fn update_profile(
        &self,
        scope: &AccessScope,
        id: Uuid,
        payload: UpdateProfilePayload,
    ) -> Result<User, AppError> {
        payload.validate()?;
        self.get_user(scope, id).await?;

        let password_hash = match payload.new_password.as_deref() {
            Some(password) => Some(hash_password(password).await?),
            None => None,
        };

        let mut tx = begin_audited_tx(&self.pool, scope.user_id).await?;
        let user = self
            .repo
            .update_profile(
                &mut *tx,
                id,
                payload.email.trim(),
                payload.full_name.trim(),
                password_hash.as_deref(),
            )
            .await?;
        tx.commit().await?;

        tracing::info!("👤 Perfil {} atualizado", id);
        self.events.publish(COLLECTION, id, &user.hotels, ChangeAction::Updated);
        Ok(user)
    }

    pub async fn update_access(
        &self,
        scope: &AccessScope,
        id: Uuid,
        payload: UpdateAccessPayload,
    ) -> Result<User, AppError> {
        // Ninguém altera o próprio papel ou as próprias listas
        if id == scope.user_id {
            return Err(AppError::Forbidden);
        }
        let target = self.get_user(scope, id).await?;
        if !scope.can_assign_role(payload.role) || !scope.can_assign_role(target.role) {
            return Err(AppError::Forbidden);
        }

        let (requested, modules) = normalize_access(&payload.hotels, &payload.modules)?;
        if !scope.can_grant_hotels(&requested) {
            return Err(AppError::HotelAccessDenied);
        }
        let hotels = merge_hotels(scope, &target.hotels, requested);

        let mut tx = begin_audited_tx(&self.pool, scope.user_id).await?;
        let user = self
            .repo
            .update_access(&mut *tx, id, payload.role, &hotels, &modules)
            .await?;
        tx.commit().await?;

        tracing::info!("🔐 Acesso de {} alterado para {}", id, payload.role.slug());
        self.events.publish(COLLECTION, id, &user.hotels, ChangeAction::Updated);
        Ok(user)
    }

    pub async fn set_active(&self, scope: &AccessScope, id: Uuid, active: bool) -> Result<User, AppError> {
        if id == scope.user_id {
            return Err(AppError::Forbidden);
        }
        let target = self.get_user(scope, id).await?;
        if !scope.can_assign_role(target.role) {
            return Err(AppError::Forbidden);
        }

        let mut tx = begin_audited_tx(&self.pool, scope.user_id).await?;
        let user = self.repo.set_active(&mut *tx, id, active).await?;
        tx.commit().await?;

        tracing::info!("👤 Usuário {} active={}", id, active);
        self.events.publish(COLLECTION, id, &user.hotels, ChangeAction::Updated);
        Ok(user)
    }

    pub async fn delete_user(&self, scope: &AccessScope, id: Uuid) -> Result<(), AppError> {
        if id == scope.user_id {
            return Err(AppError::Forbidden);
        }
        let target = self.get_user(scope, id).await?;
        if !scope.can_assign_role(target.role) {
            return Err(AppError::Forbidden);
        }

        let mut tx = begin_audited_tx(&self.pool, scope.user_id).await?;
        self.repo.delete(&mut *tx, id).await?;
        tx.commit().await?;

        tracing::info!("🗑️ Usuário {} removido", id);
        self.events.publish(COLLECTION, id, &target.hotels, ChangeAction::Deleted);
        Ok(())
    }

    /// Cria o primeiro `system_admin` quando ainda não existe nenhum.
    pub async fn bootstrap_admin(&self, email: &str, password: &str) -> Result<(), AppError> {
        if self.repo.count_by_role(Role::SystemAdmin).await? > 0 {
            return Ok(());
        }

        let password_hash = hash_password(password).await?;
        let modules: Vec<String> = AppModule::ALL.iter().map(|m| m.slug().to_string()).collect();
        let user = self
            .repo
            .create_user(&self.pool, email, &password_hash, "Administrator", Role::SystemAdmin, &[], &modules)
            .await?;

        tracing::info!("🛡️ Administrador inicial criado: {}", user.email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::access::tests::user_with;

    #[test]
    fn access_lists_are_deduplicated() {
        let h1 = Uuid::new_v4();
        let (hotels, modules) = normalize_access(
            &[h1, h1],
            &["incidents".into(), " incidents".into(), "logbook".into()],
        )
        .unwrap();
        assert_eq!(hotels, vec![h1]);
        assert_eq!(modules, vec!["incidents".to_string(), "logbook".to_string()]);
    }

    #[test]
    fn unknown_module_is_a_validation_error() {
        let err = normalize_access(&[], &["gamification".into()]).unwrap_err();
        match err {
            AppError::ValidationError(errors) => {
                assert!(errors.field_errors().contains_key("modules"));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn hotel_admin_keeps_foreign_hotels_of_target() {
        let mine = Uuid::new_v4();
        let foreign = Uuid::new_v4();
        let admin = user_with(Role::HotelAdmin, vec![mine], vec!["users"]);
        let scope = AccessScope::from_user(&admin);

        let merged = merge_hotels(&scope, &[mine, foreign], vec![]);
        assert_eq!(merged, vec![foreign]);

        let merged = merge_hotels(&scope, &[foreign], vec![mine]);
        assert_eq!(merged, vec![foreign, mine]);
    }
}
