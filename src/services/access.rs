// src/services/access.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        auth::{Role, User},
        module::AppModule,
    },
};

/// `system_admin` acessa qualquer hotel. Os demais, só os da própria lista.
pub fn has_hotel_access(user_hotels: &[Uuid], role: Role, hotel_id: Uuid) -> bool {
    role == Role::SystemAdmin || user_hotels.contains(&hotel_id)
}

/// Mesma regra, para os módulos.
pub fn has_module_access(user_modules: &[String], role: Role, module_id: &str) -> bool {
    role == Role::SystemAdmin || user_modules.iter().any(|m| m == module_id)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessibleHotels {
    All,
    Only(Vec<Uuid>),
}

// ---
// Escopo de acesso do usuário autenticado
// ---
// Montado a partir do User carregado pelo auth_guard e passado explicitamente aos serviços.
#[derive(Debug, Clone)]
pub struct AccessScope {
    pub user_id: Uuid,
    pub role: Role,
    pub hotels: Vec<Uuid>,
    pub modules: Vec<String>,
}

impl AccessScope {
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            role: user.role,
            hotels: user.hotels.clone(),
            modules: user.modules.clone(),
        }
    }

    pub fn can_access_hotel(&self, hotel_id: Uuid) -> bool {
        has_hotel_access(&self.hotels, self.role, hotel_id)
    }

    pub fn can_access_module(&self, module: AppModule) -> bool {
        has_module_access(&self.modules, self.role, module.slug())
    }

    pub fn accessible_hotels(&self) -> AccessibleHotels {
        match self.role {
            Role::SystemAdmin => AccessibleHotels::All,
            _ => AccessibleHotels::Only(self.hotels.clone()),
        }
    }

    pub fn require_hotel(&self, hotel_id: Uuid) -> Result<(), AppError> {
        if self.can_access_hotel(hotel_id) {
            Ok(())
        } else {
            Err(AppError::HotelAccessDenied)
        }
    }

    /// Lista vazia para não-admin é um estado explícito, e não "nenhum dado".
    pub fn require_any_hotel(&self) -> Result<(), AppError> {
        if self.role != Role::SystemAdmin && self.hotels.is_empty() {
            return Err(AppError::NoAccessibleHotel);
        }
        Ok(())
    }

    pub fn require_module(&self, module: AppModule) -> Result<(), AppError> {
        if self.can_access_module(module) {
            Ok(())
        } else {
            Err(AppError::ModuleAccessDenied(module.slug().to_string()))
        }
    }

    /// Quem pode editar/desativar/excluir o usuário `target`.
    pub fn can_manage_user(&self, target: &User) -> bool {
        match self.role {
            Role::SystemAdmin => true,
            Role::HotelAdmin => {
                target.id == self.user_id
                    || (target.role != Role::SystemAdmin
                        && target.hotels.iter().any(|h| self.hotels.contains(h)))
            }
            Role::Standard => target.id == self.user_id,
        }
    }

    /// `hotel_admin` nunca promove ninguém a `system_admin`; `standard` não atribui papéis.
    pub fn can_assign_role(&self, role: Role) -> bool {
        match self.role {
            Role::SystemAdmin => true,
            Role::HotelAdmin => role != Role::SystemAdmin,
            Role::Standard => false,
        }
    }

    /// Um admin de hotel só distribui hotéis que ele mesmo acessa.
    pub fn can_grant_hotels(&self, hotels: &[Uuid]) -> bool {
        hotels.iter().all(|h| self.can_access_hotel(*h))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Utc;

    pub(crate) fn user_with(role: Role, hotels: Vec<Uuid>, modules: Vec<&str>) -> User {
        User {
            id: Uuid::new_v4(),
            email: "someone@hotel.test".into(),
            password_hash: String::new(),
            full_name: "Someone".into(),
            role,
            hotels,
            modules: modules.into_iter().map(String::from).collect(),
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn system_admin_reaches_everything_not_in_lists() {
        let stranger_hotel = Uuid::new_v4();
        assert!(has_hotel_access(&[], Role::SystemAdmin, stranger_hotel));
        assert!(has_module_access(&[], Role::SystemAdmin, "lost_found"));
        assert!(has_module_access(&[], Role::SystemAdmin, "anything-at-all"));
    }

    #[test]
    fn non_admin_access_is_list_membership() {
        let h1 = Uuid::new_v4();
        let h2 = Uuid::new_v4();
        for role in [Role::Standard, Role::HotelAdmin] {
            assert!(has_hotel_access(&[h1], role, h1));
            assert!(!has_hotel_access(&[h1], role, h2));
            assert!(!has_hotel_access(&[], role, h1));
            assert!(has_module_access(&["incidents".to_string()], role, "incidents"));
            assert!(!has_module_access(&["incidents".to_string()], role, "users"));
        }
    }

    #[test]
    fn promotion_grants_access_without_touching_hotels() {
        let h1 = Uuid::new_v4();
        let h2 = Uuid::new_v4();
        let mut user = user_with(Role::Standard, vec![h1], vec![]);

        assert!(!AccessScope::from_user(&user).can_access_hotel(h2));

        user.role = Role::SystemAdmin;
        let scope = AccessScope::from_user(&user);
        assert!(scope.can_access_hotel(h2));
        assert_eq!(user.hotels, vec![h1]);
    }

    #[test]
    fn empty_hotel_list_is_an_explicit_state() {
        let lonely = AccessScope::from_user(&user_with(Role::Standard, vec![], vec![]));
        assert!(matches!(lonely.require_any_hotel(), Err(AppError::NoAccessibleHotel)));

        let admin = AccessScope::from_user(&user_with(Role::SystemAdmin, vec![], vec![]));
        assert!(admin.require_any_hotel().is_ok());
        assert_eq!(admin.accessible_hotels(), AccessibleHotels::All);
    }

    #[test]
    fn module_guard_names_the_module() {
        let scope = AccessScope::from_user(&user_with(Role::Standard, vec![], vec!["incidents"]));
        assert!(scope.require_module(AppModule::Incidents).is_ok());
        match scope.require_module(AppModule::LostFound) {
            Err(AppError::ModuleAccessDenied(m)) => assert_eq!(m, "lost_found"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn hotel_admin_manages_only_shared_hotel_non_system_users() {
        let h1 = Uuid::new_v4();
        let h2 = Uuid::new_v4();
        let admin = user_with(Role::HotelAdmin, vec![h1], vec!["users"]);
        let scope = AccessScope::from_user(&admin);

        assert!(scope.can_manage_user(&user_with(Role::Standard, vec![h1, h2], vec![])));
        assert!(!scope.can_manage_user(&user_with(Role::Standard, vec![h2], vec![])));
        assert!(!scope.can_manage_user(&user_with(Role::SystemAdmin, vec![h1], vec![])));
        assert!(scope.can_manage_user(&admin));

        assert!(scope.can_assign_role(Role::HotelAdmin));
        assert!(!scope.can_assign_role(Role::SystemAdmin));
        assert!(scope.can_grant_hotels(&[h1]));
        assert!(!scope.can_grant_hotels(&[h1, h2]));
    }

    #[test]
    fn standard_user_only_manages_self() {
        let me = user_with(Role::Standard, vec![], vec![]);
        let scope = AccessScope::from_user(&me);
        assert!(scope.can_manage_user(&me));
        assert!(!scope.can_manage_user(&user_with(Role::Standard, vec![], vec![])));
        assert!(!scope.can_assign_role(Role::Standard));
    }
}
