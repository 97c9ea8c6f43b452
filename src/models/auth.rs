// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- Papéis (tabela fixa) ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Standard,
    HotelAdmin,
    SystemAdmin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Standard, Role::HotelAdmin, Role::SystemAdmin];

    pub fn slug(self) -> &'static str {
        match self {
            Role::Standard => "standard",
            Role::HotelAdmin => "hotel_admin",
            Role::SystemAdmin => "system_admin",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Standard => "Standard",
            Role::HotelAdmin => "Hotel administrator",
            Role::SystemAdmin => "System administrator",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Role::Standard => "Works with the modules and hotels explicitly assigned to the account.",
            Role::HotelAdmin => "Manages users and settings of the assigned hotels.",
            Role::SystemAdmin => "Full access to every hotel and module, regardless of assignments.",
        }
    }

    pub fn is_admin(self) -> bool {
        matches!(self, Role::HotelAdmin | Role::SystemAdmin)
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleInfo {
    pub role: Role,
    pub label: String,
    pub description: String,
}

impl From<Role> for RoleInfo {
    fn from(role: Role) -> Self {
        Self {
            role,
            label: role.label().to_string(),
            description: role.description().to_string(),
        }
    }
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,

    #[schema(example = "recepcao@hotel.com")]
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub password_hash: String,

    #[schema(example = "Maria Souza")]
    pub full_name: String,

    pub role: Role,
    pub hotels: Vec<Uuid>,

    #[schema(example = json!(["incidents", "lost_found"]))]
    pub modules: Vec<String>,

    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    #[serde(flatten)]
    pub user: User,
    pub role_info: RoleInfo,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(email(message = "validation.email"))]
    pub email: String,
    #[validate(length(min = 1, message = "validation.required"))]
    pub password: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
}

// Criação de usuário (ação de administrador)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserPayload {
    #[validate(email(message = "validation.email"))]
    pub email: String,

    #[validate(length(min = 8, message = "validation.password_min"))]
    pub password: String,

    #[validate(length(min = 1, message = "validation.required"))]
    pub full_name: String,

    pub role: Role,

    #[serde(default)]
    pub hotels: Vec<Uuid>,

    #[serde(default)]
    pub modules: Vec<String>,
}

// Edição de perfil
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfilePayload {
    #[validate(email(message = "validation.email"))]
    pub email: String,

    #[validate(length(min = 1, message = "validation.required"))]
    pub full_name: String,

    #[validate(length(min = 8, message = "validation.password_min"))]
    pub new_password: Option<String>,
}

// Papel e listas de acesso
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccessPayload {
    pub role: Role,
    pub hotels: Vec<Uuid>,
    pub modules: Vec<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetActivePayload {
    pub active: bool,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}
