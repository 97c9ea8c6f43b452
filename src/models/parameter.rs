// src/models/parameter.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::hotel::default_true;

// IDs dos status de incidente criados pela migração inicial.
pub const INCIDENT_STATUS_OPEN: Uuid = Uuid::from_u128(0x5e0f_0001_0000_4000_8000_0000_0000_0001);
pub const INCIDENT_STATUS_IN_PROGRESS: Uuid = Uuid::from_u128(0x5e0f_0001_0000_4000_8000_0000_0000_0002);
pub const INCIDENT_STATUS_CLOSED: Uuid = Uuid::from_u128(0x5e0f_0001_0000_4000_8000_0000_0000_0003);

// --- Tipos de listas de parâmetros ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "parameter_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    IncidentCategory,
    IncidentImpact,
    IncidentStatus,
    Location,
    ClientSatisfaction,
    ResolutionType,
    LostItemType,
    TechnicianSpecialty,
}

// Entrada genérica de lista (categoria, impacto, status, satisfação...)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub id: Uuid,
    pub kind: ParameterKind,
    #[schema(example = "Em andamento")]
    pub label: String,
    pub active: bool,
    #[schema(example = 1)]
    pub position: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParameterPayload {
    pub kind: ParameterKind,
    #[validate(length(min = 1, message = "validation.required"))]
    pub label: String,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub position: i32,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ParameterQuery {
    pub kind: ParameterKind,
    #[serde(default)]
    pub include_inactive: bool,
}
