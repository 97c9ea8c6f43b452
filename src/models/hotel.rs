// src/models/hotel.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// ---
// Hotel (o "Tenant")
// ---
// Referenciado (nunca "dono") por incidentes, objetos perdidos, técnicos, missões e diário.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    pub id: Uuid,
    #[schema(example = "Hotel Beira Mar")]
    pub name: String,
    pub address: Option<String>,
    #[schema(example = json!(["Recepção", "Quarto 101", "Piscina"]))]
    pub locations: Vec<String>,
    #[schema(example = json!(["Limpeza", "Manutenção"]))]
    pub categories: Vec<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HotelPayload {
    #[validate(length(min = 1, message = "validation.required"))]
    pub name: String,
    pub address: Option<String>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default = "default_true")]
    pub active: bool,
}

pub(crate) fn default_true() -> bool {
    true
}
