// src/models/incident.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- Sub-registro do cliente (opcional) ---
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IncidentClient {
    #[schema(example = "João Pereira")]
    pub name: Option<String>,
    #[schema(example = "+55 11 99999-8888")]
    pub contact: Option<String>,
    pub arrival_date: Option<NaiveDate>,
    pub departure_date: Option<NaiveDate>,
    #[schema(example = "204")]
    pub room: Option<String>,
    #[schema(example = "BK-778812")]
    pub reservation: Option<String>,
    #[schema(example = "450.00")]
    pub amount: Option<Decimal>,
}

// --- Sub-registro da resolução ---
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IncidentResolution {
    #[schema(example = "Quarto trocado e jantar oferecido ao hóspede.")]
    pub description: Option<String>,
    pub resolution_type_id: Option<Uuid>,
    #[schema(example = "Gerente de plantão")]
    pub concluded_by: Option<String>,
    pub satisfaction_id: Option<Uuid>,
    #[schema(example = "80.00")]
    pub compensation_amount: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub id: Uuid,
    pub hotel_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub category_id: Option<Uuid>,
    pub impact_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub status_id: Uuid,
    #[schema(example = "Ar-condicionado do quarto 204 não liga.")]
    pub description: String,
    #[schema(value_type = Option<IncidentClient>)]
    pub client: Option<Json<IncidentClient>>,
    #[schema(value_type = Option<IncidentResolution>)]
    pub resolution: Option<Json<IncidentResolution>>,
    pub received_by: Option<String>,
    pub assigned_to: Option<String>,
    pub attachments: Vec<String>,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Criação e edição usam o mesmo formulário (PUT substitui o registro)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IncidentPayload {
    pub hotel_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub category_id: Option<Uuid>,
    pub impact_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    /// Ausente = aberto
    pub status_id: Option<Uuid>,
    #[validate(length(min = 1, message = "validation.required"))]
    pub description: String,
    pub client: Option<IncidentClient>,
    pub resolution: Option<IncidentResolution>,
    pub received_by: Option<String>,
    pub assigned_to: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentLink {
    pub path: String,
    pub url: String,
}
