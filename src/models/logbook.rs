// src/models/logbook.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Entrada do diário de bordo do hotel
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogbookEntry {
    pub id: Uuid,
    pub hotel_id: Uuid,
    pub entry_date: NaiveDate,
    pub author_id: Uuid,
    pub author_name: String,
    #[schema(example = "Recepção")]
    pub service: Option<String>,
    #[schema(example = "Hóspede do 310 pediu despertar às 5h.")]
    pub content: String,
    pub important: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogbookPayload {
    pub hotel_id: Uuid,
    pub entry_date: NaiveDate,
    pub service: Option<String>,
    #[validate(length(min = 1, message = "validation.required"))]
    pub content: String,
    #[serde(default)]
    pub important: bool,
}
