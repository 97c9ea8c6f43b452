// src/models/checklist.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::hotel::default_true;

// ---
// 1. Missão (modelo de tarefa recorrente)
// ---
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistMission {
    pub id: Uuid,
    #[schema(example = "Conferir frigobar")]
    pub title: String,
    #[schema(example = "Governança")]
    pub service: String,
    pub description: Option<String>,
    pub hotels: Vec<Uuid>,
    /// Missões permanentes são geradas todos os dias
    pub permanent: bool,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MissionPayload {
    #[validate(length(min = 1, message = "validation.required"))]
    pub title: String,
    #[validate(length(min = 1, message = "validation.required"))]
    pub service: String,
    pub description: Option<String>,
    pub hotels: Vec<Uuid>,
    #[serde(default)]
    pub permanent: bool,
    #[serde(default = "default_true")]
    pub active: bool,
}

// ---
// 2. Item (instância datada de uma missão)
// ---
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub id: Uuid,
    pub mission_id: Option<Uuid>,
    pub hotel_id: Uuid,
    pub date: NaiveDate,
    pub title: String,
    pub service: String,
    pub completed: bool,
    pub completed_by: Option<Uuid>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

// Item ainda não persistido (gerado ou duplicado)
#[derive(Debug, Clone, PartialEq)]
pub struct NewChecklistItem {
    pub mission_id: Option<Uuid>,
    pub hotel_id: Uuid,
    pub date: NaiveDate,
    pub title: String,
    pub service: String,
    pub completed: bool,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistDayQuery {
    pub hotel_id: Uuid,
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateItemsPayload {
    pub hotel_id: Uuid,
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ToggleItemPayload {
    pub completed: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateDayPayload {
    pub hotel_id: Uuid,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}
