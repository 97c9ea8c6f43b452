// src/models/lost_item.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "lost_item_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LostItemStatus {
    Conserved,
    Returned,
}

impl LostItemStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "conserved" => Some(LostItemStatus::Conserved),
            "returned" => Some(LostItemStatus::Returned),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LostItem {
    pub id: Uuid,
    pub hotel_id: Uuid,
    pub found_at: DateTime<Utc>,
    pub location_id: Option<Uuid>,
    pub item_type_id: Option<Uuid>,
    #[schema(example = "Óculos de sol pretos, estojo marrom")]
    pub description: String,
    #[schema(example = "Armário 3 da recepção")]
    pub storage_location: Option<String>,
    pub found_by: Option<String>,
    pub status: LostItemStatus,
    pub returned_by: Option<String>,
    pub returned_date: Option<DateTime<Utc>>,
    pub returned_notes: Option<String>,
    pub photo_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LostItemPayload {
    pub hotel_id: Uuid,
    pub found_at: DateTime<Utc>,
    pub location_id: Option<Uuid>,
    pub item_type_id: Option<Uuid>,
    #[validate(length(min = 1, message = "validation.required"))]
    pub description: String,
    pub storage_location: Option<String>,
    pub found_by: Option<String>,
    pub status: LostItemStatus,
    pub returned_by: Option<String>,
    pub returned_date: Option<DateTime<Utc>>,
    pub returned_notes: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LostItemDetail {
    #[serde(flatten)]
    pub item: LostItem,
    /// URL assinada e temporária da foto
    pub photo_url: Option<String>,
}
