// src/models/dashboard.rs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    #[schema(example = 4)]
    pub open_incidents: i64,
    #[schema(example = 2)]
    pub in_progress_incidents: i64,
    #[schema(example = 17)]
    pub closed_incidents_last_30_days: i64,
    #[schema(example = 9)]
    pub conserved_lost_items: i64,
    /// Percentual (0-100) dos itens de checklist de hoje concluídos
    #[schema(example = 75.0)]
    pub checklist_completion_today: f64,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQuery {
    /// Ausente = todos os hotéis acessíveis
    pub hotel_id: Option<Uuid>,
}
