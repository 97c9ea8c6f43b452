// src/models/events.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeAction {
    Created,
    Updated,
    Deleted,
}

// Notificação enviada aos assinantes do feed de alterações
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
    pub collection: &'static str,
    pub record_id: Uuid,
    /// Hotéis afetados; vazio = registro global (hotéis, parâmetros, usuários)
    pub hotel_ids: Vec<Uuid>,
    pub action: ChangeAction,
    pub at: DateTime<Utc>,
}
