// src/models/filters.rs

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

// Janela de datas das listagens ("últimos N dias" ou "desde sempre")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ToSchema)]
pub enum DateRange {
    #[serde(rename = "7d")]
    Last7Days,
    #[serde(rename = "30d")]
    Last30Days,
    #[serde(rename = "90d")]
    Last90Days,
    #[serde(rename = "365d")]
    LastYear,
    #[default]
    #[serde(rename = "all")]
    AllTime,
}

impl DateRange {
    pub fn days(self) -> Option<i64> {
        match self {
            DateRange::Last7Days => Some(7),
            DateRange::Last30Days => Some(30),
            DateRange::Last90Days => Some(90),
            DateRange::LastYear => Some(365),
            DateRange::AllTime => None,
        }
    }

    /// Limite inferior inclusivo (`now - N dias`), ou nenhum.
    pub fn lower_bound(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.days().map(|n| now - Duration::days(n))
    }
}

// Query string comum às listagens
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// Ausente = todos os hotéis acessíveis
    pub hotel_id: Option<Uuid>,
    /// `all`, ou o valor do status (depende da listagem)
    pub status: Option<String>,
    #[serde(default)]
    pub range: DateRange,
    pub search: Option<String>,
}
