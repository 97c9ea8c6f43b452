// src/models/module.rs

use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

// Conjunto fechado de módulos da aplicação. O ID é o próprio slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppModule {
    Incidents,
    Maintenance,
    LostFound,
    Logbook,
    Checklists,
    Users,
    Settings,
}

impl AppModule {
    pub const ALL: [AppModule; 7] = [
        AppModule::Incidents,
        AppModule::Maintenance,
        AppModule::LostFound,
        AppModule::Logbook,
        AppModule::Checklists,
        AppModule::Users,
        AppModule::Settings,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            AppModule::Incidents => "incidents",
            AppModule::Maintenance => "maintenance",
            AppModule::LostFound => "lost_found",
            AppModule::Logbook => "logbook",
            AppModule::Checklists => "checklists",
            AppModule::Users => "users",
            AppModule::Settings => "settings",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.slug() == slug)
    }
}

// Linha da tabela `modules` (catálogo exibido na tela de permissões)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModuleInfo {
    #[schema(example = "lost_found")]
    pub id: String,
    #[schema(example = "Lost & Found")]
    pub name: String,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_round_trip() {
        for module in AppModule::ALL {
            assert_eq!(AppModule::from_slug(module.slug()), Some(module));
        }
        assert_eq!(AppModule::from_slug("gamification"), None);
    }
}
