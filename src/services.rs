pub mod access;
pub mod auth;
pub mod checklist_service;
pub mod dashboard_service;
pub mod events;
pub mod filtering;
pub mod incident_service;
pub mod logbook_service;
pub mod lost_item_service;
pub mod settings_service;
pub mod storage_service;
pub mod technician_service;
pub mod user_service;
