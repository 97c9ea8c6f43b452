pub mod auth;
pub mod checklist;
pub mod dashboard;
pub mod events;
pub mod filters;
pub mod hotel;
pub mod incident;
pub mod logbook;
pub mod lost_item;
pub mod module;
pub mod parameter;
pub mod technician;
