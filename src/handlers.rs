pub mod auth;
pub mod checklists;
pub mod dashboard;
pub mod events;
pub mod files;
pub mod incidents;
pub mod logbook;
pub mod lost_items;
pub mod settings;
pub mod technicians;
pub mod users;
