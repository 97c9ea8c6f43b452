pub mod user_repo;
pub use user_repo::UserRepository;
pub mod settings_repo;
pub use settings_repo::SettingsRepository;
pub mod incident_repo;
pub use incident_repo::IncidentRepository;
pub mod lost_item_repo;
pub use lost_item_repo::LostItemRepository;
pub mod technician_repo;
pub use technician_repo::TechnicianRepository;
pub mod checklist_repo;
pub use checklist_repo::ChecklistRepository;
pub mod logbook_repo;
pub use logbook_repo::LogbookRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;

#[cfg(test)]
pub(crate) mod test_support {
    use sqlx::{postgres::PgPoolOptions, PgPool};
    use uuid::Uuid;

    /// Banco de testes a partir de `DATABASE_URL`; sem ela, o teste é pulado.
    pub(crate) async fn test_pool() -> Option<PgPool> {
        dotenvy::dotenv().ok();
        let Ok(url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL ausente, pulando teste de banco");
            return None;
        };
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await
            .expect("conexão com o banco de testes");
        sqlx::migrate!().run(&pool).await.expect("migrações");
        Some(pool)
    }

    pub(crate) async fn insert_hotel(pool: &PgPool) -> Uuid {
        sqlx::query_scalar("INSERT INTO hotels (name) VALUES ($1) RETURNING id")
            .bind(format!("Hotel {}", Uuid::new_v4()))
            .fetch_one(pool)
            .await
            .expect("hotel")
    }

    pub(crate) async fn insert_user(pool: &PgPool, active: bool) -> Uuid {
        sqlx::query_scalar(
            "INSERT INTO users (email, password_hash, full_name, active) VALUES ($1, 'x', 'Teste', $2) RETURNING id",
        )
            .bind(format!("{}@hotel.test", Uuid::new_v4()))
            .bind(active)
            .fetch_one(pool)
            .await
            .expect("usuário")
    }
}
