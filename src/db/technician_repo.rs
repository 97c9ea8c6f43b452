// src/db/technician_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::technician::{Technician, TechnicianPayload},
};

#[derive(Clone)]
pub struct TechnicianRepository {
    pool: PgPool,
}

impl TechnicianRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Técnicos que atendem ao menos um dos hotéis (`&&` = sobreposição de arrays).
    pub async fn list_for_hotels(&self, hotels: Option<&[Uuid]>) -> Result<Vec<Technician>, AppError> {
        let technicians = sqlx::query_as::<_, Technician>(
            r#"
            SELECT * FROM technicians
            WHERE ($1::uuid[] IS NULL OR hotels && $1)
            ORDER BY name
            "#,
        )
            .bind(hotels)
            .fetch_all(&self.pool)
            .await?;

        Ok(technicians)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Technician>, AppError> {
        let technician = sqlx::query_as::<_, Technician>("SELECT * FROM technicians WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(technician)
    }

    pub async fn create<'e, E>(&self, executor: E, input: &TechnicianPayload) -> Result<Technician, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let technician = sqlx::query_as::<_, Technician>(
            r#"
            INSERT INTO technicians (
                name, email, phone, company, specialties, hourly_rate, hotels, modules, active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.company)
            .bind(&input.specialties)
            .bind(input.hourly_rate)
            .bind(&input.hotels)
            .bind(&input.modules)
            .bind(input.active)
            .fetch_one(executor)
            .await?;

        Ok(technician)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        input: &TechnicianPayload,
    ) -> Result<Technician, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Technician>(
            r#"
            UPDATE technicians SET
                name = $2, email = $3, phone = $4, company = $5, specialties = $6,
                hourly_rate = $7, hotels = $8, modules = $9, active = $10
            WHERE id = $1
            RETURNING *
            "#,
        )
            .bind(id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.company)
            .bind(&input.specialties)
            .bind(input.hourly_rate)
            .bind(&input.hotels)
            .bind(&input.modules)
            .bind(input.active)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("technician {}", id)))
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM technicians WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound(format!("technician {}", id)));
        }
        Ok(())
    }
}
