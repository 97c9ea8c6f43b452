// src/db/incident_repo.rs

use sqlx::{types::Json, Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::incident::{Incident, IncidentPayload},
};

#[derive(Clone)]
pub struct IncidentRepository {
    pool: PgPool,
}

impl IncidentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// `None` = todos os hotéis (system_admin).
    pub async fn list_for_hotels(&self, hotels: Option<&[Uuid]>) -> Result<Vec<Incident>, AppError> {
        let incidents = sqlx::query_as::<_, Incident>(
            r#"
            SELECT * FROM incidents
            WHERE ($1::uuid[] IS NULL OR hotel_id = ANY($1))
            ORDER BY occurred_at DESC
            "#,
        )
            .bind(hotels)
            .fetch_all(&self.pool)
            .await?;

        Ok(incidents)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Incident>, AppError> {
        let incident = sqlx::query_as::<_, Incident>("SELECT * FROM incidents WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(incident)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        input: &IncidentPayload,
        status_id: Uuid,
        created_by: Uuid,
    ) -> Result<Incident, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let incident = sqlx::query_as::<_, Incident>(
            r#"
            INSERT INTO incidents (
                hotel_id, occurred_at, category_id, impact_id, location_id, status_id,
                description, client, resolution, received_by, assigned_to, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
            .bind(input.hotel_id)
            .bind(input.occurred_at)
            .bind(input.category_id)
            .bind(input.impact_id)
            .bind(input.location_id)
            .bind(status_id)
            .bind(&input.description)
            .bind(input.client.as_ref().map(Json))
            .bind(input.resolution.as_ref().map(Json))
            .bind(&input.received_by)
            .bind(&input.assigned_to)
            .bind(created_by)
            .fetch_one(executor)
            .await?;

        Ok(incident)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        input: &IncidentPayload,
        status_id: Uuid,
    ) -> Result<Incident, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Incident>(
            r#"
            UPDATE incidents SET
                hotel_id = $2, occurred_at = $3, category_id = $4, impact_id = $5,
                location_id = $6, status_id = $7, description = $8, client = $9,
                resolution = $10, received_by = $11, assigned_to = $12
            WHERE id = $1
            RETURNING *
            "#,
        )
            .bind(id)
            .bind(input.hotel_id)
            .bind(input.occurred_at)
            .bind(input.category_id)
            .bind(input.impact_id)
            .bind(input.location_id)
            .bind(status_id)
            .bind(&input.description)
            .bind(input.client.as_ref().map(Json))
            .bind(input.resolution.as_ref().map(Json))
            .bind(&input.received_by)
            .bind(&input.assigned_to)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("incident {}", id)))
    }

    pub async fn append_attachment<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        path: &str,
    ) -> Result<Incident, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Incident>(
            r#"
            UPDATE incidents SET attachments = array_append(attachments, $2)
            WHERE id = $1
            RETURNING *
            "#,
        )
            .bind(id)
            .bind(path)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("incident {}", id)))
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM incidents WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound(format!("incident {}", id)));
        }
        Ok(())
    }
}
