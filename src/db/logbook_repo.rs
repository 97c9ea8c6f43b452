// src/db/logbook_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::logbook::{LogbookEntry, LogbookPayload},
};

#[derive(Clone)]
pub struct LogbookRepository {
    pool: PgPool,
}

impl LogbookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_for_hotels(&self, hotels: Option<&[Uuid]>) -> Result<Vec<LogbookEntry>, AppError> {
        let entries = sqlx::query_as::<_, LogbookEntry>(
            r#"
            SELECT * FROM logbook_entries
            WHERE ($1::uuid[] IS NULL OR hotel_id = ANY($1))
            ORDER BY entry_date DESC, created_at DESC
            "#,
        )
            .bind(hotels)
            .fetch_all(&self.pool)
            .await?;

        Ok(entries)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<LogbookEntry>, AppError> {
        let entry = sqlx::query_as::<_, LogbookEntry>("SELECT * FROM logbook_entries WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(entry)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        input: &LogbookPayload,
        author_id: Uuid,
        author_name: &str,
    ) -> Result<LogbookEntry, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entry = sqlx::query_as::<_, LogbookEntry>(
            r#"
            INSERT INTO logbook_entries (hotel_id, entry_date, author_id, author_name, service, content, important)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
            .bind(input.hotel_id)
            .bind(input.entry_date)
            .bind(author_id)
            .bind(author_name)
            .bind(&input.service)
            .bind(&input.content)
            .bind(input.important)
            .fetch_one(executor)
            .await?;

        Ok(entry)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM logbook_entries WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound(format!("logbook entry {}", id)));
        }
        Ok(())
    }
}
