// src/db/lost_item_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::lost_item::{LostItem, LostItemPayload},
};

#[derive(Clone)]
pub struct LostItemRepository {
    pool: PgPool,
}

impl LostItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_for_hotels(&self, hotels: Option<&[Uuid]>) -> Result<Vec<LostItem>, AppError> {
        let items = sqlx::query_as::<_, LostItem>(
            r#"
            SELECT * FROM lost_items
            WHERE ($1::uuid[] IS NULL OR hotel_id = ANY($1))
            ORDER BY found_at DESC
            "#,
        )
            .bind(hotels)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<LostItem>, AppError> {
        let item = sqlx::query_as::<_, LostItem>("SELECT * FROM lost_items WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(item)
    }

    // O payload já chega normalizado pelas regras de devolução
    pub async fn create<'e, E>(&self, executor: E, input: &LostItemPayload) -> Result<LostItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, LostItem>(
            r#"
            INSERT INTO lost_items (
                hotel_id, found_at, location_id, item_type_id, description, storage_location,
                found_by, status, returned_by, returned_date, returned_notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
            .bind(input.hotel_id)
            .bind(input.found_at)
            .bind(input.location_id)
            .bind(input.item_type_id)
            .bind(&input.description)
            .bind(&input.storage_location)
            .bind(&input.found_by)
            .bind(input.status)
            .bind(&input.returned_by)
            .bind(input.returned_date)
            .bind(&input.returned_notes)
            .fetch_one(executor)
            .await?;

        Ok(item)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        input: &LostItemPayload,
    ) -> Result<LostItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, LostItem>(
            r#"
            UPDATE lost_items SET
                hotel_id = $2, found_at = $3, location_id = $4, item_type_id = $5,
                description = $6, storage_location = $7, found_by = $8, status = $9,
                returned_by = $10, returned_date = $11, returned_notes = $12
            WHERE id = $1
            RETURNING *
            "#,
        )
            .bind(id)
            .bind(input.hotel_id)
            .bind(input.found_at)
            .bind(input.location_id)
            .bind(input.item_type_id)
            .bind(&input.description)
            .bind(&input.storage_location)
            .bind(&input.found_by)
            .bind(input.status)
            .bind(&input.returned_by)
            .bind(input.returned_date)
            .bind(&input.returned_notes)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("lost item {}", id)))
    }

    pub async fn set_photo<'e, E>(&self, executor: E, id: Uuid, path: &str) -> Result<LostItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, LostItem>("UPDATE lost_items SET photo_path = $2 WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(path)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("lost item {}", id)))
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM lost_items WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound(format!("lost item {}", id)));
        }
        Ok(())
    }
}
