// src/db/checklist_repo.rs

use chrono::{NaiveDate, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::checklist::{ChecklistItem, ChecklistMission, MissionPayload, NewChecklistItem},
};

#[derive(Clone)]
pub struct ChecklistRepository {
    pool: PgPool,
}

impl ChecklistRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  MISSÕES
    // =========================================================================

    pub async fn list_missions(&self, hotels: Option<&[Uuid]>) -> Result<Vec<ChecklistMission>, AppError> {
        let missions = sqlx::query_as::<_, ChecklistMission>(
            r#"
            SELECT * FROM checklist_missions
            WHERE ($1::uuid[] IS NULL OR hotels && $1)
            ORDER BY service, title
            "#,
        )
            .bind(hotels)
            .fetch_all(&self.pool)
            .await?;

        Ok(missions)
    }

    pub async fn find_mission(&self, id: Uuid) -> Result<Option<ChecklistMission>, AppError> {
        let mission = sqlx::query_as::<_, ChecklistMission>("SELECT * FROM checklist_missions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(mission)
    }

    pub async fn create_mission<'e, E>(&self, executor: E, input: &MissionPayload) -> Result<ChecklistMission, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mission = sqlx::query_as::<_, ChecklistMission>(
            r#"
            INSERT INTO checklist_missions (title, service, description, hotels, permanent, active)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
            .bind(&input.title)
            .bind(&input.service)
            .bind(&input.description)
            .bind(&input.hotels)
            .bind(input.permanent)
            .bind(input.active)
            .fetch_one(executor)
            .await?;

        Ok(mission)
    }

    pub async fn update_mission<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        input: &MissionPayload,
    ) -> Result<ChecklistMission, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, ChecklistMission>(
            r#"
            UPDATE checklist_missions SET
                title = $2, service = $3, description = $4, hotels = $5, permanent = $6, active = $7
            WHERE id = $1
            RETURNING *
            "#,
        )
            .bind(id)
            .bind(&input.title)
            .bind(&input.service)
            .bind(&input.description)
            .bind(&input.hotels)
            .bind(input.permanent)
            .bind(input.active)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("mission {}", id)))
    }

    // Os itens já gerados ficam (mission_id vira NULL pela FK)
    pub async fn delete_mission<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM checklist_missions WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound(format!("mission {}", id)));
        }
        Ok(())
    }

    /// IDs das missões que já geraram algum item neste hotel (em qualquer data).
    pub async fn missions_ever_generated<'e, E>(&self, executor: E, hotel_id: Uuid) -> Result<Vec<Uuid>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT mission_id FROM checklist_items
            WHERE hotel_id = $1 AND mission_id IS NOT NULL
            "#,
        )
            .bind(hotel_id)
            .fetch_all(executor)
            .await?;
        Ok(ids)
    }

    // =========================================================================
    //  ITENS
    // =========================================================================

    pub async fn list_items<'e, E>(
        &self,
        executor: E,
        hotel_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<ChecklistItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, ChecklistItem>(
            r#"
            SELECT * FROM checklist_items
            WHERE hotel_id = $1 AND date = $2
            ORDER BY service, title
            "#,
        )
            .bind(hotel_id)
            .bind(date)
            .fetch_all(executor)
            .await?;

        Ok(items)
    }

    pub async fn find_item(&self, id: Uuid) -> Result<Option<ChecklistItem>, AppError> {
        let item = sqlx::query_as::<_, ChecklistItem>("SELECT * FROM checklist_items WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(item)
    }

    /// Serializa as escritas de um (hotel, dia) até o fim da transação.
    pub async fn lock_day<'e, E>(&self, executor: E, hotel_id: Uuid, date: NaiveDate) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1::text || ':' || $2::text, 0))")
            .bind(hotel_id)
            .bind(date)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// `None` quando o par (missão, hotel, data) já existe.
    pub async fn insert_item<'e, E>(
        &self,
        executor: E,
        item: &NewChecklistItem,
    ) -> Result<Option<ChecklistItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let inserted = sqlx::query_as::<_, ChecklistItem>(
            r#"
            INSERT INTO checklist_items (mission_id, hotel_id, date, title, service, completed)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (mission_id, hotel_id, date) DO NOTHING
            RETURNING *
            "#,
        )
            .bind(item.mission_id)
            .bind(item.hotel_id)
            .bind(item.date)
            .bind(&item.title)
            .bind(&item.service)
            .bind(item.completed)
            .fetch_optional(executor)
            .await?;

        Ok(inserted)
    }

    pub async fn set_completed<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        completed: bool,
        user_id: Uuid,
    ) -> Result<ChecklistItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let (completed_by, completed_at) = if completed {
            (Some(user_id), Some(Utc::now()))
        } else {
            (None, None)
        };

        sqlx::query_as::<_, ChecklistItem>(
            r#"
            UPDATE checklist_items SET completed = $2, completed_by = $3, completed_at = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
            .bind(id)
            .bind(completed)
            .bind(completed_by)
            .bind(completed_at)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("checklist item {}", id)))
    }
}
