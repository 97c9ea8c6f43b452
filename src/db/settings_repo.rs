// src/db/settings_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        hotel::{Hotel, HotelPayload},
        module::ModuleInfo,
        parameter::{Parameter, ParameterKind, ParameterPayload},
    },
};

// Hotéis, listas de parâmetros e catálogo de módulos: tudo o que a tela de configurações edita
#[derive(Clone)]
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  HOTÉIS
    // =========================================================================

    pub async fn list_hotels(&self) -> Result<Vec<Hotel>, AppError> {
        let hotels = sqlx::query_as::<_, Hotel>("SELECT * FROM hotels ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(hotels)
    }

    pub async fn create_hotel<'e, E>(&self, executor: E, input: &HotelPayload) -> Result<Hotel, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let hotel = sqlx::query_as::<_, Hotel>(
            r#"
            INSERT INTO hotels (name, address, locations, categories, active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
            .bind(&input.name)
            .bind(&input.address)
            .bind(&input.locations)
            .bind(&input.categories)
            .bind(input.active)
            .fetch_one(executor)
            .await?;

        Ok(hotel)
    }

    pub async fn update_hotel<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        input: &HotelPayload,
    ) -> Result<Hotel, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Hotel>(
            r#"
            UPDATE hotels
            SET name = $2, address = $3, locations = $4, categories = $5, active = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
            .bind(id)
            .bind(&input.name)
            .bind(&input.address)
            .bind(&input.locations)
            .bind(&input.categories)
            .bind(input.active)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("hotel {}", id)))
    }

    pub async fn delete_hotel<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM hotels WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound(format!("hotel {}", id)));
        }
        Ok(())
    }

    // =========================================================================
    //  PARÂMETROS
    // =========================================================================

    pub async fn list_parameters(
        &self,
        kind: ParameterKind,
        include_inactive: bool,
    ) -> Result<Vec<Parameter>, AppError> {
        let parameters = sqlx::query_as::<_, Parameter>(
            r#"
            SELECT id, kind, label, active, position
            FROM parameters
            WHERE kind = $1 AND ($2 OR active)
            ORDER BY position, label
            "#,
        )
            .bind(kind)
            .bind(include_inactive)
            .fetch_all(&self.pool)
            .await?;

        Ok(parameters)
    }

    pub async fn find_parameter(&self, id: Uuid) -> Result<Option<Parameter>, AppError> {
        let parameter = sqlx::query_as::<_, Parameter>(
            "SELECT id, kind, label, active, position FROM parameters WHERE id = $1",
        )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(parameter)
    }

    pub async fn create_parameter<'e, E>(
        &self,
        executor: E,
        input: &ParameterPayload,
    ) -> Result<Parameter, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let parameter = sqlx::query_as::<_, Parameter>(
            r#"
            INSERT INTO parameters (kind, label, active, position)
            VALUES ($1, $2, $3, $4)
            RETURNING id, kind, label, active, position
            "#,
        )
            .bind(input.kind)
            .bind(&input.label)
            .bind(input.active)
            .bind(input.position)
            .fetch_one(executor)
            .await?;

        Ok(parameter)
    }

    // O tipo (kind) não muda depois de criado
    pub async fn update_parameter<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        input: &ParameterPayload,
    ) -> Result<Parameter, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Parameter>(
            r#"
            UPDATE parameters SET label = $2, active = $3, position = $4
            WHERE id = $1
            RETURNING id, kind, label, active, position
            "#,
        )
            .bind(id)
            .bind(&input.label)
            .bind(input.active)
            .bind(input.position)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("parameter {}", id)))
    }

    // =========================================================================
    //  MÓDULOS
    // =========================================================================

    pub async fn list_modules(&self) -> Result<Vec<ModuleInfo>, AppError> {
        let modules = sqlx::query_as::<_, ModuleInfo>(
            "SELECT id, name, description FROM modules ORDER BY position",
        )
            .fetch_all(&self.pool)
            .await?;
        Ok(modules)
    }
}
