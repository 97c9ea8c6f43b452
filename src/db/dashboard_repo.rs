// src/db/dashboard_repo.rs

use chrono::{Duration, NaiveDate, Utc};
use sqlx::{Acquire, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        dashboard::DashboardSummary,
        parameter::{INCIDENT_STATUS_CLOSED, INCIDENT_STATUS_IN_PROGRESS, INCIDENT_STATUS_OPEN},
    },
};

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // Resumo geral. `hotels = None` significa todos os hotéis (system_admin).
    pub async fn get_summary<'e, E>(
        &self,
        executor: E,
        hotels: Option<&[Uuid]>,
        today: NaiveDate,
    ) -> Result<DashboardSummary, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut tx = begin_snapshot(executor).await?;

        // A. Incidentes por status
        let count_status = r#"
            SELECT COUNT(*) FROM incidents
            WHERE ($1::uuid[] IS NULL OR hotel_id = ANY($1)) AND status_id = $2
        "#;

        let open_incidents: i64 = sqlx::query_scalar(count_status)
            .bind(hotels)
            .bind(INCIDENT_STATUS_OPEN)
            .fetch_one(&mut *tx)
            .await?;

        let in_progress_incidents: i64 = sqlx::query_scalar(count_status)
            .bind(hotels)
            .bind(INCIDENT_STATUS_IN_PROGRESS)
            .fetch_one(&mut *tx)
            .await?;

        // B. Encerrados nos últimos 30 dias
        let since = Utc::now() - Duration::days(30);
        let closed_incidents_last_30_days: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM incidents
            WHERE ($1::uuid[] IS NULL OR hotel_id = ANY($1))
              AND status_id = $2
              AND updated_at >= $3
            "#,
        )
            .bind(hotels)
            .bind(INCIDENT_STATUS_CLOSED)
            .bind(since)
            .fetch_one(&mut *tx)
            .await?;

        // C. Objetos perdidos ainda guardados
        let conserved_lost_items: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM lost_items
            WHERE ($1::uuid[] IS NULL OR hotel_id = ANY($1)) AND status = 'conserved'
            "#,
        )
            .bind(hotels)
            .fetch_one(&mut *tx)
            .await?;

        // D. Checklist do dia (concluídos / total)
        let (done, total): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FILTER (WHERE completed), COUNT(*)
            FROM checklist_items
            WHERE ($1::uuid[] IS NULL OR hotel_id = ANY($1)) AND date = $2
            "#,
        )
            .bind(hotels)
            .bind(today)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(DashboardSummary {
            open_incidents,
            in_progress_incidents,
            closed_incidents_last_30_days,
            conserved_lost_items,
            checklist_completion_today: completion_percent(done, total),
        })
    }
}

/// Transação só de leitura em REPEATABLE READ: todas as consultas enxergam o mesmo snapshot.
pub(crate) async fn begin_snapshot<'e, A>(executor: A) -> Result<Transaction<'e, Postgres>, AppError>
where
    A: Acquire<'e, Database = Postgres>,
{
    let mut tx = executor.begin().await?;
    sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
        .execute(&mut *tx)
        .await?;
    Ok(tx)
}

pub(crate) fn completion_percent(done: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (done as f64 / total as f64 * 100.0).round()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::{insert_hotel, test_pool};

    #[test]
    fn completion_handles_empty_day() {
        assert_eq!(completion_percent(0, 0), 0.0);
        assert_eq!(completion_percent(3, 4), 75.0);
        assert_eq!(completion_percent(4, 4), 100.0);
    }

    #[tokio::test]
    async fn summary_reads_from_a_single_snapshot() {
        let Some(pool) = test_pool().await else { return };

        let mut tx = begin_snapshot(&pool).await.unwrap();
        let isolation: String = sqlx::query_scalar("SHOW transaction_isolation")
            .fetch_one(&mut *tx)
            .await
            .unwrap();
        let read_only: String = sqlx::query_scalar("SHOW transaction_read_only")
            .fetch_one(&mut *tx)
            .await
            .unwrap();
        tx.rollback().await.unwrap();

        assert_eq!(isolation, "repeatable read");
        assert_eq!(read_only, "on");
    }

    #[tokio::test]
    async fn summary_of_a_fresh_hotel_is_all_zero() {
        let Some(pool) = test_pool().await else { return };
        let hotel = insert_hotel(&pool).await;
        let repo = DashboardRepository::new(pool.clone());

        let summary = repo
            .get_summary(repo.pool(), Some(std::slice::from_ref(&hotel)), Utc::now().date_naive())
            .await
            .unwrap();

        assert_eq!(summary.open_incidents, 0);
        assert_eq!(summary.conserved_lost_items, 0);
        assert_eq!(summary.checklist_completion_today, 0.0);
    }
}
