// src/services/logbook_service.rs

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{db_utils::begin_audited_tx, error::AppError},
    db::LogbookRepository,
    models::{
        auth::User,
        events::ChangeAction,
        filters::ListQuery,
        logbook::{LogbookEntry, LogbookPayload},
    },
    services::{
        access::AccessScope,
        events::EventHub,
        filtering::{filter_records, logbook_status_filter, RecordFilters},
    },
};

const COLLECTION: &str = "logbook_entries";

#[derive(Clone)]
pub struct LogbookService {
    repo: LogbookRepository,
    pool: PgPool,
    events: EventHub,
}

impl LogbookService {
    pub fn new(repo: LogbookRepository, pool: PgPool, events: EventHub) -> Self {
        Self { repo, pool, events }
    }

    pub async fn list_entries(&self, scope: &AccessScope, query: &ListQuery) -> Result<Vec<LogbookEntry>, AppError> {
        let status = logbook_status_filter(query.status.as_deref());
        let filters = RecordFilters::from_query(query, status, scope)?;

        let hotels = filters.hotel_ids(scope);
        let entries = self.repo.list_for_hotels(hotels.as_deref()).await?;

        Ok(filter_records(entries, &filters, scope, Utc::now()))
    }

    // O autor é sempre o usuário autenticado
    pub async fn create_entry(&self, author: &User, payload: LogbookPayload) -> Result<LogbookEntry, AppError> {
        payload.validate()?;
        let scope = AccessScope::from_user(author);
        scope.require_hotel(payload.hotel_id)?;

        let mut tx = begin_audited_tx(&self.pool, author.id).await?;
        let entry = self
            .repo
            .create(&mut *tx, &payload, author.id, &author.full_name)
            .await?;
        tx.commit().await?;

        tracing::info!("📓 Entrada {} no diário do hotel {}", entry.id, entry.hotel_id);
        self.events.publish(COLLECTION, entry.id, &[entry.hotel_id], ChangeAction::Created);
        Ok(entry)
    }

    /// Só o autor ou um administrador remove a entrada.
    pub async fn delete_entry(&self, scope: &AccessScope, id: Uuid) -> Result<(), AppError> {
        let entry = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("logbook entry {}", id)))?;
        scope.require_hotel(entry.hotel_id)?;
        if entry.author_id != scope.user_id && !scope.role.is_admin() {
            return Err(AppError::Forbidden);
        }

        let mut tx = begin_audited_tx(&self.pool, scope.user_id).await?;
        self.repo.delete(&mut *tx, id).await?;
        tx.commit().await?;

        tracing::info!("🗑️ Entrada {} removida do diário", id);
        self.events.publish(COLLECTION, id, &[entry.hotel_id], ChangeAction::Deleted);
        Ok(())
    }
}
