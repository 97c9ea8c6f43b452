// src/services/technician_service.rs

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        db_utils::begin_audited_tx,
        error::{invalid_field, AppError},
    },
    db::TechnicianRepository,
    models::{
        events::ChangeAction,
        filters::ListQuery,
        technician::{Technician, TechnicianPayload},
    },
    services::{
        access::AccessScope,
        events::EventHub,
        filtering::{active_status_filter, filter_records, RecordFilters},
        user_service::{merge_hotels, normalize_access},
    },
};

const COLLECTION: &str = "technicians";

#[derive(Clone)]
pub struct TechnicianService {
    repo: TechnicianRepository,
    pool: PgPool,
    events: EventHub,
}

impl TechnicianService {
    pub fn new(repo: TechnicianRepository, pool: PgPool, events: EventHub) -> Self {
        Self { repo, pool, events }
    }

    pub async fn list_technicians(
        &self,
        scope: &AccessScope,
        query: &ListQuery,
    ) -> Result<Vec<Technician>, AppError> {
        let status = active_status_filter(query.status.as_deref())?;
        let filters = RecordFilters::from_query(query, status, scope)?;

        let hotels = filters.hotel_ids(scope);
        let technicians = self.repo.list_for_hotels(hotels.as_deref()).await?;

        Ok(filter_records(technicians, &filters, scope, Utc::now()))
    }

    // Visível se atender pelo menos um hotel do escopo
    pub async fn get_technician(&self, scope: &AccessScope, id: Uuid) -> Result<Technician, AppError> {
        let technician = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("technician {}", id)))?;

        if !technician.hotels.iter().any(|h| scope.can_access_hotel(*h)) {
            return Err(AppError::HotelAccessDenied);
        }
        Ok(technician)
    }

    fn prepare(scope: &AccessScope, mut payload: TechnicianPayload) -> Result<TechnicianPayload, AppError> {
        payload.validate()?;
        scope.require_any_hotel()?;

        let (hotels, modules) = normalize_access(&payload.hotels, &payload.modules)?;
        if hotels.is_empty() {
            return Err(invalid_field("hotels", "validation.required"));
        }
        if !scope.can_grant_hotels(&hotels) {
            return Err(AppError::HotelAccessDenied);
        }
        payload.hotels = hotels;
        payload.modules = modules;
        Ok(payload)
    }

    pub async fn create_technician(
        &self,
        scope: &AccessScope,
        payload: TechnicianPayload,
    ) -> Result<Technician, AppError> {
        let payload = Self::prepare(scope, payload)?;

        let mut tx = begin_audited_tx(&self.pool, scope.user_id).await?;
        let technician = self.repo.create(&mut *tx, &payload).await?;
        tx.commit().await?;

        tracing::info!("🔧 Técnico {} cadastrado", technician.id);
        self.events.publish(COLLECTION, technician.id, &technician.hotels, ChangeAction::Created);
        Ok(technician)
    }

    pub async fn update_technician(
        &self,
        scope: &AccessScope,
        id: Uuid,
        payload: TechnicianPayload,
    ) -> Result<Technician, AppError> {
        let current = self.get_technician(scope, id).await?;
        let mut payload = Self::prepare(scope, payload)?;
        payload.hotels = merge_hotels(scope, &current.hotels, payload.hotels);

        let mut tx = begin_audited_tx(&self.pool, scope.user_id).await?;
        let technician = self.repo.update(&mut *tx, id, &payload).await?;
        tx.commit().await?;

        tracing::info!("🔧 Técnico {} atualizado", id);
        self.events.publish(COLLECTION, id, &technician.hotels, ChangeAction::Updated);
        Ok(technician)
    }

    pub async fn delete_technician(&self, scope: &AccessScope, id: Uuid) -> Result<(), AppError> {
        let technician = self.get_technician(scope, id).await?;

        let mut tx = begin_audited_tx(&self.pool, scope.user_id).await?;
        self.repo.delete(&mut *tx, id).await?;
        tx.commit().await?;

        tracing::info!("🗑️ Técnico {} removido", id);
        self.events.publish(COLLECTION, id, &technician.hotels, ChangeAction::Deleted);
        Ok(())
    }
}
