// src/services/lost_item_service.rs

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    common::{db_utils::begin_audited_tx, error::AppError},
    db::LostItemRepository,
    models::{
        events::ChangeAction,
        filters::ListQuery,
        lost_item::{LostItem, LostItemDetail, LostItemPayload, LostItemStatus},
    },
    services::{
        access::AccessScope,
        events::EventHub,
        filtering::{filter_records, lost_item_status_filter, RecordFilters},
        storage_service::{lost_item_photo_path, StorageService},
    },
};

const COLLECTION: &str = "lost_items";

/// Normaliza os campos de devolução conforme o status.
pub fn apply_return_rules(
    mut payload: LostItemPayload,
    now: DateTime<Utc>,
) -> Result<LostItemPayload, ValidationErrors> {
    match payload.status {
        LostItemStatus::Returned => {
            let returned_by = payload
                .returned_by
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string);

            let Some(returned_by) = returned_by else {
                let mut err = ValidationError::new("required");
                err.message = Some("validation.returned_by_required".into());
                let mut errors = ValidationErrors::new();
                errors.add("returnedBy", err);
                return Err(errors);
            };

            payload.returned_by = Some(returned_by);
            payload.returned_date.get_or_insert(now);
        }
        LostItemStatus::Conserved => {
            payload.returned_by = None;
            payload.returned_date = None;
            payload.returned_notes = None;
        }
    }
    Ok(payload)
}

#[derive(Clone)]
pub struct LostItemService {
    repo: LostItemRepository,
    storage: StorageService,
    pool: PgPool,
    events: EventHub,
}

impl LostItemService {
    pub fn new(repo: LostItemRepository, storage: StorageService, pool: PgPool, events: EventHub) -> Self {
        Self { repo, storage, pool, events }
    }

    pub async fn list_items(&self, scope: &AccessScope, query: &ListQuery) -> Result<Vec<LostItem>, AppError> {
        let status = lost_item_status_filter(query.status.as_deref())?;
        let filters = RecordFilters::from_query(query, status, scope)?;

        let hotels = filters.hotel_ids(scope);
        let items = self.repo.list_for_hotels(hotels.as_deref()).await?;

        Ok(filter_records(items, &filters, scope, Utc::now()))
    }

    async fn find_item(&self, scope: &AccessScope, id: Uuid) -> Result<LostItem, AppError> {
        let item = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("lost item {}", id)))?;
        scope.require_hotel(item.hotel_id)?;
        Ok(item)
    }

    /// Registro com a URL temporária da foto.
    pub async fn get_item(&self, scope: &AccessScope, id: Uuid) -> Result<LostItemDetail, AppError> {
        let item = self.find_item(scope, id).await?;
        let photo_url = item
            .photo_path
            .as_deref()
            .map(|path| self.storage.signed_url(path))
            .transpose()?;
        Ok(LostItemDetail { item, photo_url })
    }

    pub async fn create_item(&self, scope: &AccessScope, payload: LostItemPayload) -> Result<LostItem, AppError> {
        payload.validate()?;
        scope.require_hotel(payload.hotel_id)?;
        let payload = apply_return_rules(payload, Utc::now())?;

        let mut tx = begin_audited_tx(&self.pool, scope.user_id).await?;
        let item = self.repo.create(&mut *tx, &payload).await?;
        tx.commit().await?;

        tracing::info!("🧳 Objeto {} registrado no hotel {}", item.id, item.hotel_id);
        self.events.publish(COLLECTION, item.id, &[item.hotel_id], ChangeAction::Created);
        Ok(item)
    }

    pub async fn update_item(
        &self,
        scope: &AccessScope,
        id: Uuid,
        payload: LostItemPayload,
    ) -> Result<LostItem, AppError> {
        payload.validate()?;
        scope.require_hotel(payload.hotel_id)?;
        self.find_item(scope, id).await?;
        let payload = apply_return_rules(payload, Utc::now())?;

        let mut tx = begin_audited_tx(&self.pool, scope.user_id).await?;
        let item = self.repo.update(&mut *tx, id, &payload).await?;
        tx.commit().await?;

        tracing::info!("🧳 Objeto {} atualizado ({:?})", id, item.status);
        self.events.publish(COLLECTION, id, &[item.hotel_id], ChangeAction::Updated);
        Ok(item)
    }

    pub async fn delete_item(&self, scope: &AccessScope, id: Uuid) -> Result<(), AppError> {
        let item = self.find_item(scope, id).await?;

        let mut tx = begin_audited_tx(&self.pool, scope.user_id).await?;
        self.repo.delete(&mut *tx, id).await?;
        tx.commit().await?;

        if let Some(path) = &item.photo_path {
            self.storage.delete_quietly(path).await;
        }

        tracing::info!("🗑️ Objeto {} removido", id);
        self.events.publish(COLLECTION, id, &[item.hotel_id], ChangeAction::Deleted);
        Ok(())
    }

    /// Troca a foto. A anterior só sai depois que o registro aponta para a nova.
    pub async fn set_photo(
        &self,
        scope: &AccessScope,
        id: Uuid,
        filename: &str,
        bytes: &[u8],
    ) -> Result<LostItemDetail, AppError> {
        let current = self.find_item(scope, id).await?;
        let path = lost_item_photo_path(current.hotel_id, filename, Utc::now());

        self.storage.upload(&path, bytes).await?;

        let updated = async {
            let mut tx = begin_audited_tx(&self.pool, scope.user_id).await?;
            let item = self.repo.set_photo(&mut *tx, id, &path).await?;
            tx.commit().await?;
            Ok::<_, AppError>(item)
        }
        .await;

        let item = match updated {
            Ok(item) => item,
            Err(e) => {
                tracing::warn!("⚠️ Foto {} sem registro, removendo: {}", path, e);
                self.storage.delete_quietly(&path).await;
                return Err(e);
            }
        };

        if let Some(old) = current.photo_path.as_deref() {
            self.storage.delete_quietly(old).await;
        }

        self.events.publish(COLLECTION, id, &[item.hotel_id], ChangeAction::Updated);
        let photo_url = Some(self.storage.signed_url(&path)?);
        Ok(LostItemDetail { item, photo_url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(status: LostItemStatus) -> LostItemPayload {
        LostItemPayload {
            hotel_id: Uuid::new_v4(),
            found_at: Utc::now(),
            location_id: None,
            item_type_id: None,
            description: "Óculos de sol".into(),
            storage_location: Some("Armário 3".into()),
            found_by: Some("Ana".into()),
            status,
            returned_by: None,
            returned_date: None,
            returned_notes: None,
        }
    }

    #[test]
    fn returned_without_returner_is_rejected() {
        let errors = apply_return_rules(payload(LostItemStatus::Returned), Utc::now()).unwrap_err();
        assert!(errors.field_errors().contains_key("returnedBy"));

        let mut blank = payload(LostItemStatus::Returned);
        blank.returned_by = Some("  ".into());
        assert!(apply_return_rules(blank, Utc::now()).is_err());
    }

    #[test]
    fn returned_date_is_stamped_when_absent() {
        let now = Utc::now();
        let mut p = payload(LostItemStatus::Returned);
        p.returned_by = Some(" Recepção ".into());

        let normalized = apply_return_rules(p, now).unwrap();
        assert_eq!(normalized.returned_date, Some(now));
        assert_eq!(normalized.returned_by.as_deref(), Some("Recepção"));
    }

    #[test]
    fn explicit_returned_date_is_kept() {
        let earlier = Utc::now() - chrono::Duration::days(2);
        let mut p = payload(LostItemStatus::Returned);
        p.returned_by = Some("Recepção".into());
        p.returned_date = Some(earlier);

        let normalized = apply_return_rules(p, Utc::now()).unwrap();
        assert_eq!(normalized.returned_date, Some(earlier));
    }

    #[test]
    fn conserved_clears_return_fields() {
        let mut p = payload(LostItemStatus::Conserved);
        p.returned_by = Some("Recepção".into());
        p.returned_date = Some(Utc::now());
        p.returned_notes = Some("Entregue ao hóspede".into());

        let normalized = apply_return_rules(p, Utc::now()).unwrap();
        assert!(normalized.returned_by.is_none());
        assert!(normalized.returned_date.is_none());
        assert!(normalized.returned_notes.is_none());
    }
}
