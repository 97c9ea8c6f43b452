// src/services/incident_service.rs

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    common::{
        db_utils::begin_audited_tx,
        error::{invalid_field, AppError},
    },
    db::{IncidentRepository, SettingsRepository},
    models::{
        events::ChangeAction,
        filters::ListQuery,
        incident::{AttachmentLink, Incident, IncidentPayload, IncidentResolution},
        parameter::{ParameterKind, INCIDENT_STATUS_CLOSED, INCIDENT_STATUS_OPEN},
    },
    services::{
        access::AccessScope,
        events::EventHub,
        filtering::{filter_records, incident_status_filter, RecordFilters},
        storage_service::{incident_attachment_path, StorageService},
    },
};

const COLLECTION: &str = "incidents";
const MIN_RESOLUTION_CHARS: usize = 10;

fn violation(errors: &mut ValidationErrors, field: &'static str, code: &'static str, message_key: &'static str) {
    let mut err = ValidationError::new(code);
    err.message = Some(message_key.into());
    errors.add(field, err);
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

/// Regras para encerrar um incidente. Todas as violações voltam juntas.
pub fn validate_close_out(
    status_id: Uuid,
    resolution: Option<&IncidentResolution>,
) -> Result<(), ValidationErrors> {
    if status_id != INCIDENT_STATUS_CLOSED {
        return Ok(());
    }

    let empty = IncidentResolution::default();
    let resolution = resolution.unwrap_or(&empty);
    let mut errors = ValidationErrors::new();

    let description_chars = resolution
        .description
        .as_deref()
        .map(|d| d.trim().chars().count())
        .unwrap_or(0);
    if description_chars < MIN_RESOLUTION_CHARS {
        violation(&mut errors, "resolutionDescription", "length", "validation.resolution_description_min");
    }
    if is_blank(resolution.concluded_by.as_deref()) {
        violation(&mut errors, "concludedBy", "required", "validation.concluded_by_required");
    }
    if resolution.satisfaction_id.is_none() {
        violation(&mut errors, "satisfactionId", "required", "validation.satisfaction_required");
    }
    if resolution.resolution_type_id.is_none() {
        violation(&mut errors, "resolutionTypeId", "required", "validation.resolution_type_required");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[derive(Clone)]
pub struct IncidentService {
    repo: IncidentRepository,
    settings_repo: SettingsRepository,
    storage: StorageService,
    pool: PgPool,
    events: EventHub,
}

impl IncidentService {
    pub fn new(
        repo: IncidentRepository,
        settings_repo: SettingsRepository,
        storage: StorageService,
        pool: PgPool,
        events: EventHub,
    ) -> Self {
        Self { repo, settings_repo, storage, pool, events }
    }

    pub async fn list_incidents(&self, scope: &AccessScope, query: &ListQuery) -> Result<Vec<Incident>, AppError> {
        let status = incident_status_filter(query.status.as_deref())?;
        let filters = RecordFilters::from_query(query, status, scope)?;

        let hotels = filters.hotel_ids(scope);
        let incidents = self.repo.list_for_hotels(hotels.as_deref()).await?;

        Ok(filter_records(incidents, &filters, scope, Utc::now()))
    }

    pub async fn get_incident(&self, scope: &AccessScope, id: Uuid) -> Result<Incident, AppError> {
        let incident = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("incident {}", id)))?;
        scope.require_hotel(incident.hotel_id)?;
        Ok(incident)
    }

    // O status precisa ser um parâmetro do tipo "status de incidente"
    async fn resolve_status(&self, requested: Option<Uuid>) -> Result<Uuid, AppError> {
        let Some(status_id) = requested else {
            return Ok(INCIDENT_STATUS_OPEN);
        };
        match self.settings_repo.find_parameter(status_id).await? {
            Some(p) if p.kind == ParameterKind::IncidentStatus => Ok(status_id),
            _ => Err(invalid_field("statusId", "validation.invalid_status")),
        }
    }

    pub async fn create_incident(&self, scope: &AccessScope, payload: IncidentPayload) -> Result<Incident, AppError> {
        payload.validate()?;
        scope.require_hotel(payload.hotel_id)?;

        let status_id = self.resolve_status(payload.status_id).await?;
        validate_close_out(status_id, payload.resolution.as_ref())?;

        let mut tx = begin_audited_tx(&self.pool, scope.user_id).await?;
        let incident = self.repo.create(&mut *tx, &payload, status_id, scope.user_id).await?;
        tx.commit().await?;

        tracing::info!("🚨 Incidente {} criado no hotel {}", incident.id, incident.hotel_id);
        self.events.publish(COLLECTION, incident.id, &[incident.hotel_id], ChangeAction::Created);
        Ok(incident)
    }

    pub async fn update_incident(
        &self,
        scope: &AccessScope,
        id: Uuid,
        payload: IncidentPayload,
    ) -> Result<Incident, AppError> {
        payload.validate()?;
        scope.require_hotel(payload.hotel_id)?;

        let (_current, status_id) =
            tokio::try_join!(self.get_incident(scope, id), self.resolve_status(payload.status_id))?;
        validate_close_out(status_id, payload.resolution.as_ref())?;

        let mut tx = begin_audited_tx(&self.pool, scope.user_id).await?;
        let incident = self.repo.update(&mut *tx, id, &payload, status_id).await?;
        tx.commit().await?;

        tracing::info!("🚨 Incidente {} atualizado (status {})", id, status_id);
        self.events.publish(COLLECTION, id, &[incident.hotel_id], ChangeAction::Updated);
        Ok(incident)
    }

    pub async fn delete_incident(&self, scope: &AccessScope, id: Uuid) -> Result<(), AppError> {
        let incident = self.get_incident(scope, id).await?;

        let mut tx = begin_audited_tx(&self.pool, scope.user_id).await?;
        self.repo.delete(&mut *tx, id).await?;
        tx.commit().await?;

        for path in &incident.attachments {
            self.storage.delete_quietly(path).await;
        }

        tracing::info!("🗑️ Incidente {} removido", id);
        self.events.publish(COLLECTION, id, &[incident.hotel_id], ChangeAction::Deleted);
        Ok(())
    }

    /// Envia o arquivo e depois registra o caminho. Se o registro falhar, o blob é removido.
    pub async fn add_attachment(
        &self,
        scope: &AccessScope,
        id: Uuid,
        filename: &str,
        bytes: &[u8],
    ) -> Result<Incident, AppError> {
        let incident = self.get_incident(scope, id).await?;
        let path = incident_attachment_path(incident.hotel_id, filename, Utc::now());

        self.storage.upload(&path, bytes).await?;

        let updated = async {
            let mut tx = begin_audited_tx(&self.pool, scope.user_id).await?;
            let updated = self.repo.append_attachment(&mut *tx, id, &path).await?;
            tx.commit().await?;
            Ok::<_, AppError>(updated)
        }
        .await;

        match updated {
            Ok(incident) => {
                self.events.publish(COLLECTION, id, &[incident.hotel_id], ChangeAction::Updated);
                Ok(incident)
            }
            Err(e) => {
                tracing::warn!("⚠️ Anexo {} sem registro, removendo: {}", path, e);
                self.storage.delete_quietly(&path).await;
                Err(e)
            }
        }
    }

    pub async fn attachment_links(&self, scope: &AccessScope, id: Uuid) -> Result<Vec<AttachmentLink>, AppError> {
        let incident = self.get_incident(scope, id).await?;
        incident
            .attachments
            .into_iter()
            .map(|path| {
                let url = self.storage.signed_url(&path)?;
                Ok(AttachmentLink { path, url })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parameter::INCIDENT_STATUS_IN_PROGRESS;

    fn full_resolution(description: &str) -> IncidentResolution {
        IncidentResolution {
            description: Some(description.to_string()),
            resolution_type_id: Some(Uuid::new_v4()),
            concluded_by: Some("Gerente".to_string()),
            satisfaction_id: Some(Uuid::new_v4()),
            compensation_amount: None,
        }
    }

    #[test]
    fn nine_characters_are_not_enough() {
        let resolution = full_resolution("123456789");
        let errors = validate_close_out(INCIDENT_STATUS_CLOSED, Some(&resolution)).unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("resolutionDescription"));
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn ten_characters_close_the_incident() {
        let resolution = full_resolution("1234567890");
        assert!(validate_close_out(INCIDENT_STATUS_CLOSED, Some(&resolution)).is_ok());
    }

    #[test]
    fn padding_does_not_count() {
        let resolution = full_resolution("   12345   ");
        assert!(validate_close_out(INCIDENT_STATUS_CLOSED, Some(&resolution)).is_err());
    }

    #[test]
    fn every_violation_is_reported() {
        let errors = validate_close_out(INCIDENT_STATUS_CLOSED, None).unwrap_err();
        let fields = errors.field_errors();
        for field in ["resolutionDescription", "concludedBy", "satisfactionId", "resolutionTypeId"] {
            assert!(fields.contains_key(field), "missing {}", field);
        }

        let blank = IncidentResolution {
            concluded_by: Some("   ".into()),
            ..full_resolution("Quarto trocado e jantar oferecido")
        };
        let errors = validate_close_out(INCIDENT_STATUS_CLOSED, Some(&blank)).unwrap_err();
        assert!(errors.field_errors().contains_key("concludedBy"));
    }

    #[test]
    fn other_statuses_are_not_checked() {
        assert!(validate_close_out(INCIDENT_STATUS_OPEN, None).is_ok());
        assert!(validate_close_out(INCIDENT_STATUS_IN_PROGRESS, None).is_ok());
    }
}
