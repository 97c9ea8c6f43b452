// src/services/checklist_service.rs

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        db_utils::begin_audited_tx,
        error::{invalid_field, AppError},
    },
    db::ChecklistRepository,
    models::{
        checklist::{ChecklistItem, ChecklistMission, MissionPayload, NewChecklistItem},
        events::ChangeAction,
    },
    services::{
        access::{AccessScope, AccessibleHotels},
        events::EventHub,
        user_service::merge_hotels,
    },
};

// ---
// Regras puras
// ---

/// Uma cópia por item de origem, na nova data e sem conclusão.
pub fn duplicate_items(items: &[ChecklistItem], to_date: NaiveDate) -> Vec<NewChecklistItem> {
    items
        .iter()
        .map(|item| NewChecklistItem {
            mission_id: item.mission_id,
            hotel_id: item.hotel_id,
            date: to_date,
            title: item.title.clone(),
            service: item.service.clone(),
            completed: false,
        })
        .collect()
}

/// Itens a criar para o hotel na data.
/// Permanentes: todo dia. Pontuais: só se o hotel nunca teve item da missão.
/// Pares (missão, hotel, data) já existentes são pulados.
pub fn items_to_generate(
    missions: &[ChecklistMission],
    hotel_id: Uuid,
    date: NaiveDate,
    existing_day: &[ChecklistItem],
    ever_generated: &[Uuid],
) -> Vec<NewChecklistItem> {
    missions
        .iter()
        .filter(|m| m.active && m.hotels.contains(&hotel_id))
        .filter(|m| m.permanent || !ever_generated.contains(&m.id))
        .filter(|m| !existing_day.iter().any(|i| i.mission_id == Some(m.id)))
        .map(|m| NewChecklistItem {
            mission_id: Some(m.id),
            hotel_id,
            date,
            title: m.title.clone(),
            service: m.service.clone(),
            completed: false,
        })
        .collect()
}

/// Cópias para o dia de destino, sem repetir o que ele já tem:
/// itens de missão casam pela missão, itens avulsos por (título, serviço).
pub fn rollover_copies(
    source: &[ChecklistItem],
    target: &[ChecklistItem],
    to_date: NaiveDate,
) -> Vec<NewChecklistItem> {
    duplicate_items(source, to_date)
        .into_iter()
        .filter(|copy| {
            !target.iter().any(|t| match copy.mission_id {
                Some(_) => t.mission_id == copy.mission_id,
                None => t.mission_id.is_none() && t.title == copy.title && t.service == copy.service,
            })
        })
        .collect()
}

fn ensure_day_complete(items: &[ChecklistItem]) -> Result<(), AppError> {
    if items.is_empty() {
        return Err(AppError::ChecklistDayEmpty);
    }
    if items.iter().any(|i| !i.completed) {
        return Err(AppError::ChecklistDayIncomplete);
    }
    Ok(())
}

#[derive(Clone)]
pub struct ChecklistService {
    repo: ChecklistRepository,
    pool: PgPool,
    events: EventHub,
}

impl ChecklistService {
    pub fn new(repo: ChecklistRepository, pool: PgPool, events: EventHub) -> Self {
        Self { repo, pool, events }
    }

    // =========================================================================
    //  MISSÕES
    // =========================================================================

    pub async fn list_missions(&self, scope: &AccessScope) -> Result<Vec<ChecklistMission>, AppError> {
        scope.require_any_hotel()?;
        let hotels = match scope.accessible_hotels() {
            AccessibleHotels::All => None,
            AccessibleHotels::Only(hotels) => Some(hotels),
        };
        self.repo.list_missions(hotels.as_deref()).await
    }

    fn check_mission_payload(scope: &AccessScope, payload: &MissionPayload) -> Result<(), AppError> {
        payload.validate()?;
        if !scope.role.is_admin() {
            return Err(AppError::Forbidden);
        }
        if payload.hotels.is_empty() {
            return Err(invalid_field("hotels", "validation.required"));
        }
        if !scope.can_grant_hotels(&payload.hotels) {
            return Err(AppError::HotelAccessDenied);
        }
        Ok(())
    }

    async fn find_mission(&self, scope: &AccessScope, id: Uuid) -> Result<ChecklistMission, AppError> {
        let mission = self
            .repo
            .find_mission(id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("mission {}", id)))?;
        if !mission.hotels.iter().any(|h| scope.can_access_hotel(*h)) {
            return Err(AppError::HotelAccessDenied);
        }
        Ok(mission)
    }

    pub async fn create_mission(
        &self,
        scope: &AccessScope,
        payload: MissionPayload,
    ) -> Result<ChecklistMission, AppError> {
        Self::check_mission_payload(scope, &payload)?;

        let mut tx = begin_audited_tx(&self.pool, scope.user_id).await?;
        let mission = self.repo.create_mission(&mut *tx, &payload).await?;
        tx.commit().await?;

        tracing::info!("📋 Missão {} criada", mission.id);
        self.events.publish("checklist_missions", mission.id, &mission.hotels, ChangeAction::Created);
        Ok(mission)
    }

    pub async fn update_mission(
        &self,
        scope: &AccessScope,
        id: Uuid,
        mut payload: MissionPayload,
    ) -> Result<ChecklistMission, AppError> {
        Self::check_mission_payload(scope, &payload)?;
        let current = self.find_mission(scope, id).await?;
        payload.hotels = merge_hotels(scope, &current.hotels, payload.hotels);

        let mut tx = begin_audited_tx(&self.pool, scope.user_id).await?;
        let mission = self.repo.update_mission(&mut *tx, id, &payload).await?;
        tx.commit().await?;

        tracing::info!("📋 Missão {} atualizada", id);
        self.events.publish("checklist_missions", id, &mission.hotels, ChangeAction::Updated);
        Ok(mission)
    }

    pub async fn delete_mission(&self, scope: &AccessScope, id: Uuid) -> Result<(), AppError> {
        if !scope.role.is_admin() {
            return Err(AppError::Forbidden);
        }
        let mission = self.find_mission(scope, id).await?;

        let mut tx = begin_audited_tx(&self.pool, scope.user_id).await?;
        self.repo.delete_mission(&mut *tx, id).await?;
        tx.commit().await?;

        tracing::info!("🗑️ Missão {} removida", id);
        self.events.publish("checklist_missions", id, &mission.hotels, ChangeAction::Deleted);
        Ok(())
    }

    // =========================================================================
    //  ITENS
    // =========================================================================

    pub async fn list_day(
        &self,
        scope: &AccessScope,
        hotel_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<ChecklistItem>, AppError> {
        scope.require_hotel(hotel_id)?;
        self.repo.list_items(&self.pool, hotel_id, date).await
    }

    pub async fn generate_from_missions(
        &self,
        scope: &AccessScope,
        hotel_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<ChecklistItem>, AppError> {
        scope.require_hotel(hotel_id)?;
        let missions = self.repo.list_missions(Some(std::slice::from_ref(&hotel_id))).await?;

        let mut tx = begin_audited_tx(&self.pool, scope.user_id).await?;
        self.repo.lock_day(&mut *tx, hotel_id, date).await?;
        let existing_day = self.repo.list_items(&mut *tx, hotel_id, date).await?;
        let ever_generated = self.repo.missions_ever_generated(&mut *tx, hotel_id).await?;

        let new_items = items_to_generate(&missions, hotel_id, date, &existing_day, &ever_generated);
        let mut created = Vec::with_capacity(new_items.len());
        for item in &new_items {
            if let Some(inserted) = self.repo.insert_item(&mut *tx, item).await? {
                created.push(inserted);
            }
        }
        tx.commit().await?;

        tracing::info!("📋 {} itens gerados para {} em {}", created.len(), hotel_id, date);
        for item in &created {
            self.events.publish("checklist_items", item.id, &[hotel_id], ChangeAction::Created);
        }
        Ok(created)
    }

    pub async fn toggle_item(
        &self,
        scope: &AccessScope,
        item_id: Uuid,
        completed: bool,
    ) -> Result<ChecklistItem, AppError> {
        let item = self
            .repo
            .find_item(item_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("checklist item {}", item_id)))?;
        scope.require_hotel(item.hotel_id)?;

        let mut tx = begin_audited_tx(&self.pool, scope.user_id).await?;
        let item = self.repo.set_completed(&mut *tx, item_id, completed, scope.user_id).await?;
        tx.commit().await?;

        self.events.publish("checklist_items", item.id, &[item.hotel_id], ChangeAction::Updated);
        Ok(item)
    }

    /// Copia um dia 100% concluído para outra data, tudo ou nada.
    pub async fn duplicate_to_next_day(
        &self,
        scope: &AccessScope,
        hotel_id: Uuid,
        from_date: NaiveDate,
        to_date: NaiveDate,
    ) -> Result<Vec<ChecklistItem>, AppError> {
        scope.require_hotel(hotel_id)?;
        if to_date <= from_date {
            return Err(invalid_field("toDate", "validation.date_order"));
        }

        let mut tx = begin_audited_tx(&self.pool, scope.user_id).await?;
        self.repo.lock_day(&mut *tx, hotel_id, to_date).await?;
        let source = self.repo.list_items(&mut *tx, hotel_id, from_date).await?;
        ensure_day_complete(&source)?;

        // Repetir a cópia não duplica o dia de destino
        let target = self.repo.list_items(&mut *tx, hotel_id, to_date).await?;
        let copies = rollover_copies(&source, &target, to_date);

        let mut created = Vec::with_capacity(copies.len());
        for copy in &copies {
            if let Some(inserted) = self.repo.insert_item(&mut *tx, copy).await? {
                created.push(inserted);
            }
        }
        tx.commit().await?;

        tracing::info!(
            "📋 Checklist de {} copiado para {} ({} itens, hotel {})",
            from_date,
            to_date,
            created.len(),
            hotel_id
        );
        for item in &created {
            self.events.publish("checklist_items", item.id, &[hotel_id], ChangeAction::Created);
        }
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::test_support::{insert_hotel, test_pool},
        models::auth::Role,
        services::access::tests::user_with,
    };
    use chrono::Utc;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn item(hotel_id: Uuid, mission_id: Option<Uuid>, date: NaiveDate, completed: bool) -> ChecklistItem {
        ChecklistItem {
            id: Uuid::new_v4(),
            mission_id,
            hotel_id,
            date,
            title: "Conferir frigobar".into(),
            service: "Governança".into(),
            completed,
            completed_by: completed.then(Uuid::new_v4),
            completed_at: completed.then(Utc::now),
            created_at: Utc::now(),
        }
    }

    fn mission(hotels: Vec<Uuid>, permanent: bool) -> ChecklistMission {
        ChecklistMission {
            id: Uuid::new_v4(),
            title: "Conferir frigobar".into(),
            service: "Governança".into(),
            description: None,
            hotels,
            permanent,
            active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn rollover_resets_completion_and_keeps_originals() {
        let hotel = Uuid::new_v4();
        let source: Vec<ChecklistItem> = (0..4)
            .map(|_| item(hotel, Some(Uuid::new_v4()), day(10), true))
            .collect();
        let snapshot: Vec<(Uuid, bool)> = source.iter().map(|i| (i.id, i.completed)).collect();

        let copies = duplicate_items(&source, day(11));

        assert_eq!(copies.len(), 4);
        assert!(copies.iter().all(|c| !c.completed && c.date == day(11) && c.hotel_id == hotel));
        for (copy, original) in copies.iter().zip(&source) {
            assert_eq!(copy.mission_id, original.mission_id);
            assert_eq!(copy.title, original.title);
        }
        let after: Vec<(Uuid, bool)> = source.iter().map(|i| (i.id, i.completed)).collect();
        assert_eq!(snapshot, after);
    }

    #[test]
    fn incomplete_or_empty_day_cannot_roll_over() {
        let hotel = Uuid::new_v4();
        assert!(matches!(ensure_day_complete(&[]), Err(AppError::ChecklistDayEmpty)));

        let partial = vec![item(hotel, None, day(10), true), item(hotel, None, day(10), false)];
        assert!(matches!(ensure_day_complete(&partial), Err(AppError::ChecklistDayIncomplete)));

        let done = vec![item(hotel, None, day(10), true)];
        assert!(ensure_day_complete(&done).is_ok());
    }

    #[test]
    fn permanent_missions_generate_every_day() {
        let hotel = Uuid::new_v4();
        let permanent = mission(vec![hotel], true);

        let generated = items_to_generate(&[permanent.clone()], hotel, day(12), &[], &[permanent.id]);
        assert_eq!(generated.len(), 1);
        assert_eq!(generated[0].mission_id, Some(permanent.id));
        assert!(!generated[0].completed);
    }

    #[test]
    fn one_off_missions_generate_once_per_hotel() {
        let hotel = Uuid::new_v4();
        let one_off = mission(vec![hotel], false);

        assert_eq!(items_to_generate(&[one_off.clone()], hotel, day(12), &[], &[]).len(), 1);
        assert!(items_to_generate(&[one_off.clone()], hotel, day(13), &[], &[one_off.id]).is_empty());
    }

    #[test]
    fn existing_pairs_and_foreign_missions_are_skipped() {
        let hotel = Uuid::new_v4();
        let other_hotel = Uuid::new_v4();
        let mine = mission(vec![hotel], true);
        let foreign = mission(vec![other_hotel], true);
        let mut inactive = mission(vec![hotel], true);
        inactive.active = false;

        let existing = vec![item(hotel, Some(mine.id), day(12), false)];
        let generated = items_to_generate(&[mine, foreign, inactive], hotel, day(12), &existing, &[]);
        assert!(generated.is_empty());
    }

    #[test]
    fn rollover_skips_what_the_target_day_already_has() {
        let hotel = Uuid::new_v4();
        let mission_id = Uuid::new_v4();
        let mut manual = item(hotel, None, day(10), true);
        manual.title = "Repor toalhas".into();
        let source = vec![item(hotel, Some(mission_id), day(10), true), manual.clone()];

        assert_eq!(rollover_copies(&source, &[], day(11)).len(), 2);

        let mut manual_copy = manual.clone();
        manual_copy.date = day(11);
        let target = vec![item(hotel, Some(mission_id), day(11), false), manual_copy];
        assert!(rollover_copies(&source, &target, day(11)).is_empty());

        let mut other_service = manual;
        other_service.service = "Recepção".into();
        assert_eq!(rollover_copies(&[other_service], &target, day(11)).len(), 1);
    }

    fn admin_scope() -> AccessScope {
        AccessScope::from_user(&user_with(Role::SystemAdmin, vec![], vec![]))
    }

    #[tokio::test]
    async fn concurrent_generation_creates_each_item_once() {
        let Some(pool) = test_pool().await else { return };
        let hotel = insert_hotel(&pool).await;
        let repo = ChecklistRepository::new(pool.clone());
        for n in 0..5 {
            let payload = MissionPayload {
                title: format!("Missão {}", n),
                service: "Governança".into(),
                description: None,
                hotels: vec![hotel],
                permanent: true,
                active: true,
            };
            repo.create_mission(&pool, &payload).await.unwrap();
        }
        let service = ChecklistService::new(repo, pool.clone(), EventHub::new());
        let scope = admin_scope();

        let (a, b) = tokio::join!(
            service.generate_from_missions(&scope, hotel, day(20)),
            service.generate_from_missions(&scope, hotel, day(20)),
        );

        assert_eq!(a.unwrap().len() + b.unwrap().len(), 5);
        assert_eq!(service.list_day(&scope, hotel, day(20)).await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn repeated_rollover_does_not_double_the_target_day() {
        let Some(pool) = test_pool().await else { return };
        let hotel = insert_hotel(&pool).await;
        let repo = ChecklistRepository::new(pool.clone());
        for title in ["Repor toalhas", "Conferir frigobar", "Checar piscina"] {
            let manual = NewChecklistItem {
                mission_id: None,
                hotel_id: hotel,
                date: day(10),
                title: title.into(),
                service: "Governança".into(),
                completed: true,
            };
            repo.insert_item(&pool, &manual).await.unwrap();
        }
        let service = ChecklistService::new(repo, pool.clone(), EventHub::new());
        let scope = admin_scope();

        let first = service.duplicate_to_next_day(&scope, hotel, day(10), day(11)).await.unwrap();
        let second = service.duplicate_to_next_day(&scope, hotel, day(10), day(11)).await.unwrap();

        assert_eq!(first.len(), 3);
        assert!(second.is_empty());
        let target = service.list_day(&scope, hotel, day(11)).await.unwrap();
        assert_eq!(target.len(), 3);
        assert!(target.iter().all(|i| !i.completed));
    }
}
