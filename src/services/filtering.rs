// src/services/filtering.rs

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    common::error::{invalid_field, AppError},
    models::{
        auth::User,
        filters::{DateRange, ListQuery},
        incident::Incident,
        logbook::LogbookEntry,
        lost_item::{LostItem, LostItemStatus},
        parameter::INCIDENT_STATUS_IN_PROGRESS,
        technician::Technician,
    },
    services::access::{AccessScope, AccessibleHotels},
};

// ---
// O que uma listagem precisa saber de cada registro
// ---
pub trait FilterableRecord {
    type Status: PartialEq;

    fn belongs_to_hotel(&self, hotel_id: Uuid) -> bool;
    fn status(&self) -> Option<Self::Status>;
    fn primary_date(&self) -> DateTime<Utc>;
    fn search_fields(&self) -> Vec<&str>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HotelFilter {
    Only(Uuid),
    AllAccessible,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusFilter<S> {
    All,
    Only(S),
}

#[derive(Debug, Clone)]
pub struct RecordFilters<S> {
    pub hotel: HotelFilter,
    pub status: StatusFilter<S>,
    pub date_range: DateRange,
    pub search: Option<String>,
}

impl<S> RecordFilters<S> {
    /// Monta os filtros a partir da query string. O hotel pedido precisa estar no escopo.
    pub fn from_query(
        query: &ListQuery,
        status: StatusFilter<S>,
        scope: &AccessScope,
    ) -> Result<Self, AppError> {
        scope.require_any_hotel()?;

        let hotel = match query.hotel_id {
            Some(hotel_id) => {
                scope.require_hotel(hotel_id)?;
                HotelFilter::Only(hotel_id)
            }
            None => HotelFilter::AllAccessible,
        };

        Ok(Self {
            hotel,
            status,
            date_range: query.range,
            search: query.search.clone(),
        })
    }
}

impl<S> RecordFilters<S> {
    /// Hotéis a buscar no banco: `None` = todos (system_admin sem filtro de hotel).
    pub fn hotel_ids(&self, scope: &AccessScope) -> Option<Vec<Uuid>> {
        match &self.hotel {
            HotelFilter::Only(hotel_id) => Some(vec![*hotel_id]),
            HotelFilter::AllAccessible => match scope.accessible_hotels() {
                AccessibleHotels::All => None,
                AccessibleHotels::Only(hotels) => Some(hotels),
            },
        }
    }
}

/// Filtros combinados em AND; a busca vem por último; ordenação por data decrescente.
pub fn filter_records<T: FilterableRecord>(
    records: Vec<T>,
    filters: &RecordFilters<T::Status>,
    scope: &AccessScope,
    now: DateTime<Utc>,
) -> Vec<T> {
    let lower_bound = filters.date_range.lower_bound(now);

    let mut kept: Vec<T> = records
        .into_iter()
        .filter(|r| match &filters.hotel {
            HotelFilter::Only(hotel_id) => r.belongs_to_hotel(*hotel_id),
            HotelFilter::AllAccessible => match scope.accessible_hotels() {
                AccessibleHotels::All => true,
                AccessibleHotels::Only(hotels) => hotels.iter().any(|h| r.belongs_to_hotel(*h)),
            },
        })
        .filter(|r| match &filters.status {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => r.status().as_ref() == Some(wanted),
        })
        .filter(|r| lower_bound.is_none_or(|bound| r.primary_date() >= bound))
        .collect();

    if let Some(needle) = filters
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
    {
        kept.retain(|r| {
            r.search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        });
    }

    // sort_by é estável: empates mantêm a ordem de chegada
    kept.sort_by(|a, b| b.primary_date().cmp(&a.primary_date()));
    kept
}

// ---
// Status padrão de cada listagem
// ---

/// Sem `status` = "em andamento"; `all` = sem filtro.
pub fn incident_status_filter(raw: Option<&str>) -> Result<StatusFilter<Uuid>, AppError> {
    match raw {
        None => Ok(StatusFilter::Only(INCIDENT_STATUS_IN_PROGRESS)),
        Some("all") => Ok(StatusFilter::All),
        Some(value) => Uuid::parse_str(value)
            .map(StatusFilter::Only)
            .map_err(|_| invalid_field("status", "validation.invalid_status")),
    }
}

pub fn lost_item_status_filter(raw: Option<&str>) -> Result<StatusFilter<LostItemStatus>, AppError> {
    match raw {
        None | Some("all") => Ok(StatusFilter::All),
        Some(value) => LostItemStatus::parse(value)
            .map(StatusFilter::Only)
            .ok_or_else(|| invalid_field("status", "validation.invalid_status")),
    }
}

/// Para técnicos e usuários: `active` / `inactive`; padrão = todos.
pub fn active_status_filter(raw: Option<&str>) -> Result<StatusFilter<bool>, AppError> {
    match raw {
        None | Some("all") => Ok(StatusFilter::All),
        Some("active") => Ok(StatusFilter::Only(true)),
        Some("inactive") => Ok(StatusFilter::Only(false)),
        Some(_) => Err(invalid_field("status", "validation.invalid_status")),
    }
}

/// Diário: `important` filtra os destaques.
pub fn logbook_status_filter(raw: Option<&str>) -> StatusFilter<bool> {
    match raw {
        Some("important") => StatusFilter::Only(true),
        _ => StatusFilter::All,
    }
}

// ---
// Implementações por funcionalidade
// ---

impl FilterableRecord for Incident {
    type Status = Uuid;

    fn belongs_to_hotel(&self, hotel_id: Uuid) -> bool {
        self.hotel_id == hotel_id
    }

    fn status(&self) -> Option<Uuid> {
        Some(self.status_id)
    }

    fn primary_date(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.description.as_str()];
        if let Some(name) = self.client.as_ref().and_then(|c| c.name.as_deref()) {
            fields.push(name);
        }
        fields.extend(self.assigned_to.as_deref());
        fields.extend(self.received_by.as_deref());
        fields
    }
}

impl FilterableRecord for LostItem {
    type Status = LostItemStatus;

    fn belongs_to_hotel(&self, hotel_id: Uuid) -> bool {
        self.hotel_id == hotel_id
    }

    fn status(&self) -> Option<LostItemStatus> {
        Some(self.status)
    }

    fn primary_date(&self) -> DateTime<Utc> {
        self.found_at
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.description.as_str()];
        fields.extend(self.storage_location.as_deref());
        fields.extend(self.found_by.as_deref());
        fields.extend(self.returned_by.as_deref());
        fields
    }
}

impl FilterableRecord for Technician {
    type Status = bool;

    fn belongs_to_hotel(&self, hotel_id: Uuid) -> bool {
        self.hotels.contains(&hotel_id)
    }

    fn status(&self) -> Option<bool> {
        Some(self.active)
    }

    fn primary_date(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.company.as_deref());
        fields.extend(self.email.as_deref());
        fields.extend(self.specialties.iter().map(String::as_str));
        fields
    }
}

impl FilterableRecord for User {
    type Status = bool;

    fn belongs_to_hotel(&self, hotel_id: Uuid) -> bool {
        self.hotels.contains(&hotel_id)
    }

    fn status(&self) -> Option<bool> {
        Some(self.active)
    }

    fn primary_date(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.full_name.as_str(), self.email.as_str()]
    }
}

impl FilterableRecord for LogbookEntry {
    type Status = bool;

    fn belongs_to_hotel(&self, hotel_id: Uuid) -> bool {
        self.hotel_id == hotel_id
    }

    fn status(&self) -> Option<bool> {
        Some(self.important)
    }

    // Data do diário + hora de criação, para desempatar entradas do mesmo dia
    fn primary_date(&self) -> DateTime<Utc> {
        self.entry_date.and_time(self.created_at.time()).and_utc()
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.content.as_str(), self.author_name.as_str()];
        fields.extend(self.service.as_deref());
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        auth::Role,
        incident::IncidentClient,
        parameter::{INCIDENT_STATUS_CLOSED, INCIDENT_STATUS_OPEN},
    };
    use crate::services::access::tests::user_with;
    use chrono::{Duration, TimeZone};
    use sqlx::types::Json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap()
    }

    fn incident(hotel_id: Uuid, status_id: Uuid, days_ago: i64, description: &str) -> Incident {
        Incident {
            id: Uuid::new_v4(),
            hotel_id,
            occurred_at: now() - Duration::days(days_ago),
            category_id: None,
            impact_id: None,
            location_id: None,
            status_id,
            description: description.to_string(),
            client: None,
            resolution: None,
            received_by: None,
            assigned_to: None,
            attachments: vec![],
            created_by: None,
            updated_by: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    fn filters(hotel: HotelFilter, status: StatusFilter<Uuid>) -> RecordFilters<Uuid> {
        RecordFilters { hotel, status, date_range: DateRange::AllTime, search: None }
    }

    #[test]
    fn hotel_and_status_intersection_sorted_desc() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let statuses = [INCIDENT_STATUS_OPEN, INCIDENT_STATUS_IN_PROGRESS, INCIDENT_STATUS_CLOSED];

        // 10 incidentes, 2 hotéis, 3 status
        let records: Vec<Incident> = (0..10)
            .map(|i| {
                let hotel = if i % 2 == 0 { a } else { b };
                incident(hotel, statuses[i % 3], i as i64, &format!("incident {}", i))
            })
            .collect();

        let expected: Vec<Uuid> = {
            let mut v: Vec<&Incident> = records
                .iter()
                .filter(|r| r.hotel_id == a && r.status_id == INCIDENT_STATUS_IN_PROGRESS)
                .collect();
            v.sort_by(|x, y| y.occurred_at.cmp(&x.occurred_at));
            v.into_iter().map(|r| r.id).collect()
        };

        let scope = AccessScope::from_user(&user_with(Role::Standard, vec![a, b], vec![]));
        let result = filter_records(
            records,
            &filters(HotelFilter::Only(a), StatusFilter::Only(INCIDENT_STATUS_IN_PROGRESS)),
            &scope,
            now(),
        );

        assert!(!result.is_empty());
        assert_eq!(result.iter().map(|r| r.id).collect::<Vec<_>>(), expected);
        assert!(result.windows(2).all(|w| w[0].occurred_at >= w[1].occurred_at));
    }

    #[test]
    fn all_accessible_excludes_foreign_hotels() {
        let (mine, foreign) = (Uuid::new_v4(), Uuid::new_v4());
        let records = vec![
            incident(mine, INCIDENT_STATUS_OPEN, 1, "mine"),
            incident(foreign, INCIDENT_STATUS_OPEN, 1, "foreign"),
        ];
        let scope = AccessScope::from_user(&user_with(Role::Standard, vec![mine], vec![]));

        let result = filter_records(
            records,
            &filters(HotelFilter::AllAccessible, StatusFilter::All),
            &scope,
            now(),
        );

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].hotel_id, mine);
    }

    #[test]
    fn date_range_lower_bound_is_inclusive() {
        let hotel = Uuid::new_v4();
        let records = vec![
            incident(hotel, INCIDENT_STATUS_OPEN, 7, "exactly seven"),
            incident(hotel, INCIDENT_STATUS_OPEN, 8, "eight"),
            incident(hotel, INCIDENT_STATUS_OPEN, 0, "today"),
        ];
        let scope = AccessScope::from_user(&user_with(Role::SystemAdmin, vec![], vec![]));
        let mut f = filters(HotelFilter::AllAccessible, StatusFilter::All);
        f.date_range = DateRange::Last7Days;

        let result = filter_records(records, &f, &scope, now());
        let descriptions: Vec<&str> = result.iter().map(|r| r.description.as_str()).collect();

        assert_eq!(descriptions, vec!["today", "exactly seven"]);
    }

    #[test]
    fn search_is_case_insensitive_over_feature_fields() {
        let hotel = Uuid::new_v4();
        let mut with_client = incident(hotel, INCIDENT_STATUS_OPEN, 1, "Noise complaint");
        with_client.client = Some(Json(IncidentClient {
            name: Some("Ana Beatriz".into()),
            ..Default::default()
        }));
        let mut assigned = incident(hotel, INCIDENT_STATUS_OPEN, 2, "Broken lamp");
        assigned.assigned_to = Some("BEATRIZ maintenance".into());
        let other = incident(hotel, INCIDENT_STATUS_OPEN, 3, "Wifi down");

        let scope = AccessScope::from_user(&user_with(Role::SystemAdmin, vec![], vec![]));
        let mut f = filters(HotelFilter::AllAccessible, StatusFilter::All);
        f.search = Some("  beatriz ".into());

        let result = filter_records(vec![with_client, assigned, other], &f, &scope, now());
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn incident_status_defaults_to_in_progress() {
        assert_eq!(
            incident_status_filter(None).unwrap(),
            StatusFilter::Only(INCIDENT_STATUS_IN_PROGRESS)
        );
        assert_eq!(incident_status_filter(Some("all")).unwrap(), StatusFilter::All);
        assert!(incident_status_filter(Some("not-a-uuid")).is_err());
    }

    #[test]
    fn query_for_foreign_hotel_is_rejected() {
        let (mine, foreign) = (Uuid::new_v4(), Uuid::new_v4());
        let scope = AccessScope::from_user(&user_with(Role::Standard, vec![mine], vec![]));
        let query = ListQuery { hotel_id: Some(foreign), ..Default::default() };

        let result = RecordFilters::from_query(&query, StatusFilter::<Uuid>::All, &scope);
        assert!(matches!(result, Err(AppError::HotelAccessDenied)));
    }

    #[test]
    fn technicians_match_any_of_their_hotels() {
        let (h1, h2) = (Uuid::new_v4(), Uuid::new_v4());
        let tech = Technician {
            id: Uuid::new_v4(),
            name: "Carlos".into(),
            email: None,
            phone: None,
            company: Some("Frio Total".into()),
            specialties: vec!["HVAC".into()],
            hourly_rate: None,
            hotels: vec![h1, h2],
            modules: vec![],
            active: true,
            created_at: now(),
            updated_at: now(),
        };
        let scope = AccessScope::from_user(&user_with(Role::Standard, vec![h2], vec![]));
        let f = RecordFilters {
            hotel: HotelFilter::Only(h2),
            status: StatusFilter::Only(true),
            date_range: DateRange::AllTime,
            search: Some("hvac".into()),
        };

        assert_eq!(filter_records(vec![tech], &f, &scope, now()).len(), 1);
    }
}
