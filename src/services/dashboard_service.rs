// src/services/dashboard_service.rs

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::DashboardRepository,
    models::dashboard::DashboardSummary,
    services::access::{AccessScope, AccessibleHotels},
};

#[derive(Clone)]
pub struct DashboardService {
    repo: DashboardRepository,
}

impl DashboardService {
    pub fn new(repo: DashboardRepository) -> Self {
        Self { repo }
    }

    pub async fn get_summary(
        &self,
        scope: &AccessScope,
        hotel_id: Option<Uuid>,
    ) -> Result<DashboardSummary, AppError> {
        scope.require_any_hotel()?;

        let hotels = match hotel_id {
            Some(hotel_id) => {
                scope.require_hotel(hotel_id)?;
                Some(vec![hotel_id])
            }
            None => match scope.accessible_hotels() {
                AccessibleHotels::All => None,
                AccessibleHotels::Only(hotels) => Some(hotels),
            },
        };

        let today = Utc::now().date_naive();
        self.repo
            .get_summary(self.repo.pool(), hotels.as_deref(), today)
            .await
    }
}
