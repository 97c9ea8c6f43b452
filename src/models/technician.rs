// src/models/technician.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::hotel::default_true;

// Prestador de serviço externo (não é um login)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Technician {
    pub id: Uuid,
    #[schema(example = "Carlos Eletricista")]
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    #[schema(example = json!(["elétrica", "ar-condicionado"]))]
    pub specialties: Vec<String>,
    #[schema(example = "85.00")]
    pub hourly_rate: Option<Decimal>,
    pub hotels: Vec<Uuid>,
    pub modules: Vec<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn validate_rate(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("validation.hourly_rate".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TechnicianPayload {
    #[validate(length(min = 1, message = "validation.required"))]
    pub name: String,
    #[validate(email(message = "validation.email"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[validate(custom(function = "validate_rate"))]
    pub hourly_rate: Option<Decimal>,
    #[serde(default)]
    pub hotels: Vec<Uuid>,
    #[serde(default)]
    pub modules: Vec<String>,
    #[serde(default = "default_true")]
    pub active: bool,
}
