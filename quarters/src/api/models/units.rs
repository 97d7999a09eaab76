//! API-facing unit types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::models::units::UnitDBResponse;
use crate::types::{PropertyId, UnitId};

/// Occupancy status of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "unit_status", rename_all = "lowercase")]
pub enum UnitStatus {
    Vacant,
    Occupied,
}

/// Request body for creating a unit within a property.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UnitCreate {
    pub name: String,
    #[serde(default)]
    pub floor: Option<i32>,
    #[serde(default)]
    pub area_sqm: Option<f64>,
    /// Initial status; defaults to VACANT.
    #[serde(default)]
    pub status: Option<UnitStatus>,
}

/// Request body for updating a unit. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UnitUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub floor: Option<i32>,
    #[serde(default)]
    pub area_sqm: Option<f64>,
    #[serde(default)]
    pub status: Option<UnitStatus>,
}

/// A unit as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UnitResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: UnitId,
    #[schema(value_type = String, format = "uuid")]
    pub property_id: PropertyId,
    pub name: String,
    pub floor: Option<i32>,
    pub area_sqm: Option<f64>,
    pub status: UnitStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UnitDBResponse> for UnitResponse {
    fn from(db: UnitDBResponse) -> Self {
        Self {
            id: db.id,
            property_id: db.property_id,
            name: db.name,
            floor: db.floor,
            area_sqm: db.area_sqm,
            status: db.status,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
