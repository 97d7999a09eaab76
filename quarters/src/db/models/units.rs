//! Database models for units.

use crate::api::models::units::{UnitCreate, UnitStatus, UnitUpdate};
use crate::types::{PropertyId, UnitId};
use chrono::{DateTime, Utc};

/// Database request for creating a new unit
#[derive(Debug, Clone)]
pub struct UnitCreateDBRequest {
    pub property_id: PropertyId,
    pub name: String,
    pub floor: Option<i32>,
    pub area_sqm: Option<f64>,
    pub status: UnitStatus,
}

impl UnitCreateDBRequest {
    pub fn new(property_id: PropertyId, api: UnitCreate) -> Self {
        Self {
            property_id,
            name: api.name,
            floor: api.floor,
            area_sqm: api.area_sqm,
            status: api.status.unwrap_or(UnitStatus::Vacant),
        }
    }
}

/// Database request for updating a unit
#[derive(Debug, Clone, Default)]
pub struct UnitUpdateDBRequest {
    pub name: Option<String>,
    pub floor: Option<i32>,
    pub area_sqm: Option<f64>,
    pub status: Option<UnitStatus>,
}

impl From<UnitUpdate> for UnitUpdateDBRequest {
    fn from(api: UnitUpdate) -> Self {
        Self {
            name: api.name,
            floor: api.floor,
            area_sqm: api.area_sqm,
            status: api.status,
        }
    }
}

/// Database response for a unit
#[derive(Debug, Clone)]
pub struct UnitDBResponse {
    pub id: UnitId,
    pub property_id: PropertyId,
    pub name: String,
    pub floor: Option<i32>,
    pub area_sqm: Option<f64>,
    pub status: UnitStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
