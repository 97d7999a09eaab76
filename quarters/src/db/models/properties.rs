//! Database models for properties.

use crate::api::models::properties::{PropertyCreate, PropertyType, PropertyUpdate};
use crate::types::{PropertyId, UserId};
use chrono::{DateTime, Utc};

/// Database request for creating a new property
#[derive(Debug, Clone)]
pub struct PropertyCreateDBRequest {
    pub owner_id: UserId,
    pub name: String,
    pub property_type: PropertyType,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub image_urls: Vec<String>,
}

impl PropertyCreateDBRequest {
    pub fn new(owner_id: UserId, api: PropertyCreate) -> Self {
        Self {
            owner_id,
            name: api.name,
            property_type: api.property_type,
            address_line1: api.address_line1,
            address_line2: api.address_line2,
            city: api.city,
            region: api.region,
            postal_code: api.postal_code,
            country: api.country,
            image_urls: api.image_urls.unwrap_or_default(),
        }
    }
}

/// Database request for updating a property. `None` fields keep their
/// current value (COALESCE semantics).
#[derive(Debug, Clone, Default)]
pub struct PropertyUpdateDBRequest {
    pub name: Option<String>,
    pub property_type: Option<PropertyType>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub image_urls: Option<Vec<String>>,
}

impl From<PropertyUpdate> for PropertyUpdateDBRequest {
    fn from(api: PropertyUpdate) -> Self {
        Self {
            name: api.name,
            property_type: api.property_type,
            address_line1: api.address_line1,
            address_line2: api.address_line2,
            city: api.city,
            region: api.region,
            postal_code: api.postal_code,
            country: api.country,
            image_urls: api.image_urls,
        }
    }
}

/// Database response for a property
#[derive(Debug, Clone)]
pub struct PropertyDBResponse {
    pub id: PropertyId,
    pub owner_id: UserId,
    pub name: String,
    pub property_type: PropertyType,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub image_urls: Vec<String>,
    pub signature_data: Option<String>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
