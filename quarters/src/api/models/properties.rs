//! API-facing property types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::models::properties::PropertyDBResponse;
use crate::types::{AccessLevel, PropertyId, UserId};

/// The kind of property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "property_type", rename_all = "lowercase")]
pub enum PropertyType {
    Apartment,
    Villa,
    Building,
    Plot,
    Commercial,
    Other,
}

/// Request body for creating a property. The owner is the authenticated
/// caller, never part of the payload.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PropertyCreate {
    pub name: String,
    pub property_type: PropertyType,
    #[serde(default)]
    pub address_line1: Option<String>,
    #[serde(default)]
    pub address_line2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub image_urls: Option<Vec<String>>,
}

/// Request body for updating a property. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PropertyUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub property_type: Option<PropertyType>,
    #[serde(default)]
    pub address_line1: Option<String>,
    #[serde(default)]
    pub address_line2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub image_urls: Option<Vec<String>>,
}

/// A property as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PropertyResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: PropertyId,
    #[schema(value_type = String, format = "uuid")]
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

impl From<PropertyDBResponse> for PropertyResponse {
    fn from(db: PropertyDBResponse) -> Self {
        Self {
            id: db.id,
            owner_id: db.owner_id,
            name: db.name,
            property_type: db.property_type,
            address_line1: db.address_line1,
            address_line2: db.address_line2,
            city: db.city,
            region: db.region,
            postal_code: db.postal_code,
            country: db.country,
            image_urls: db.image_urls,
            signature_data: db.signature_data,
            is_deleted: db.is_deleted,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

/// The caller's effective access level on a property.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AccessResponse {
    #[schema(value_type = String, format = "uuid")]
    pub property_id: PropertyId,
    #[schema(value_type = String, format = "uuid")]
    pub user_id: UserId,
    pub access_level: AccessLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_type_serialization() {
        assert_eq!(
            serde_json::to_string(&PropertyType::Commercial).unwrap(),
            "\"COMMERCIAL\""
        );
        let parsed: PropertyType = serde_json::from_str("\"VILLA\"").unwrap();
        assert_eq!(parsed, PropertyType::Villa);
    }

    #[test]
    fn test_property_create_defaults() {
        let body = serde_json::json!({
            "name": "Elm Street 5",
            "property_type": "BUILDING"
        });
        let req: PropertyCreate = serde_json::from_value(body).unwrap();
        assert_eq!(req.image_urls, None);
        assert_eq!(req.address_line1, None);
    }
}
