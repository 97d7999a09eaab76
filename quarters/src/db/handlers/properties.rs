//! Database repository for properties.
//!
//! Properties carry the soft-delete lifecycle: an active property can be
//! soft-deleted (hidden from listings, restorable), and a soft-deleted one
//! can be purged (the row and everything hanging off it goes away).

use crate::api::models::properties::PropertyType;
use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::properties::{PropertyCreateDBRequest, PropertyDBResponse, PropertyUpdateDBRequest},
};
use crate::types::{PropertyId, UserId, abbrev_uuid};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection};
use tracing::instrument;

/// Filter for listing properties visible to a user
#[derive(Debug, Clone)]
pub struct PropertyFilter {
    pub skip: i64,
    pub limit: i64,
    /// Only properties this user owns or collaborates on.
    pub user_id: UserId,
}

impl PropertyFilter {
    pub fn new(user_id: UserId, skip: i64, limit: i64) -> Self {
        Self { skip, limit, user_id }
    }
}

// Database entity model
#[derive(Debug, Clone, FromRow)]
struct Property {
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

impl From<Property> for PropertyDBResponse {
    fn from(p: Property) -> Self {
        Self {
            id: p.id,
            owner_id: p.owner_id,
            name: p.name,
            property_type: p.property_type,
            address_line1: p.address_line1,
            address_line2: p.address_line2,
            city: p.city,
            region: p.region,
            postal_code: p.postal_code,
            country: p.country,
            image_urls: p.image_urls,
            signature_data: p.signature_data,
            is_deleted: p.is_deleted,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

pub struct Properties<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Properties<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Soft-delete an active property. Returns `false` if the property does
    /// not exist or is already deleted.
    #[instrument(skip(self), fields(property_id = %abbrev_uuid(&id)), err)]
    pub async fn soft_delete(&mut self, id: PropertyId) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE properties SET is_deleted = TRUE, updated_at = NOW() WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .execute(&mut *self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Restore a soft-deleted property. Returns `false` if the property does
    /// not exist or is not deleted.
    #[instrument(skip(self), fields(property_id = %abbrev_uuid(&id)), err)]
    pub async fn restore(&mut self, id: PropertyId) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE properties SET is_deleted = FALSE, updated_at = NOW() WHERE id = $1 AND is_deleted = TRUE",
        )
        .bind(id)
        .execute(&mut *self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Permanently remove a soft-deleted property. Units, collaborators and
    /// nodes go with it via the FK cascades. Returns `false` if the property
    /// does not exist or is still active.
    #[instrument(skip(self), fields(property_id = %abbrev_uuid(&id)), err)]
    pub async fn purge(&mut self, id: PropertyId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM properties WHERE id = $1 AND is_deleted = TRUE")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List active properties the user owns or collaborates on.
    #[instrument(skip(self, filter), fields(user_id = %abbrev_uuid(&filter.user_id)), err)]
    pub async fn list_for_user(&mut self, filter: &PropertyFilter) -> Result<Vec<PropertyDBResponse>> {
        let properties = sqlx::query_as::<_, Property>(
            r#"
            SELECT p.* FROM properties p
            WHERE p.is_deleted = FALSE
              AND (p.owner_id = $1
                   OR EXISTS (SELECT 1 FROM property_collaborators c
                              WHERE c.property_id = p.id AND c.user_id = $1))
            ORDER BY p.created_at
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(filter.user_id)
        .bind(filter.limit)
        .bind(filter.skip)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(properties.into_iter().map(PropertyDBResponse::from).collect())
    }

    /// List soft-deleted properties the user owns. Collaborators never see
    /// deleted properties.
    #[instrument(skip(self, filter), fields(user_id = %abbrev_uuid(&filter.user_id)), err)]
    pub async fn list_deleted_for_user(&mut self, filter: &PropertyFilter) -> Result<Vec<PropertyDBResponse>> {
        let properties = sqlx::query_as::<_, Property>(
            r#"
            SELECT * FROM properties
            WHERE is_deleted = TRUE AND owner_id = $1
            ORDER BY updated_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(filter.user_id)
        .bind(filter.limit)
        .bind(filter.skip)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(properties.into_iter().map(PropertyDBResponse::from).collect())
    }

    /// Store a rendered signature on the property, or clear it with `None`.
    #[instrument(skip(self, data), fields(property_id = %abbrev_uuid(&id)), err)]
    pub async fn set_signature(&mut self, id: PropertyId, data: Option<&str>) -> Result<PropertyDBResponse> {
        let property = sqlx::query_as::<_, Property>(
            "UPDATE properties SET signature_data = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(data)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(PropertyDBResponse::from(property))
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Properties<'c> {
    type CreateRequest = PropertyCreateDBRequest;
    type UpdateRequest = PropertyUpdateDBRequest;
    type Response = PropertyDBResponse;
    type Id = PropertyId;
    type Filter = PropertyFilter;

    #[instrument(skip(self, request), fields(name = %request.name, owner_id = %abbrev_uuid(&request.owner_id)), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let property = sqlx::query_as::<_, Property>(
            r#"
            INSERT INTO properties
                (owner_id, name, property_type, address_line1, address_line2,
                 city, region, postal_code, country, image_urls)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(request.owner_id)
        .bind(&request.name)
        .bind(request.property_type)
        .bind(&request.address_line1)
        .bind(&request.address_line2)
        .bind(&request.city)
        .bind(&request.region)
        .bind(&request.postal_code)
        .bind(&request.country)
        .bind(&request.image_urls)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(PropertyDBResponse::from(property))
    }

    #[instrument(skip(self), fields(property_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let property = sqlx::query_as::<_, Property>("SELECT * FROM properties WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(property.map(PropertyDBResponse::from))
    }

    #[instrument(skip(self, ids), fields(count = ids.len()), err)]
    async fn get_bulk(&mut self, ids: Vec<PropertyId>) -> Result<std::collections::HashMap<PropertyId, PropertyDBResponse>> {
        if ids.is_empty() {
            return Ok(std::collections::HashMap::new());
        }

        let properties = sqlx::query_as::<_, Property>("SELECT * FROM properties WHERE id = ANY($1)")
            .bind(&ids)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(properties.into_iter().map(|p| (p.id, PropertyDBResponse::from(p))).collect())
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        self.list_for_user(filter).await
    }

    #[instrument(skip(self), fields(property_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        // Hard delete, lifecycle checks live in soft_delete/purge
        let result = sqlx::query("DELETE FROM properties WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(property_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let property = sqlx::query_as::<_, Property>(
            r#"
            UPDATE properties SET
                name = COALESCE($2, name),
                property_type = COALESCE($3, property_type),
                address_line1 = COALESCE($4, address_line1),
                address_line2 = COALESCE($5, address_line2),
                city = COALESCE($6, city),
                region = COALESCE($7, region),
                postal_code = COALESCE($8, postal_code),
                country = COALESCE($9, country),
                image_urls = COALESCE($10, image_urls),
                updated_at = NOW()
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.name)
        .bind(request.property_type)
        .bind(&request.address_line1)
        .bind(&request.address_line2)
        .bind(&request.city)
        .bind(&request.region)
        .bind(&request.postal_code)
        .bind(&request.country)
        .bind(&request.image_urls)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(PropertyDBResponse::from(property))
    }
}
