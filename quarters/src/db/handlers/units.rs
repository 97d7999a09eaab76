//! Database repository for units.

use crate::api::models::units::UnitStatus;
use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::units::{UnitCreateDBRequest, UnitDBResponse, UnitUpdateDBRequest},
};
use crate::types::{PropertyId, UnitId, abbrev_uuid};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection};
use tracing::instrument;

/// Filter for listing units of one property
#[derive(Debug, Clone)]
pub struct UnitFilter {
    pub skip: i64,
    pub limit: i64,
    pub property_id: PropertyId,
}

impl UnitFilter {
    pub fn new(property_id: PropertyId, skip: i64, limit: i64) -> Self {
        Self { skip, limit, property_id }
    }
}

// Database entity model
#[derive(Debug, Clone, FromRow)]
struct Unit {
    pub id: UnitId,
    pub property_id: PropertyId,
    pub name: String,
    pub floor: Option<i32>,
    pub area_sqm: Option<f64>,
    pub status: UnitStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Unit> for UnitDBResponse {
    fn from(u: Unit) -> Self {
        Self {
            id: u.id,
            property_id: u.property_id,
            name: u.name,
            floor: u.floor,
            area_sqm: u.area_sqm,
            status: u.status,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

pub struct Units<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Units<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Units<'c> {
    type CreateRequest = UnitCreateDBRequest;
    type UpdateRequest = UnitUpdateDBRequest;
    type Response = UnitDBResponse;
    type Id = UnitId;
    type Filter = UnitFilter;

    #[instrument(skip(self, request), fields(name = %request.name, property_id = %abbrev_uuid(&request.property_id)), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let unit = sqlx::query_as::<_, Unit>(
            r#"
            INSERT INTO units (property_id, name, floor, area_sqm, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(request.property_id)
        .bind(&request.name)
        .bind(request.floor)
        .bind(request.area_sqm)
        .bind(request.status)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(UnitDBResponse::from(unit))
    }

    #[instrument(skip(self), fields(unit_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let unit = sqlx::query_as::<_, Unit>("SELECT * FROM units WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(unit.map(UnitDBResponse::from))
    }

    #[instrument(skip(self, ids), fields(count = ids.len()), err)]
    async fn get_bulk(&mut self, ids: Vec<UnitId>) -> Result<std::collections::HashMap<UnitId, UnitDBResponse>> {
        if ids.is_empty() {
            return Ok(std::collections::HashMap::new());
        }

        let units = sqlx::query_as::<_, Unit>("SELECT * FROM units WHERE id = ANY($1)")
            .bind(&ids)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(units.into_iter().map(|u| (u.id, UnitDBResponse::from(u))).collect())
    }

    #[instrument(skip(self, filter), fields(property_id = %abbrev_uuid(&filter.property_id)), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let units = sqlx::query_as::<_, Unit>(
            r#"
            SELECT * FROM units
            WHERE property_id = $1
            ORDER BY name, id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(filter.property_id)
        .bind(filter.limit)
        .bind(filter.skip)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(units.into_iter().map(UnitDBResponse::from).collect())
    }

    #[instrument(skip(self), fields(unit_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM units WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(unit_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let unit = sqlx::query_as::<_, Unit>(
            r#"
            UPDATE units SET
                name = COALESCE($2, name),
                floor = COALESCE($3, floor),
                area_sqm = COALESCE($4, area_sqm),
                status = COALESCE($5, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.name)
        .bind(request.floor)
        .bind(request.area_sqm)
        .bind(request.status)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(UnitDBResponse::from(unit))
    }
}
