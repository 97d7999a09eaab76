use crate::access::{require_edit, require_view};
use crate::api::models::pagination::Pagination;
use crate::api::models::units::{UnitCreate, UnitResponse, UnitUpdate};
use crate::api::models::users::CurrentUser;
use crate::db::handlers::{units::UnitFilter, Repository, Units};
use crate::db::models::units::{UnitCreateDBRequest, UnitUpdateDBRequest};
use crate::errors::{Error, Result};
use crate::types::{PropertyId, UnitId};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use sqlx::{Acquire, PgConnection};

/// Fetch a unit and check the caller can edit its (non-deleted) property.
async fn require_editable_unit(
    conn: &mut PgConnection,
    unit_id: UnitId,
    current_user: &CurrentUser,
    action: &str,
) -> Result<crate::db::models::units::UnitDBResponse> {
    let unit = Units::new(&mut *conn)
        .get_by_id(unit_id)
        .await?
        .ok_or_else(|| Error::NotFound {
            resource: "Unit".to_string(),
            id: unit_id.to_string(),
        })?;

    let (property, _) = require_edit(conn, unit.property_id, current_user.id, action).await?;
    if property.is_deleted {
        return Err(Error::Validation {
            message: "Property is deleted".to_string(),
        });
    }

    Ok(unit)
}

#[utoipa::path(
    post,
    path = "/properties/{property_id}/units",
    tag = "units",
    summary = "Create unit",
    request_body = UnitCreate,
    responses(
        (status = 201, description = "Unit created successfully", body = UnitResponse),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Insufficient access"),
        (status = 404, description = "Property not found"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("property_id" = uuid::Uuid, Path, description = "Property ID")
    ),
    security(
        ("X-Quarters-User" = [])
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_unit(
    State(state): State<AppState>,
    Path(property_id): Path<PropertyId>,
    current_user: CurrentUser,
    Json(create): Json<UnitCreate>,
) -> Result<(StatusCode, Json<UnitResponse>)> {
    if create.name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Unit name must not be empty".to_string(),
        });
    }

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    let unit;
    {
        let conn = tx.acquire().await.map_err(|e| Error::Database(e.into()))?;
        let (property, _) = require_edit(conn, property_id, current_user.id, "add units to").await?;
        if property.is_deleted {
            return Err(Error::Validation {
                message: "Property is deleted".to_string(),
            });
        }

        let mut repo = Units::new(conn);
        unit = repo.create(&UnitCreateDBRequest::new(property_id, create)).await?;
    }

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;
    Ok((StatusCode::CREATED, Json(UnitResponse::from(unit))))
}

#[utoipa::path(
    get,
    path = "/properties/{property_id}/units",
    tag = "units",
    summary = "List units",
    responses(
        (status = 200, description = "List of units", body = Vec<UnitResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Property not found"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("property_id" = uuid::Uuid, Path, description = "Property ID"),
        ("skip" = Option<i64>, Query, description = "Number of units to skip"),
        ("limit" = Option<i64>, Query, description = "Maximum number of units to return"),
    ),
    security(
        ("X-Quarters-User" = [])
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_units(
    State(state): State<AppState>,
    Path(property_id): Path<PropertyId>,
    current_user: CurrentUser,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<UnitResponse>>> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    require_view(&mut pool_conn, property_id, current_user.id).await?;

    let mut repo = Units::new(&mut pool_conn);
    let (skip, limit) = pagination.params();
    let units = repo.list(&UnitFilter::new(property_id, skip, limit)).await?;

    Ok(Json(units.into_iter().map(UnitResponse::from).collect()))
}

#[utoipa::path(
    patch,
    path = "/units/{unit_id}",
    tag = "units",
    summary = "Update unit",
    request_body = UnitUpdate,
    responses(
        (status = 200, description = "Unit updated successfully", body = UnitResponse),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Insufficient access"),
        (status = 404, description = "Unit not found"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("unit_id" = uuid::Uuid, Path, description = "Unit ID")
    ),
    security(
        ("X-Quarters-User" = [])
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_unit(
    State(state): State<AppState>,
    Path(unit_id): Path<UnitId>,
    current_user: CurrentUser,
    Json(update): Json<UnitUpdate>,
) -> Result<Json<UnitResponse>> {
    if update.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
        return Err(Error::Validation {
            message: "Unit name must not be empty".to_string(),
        });
    }

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    let unit;
    {
        let conn = tx.acquire().await.map_err(|e| Error::Database(e.into()))?;
        require_editable_unit(conn, unit_id, &current_user, "update units of").await?;

        let mut repo = Units::new(conn);
        unit = repo.update(unit_id, &UnitUpdateDBRequest::from(update)).await?;
    }

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;
    Ok(Json(UnitResponse::from(unit)))
}

#[utoipa::path(
    delete,
    path = "/units/{unit_id}",
    tag = "units",
    summary = "Delete unit",
    responses(
        (status = 204, description = "Unit deleted successfully"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Insufficient access"),
        (status = 404, description = "Unit not found"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("unit_id" = uuid::Uuid, Path, description = "Unit ID")
    ),
    security(
        ("X-Quarters-User" = [])
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_unit(
    State(state): State<AppState>,
    Path(unit_id): Path<UnitId>,
    current_user: CurrentUser,
) -> Result<StatusCode> {
    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    {
        let conn = tx.acquire().await.map_err(|e| Error::Database(e.into()))?;
        require_editable_unit(conn, unit_id, &current_user, "delete units of").await?;

        let mut repo = Units::new(conn);
        repo.delete(unit_id).await?;
    }

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;
    Ok(StatusCode::NO_CONTENT)
}
