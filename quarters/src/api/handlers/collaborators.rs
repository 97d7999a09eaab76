use crate::access::{require_owner, require_view};
use crate::api::models::collaborators::{CollaboratorCreate, CollaboratorResponse, CollaboratorUpdate};
use crate::api::models::users::CurrentUser;
use crate::db::errors::DbError;
use crate::db::handlers::{Collaborators, Users};
use crate::db::models::collaborators::CollaboratorCreateDBRequest;
use crate::errors::{Error, Result};
use crate::types::{PropertyId, UserId};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::Acquire;

#[utoipa::path(
    post,
    path = "/properties/{property_id}/collaborators",
    tag = "collaborators",
    summary = "Share property",
    description = "Grants another user, addressed by email, access to the property. Owner only.",
    request_body = CollaboratorCreate,
    responses(
        (status = 201, description = "Property shared successfully", body = CollaboratorResponse),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Insufficient access"),
        (status = 404, description = "Property or user not found"),
        (status = 409, description = "Property is already shared with this user"),
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
pub async fn share_property(
    State(state): State<AppState>,
    Path(property_id): Path<PropertyId>,
    current_user: CurrentUser,
    Json(create): Json<CollaboratorCreate>,
) -> Result<(StatusCode, Json<CollaboratorResponse>)> {
    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    let collaborator;
    {
        let conn = tx.acquire().await.map_err(|e| Error::Database(e.into()))?;
        let property = require_owner(conn, property_id, current_user.id, "share").await?;
        if property.is_deleted {
            return Err(Error::Validation {
                message: "Property is deleted".to_string(),
            });
        }

        let target = Users::new(&mut *conn)
            .get_by_email(&create.email)
            .await?
            .ok_or_else(|| Error::NotFound {
                resource: "User".to_string(),
                id: create.email.clone(),
            })?;

        if target.id == property.owner_id {
            return Err(Error::Validation {
                message: "Cannot share a property with its owner".to_string(),
            });
        }

        let mut repo = Collaborators::new(conn);
        collaborator = repo
            .add(&CollaboratorCreateDBRequest {
                property_id,
                user_id: target.id,
                role: create.role,
                invited_by: current_user.id,
            })
            .await
            .map_err(|e| match e {
                DbError::UniqueViolation { .. } => Error::AlreadyShared {
                    email: create.email.clone(),
                },
                other => Error::Database(other),
            })?;
    }

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;
    Ok((StatusCode::CREATED, Json(CollaboratorResponse::from(collaborator))))
}

#[utoipa::path(
    get,
    path = "/properties/{property_id}/collaborators",
    tag = "collaborators",
    summary = "List collaborators",
    responses(
        (status = 200, description = "List of collaborators", body = Vec<CollaboratorResponse>),
        (status = 401, description = "Unauthorized"),
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
pub async fn list_collaborators(
    State(state): State<AppState>,
    Path(property_id): Path<PropertyId>,
    current_user: CurrentUser,
) -> Result<Json<Vec<CollaboratorResponse>>> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    require_view(&mut pool_conn, property_id, current_user.id).await?;

    let mut repo = Collaborators::new(&mut pool_conn);
    let collaborators = repo.list_for_property(property_id).await?;

    Ok(Json(collaborators.into_iter().map(CollaboratorResponse::from).collect()))
}

#[utoipa::path(
    patch,
    path = "/properties/{property_id}/collaborators/{user_id}",
    tag = "collaborators",
    summary = "Change collaborator role",
    request_body = CollaboratorUpdate,
    responses(
        (status = 200, description = "Role updated successfully", body = CollaboratorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Insufficient access"),
        (status = 404, description = "Property or collaborator not found"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("property_id" = uuid::Uuid, Path, description = "Property ID"),
        ("user_id" = uuid::Uuid, Path, description = "Collaborating user ID")
    ),
    security(
        ("X-Quarters-User" = [])
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_collaborator_role(
    State(state): State<AppState>,
    Path((property_id, user_id)): Path<(PropertyId, UserId)>,
    current_user: CurrentUser,
    Json(update): Json<CollaboratorUpdate>,
) -> Result<Json<CollaboratorResponse>> {
    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    let collaborator;
    {
        let conn = tx.acquire().await.map_err(|e| Error::Database(e.into()))?;
        require_owner(conn, property_id, current_user.id, "manage collaborators of").await?;

        let mut repo = Collaborators::new(conn);
        let existing = repo
            .get_for_user(property_id, user_id)
            .await?
            .ok_or_else(|| Error::NotFound {
                resource: "Collaborator".to_string(),
                id: user_id.to_string(),
            })?;

        collaborator = repo.update_role(existing.id, update.role).await?;
    }

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;
    Ok(Json(CollaboratorResponse::from(collaborator)))
}

#[utoipa::path(
    delete,
    path = "/properties/{property_id}/collaborators/{user_id}",
    tag = "collaborators",
    summary = "Unshare property",
    responses(
        (status = 204, description = "Collaborator removed successfully"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Insufficient access"),
        (status = 404, description = "Property or collaborator not found"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("property_id" = uuid::Uuid, Path, description = "Property ID"),
        ("user_id" = uuid::Uuid, Path, description = "Collaborating user ID")
    ),
    security(
        ("X-Quarters-User" = [])
    )
)]
#[tracing::instrument(skip_all)]
pub async fn remove_collaborator(
    State(state): State<AppState>,
    Path((property_id, user_id)): Path<(PropertyId, UserId)>,
    current_user: CurrentUser,
) -> Result<StatusCode> {
    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    {
        let conn = tx.acquire().await.map_err(|e| Error::Database(e.into()))?;
        require_owner(conn, property_id, current_user.id, "manage collaborators of").await?;

        let mut repo = Collaborators::new(conn);
        let existing = repo
            .get_for_user(property_id, user_id)
            .await?
            .ok_or_else(|| Error::NotFound {
                resource: "Collaborator".to_string(),
                id: user_id.to_string(),
            })?;

        repo.remove(existing.id).await?;
    }

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;
    Ok(StatusCode::NO_CONTENT)
}
