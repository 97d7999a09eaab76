use crate::access::require_edit;
use crate::api::models::signatures::{SignatureResponse, SignatureSubmit};
use crate::api::models::users::CurrentUser;
use crate::db::handlers::Properties;
use crate::errors::{Error, Result};
use crate::signature::{replay_strokes, SignatureError, SURFACE_HEIGHT, SURFACE_WIDTH};
use crate::types::PropertyId;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::Acquire;

/// Upper bound on points per submission. A real signature is a few hundred
/// points; rendering cost grows linearly with the count.
const MAX_SIGNATURE_POINTS: usize = 2_000;

#[utoipa::path(
    post,
    path = "/properties/{property_id}/signatures",
    tag = "signatures",
    summary = "Submit signature",
    description = "Replays the submitted strokes onto a fresh drawing surface, rasterizes it to a PNG data URL, and stores it on the property.",
    request_body = SignatureSubmit,
    responses(
        (status = 201, description = "Signature rendered and stored", body = SignatureResponse),
        (status = 400, description = "Empty or invalid signature"),
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
pub async fn submit_signature(
    State(state): State<AppState>,
    Path(property_id): Path<PropertyId>,
    current_user: CurrentUser,
    Json(submit): Json<SignatureSubmit>,
) -> Result<(StatusCode, Json<SignatureResponse>)> {
    let point_count: usize = submit.strokes.iter().map(Vec::len).sum();
    if point_count > MAX_SIGNATURE_POINTS {
        return Err(Error::Validation {
            message: format!("Signature must not exceed {MAX_SIGNATURE_POINTS} points"),
        });
    }
    // JSON numbers out of f32 range deserialize to infinity
    if submit
        .strokes
        .iter()
        .flatten()
        .any(|p| !p.x.is_finite() || !p.y.is_finite())
    {
        return Err(Error::Validation {
            message: "Signature points must be finite coordinates".to_string(),
        });
    }

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    let data_url;
    {
        let conn = tx.acquire().await.map_err(|e| Error::Database(e.into()))?;
        let (property, _) = require_edit(conn, property_id, current_user.id, "sign").await?;
        if property.is_deleted {
            return Err(Error::Validation {
                message: "Property is deleted".to_string(),
            });
        }

        let strokes: Vec<Vec<(f32, f32)>> = submit
            .strokes
            .iter()
            .map(|stroke| stroke.iter().map(|p| (p.x, p.y)).collect())
            .collect();

        let pad = replay_strokes(&strokes);
        data_url = pad.save().map_err(|e| match e {
            SignatureError::EmptySurface => Error::Validation {
                message: "Signature must contain at least one stroke".to_string(),
            },
            SignatureError::Encoding(msg) => Error::Internal {
                operation: format!("encode signature image: {msg}"),
            },
        })?;

        let mut repo = Properties::new(conn);
        repo.set_signature(property_id, Some(&data_url)).await?;
    }

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;
    Ok((
        StatusCode::CREATED,
        Json(SignatureResponse {
            property_id,
            data_url,
            width: SURFACE_WIDTH,
            height: SURFACE_HEIGHT,
        }),
    ))
}

#[utoipa::path(
    delete,
    path = "/properties/{property_id}/signatures",
    tag = "signatures",
    summary = "Clear signature",
    responses(
        (status = 204, description = "Stored signature cleared"),
        (status = 400, description = "Property is deleted"),
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
pub async fn clear_signature(
    State(state): State<AppState>,
    Path(property_id): Path<PropertyId>,
    current_user: CurrentUser,
) -> Result<StatusCode> {
    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    {
        let conn = tx.acquire().await.map_err(|e| Error::Database(e.into()))?;
        let (property, _) = require_edit(conn, property_id, current_user.id, "sign").await?;
        if property.is_deleted {
            return Err(Error::Validation {
                message: "Property is deleted".to_string(),
            });
        }

        let mut repo = Properties::new(conn);
        repo.set_signature(property_id, None).await?;
    }

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;
    Ok(StatusCode::NO_CONTENT)
}
