use crate::access::{require_edit, require_view};
use crate::api::models::nodes::{NodeCreate, NodeMove, NodeResponse, NodeTreeResponse, NodeUpdate};
use crate::api::models::users::CurrentUser;
use crate::db::handlers::Nodes;
use crate::db::models::nodes::{NodeCreateDBRequest, NodeUpdateDBRequest};
use crate::errors::{Error, Result};
use crate::hierarchy::{build_forest, NodeArena, TreeError};
use crate::types::{NodeId, PropertyId};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::{Acquire, PgConnection};

/// Load the structural arena for one property's nodes.
async fn load_arena(conn: &mut PgConnection, property_id: PropertyId) -> Result<NodeArena> {
    let rows = Nodes::new(conn).list_for_property(property_id).await?;
    Ok(NodeArena::from_edges(rows.iter().map(|n| n.edge())))
}

/// Like `load_arena`, but locks the property's node rows for the rest of the
/// transaction. Moves and subtree deletes validate against this snapshot, so
/// concurrent structural changes must serialize or the second writer could
/// commit a parent cycle neither transaction saw.
async fn load_arena_locked(conn: &mut PgConnection, property_id: PropertyId) -> Result<NodeArena> {
    let rows = Nodes::new(conn).list_for_property_for_update(property_id).await?;
    Ok(NodeArena::from_edges(rows.iter().map(|n| n.edge())))
}

fn map_tree_error(err: TreeError) -> Error {
    match err {
        TreeError::UnknownNode(id) => Error::NotFound {
            resource: "Node".to_string(),
            id: id.to_string(),
        },
        TreeError::Cycle(node_id) => Error::Cycle { node_id },
    }
}

#[utoipa::path(
    post,
    path = "/properties/{property_id}/nodes",
    tag = "nodes",
    summary = "Create node",
    description = "Adds a node to the property's location tree. A null parent creates a root node.",
    request_body = NodeCreate,
    responses(
        (status = 201, description = "Node created successfully", body = NodeResponse),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Insufficient access"),
        (status = 404, description = "Property or parent node not found"),
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
pub async fn create_node(
    State(state): State<AppState>,
    Path(property_id): Path<PropertyId>,
    current_user: CurrentUser,
    Json(create): Json<NodeCreate>,
) -> Result<(StatusCode, Json<NodeResponse>)> {
    if create.label.trim().is_empty() {
        return Err(Error::Validation {
            message: "Node label must not be empty".to_string(),
        });
    }

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    let node;
    {
        let conn = tx.acquire().await.map_err(|e| Error::Database(e.into()))?;
        let (property, _) = require_edit(conn, property_id, current_user.id, "edit nodes of").await?;
        if property.is_deleted {
            return Err(Error::Validation {
                message: "Property is deleted".to_string(),
            });
        }

        let arena = load_arena(conn, property_id).await?;
        if let Some(parent_id) = create.parent_id {
            // The arena only holds this property's nodes, so a parent from
            // another property is indistinguishable from a missing one.
            if !arena.contains(parent_id) {
                return Err(Error::NotFound {
                    resource: "Node".to_string(),
                    id: parent_id.to_string(),
                });
            }
        }

        let sort_order = create
            .sort_order
            .unwrap_or_else(|| arena.next_sort_order(create.parent_id));

        let mut repo = Nodes::new(conn);
        node = repo
            .create(&NodeCreateDBRequest {
                property_id,
                parent_id: create.parent_id,
                label: create.label,
                node_type: create.node_type,
                sort_order,
                metadata: create.metadata.unwrap_or_else(|| serde_json::json!({})),
            })
            .await?;
    }

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;
    Ok((StatusCode::CREATED, Json(NodeResponse::from(node))))
}

#[utoipa::path(
    get,
    path = "/properties/{property_id}/nodes/tree",
    tag = "nodes",
    summary = "Get node tree",
    description = "Returns the property's nodes as a forest. Children are ordered by sort order, ties broken by id.",
    responses(
        (status = 200, description = "Node forest", body = Vec<NodeTreeResponse>),
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
pub async fn get_tree(
    State(state): State<AppState>,
    Path(property_id): Path<PropertyId>,
    current_user: CurrentUser,
) -> Result<Json<Vec<NodeTreeResponse>>> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    require_view(&mut pool_conn, property_id, current_user.id).await?;

    let rows = Nodes::new(&mut pool_conn).list_for_property(property_id).await?;
    let forest = build_forest(rows, |n| n.edge());

    Ok(Json(forest.into_iter().map(NodeTreeResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/nodes/{node_id}/move",
    tag = "nodes",
    summary = "Move node",
    description = "Reparents a node within its property. Moves under the node itself or a descendant are rejected, as is reparenting across properties.",
    request_body = NodeMove,
    responses(
        (status = 200, description = "Node moved successfully", body = NodeResponse),
        (status = 400, description = "Cross-property move"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Insufficient access"),
        (status = 404, description = "Node not found"),
        (status = 409, description = "Move would create a cycle"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("node_id" = uuid::Uuid, Path, description = "Node ID")
    ),
    security(
        ("X-Quarters-User" = [])
    )
)]
#[tracing::instrument(skip_all)]
pub async fn move_node(
    State(state): State<AppState>,
    Path(node_id): Path<NodeId>,
    current_user: CurrentUser,
    Json(request): Json<NodeMove>,
) -> Result<Json<NodeResponse>> {
    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    let moved;
    {
        let conn = tx.acquire().await.map_err(|e| Error::Database(e.into()))?;

        let node = Nodes::new(&mut *conn)
            .get_by_id(node_id)
            .await?
            .ok_or_else(|| Error::NotFound {
                resource: "Node".to_string(),
                id: node_id.to_string(),
            })?;

        let (property, _) = require_edit(conn, node.property_id, current_user.id, "edit nodes of").await?;
        if property.is_deleted {
            return Err(Error::Validation {
                message: "Property is deleted".to_string(),
            });
        }

        if let Some(parent_id) = request.new_parent_id {
            let parent = Nodes::new(&mut *conn)
                .get_by_id(parent_id)
                .await?
                .ok_or_else(|| Error::NotFound {
                    resource: "Node".to_string(),
                    id: parent_id.to_string(),
                })?;
            if parent.property_id != node.property_id {
                return Err(Error::CrossProperty);
            }
        }

        let arena = load_arena_locked(conn, node.property_id).await?;
        arena
            .validate_move(node_id, request.new_parent_id)
            .map_err(map_tree_error)?;

        let sort_order = request
            .new_sort_order
            .unwrap_or_else(|| arena.next_sort_order(request.new_parent_id));

        let mut repo = Nodes::new(conn);
        moved = repo.set_parent(node_id, request.new_parent_id, sort_order).await?;
    }

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;
    Ok(Json(NodeResponse::from(moved)))
}

#[utoipa::path(
    patch,
    path = "/nodes/{node_id}",
    tag = "nodes",
    summary = "Update node",
    description = "Changes a node's label, type, or metadata in place. Reparenting goes through the move endpoint.",
    request_body = NodeUpdate,
    responses(
        (status = 200, description = "Node updated successfully", body = NodeResponse),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Insufficient access"),
        (status = 404, description = "Node not found"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("node_id" = uuid::Uuid, Path, description = "Node ID")
    ),
    security(
        ("X-Quarters-User" = [])
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_node(
    State(state): State<AppState>,
    Path(node_id): Path<NodeId>,
    current_user: CurrentUser,
    Json(update): Json<NodeUpdate>,
) -> Result<Json<NodeResponse>> {
    if update.label.as_deref().is_some_and(|label| label.trim().is_empty()) {
        return Err(Error::Validation {
            message: "Node label must not be empty".to_string(),
        });
    }

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    let updated;
    {
        let conn = tx.acquire().await.map_err(|e| Error::Database(e.into()))?;

        let node = Nodes::new(&mut *conn)
            .get_by_id(node_id)
            .await?
            .ok_or_else(|| Error::NotFound {
                resource: "Node".to_string(),
                id: node_id.to_string(),
            })?;

        let (property, _) = require_edit(conn, node.property_id, current_user.id, "edit nodes of").await?;
        if property.is_deleted {
            return Err(Error::Validation {
                message: "Property is deleted".to_string(),
            });
        }

        let mut repo = Nodes::new(conn);
        updated = repo.update(node_id, &NodeUpdateDBRequest::from(update)).await?;
    }

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;
    Ok(Json(NodeResponse::from(updated)))
}

#[utoipa::path(
    delete,
    path = "/nodes/{node_id}",
    tag = "nodes",
    summary = "Delete node",
    description = "Deletes a node and its entire descendant subtree.",
    responses(
        (status = 204, description = "Node and descendants deleted successfully"),
        (status = 400, description = "Property is deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Insufficient access"),
        (status = 404, description = "Node not found"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("node_id" = uuid::Uuid, Path, description = "Node ID")
    ),
    security(
        ("X-Quarters-User" = [])
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_node(
    State(state): State<AppState>,
    Path(node_id): Path<NodeId>,
    current_user: CurrentUser,
) -> Result<StatusCode> {
    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    {
        let conn = tx.acquire().await.map_err(|e| Error::Database(e.into()))?;

        let node = Nodes::new(&mut *conn)
            .get_by_id(node_id)
            .await?
            .ok_or_else(|| Error::NotFound {
                resource: "Node".to_string(),
                id: node_id.to_string(),
            })?;

        let (property, _) = require_edit(conn, node.property_id, current_user.id, "edit nodes of").await?;
        if property.is_deleted {
            return Err(Error::Validation {
                message: "Property is deleted".to_string(),
            });
        }

        let arena = load_arena_locked(conn, node.property_id).await?;
        let subtree = arena.subtree(node_id);

        let mut repo = Nodes::new(conn);
        repo.delete_many(&subtree).await?;
    }

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;
    Ok(StatusCode::NO_CONTENT)
}
