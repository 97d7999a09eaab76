//! Database repository for property nodes.
//!
//! Structural validation (cycles, cross-property moves) happens above this
//! layer: callers load the property's full edge set into a
//! [`crate::hierarchy::NodeArena`] inside a transaction, validate there, and
//! only then mutate rows here.

use crate::api::models::nodes::NodeType;
use crate::db::{
    errors::{DbError, Result},
    models::nodes::{NodeCreateDBRequest, NodeDBResponse, NodeUpdateDBRequest},
};
use crate::types::{NodeId, PropertyId, abbrev_uuid};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection};
use tracing::instrument;

// Database entity model
#[derive(Debug, Clone, FromRow)]
struct Node {
    pub id: NodeId,
    pub property_id: PropertyId,
    pub parent_id: Option<NodeId>,
    pub label: String,
    pub node_type: NodeType,
    pub sort_order: i32,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Node> for NodeDBResponse {
    fn from(n: Node) -> Self {
        Self {
            id: n.id,
            property_id: n.property_id,
            parent_id: n.parent_id,
            label: n.label,
            node_type: n.node_type,
            sort_order: n.sort_order,
            metadata: n.metadata,
            created_at: n.created_at,
            updated_at: n.updated_at,
        }
    }
}

pub struct Nodes<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Nodes<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(
        skip(self, request),
        fields(label = %request.label, property_id = %abbrev_uuid(&request.property_id)),
        err
    )]
    pub async fn create(&mut self, request: &NodeCreateDBRequest) -> Result<NodeDBResponse> {
        let node = sqlx::query_as::<_, Node>(
            r#"
            INSERT INTO property_nodes (property_id, parent_id, label, node_type, sort_order, metadata)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(request.property_id)
        .bind(request.parent_id)
        .bind(&request.label)
        .bind(request.node_type)
        .bind(request.sort_order)
        .bind(&request.metadata)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(NodeDBResponse::from(node))
    }

    #[instrument(skip(self), fields(node_id = %abbrev_uuid(&id)), err)]
    pub async fn get_by_id(&mut self, id: NodeId) -> Result<Option<NodeDBResponse>> {
        let node = sqlx::query_as::<_, Node>("SELECT * FROM property_nodes WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(node.map(NodeDBResponse::from))
    }

    /// All nodes of one property, in stable sibling order.
    #[instrument(skip(self), fields(property_id = %abbrev_uuid(&property_id)), err)]
    pub async fn list_for_property(&mut self, property_id: PropertyId) -> Result<Vec<NodeDBResponse>> {
        let nodes = sqlx::query_as::<_, Node>(
            "SELECT * FROM property_nodes WHERE property_id = $1 ORDER BY sort_order, id",
        )
        .bind(property_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(nodes.into_iter().map(NodeDBResponse::from).collect())
    }

    /// Same as `list_for_property`, but takes row locks held for the rest of
    /// the transaction. Structural changes (moves, subtree deletes) validate
    /// against this snapshot; the locks serialize concurrent changes to one
    /// property's tree, so the snapshot cannot go stale under the caller.
    #[instrument(skip(self), fields(property_id = %abbrev_uuid(&property_id)), err)]
    pub async fn list_for_property_for_update(
        &mut self,
        property_id: PropertyId,
    ) -> Result<Vec<NodeDBResponse>> {
        let nodes = sqlx::query_as::<_, Node>(
            "SELECT * FROM property_nodes WHERE property_id = $1 ORDER BY sort_order, id FOR UPDATE",
        )
        .bind(property_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(nodes.into_iter().map(NodeDBResponse::from).collect())
    }

    #[instrument(skip(self, request), fields(node_id = %abbrev_uuid(&id)), err)]
    pub async fn update(&mut self, id: NodeId, request: &NodeUpdateDBRequest) -> Result<NodeDBResponse> {
        let node = sqlx::query_as::<_, Node>(
            r#"
            UPDATE property_nodes SET
                label = COALESCE($2, label),
                node_type = COALESCE($3, node_type),
                metadata = COALESCE($4, metadata),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.label)
        .bind(request.node_type)
        .bind(&request.metadata)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(NodeDBResponse::from(node))
    }

    /// Re-parent a node. The caller has already validated the move against
    /// the arena.
    #[instrument(skip(self), fields(node_id = %abbrev_uuid(&id)), err)]
    pub async fn set_parent(&mut self, id: NodeId, parent_id: Option<NodeId>, sort_order: i32) -> Result<NodeDBResponse> {
        let node = sqlx::query_as::<_, Node>(
            r#"
            UPDATE property_nodes SET
                parent_id = $2,
                sort_order = $3,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(parent_id)
        .bind(sort_order)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(NodeDBResponse::from(node))
    }

    /// Delete a set of nodes in one statement. Used for subtree removal:
    /// the set always contains every descendant, so the parent FK holds at
    /// statement end.
    #[instrument(skip(self, ids), fields(count = ids.len()), err)]
    pub async fn delete_many(&mut self, ids: &[NodeId]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query("DELETE FROM property_nodes WHERE id = ANY($1)")
            .bind(ids)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected())
    }
}
