//! Database models for property nodes (the location tree).

use crate::api::models::nodes::{NodeType, NodeUpdate};
use crate::hierarchy::NodeEdge;
use crate::types::{NodeId, PropertyId};
use chrono::{DateTime, Utc};

/// Database request for creating a node
#[derive(Debug, Clone)]
pub struct NodeCreateDBRequest {
    pub property_id: PropertyId,
    pub parent_id: Option<NodeId>,
    pub label: String,
    pub node_type: NodeType,
    pub sort_order: i32,
    pub metadata: serde_json::Value,
}

/// Database request for updating a node's own fields. Structure changes
/// (parent, sort order) go through the move operation instead.
#[derive(Debug, Clone, Default)]
pub struct NodeUpdateDBRequest {
    pub label: Option<String>,
    pub node_type: Option<NodeType>,
    pub metadata: Option<serde_json::Value>,
}

impl From<NodeUpdate> for NodeUpdateDBRequest {
    fn from(api: NodeUpdate) -> Self {
        Self {
            label: api.label,
            node_type: api.node_type,
            metadata: api.metadata,
        }
    }
}

/// Database response for a node
#[derive(Debug, Clone)]
pub struct NodeDBResponse {
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

impl NodeDBResponse {
    /// Structural view used by the arena.
    pub fn edge(&self) -> NodeEdge {
        NodeEdge {
            id: self.id,
            parent_id: self.parent_id,
            sort_order: self.sort_order,
        }
    }
}
