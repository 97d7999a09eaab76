//! API-facing hierarchy node types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::models::nodes::NodeDBResponse;
use crate::hierarchy::Tree;
use crate::types::{NodeId, PropertyId};

/// The kind of a hierarchy node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "node_type", rename_all = "lowercase")]
pub enum NodeType {
    Building,
    Floor,
    Flat,
    Villa,
    Room,
    Bed,
    Section,
    Plot,
    Custom,
}

/// Request body for creating a node. A `parent_id` of `null` creates a root
/// node; `sort_order` defaults to the end of the sibling list.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NodeCreate {
    pub label: String,
    pub node_type: NodeType,
    #[serde(default)]
    #[schema(value_type = Option<String>, format = "uuid")]
    pub parent_id: Option<NodeId>,
    #[serde(default)]
    pub sort_order: Option<i32>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

/// Request body for updating a node in place. Re-parenting goes through the
/// move endpoint, not here.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct NodeUpdate {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub node_type: Option<NodeType>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

/// Request body for moving a node to a new parent. A `new_parent_id` of
/// `null` makes the node a root.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NodeMove {
    #[schema(value_type = Option<String>, format = "uuid")]
    pub new_parent_id: Option<NodeId>,
    #[serde(default)]
    pub new_sort_order: Option<i32>,
}

/// A node as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NodeResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: NodeId,
    #[schema(value_type = String, format = "uuid")]
    pub property_id: PropertyId,
    #[schema(value_type = Option<String>, format = "uuid")]
    pub parent_id: Option<NodeId>,
    pub label: String,
    pub node_type: NodeType,
    pub sort_order: i32,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<NodeDBResponse> for NodeResponse {
    fn from(db: NodeDBResponse) -> Self {
        Self {
            id: db.id,
            property_id: db.property_id,
            parent_id: db.parent_id,
            label: db.label,
            node_type: db.node_type,
            sort_order: db.sort_order,
            metadata: db.metadata,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

/// A node together with its children, as returned by the tree endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NodeTreeResponse {
    #[serde(flatten)]
    pub node: NodeResponse,
    #[schema(no_recursion)]
    pub children: Vec<NodeTreeResponse>,
}

impl From<Tree<NodeDBResponse>> for NodeTreeResponse {
    fn from(tree: Tree<NodeDBResponse>) -> Self {
        Self {
            node: tree.value.into(),
            children: tree.children.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_type_serialization() {
        assert_eq!(
            serde_json::to_string(&NodeType::Building).unwrap(),
            "\"BUILDING\""
        );
        let parsed: NodeType = serde_json::from_str("\"FLAT\"").unwrap();
        assert_eq!(parsed, NodeType::Flat);
    }

    #[test]
    fn test_node_move_null_parent() {
        let body = serde_json::json!({ "new_parent_id": null });
        let req: NodeMove = serde_json::from_value(body).unwrap();
        assert_eq!(req.new_parent_id, None);
        assert_eq!(req.new_sort_order, None);
    }
}
