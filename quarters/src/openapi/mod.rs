//! OpenAPI documentation configuration.
//!
//! This module defines the OpenAPI document for the management API at `/api/v1/*`.
//! The interactive documentation is served at `/docs`.

use utoipa::{
    Modify, OpenApi,
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
};

use crate::api;
use crate::api::models;

/// Security scheme for the trusted identity header supplied by the fronting
/// auth layer.
struct IdentityHeaderAddon;

impl Modify for IdentityHeaderAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.security_schemes.insert(
                "X-Quarters-User".to_string(),
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                    "x-quarters-user",
                    "Email address of the acting user, set by the trusted fronting proxy.",
                ))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    servers(
        (url = "/api/v1", description = "Property management API")
    ),
    modifiers(&IdentityHeaderAddon),
    paths(
        // Users
        api::handlers::users::list_users,
        api::handlers::users::get_user,
        // Properties
        api::handlers::properties::list_properties,
        api::handlers::properties::create_property,
        api::handlers::properties::list_deleted_properties,
        api::handlers::properties::get_property,
        api::handlers::properties::update_property,
        api::handlers::properties::delete_property,
        api::handlers::properties::restore_property,
        api::handlers::properties::purge_property,
        api::handlers::properties::get_access,
        // Units
        api::handlers::units::create_unit,
        api::handlers::units::list_units,
        api::handlers::units::update_unit,
        api::handlers::units::delete_unit,
        // Collaborators
        api::handlers::collaborators::share_property,
        api::handlers::collaborators::list_collaborators,
        api::handlers::collaborators::update_collaborator_role,
        api::handlers::collaborators::remove_collaborator,
        // Nodes
        api::handlers::nodes::create_node,
        api::handlers::nodes::get_tree,
        api::handlers::nodes::move_node,
        api::handlers::nodes::update_node,
        api::handlers::nodes::delete_node,
        // Signatures
        api::handlers::signatures::submit_signature,
        api::handlers::signatures::clear_signature,
    ),
    components(
        schemas(
            models::users::AccountType,
            models::users::UserResponse,
            models::properties::PropertyType,
            models::properties::PropertyCreate,
            models::properties::PropertyUpdate,
            models::properties::PropertyResponse,
            models::properties::AccessResponse,
            models::units::UnitStatus,
            models::units::UnitCreate,
            models::units::UnitUpdate,
            models::units::UnitResponse,
            models::collaborators::CollaboratorRole,
            models::collaborators::CollaboratorCreate,
            models::collaborators::CollaboratorUpdate,
            models::collaborators::CollaboratorResponse,
            models::nodes::NodeType,
            models::nodes::NodeCreate,
            models::nodes::NodeUpdate,
            models::nodes::NodeMove,
            models::nodes::NodeResponse,
            models::nodes::NodeTreeResponse,
            models::signatures::SignaturePoint,
            models::signatures::SignatureSubmit,
            models::signatures::SignatureResponse,
        )
    ),
    tags(
        (name = "users", description = "User lookup"),
        (name = "properties", description = "Property CRUD and soft-delete lifecycle"),
        (name = "units", description = "Rentable units within a property"),
        (name = "collaborators", description = "Property sharing and roles"),
        (name = "nodes", description = "Property location trees"),
        (name = "signatures", description = "Signature capture"),
    )
)]
pub struct ApiDoc;
