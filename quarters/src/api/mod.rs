//! API layer for HTTP request handling and data models.
//!
//! This module contains the REST API implementation, organized into:
//!
//! - **[`handlers`]**: Axum route handlers for all API endpoints
//! - **[`models`]**: Request/response data structures for API communication
//!
//! # API Structure
//!
//! Everything lives under `/api/v1`:
//!
//! - **Users** (`/users/*`): User listing and lookup
//! - **Properties** (`/properties/*`): Property CRUD, soft-delete lifecycle,
//!   access introspection
//! - **Units** (`/properties/{id}/units`, `/units/*`): Rentable unit CRUD
//! - **Collaborators** (`/properties/{id}/collaborators/*`): Sharing and roles
//! - **Nodes** (`/properties/{id}/nodes/*`, `/nodes/*`): Location trees
//! - **Signatures** (`/properties/{id}/signatures`): Signature capture
//!
//! # OpenAPI Documentation
//!
//! All endpoints are documented with OpenAPI annotations using `utoipa`.
//! API documentation is served at `/docs` when the server is running.

pub mod handlers;
pub mod models;
