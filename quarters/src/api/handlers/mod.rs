//! HTTP request handlers for all API endpoints.
//!
//! Each handler deserializes and validates its request, resolves the acting
//! user's access level via [`crate::access`], runs the business logic through
//! the repositories in [`crate::db::handlers`], and serializes the response.
//! Mutations run inside a single transaction so partial state (a half-moved
//! node, a mid-cascade delete) is never observable.
//!
//! # Handler Modules
//!
//! - [`collaborators`]: Sharing a property, role changes, unsharing
//! - [`nodes`]: Location-tree CRUD, reparenting, subtree deletion
//! - [`properties`]: Property CRUD, soft-delete lifecycle, access introspection
//! - [`signatures`]: Signature stroke replay, rasterization, storage
//! - [`units`]: Unit CRUD under a property
//! - [`users`]: User listing and lookup
//!
//! # Error Handling
//!
//! Handlers return [`crate::errors::Error`] which converts to the appropriate
//! HTTP status code and a user-safe message.

pub mod collaborators;
pub mod nodes;
pub mod properties;
pub mod signatures;
pub mod units;
pub mod users;
