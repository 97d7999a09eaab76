//! Repository implementations for database access.
//!
//! This module provides repository structs for each major entity in the system.
//! Repositories follow a consistent pattern and implement the [`Repository`] trait
//! where the entity is a plain CRUD table; relation-like tables (collaborators,
//! nodes) expose purpose-built methods instead.
//!
//! # Design Pattern
//!
//! Each repository:
//! - Wraps a SQLx connection or transaction
//! - Provides strongly-typed CRUD operations
//! - Handles query construction and parameter binding
//! - Returns domain models from [`crate::db::models`]
//! - Uses the connection's transaction for ACID guarantees
//!
//! # Available Repositories
//!
//! - [`Users`]: Account records
//! - [`Properties`]: Properties and their soft-delete lifecycle
//! - [`Units`]: Rentable units within a property
//! - [`Collaborators`]: Property sharing grants
//! - [`Nodes`]: The per-property location tree

pub mod collaborators;
pub mod nodes;
pub mod properties;
pub mod repository;
pub mod units;
pub mod users;

pub use collaborators::Collaborators;
pub use nodes::Nodes;
pub use properties::Properties;
pub use repository::Repository;
pub use units::Units;
pub use users::Users;
