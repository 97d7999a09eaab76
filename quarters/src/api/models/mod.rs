//! Request and response types for the HTTP API.

pub mod collaborators;
pub mod nodes;
pub mod pagination;
pub mod properties;
pub mod signatures;
pub mod units;
pub mod users;
