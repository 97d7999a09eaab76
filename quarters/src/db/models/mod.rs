//! Database record structures matching table schemas.

pub mod collaborators;
pub mod nodes;
pub mod properties;
pub mod units;
pub mod users;
