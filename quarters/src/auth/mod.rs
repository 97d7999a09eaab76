//! Identity resolution for incoming requests.
//!
//! Authentication itself happens upstream (an authenticating reverse proxy
//! or SSO gateway); the application trusts a configured header carrying the
//! caller's email and resolves it to a user row. See
//! [`current_user::CurrentUser`] for the handler-side extractor.
//!
//! ```ignore
//! use quarters::api::models::users::CurrentUser;
//!
//! async fn handler(current_user: CurrentUser) { /* ... */ }
//! ```

pub mod current_user;
