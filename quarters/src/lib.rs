//! # quarters: Multi-Tenant Property Management Backend
//!
//! `quarters` is the backend for a multi-tenant property management platform.
//! It owns the data model (users, properties, rentable units, collaborators,
//! and per-property location trees), enforces role-based access on every
//! property-scoped operation, and exposes a RESTful API for the web frontend.
//!
//! ## Overview
//!
//! A property belongs to exactly one owner and can be shared with other users
//! as collaborators holding an `EDITOR` or `VIEWER` role. Every request
//! resolves the caller's effective [`types::AccessLevel`] before touching a
//! property: reads need at least `VIEWER`, writes need at least `EDITOR`, and
//! sharing or lifecycle operations need `OWNER`. Callers with no relationship
//! to a property see `404` rather than `403`, so property ids cannot be
//! probed.
//!
//! Each property carries a location tree (buildings, floors, flats, rooms,
//! ...) stored as a self-referencing adjacency list. Structural operations
//! (reparenting, cascading subtree deletion) are validated against an
//! in-memory arena snapshot inside the enclosing transaction; see
//! [`hierarchy`]. Properties also support a soft-delete lifecycle
//! (active → deleted → purged) and signature capture for lease documents; see
//! [`signature`].
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum) for
//! the HTTP layer and uses PostgreSQL for all persistence. Authentication
//! happens upstream: a fronting proxy supplies the caller's email in a
//! trusted header (`x-quarters-user` by default), which the [`auth`] layer
//! resolves (and optionally auto-creates) into a user row.
//!
//! The **API layer** ([`api`]) exposes the management API under `/api/v1/*`
//! with RESTful conventions and OpenAPI documentation served at `/docs`.
//!
//! The **database layer** ([`db`]) uses the repository pattern: each entity
//! has a repository over `&mut PgConnection` handling queries and mutations,
//! so multi-step operations compose inside a single transaction.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use quarters::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = quarters::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     quarters::telemetry::init_telemetry()?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Database Setup
//!
//! The application requires a PostgreSQL database and automatically runs
//! migrations on startup:
//!
//! ```no_run
//! # use sqlx::PgPool;
//! # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
//! quarters::migrator().run(&pool).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options.

pub mod access;
pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod hierarchy;
mod openapi;
pub mod signature;
pub mod telemetry;
pub mod types;

use crate::api::models::users::AccountType;
use crate::config::CorsOrigin;
use crate::db::handlers::{Repository, Users};
use crate::db::models::users::UserCreateDBRequest;
use crate::openapi::ApiDoc;
use axum::http::HeaderValue;
use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use bon::Builder;
pub use config::Config;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{debug, info, instrument, Level};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use types::{CollaboratorId, NodeId, PropertyId, UnitId, UserId};

/// Application state shared across all request handlers.
///
/// # Fields
///
/// - `db`: PostgreSQL connection pool
/// - `config`: Application configuration loaded from file/environment
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
}

/// Get the quarters database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Create the initial user if it doesn't exist.
///
/// Idempotent: called on every startup so a fresh deployment has an account
/// to sign in with through the identity header. Returns the user ID of the
/// created or existing user.
#[instrument(skip_all)]
pub async fn create_initial_user(email: &str, db: &PgPool) -> anyhow::Result<UserId> {
    let mut tx = db.begin().await?;
    let mut user_repo = Users::new(&mut tx);

    if let Some(existing_user) = user_repo.get_by_email(email).await? {
        tx.commit().await?;
        return Ok(existing_user.id);
    }

    let created_user = user_repo
        .create(&UserCreateDBRequest {
            name: email.to_string(),
            email: email.to_string(),
            phone: None,
            password_hash: None,
            account_type: AccountType::Individual,
        })
        .await?;

    tx.commit().await?;
    info!("Created initial user {}", email);
    Ok(created_user.id)
}

/// Connect to PostgreSQL, run migrations, and create the initial user.
async fn setup_database(config: &Config) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(std::time::Duration::from_secs(config.database.acquire_timeout_secs))
        .connect(&config.database.url)
        .await?;

    migrator().run(&pool).await?;

    if let Some(email) = &config.initial_user_email {
        create_initial_user(email, &pool).await?;
    }

    Ok(pool)
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let mut origins = Vec::new();
    for origin in &config.cors.allowed_origins {
        let header_value = match origin {
            CorsOrigin::Wildcard => "*".parse::<HeaderValue>()?,
            CorsOrigin::Url(url) => url.as_str().trim_end_matches('/').parse::<HeaderValue>()?,
        };
        origins.push(header_value);
    }

    let mut cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(config.cors.allow_credentials)
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            config.identity.header_name.parse()?,
        ])
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PATCH,
            axum::http::Method::DELETE,
        ]);

    if let Some(max_age) = config.cors.max_age {
        cors = cors.max_age(std::time::Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Build the main application router with all endpoints and middleware.
///
/// Constructs the complete Axum router with:
/// - Management API routes under `/api/v1`
/// - Health check at `/healthz`
/// - Interactive API documentation at `/docs`
/// - CORS configuration
/// - Tracing middleware
#[instrument(skip_all)]
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let api_routes = Router::new()
        // Users
        .route("/users", get(api::handlers::users::list_users))
        .route("/users/{id}", get(api::handlers::users::get_user))
        // Properties and lifecycle
        .route("/properties", get(api::handlers::properties::list_properties))
        .route("/properties", post(api::handlers::properties::create_property))
        .route("/properties/deleted", get(api::handlers::properties::list_deleted_properties))
        .route("/properties/{id}", get(api::handlers::properties::get_property))
        .route("/properties/{id}", patch(api::handlers::properties::update_property))
        .route("/properties/{id}", delete(api::handlers::properties::delete_property))
        .route("/properties/{id}/restore", post(api::handlers::properties::restore_property))
        .route("/properties/{id}/purge", delete(api::handlers::properties::purge_property))
        .route("/properties/{id}/access", get(api::handlers::properties::get_access))
        // Units
        .route("/properties/{id}/units", get(api::handlers::units::list_units))
        .route("/properties/{id}/units", post(api::handlers::units::create_unit))
        .route("/units/{id}", patch(api::handlers::units::update_unit))
        .route("/units/{id}", delete(api::handlers::units::delete_unit))
        // Collaborators
        .route(
            "/properties/{id}/collaborators",
            get(api::handlers::collaborators::list_collaborators),
        )
        .route(
            "/properties/{id}/collaborators",
            post(api::handlers::collaborators::share_property),
        )
        .route(
            "/properties/{id}/collaborators/{user_id}",
            patch(api::handlers::collaborators::update_collaborator_role),
        )
        .route(
            "/properties/{id}/collaborators/{user_id}",
            delete(api::handlers::collaborators::remove_collaborator),
        )
        // Location trees
        .route("/properties/{id}/nodes", post(api::handlers::nodes::create_node))
        .route("/properties/{id}/nodes/tree", get(api::handlers::nodes::get_tree))
        .route("/nodes/{id}/move", post(api::handlers::nodes::move_node))
        .route("/nodes/{id}", patch(api::handlers::nodes::update_node))
        .route("/nodes/{id}", delete(api::handlers::nodes::delete_node))
        // Signatures
        .route(
            "/properties/{id}/signatures",
            post(api::handlers::signatures::submit_signature),
        )
        .route(
            "/properties/{id}/signatures",
            delete(api::handlers::signatures::clear_signature),
        )
        .with_state(state.clone());

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .nest("/api/v1", api_routes)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    let cors_layer = create_cors_layer(&state.config)?;

    let router = router.layer(cors_layer).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    Ok(router)
}

/// Main application struct that owns all resources and lifecycle.
///
/// # Lifecycle
///
/// 1. **Create**: [`Application::new`] connects to the database, runs
///    migrations, and creates the initial user
/// 2. **Serve**: [`Application::serve`] binds to a TCP port and starts
///    handling requests
/// 3. **Shutdown**: on the shutdown signal, in-flight requests drain and
///    connections close
pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting quarters with configuration: {:#?}", config);

        let pool = setup_database(&config).await?;

        let state = AppState::builder().db(pool.clone()).config(config.clone()).build();
        let router = build_router(state)?;

        Ok(Self { router, config, pool })
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "quarters listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Closing database connections...");
        self.pool.close().await;

        Ok(())
    }
}
