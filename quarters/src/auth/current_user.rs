use crate::{
    AppState,
    api::models::users::{AccountType, CurrentUser},
    db::{
        errors::DbError,
        handlers::{Repository, Users},
        models::users::UserCreateDBRequest,
    },
    errors::{Error, Result},
};
use axum::{extract::FromRequestParts, http::request::Parts};
use sqlx::PgPool;
use tracing::{debug, instrument, trace};

/// Extract user from the trusted identity header if present
/// Returns:
/// - None: No identity header present
/// - Some(Ok(user)): Header found and user resolved
/// - Some(Err(error)): Header present but user lookup/creation failed
#[instrument(skip(parts, config, db))]
async fn try_identity_header_auth(
    parts: &axum::http::request::Parts,
    config: &crate::config::Config,
    db: &PgPool,
) -> Option<Result<CurrentUser>> {
    let user_email = match parts
        .headers
        .get(&config.identity.header_name)
        .and_then(|h| h.to_str().ok())
    {
        Some(email) => email,
        None => return None,
    };

    let mut tx = match db.begin().await {
        Ok(tx) => tx,
        Err(e) => return Some(Err(DbError::from(e).into())),
    };
    let mut user_repo = Users::new(&mut tx);

    let user_result = match user_repo.get_by_email(user_email).await {
        Ok(Some(user)) => Some(CurrentUser::from(user)),
        Ok(None) => {
            if config.identity.auto_create_users {
                let create_request = UserCreateDBRequest {
                    name: user_email.to_string(),
                    email: user_email.to_string(),
                    phone: None,
                    password_hash: None,
                    account_type: AccountType::Individual,
                };

                match user_repo.create(&create_request).await {
                    Ok(new_user) => Some(CurrentUser::from(new_user)),
                    Err(e) => return Some(Err(Error::Database(e))),
                }
            } else {
                None
            }
        }
        Err(e) => return Some(Err(Error::Database(e))),
    };

    match tx.commit().await {
        Ok(_) => {}
        Err(e) => return Some(Err(DbError::from(e).into())),
    }
    user_result.map(Ok)
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    #[instrument(skip(parts, state))]
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        match try_identity_header_auth(parts, &state.config, &state.db).await {
            Some(Ok(user)) => {
                debug!("Resolved identity header user: {}", user.id);
                Ok(user)
            }
            Some(Err(e)) => {
                trace!("Identity header resolution failed: {:?}", e);
                Err(Error::Unauthenticated { message: None })
            }
            None => {
                trace!("No identity header found in request");
                Err(Error::Unauthenticated { message: None })
            }
        }
    }
}
