//! Database repository for property collaborators.

use crate::api::models::collaborators::CollaboratorRole;
use crate::db::{
    errors::{DbError, Result},
    models::collaborators::{CollaboratorCreateDBRequest, CollaboratorDBResponse},
};
use crate::types::{CollaboratorId, PropertyId, UserId, abbrev_uuid};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection};
use tracing::instrument;

// Database entity model, joined with the collaborating user's identity
#[derive(Debug, Clone, FromRow)]
struct Collaborator {
    pub id: CollaboratorId,
    pub property_id: PropertyId,
    pub user_id: UserId,
    pub role: CollaboratorRole,
    pub invited_by: UserId,
    pub created_at: DateTime<Utc>,
    pub user_name: String,
    pub user_email: String,
}

impl From<Collaborator> for CollaboratorDBResponse {
    fn from(c: Collaborator) -> Self {
        Self {
            id: c.id,
            property_id: c.property_id,
            user_id: c.user_id,
            role: c.role,
            invited_by: c.invited_by,
            created_at: c.created_at,
            user_name: c.user_name,
            user_email: c.user_email,
        }
    }
}

const SELECT_JOINED: &str = r#"
    SELECT c.id, c.property_id, c.user_id, c.role, c.invited_by, c.created_at,
           u.name AS user_name, u.email AS user_email
    FROM property_collaborators c
    JOIN users u ON u.id = c.user_id
"#;

pub struct Collaborators<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Collaborators<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Grant a user access to a property. The (property, user) pair is
    /// unique, so sharing twice surfaces as a unique violation.
    #[instrument(
        skip(self, request),
        fields(property_id = %abbrev_uuid(&request.property_id), user_id = %abbrev_uuid(&request.user_id)),
        err
    )]
    pub async fn add(&mut self, request: &CollaboratorCreateDBRequest) -> Result<CollaboratorDBResponse> {
        let id: CollaboratorId = sqlx::query_scalar(
            r#"
            INSERT INTO property_collaborators (property_id, user_id, role, invited_by)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(request.property_id)
        .bind(request.user_id)
        .bind(request.role)
        .bind(request.invited_by)
        .fetch_one(&mut *self.db)
        .await?;

        self.get_by_id(id).await?.ok_or(DbError::NotFound)
    }

    #[instrument(skip(self), fields(collaborator_id = %abbrev_uuid(&id)), err)]
    pub async fn get_by_id(&mut self, id: CollaboratorId) -> Result<Option<CollaboratorDBResponse>> {
        let row = sqlx::query_as::<_, Collaborator>(&format!("{SELECT_JOINED} WHERE c.id = $1"))
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(row.map(CollaboratorDBResponse::from))
    }

    #[instrument(skip(self), fields(property_id = %abbrev_uuid(&property_id)), err)]
    pub async fn list_for_property(&mut self, property_id: PropertyId) -> Result<Vec<CollaboratorDBResponse>> {
        let rows = sqlx::query_as::<_, Collaborator>(&format!(
            "{SELECT_JOINED} WHERE c.property_id = $1 ORDER BY c.created_at"
        ))
        .bind(property_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(rows.into_iter().map(CollaboratorDBResponse::from).collect())
    }

    /// The collaborator row for a user on a property, if one exists.
    #[instrument(skip(self), fields(property_id = %abbrev_uuid(&property_id), user_id = %abbrev_uuid(&user_id)), err)]
    pub async fn get_for_user(
        &mut self,
        property_id: PropertyId,
        user_id: UserId,
    ) -> Result<Option<CollaboratorDBResponse>> {
        let row = sqlx::query_as::<_, Collaborator>(&format!(
            "{SELECT_JOINED} WHERE c.property_id = $1 AND c.user_id = $2"
        ))
        .bind(property_id)
        .bind(user_id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(row.map(CollaboratorDBResponse::from))
    }

    /// The role a user holds on a property, if any.
    #[instrument(skip(self), fields(property_id = %abbrev_uuid(&property_id), user_id = %abbrev_uuid(&user_id)), err)]
    pub async fn get_role(&mut self, property_id: PropertyId, user_id: UserId) -> Result<Option<CollaboratorRole>> {
        let role = sqlx::query_scalar::<_, CollaboratorRole>(
            "SELECT role FROM property_collaborators WHERE property_id = $1 AND user_id = $2",
        )
        .bind(property_id)
        .bind(user_id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(role)
    }

    #[instrument(skip(self), fields(collaborator_id = %abbrev_uuid(&id)), err)]
    pub async fn update_role(&mut self, id: CollaboratorId, role: CollaboratorRole) -> Result<CollaboratorDBResponse> {
        let result = sqlx::query("UPDATE property_collaborators SET role = $2 WHERE id = $1")
            .bind(id)
            .bind(role)
            .execute(&mut *self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }

        self.get_by_id(id).await?.ok_or(DbError::NotFound)
    }

    #[instrument(skip(self), fields(collaborator_id = %abbrev_uuid(&id)), err)]
    pub async fn remove(&mut self, id: CollaboratorId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM property_collaborators WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
