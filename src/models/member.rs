use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;

use crate::errors::AppError;

/// Internal member struct for authentication — includes password hash.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Member {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub email: String,
    pub display_name: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// Safe version for templates — no password hash.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MemberDisplay {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl MemberDisplay {
    pub fn joined_on(&self) -> String {
        self.created_at.format("%Y-%m-%d").to_string()
    }
}

/// New member data for creation. `password` is already hashed.
pub struct NewMember {
    pub username: String,
    pub password: String,
    pub email: String,
    pub display_name: String,
    pub is_admin: bool,
}

/// Form data from the admin member creation form.
#[derive(Debug, Deserialize)]
pub struct MemberForm {
    pub username: String,
    pub password: String,
    pub email: String,
    pub display_name: String,
    pub is_admin: Option<String>,
    pub csrf_token: String,
}

pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<Member>, AppError> {
    let member = sqlx::query_as::<_, Member>(
        "SELECT id, username, password, email, display_name, is_admin, created_at \
         FROM members WHERE username = $1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(member)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Member>, AppError> {
    let member = sqlx::query_as::<_, Member>(
        "SELECT id, username, password, email, display_name, is_admin, created_at \
         FROM members WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(member)
}

pub async fn find_all(pool: &PgPool) -> Result<Vec<MemberDisplay>, AppError> {
    let members = sqlx::query_as::<_, MemberDisplay>(
        "SELECT id, username, email, display_name, is_admin, created_at \
         FROM members ORDER BY username",
    )
    .fetch_all(pool)
    .await?;
    Ok(members)
}

/// Create a member account. Returns the new member id, or Conflict if the
/// username is taken.
pub async fn create(pool: &PgPool, new_member: &NewMember) -> Result<i64, AppError> {
    let result: Result<i64, sqlx::Error> = sqlx::query_scalar(
        "INSERT INTO members (username, password, email, display_name, is_admin) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING id",
    )
    .bind(&new_member.username)
    .bind(&new_member.password)
    .bind(&new_member.email)
    .bind(&new_member.display_name)
    .bind(new_member.is_admin)
    .fetch_one(pool)
    .await;

    match result {
        Ok(id) => Ok(id),
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(AppError::Conflict(
            "That username is already taken".to_string(),
        )),
        Err(e) => Err(e.into()),
    }
}
