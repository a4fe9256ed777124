/// User model and account types
///
/// This module provides the User model, the role set used for coarse
/// authorization, and the profile update input.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE user_role AS ENUM ('admin', 'manager', 'member');
///
/// CREATE TABLE users (
///     id UUID PRIMARY KEY,
///     name VARCHAR(50) NOT NULL,
///     email CITEXT NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     avatar_url VARCHAR(512),
///     roles user_role[] NOT NULL DEFAULT '{member}',
///     created_at TIMESTAMPTZ NOT NULL,
///     updated_at TIMESTAMPTZ NOT NULL
/// );
/// ```
///
/// # Example
///
/// ```
/// use taskhub_shared::models::user::{Role, User};
///
/// let user = User::new(
///     "Ada Lovelace".to_string(),
///     "Ada@Example.com".to_string(),
///     "$argon2id$...".to_string(),
/// );
///
/// assert_eq!(user.email, "ada@example.com");
/// assert_eq!(user.roles, vec![Role::Member]);
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgHasArrayType, PgTypeInfo};
use uuid::Uuid;
use validator::Validate;

/// Coarse role grants attached to a user account
///
/// A user holds a set of roles. `Admin` unlocks project mutation beyond
/// ownership; `Manager` and `Member` carry no extra grants in the core
/// policy and exist for the HTTP surface to display and filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// May mutate any project visible to them, regardless of ownership
    Admin,

    /// Reserved for future scheduling/reporting surfaces
    Manager,

    /// Default role for every registered account
    Member,
}

impl Role {
    /// Converts role to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Member => "member",
        }
    }
}

impl PgHasArrayType for Role {
    fn array_type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("_user_role")
    }
}

/// User account
///
/// The password hash is never serialized into responses.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Email address, stored lowercase and unique case-insensitively
    pub email: String,

    /// Argon2id password hash, excluded from serialized output
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Optional avatar/profile picture URL
    pub avatar_url: Option<String>,

    /// Role set, defaults to `[member]` at registration
    pub roles: Vec<Role>,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new account with a fresh ID, lowercased email, and the
    /// default `[member]` role set.
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            name,
            email: email.to_lowercase(),
            password_hash,
            avatar_url: None,
            roles: vec![Role::Member],
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for updating a user's own profile
///
/// All fields are optional. `avatar_url` distinguishes an absent key
/// (unchanged) from an explicit `null` (clear the avatar).
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProfile {
    /// New display name
    #[validate(length(min = 2, max = 50, message = "name must be 2-50 characters"))]
    pub name: Option<String>,

    /// New avatar URL; explicit `null` clears it
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub avatar_url: Option<Option<String>>,
}
