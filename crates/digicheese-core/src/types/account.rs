//! Staff accounts: users (`users`), roles (`roles`) and the
//! `user_roles` link table.
//!
//! ## Password Flow
//! ```text
//! UserCreate { password: "fromage39" }          (HTTP body)
//!      │
//!      ▼ normalize()          length 6..=255, names re-cased
//! UserCreate
//!      │
//!      ▼ argon2 (apps/api)    plain text never leaves the service
//! NewUser { password_hash: "$argon2id$..." }    (what gets INSERTed)
//!      │
//!      ▼
//! User ──► UserPublic                           (what gets returned)
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationResult;
use crate::normalize::{capitalize, double_option, Normalize};
use crate::validation::{
    validate_email, validate_nullable_text, validate_optional_text, validate_password, validate_text,
};

const ROLE_NAME_MAX: usize = 50;
const ROLE_DESCRIPTION_MAX: usize = 255;
const USERNAME_MAX: usize = 50;
const EMAIL_MAX: usize = 255;
const NAME_MAX: usize = 50;

// =============================================================================
// Role
// =============================================================================

/// A named permission group ("admin", "vendeur", ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCreate {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RolePatch {
    pub name: Option<String>,
    #[serde(deserialize_with = "double_option::deserialize", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
}

impl Normalize for RoleCreate {
    fn normalize(self) -> ValidationResult<Self> {
        Ok(RoleCreate {
            name: validate_text("name", &self.name, ROLE_NAME_MAX)?,
            description: validate_optional_text("description", self.description, ROLE_DESCRIPTION_MAX)?,
        })
    }
}

impl Normalize for RolePatch {
    fn normalize(self) -> ValidationResult<Self> {
        Ok(RolePatch {
            name: self
                .name
                .as_deref()
                .map(|name| validate_text("name", name, ROLE_NAME_MAX))
                .transpose()?,
            description: validate_nullable_text("description", self.description, ROLE_DESCRIPTION_MAX)?,
        })
    }
}

// =============================================================================
// User
// =============================================================================

/// A staff account as stored. Never serialized directly: see [`UserPublic`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub is_active: bool,
    /// PHC string (`$argon2id$v=19$...`).
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

/// Body of `POST /api/v1/users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCreate {
    pub username: String,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub password: String,
}

impl UserCreate {
    /// Swaps the plain password for its hash.
    pub fn into_new_user(self, password_hash: String) -> NewUser {
        NewUser {
            username: self.username,
            email: self.email,
            firstname: self.firstname,
            lastname: self.lastname,
            is_active: self.is_active,
            password_hash,
        }
    }
}

/// A user ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub is_active: bool,
    pub password_hash: String,
}

/// Body of `PATCH /api/v1/users/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub is_active: Option<bool>,
    pub password: Option<String>,
}

impl UserPatch {
    /// Swaps the plain password (if any) for its hash.
    pub fn into_changes(self, password_hash: Option<String>) -> UserChanges {
        UserChanges {
            username: self.username,
            email: self.email,
            firstname: self.firstname,
            lastname: self.lastname,
            is_active: self.is_active,
            password_hash,
        }
    }
}

/// Column changes for an existing user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub is_active: Option<bool>,
    pub password_hash: Option<String>,
}

fn normalize_username(value: &str) -> ValidationResult<String> {
    validate_text("username", value, USERNAME_MAX)
}

fn normalize_user_email(value: &str) -> ValidationResult<String> {
    Ok(validate_email("email", value, EMAIL_MAX)?.to_lowercase())
}

fn normalize_firstname(value: &str) -> ValidationResult<String> {
    Ok(capitalize(&validate_text("firstname", value, NAME_MAX)?))
}

fn normalize_lastname(value: &str) -> ValidationResult<String> {
    Ok(validate_text("lastname", value, NAME_MAX)?.to_uppercase())
}

impl Normalize for UserCreate {
    fn normalize(self) -> ValidationResult<Self> {
        validate_password(&self.password)?;

        Ok(UserCreate {
            username: normalize_username(&self.username)?,
            email: normalize_user_email(&self.email)?,
            firstname: normalize_firstname(&self.firstname)?,
            lastname: normalize_lastname(&self.lastname)?,
            is_active: self.is_active,
            password: self.password,
        })
    }
}

impl Normalize for UserPatch {
    fn normalize(self) -> ValidationResult<Self> {
        if let Some(password) = &self.password {
            validate_password(password)?;
        }

        Ok(UserPatch {
            username: self.username.as_deref().map(normalize_username).transpose()?,
            email: self.email.as_deref().map(normalize_user_email).transpose()?,
            firstname: self.firstname.as_deref().map(normalize_firstname).transpose()?,
            lastname: self.lastname.as_deref().map(normalize_lastname).transpose()?,
            is_active: self.is_active,
            password: self.password,
        })
    }
}

// =============================================================================
// Public Views
// =============================================================================

/// A user as returned over HTTP, without the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPublic {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl From<User> for UserPublic {
    fn from(user: User) -> Self {
        UserPublic {
            id: user.id,
            username: user.username,
            email: user.email,
            firstname: user.firstname,
            lastname: user.lastname,
            is_active: user.is_active,
            created_at: user.created_at,
            last_login: user.last_login,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserWithRoles {
    #[serde(flatten)]
    pub user: UserPublic,
    pub roles: Vec<Role>,
}

/// Row of the `user_roles` link table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct UserRole {
    pub user_id: i64,
    pub role_id: i64,
}
