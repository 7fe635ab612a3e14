//! # Staff Account Services
//!
//! Users and their roles. Passwords are hashed with argon2 here, so the
//! plain text never reaches the repository and the hash never leaves it:
//! every user this service returns is a [`UserPublic`].

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHasher, SaltString};
use argon2::Argon2;
use digicheese_core::{Normalize, User, UserCreate, UserPatch, UserPublic, UserWithRoles};
use tracing::info;

use super::{found, Service, ServiceError, ServiceResult};

// =============================================================================
// Password Hashing
// =============================================================================

/// Hashes a password into a PHC string (`$argon2id$...`).
pub fn hash_password(password: &str) -> ServiceResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ServiceError::PasswordHash(e.to_string()))?;

    Ok(hash.to_string())
}

// =============================================================================
// Users
// =============================================================================

impl Service<User> {
    pub async fn list_public(&self, limit: u32) -> ServiceResult<Vec<UserPublic>> {
        let users = self.get_all(limit).await?;
        Ok(users.into_iter().map(UserPublic::from).collect())
    }

    pub async fn get_public(&self, id: i64) -> ServiceResult<UserPublic> {
        self.get_by_id(id).await.map(UserPublic::from)
    }

    pub async fn create_user(&self, data: UserCreate) -> ServiceResult<UserPublic> {
        let data = data.normalize()?;
        let password_hash = hash_password(&data.password)?;

        let user = self
            .repository()
            .create(&data.into_new_user(password_hash))
            .await?;

        info!(user_id = user.id, username = %user.username, "User created");
        Ok(user.into())
    }

    /// Applies the present fields. A new password is re-hashed.
    pub async fn patch_user(&self, id: i64, changes: UserPatch) -> ServiceResult<UserPublic> {
        let changes = changes.normalize()?;
        let password_hash = changes.password.as_deref().map(hash_password).transpose()?;
        let password_changed = password_hash.is_some();

        let user = found(
            self.repository()
                .patch(id, &changes.into_changes(password_hash))
                .await?,
            "User",
            id,
        )?;

        info!(user_id = id, password_changed, "User patched");
        Ok(user.into())
    }

    pub async fn with_roles(&self, id: i64) -> ServiceResult<UserWithRoles> {
        let user = self.get_public(id).await?;
        let roles = self.db().user_roles().roles_of_user(id).await?;

        Ok(UserWithRoles { user, roles })
    }

    /// Grants a role. Granting a role the user already holds succeeds.
    pub async fn assign_role(&self, user_id: i64, role_id: i64) -> ServiceResult<()> {
        self.ensure_user_and_role(user_id, role_id).await?;

        let created = self.db().user_roles().assign(user_id, role_id).await?;
        info!(user_id, role_id, created, "Role assigned");
        Ok(())
    }

    pub async fn revoke_role(&self, user_id: i64, role_id: i64) -> ServiceResult<()> {
        if !self.db().user_roles().revoke(user_id, role_id).await? {
            return Err(ServiceError::not_found(
                "UserRole",
                format!("user {user_id}, role {role_id}"),
            ));
        }

        info!(user_id, role_id, "Role revoked");
        Ok(())
    }

    async fn ensure_user_and_role(&self, user_id: i64, role_id: i64) -> ServiceResult<()> {
        self.get_by_id(user_id).await?;
        found(self.db().roles().get_by_id(role_id).await?, "Role", role_id)?;
        Ok(())
    }
}
