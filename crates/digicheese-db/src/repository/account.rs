//! # Account Repositories
//!
//! Table mappings for `roles` and `users`. Users are written from
//! [`NewUser`] / [`UserChanges`], which carry the password hash, never
//! from the HTTP schemas directly.

use digicheese_core::{NewUser, Role, RoleCreate, RolePatch, User, UserChanges};

use super::{Assignments, Changeset, Record, Repository};
use crate::error::DbResult;

// =============================================================================
// Role
// =============================================================================

impl Record for Role {
    const ENTITY: &'static str = "Role";
    const TABLE: &'static str = "roles";
    const COLUMNS: &'static str = "id, name, description";

    type Create = RoleCreate;
    type Patch = RolePatch;
}

impl Changeset for RoleCreate {
    fn assignments(&self) -> Assignments {
        Assignments::new()
            .set("name", self.name.clone())
            .set("description", self.description.clone())
    }
}

impl Changeset for RolePatch {
    fn assignments(&self) -> Assignments {
        Assignments::new()
            .set_if_present("name", self.name.clone())
            .set_if_present("description", self.description.clone())
    }
}

impl Repository<Role> {
    pub async fn get_by_name(&self, name: &str) -> DbResult<Option<Role>> {
        let role = sqlx::query_as::<_, Role>("SELECT id, name, description FROM roles WHERE name = ?1")
            .bind(name)
            .fetch_optional(self.pool())
            .await?;

        Ok(role)
    }
}

// =============================================================================
// User
// =============================================================================

impl Record for User {
    const ENTITY: &'static str = "User";
    const TABLE: &'static str = "users";
    const COLUMNS: &'static str = "id, username, email, firstname, lastname, is_active, \
         password_hash, created_at, last_login";

    type Create = NewUser;
    type Patch = UserChanges;
}

impl Changeset for NewUser {
    fn assignments(&self) -> Assignments {
        Assignments::new()
            .set("username", self.username.clone())
            .set("email", self.email.clone())
            .set("firstname", self.firstname.clone())
            .set("lastname", self.lastname.clone())
            .set("is_active", self.is_active)
            .set("password_hash", self.password_hash.clone())
    }
}

impl Changeset for UserChanges {
    fn assignments(&self) -> Assignments {
        Assignments::new()
            .set_if_present("username", self.username.clone())
            .set_if_present("email", self.email.clone())
            .set_if_present("firstname", self.firstname.clone())
            .set_if_present("lastname", self.lastname.clone())
            .set_if_present("is_active", self.is_active)
            .set_if_present("password_hash", self.password_hash.clone())
    }
}

impl Repository<User> {
    pub async fn get_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE username = ?1", User::COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(self.pool())
            .await?;

        Ok(user)
    }
}
