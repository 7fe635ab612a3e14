//! # User Role Repository
//!
//! The `user_roles` link table, keyed by `(user_id, role_id)`.

use digicheese_core::Role;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

#[derive(Debug, Clone)]
pub struct UserRoleRepository {
    pool: SqlitePool,
}

impl UserRoleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        UserRoleRepository { pool }
    }

    /// Grants a role. Granting an already held role is a no-op.
    ///
    /// Returns `true` when the link was created by this call.
    pub async fn assign(&self, user_id: i64, role_id: i64) -> DbResult<bool> {
        debug!(user_id, role_id, "Assigning role");

        let result = sqlx::query(
            "INSERT INTO user_roles (user_id, role_id) VALUES (?1, ?2) ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(role_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Withdraws a role. Returns `false` when the user didn't hold it.
    pub async fn revoke(&self, user_id: i64, role_id: i64) -> DbResult<bool> {
        debug!(user_id, role_id, "Revoking role");

        let result = sqlx::query("DELETE FROM user_roles WHERE user_id = ?1 AND role_id = ?2")
            .bind(user_id)
            .bind(role_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Roles held by a user, by name.
    pub async fn roles_of_user(&self, user_id: i64) -> DbResult<Vec<Role>> {
        let roles = sqlx::query_as::<_, Role>(
            r#"
            SELECT r.id, r.name, r.description
            FROM roles r
            INNER JOIN user_roles ur ON ur.role_id = r.id
            WHERE ur.user_id = ?1
            ORDER BY r.name
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(roles)
    }
}

#[cfg(test)]
mod tests {
    use digicheese_core::{NewUser, RoleCreate, User};

    use crate::error::DbError;
    use crate::pool::Database;
    use crate::repository::testing::test_db;

    async fn user_and_roles(db: &Database) -> (User, i64, i64) {
        let user = db
            .users()
            .create(&NewUser {
                username: "mlefort".to_string(),
                email: "m.lefort@fromagerie.fr".to_string(),
                firstname: "Marie".to_string(),
                lastname: "LEFORT".to_string(),
                is_active: true,
                password_hash: "$argon2id$stub".to_string(),
            })
            .await
            .unwrap();

        let mut ids = Vec::new();
        for name in ["vendeur", "admin"] {
            let role = db
                .roles()
                .create(&RoleCreate {
                    name: name.to_string(),
                    description: None,
                })
                .await
                .unwrap();
            ids.push(role.id);
        }
        (user, ids[0], ids[1])
    }

    #[tokio::test]
    async fn test_assign_is_idempotent() {
        let db = test_db().await;
        let (user, vendeur, admin) = user_and_roles(&db).await;
        let links = db.user_roles();

        assert!(links.assign(user.id, vendeur).await.unwrap());
        assert!(!links.assign(user.id, vendeur).await.unwrap());
        assert!(links.assign(user.id, admin).await.unwrap());

        let roles = links.roles_of_user(user.id).await.unwrap();
        let names: Vec<_> = roles.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["admin", "vendeur"]);
    }

    #[tokio::test]
    async fn test_revoke() {
        let db = test_db().await;
        let (user, vendeur, admin) = user_and_roles(&db).await;
        let links = db.user_roles();
        links.assign(user.id, vendeur).await.unwrap();

        assert!(links.revoke(user.id, vendeur).await.unwrap());
        assert!(!links.revoke(user.id, admin).await.unwrap());
        assert!(links.roles_of_user(user.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_assign_unknown_role() {
        let db = test_db().await;
        let (user, _, _) = user_and_roles(&db).await;

        let err = db.user_roles().assign(user.id, 404).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_deleting_user_drops_links() {
        let db = test_db().await;
        let (user, vendeur, _) = user_and_roles(&db).await;
        db.user_roles().assign(user.id, vendeur).await.unwrap();

        assert!(db.users().delete(user.id).await.unwrap());
        assert!(db.user_roles().roles_of_user(user.id).await.unwrap().is_empty());
    }
}
