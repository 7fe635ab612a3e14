//! # Client Repository
//!
//! Table mapping for `t_client` plus the client lookups.

use digicheese_core::{Client, ClientCreate, ClientPatch};
use tracing::debug;

use super::{Assignments, Changeset, Record, Repository};
use crate::error::DbResult;

impl Record for Client {
    const ENTITY: &'static str = "Client";
    const TABLE: &'static str = "t_client";
    const COLUMNS: &'static str = "id, civility, lastname, firstname, address_line1, address_line2, \
         address_line3, commune_id, phone, email, mobile, newsletter";

    type Create = ClientCreate;
    type Patch = ClientPatch;
}

impl Changeset for ClientCreate {
    fn assignments(&self) -> Assignments {
        Assignments::new()
            .set("civility", self.civility.clone())
            .set("lastname", self.lastname.clone())
            .set("firstname", self.firstname.clone())
            .set("address_line1", self.address_line1.clone())
            .set("address_line2", self.address_line2.clone())
            .set("address_line3", self.address_line3.clone())
            .set("commune_id", self.commune_id)
            .set("phone", self.phone.clone())
            .set("email", self.email.clone())
            .set("mobile", self.mobile.clone())
            .set("newsletter", self.newsletter)
    }
}

impl Changeset for ClientPatch {
    fn assignments(&self) -> Assignments {
        Assignments::new()
            .set_if_present("civility", self.civility.clone())
            .set_if_present("lastname", self.lastname.clone())
            .set_if_present("firstname", self.firstname.clone())
            .set_if_present("address_line1", self.address_line1.clone())
            .set_if_present("address_line2", self.address_line2.clone())
            .set_if_present("address_line3", self.address_line3.clone())
            .set_if_present("commune_id", self.commune_id)
            .set_if_present("phone", self.phone.clone())
            .set_if_present("email", self.email.clone())
            .set_if_present("mobile", self.mobile.clone())
            .set_if_present("newsletter", self.newsletter)
    }
}

impl Repository<Client> {
    /// Finds a client by email, ignoring case.
    pub async fn get_by_email(&self, email: &str) -> DbResult<Option<Client>> {
        debug!(email = %email, "Looking up client by email");

        let sql = format!(
            "SELECT {} FROM t_client WHERE lower(email) = lower(?1) ORDER BY id LIMIT 1",
            Client::COLUMNS
        );
        let client = sqlx::query_as::<_, Client>(&sql)
            .bind(email.trim())
            .fetch_optional(self.pool())
            .await?;

        Ok(client)
    }

    /// Clients who opted into the newsletter, ordered by id.
    pub async fn newsletter_subscribers(&self, limit: u32) -> DbResult<Vec<Client>> {
        let sql = format!(
            "SELECT {} FROM t_client WHERE newsletter = 1 ORDER BY id LIMIT ?1",
            Client::COLUMNS
        );
        let clients = sqlx::query_as::<_, Client>(&sql)
            .bind(i64::from(limit))
            .fetch_all(self.pool())
            .await?;

        Ok(clients)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::repository::testing::test_db;

    #[tokio::test]
    async fn test_create_applies_defaults() {
        let db = test_db().await;
        let client = db
            .clients()
            .create(&ClientCreate::new("Jean", "DUPONT"))
            .await
            .unwrap();

        assert_eq!(client.firstname, "Jean");
        assert_eq!(client.email, None);
        assert!(!client.newsletter);
    }

    #[tokio::test]
    async fn test_get_by_email_is_case_insensitive() {
        let db = test_db().await;
        let mut data = ClientCreate::new("Marie", "MARTIN");
        data.email = Some("marie.martin@example.fr".to_string());
        let created = db.clients().create(&data).await.unwrap();

        let found = db
            .clients()
            .get_by_email("Marie.Martin@Example.FR")
            .await
            .unwrap();
        assert_eq!(found.map(|c| c.id), Some(created.id));

        assert!(db.clients().get_by_email("nobody@example.fr").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_newsletter_subscribers() {
        let db = test_db().await;
        let clients = db.clients();

        let mut subscribed = ClientCreate::new("Paul", "BERNARD");
        subscribed.newsletter = true;
        clients.create(&subscribed).await.unwrap();
        clients.create(&ClientCreate::new("Luc", "PETIT")).await.unwrap();

        let list = clients.newsletter_subscribers(10).await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].lastname, "BERNARD");
    }

    #[tokio::test]
    async fn test_unknown_commune_is_a_foreign_key_violation() {
        let db = test_db().await;
        let mut data = ClientCreate::new("Jean", "DUPONT");
        data.commune_id = Some(404);

        let err = db.clients().create(&data).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_patch_newsletter() {
        let db = test_db().await;
        let created = db
            .clients()
            .create(&ClientCreate::new("Jean", "DUPONT"))
            .await
            .unwrap();

        let patch = ClientPatch {
            newsletter: Some(true),
            ..Default::default()
        };
        let patched = db.clients().patch(created.id, &patch).await.unwrap().unwrap();
        assert!(patched.newsletter);
        assert_eq!(patched.lastname, "DUPONT");
    }
}
