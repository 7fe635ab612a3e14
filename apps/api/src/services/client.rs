//! Client lookups beyond plain CRUD.

use digicheese_core::validation::validate_email;
use digicheese_core::Client;
use tracing::debug;

use super::{found, Service, ServiceResult};

const EMAIL_MAX: usize = 255;

impl Service<Client> {
    /// Finds the client registered with `email` (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> ServiceResult<Client> {
        let email = validate_email("email", email, EMAIL_MAX)?;
        debug!(email = %email, "Looking up client by email");

        found(
            self.repository().get_by_email(&email).await?,
            "Client",
            email,
        )
    }

    /// Clients who opted in to the newsletter, by id.
    pub async fn newsletter_subscribers(&self, limit: u32) -> ServiceResult<Vec<Client>> {
        Ok(self.repository().newsletter_subscribers(limit).await?)
    }
}
