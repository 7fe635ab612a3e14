//! # Service Layer
//!
//! Thin per-entity layer between the HTTP handlers and the repositories.
//!
//! ## Responsibilities
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  handler ──► Service<R>::create(data)                                   │
//! │                 │                                                       │
//! │                 ├── data.normalize()?        trim, re-case, validate    │
//! │                 ├── repository.create(&data)                            │
//! │                 └── info!(entity, id)        structured log             │
//! │                                                                         │
//! │  Service<R>              get_all / get_by_id / create / patch / delete  │
//! │  impl Service<Client>    find_by_email, newsletter_subscribers          │
//! │  impl Service<Commune>   by postal code / département / name            │
//! │  impl Service<Order>     items, details                                 │
//! │  impl Service<User>      argon2 hashing, role links                     │
//! │  ...                                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Missing rows surface as [`ServiceError::NotFound`] so handlers never
//! deal with `Option`.

pub mod account;
pub mod catalog;
pub mod client;
pub mod locality;
pub mod order;
pub mod shipping;

use std::fmt;

use digicheese_core::{Normalize, ValidationError};
use digicheese_db::{Database, DbError, Record, Repository};
use thiserror::Error;
use tracing::info;

// =============================================================================
// Errors
// =============================================================================

/// What a service call can fail with.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Input rejected by a normalization rule.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No row with this key.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error(transparent)]
    Db(#[from] DbError),

    /// Password hashing failed.
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        ServiceError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Turns a repository `Option` into a `NotFound` error.
pub(crate) fn found<T>(value: Option<T>, entity: &'static str, id: impl ToString) -> ServiceResult<T> {
    value.ok_or_else(|| ServiceError::not_found(entity, id))
}

// =============================================================================
// Generic Service
// =============================================================================

/// CRUD service over one repository.
///
/// ## Usage
/// ```rust,ignore
/// let clients: Service<Client> = Service::new(db.clients(), db.clone());
///
/// let created = clients.create(ClientCreate::new("jean", "dupont")).await?;
/// assert_eq!(created.lastname, "DUPONT");
/// ```
pub struct Service<R> {
    repo: Repository<R>,
    db: Database,
}

impl<R> Clone for Service<R> {
    fn clone(&self) -> Self {
        Service {
            repo: self.repo.clone(),
            db: self.db.clone(),
        }
    }
}

impl<R: Record> fmt::Debug for Service<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Service").field("entity", &R::ENTITY).finish()
    }
}

impl<R: Record> Service<R> {
    pub fn new(repo: Repository<R>, db: Database) -> Self {
        Service { repo, db }
    }

    pub fn repository(&self) -> &Repository<R> {
        &self.repo
    }

    /// Database handle, for services that touch more than one table.
    pub(crate) fn db(&self) -> &Database {
        &self.db
    }

    pub async fn get_all(&self, limit: u32) -> ServiceResult<Vec<R>> {
        Ok(self.repo.get_all(limit).await?)
    }

    pub async fn get_by_id(&self, id: i64) -> ServiceResult<R> {
        found(self.repo.get_by_id(id).await?, R::ENTITY, id)
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        if !self.repo.delete(id).await? {
            return Err(ServiceError::not_found(R::ENTITY, id));
        }

        info!(entity = R::ENTITY, id, "Deleted");
        Ok(())
    }
}

impl<R> Service<R>
where
    R: Record,
    R::Create: Normalize,
    R::Patch: Normalize,
{
    pub async fn create(&self, data: R::Create) -> ServiceResult<R> {
        let data = data.normalize()?;
        let created = self.repo.create(&data).await?;

        info!(entity = R::ENTITY, "Created");
        Ok(created)
    }

    /// Applies the present fields of `changes`. An empty patch returns the
    /// record unchanged.
    pub async fn patch(&self, id: i64, changes: R::Patch) -> ServiceResult<R> {
        let changes = changes.normalize()?;
        let patched = found(self.repo.patch(id, &changes).await?, R::ENTITY, id)?;

        info!(entity = R::ENTITY, id, "Patched");
        Ok(patched)
    }
}

// =============================================================================
// Service Registry
// =============================================================================

/// One service per entity, built from a single database handle.
#[derive(Debug, Clone)]
pub struct Services {
    db: Database,
}

impl Services {
    pub fn new(db: Database) -> Self {
        Services { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn clients(&self) -> Service<digicheese_core::Client> {
        Service::new(self.db.clients(), self.db.clone())
    }

    pub fn communes(&self) -> Service<digicheese_core::Commune> {
        Service::new(self.db.communes(), self.db.clone())
    }

    pub fn departements(&self) -> Service<digicheese_core::Departement> {
        Service::new(self.db.departements(), self.db.clone())
    }

    pub fn product_categories(&self) -> Service<digicheese_core::ProductCategory> {
        Service::new(self.db.product_categories(), self.db.clone())
    }

    pub fn products(&self) -> Service<digicheese_core::Product> {
        Service::new(self.db.products(), self.db.clone())
    }

    pub fn orders(&self) -> Service<digicheese_core::Order> {
        Service::new(self.db.orders(), self.db.clone())
    }

    pub fn shipping_rates(&self) -> Service<digicheese_core::ShippingRate> {
        Service::new(self.db.shipping_rates(), self.db.clone())
    }

    pub fn roles(&self) -> Service<digicheese_core::Role> {
        Service::new(self.db.roles(), self.db.clone())
    }

    pub fn users(&self) -> Service<digicheese_core::User> {
        Service::new(self.db.users(), self.db.clone())
    }
}

// =============================================================================
// Test Support
// =============================================================================
