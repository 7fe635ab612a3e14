//! # digicheese-db: Database Layer for Digicheese
//!
//! SQLite persistence for the cheese shop backend, built on sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Digicheese Data Flow                               │
//! │                                                                         │
//! │  apps/api service (ClientService::create)                              │
//! │       │  normalized ClientCreate                                        │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  digicheese-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌─────────────────────┐  ┌────────────┐ │   │
//! │  │   │   Database    │    │    Repositories     │  │ Migrations │ │   │
//! │  │   │   (pool.rs)   │    │ Repository<Client>  │  │ (embedded) │ │   │
//! │  │   │               │◄───│ Repository<Order>   │  │            │ │   │
//! │  │   │  SqlitePool   │    │ OrderItemRepository │  │ 001_...sql │ │   │
//! │  │   │               │    │ UserRoleRepository  │  │            │ │   │
//! │  │   └───────────────┘    └─────────────────────┘  └────────────┘ │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              SQLite Database (./digicheese.db)                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Generic repository and per-entity queries
//!
//! ## Usage
//!
//! ```rust,ignore
//! use digicheese_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./digicheese.db")).await?;
//!
//! let communes = db.communes().get_by_postal_code("39000").await?;
//! let rate = db.shipping_rates().find_for_weight(1200).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use migrations::MigrationStatus;
pub use pool::{Database, DbConfig};
pub use repository::{
    Assignments, Changeset, FieldValue, OrderItemRepository, Record, Repository,
    UserRoleRepository,
};
