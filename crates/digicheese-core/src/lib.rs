//! # digicheese-core: Domain Records and Field Rules
//!
//! This crate holds everything the Digicheese backend knows about its data
//! without touching a database or a socket: the records that mirror the
//! relational tables, the create/patch schemas accepted over HTTP, and the
//! normalization rules services apply before anything is persisted.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Digicheese Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                apps/api (axum routes + services)                │   │
//! │  │     /api/v1/clients, /communes, /products, /orders, ...         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ digicheese-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ normalize │  │ geography │  │   money   │  │   │
//! │  │   │  Client   │  │ Normalize │  │ postal ↔  │  │   Money   │  │   │
//! │  │   │  Order... │  │ capitalize│  │ département│ │  (cents)  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                digicheese-db (Database Layer)                   │   │
//! │  │         SQLite pool, migrations, generic repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Records and their create/patch schemas
//! - [`normalize`] - The `Normalize` hook and text helpers
//! - [`geography`] - Postal code and département rules
//! - [`validation`] - Field length and range checks
//! - [`money`] - Integer-cent money type
//! - [`error`] - Validation error type
//!
//! ## Example Usage
//!
//! ```rust
//! use digicheese_core::normalize::Normalize;
//! use digicheese_core::types::ClientCreate;
//!
//! let client = ClientCreate::new("jean", "dupont").normalize().unwrap();
//! assert_eq!(client.firstname, "Jean");
//! assert_eq!(client.lastname, "DUPONT");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod geography;
pub mod money;
pub mod normalize;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{ValidationError, ValidationResult};
pub use money::Money;
pub use normalize::Normalize;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Number of records returned by list endpoints when no limit is given.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Upper bound for the `limit` query parameter.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Stock level at or below which a product is reported as low stock,
/// unless the product carries its own threshold.
pub const DEFAULT_STOCK_ALERT_THRESHOLD: i64 = 5;

/// Largest quantity a single order line may carry.
pub const MAX_LINE_QUANTITY: i64 = 1_000_000;

/// Largest amount accepted for a price, total or shipping cost
/// (100 000 000.00). Keeps line totals and order sums inside `i64`.
pub const MAX_AMOUNT_CENTS: i64 = 10_000_000_000;

/// Minimum accepted password length for staff users.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Maximum accepted password length for staff users.
pub const MAX_PASSWORD_LEN: usize = 255;
