//! # Domain Types
//!
//! Records mirroring the relational tables, plus the create and patch
//! schemas the HTTP layer deserializes.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  locality            client              catalog                        │
//! │  ┌──────────────┐    ┌──────────────┐    ┌──────────────────┐          │
//! │  │ Departement  │◄─┐ │   Client     │    │ ProductCategory  │◄─┐       │
//! │  └──────────────┘  │ │  commune_id ─┼─┐  └──────────────────┘  │       │
//! │  ┌──────────────┐  │ └──────▲───────┘ │  ┌──────────────────┐  │       │
//! │  │   Commune    │◄─┼────────┼─────────┘  │    Product       │  │       │
//! │  │ departement ─┼──┘        │            │   category_id ───┼──┘       │
//! │  └──────────────┘           │            └────────▲─────────┘          │
//! │                             │                     │                     │
//! │  order                      │                     │                     │
//! │  ┌──────────────┐           │   ┌─────────────────┴──┐                 │
//! │  │    Order     │ client_id─┘   │    OrderItem       │                 │
//! │  │   status     │◄──────────────┤ (order_id,         │                 │
//! │  └──────────────┘               │  product_id) PK    │                 │
//! │                                 └────────────────────┘                 │
//! │  account                         shipping                               │
//! │  ┌──────┐  ┌──────────┐  ┌──────┐  ┌──────────────┐                    │
//! │  │ User │◄─┤ UserRole ├─►│ Role │  │ ShippingRate │                    │
//! │  └──────┘  └──────────┘  └──────┘  └──────────────┘                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Schema Conventions
//! - `XxxCreate`: body of `POST`, required fields are plain values
//! - `XxxPatch`: body of `PATCH`, every field optional, `None` = unchanged
//! - Both implement [`Normalize`](crate::normalize::Normalize)

mod account;
mod catalog;
mod client;
mod locality;
mod order;
mod shipping;

pub use account::*;
pub use catalog::*;
pub use client::*;
pub use locality::*;
pub use order::*;
pub use shipping::*;
