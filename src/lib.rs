//! Relational data model for an alumni-association platform.
//!
//! The crate is split into a pure core and a storage adapter:
//!
//! - [`domain`] holds the entity structs, draft/patch types, and the
//!   closed status enums.
//! - [`graph`] declares the static relationship graph: every
//!   association between entity kinds, with its delete policy.
//! - [`schema`] derives the relational DDL from the same metadata.
//! - [`store`] defines the [`store::ModelStore`] port, an in-memory
//!   implementation, and (behind the `database` feature) a Postgres
//!   adapter.
//! - [`service`] enforces the write-time invariants: reference
//!   existence, uniqueness, status transitions, cycle prevention, and
//!   policy-driven deletes.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use alumni_core::domain::{NewUser, UserRole};
//! use alumni_core::service::ModelService;
//! use alumni_core::store::memory::MemoryStore;
//!
//! # async fn demo() -> alumni_core::error::Result<()> {
//! let service = ModelService::new(Arc::new(MemoryStore::new()));
//! let user = service
//!     .accounts
//!     .create_user(NewUser {
//!         email: "alum@example.org".into(),
//!         password_hash: "$argon2id$...".into(),
//!         role: UserRole::Alumni,
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod domain;
pub mod error;
pub mod graph;
pub mod schema;
pub mod service;
pub mod store;

pub use error::{ModelError, Result};
pub use graph::{DeletePolicy, EntityKind, JoinTable, RelationshipGraph};
pub use service::ModelService;
pub use store::ModelStore;
