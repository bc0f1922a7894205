//! # Record store
//!
//! Business records live in a document-ish store independently of any
//! authentication identity. This crate owns the record model
//! ([`BusinessRecord`], [`LinkageStatus`]) and the [`RecordStore`] seam the
//! linking core writes through.
//!
//! Two implementations ship here:
//!
//! - [`PgRecordStore`] — Postgres over sqlx. The linkage write is a single
//!   adapter method that updates `business_records` and the `auth_accounts`
//!   compat table inside one transaction, so the core stays agnostic to the
//!   storage duplication.
//! - [`InMemoryRecordStore`] — used by tests and local development.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod record;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryRecordStore;
pub use postgres::PgRecordStore;
pub use record::{BusinessRecord, LinkagePatch, LinkageStatus, NewBusinessRecord, RecordRole};
pub use traits::RecordStore;
