//! # Account-linking reconciliation
//!
//! Business records are created whether or not a matching authentication
//! credential exists. This crate heals that gap: given a record and
//! candidate credentials, it decides how to obtain an identity, records
//! the outcome on the record, and exposes a retry entry point.
//!
//! ```text
//! register / retry
//!       │
//!       ▼
//! ┌───────────────┐   create ────► Complete
//! │ LinkageService │   │
//! │  (pipeline)    │   └─ already exists ─► sign in ──► Complete
//! └──────┬────────┘                          │
//!        │                                   └─ bad secret ─► PasswordMismatch
//!        │  transient provider failure ────────────────────► Pending
//!        │  no password supplied ──────────────────────────► Unlinked
//!        ▼
//!   RecordStore::apply_linkage   (exactly one write per attempt)
//! ```
//!
//! The branch table itself lives in [`policy::decide`], a pure function
//! with no I/O, so it can be tested exhaustively. Provider failures never
//! escape the service; store failures do.

pub mod error;
pub mod policy;
pub mod service;

pub use error::{LinkageError, LinkageResult};
pub use policy::{decide, CreateOutcome, SignInOutcome};
pub use service::{LinkageAttemptResult, LinkageService, RegistrationOutcome};
