//! Repository abstractions for data access.
//!
//! Repositories hide the `SeaORM` query details from the rest of the application.

pub mod statement;

pub use statement::{StatementRepository, StatementStoreError};
