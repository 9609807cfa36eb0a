//! Core business logic for Ledgerview.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Storage access is passed in by the caller, so every rule here is unit-testable.
//!
//! # Modules
//!
//! - `statement` - Statement of account: canonical ordering, party scoping,
//!   running balances, and the start form rules

pub mod statement;
