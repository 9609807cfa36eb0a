//! Statement error types.

use ledgerview_shared::types::{AccountId, FiscalYearId, PartyId};
use thiserror::Error;

/// Errors that can occur while preparing a statement of account.
///
/// The balance computation itself raises none of these for well-formed
/// lines; storage failures are carried by the storage layer's own error.
#[derive(Debug, Error, PartialEq)]
pub enum StatementError {
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Party not found.
    #[error("Party not found: {0}")]
    PartyNotFound(PartyId),

    /// Fiscal year not found.
    #[error("Fiscal year not found: {0}")]
    FiscalYearNotFound(FiscalYearId),

    /// No account was selected and none could be defaulted.
    #[error("An account is required")]
    MissingAccount,

    /// No fiscal year was selected and none could be defaulted.
    #[error("A fiscal year is required")]
    MissingFiscalYear,

    /// View accounts only group other accounts.
    #[error("Account {0} is a view account and has no lines")]
    ViewAccount(AccountId),

    /// Unknown account kind.
    #[error("Unknown account kind: {0}")]
    UnknownAccountKind(String),

    /// Malformed sort term.
    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    /// The storage aggregate cannot be represented as a decimal.
    #[error("Aggregate cannot be converted to decimal: {0}")]
    InvalidAggregate(String),
}
