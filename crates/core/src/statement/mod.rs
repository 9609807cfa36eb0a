//! Statement of account.
//!
//! Lists the ledger lines of one account (optionally one party) for a fiscal
//! year, each with the running balance up to and including that line:
//! - Canonical `(move date, move number, line id)` order, shared by listing
//!   and balance computation
//! - Party classification of receivable and payable accounts
//! - Running balance computation, per line or by prefix sums
//! - Start form defaults, validation, and titles

pub mod balance;
pub mod classify;
pub mod error;
pub mod ordering;
pub mod start;
pub mod types;
pub mod view;


pub use balance::{
    AggregateAmount, BalanceCalculator, PartyFilter, PrefixIndex, PriorLinesFilter, RunningTotals,
};
pub use classify::{AccountKind, checks_party, resolve_party_check};
pub use error::StatementError;
pub use ordering::{LineKey, OrderBy, SortDirection, StatementOrder, canonical_cmp};
pub use start::{
    ACTION_NAME, ActiveRecord, StatementKind, StatementStart, action_name, ensure_postable,
    statement_title,
};
pub use types::{
    AccountInfo, FiscalYearInfo, LedgerLine, PartyInfo, Statement, StatementRequest, StatementRow,
};
pub use view::StatementView;
