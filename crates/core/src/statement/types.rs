//! Statement domain types.

use chrono::NaiveDate;
use ledgerview_shared::types::{AccountId, FiscalYearId, LedgerLineId, MoveId, PartyId, line_delta};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::classify::AccountKind;
use super::ordering::{LineKey, SortDirection};

/// A posted (or draft) ledger line as read from storage.
///
/// The statement never mutates lines; they belong to the posting subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerLine {
    /// Line ID (monotonic, last-resort tie-breaker).
    pub id: LedgerLineId,
    /// Parent move.
    pub move_id: MoveId,
    /// Account the line posts against.
    pub account_id: AccountId,
    /// Kind of that account, used for party classification.
    pub account_kind: AccountKind,
    /// Optional counterparty.
    pub party_id: Option<PartyId>,
    /// Debit amount (non-negative).
    pub debit: Decimal,
    /// Credit amount (non-negative).
    pub credit: Decimal,
    /// Date of the parent move.
    pub move_date: NaiveDate,
    /// Number of the parent move. Draft moves carry a placeholder such as `/`.
    pub move_number: String,
}

impl LedgerLine {
    /// Signed contribution of this line: `debit - credit`.
    #[must_use]
    pub fn delta(&self) -> Decimal {
        line_delta(Some(self.debit), Some(self.credit))
    }

    /// Position of this line in the canonical order.
    #[must_use]
    pub fn key(&self) -> LineKey {
        LineKey {
            move_date: self.move_date,
            move_number: self.move_number.clone(),
            id: self.id,
        }
    }
}

/// Account header data for a statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    /// Account ID.
    pub id: AccountId,
    /// Account code, if any.
    pub code: Option<String>,
    /// Account name.
    pub name: String,
    /// Account kind.
    pub kind: AccountKind,
}

/// Party header data for a statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyInfo {
    /// Party ID.
    pub id: PartyId,
    /// Display name.
    pub name: String,
    /// Default receivable account.
    pub account_receivable_id: Option<AccountId>,
    /// Default payable account.
    pub account_payable_id: Option<AccountId>,
}

/// Fiscal year bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalYearInfo {
    /// Fiscal year ID.
    pub id: FiscalYearId,
    /// Display name.
    pub name: String,
    /// First day (inclusive).
    pub start_date: NaiveDate,
    /// Last day (inclusive).
    pub end_date: NaiveDate,
}

impl FiscalYearInfo {
    /// Returns true if `date` falls within this fiscal year.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Finds the fiscal year containing `date`.
    #[must_use]
    pub fn find_containing(years: &[Self], date: NaiveDate) -> Option<&Self> {
        years.iter().find(|year| year.contains(date))
    }
}

/// Which lines a statement covers.
///
/// Fiscal-year filtering is applied by storage, through the periods of the year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementRequest {
    /// Fiscal year to list.
    pub fiscalyear_id: FiscalYearId,
    /// Account to list.
    pub account_id: AccountId,
    /// Optional party filter.
    pub party_id: Option<PartyId>,
    /// Forced party check for the whole batch (`None` decides per line).
    pub check_party: Option<bool>,
}

/// One displayed statement row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementRow {
    /// The ledger line.
    pub line: LedgerLine,
    /// Running balance up to and including this line.
    pub balance: Decimal,
}

/// A rendered statement of account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    /// Human-readable title (`"{code} - {name}"`).
    pub title: String,
    /// Display direction of `rows`.
    pub direction: SortDirection,
    /// Rows in canonical display order.
    pub rows: Vec<StatementRow>,
    /// Total number of lines matching the request (across pages).
    pub total: u64,
}
