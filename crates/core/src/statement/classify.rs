//! Account kinds and party classification.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::StatementError;

/// Kind of a ledger account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    /// Amounts owed to the company by parties.
    Receivable,
    /// Amounts the company owes to parties.
    Payable,
    /// Revenue.
    Revenue,
    /// Expense.
    Expense,
    /// Stock valuation.
    Stock,
    /// Anything else.
    Other,
    /// Grouping node; holds no lines.
    View,
}

impl AccountKind {
    /// Lower-case name as stored.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Receivable => "receivable",
            Self::Payable => "payable",
            Self::Revenue => "revenue",
            Self::Expense => "expense",
            Self::Stock => "stock",
            Self::Other => "other",
            Self::View => "view",
        }
    }

    /// Returns true if lines on this kind can be listed on a statement.
    #[must_use]
    pub const fn is_postable(self) -> bool {
        !matches!(self, Self::View)
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountKind {
    type Err = StatementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "receivable" => Ok(Self::Receivable),
            "payable" => Ok(Self::Payable),
            "revenue" => Ok(Self::Revenue),
            "expense" => Ok(Self::Expense),
            "stock" => Ok(Self::Stock),
            "other" => Ok(Self::Other),
            "view" => Ok(Self::View),
            _ => Err(StatementError::UnknownAccountKind(s.to_string())),
        }
    }
}

/// Returns true if balances on this account kind are tracked per party.
#[must_use]
pub const fn checks_party(kind: AccountKind) -> bool {
    matches!(kind, AccountKind::Receivable | AccountKind::Payable)
}

/// Decides whether a line's running balance is scoped to its party.
///
/// An explicit override applies to the whole batch. Without one, a selected
/// party forces scoping; otherwise the line's own account kind decides.
#[must_use]
pub fn resolve_party_check(
    default_party_check: Option<bool>,
    party_scope_selected: bool,
    kind: AccountKind,
) -> bool {
    match default_party_check {
        Some(forced) => forced,
        None => party_scope_selected || checks_party(kind),
    }
}
