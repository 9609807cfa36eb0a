//! Statement start form: defaults, validation, and titles.
//!
//! A statement is opened from a form holding a fiscal year, an account and an
//! optional party. The form is prefilled from the record the user opened it on.

use chrono::NaiveDate;
use ledgerview_shared::types::{AccountId, FiscalYearId, PartyId};
use serde::{Deserialize, Serialize};

use super::error::StatementError;
use super::types::{AccountInfo, FiscalYearInfo, PartyInfo, StatementRequest};

/// Name of the statement action; the title is appended to it.
pub const ACTION_NAME: &str = "Statement of Account";

/// Which flavour of statement is being opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementKind {
    /// Any account, opened from an account or a party.
    General,
    /// The party's receivable account.
    Receivable,
    /// The party's payable account.
    Payable,
}

/// The record the statement was opened from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveRecord<'a> {
    /// Opened on an account.
    Account(AccountId),
    /// Opened on a party.
    Party(&'a PartyInfo),
    /// Opened from a menu.
    None,
}

/// Start form values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementStart {
    /// Selected fiscal year.
    pub fiscalyear_id: Option<FiscalYearId>,
    /// Selected account.
    pub account_id: Option<AccountId>,
    /// Selected party.
    pub party_id: Option<PartyId>,
}

impl StatementStart {
    /// Prefills the form.
    ///
    /// The fiscal year defaults to the one containing `today`. A general
    /// statement takes the account or party it was opened on; receivable and
    /// payable statements take the party's receivable or payable account and
    /// leave the party empty.
    #[must_use]
    pub fn defaults(
        kind: StatementKind,
        active: ActiveRecord<'_>,
        fiscal_years: &[FiscalYearInfo],
        today: NaiveDate,
    ) -> Self {
        let fiscalyear_id = FiscalYearInfo::find_containing(fiscal_years, today).map(|y| y.id);

        let (account_id, party_id) = match (kind, active) {
            (StatementKind::General, ActiveRecord::Account(account)) => (Some(account), None),
            (StatementKind::General, ActiveRecord::Party(party)) => (None, Some(party.id)),
            (StatementKind::Receivable, ActiveRecord::Party(party)) => {
                (party.account_receivable_id, None)
            }
            (StatementKind::Payable, ActiveRecord::Party(party)) => {
                (party.account_payable_id, None)
            }
            _ => (None, None),
        };

        Self {
            fiscalyear_id,
            account_id,
            party_id,
        }
    }

    /// Overlays explicitly chosen values on top of the defaults.
    #[must_use]
    pub fn with_overrides(
        self,
        fiscalyear_id: Option<FiscalYearId>,
        account_id: Option<AccountId>,
        party_id: Option<PartyId>,
    ) -> Self {
        Self {
            fiscalyear_id: fiscalyear_id.or(self.fiscalyear_id),
            account_id: account_id.or(self.account_id),
            party_id: party_id.or(self.party_id),
        }
    }

    /// Turns the form into a statement request.
    ///
    /// Party scoping is forced on when a party is selected and off otherwise.
    ///
    /// # Errors
    ///
    /// Returns `MissingAccount` or `MissingFiscalYear` when a required field is empty.
    pub fn into_request(self) -> Result<StatementRequest, StatementError> {
        let account_id = self.account_id.ok_or(StatementError::MissingAccount)?;
        let fiscalyear_id = self.fiscalyear_id.ok_or(StatementError::MissingFiscalYear)?;
        Ok(StatementRequest {
            fiscalyear_id,
            account_id,
            party_id: self.party_id,
            check_party: Some(self.party_id.is_some()),
        })
    }
}

/// Rejects accounts that cannot carry lines.
///
/// # Errors
///
/// Returns `StatementError::ViewAccount` for view accounts.
pub fn ensure_postable(account: &AccountInfo) -> Result<(), StatementError> {
    if account.kind.is_postable() {
        Ok(())
    } else {
        Err(StatementError::ViewAccount(account.id))
    }
}

/// Builds the statement title: `"{code} - {name}"`, or just `"{name}"` without a code.
///
/// The name is the party's when a party is selected, else the account's.
#[must_use]
pub fn statement_title(account: &AccountInfo, party: Option<&PartyInfo>) -> String {
    let name = party.map_or(account.name.as_str(), |p| p.name.as_str());
    match account.code.as_deref() {
        Some(code) if !code.is_empty() => format!("{code} - {name}"),
        _ => name.to_string(),
    }
}

/// Full action name shown above the statement.
#[must_use]
pub fn action_name(title: &str) -> String {
    format!("{ACTION_NAME}: {title}")
}
