//! Running balance computation.
//!
//! `balance(line)` is the sum of `debit - credit` over every line of the same
//! account that precedes it in ascending canonical order (optionally only lines
//! of the same party), plus the line's own `debit - credit`.
//!
//! The display direction never enters this computation: reversing a statement
//! reverses its rows, not its balances.

use std::collections::HashMap;

use ledgerview_shared::types::{AccountId, LedgerLineId, PartyId};
use rust_decimal::Decimal;

use super::classify::resolve_party_check;
use super::error::StatementError;
use super::ordering::{LineKey, canonical_cmp};
use super::types::LedgerLine;

/// Raw result of a storage-side `SUM(debit - credit)`.
///
/// Some backends (SQLite) sum numerics as floats, and an empty set sums to NULL.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AggregateAmount {
    /// No matching rows.
    Null,
    /// Exact decimal result.
    Exact(Decimal),
    /// Floating-point result from a backend without decimal aggregates.
    Float(f64),
}

impl AggregateAmount {
    /// Coerces the aggregate to an exact decimal. `Null` is zero.
    ///
    /// A float is accepted only inside `Decimal`'s range (about ±7.9e28), so
    /// `Float(1e30)` is rejected. Sums of `NUMERIC(19, 4)` columns stay far below it.
    ///
    /// # Errors
    ///
    /// Returns `StatementError::InvalidAggregate` for NaN, infinite or
    /// out-of-range floats.
    pub fn into_decimal(self) -> Result<Decimal, StatementError> {
        match self {
            Self::Null => Ok(Decimal::ZERO),
            Self::Exact(value) => Ok(value),
            Self::Float(value) => Decimal::try_from(value)
                .map_err(|_| StatementError::InvalidAggregate(value.to_string())),
        }
    }
}

impl From<Option<Decimal>> for AggregateAmount {
    fn from(value: Option<Decimal>) -> Self {
        value.map_or(Self::Null, Self::Exact)
    }
}

/// Party restriction for a prior-lines sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartyFilter {
    /// Lines of every party (and none) are summed.
    Any,
    /// Only lines whose party equals this one.
    ///
    /// `Equals(None)` deliberately matches party-less lines (`IS NULL`), so a
    /// line without a party carries the balance of the earlier party-less lines.
    Equals(Option<PartyId>),
}

/// The "prior lines" selection for one line's balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorLinesFilter {
    /// Account whose lines are summed.
    pub account_id: AccountId,
    /// Party restriction.
    pub party: PartyFilter,
    /// Only lines strictly before this key are summed.
    pub before: LineKey,
}

impl PriorLinesFilter {
    /// Returns true if `line` belongs to the prior-lines set.
    #[must_use]
    pub fn matches(&self, line: &LedgerLine) -> bool {
        line.account_id == self.account_id
            && match self.party {
                PartyFilter::Any => true,
                PartyFilter::Equals(party) => line.party_id == party,
            }
            && canonical_cmp(&line.key(), &self.before).is_lt()
    }
}

/// Running sums read from storage at one line, each including the line itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunningTotals {
    /// Over every line of the account.
    pub all: AggregateAmount,
    /// Over the lines of the account sharing this line's party.
    pub party: AggregateAmount,
}

/// Prefix sums over one account's history, in ascending canonical order.
///
/// Built once per snapshot; each lookup is a binary search.
#[derive(Debug, Clone, Default)]
pub struct PrefixIndex {
    all: Vec<(LineKey, Decimal)>,
    by_party: HashMap<Option<PartyId>, Vec<(LineKey, Decimal)>>,
}

impl PrefixIndex {
    /// Indexes the lines of `account_id` found in `history`.
    #[must_use]
    pub fn build(history: &[LedgerLine], account_id: AccountId) -> Self {
        let mut lines: Vec<&LedgerLine> = history
            .iter()
            .filter(|line| line.account_id == account_id)
            .collect();
        lines.sort_by(|a, b| canonical_cmp(&a.key(), &b.key()));

        let mut index = Self::default();
        let mut running = Decimal::ZERO;
        for line in lines {
            let delta = line.delta();
            running += delta;
            index.all.push((line.key(), running));

            let bucket = index.by_party.entry(line.party_id).or_default();
            let party_running = bucket.last().map_or(Decimal::ZERO, |(_, sum)| *sum) + delta;
            bucket.push((line.key(), party_running));
        }
        index
    }

    /// Sums `debit - credit` over the indexed lines matching `filter`.
    ///
    /// The filter's account is assumed to be the indexed account.
    #[must_use]
    pub fn sum_before(&self, filter: &PriorLinesFilter) -> Decimal {
        let prefix = match filter.party {
            PartyFilter::Any => self.all.as_slice(),
            PartyFilter::Equals(party) => self.by_party.get(&party).map_or(&[][..], Vec::as_slice),
        };
        let count = prefix.partition_point(|(key, _)| canonical_cmp(key, &filter.before).is_lt());
        count
            .checked_sub(1)
            .map_or(Decimal::ZERO, |last| prefix[last].1)
    }

    /// Number of indexed lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.all.len()
    }

    /// Returns true if no lines were indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}

/// Computes running balances for statement lines.
pub struct BalanceCalculator;

impl BalanceCalculator {
    /// Builds the prior-lines filter for one line.
    ///
    /// The party restriction follows `resolve_party_check`: the override if given,
    /// else a selected party scope, else the line's own account kind.
    #[must_use]
    pub fn prior_filter(
        line: &LedgerLine,
        account_id: AccountId,
        party_scope: Option<PartyId>,
        default_party_check: Option<bool>,
    ) -> PriorLinesFilter {
        let scoped = resolve_party_check(
            default_party_check,
            party_scope.is_some(),
            line.account_kind,
        );
        PriorLinesFilter {
            account_id,
            party: if scoped {
                PartyFilter::Equals(line.party_id)
            } else {
                PartyFilter::Any
            },
            before: line.key(),
        }
    }

    /// Balance of `line` given the aggregate of its prior lines.
    ///
    /// # Errors
    ///
    /// Returns a coercion error for an unrepresentable aggregate.
    pub fn balance_after(
        line: &LedgerLine,
        prior: AggregateAmount,
    ) -> Result<Decimal, StatementError> {
        Ok(prior.into_decimal()? + line.delta())
    }

    /// Computes balances with one storage aggregate per line.
    ///
    /// `sum_before` runs the prior-lines aggregate; its errors are returned
    /// unchanged. Float aggregates are coerced to decimal before use.
    ///
    /// # Errors
    ///
    /// Returns the first error from `sum_before`, or a coercion error.
    pub fn compute_balances_with<F, E>(
        lines: &[LedgerLine],
        account_id: AccountId,
        party_scope: Option<PartyId>,
        default_party_check: Option<bool>,
        mut sum_before: F,
    ) -> Result<HashMap<LedgerLineId, Decimal>, E>
    where
        F: FnMut(&PriorLinesFilter) -> Result<AggregateAmount, E>,
        E: From<StatementError>,
    {
        let mut balances = HashMap::with_capacity(lines.len());
        for line in lines {
            let filter = Self::prior_filter(line, account_id, party_scope, default_party_check);
            let balance = Self::balance_after(line, sum_before(&filter)?)?;
            balances.insert(line.id, balance);
        }
        Ok(balances)
    }

    /// Computes balances from the account history in one prefix-sum pass.
    ///
    /// `history` must hold every line of `account_id` in the snapshot, not only
    /// the displayed ones: earlier fiscal years still count toward the balance.
    #[must_use]
    pub fn compute_balances(
        lines: &[LedgerLine],
        history: &[LedgerLine],
        account_id: AccountId,
        party_scope: Option<PartyId>,
        default_party_check: Option<bool>,
    ) -> HashMap<LedgerLineId, Decimal> {
        if lines.is_empty() {
            return HashMap::new();
        }
        let index = PrefixIndex::build(history, account_id);
        Self::compute_balances_indexed(lines, &index, account_id, party_scope, default_party_check)
    }

    /// Same as `compute_balances`, reusing a prebuilt index.
    #[must_use]
    pub fn compute_balances_indexed(
        lines: &[LedgerLine],
        index: &PrefixIndex,
        account_id: AccountId,
        party_scope: Option<PartyId>,
        default_party_check: Option<bool>,
    ) -> HashMap<LedgerLineId, Decimal> {
        lines
            .iter()
            .map(|line| {
                let filter =
                    Self::prior_filter(line, account_id, party_scope, default_party_check);
                (line.id, index.sum_before(&filter) + line.delta())
            })
            .collect()
    }

    /// Picks each line's balance from running totals computed by storage.
    ///
    /// `totals` maps line ids to window sums over the account history in
    /// ascending canonical order; the party sum is partitioned by party, with
    /// party-less lines forming one partition.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAggregate` when a line has no totals or a total cannot
    /// be coerced to decimal.
    pub fn compute_balances_running(
        lines: &[LedgerLine],
        totals: &HashMap<LedgerLineId, RunningTotals>,
        party_scope: Option<PartyId>,
        default_party_check: Option<bool>,
    ) -> Result<HashMap<LedgerLineId, Decimal>, StatementError> {
        lines
            .iter()
            .map(|line| {
                let running = totals.get(&line.id).ok_or_else(|| {
                    StatementError::InvalidAggregate(format!(
                        "no running total for line {}",
                        line.id.0
                    ))
                })?;
                let scoped = resolve_party_check(
                    default_party_check,
                    party_scope.is_some(),
                    line.account_kind,
                );
                let total = if scoped { running.party } else { running.all };
                Ok((line.id, total.into_decimal()?))
            })
            .collect()
    }
}
