//! Canonical statement order.
//!
//! Ledger lines are ordered by move date, then move number, then line ID.
//! Move numbers alone are unreliable: draft moves carry a placeholder (`/`)
//! and numbers may be reassigned at period end, so the date leads and the
//! line ID breaks any remaining tie.
//!
//! Both the running balance and the listing use this module. If one of them
//! sorted differently, the displayed balances would not add up row to row.

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::NaiveDate;
use ledgerview_shared::types::LedgerLineId;
use serde::{Deserialize, Serialize};

use super::error::StatementError;

/// Position of a line in the canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineKey {
    /// Move date.
    pub move_date: NaiveDate,
    /// Move number, compared lexically.
    pub move_number: String,
    /// Line ID.
    pub id: LedgerLineId,
}

/// Compares two keys in ascending canonical order.
///
/// `a < b` iff `a.date < b.date`, or the dates match and `a.number < b.number`,
/// or both match and `a.id < b.id`.
#[must_use]
pub fn canonical_cmp(a: &LineKey, b: &LineKey) -> Ordering {
    a.move_date
        .cmp(&b.move_date)
        .then_with(|| a.move_number.as_bytes().cmp(b.move_number.as_bytes()))
        .then_with(|| a.id.cmp(&b.id))
}

impl PartialOrd for LineKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LineKey {
    fn cmp(&self, other: &Self) -> Ordering {
        canonical_cmp(self, other)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Oldest first.
    Ascending,
    /// Newest first.
    Descending,
}

impl SortDirection {
    /// Applies this direction to an ascending comparison result.
    #[must_use]
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

impl FromStr for SortDirection {
    type Err = StatementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            other => Err(StatementError::InvalidOrder(other.to_string())),
        }
    }
}

/// A caller-supplied sort term, e.g. from a list view header click.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    /// Field name.
    pub field: String,
    /// Requested direction.
    pub direction: SortDirection,
}

impl OrderBy {
    /// Creates a sort term.
    #[must_use]
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    /// Parses `field[:asc|desc]`. A missing direction means ascending.
    ///
    /// # Errors
    ///
    /// Returns `StatementError::InvalidOrder` for an empty field or an unknown direction.
    pub fn parse(term: &str) -> Result<Self, StatementError> {
        let (field, direction) = match term.split_once(':') {
            Some((field, direction)) => (field.trim(), direction.parse()?),
            None => (term.trim(), SortDirection::Ascending),
        };
        if field.is_empty() {
            return Err(StatementError::InvalidOrder(term.to_string()));
        }
        Ok(Self::new(field.to_ascii_lowercase(), direction))
    }

    /// Parses a comma-separated list of terms.
    ///
    /// # Errors
    ///
    /// Returns the first term that fails to parse.
    pub fn parse_list(terms: &str) -> Result<Vec<Self>, StatementError> {
        terms
            .split(',')
            .filter(|term| !term.trim().is_empty())
            .map(Self::parse)
            .collect()
    }
}

/// The order a statement is displayed in.
///
/// Whatever the caller asked for is discarded; only the direction survives,
/// and it is applied to all three keys alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementOrder {
    direction: SortDirection,
}

impl StatementOrder {
    /// Creates an order with an explicit direction.
    #[must_use]
    pub const fn new(direction: SortDirection) -> Self {
        Self { direction }
    }

    /// Derives the statement order from a requested order.
    ///
    /// Ascending only when the request sorts `date` ascending; newest first otherwise.
    #[must_use]
    pub fn from_requested(requested: &[OrderBy]) -> Self {
        let ascending = requested
            .iter()
            .any(|term| term.field == "date" && term.direction == SortDirection::Ascending);
        Self::new(if ascending {
            SortDirection::Ascending
        } else {
            SortDirection::Descending
        })
    }

    /// Display direction.
    #[must_use]
    pub const fn direction(self) -> SortDirection {
        self.direction
    }

    /// Compares two keys in display order.
    #[must_use]
    pub fn compare(self, a: &LineKey, b: &LineKey) -> Ordering {
        self.direction.apply(canonical_cmp(a, b))
    }

    /// Sorts items in display order.
    pub fn sort_by_key<T, F>(self, items: &mut [T], key: F)
    where
        F: Fn(&T) -> LineKey,
    {
        items.sort_by(|a, b| self.compare(&key(a), &key(b)));
    }

    /// The `(column, direction)` terms storage must order by.
    #[must_use]
    pub fn terms(self) -> [(&'static str, SortDirection); 3] {
        [
            ("move.date", self.direction),
            ("move.number", self.direction),
            ("id", self.direction),
        ]
    }
}

impl Default for StatementOrder {
    fn default() -> Self {
        Self::from_requested(&[])
    }
}
