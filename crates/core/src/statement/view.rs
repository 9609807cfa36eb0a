//! Read-path statement view.
//!
//! `StatementView` is the only place the "statement mode" lives. It travels
//! with a listing request and nowhere else: writes never see it and it is not
//! part of any cache key, so there is nothing to scrub after a statement read.

use std::collections::HashMap;

use ledgerview_shared::types::{LedgerLineId, PageRequest};
use rust_decimal::Decimal;

use super::ordering::{OrderBy, StatementOrder};
use super::types::{LedgerLine, Statement, StatementRow};

/// Listing parameters for one statement read.
#[derive(Debug, Clone)]
pub struct StatementView {
    /// Resolved display order.
    pub order: StatementOrder,
    /// Requested page.
    pub page: PageRequest,
}

impl StatementView {
    /// Resolves the display order from whatever the caller asked for.
    #[must_use]
    pub fn new(requested: &[OrderBy], page: PageRequest) -> Self {
        Self {
            order: StatementOrder::from_requested(requested),
            page,
        }
    }

    /// Pairs lines with their balances in display order.
    ///
    /// Lines are re-sorted here with the same comparison storage ordered by,
    /// so a backend collation quirk cannot make rows and balances disagree.
    #[must_use]
    pub fn assemble(
        &self,
        title: String,
        mut lines: Vec<LedgerLine>,
        balances: &HashMap<LedgerLineId, Decimal>,
        total: u64,
    ) -> Statement {
        self.order.sort_by_key(&mut lines, LedgerLine::key);
        let rows = lines
            .into_iter()
            .map(|line| StatementRow {
                balance: balances.get(&line.id).copied().unwrap_or_default(),
                line,
            })
            .collect();

        Statement {
            title,
            direction: self.order.direction(),
            rows,
            total,
        }
    }
}
