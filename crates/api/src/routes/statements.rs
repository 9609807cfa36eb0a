//! Statement of account routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use chrono::Utc;
use ledgerview_core::statement::{
    ActiveRecord, OrderBy, SortDirection, Statement, StatementKind, StatementStart, StatementView,
    action_name,
};
use ledgerview_shared::types::{
    AccountId, FiscalYearId, PageMeta, PageRequest, PageResponse, PartyId, format_money,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// Upper bound on `per_page`.
pub const MAX_PER_PAGE: u32 = 500;

/// Creates the statement routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/statements", get(get_statement))
        .route(
            "/parties/{party_id}/statements/receivable",
            get(get_receivable_statement),
        )
        .route(
            "/parties/{party_id}/statements/payable",
            get(get_payable_statement),
        )
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Query parameters for a statement.
#[derive(Debug, Deserialize)]
pub struct StatementQuery {
    /// Fiscal year (defaults to the one containing today).
    pub fiscalyear_id: Option<Uuid>,
    /// Account.
    pub account_id: Option<Uuid>,
    /// Party scope.
    pub party_id: Option<Uuid>,
    /// Requested order, e.g. `date:asc`. Only an ascending date is honored.
    pub order: Option<String>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Rows per page.
    pub per_page: Option<u32>,
}

// ============================================================================
// Response Types
// ============================================================================

/// Response for a statement of account.
#[derive(Debug, Serialize)]
pub struct StatementResponse {
    /// Statement title.
    pub title: String,
    /// Action name including the title.
    pub action_name: String,
    /// Display direction of `rows`.
    pub direction: SortDirection,
    /// Statement rows.
    pub rows: Vec<StatementRowResponse>,
    /// Pagination metadata.
    pub pagination: PageMeta,
}

/// One statement row.
#[derive(Debug, Serialize)]
pub struct StatementRowResponse {
    /// Ledger line ID.
    pub id: i64,
    /// Parent move.
    pub move_id: Uuid,
    /// Move date.
    pub date: String,
    /// Move number.
    pub number: String,
    /// Party of the line.
    pub party_id: Option<Uuid>,
    /// Debit amount.
    pub debit: String,
    /// Credit amount.
    pub credit: String,
    /// Running balance.
    pub balance: String,
}

impl StatementResponse {
    fn new(statement: Statement, page: &PageRequest) -> Self {
        let rows = statement
            .rows
            .into_iter()
            .map(|row| StatementRowResponse {
                id: row.line.id.into_inner(),
                move_id: row.line.move_id.into_inner(),
                date: row.line.move_date.to_string(),
                number: row.line.move_number,
                party_id: row.line.party_id.map(PartyId::into_inner),
                debit: format_money(row.line.debit),
                credit: format_money(row.line.credit),
                balance: format_money(row.balance),
            })
            .collect();
        let PageResponse { data, meta } =
            PageResponse::new(rows, page.page, page.per_page, statement.total);

        Self {
            action_name: action_name(&statement.title),
            title: statement.title,
            direction: statement.direction,
            rows: data,
            pagination: meta,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /statements
async fn get_statement(
    State(state): State<AppState>,
    Query(query): Query<StatementQuery>,
) -> Result<Json<StatementResponse>, ApiError> {
    open_statement(&state, StatementKind::General, None, &query).await
}

/// GET /parties/{party_id}/statements/receivable
async fn get_receivable_statement(
    State(state): State<AppState>,
    Path(party_id): Path<Uuid>,
    Query(query): Query<StatementQuery>,
) -> Result<Json<StatementResponse>, ApiError> {
    open_statement(
        &state,
        StatementKind::Receivable,
        Some(PartyId::from_uuid(party_id)),
        &query,
    )
    .await
}

/// GET /parties/{party_id}/statements/payable
async fn get_payable_statement(
    State(state): State<AppState>,
    Path(party_id): Path<Uuid>,
    Query(query): Query<StatementQuery>,
) -> Result<Json<StatementResponse>, ApiError> {
    open_statement(
        &state,
        StatementKind::Payable,
        Some(PartyId::from_uuid(party_id)),
        &query,
    )
    .await
}

/// Resolves the start form, then reads the statement.
async fn open_statement(
    state: &AppState,
    kind: StatementKind,
    opened_on: Option<PartyId>,
    query: &StatementQuery,
) -> Result<Json<StatementResponse>, ApiError> {
    let requested = match query.order.as_deref() {
        Some(order) => OrderBy::parse_list(order)?,
        None => Vec::new(),
    };
    let page = PageRequest::new(
        query.page.unwrap_or(1),
        query
            .per_page
            .unwrap_or(state.statement.default_per_page)
            .min(MAX_PER_PAGE),
    );
    let view = StatementView::new(&requested, page.clone());

    let repo = state.statements();
    let party = match opened_on {
        Some(party_id) => Some(repo.party(party_id).await?),
        None => None,
    };
    let fiscal_years = if query.fiscalyear_id.is_none() {
        repo.fiscal_years().await?
    } else {
        Vec::new()
    };
    let active = party.as_ref().map_or(ActiveRecord::None, ActiveRecord::Party);

    let request = StatementStart::defaults(kind, active, &fiscal_years, Utc::now().date_naive())
        .with_overrides(
            query.fiscalyear_id.map(FiscalYearId::from_uuid),
            query.account_id.map(AccountId::from_uuid),
            query.party_id.map(PartyId::from_uuid),
        )
        .into_request()?;

    let statement = repo.statement(&request, &view).await?;
    info!(
        account_id = %request.account_id,
        rows = statement.rows.len(),
        total = statement.total,
        "Statement served"
    );

    Ok(Json(StatementResponse::new(statement, &page)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ledgerview_core::statement::{AccountKind, LedgerLine, StatementRow};
    use ledgerview_shared::types::{LedgerLineId, MoveId};
    use rust_decimal_macros::dec;

    #[test]
    fn test_response_formats_money_and_pages() {
        let line = LedgerLine {
            id: LedgerLineId(3),
            move_id: MoveId::new(),
            account_id: AccountId::new(),
            account_kind: AccountKind::Receivable,
            party_id: None,
            debit: dec!(12.5),
            credit: dec!(0),
            move_date: NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
            move_number: "2024/0007".to_string(),
        };
        let statement = Statement {
            title: "1200 - Acme".to_string(),
            direction: SortDirection::Descending,
            rows: vec![StatementRow {
                line,
                balance: dec!(-7.455),
            }],
            total: 51,
        };

        let response = StatementResponse::new(statement, &PageRequest::new(1, 50));
        assert_eq!(response.action_name, "Statement of Account: 1200 - Acme");
        assert_eq!(response.rows[0].date, "2024-02-29");
        assert_eq!(response.rows[0].debit, "12.50");
        assert_eq!(response.rows[0].balance, "-7.46");
        assert_eq!(response.pagination.total_pages, 2);
    }
}
