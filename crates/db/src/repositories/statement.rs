//! Statement repository.
//!
//! Every statement read runs inside one read-only `REPEATABLE READ`
//! transaction, so the listed lines and every prior-lines aggregate see the
//! same snapshot of the ledger.

use std::collections::HashMap;

use chrono::NaiveDate;
use ledgerview_core::statement::{
    AccountInfo, AggregateAmount, BalanceCalculator, FiscalYearInfo, LedgerLine, PartyFilter,
    PartyInfo, PriorLinesFilter, RunningTotals, SortDirection, Statement, StatementError,
    StatementOrder, StatementRequest, StatementView, ensure_postable, statement_title,
};
use ledgerview_shared::BalanceStrategy;
use ledgerview_shared::types::{AccountId, FiscalYearId, LedgerLineId, MoveId, PartyId};
use rust_decimal::Decimal;
use sea_orm::sea_query::{
    Alias, Expr, Func, OrderedStatement, Query, SelectStatement, SimpleExpr, WindowStatement,
};
use sea_orm::{
    AccessMode, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    FromQueryResult, IsolationLevel, JoinType, Order, PaginatorTrait, QueryFilter, QueryOrder,
    QueryResult, QuerySelect, QueryTrait, RelationTrait, Select, TransactionTrait,
};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::entities::{accounts, fiscal_years, move_lines, moves, parties, periods};

/// Alias of the prior-lines aggregate column.
const TOTAL_ALIAS: &str = "total";

/// Aliases of the running-total window query.
const HISTORY_ALIAS: &str = "history";
const RUNNING_ALIAS: &str = "running";
const PARTY_RUNNING_ALIAS: &str = "party_running";

/// Error types for statement operations.
#[derive(Debug, thiserror::Error)]
pub enum StatementStoreError {
    /// Statement rule violation or missing record.
    #[error(transparent)]
    Statement(#[from] StatementError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// A ledger line joined with its move and account kind.
#[derive(Debug, FromQueryResult)]
struct LineRow {
    id: i64,
    move_id: Uuid,
    account_id: Uuid,
    party_id: Option<Uuid>,
    debit: Decimal,
    credit: Decimal,
    move_date: NaiveDate,
    move_number: String,
    account_kind: String,
}

impl TryFrom<LineRow> for LedgerLine {
    type Error = StatementError;

    fn try_from(row: LineRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: LedgerLineId(row.id),
            move_id: MoveId::from_uuid(row.move_id),
            account_id: AccountId::from_uuid(row.account_id),
            account_kind: row.account_kind.parse()?,
            party_id: row.party_id.map(PartyId::from_uuid),
            debit: row.debit,
            credit: row.credit,
            move_date: row.move_date,
            move_number: row.move_number,
        })
    }
}

/// Statement repository.
#[derive(Debug, Clone)]
pub struct StatementRepository {
    db: DatabaseConnection,
    strategy: BalanceStrategy,
}

impl StatementRepository {
    /// Creates a new statement repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, strategy: BalanceStrategy) -> Self {
        Self { db, strategy }
    }

    /// Balance strategy in use.
    #[must_use]
    pub const fn strategy(&self) -> BalanceStrategy {
        self.strategy
    }

    /// Builds a statement of account.
    ///
    /// # Errors
    ///
    /// Returns `StatementStoreError::Statement` when the account, party or fiscal
    /// year is missing or the account is a view account, and
    /// `StatementStoreError::Database` for storage failures.
    #[instrument(
        skip(self, request, view),
        fields(
            account_id = %request.account_id,
            fiscalyear_id = %request.fiscalyear_id,
            strategy = ?self.strategy,
        )
    )]
    pub async fn statement(
        &self,
        request: &StatementRequest,
        view: &StatementView,
    ) -> Result<Statement, StatementStoreError> {
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::RepeatableRead),
                Some(AccessMode::ReadOnly),
            )
            .await?;

        let account = find_account(&txn, request.account_id).await?;
        ensure_postable(&account)?;
        find_fiscal_year(&txn, request.fiscalyear_id).await?;
        let party = match request.party_id {
            Some(party_id) => Some(find_party(&txn, party_id).await?),
            None => None,
        };

        let (lines, total) = list_lines(&txn, request, view).await?;
        let balances = compute_balances(&txn, self.strategy, request, &lines).await?;
        txn.commit().await?;

        debug!(rows = lines.len(), total, "Statement computed");
        let title = statement_title(&account, party.as_ref());
        Ok(view.assemble(title, lines, &balances, total))
    }

    /// Looks up an account.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` or a database error.
    pub async fn account(&self, account_id: AccountId) -> Result<AccountInfo, StatementStoreError> {
        find_account(&self.db, account_id).await
    }

    /// Looks up a party.
    ///
    /// # Errors
    ///
    /// Returns `PartyNotFound` or a database error.
    pub async fn party(&self, party_id: PartyId) -> Result<PartyInfo, StatementStoreError> {
        find_party(&self.db, party_id).await
    }

    /// Lists all fiscal years, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn fiscal_years(&self) -> Result<Vec<FiscalYearInfo>, StatementStoreError> {
        let years = fiscal_years::Entity::find()
            .order_by_asc(fiscal_years::Column::StartDate)
            .all(&self.db)
            .await?;
        Ok(years.into_iter().map(fiscal_year_info).collect())
    }
}

/// Computes balances for `lines` with the configured strategy.
///
/// Both strategies aggregate in storage. `PrefixScan` reads window sums for the
/// listed lines in one query; `PerLine` runs one `SUM` per line.
///
/// # Errors
///
/// Returns a database error, or a coercion error for an unrepresentable aggregate.
pub async fn compute_balances<C: ConnectionTrait>(
    conn: &C,
    strategy: BalanceStrategy,
    request: &StatementRequest,
    lines: &[LedgerLine],
) -> Result<HashMap<LedgerLineId, Decimal>, StatementStoreError> {
    let Some(up_to) = lines.iter().map(|line| line.move_date).max() else {
        return Ok(HashMap::new());
    };

    match strategy {
        BalanceStrategy::PrefixScan => {
            let totals = running_totals(conn, request.account_id, up_to, lines).await?;
            debug!(totals = totals.len(), "Running totals read");
            Ok(BalanceCalculator::compute_balances_running(
                lines,
                &totals,
                request.party_id,
                request.check_party,
            )?)
        }
        BalanceStrategy::PerLine => {
            let mut balances = HashMap::with_capacity(lines.len());
            for line in lines {
                let filter = BalanceCalculator::prior_filter(
                    line,
                    request.account_id,
                    request.party_id,
                    request.check_party,
                );
                let prior = sum_prior(conn, &filter).await?;
                balances.insert(line.id, BalanceCalculator::balance_after(line, prior)?);
            }
            Ok(balances)
        }
    }
}

/// Runs the prior-lines aggregate `SUM(debit - credit)` for one line.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn sum_prior<C: ConnectionTrait>(
    conn: &C,
    filter: &PriorLinesFilter,
) -> Result<AggregateAmount, DbErr> {
    let statement = prior_sum_query(filter).build(conn.get_database_backend());
    match conn.query_one(statement).await? {
        Some(row) => amount_from_row(&row, TOTAL_ALIAS),
        None => Ok(AggregateAmount::Null),
    }
}

/// Reads the running totals of `lines` over the account history up to `up_to`.
///
/// The sums run over every line of the account, across fiscal years and
/// parties; only the rows of the listed lines are returned.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn running_totals<C: ConnectionTrait>(
    conn: &C,
    account_id: AccountId,
    up_to: NaiveDate,
    lines: &[LedgerLine],
) -> Result<HashMap<LedgerLineId, RunningTotals>, DbErr> {
    let ids = lines.iter().map(|line| line.id.into_inner());
    let statement = conn
        .get_database_backend()
        .build(&running_totals_query(account_id, up_to, ids));

    let rows = conn.query_all(statement).await?;
    rows.iter()
        .map(|row| {
            let id = row.try_get::<i64>("", "id")?;
            let totals = RunningTotals {
                all: amount_from_row(row, RUNNING_ALIAS)?,
                party: amount_from_row(row, PARTY_RUNNING_ALIAS)?,
            };
            Ok::<_, DbErr>((LedgerLineId(id), totals))
        })
        .collect()
}

/// Reads an amount column, falling back to a float for backends without decimal sums.
fn amount_from_row(row: &QueryResult, alias: &str) -> Result<AggregateAmount, DbErr> {
    match row.try_get::<Option<Decimal>>("", alias) {
        Ok(total) => Ok(AggregateAmount::from(total)),
        Err(_) => row
            .try_get::<Option<f64>>("", alias)
            .map(|total| total.map_or(AggregateAmount::Null, AggregateAmount::Float)),
    }
}

fn line_delta() -> SimpleExpr {
    Expr::col((move_lines::Entity, move_lines::Column::Debit))
        .sub(Expr::col((move_lines::Entity, move_lines::Column::Credit)))
}

/// Ascending canonical order, optionally restarted for each party.
fn canonical_window(per_party: bool) -> WindowStatement {
    let mut window = if per_party {
        WindowStatement::partition_by((move_lines::Entity, move_lines::Column::PartyId))
    } else {
        WindowStatement::new()
    };
    window
        .order_by((moves::Entity, moves::Column::Date), Order::Asc)
        .order_by((moves::Entity, moves::Column::Number), Order::Asc)
        .order_by((move_lines::Entity, move_lines::Column::Id), Order::Asc);
    window
}

/// Builds the running-total query.
///
/// The window sums are taken over the account history in a subquery, then
/// filtered to `ids`, so lines outside the page still count.
fn running_totals_query(
    account_id: AccountId,
    up_to: NaiveDate,
    ids: impl IntoIterator<Item = i64>,
) -> SelectStatement {
    let history = Query::select()
        .column((move_lines::Entity, move_lines::Column::Id))
        .expr_window_as(Func::sum(line_delta()), canonical_window(false), Alias::new(RUNNING_ALIAS))
        .expr_window_as(
            Func::sum(line_delta()),
            canonical_window(true),
            Alias::new(PARTY_RUNNING_ALIAS),
        )
        .from(move_lines::Entity)
        .inner_join(
            moves::Entity,
            Expr::col((moves::Entity, moves::Column::Id))
                .equals((move_lines::Entity, move_lines::Column::MoveId)),
        )
        .and_where(
            Expr::col((move_lines::Entity, move_lines::Column::AccountId)).eq(account_id.into_inner()),
        )
        .and_where(Expr::col((moves::Entity, moves::Column::Date)).lte(up_to))
        .to_owned();

    Query::select()
        .columns([
            Alias::new("id"),
            Alias::new(RUNNING_ALIAS),
            Alias::new(PARTY_RUNNING_ALIAS),
        ])
        .from_subquery(history, Alias::new(HISTORY_ALIAS))
        .and_where(Expr::col((Alias::new(HISTORY_ALIAS), Alias::new("id"))).is_in(ids))
        .to_owned()
}

/// Builds the prior-lines aggregate query.
fn prior_sum_query(filter: &PriorLinesFilter) -> Select<move_lines::Entity> {
    let before = &filter.before;
    let query = move_lines::Entity::find()
        .select_only()
        .expr_as(Func::sum(line_delta()), TOTAL_ALIAS)
        .join(JoinType::InnerJoin, move_lines::Relation::Moves.def())
        .filter(move_lines::Column::AccountId.eq(filter.account_id.into_inner()));

    let query = match filter.party {
        PartyFilter::Any => query,
        PartyFilter::Equals(Some(party_id)) => {
            query.filter(move_lines::Column::PartyId.eq(party_id.into_inner()))
        }
        PartyFilter::Equals(None) => query.filter(move_lines::Column::PartyId.is_null()),
    };

    query.filter(
        Condition::any()
            .add(moves::Column::Date.lt(before.move_date))
            .add(
                moves::Column::Date
                    .eq(before.move_date)
                    .and(moves::Column::Number.lt(before.move_number.as_str())),
            )
            .add(
                moves::Column::Date
                    .eq(before.move_date)
                    .and(moves::Column::Number.eq(before.move_number.as_str()))
                    .and(move_lines::Column::Id.lt(before.id.into_inner())),
            ),
    )
}

/// Selects the columns of a `LineRow`, joined with move and account.
fn line_columns(query: Select<move_lines::Entity>) -> Select<move_lines::Entity> {
    query
        .select_only()
        .column(move_lines::Column::Id)
        .column(move_lines::Column::MoveId)
        .column(move_lines::Column::AccountId)
        .column(move_lines::Column::PartyId)
        .column(move_lines::Column::Debit)
        .column(move_lines::Column::Credit)
        .column_as(moves::Column::Date, "move_date")
        .column_as(moves::Column::Number, "move_number")
        .expr_as(
            Expr::col((accounts::Entity, accounts::Column::Kind)).cast_as(Alias::new("text")),
            "account_kind",
        )
        .join(JoinType::InnerJoin, move_lines::Relation::Accounts.def())
}

/// Lines of the request's account in the fiscal year (and party, when set).
fn statement_lines_query(request: &StatementRequest) -> Select<move_lines::Entity> {
    let query = move_lines::Entity::find()
        .join(JoinType::InnerJoin, move_lines::Relation::Moves.def())
        .join(JoinType::InnerJoin, moves::Relation::Periods.def())
        .filter(move_lines::Column::AccountId.eq(request.account_id.into_inner()))
        .filter(periods::Column::FiscalYearId.eq(request.fiscalyear_id.into_inner()));

    match request.party_id {
        Some(party_id) => query.filter(move_lines::Column::PartyId.eq(party_id.into_inner())),
        None => query,
    }
}

fn to_order(direction: SortDirection) -> Order {
    match direction {
        SortDirection::Ascending => Order::Asc,
        SortDirection::Descending => Order::Desc,
    }
}

/// Applies the statement order; every key shares one direction.
fn order_lines(
    query: Select<move_lines::Entity>,
    order: StatementOrder,
) -> Select<move_lines::Entity> {
    order
        .terms()
        .into_iter()
        .fold(query, |query, (term, direction)| match term {
            "move.date" => query.order_by(moves::Column::Date, to_order(direction)),
            "move.number" => query.order_by(moves::Column::Number, to_order(direction)),
            _ => query.order_by(move_lines::Column::Id, to_order(direction)),
        })
}

/// Lists one page of statement lines in canonical display order.
///
/// # Errors
///
/// Returns an error if the database query fails or a row has an unknown account kind.
pub async fn list_lines<C: ConnectionTrait>(
    conn: &C,
    request: &StatementRequest,
    view: &StatementView,
) -> Result<(Vec<LedgerLine>, u64), StatementStoreError> {
    let base = statement_lines_query(request);
    let total = base.clone().count(conn).await?;

    // Any caller-supplied order was already discarded by `StatementView`.
    let rows = order_lines(line_columns(base), view.order)
        .offset(view.page.offset())
        .limit(view.page.limit())
        .into_model::<LineRow>()
        .all(conn)
        .await?;

    let lines = rows
        .into_iter()
        .map(LedgerLine::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok((lines, total))
}

/// Looks up an account.
///
/// # Errors
///
/// Returns `AccountNotFound` or a database error.
pub async fn find_account<C: ConnectionTrait>(
    conn: &C,
    account_id: AccountId,
) -> Result<AccountInfo, StatementStoreError> {
    let account = accounts::Entity::find_by_id(account_id.into_inner())
        .one(conn)
        .await?
        .ok_or(StatementError::AccountNotFound(account_id))?;

    Ok(AccountInfo {
        id: account_id,
        code: account.code,
        name: account.name,
        kind: account.kind.into(),
    })
}

/// Looks up a party.
///
/// # Errors
///
/// Returns `PartyNotFound` or a database error.
pub async fn find_party<C: ConnectionTrait>(
    conn: &C,
    party_id: PartyId,
) -> Result<PartyInfo, StatementStoreError> {
    let party = parties::Entity::find_by_id(party_id.into_inner())
        .one(conn)
        .await?
        .ok_or(StatementError::PartyNotFound(party_id))?;

    Ok(PartyInfo {
        id: party_id,
        name: party.name,
        account_receivable_id: party.account_receivable_id.map(AccountId::from_uuid),
        account_payable_id: party.account_payable_id.map(AccountId::from_uuid),
    })
}

/// Looks up a fiscal year.
///
/// # Errors
///
/// Returns `FiscalYearNotFound` or a database error.
pub async fn find_fiscal_year<C: ConnectionTrait>(
    conn: &C,
    fiscalyear_id: FiscalYearId,
) -> Result<FiscalYearInfo, StatementStoreError> {
    let year = fiscal_years::Entity::find_by_id(fiscalyear_id.into_inner())
        .one(conn)
        .await?
        .ok_or(StatementError::FiscalYearNotFound(fiscalyear_id))?;
    Ok(fiscal_year_info(year))
}

fn fiscal_year_info(year: fiscal_years::Model) -> FiscalYearInfo {
    FiscalYearInfo {
        id: FiscalYearId::from_uuid(year.id),
        name: year.name,
        start_date: year.start_date,
        end_date: year.end_date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerview_core::statement::{AccountKind, LineKey};
    use ledgerview_shared::types::PageRequest;
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};
    use std::collections::BTreeMap;

    fn key(id: i64) -> LineKey {
        LineKey {
            move_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            move_number: "2024/0002".to_string(),
            id: LedgerLineId(id),
        }
    }

    fn total_row(value: Value) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([(TOTAL_ALIAS, value)])
    }

    fn line(id: i64, debit: Decimal, credit: Decimal) -> LedgerLine {
        LedgerLine {
            id: LedgerLineId(id),
            move_id: MoveId::new(),
            account_id: AccountId::from_uuid(Uuid::from_u128(1)),
            account_kind: AccountKind::Other,
            party_id: None,
            debit,
            credit,
            move_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            move_number: "2024/0002".to_string(),
        }
    }

    fn request() -> StatementRequest {
        StatementRequest {
            fiscalyear_id: FiscalYearId::from_uuid(Uuid::from_u128(9)),
            account_id: AccountId::from_uuid(Uuid::from_u128(1)),
            party_id: None,
            check_party: None,
        }
    }

    #[test]
    fn test_prior_sum_query_unscoped() {
        let filter = PriorLinesFilter {
            account_id: AccountId::from_uuid(Uuid::nil()),
            party: PartyFilter::Any,
            before: key(7),
        };
        let sql = prior_sum_query(&filter)
            .build(DatabaseBackend::Postgres)
            .to_string();
        assert!(sql.contains(r#"SUM("move_lines"."debit" - "move_lines"."credit") AS "total""#));
        assert!(sql.contains(r#"INNER JOIN "moves""#));
        assert!(sql.contains(r#""moves"."date" < '2024-01-02'"#));
        assert!(sql.contains(r#""moves"."number" < '2024/0002'"#));
        assert!(sql.contains(r#""move_lines"."id" < 7"#));
        assert!(!sql.contains("party_id"));
    }

    #[test]
    fn test_prior_sum_query_party_scoped() {
        let party = PartyId::from_uuid(Uuid::from_u128(42));
        let scoped = PriorLinesFilter {
            account_id: AccountId::from_uuid(Uuid::nil()),
            party: PartyFilter::Equals(Some(party)),
            before: key(1),
        };
        let sql = prior_sum_query(&scoped)
            .build(DatabaseBackend::Postgres)
            .to_string();
        assert!(sql.contains(&format!(r#""move_lines"."party_id" = '{}'"#, party.0)));

        let null_party = PriorLinesFilter {
            party: PartyFilter::Equals(None),
            ..scoped
        };
        let sql = prior_sum_query(&null_party)
            .build(DatabaseBackend::Postgres)
            .to_string();
        assert!(sql.contains(r#""move_lines"."party_id" IS NULL"#));
    }

    #[test]
    fn test_statement_lines_query_filters_fiscal_year_and_party() {
        let mut req = request();
        let sql = statement_lines_query(&req)
            .build(DatabaseBackend::Postgres)
            .to_string();
        assert!(sql.contains(r#"INNER JOIN "periods""#));
        assert!(sql.contains(r#""periods"."fiscal_year_id" = "#));
        assert!(!sql.contains("party_id\" ="));

        req.party_id = Some(PartyId::from_uuid(Uuid::from_u128(5)));
        let sql = statement_lines_query(&req)
            .build(DatabaseBackend::Postgres)
            .to_string();
        assert!(sql.contains(r#""move_lines"."party_id" = "#));
    }

    #[tokio::test]
    async fn test_sum_prior_reads_decimal() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[total_row(Value::from(Some(dec!(100))))]])
            .into_connection();
        let filter = PriorLinesFilter {
            account_id: AccountId::from_uuid(Uuid::nil()),
            party: PartyFilter::Any,
            before: key(2),
        };
        let total = sum_prior(&db, &filter).await.unwrap();
        assert_eq!(total, AggregateAmount::Exact(dec!(100)));
    }

    #[tokio::test]
    async fn test_sum_prior_coerces_float() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[total_row(Value::Double(Some(100.0)))]])
            .into_connection();
        let filter = PriorLinesFilter {
            account_id: AccountId::from_uuid(Uuid::nil()),
            party: PartyFilter::Any,
            before: key(2),
        };
        let total = sum_prior(&db, &filter).await.unwrap();
        assert_eq!(total.into_decimal().unwrap(), dec!(100));
    }

    #[tokio::test]
    async fn test_per_line_strategy_adds_own_delta() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                [total_row(Value::from(None::<Decimal>))],
                [total_row(Value::from(Some(dec!(100))))],
            ])
            .into_connection();
        let lines = vec![line(1, dec!(100), dec!(0)), line(2, dec!(0), dec!(40))];
        let balances = compute_balances(&db, BalanceStrategy::PerLine, &request(), &lines)
            .await
            .unwrap();
        assert_eq!(balances[&LedgerLineId(1)], dec!(100));
        assert_eq!(balances[&LedgerLineId(2)], dec!(60));
    }

    fn running_row(id: i64, running: Decimal, party_running: Decimal) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([
            ("id", Value::from(id)),
            (RUNNING_ALIAS, Value::from(Some(running))),
            (PARTY_RUNNING_ALIAS, Value::from(Some(party_running))),
        ])
    }

    #[test]
    fn test_running_totals_query_sums_in_storage() {
        let query = running_totals_query(
            AccountId::from_uuid(Uuid::nil()),
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
            [4, 9],
        );
        let sql = DatabaseBackend::Postgres.build(&query).to_string();
        assert!(sql.contains(r#"SUM("move_lines"."debit" - "move_lines"."credit") OVER"#));
        assert!(sql.contains(r#"PARTITION BY "move_lines"."party_id""#));
        assert!(sql.contains(r#""moves"."number" ASC"#));
        assert!(sql.contains(r#""moves"."date" <= '2024-03-31'"#));
        assert!(sql.contains(r#""history"."id" IN (4, 9)"#));
        assert!(!sql.contains("periods"));
    }

    #[tokio::test]
    async fn test_prefix_scan_reads_running_totals_once() {
        let party = PartyId::from_uuid(Uuid::from_u128(7));
        let mut scoped = line(2, dec!(0), dec!(40));
        scoped.account_kind = AccountKind::Receivable;
        scoped.party_id = Some(party);
        let lines = vec![line(1, dec!(100), dec!(0)), scoped];

        // Storage sees earlier-year history: 250 overall, 90 for the party.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[
                running_row(1, dec!(350), dec!(350)),
                running_row(2, dec!(310), dec!(50)),
            ]])
            .into_connection();
        let balances = compute_balances(&db, BalanceStrategy::PrefixScan, &request(), &lines)
            .await
            .unwrap();
        assert_eq!(balances[&LedgerLineId(1)], dec!(350));
        assert_eq!(balances[&LedgerLineId(2)], dec!(50));

        let log = db.into_transaction_log();
        assert_eq!(log.len(), 1);
    }

    #[tokio::test]
    async fn test_running_totals_coerce_float() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([[BTreeMap::from([
                ("id", Value::from(1_i64)),
                (RUNNING_ALIAS, Value::Double(Some(12.5))),
                (PARTY_RUNNING_ALIAS, Value::Double(None)),
            ])]])
            .into_connection();
        let lines = vec![line(1, dec!(12.5), dec!(0))];
        let account = AccountId::from_uuid(Uuid::from_u128(1));
        let totals = running_totals(&db, account, lines[0].move_date, &lines)
            .await
            .unwrap();
        let totals = totals[&LedgerLineId(1)];
        assert_eq!(totals.all.into_decimal().unwrap(), dec!(12.5));
        assert_eq!(totals.party, AggregateAmount::Null);
    }

    #[tokio::test]
    async fn test_empty_lines_skip_storage() {
        // No query results are queued: any query would fail.
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        for strategy in [BalanceStrategy::PrefixScan, BalanceStrategy::PerLine] {
            let balances = compute_balances(&db, strategy, &request(), &[]).await.unwrap();
            assert!(balances.is_empty());
        }
    }

    #[test]
    fn test_line_row_rejects_unknown_kind() {
        let row = LineRow {
            id: 1,
            move_id: Uuid::nil(),
            account_id: Uuid::nil(),
            party_id: None,
            debit: dec!(1),
            credit: dec!(0),
            move_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            move_number: "/".to_string(),
            account_kind: "liability".to_string(),
        };
        assert!(LedgerLine::try_from(row).is_err());
    }

    #[test]
    fn test_listing_orders_all_keys_one_way() {
        let view = StatementView::new(&[], PageRequest::new(2, 25));
        let query = order_lines(line_columns(statement_lines_query(&request())), view.order);
        let sql = query.build(DatabaseBackend::Postgres).to_string();
        assert!(sql.contains(
            r#"ORDER BY "moves"."date" DESC, "moves"."number" DESC, "move_lines"."id" DESC"#
        ));
        assert_eq!(view.page.offset(), 25);
    }
}
