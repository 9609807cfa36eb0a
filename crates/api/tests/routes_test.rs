//! Router tests driven through `tower::ServiceExt::oneshot`.
//!
//! Storage is a `SeaORM` mock, so queued results must match the order in which
//! the handler issues its queries.

use std::collections::BTreeMap;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use ledgerview_api::{AppState, create_router};
use ledgerview_db::entities::{accounts, fiscal_years, parties, sea_orm_active_enums::AccountKind};
use ledgerview_shared::config::StatementConfig;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, Value};
use serde_json::Value as Json;
use tower::ServiceExt;
use uuid::Uuid;

const ACCOUNT: Uuid = Uuid::from_u128(0x1200);
const FISCAL_YEAR: Uuid = Uuid::from_u128(0x2024);
const PARTY: Uuid = Uuid::from_u128(0xA001);

fn app(db: DatabaseConnection) -> Router {
    create_router(AppState::new(db, StatementConfig::default()))
}

fn empty_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres).into_connection()
}

async fn get(app: Router, uri: &str) -> (StatusCode, Json) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Json::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn line_row(
    id: i64,
    day: u32,
    number: &str,
    debit: Decimal,
    credit: Decimal,
) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([
        ("id", Value::from(id)),
        ("move_id", Value::from(Uuid::from_u128(u128::from(day)))),
        ("account_id", Value::from(ACCOUNT)),
        ("party_id", Value::from(None::<Uuid>)),
        ("debit", Value::from(debit)),
        ("credit", Value::from(credit)),
        (
            "move_date",
            Value::from(NaiveDate::from_ymd_opt(2024, 1, day).unwrap()),
        ),
        ("move_number", Value::from(number)),
        ("account_kind", Value::from("receivable")),
    ])
}

fn running_row(id: i64, running: Decimal, party_running: Decimal) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([
        ("id", Value::from(id)),
        ("running", Value::from(running)),
        ("party_running", Value::from(party_running)),
    ])
}

fn customers() -> accounts::Model {
    accounts::Model {
        id: ACCOUNT,
        code: Some("1200".to_string()),
        name: "Customers".to_string(),
        kind: AccountKind::Receivable,
    }
}

fn fiscal_year(start_year: i32, end_year: i32) -> fiscal_years::Model {
    fiscal_years::Model {
        id: FISCAL_YEAR,
        name: "FY".to_string(),
        start_date: NaiveDate::from_ymd_opt(start_year, 1, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(end_year, 12, 31).unwrap(),
    }
}

fn acme(receivable: Option<Uuid>, payable: Option<Uuid>) -> parties::Model {
    parties::Model {
        id: PARTY,
        name: "Acme".to_string(),
        account_receivable_id: receivable,
        account_payable_id: payable,
    }
}

fn count_row(total: i64) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([("num_items", Value::BigInt(Some(total)))])
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get(app(empty_db()), "/api/v1/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_invalid_order_is_rejected() {
    let uri = format!(
        "/api/v1/statements?fiscalyear_id={FISCAL_YEAR}&account_id={ACCOUNT}&order=date:sideways"
    );
    let (status, body) = get(app(empty_db()), &uri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_missing_account_is_rejected() {
    let uri = format!("/api/v1/statements?fiscalyear_id={FISCAL_YEAR}");
    let (status, body) = get(app(empty_db()), &uri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_statement_in_ascending_order() {
    let lines = vec![
        line_row(2, 2, "2024/0002", dec!(0), dec!(40)),
        line_row(1, 1, "2024/0001", dec!(100), dec!(0)),
    ];
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![customers()]])
        .append_query_results([vec![fiscal_year(2024, 2024)]])
        .append_query_results([vec![count_row(2)]])
        .append_query_results([lines])
        .append_query_results([vec![
            running_row(2, dec!(60), dec!(60)),
            running_row(1, dec!(100), dec!(100)),
        ]])
        .into_connection();

    let uri = format!(
        "/api/v1/statements?fiscalyear_id={FISCAL_YEAR}&account_id={ACCOUNT}&order=date:asc"
    );
    let (status, body) = get(app(db), &uri).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["title"], "1200 - Customers");
    assert_eq!(body["action_name"], "Statement of Account: 1200 - Customers");
    assert_eq!(body["direction"], "ascending");
    assert_eq!(body["rows"][0]["id"], 1);
    assert_eq!(body["rows"][0]["balance"], "100.00");
    assert_eq!(body["rows"][1]["id"], 2);
    assert_eq!(body["rows"][1]["balance"], "60.00");
    assert_eq!(body["pagination"]["total"], 2);
}

#[tokio::test]
async fn test_receivable_statement_uses_party_account_without_selecting_party() {
    let lines = vec![
        line_row(2, 2, "2024/0002", dec!(0), dec!(40)),
        line_row(1, 1, "2024/0001", dec!(100), dec!(0)),
    ];
    // Party sums differ from the account-wide ones: only the latter may show.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![acme(Some(ACCOUNT), None)]])
        .append_query_results([vec![fiscal_year(2000, 2099)]])
        .append_query_results([vec![customers()]])
        .append_query_results([vec![fiscal_year(2000, 2099)]])
        .append_query_results([vec![count_row(2)]])
        .append_query_results([lines])
        .append_query_results([vec![
            running_row(2, dec!(60), dec!(-1)),
            running_row(1, dec!(100), dec!(-1)),
        ]])
        .into_connection();

    let uri = format!("/api/v1/parties/{PARTY}/statements/receivable");
    let (status, body) = get(app(db), &uri).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["title"], "1200 - Customers");
    assert_eq!(body["direction"], "descending");
    assert_eq!(body["rows"][0]["id"], 2);
    assert_eq!(body["rows"][0]["balance"], "60.00");
    assert_eq!(body["rows"][1]["id"], 1);
    assert_eq!(body["rows"][1]["balance"], "100.00");
}

#[tokio::test]
async fn test_unknown_party_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<parties::Model>::new()])
        .into_connection();
    let uri = format!("/api/v1/parties/{PARTY}/statements/receivable?fiscalyear_id={FISCAL_YEAR}");
    let (status, body) = get(app(db), &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_payable_statement_requires_payable_account() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![acme(Some(ACCOUNT), None)]])
        .into_connection();
    let uri = format!("/api/v1/parties/{PARTY}/statements/payable?fiscalyear_id={FISCAL_YEAR}");
    let (status, body) = get(app(db), &uri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert_eq!(body["message"], "An account is required");
}

#[tokio::test]
async fn test_unknown_account_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<accounts::Model>::new()])
        .into_connection();
    let uri = format!("/api/v1/statements?fiscalyear_id={FISCAL_YEAR}&account_id={ACCOUNT}");
    let (status, body) = get(app(db), &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}
