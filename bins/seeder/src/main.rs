//! Database seeder for Ledgerview development.
//!
//! Seeds two fiscal years with quarterly periods, a small chart of accounts,
//! two parties and a handful of posted and draft moves, so every statement
//! route has something to show.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::{Datelike, NaiveDate, Utc};
use ledgerview_db::entities::{
    accounts, fiscal_years, move_lines, moves, parties, periods,
    sea_orm_active_enums::AccountKind,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

const ASSETS: Uuid = Uuid::from_u128(0x1000);
const RECEIVABLE: Uuid = Uuid::from_u128(0x1100);
const PAYABLE: Uuid = Uuid::from_u128(0x2100);
const REVENUE: Uuid = Uuid::from_u128(0x4000);
const EXPENSE: Uuid = Uuid::from_u128(0x5000);

const ACME: Uuid = Uuid::from_u128(0xA001);
const GLOBEX: Uuid = Uuid::from_u128(0xA002);

/// A balanced two-line move: `amount` debited on one account, credited on another.
struct SeedMove {
    date: NaiveDate,
    number: &'static str,
    debit_account: Uuid,
    credit_account: Uuid,
    party: Option<Uuid>,
    amount: Decimal,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    println!("Connecting to database...");
    let db = ledgerview_db::connect(&database_url).await?;

    if accounts::Entity::find_by_id(RECEIVABLE).one(&db).await?.is_some() {
        println!("Seed data already present, skipping...");
        return Ok(());
    }

    let year = Utc::now().year();

    println!("Seeding fiscal years...");
    let mut quarters = Vec::new();
    for fy in [year - 1, year] {
        quarters.extend(seed_fiscal_year(&db, fy).await?);
    }

    println!("Seeding accounts...");
    seed_accounts(&db).await?;

    println!("Seeding parties...");
    seed_party(&db, ACME, "Acme Corp").await?;
    seed_party(&db, GLOBEX, "Globex").await?;

    println!("Seeding moves...");
    let date = |y: i32, m: u32, d: u32| NaiveDate::from_ymd_opt(y, m, d).context("invalid seed date");
    let seeds = [
        SeedMove {
            date: date(year - 1, 12, 15)?,
            number: "INV/0099",
            debit_account: RECEIVABLE,
            credit_account: REVENUE,
            party: Some(ACME),
            amount: dec!(500.00),
        },
        SeedMove {
            date: date(year, 1, 10)?,
            number: "INV/0100",
            debit_account: RECEIVABLE,
            credit_account: REVENUE,
            party: Some(ACME),
            amount: dec!(1200.00),
        },
        SeedMove {
            date: date(year, 1, 10)?,
            number: "INV/0101",
            debit_account: RECEIVABLE,
            credit_account: REVENUE,
            party: Some(GLOBEX),
            amount: dec!(350.50),
        },
        SeedMove {
            date: date(year, 2, 3)?,
            number: "PAY/0001",
            debit_account: ASSETS,
            credit_account: RECEIVABLE,
            party: Some(ACME),
            amount: dec!(700.00),
        },
        SeedMove {
            date: date(year, 2, 20)?,
            number: "BILL/0001",
            debit_account: EXPENSE,
            credit_account: PAYABLE,
            party: Some(GLOBEX),
            amount: dec!(89.99),
        },
        SeedMove {
            date: date(year, 3, 1)?,
            number: "/",
            debit_account: RECEIVABLE,
            credit_account: REVENUE,
            party: Some(GLOBEX),
            amount: dec!(42.00),
        },
    ];

    for seed in &seeds {
        let period_id = quarters
            .iter()
            .find(|(start, end, _)| *start <= seed.date && seed.date <= *end)
            .map(|(_, _, id)| *id)
            .context("no period for seed move")?;
        seed_move(&db, period_id, seed).await?;
        println!("  Posted {} on {}", seed.number, seed.date);
    }

    println!("Seeding complete!");
    Ok(())
}

/// Seeds one calendar fiscal year with four quarterly periods.
async fn seed_fiscal_year(
    db: &DatabaseConnection,
    year: i32,
) -> anyhow::Result<Vec<(NaiveDate, NaiveDate, Uuid)>> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1).context("invalid year")?;
    let end = NaiveDate::from_ymd_opt(year, 12, 31).context("invalid year")?;
    let fy = fiscal_years::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(format!("FY{year}")),
        start_date: Set(start),
        end_date: Set(end),
    }
    .insert(db)
    .await?;

    let mut quarters = Vec::with_capacity(4);
    for (q, (first_month, last_month, last_day)) in
        [(1, 3, 31), (4, 6, 30), (7, 9, 30), (10, 12, 31)].into_iter().enumerate()
    {
        let q_start = NaiveDate::from_ymd_opt(year, first_month, 1).context("invalid quarter")?;
        let q_end = NaiveDate::from_ymd_opt(year, last_month, last_day).context("invalid quarter")?;
        let period = periods::ActiveModel {
            id: Set(Uuid::new_v4()),
            fiscal_year_id: Set(fy.id),
            name: Set(format!("{year}-Q{}", q + 1)),
            start_date: Set(q_start),
            end_date: Set(q_end),
        }
        .insert(db)
        .await?;
        quarters.push((q_start, q_end, period.id));
    }

    println!("  Created fiscal year FY{year}");
    Ok(quarters)
}

async fn seed_accounts(db: &DatabaseConnection) -> anyhow::Result<()> {
    let chart = [
        (ASSETS, "1000", "Cash and Bank", AccountKind::Other),
        (RECEIVABLE, "1100", "Accounts Receivable", AccountKind::Receivable),
        (PAYABLE, "2100", "Accounts Payable", AccountKind::Payable),
        (REVENUE, "4000", "Sales", AccountKind::Revenue),
        (EXPENSE, "5000", "Office Supplies", AccountKind::Expense),
        (Uuid::from_u128(0x9000), "9", "Balance Sheet", AccountKind::View),
    ];

    for (id, code, name, kind) in chart {
        accounts::ActiveModel {
            id: Set(id),
            code: Set(Some(code.to_string())),
            name: Set(name.to_string()),
            kind: Set(kind),
        }
        .insert(db)
        .await?;
        println!("  Created account {code} - {name}");
    }
    Ok(())
}

async fn seed_party(db: &DatabaseConnection, id: Uuid, name: &str) -> anyhow::Result<()> {
    parties::ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
        account_receivable_id: Set(Some(RECEIVABLE)),
        account_payable_id: Set(Some(PAYABLE)),
    }
    .insert(db)
    .await?;
    println!("  Created party {name}");
    Ok(())
}

async fn seed_move(db: &DatabaseConnection, period_id: Uuid, seed: &SeedMove) -> anyhow::Result<()> {
    let mv = moves::ActiveModel {
        id: Set(Uuid::new_v4()),
        period_id: Set(period_id),
        date: Set(seed.date),
        number: Set(seed.number.to_string()),
    }
    .insert(db)
    .await?;

    for (account, debit, credit) in [
        (seed.debit_account, seed.amount, Decimal::ZERO),
        (seed.credit_account, Decimal::ZERO, seed.amount),
    ] {
        move_lines::ActiveModel {
            move_id: Set(mv.id),
            account_id: Set(account),
            party_id: Set(seed.party),
            debit: Set(debit),
            credit: Set(credit),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }
    Ok(())
}
