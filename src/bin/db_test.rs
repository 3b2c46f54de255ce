use dotenvy::dotenv;
use home_budget::budget::money::format_currency;
use home_budget::budget::{allocate, WEEKS_PER_MONTH};
use home_budget::database::db::connection::get_db_pool;
use home_budget::database::db::queries;
use home_budget::database::models::{totals_by_week, ExpenseStatus};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    /* ==========Smoke test over a real database========== */
    let pool = get_db_pool().await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    println!("Migrations ran successfully!");

    // Start from a clean slate so the counts below are deterministic.
    let removed = queries::clear_all_weeks(&pool).await?;
    println!("Cleared {} leftover weekly expense(s)", removed);
    for e in queries::list_fixed_expenses(&pool).await? {
        queries::delete_fixed_expense(&pool, e.id).await?;
    }

    // ----------------------------------------------------
    // TEST: INCOME CONFIG
    // ----------------------------------------------------
    println!("\n--- Testing: set_total_income ---");
    let income = Decimal::from_str("2000").unwrap();
    let stored = queries::set_total_income(&pool, income).await?;
    println!("   > Income stored: {}", format_currency(stored));
    assert_eq!(stored, income, "stored income does not match");

    let fetched = queries::get_total_income(&pool).await?;
    assert_eq!(fetched, income, "fetched income does not match");

    // ----------------------------------------------------
    // TEST: FIXED EXPENSES
    // ----------------------------------------------------
    println!("\n--- Testing: create_fixed_expense ---");
    let date = NaiveDate::parse_from_str("2026-08-01", "%Y-%m-%d").unwrap();
    let rent = queries::create_fixed_expense(
        &pool,
        "Rent",
        Decimal::from_str("400").unwrap(),
        date,
        Some("due on the 1st"),
        ExpenseStatus::Pending,
    )
    .await?;
    println!("   > Fixed expense created, ID: {}", rent.id);
    assert!(rent.id > 0, "Failed to create fixed expense, ID invalid.");

    println!("\n--- Testing: total_fixed_expenses ---");
    let total_fixed = queries::total_fixed_expenses(&pool).await?;
    println!("   > Fixed total: {}", format_currency(total_fixed));
    assert_eq!(total_fixed, Decimal::from_str("400").unwrap());

    println!("\n--- Testing: update_fixed_expense (mark paid) ---");
    let paid = queries::update_fixed_expense(
        &pool,
        rent.id,
        &rent.description,
        rent.amount,
        rent.date,
        rent.notes.as_deref(),
        ExpenseStatus::Paid,
    )
    .await?
    .expect("expense should exist");
    println!("   > Status now: {:?}", paid.status);
    assert_eq!(paid.status, ExpenseStatus::Paid);

    // ----------------------------------------------------
    // TEST: WEEKLY EXPENSES
    // ----------------------------------------------------
    println!("\n--- Testing: create_weekly_expense ---");
    queries::create_weekly_expense(
        &pool,
        1,
        "Groceries",
        Decimal::from_str("300").unwrap(),
        date,
    )
    .await?;
    queries::create_weekly_expense(
        &pool,
        2,
        "Car service",
        Decimal::from_str("500").unwrap(),
        date,
    )
    .await?;

    let grouped = queries::list_weekly_expenses(&pool).await?;
    println!("   > Weeks in map: {:?}", grouped.keys().collect::<Vec<_>>());
    assert_eq!(grouped.len(), WEEKS_PER_MONTH, "all four weeks must be present");
    assert_eq!(grouped[&1].len(), 1);
    assert_eq!(grouped[&2].len(), 1);

    // ----------------------------------------------------
    // TEST: ALLOCATION OVER LIVE DATA
    // ----------------------------------------------------
    println!("\n--- Testing: allocate over the store ---");
    let spending = totals_by_week(&grouped);
    let weeks = allocate(fetched, total_fixed, &spending)?;
    for w in &weeks {
        println!(
            "   > Week {}: effective {}, spent {}, available {}, carries {}",
            w.week,
            format_currency(w.effective_allocation),
            format_currency(w.spent),
            format_currency(w.available),
            format_currency(w.deficit_carried_to_next),
        );
    }
    assert_eq!(weeks[0].available, Decimal::from_str("100").unwrap());
    assert_eq!(weeks[1].deficit_carried_to_next, Decimal::from_str("100").unwrap());
    assert_eq!(weeks[2].effective_allocation, Decimal::from_str("300").unwrap());
    assert_eq!(weeks[3].available, Decimal::from_str("400").unwrap());

    // ----------------------------------------------------
    // TEST: CLEANUP PATHS
    // ----------------------------------------------------
    println!("\n--- Testing: clear_week / delete_fixed_expense ---");
    let cleared = queries::clear_week(&pool, 2).await?;
    assert_eq!(cleared, 1, "week 2 held exactly one expense");

    let deleted = queries::delete_fixed_expense(&pool, rent.id).await?;
    assert!(deleted, "Failed to delete fixed expense!");

    println!("\n--- All checks passed! ---");
    Ok(())
}
