use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite};

use crate::budget::WEEKS_PER_MONTH;
use crate::database::models::{ExpenseStatus, FixedExpense, WeeklyExpense};

/*
Single-statement CRUD against the budget store. Amounts live in TEXT columns
and are decoded to Decimal on the way out; each operation is one statement,
so SQLite's per-statement atomicity is all the transactional guarantee here.
 */

/*==========Config (total income)===========*/

pub async fn get_total_income(pool: &Pool<Sqlite>) -> Result<Decimal, sqlx::Error> {
    let stored: Option<String> = sqlx::query_scalar("SELECT total_income FROM config WHERE id = 1")
        .fetch_optional(pool)
        .await?;

    match stored {
        Some(s) => decode_amount(&s),
        None => Ok(Decimal::ZERO),
    }
}

// Echoes the stored value back so callers render exactly what was persisted.
pub async fn set_total_income(
    pool: &Pool<Sqlite>,
    value: Decimal,
) -> Result<Decimal, sqlx::Error> {
    let stored: String = sqlx::query_scalar(
        "UPDATE config SET total_income = ? WHERE id = 1 RETURNING total_income",
    )
    .bind(value.to_string())
    .fetch_one(pool)
    .await?;

    decode_amount(&stored)
}

/*==========Fixed expense queries===========*/

// Newest first, matching the display order.
pub async fn list_fixed_expenses(pool: &Pool<Sqlite>) -> Result<Vec<FixedExpense>, sqlx::Error> {
    sqlx::query(
        r#"
        SELECT id, description, amount, date, notes, status
        FROM fixed_expenses
        ORDER BY id DESC
        "#,
    )
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(map_fixed_expense)
    .collect()
}

// Summed in Rust so the TEXT amounts never go through float arithmetic.
pub async fn total_fixed_expenses(pool: &Pool<Sqlite>) -> Result<Decimal, sqlx::Error> {
    let amounts: Vec<String> = sqlx::query_scalar("SELECT amount FROM fixed_expenses")
        .fetch_all(pool)
        .await?;

    let mut total = Decimal::ZERO;
    for s in &amounts {
        total += decode_amount(s)?;
    }
    Ok(total)
}

pub async fn create_fixed_expense(
    pool: &Pool<Sqlite>,
    description: &str,
    amount: Decimal,
    date: NaiveDate,
    notes: Option<&str>,
    status: ExpenseStatus,
) -> Result<FixedExpense, sqlx::Error> {
    let row = sqlx::query(
        r#"
        INSERT INTO fixed_expenses (description, amount, date, notes, status)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id, description, amount, date, notes, status
        "#,
    )
    .bind(description)
    .bind(amount.to_string())
    .bind(date.format("%Y-%m-%d").to_string())
    .bind(notes)
    .bind(status.as_str())
    .fetch_one(pool)
    .await?;

    map_fixed_expense(row)
}

// Ok(None) when the id does not exist.
pub async fn update_fixed_expense(
    pool: &Pool<Sqlite>,
    id: i64,
    description: &str,
    amount: Decimal,
    date: NaiveDate,
    notes: Option<&str>,
    status: ExpenseStatus,
) -> Result<Option<FixedExpense>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        UPDATE fixed_expenses
        SET description = ?, amount = ?, date = ?, notes = ?, status = ?
        WHERE id = ?
        RETURNING id, description, amount, date, notes, status
        "#,
    )
    .bind(description)
    .bind(amount.to_string())
    .bind(date.format("%Y-%m-%d").to_string())
    .bind(notes)
    .bind(status.as_str())
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(map_fixed_expense).transpose()
}

pub async fn delete_fixed_expense(pool: &Pool<Sqlite>, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM fixed_expenses WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/*==========Weekly expense queries===========*/

// Grouped by week; every week 1..=4 is present in the map even when empty.
pub async fn list_weekly_expenses(
    pool: &Pool<Sqlite>,
) -> Result<BTreeMap<u8, Vec<WeeklyExpense>>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, week, description, amount, date
        FROM weekly_expenses
        ORDER BY week ASC, id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut grouped: BTreeMap<u8, Vec<WeeklyExpense>> = BTreeMap::new();
    for week in 1..=WEEKS_PER_MONTH as u8 {
        grouped.insert(week, Vec::new());
    }
    for row in rows {
        let expense = map_weekly_expense(row)?;
        grouped.entry(expense.week).or_default().push(expense);
    }
    Ok(grouped)
}

pub async fn create_weekly_expense(
    pool: &Pool<Sqlite>,
    week: u8,
    description: &str,
    amount: Decimal,
    date: NaiveDate,
) -> Result<WeeklyExpense, sqlx::Error> {
    let row = sqlx::query(
        r#"
        INSERT INTO weekly_expenses (week, description, amount, date)
        VALUES (?, ?, ?, ?)
        RETURNING id, week, description, amount, date
        "#,
    )
    .bind(i64::from(week))
    .bind(description)
    .bind(amount.to_string())
    .bind(date.format("%Y-%m-%d").to_string())
    .fetch_one(pool)
    .await?;

    map_weekly_expense(row)
}

pub async fn delete_weekly_expense(pool: &Pool<Sqlite>, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM weekly_expenses WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn clear_week(pool: &Pool<Sqlite>, week: u8) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM weekly_expenses WHERE week = ?")
        .bind(i64::from(week))
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

pub async fn clear_all_weeks(pool: &Pool<Sqlite>) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM weekly_expenses")
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/*==========Row mapping helpers===========*/

fn map_fixed_expense(row: SqliteRow) -> Result<FixedExpense, sqlx::Error> {
    let amount_text: String = row.try_get("amount")?;
    let date_text: String = row.try_get("date")?;
    let status_text: String = row.try_get("status")?;

    Ok(FixedExpense {
        id: row.try_get("id")?,
        description: row.try_get("description")?,
        amount: decode_amount(&amount_text)?,
        date: decode_date(&date_text)?,
        notes: row.try_get("notes")?,
        status: ExpenseStatus::parse(&status_text),
    })
}

fn map_weekly_expense(row: SqliteRow) -> Result<WeeklyExpense, sqlx::Error> {
    let week: i64 = row.try_get("week")?;
    let amount_text: String = row.try_get("amount")?;
    let date_text: String = row.try_get("date")?;

    Ok(WeeklyExpense {
        id: row.try_get("id")?,
        week: week as u8,
        description: row.try_get("description")?,
        amount: decode_amount(&amount_text)?,
        date: decode_date(&date_text)?,
    })
}

fn decode_amount(s: &str) -> Result<Decimal, sqlx::Error> {
    Decimal::from_str_exact(s)
        .map_err(|e| sqlx::Error::Decode(format!("Invalid Decimal format for amount: {}", e).into()))
}

fn decode_date(s: &str) -> Result<NaiveDate, sqlx::Error> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| sqlx::Error::Decode(format!("Invalid date format: {}", e).into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;
    use std::str::FromStr;

    // One connection keeps every statement on the same :memory: database.
    async fn test_pool() -> Pool<Sqlite> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        pool
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[tokio::test]
    async fn income_starts_at_zero_and_echoes_updates() {
        let pool = test_pool().await;

        assert_eq!(get_total_income(&pool).await.unwrap(), Decimal::ZERO);

        let stored = set_total_income(&pool, dec("2500.50")).await.unwrap();
        assert_eq!(stored, dec("2500.50"));
        assert_eq!(get_total_income(&pool).await.unwrap(), dec("2500.50"));

        // resettable to zero, never deleted
        assert_eq!(set_total_income(&pool, Decimal::ZERO).await.unwrap(), Decimal::ZERO);
    }

    #[tokio::test]
    async fn fixed_expense_crud() {
        let pool = test_pool().await;

        let rent = create_fixed_expense(
            &pool,
            "Rent",
            dec("800"),
            date("2026-08-01"),
            Some("due on the 1st"),
            ExpenseStatus::Pending,
        )
        .await
        .unwrap();
        let power = create_fixed_expense(
            &pool,
            "Power",
            dec("120.35"),
            date("2026-08-05"),
            None,
            ExpenseStatus::Paid,
        )
        .await
        .unwrap();

        let listed = list_fixed_expenses(&pool).await.unwrap();
        assert_eq!(listed.len(), 2);
        // newest first
        assert_eq!(listed[0].id, power.id);
        assert_eq!(listed[1].description, "Rent");
        assert_eq!(listed[1].notes.as_deref(), Some("due on the 1st"));

        assert_eq!(total_fixed_expenses(&pool).await.unwrap(), dec("920.35"));

        let updated = update_fixed_expense(
            &pool,
            rent.id,
            "Rent",
            dec("850"),
            rent.date,
            rent.notes.as_deref(),
            ExpenseStatus::Paid,
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(updated.amount, dec("850"));
        assert_eq!(updated.status, ExpenseStatus::Paid);

        assert!(update_fixed_expense(
            &pool,
            9999,
            "ghost",
            dec("1"),
            date("2026-01-01"),
            None,
            ExpenseStatus::Pending,
        )
        .await
        .unwrap()
        .is_none());

        assert!(delete_fixed_expense(&pool, rent.id).await.unwrap());
        assert!(!delete_fixed_expense(&pool, rent.id).await.unwrap());
        assert_eq!(list_fixed_expenses(&pool).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn weekly_expenses_group_with_all_weeks_present() {
        let pool = test_pool().await;

        let empty = list_weekly_expenses(&pool).await.unwrap();
        assert_eq!(empty.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
        assert!(empty.values().all(Vec::is_empty));

        create_weekly_expense(&pool, 2, "Groceries", dec("85.20"), date("2026-08-10"))
            .await
            .unwrap();
        create_weekly_expense(&pool, 2, "Bus card", dec("14.80"), date("2026-08-11"))
            .await
            .unwrap();
        create_weekly_expense(&pool, 4, "Pharmacy", dec("30"), date("2026-08-25"))
            .await
            .unwrap();

        let grouped = list_weekly_expenses(&pool).await.unwrap();
        assert_eq!(grouped[&2].len(), 2);
        assert_eq!(grouped[&2][0].description, "Groceries");
        assert!(grouped[&1].is_empty());
        assert!(grouped[&3].is_empty());

        let totals = crate::database::models::totals_by_week(&grouped);
        assert_eq!(totals, [dec("0"), dec("100"), dec("0"), dec("30")]);
    }

    #[tokio::test]
    async fn clearing_weeks_reports_counts() {
        let pool = test_pool().await;

        let kept = create_weekly_expense(&pool, 1, "Coffee", dec("4.50"), date("2026-08-03"))
            .await
            .unwrap();
        create_weekly_expense(&pool, 3, "Takeaway", dec("22"), date("2026-08-18"))
            .await
            .unwrap();
        create_weekly_expense(&pool, 3, "Cinema", dec("18"), date("2026-08-19"))
            .await
            .unwrap();

        assert_eq!(clear_week(&pool, 3).await.unwrap(), 2);
        assert_eq!(clear_week(&pool, 3).await.unwrap(), 0);

        assert!(delete_weekly_expense(&pool, kept.id).await.unwrap());
        assert!(!delete_weekly_expense(&pool, kept.id).await.unwrap());

        create_weekly_expense(&pool, 1, "Coffee again", dec("4.50"), date("2026-08-20"))
            .await
            .unwrap();
        assert_eq!(clear_all_weeks(&pool).await.unwrap(), 1);
    }
}
