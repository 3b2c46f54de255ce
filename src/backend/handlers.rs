use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::backend::{ApiError, ApiResult, AppState};
use crate::budget::{allocate, WeekAllocation, WEEKS_PER_MONTH};
use crate::database::db::queries;
use crate::database::models::{totals_by_week, ExpenseStatus, FixedExpense, WeeklyExpense};

#[derive(Debug, Serialize, Deserialize)]
pub struct IncomeDto {
    pub total_income: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct FixedExpenseForm {
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub notes: Option<String>,
    #[serde(default)]
    pub status: ExpenseStatus,
}

#[derive(Debug, Deserialize)]
pub struct WeeklyExpenseForm {
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct DeletedDto {
    pub deleted: u64,
}

/*==========Income config===========*/

pub async fn get_income(State(state): State<AppState>) -> ApiResult<Json<IncomeDto>> {
    let total_income = queries::get_total_income(&state.db).await?;
    Ok(Json(IncomeDto { total_income }))
}

pub async fn set_income(
    State(state): State<AppState>,
    Json(body): Json<IncomeDto>,
) -> ApiResult<Json<IncomeDto>> {
    if body.total_income < Decimal::ZERO {
        return Err(ApiError::Validation(
            "total_income must not be negative".into(),
        ));
    }

    let total_income = queries::set_total_income(&state.db, body.total_income).await?;
    info!(%total_income, "income updated");
    Ok(Json(IncomeDto { total_income }))
}

/*==========Fixed expenses===========*/

pub async fn list_fixed(State(state): State<AppState>) -> ApiResult<Json<Vec<FixedExpense>>> {
    Ok(Json(queries::list_fixed_expenses(&state.db).await?))
}

pub async fn create_fixed(
    State(state): State<AppState>,
    Json(form): Json<FixedExpenseForm>,
) -> ApiResult<(StatusCode, Json<FixedExpense>)> {
    validate_expense(&form.description, form.amount)?;

    let expense = queries::create_fixed_expense(
        &state.db,
        form.description.trim(),
        form.amount,
        form.date,
        form.notes.as_deref(),
        form.status,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(expense)))
}

pub async fn update_fixed(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(form): Json<FixedExpenseForm>,
) -> ApiResult<Json<FixedExpense>> {
    validate_expense(&form.description, form.amount)?;

    let updated = queries::update_fixed_expense(
        &state.db,
        id,
        form.description.trim(),
        form.amount,
        form.date,
        form.notes.as_deref(),
        form.status,
    )
    .await?;

    updated.map(Json).ok_or(ApiError::NotFound("fixed expense"))
}

pub async fn delete_fixed(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    if queries::delete_fixed_expense(&state.db, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("fixed expense"))
    }
}

/*==========Weekly expenses===========*/

pub async fn list_weekly(
    State(state): State<AppState>,
) -> ApiResult<Json<BTreeMap<u8, Vec<WeeklyExpense>>>> {
    Ok(Json(queries::list_weekly_expenses(&state.db).await?))
}

pub async fn create_weekly(
    State(state): State<AppState>,
    Path(week): Path<u8>,
    Json(form): Json<WeeklyExpenseForm>,
) -> ApiResult<(StatusCode, Json<WeeklyExpense>)> {
    validate_week(week)?;
    validate_expense(&form.description, form.amount)?;

    let expense = queries::create_weekly_expense(
        &state.db,
        week,
        form.description.trim(),
        form.amount,
        form.date,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(expense)))
}

pub async fn delete_weekly_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    if queries::delete_weekly_expense(&state.db, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("weekly expense"))
    }
}

pub async fn clear_week(
    State(state): State<AppState>,
    Path(week): Path<u8>,
) -> ApiResult<Json<DeletedDto>> {
    validate_week(week)?;

    let deleted = queries::clear_week(&state.db, week).await?;
    info!(week, deleted, "week cleared");
    Ok(Json(DeletedDto { deleted }))
}

pub async fn clear_all(State(state): State<AppState>) -> ApiResult<Json<DeletedDto>> {
    let deleted = queries::clear_all_weeks(&state.db).await?;
    info!(deleted, "all weekly expenses cleared");
    Ok(Json(DeletedDto { deleted }))
}

/*==========Allocation===========*/

// Recomputed from the store on every request; nothing derived is persisted.
pub async fn allocations(
    State(state): State<AppState>,
) -> ApiResult<Json<[WeekAllocation; WEEKS_PER_MONTH]>> {
    let total_income = queries::get_total_income(&state.db).await?;
    let total_fixed = queries::total_fixed_expenses(&state.db).await?;
    let grouped = queries::list_weekly_expenses(&state.db).await?;

    let spending = totals_by_week(&grouped);
    let weeks = allocate(total_income, total_fixed, &spending)?;
    Ok(Json(weeks))
}

/*==========Boundary validation===========*/

fn validate_expense(description: &str, amount: Decimal) -> Result<(), ApiError> {
    if description.trim().is_empty() {
        return Err(ApiError::Validation("description must not be empty".into()));
    }
    if amount <= Decimal::ZERO {
        return Err(ApiError::Validation(
            "amount must be greater than zero".into(),
        ));
    }
    Ok(())
}

fn validate_week(week: u8) -> Result<(), ApiError> {
    if !(1..=WEEKS_PER_MONTH as u8).contains(&week) {
        return Err(ApiError::Validation(format!(
            "week must be between 1 and {WEEKS_PER_MONTH}"
        )));
    }
    Ok(())
}
