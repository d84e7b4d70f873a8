//! Income / expense service
//!
//! Every write refreshes the yearly rollup from the earliest year it
//! touched. Incomes mirrored from dues keep their period, member and
//! category; amount edits and deletes flow back into the dues month.

use shared::models::{
    DUES_CATEGORY, Expense, Income, IncomeSource, LedgerEntryCreate, LedgerEntryUpdate,
    LedgerFilter,
};
use sqlx::{SqliteConnection, SqlitePool};

use super::{begin, commit, ensure_member};
use crate::db::repository::{dues, expense, income};
use crate::ledger::dues::{follow_income_amount, revert_payment};
use crate::ledger::money::to_f64;
use crate::utils::time::owning_period;
use crate::utils::validation::{
    MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_positive_amount,
    validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Validated columns of a ledger entry
#[derive(Debug, Clone, PartialEq)]
struct EntryFields {
    date: String,
    year: i32,
    month: u32,
    category: String,
    amount: f64,
    note: Option<String>,
    member_id: Option<i64>,
}

fn clean_note(note: Option<String>) -> Option<String> {
    note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}

async fn check_member(conn: &mut SqliteConnection, member_id: Option<i64>) -> AppResult<()> {
    if let Some(id) = member_id {
        ensure_member(&mut *conn, id).await?;
    }
    Ok(())
}

async fn fields_for_create(
    conn: &mut SqliteConnection,
    data: LedgerEntryCreate,
) -> AppResult<EntryFields> {
    let (year, month) = owning_period(&data.date, data.year, data.month)?;
    validate_required_text(&data.category, "category", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&data.note, "note", MAX_NOTE_LEN)?;
    let amount = validate_positive_amount(data.amount, "amount")?;
    check_member(conn, data.member_id).await?;

    Ok(EntryFields {
        date: data.date.trim().to_string(),
        year,
        month,
        category: data.category.trim().to_string(),
        amount: to_f64(amount),
        note: clean_note(data.note),
        member_id: data.member_id,
    })
}

/// Merge an update into the current columns
///
/// A new date without an explicit year/month moves the entry to the date's
/// period. An empty note clears it.
async fn fields_for_update(
    conn: &mut SqliteConnection,
    current: EntryFields,
    data: LedgerEntryUpdate,
) -> AppResult<EntryFields> {
    let date = data
        .date
        .map(|d| d.trim().to_string())
        .unwrap_or_else(|| current.date.clone());
    let (year, month) = if date != current.date {
        owning_period(&date, data.year, data.month)?
    } else {
        owning_period(
            &date,
            Some(data.year.unwrap_or(current.year)),
            Some(data.month.unwrap_or(current.month)),
        )?
    };

    if let Some(category) = &data.category {
        validate_required_text(category, "category", MAX_SHORT_TEXT_LEN)?;
    }
    validate_optional_text(&data.note, "note", MAX_NOTE_LEN)?;
    let amount = match data.amount {
        Some(a) => to_f64(validate_positive_amount(a, "amount")?),
        None => current.amount,
    };
    if data.member_id.is_some() && data.member_id != current.member_id {
        check_member(conn, data.member_id).await?;
    }

    Ok(EntryFields {
        date,
        year,
        month,
        category: data
            .category
            .map(|c| c.trim().to_string())
            .unwrap_or(current.category),
        amount,
        note: match data.note {
            Some(note) => clean_note(Some(note)),
            None => current.note,
        },
        member_id: data.member_id.or(current.member_id),
    })
}

fn income_fields(i: &Income) -> EntryFields {
    EntryFields {
        date: i.date.clone(),
        year: i.year,
        month: i.month,
        category: i.category.clone(),
        amount: i.amount,
        note: i.note.clone(),
        member_id: i.member_id,
    }
}

fn expense_fields(e: &Expense) -> EntryFields {
    EntryFields {
        date: e.date.clone(),
        year: e.year,
        month: e.month,
        category: e.category.clone(),
        amount: e.amount,
        note: e.note.clone(),
        member_id: e.member_id,
    }
}

fn income_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::IncomeNotFound, format!("Income {id} not found"))
        .with_detail("income_id", id)
}

fn expense_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::ExpenseNotFound, format!("Expense {id} not found"))
        .with_detail("expense_id", id)
}

// ========== Incomes ==========

pub async fn list_incomes(pool: &SqlitePool, filter: &LedgerFilter) -> AppResult<Vec<Income>> {
    Ok(income::find_all(pool, filter).await?)
}

pub async fn get_income(pool: &SqlitePool, id: i64) -> AppResult<Income> {
    income::find_by_id(pool, id)
        .await?
        .ok_or_else(|| income_not_found(id))
}

/// Record a manual income
pub async fn create_income(pool: &SqlitePool, data: LedgerEntryCreate) -> AppResult<Income> {
    let mut tx = begin(pool).await?;
    let fields = fields_for_create(&mut tx, data).await?;
    let now = shared::util::now_millis();
    let entry = Income {
        id: shared::util::snowflake_id(),
        date: fields.date,
        year: fields.year,
        month: fields.month,
        category: fields.category,
        amount: fields.amount,
        note: fields.note,
        member_id: fields.member_id,
        source: IncomeSource::Manual,
        created_at: now,
        updated_at: now,
    };
    income::insert(&mut *tx, &entry).await?;
    super::yearly::refresh_from(&mut tx, entry.year).await?;
    commit(tx).await?;
    Ok(entry)
}

/// Edit an income
pub async fn update_income(
    pool: &SqlitePool,
    id: i64,
    mut data: LedgerEntryUpdate,
) -> AppResult<Income> {
    let mut tx = begin(pool).await?;
    let existing = income::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| income_not_found(id))?;
    let current = income_fields(&existing);
    if existing.source == IncomeSource::Dues {
        // the payment date may move, the owning period stays
        data.year = data.year.or(Some(existing.year));
        data.month = data.month.or(Some(existing.month));
    }
    let fields = fields_for_update(&mut tx, current.clone(), data).await?;

    if existing.source == IncomeSource::Dues {
        let locked = fields.year != current.year
            || fields.month != current.month
            || fields.member_id != current.member_id
            || fields.category != DUES_CATEGORY;
        if locked {
            return Err(AppError::with_message(
                ErrorCode::DuesIncomeLocked,
                "Period, member and category of a dues income follow the dues record",
            )
            .with_detail("income_id", id));
        }
        if fields.amount != current.amount
            && let Some(mut record) = dues::find_by_income(&mut *tx, existing.year, id).await?
            && follow_income_amount(&mut record, id, fields.amount).is_some()
        {
            dues::upsert(&mut *tx, &mut record).await?;
        }
    }

    let updated = Income {
        date: fields.date,
        year: fields.year,
        month: fields.month,
        category: fields.category,
        amount: fields.amount,
        note: fields.note,
        member_id: fields.member_id,
        updated_at: shared::util::now_millis(),
        ..existing
    };
    income::update(&mut *tx, &updated).await?;
    super::yearly::refresh_from(&mut tx, current.year.min(updated.year)).await?;
    commit(tx).await?;
    Ok(updated)
}

/// Delete an income; a dues income reopens its month
pub async fn delete_income(pool: &SqlitePool, id: i64) -> AppResult<Income> {
    let mut tx = begin(pool).await?;
    let existing = income::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| income_not_found(id))?;

    if existing.source == IncomeSource::Dues
        && let Some(mut record) = dues::find_by_income(&mut *tx, existing.year, id).await?
        && let Some(month) = revert_payment(&mut record, id)
    {
        dues::upsert(&mut *tx, &mut record).await?;
        tracing::info!(
            income_id = id,
            member_id = record.member_id,
            year = record.year,
            month,
            "Dues month reopened by income delete"
        );
    }

    income::delete(&mut *tx, id).await?;
    super::yearly::refresh_from(&mut tx, existing.year).await?;
    commit(tx).await?;
    Ok(existing)
}

// ========== Expenses ==========

pub async fn list_expenses(pool: &SqlitePool, filter: &LedgerFilter) -> AppResult<Vec<Expense>> {
    Ok(expense::find_all(pool, filter).await?)
}

pub async fn get_expense(pool: &SqlitePool, id: i64) -> AppResult<Expense> {
    expense::find_by_id(pool, id)
        .await?
        .ok_or_else(|| expense_not_found(id))
}

pub async fn create_expense(pool: &SqlitePool, data: LedgerEntryCreate) -> AppResult<Expense> {
    let mut tx = begin(pool).await?;
    let fields = fields_for_create(&mut tx, data).await?;
    let now = shared::util::now_millis();
    let entry = Expense {
        id: shared::util::snowflake_id(),
        date: fields.date,
        year: fields.year,
        month: fields.month,
        category: fields.category,
        amount: fields.amount,
        note: fields.note,
        member_id: fields.member_id,
        created_at: now,
        updated_at: now,
    };
    expense::insert(&mut *tx, &entry).await?;
    super::yearly::refresh_from(&mut tx, entry.year).await?;
    commit(tx).await?;
    Ok(entry)
}

pub async fn update_expense(
    pool: &SqlitePool,
    id: i64,
    data: LedgerEntryUpdate,
) -> AppResult<Expense> {
    let mut tx = begin(pool).await?;
    let existing = expense::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| expense_not_found(id))?;
    let old_year = existing.year;
    let fields = fields_for_update(&mut tx, expense_fields(&existing), data).await?;

    let updated = Expense {
        date: fields.date,
        year: fields.year,
        month: fields.month,
        category: fields.category,
        amount: fields.amount,
        note: fields.note,
        member_id: fields.member_id,
        updated_at: shared::util::now_millis(),
        ..existing
    };
    expense::update(&mut *tx, &updated).await?;
    super::yearly::refresh_from(&mut tx, old_year.min(updated.year)).await?;
    commit(tx).await?;
    Ok(updated)
}

pub async fn delete_expense(pool: &SqlitePool, id: i64) -> AppResult<Expense> {
    let mut tx = begin(pool).await?;
    let existing = expense::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| expense_not_found(id))?;
    expense::delete(&mut *tx, id).await?;
    super::yearly::refresh_from(&mut tx, existing.year).await?;
    commit(tx).await?;
    Ok(existing)
}
