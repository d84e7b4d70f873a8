//! Special occasion service
//!
//! The live list of a year is archived into an [`EventHistory`] snapshot and
//! cleared in one transaction.

use chrono::Datelike;
use shared::models::{EventHistory, SpecialEvent, SpecialEventCreate, SpecialEventUpdate};
use sqlx::SqlitePool;

use super::{begin, commit, ensure_member};
use crate::db::repository::event;
use crate::ledger::money::{sum, to_f64};
use crate::utils::time::parse_date;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_positive_amount, validate_required_text, validate_year,
};
use crate::utils::{AppError, AppResult, ErrorCode};

fn event_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::EventNotFound, format!("Special event {id} not found"))
        .with_detail("event_id", id)
}

fn clean_note(note: Option<String>) -> Option<String> {
    note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}

pub async fn list(pool: &SqlitePool, year: Option<i32>) -> AppResult<Vec<SpecialEvent>> {
    if let Some(y) = year {
        validate_year(y)?;
    }
    Ok(event::find_all(pool, year).await?)
}

pub async fn get(pool: &SqlitePool, id: i64) -> AppResult<SpecialEvent> {
    event::find_by_id(pool, id)
        .await?
        .ok_or_else(|| event_not_found(id))
}

pub async fn create(pool: &SqlitePool, data: SpecialEventCreate) -> AppResult<SpecialEvent> {
    let date = parse_date(data.date.trim())?;
    let year = validate_year(data.year.unwrap_or(date.year()))?;
    validate_required_text(&data.recipient, "recipient", MAX_NAME_LEN)?;
    validate_required_text(&data.occasion, "occasion", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&data.note, "note", MAX_NOTE_LEN)?;
    let amount = validate_positive_amount(data.amount, "amount")?;

    let mut tx = begin(pool).await?;
    if let Some(member_id) = data.member_id {
        ensure_member(&mut *tx, member_id).await?;
    }
    let now = shared::util::now_millis();
    let entry = SpecialEvent {
        id: shared::util::snowflake_id(),
        year,
        member_id: data.member_id,
        recipient: data.recipient.trim().to_string(),
        occasion: data.occasion.trim().to_string(),
        amount: to_f64(amount),
        date: date.format("%Y-%m-%d").to_string(),
        note: clean_note(data.note),
        created_at: now,
        updated_at: now,
    };
    event::insert(&mut *tx, &entry).await?;
    commit(tx).await?;
    Ok(entry)
}

/// Edit a live entry; a new date moves it to that date's year
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: SpecialEventUpdate,
) -> AppResult<SpecialEvent> {
    if let Some(recipient) = &data.recipient {
        validate_required_text(recipient, "recipient", MAX_NAME_LEN)?;
    }
    if let Some(occasion) = &data.occasion {
        validate_required_text(occasion, "occasion", MAX_SHORT_TEXT_LEN)?;
    }
    validate_optional_text(&data.note, "note", MAX_NOTE_LEN)?;
    let amount = data
        .amount
        .map(|a| validate_positive_amount(a, "amount"))
        .transpose()?;
    let date = data
        .date
        .as_deref()
        .map(|d| parse_date(d.trim()))
        .transpose()?;

    let mut tx = begin(pool).await?;
    let existing = event::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| event_not_found(id))?;
    if let Some(member_id) = data.member_id
        && Some(member_id) != existing.member_id
    {
        ensure_member(&mut *tx, member_id).await?;
    }

    let updated = SpecialEvent {
        year: match date {
            Some(d) => validate_year(d.year())?,
            None => existing.year,
        },
        date: date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or(existing.date),
        member_id: data.member_id.or(existing.member_id),
        recipient: data
            .recipient
            .map(|r| r.trim().to_string())
            .unwrap_or(existing.recipient),
        occasion: data
            .occasion
            .map(|o| o.trim().to_string())
            .unwrap_or(existing.occasion),
        amount: amount.map(to_f64).unwrap_or(existing.amount),
        note: match data.note {
            Some(note) => clean_note(Some(note)),
            None => existing.note,
        },
        updated_at: shared::util::now_millis(),
        ..existing
    };
    event::update(&mut *tx, &updated).await?;
    commit(tx).await?;
    Ok(updated)
}

pub async fn delete(pool: &SqlitePool, id: i64) -> AppResult<SpecialEvent> {
    let existing = get(pool, id).await?;
    event::delete(pool, id).await?;
    Ok(existing)
}

/// Archive the live list of `year` and clear it
pub async fn reset(pool: &SqlitePool, year: i32, operator_id: i64) -> AppResult<EventHistory> {
    validate_year(year)?;
    let mut tx = begin(pool).await?;
    let entries = event::find_all(&mut *tx, Some(year)).await?;
    if entries.is_empty() {
        return Err(AppError::with_message(
            ErrorCode::EventListEmpty,
            format!("No special events recorded for {year}"),
        )
        .with_detail("year", year));
    }

    let history = EventHistory {
        id: shared::util::snowflake_id(),
        year,
        archived_at: shared::util::now_millis(),
        archived_by: Some(operator_id),
        entry_count: entries.len() as i64,
        total_amount: to_f64(sum(entries.iter().map(|e| e.amount))),
        entries,
    };
    event::insert_history(&mut *tx, &history).await?;
    let cleared = event::delete_by_year(&mut *tx, year).await?;
    commit(tx).await?;

    tracing::info!(year, history_id = history.id, cleared, "Special events archived");
    Ok(history)
}

pub async fn history(pool: &SqlitePool, year: Option<i32>) -> AppResult<Vec<EventHistory>> {
    Ok(event::find_history(pool, year).await?)
}

pub async fn history_by_id(pool: &SqlitePool, id: i64) -> AppResult<EventHistory> {
    event::find_history_by_id(pool, id).await?.ok_or_else(|| {
        AppError::with_message(
            ErrorCode::EventHistoryNotFound,
            format!("Event history {id} not found"),
        )
        .with_detail("history_id", id)
    })
}
