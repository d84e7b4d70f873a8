//! Monthly dues state machine
//!
//! A dues year is twelve [`MonthlyDue`] entries plus an `unpaid_amount`
//! running total. Every edit goes through [`apply_month_change`], which keeps
//! the running total in step and reports the income-ledger side effect the
//! caller must apply.
//!
//! # Invariants
//!
//! - `paid == (status == Paid)` and a paid month carries the `income_id` of
//!   its mirrored income once the caller has linked it
//! - `unpaid_amount >= 0`
//! - a month never gets paid with a zero amount

use rust_decimal::Decimal;
use shared::models::{DuesData, DuesStatus, DuesSummary, MonthChange, MonthlyDue};

use super::money::{to_decimal, to_f64};
use crate::utils::validation::{validate_amount, validate_color, validate_month};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Income-ledger side effect of a dues edit
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerEffect {
    /// Nothing to mirror
    None,
    /// Month became paid: record an income and link it with [`link_income`]
    CreateIncome { month: u32, amount: f64 },
    /// Month stopped being paid: drop its income
    RemoveIncome { month: u32, income_id: i64 },
    /// Amount of a paid month changed: follow it on the income
    AdjustIncome {
        month: u32,
        income_id: i64,
        amount: f64,
    },
}

fn month_index(month: u32) -> AppResult<usize> {
    Ok(validate_month(month)? as usize - 1)
}

fn unpaid_month(month: u32, amount: f64) -> MonthlyDue {
    MonthlyDue {
        month,
        paid: false,
        amount,
        status: DuesStatus::Unpaid,
        color: DuesStatus::Unpaid.default_color().to_string(),
        income_id: None,
    }
}

/// Fresh dues year: twelve unpaid months at `monthly_fee`
pub fn new_year(member_id: i64, year: i32, monthly_fee: f64) -> DuesData {
    let fee = to_f64(to_decimal(monthly_fee));
    DuesData {
        member_id,
        year,
        months: (1..=12).map(|m| unpaid_month(m, fee)).collect(),
        unpaid_amount: to_f64(to_decimal(fee) * Decimal::from(12)),
        updated_at: 0,
    }
}

/// Bring a stored record back to twelve ordered months
///
/// Missing months are filled as unpaid at `monthly_fee`; duplicates and
/// out-of-range months are dropped.
pub fn normalize(dues: &mut DuesData, monthly_fee: f64) {
    if dues.months.len() == 12
        && dues
            .months
            .iter()
            .enumerate()
            .all(|(i, m)| m.month as usize == i + 1)
    {
        return;
    }
    let fee = to_f64(to_decimal(monthly_fee));
    let mut months: Vec<MonthlyDue> = (1..=12).map(|m| unpaid_month(m, fee)).collect();
    let mut seen = [false; 12];
    for m in dues.months.drain(..) {
        if !(1..=12).contains(&m.month) {
            continue;
        }
        let idx = m.month as usize - 1;
        if !seen[idx] {
            seen[idx] = true;
            months[idx] = m;
        }
    }
    dues.months = months;
}

/// Resolve the target status of a change against the current one
fn target_status(current: DuesStatus, change: &MonthChange) -> AppResult<DuesStatus> {
    match (change.paid, change.status) {
        (Some(paid), Some(status)) if paid != (status == DuesStatus::Paid) => {
            Err(AppError::with_message(
                ErrorCode::DuesStatusConflict,
                format!("paid={paid} contradicts status {status:?}"),
            ))
        }
        (_, Some(status)) => Ok(status),
        (Some(true), None) => Ok(DuesStatus::Paid),
        (Some(false), None) if current == DuesStatus::Paid => Ok(DuesStatus::Unpaid),
        _ => Ok(current),
    }
}

/// Apply an edit to one month and return the income effect to mirror
///
/// On error `dues` is left untouched.
pub fn apply_month_change(
    dues: &mut DuesData,
    month: u32,
    change: &MonthChange,
) -> AppResult<LedgerEffect> {
    let idx = month_index(month)?;
    let new_amount = change
        .amount
        .map(|a| validate_amount(a, "amount"))
        .transpose()?;
    if let Some(color) = &change.color {
        validate_color(color)?;
    }

    let entry = &dues.months[idx];
    let old_status = entry.status;
    let new_status = target_status(old_status, change)?;
    let old_amount = to_decimal(entry.amount);
    let new_amount = new_amount.unwrap_or(old_amount);

    if new_status == DuesStatus::Paid && new_amount.is_zero() {
        return Err(AppError::with_message(
            ErrorCode::ZeroAmountPayment,
            format!("Month {month} has no amount to pay"),
        )
        .with_detail("month", month));
    }

    let mut unpaid = to_decimal(dues.unpaid_amount);
    let effect = match (old_status, new_status) {
        (DuesStatus::Unpaid, DuesStatus::Unpaid) => {
            unpaid += new_amount - old_amount;
            LedgerEffect::None
        }
        (DuesStatus::Paid, DuesStatus::Paid) => match entry.income_id {
            Some(income_id) if new_amount != old_amount => LedgerEffect::AdjustIncome {
                month,
                income_id,
                amount: to_f64(new_amount),
            },
            _ => LedgerEffect::None,
        },
        (DuesStatus::Exempt, DuesStatus::Exempt) => LedgerEffect::None,
        (DuesStatus::Unpaid, DuesStatus::Paid) => {
            unpaid -= old_amount;
            LedgerEffect::CreateIncome {
                month,
                amount: to_f64(new_amount),
            }
        }
        (DuesStatus::Exempt, DuesStatus::Paid) => LedgerEffect::CreateIncome {
            month,
            amount: to_f64(new_amount),
        },
        (DuesStatus::Paid, to) => {
            if to == DuesStatus::Unpaid {
                unpaid += new_amount;
            }
            match entry.income_id {
                Some(income_id) => LedgerEffect::RemoveIncome { month, income_id },
                None => LedgerEffect::None,
            }
        }
        (DuesStatus::Unpaid, DuesStatus::Exempt) => {
            unpaid -= old_amount;
            LedgerEffect::None
        }
        (DuesStatus::Exempt, DuesStatus::Unpaid) => {
            unpaid += new_amount;
            LedgerEffect::None
        }
    };

    let entry = &mut dues.months[idx];
    if new_status != old_status {
        entry.color = new_status.default_color().to_string();
        if new_status != DuesStatus::Paid {
            entry.income_id = None;
        }
    }
    if let Some(color) = &change.color {
        entry.color = color.clone();
    }
    entry.status = new_status;
    entry.paid = new_status == DuesStatus::Paid;
    entry.amount = to_f64(new_amount);
    dues.unpaid_amount = to_f64(unpaid.max(Decimal::ZERO));

    Ok(effect)
}

/// Record the income created for a paid month
pub fn link_income(dues: &mut DuesData, month: u32, income_id: i64) -> AppResult<()> {
    let idx = month_index(month)?;
    let entry = &mut dues.months[idx];
    if entry.status != DuesStatus::Paid {
        return Err(AppError::with_message(
            ErrorCode::DuesStatusConflict,
            format!("Month {month} is not paid"),
        ));
    }
    entry.income_id = Some(income_id);
    Ok(())
}

/// Month linked to a mirrored income
pub fn month_of_income(dues: &DuesData, income_id: i64) -> Option<u32> {
    dues.months
        .iter()
        .find(|m| m.income_id == Some(income_id))
        .map(|m| m.month)
}

/// The mirrored income was deleted from the ledger: the month is unpaid again
pub fn revert_payment(dues: &mut DuesData, income_id: i64) -> Option<u32> {
    let entry = dues
        .months
        .iter_mut()
        .find(|m| m.income_id == Some(income_id))?;
    entry.status = DuesStatus::Unpaid;
    entry.paid = false;
    entry.income_id = None;
    entry.color = DuesStatus::Unpaid.default_color().to_string();
    let month = entry.month;
    let amount = to_decimal(entry.amount);
    dues.unpaid_amount = to_f64(to_decimal(dues.unpaid_amount) + amount);
    Some(month)
}

/// The mirrored income's amount was edited in the ledger
pub fn follow_income_amount(dues: &mut DuesData, income_id: i64, amount: f64) -> Option<u32> {
    let entry = dues
        .months
        .iter_mut()
        .find(|m| m.income_id == Some(income_id))?;
    entry.amount = to_f64(to_decimal(amount));
    Some(entry.month)
}

/// Unpaid total derived from the months: Σ amount of unpaid months
pub fn derived_unpaid(dues: &DuesData) -> f64 {
    to_f64(
        dues.months
            .iter()
            .filter(|m| m.status == DuesStatus::Unpaid)
            .map(|m| to_decimal(m.amount))
            .sum(),
    )
}

/// Reset the user-editable running total to the derived value
pub fn recalculate(dues: &mut DuesData) {
    dues.unpaid_amount = derived_unpaid(dues);
}

/// Overview row for one member/year
pub fn summarize(dues: &DuesData, member_name: &str) -> DuesSummary {
    let count = |s: DuesStatus| dues.months.iter().filter(|m| m.status == s).count() as u32;
    DuesSummary {
        member_id: dues.member_id,
        member_name: member_name.to_string(),
        year: dues.year,
        statuses: dues.months.iter().map(|m| m.status).collect(),
        paid_months: count(DuesStatus::Paid),
        unpaid_months: count(DuesStatus::Unpaid),
        exempt_months: count(DuesStatus::Exempt),
        paid_total: to_f64(
            dues.months
                .iter()
                .filter(|m| m.status == DuesStatus::Paid)
                .map(|m| to_decimal(m.amount))
                .sum(),
        ),
        unpaid_amount: dues.unpaid_amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pay() -> MonthChange {
        MonthChange {
            paid: Some(true),
            ..Default::default()
        }
    }

    fn status(s: DuesStatus) -> MonthChange {
        MonthChange {
            status: Some(s),
            ..Default::default()
        }
    }

    fn amount(a: f64) -> MonthChange {
        MonthChange {
            amount: Some(a),
            ..Default::default()
        }
    }

    /// Pay a month and link a fake income id equal to the month number
    fn pay_and_link(dues: &mut DuesData, month: u32) {
        let effect = apply_month_change(dues, month, &pay()).unwrap();
        assert!(matches!(effect, LedgerEffect::CreateIncome { .. }));
        link_income(dues, month, month as i64 + 1000).unwrap();
    }

    #[test]
    fn new_year_is_all_unpaid() {
        let dues = new_year(7, 2024, 10.0);
        assert_eq!(dues.months.len(), 12);
        assert!(dues.months.iter().all(|m| !m.paid && m.status == DuesStatus::Unpaid));
        assert!(dues.months.iter().all(|m| m.color == "#f44336"));
        assert_eq!(dues.unpaid_amount, 120.0);
        assert_eq!(dues.months[0].month, 1);
        assert_eq!(dues.months[11].month, 12);
    }

    #[test]
    fn paying_creates_income_and_reduces_unpaid() {
        let mut dues = new_year(1, 2024, 10.0);
        let effect = apply_month_change(&mut dues, 3, &pay()).unwrap();
        assert_eq!(effect, LedgerEffect::CreateIncome { month: 3, amount: 10.0 });
        assert_eq!(dues.unpaid_amount, 110.0);
        let m = &dues.months[2];
        assert!(m.paid);
        assert_eq!(m.status, DuesStatus::Paid);
        assert_eq!(m.color, "#4caf50");
        assert_eq!(m.income_id, None);

        link_income(&mut dues, 3, 99).unwrap();
        assert_eq!(dues.months[2].income_id, Some(99));
    }

    #[test]
    fn paying_with_new_amount_subtracts_the_tracked_amount() {
        let mut dues = new_year(1, 2024, 10.0);
        let change = MonthChange {
            paid: Some(true),
            amount: Some(15.0),
            ..Default::default()
        };
        let effect = apply_month_change(&mut dues, 1, &change).unwrap();
        assert_eq!(effect, LedgerEffect::CreateIncome { month: 1, amount: 15.0 });
        assert_eq!(dues.unpaid_amount, 110.0);
        assert_eq!(dues.months[0].amount, 15.0);
    }

    #[test]
    fn unpaying_removes_income_and_restores_amount() {
        let mut dues = new_year(1, 2024, 10.0);
        pay_and_link(&mut dues, 5);
        let effect = apply_month_change(
            &mut dues,
            5,
            &MonthChange {
                paid: Some(false),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(
            effect,
            LedgerEffect::RemoveIncome {
                month: 5,
                income_id: 1005
            }
        );
        assert_eq!(dues.unpaid_amount, 120.0);
        assert_eq!(dues.months[4].income_id, None);
        assert_eq!(dues.months[4].color, "#f44336");
    }

    #[test]
    fn amount_edit_on_unpaid_month_moves_running_total() {
        let mut dues = new_year(1, 2024, 10.0);
        assert_eq!(
            apply_month_change(&mut dues, 2, &amount(12.5)).unwrap(),
            LedgerEffect::None
        );
        assert_eq!(dues.unpaid_amount, 122.5);
        apply_month_change(&mut dues, 2, &amount(0.0)).unwrap();
        assert_eq!(dues.unpaid_amount, 110.0);
    }

    #[test]
    fn amount_edit_on_paid_month_adjusts_income() {
        let mut dues = new_year(1, 2024, 10.0);
        pay_and_link(&mut dues, 1);
        let effect = apply_month_change(&mut dues, 1, &amount(20.0)).unwrap();
        assert_eq!(
            effect,
            LedgerEffect::AdjustIncome {
                month: 1,
                income_id: 1001,
                amount: 20.0
            }
        );
        assert_eq!(dues.unpaid_amount, 110.0);
        // same amount again is a no-op
        assert_eq!(
            apply_month_change(&mut dues, 1, &amount(20.0)).unwrap(),
            LedgerEffect::None
        );
    }

    #[test]
    fn exempt_transitions() {
        let mut dues = new_year(1, 2024, 10.0);
        apply_month_change(&mut dues, 8, &status(DuesStatus::Exempt)).unwrap();
        assert_eq!(dues.unpaid_amount, 110.0);
        assert_eq!(dues.months[7].color, "#9e9e9e");
        assert!(!dues.months[7].paid);

        // paid=false on an exempt month keeps it exempt
        apply_month_change(
            &mut dues,
            8,
            &MonthChange {
                paid: Some(false),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(dues.months[7].status, DuesStatus::Exempt);

        apply_month_change(&mut dues, 8, &status(DuesStatus::Unpaid)).unwrap();
        assert_eq!(dues.unpaid_amount, 120.0);

        // exempt -> paid creates the income but does not touch the total
        apply_month_change(&mut dues, 9, &status(DuesStatus::Exempt)).unwrap();
        let effect = apply_month_change(&mut dues, 9, &pay()).unwrap();
        assert_eq!(effect, LedgerEffect::CreateIncome { month: 9, amount: 10.0 });
        assert_eq!(dues.unpaid_amount, 110.0);
    }

    #[test]
    fn paid_to_exempt_removes_income_without_adding_back() {
        let mut dues = new_year(1, 2024, 10.0);
        pay_and_link(&mut dues, 4);
        let effect = apply_month_change(&mut dues, 4, &status(DuesStatus::Exempt)).unwrap();
        assert_eq!(
            effect,
            LedgerEffect::RemoveIncome {
                month: 4,
                income_id: 1004
            }
        );
        assert_eq!(dues.unpaid_amount, 110.0);
    }

    #[test]
    fn unpaid_total_is_clamped_at_zero() {
        let mut dues = new_year(1, 2024, 10.0);
        dues.unpaid_amount = 5.0; // manual override below the derived value
        apply_month_change(&mut dues, 1, &pay()).unwrap();
        assert_eq!(dues.unpaid_amount, 0.0);
    }

    #[test]
    fn zero_amount_payment_is_rejected_without_side_effects() {
        let mut dues = new_year(1, 2024, 0.0);
        let before = dues.clone();
        let err = apply_month_change(&mut dues, 1, &pay()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ZeroAmountPayment);
        assert_eq!(dues, before);

        let mut paid = new_year(1, 2024, 10.0);
        pay_and_link(&mut paid, 1);
        assert_eq!(
            apply_month_change(&mut paid, 1, &amount(0.0)).unwrap_err().code,
            ErrorCode::ZeroAmountPayment
        );
    }

    #[test]
    fn contradictory_change_is_rejected() {
        let mut dues = new_year(1, 2024, 10.0);
        let change = MonthChange {
            paid: Some(true),
            status: Some(DuesStatus::Exempt),
            ..Default::default()
        };
        assert_eq!(
            apply_month_change(&mut dues, 1, &change).unwrap_err().code,
            ErrorCode::DuesStatusConflict
        );
    }

    #[test]
    fn invalid_month_and_amount() {
        let mut dues = new_year(1, 2024, 10.0);
        assert_eq!(
            apply_month_change(&mut dues, 13, &pay()).unwrap_err().code,
            ErrorCode::InvalidMonth
        );
        assert_eq!(
            apply_month_change(&mut dues, 1, &amount(-1.0)).unwrap_err().code,
            ErrorCode::InvalidAmount
        );
    }

    #[test]
    fn explicit_color_survives_status_change() {
        let mut dues = new_year(1, 2024, 10.0);
        let change = MonthChange {
            paid: Some(true),
            color: Some("#123456".into()),
            ..Default::default()
        };
        apply_month_change(&mut dues, 6, &change).unwrap();
        assert_eq!(dues.months[5].color, "#123456");

        // color-only edit keeps the status
        let change = MonthChange {
            color: Some("#abc".into()),
            ..Default::default()
        };
        assert_eq!(
            apply_month_change(&mut dues, 6, &change).unwrap(),
            LedgerEffect::None
        );
        assert_eq!(dues.months[5].color, "#abc");
        assert!(dues.months[5].paid);
    }

    #[test]
    fn link_income_requires_paid_month() {
        let mut dues = new_year(1, 2024, 10.0);
        assert_eq!(
            link_income(&mut dues, 1, 5).unwrap_err().code,
            ErrorCode::DuesStatusConflict
        );
    }

    #[test]
    fn reverse_mirroring() {
        let mut dues = new_year(1, 2024, 10.0);
        pay_and_link(&mut dues, 2);
        assert_eq!(month_of_income(&dues, 1002), Some(2));

        assert_eq!(follow_income_amount(&mut dues, 1002, 12.0), Some(2));
        assert_eq!(dues.months[1].amount, 12.0);
        assert_eq!(dues.unpaid_amount, 110.0);

        assert_eq!(revert_payment(&mut dues, 1002), Some(2));
        assert_eq!(dues.months[1].status, DuesStatus::Unpaid);
        assert_eq!(dues.months[1].income_id, None);
        assert_eq!(dues.unpaid_amount, 122.0);

        assert_eq!(revert_payment(&mut dues, 1002), None);
        assert_eq!(follow_income_amount(&mut dues, 77, 1.0), None);
    }

    #[test]
    fn recalculate_resets_override() {
        let mut dues = new_year(1, 2024, 10.0);
        pay_and_link(&mut dues, 1);
        apply_month_change(&mut dues, 2, &status(DuesStatus::Exempt)).unwrap();
        dues.unpaid_amount = 3.0;
        assert_eq!(derived_unpaid(&dues), 100.0);
        recalculate(&mut dues);
        assert_eq!(dues.unpaid_amount, 100.0);
    }

    #[test]
    fn summary_counts() {
        let mut dues = new_year(3, 2024, 10.0);
        pay_and_link(&mut dues, 1);
        pay_and_link(&mut dues, 2);
        apply_month_change(&mut dues, 3, &status(DuesStatus::Exempt)).unwrap();
        let s = summarize(&dues, "Kim");
        assert_eq!(s.member_name, "Kim");
        assert_eq!(s.paid_months, 2);
        assert_eq!(s.exempt_months, 1);
        assert_eq!(s.unpaid_months, 9);
        assert_eq!(s.paid_total, 20.0);
        assert_eq!(s.unpaid_amount, 90.0);
        assert_eq!(s.statuses.len(), 12);
        assert_eq!(s.statuses[2], DuesStatus::Exempt);
    }

    #[test]
    fn normalize_repairs_short_records() {
        let mut dues = new_year(1, 2024, 10.0);
        pay_and_link(&mut dues, 4);
        dues.months.retain(|m| m.month == 4 || m.month == 1);
        dues.months.reverse();
        normalize(&mut dues, 10.0);
        assert_eq!(dues.months.len(), 12);
        assert!(dues.months.iter().enumerate().all(|(i, m)| m.month as usize == i + 1));
        assert!(dues.months[3].paid);
    }

    #[test]
    fn normalize_keeps_first_of_duplicates_and_drops_bad_months() {
        let mut dues = new_year(1, 2024, 10.0);
        pay_and_link(&mut dues, 2);
        let mut stray = dues.months[2].clone();
        stray.month = 13;
        let mut copy = dues.months[4].clone();
        copy.month = 2;
        dues.months.push(stray);
        dues.months.push(copy);
        normalize(&mut dues, 10.0);
        assert_eq!(dues.months.len(), 12);
        assert!(dues.months.iter().enumerate().all(|(i, m)| m.month as usize == i + 1));
        assert!(dues.months[1].paid);
        assert_eq!(dues.months[1].income_id, Some(1002));
    }
}
