//! Yearly balance rollup
//!
//! `closing = opening + Σ income − Σ expense`, and every year opens with the
//! previous year's closing balance. Gaps between tracked years are filled
//! with empty years so the chain stays contiguous.

use rust_decimal::Decimal;
use shared::models::{MonthTotals, YearlyData};

use super::money::{to_decimal, to_f64};

/// Ledger amounts of one year, grouped later by owning month
#[derive(Debug, Clone, Default)]
pub struct YearAmounts {
    /// (month, amount) of every income owned by the year
    pub incomes: Vec<(u32, f64)>,
    /// (month, amount) of every expense owned by the year
    pub expenses: Vec<(u32, f64)>,
}

/// Group ledger amounts by owning month and sum them
///
/// Entries with a month outside 1..=12 are ignored.
pub fn month_totals(incomes: &[(u32, f64)], expenses: &[(u32, f64)]) -> Vec<MonthTotals> {
    let mut income = [Decimal::ZERO; 12];
    let mut expense = [Decimal::ZERO; 12];
    for &(month, amount) in incomes {
        if let Some(slot) = month.checked_sub(1).and_then(|i| income.get_mut(i as usize)) {
            *slot += to_decimal(amount);
        }
    }
    for &(month, amount) in expenses {
        if let Some(slot) = month.checked_sub(1).and_then(|i| expense.get_mut(i as usize)) {
            *slot += to_decimal(amount);
        }
    }
    (0..12)
        .map(|i| MonthTotals {
            month: i as u32 + 1,
            income: to_f64(income[i]),
            expense: to_f64(expense[i]),
        })
        .collect()
}

/// Compute one year's totals from its opening balance
pub fn build_year(
    year: i32,
    opening_balance: f64,
    opening_is_manual: bool,
    months: Vec<MonthTotals>,
    now: i64,
) -> YearlyData {
    let total_income: Decimal = months.iter().map(|m| to_decimal(m.income)).sum();
    let total_expense: Decimal = months.iter().map(|m| to_decimal(m.expense)).sum();
    let opening = to_decimal(opening_balance);
    YearlyData {
        year,
        opening_balance: to_f64(opening),
        opening_is_manual,
        months,
        total_income: to_f64(total_income),
        total_expense: to_f64(total_expense),
        closing_balance: to_f64(opening + total_income - total_expense),
        updated_at: now,
    }
}

/// Roll a contiguous chain of years forward from `first_opening`
///
/// `years` may be unsorted and sparse; the result covers every year from
/// the smallest to the largest key. Only the first year may keep a manual
/// opening balance.
pub fn roll_forward(
    first_opening: f64,
    first_is_manual: bool,
    years: &[(i32, YearAmounts)],
    now: i64,
) -> Vec<YearlyData> {
    let (Some(first), Some(last)) = (
        years.iter().map(|(y, _)| *y).min(),
        years.iter().map(|(y, _)| *y).max(),
    ) else {
        return Vec::new();
    };

    let mut result = Vec::with_capacity((last - first + 1) as usize);
    let mut opening = first_opening;
    for year in first..=last {
        let months = years
            .iter()
            .find(|(y, _)| *y == year)
            .map(|(_, a)| month_totals(&a.incomes, &a.expenses))
            .unwrap_or_else(|| month_totals(&[], &[]));
        let data = build_year(year, opening, first_is_manual && year == first, months, now);
        opening = data.closing_balance;
        result.push(data);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amounts(incomes: &[(u32, f64)], expenses: &[(u32, f64)]) -> YearAmounts {
        YearAmounts {
            incomes: incomes.to_vec(),
            expenses: expenses.to_vec(),
        }
    }

    #[test]
    fn month_totals_groups_by_month() {
        let totals = month_totals(&[(1, 10.0), (1, 5.5), (12, 0.1)], &[(1, 3.0), (6, 0.2)]);
        assert_eq!(totals.len(), 12);
        assert_eq!(totals[0].income, 15.5);
        assert_eq!(totals[0].expense, 3.0);
        assert_eq!(totals[5].expense, 0.2);
        assert_eq!(totals[11].income, 0.1);
        assert_eq!(totals[3], MonthTotals { month: 4, income: 0.0, expense: 0.0 });
    }

    #[test]
    fn month_totals_ignores_out_of_range_months() {
        let totals = month_totals(&[(0, 10.0), (13, 5.0)], &[]);
        assert!(totals.iter().all(|m| m.income == 0.0));
    }

    #[test]
    fn build_year_closing_balance() {
        let months = month_totals(&[(1, 100.0), (2, 50.0)], &[(3, 30.25)]);
        let y = build_year(2024, 20.0, true, months, 1);
        assert_eq!(y.total_income, 150.0);
        assert_eq!(y.total_expense, 30.25);
        assert_eq!(y.closing_balance, 139.75);
        assert!(y.opening_is_manual);
    }

    #[test]
    fn roll_forward_carries_closing_into_next_opening() {
        let years = vec![
            (2023, amounts(&[(1, 100.0)], &[(2, 40.0)])),
            (2024, amounts(&[(5, 10.0)], &[])),
        ];
        let chain = roll_forward(5.0, true, &years, 0);
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0].opening_balance, 5.0);
        assert_eq!(chain[0].closing_balance, 65.0);
        assert!(chain[0].opening_is_manual);
        assert_eq!(chain[1].opening_balance, 65.0);
        assert_eq!(chain[1].closing_balance, 75.0);
        assert!(!chain[1].opening_is_manual);
    }

    #[test]
    fn roll_forward_fills_gaps_and_sorts() {
        let years = vec![
            (2025, amounts(&[], &[(1, 5.0)])),
            (2022, amounts(&[(1, 20.0)], &[])),
        ];
        let chain = roll_forward(0.0, false, &years, 0);
        let ys: Vec<i32> = chain.iter().map(|y| y.year).collect();
        assert_eq!(ys, vec![2022, 2023, 2024, 2025]);
        assert_eq!(chain[1].opening_balance, 20.0);
        assert_eq!(chain[1].closing_balance, 20.0);
        assert_eq!(chain[2].closing_balance, 20.0);
        assert_eq!(chain[3].closing_balance, 15.0);
    }

    #[test]
    fn roll_forward_empty_input() {
        assert!(roll_forward(10.0, true, &[], 0).is_empty());
    }

    #[test]
    fn balance_can_go_negative() {
        let chain = roll_forward(0.0, false, &[(2024, amounts(&[], &[(1, 12.5)]))], 0);
        assert_eq!(chain[0].closing_balance, -12.5);
    }
}
