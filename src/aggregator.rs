// 📊 Aggregator - derived views over the transaction list
//
// Pure functions: no I/O, no clock (except `monthly_series_now`), same input
// gives the same output. Recomputed on every render.

use chrono::{Datelike, Local, Months, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::entities::{Category, Transaction, TransactionKind, DEFAULT_CATEGORY_COLOR};

/// Months shown on the dashboard trend when not configured otherwise
pub const DEFAULT_MONTH_COUNT: usize = 6;

// ============================================================================
// DERIVED TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub income: Decimal,
    pub expenses: Decimal,
    pub net: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyData {
    /// Label such as "Oct 2026"
    pub month: String,
    pub income: Decimal,
    pub expenses: Decimal,
    pub net: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryData {
    pub name: String,
    pub value: Decimal,
    pub color: String,
}

// ============================================================================
// TOTALS
// ============================================================================

fn sum_kind<'a, I>(transactions: I, kind: TransactionKind) -> Decimal
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .filter(|tx| tx.kind == kind)
        .map(|tx| tx.amount)
        .sum()
}

/// Sum amounts by kind; net = income - expenses
pub fn totals(transactions: &[Transaction]) -> Totals {
    let income = sum_kind(transactions, TransactionKind::Income);
    let expenses = sum_kind(transactions, TransactionKind::Expense);

    Totals {
        income,
        expenses,
        net: income - expenses,
    }
}

// ============================================================================
// MONTHLY SERIES
// ============================================================================

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Trailing `month_count` calendar months ending at `today`'s month, oldest first
pub fn monthly_series(
    transactions: &[Transaction],
    month_count: usize,
    today: NaiveDate,
) -> Vec<MonthlyData> {
    let current = first_of_month(today);

    (0..month_count)
        .rev()
        .filter_map(|back| current.checked_sub_months(Months::new(back as u32)))
        .map(|month_start| {
            let in_month: Vec<&Transaction> = transactions
                .iter()
                .filter(|tx| {
                    tx.date.year() == month_start.year() && tx.date.month() == month_start.month()
                })
                .collect();

            let income = sum_kind(in_month.iter().copied(), TransactionKind::Income);
            let expenses = sum_kind(in_month.iter().copied(), TransactionKind::Expense);

            MonthlyData {
                month: month_start.format("%b %Y").to_string(),
                income,
                expenses,
                net: income - expenses,
            }
        })
        .collect()
}

/// `monthly_series` anchored at the local current date
pub fn monthly_series_now(transactions: &[Transaction], month_count: usize) -> Vec<MonthlyData> {
    monthly_series(transactions, month_count, Local::now().date_naive())
}

// ============================================================================
// CATEGORY BREAKDOWN
// ============================================================================

/// Sum by category name for one kind, largest first; unmatched names get the default color
pub fn category_breakdown(
    transactions: &[Transaction],
    categories: &[Category],
    kind: TransactionKind,
) -> Vec<CategoryData> {
    let mut sums: BTreeMap<&str, Decimal> = BTreeMap::new();

    for tx in transactions.iter().filter(|tx| tx.kind == kind) {
        *sums.entry(tx.category.as_str()).or_insert(Decimal::ZERO) += tx.amount;
    }

    let mut breakdown: Vec<CategoryData> = sums
        .into_iter()
        .map(|(name, value)| {
            let color = categories
                .iter()
                .find(|c| c.name == name)
                .map(|c| c.color.clone())
                .unwrap_or_else(|| DEFAULT_CATEGORY_COLOR.to_string());

            CategoryData {
                name: name.to_string(),
                value,
                color,
            }
        })
        .collect();

    // BTreeMap order is by name, so the stable sort leaves ties alphabetical
    breakdown.sort_by(|a, b| b.value.cmp(&a.value));
    breakdown
}

// ============================================================================
// FORMATTING
// ============================================================================

/// en-US dollar formatting: `$1,234.50`, `-$5.00`
pub fn format_currency(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);

    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = rounded.abs().to_string();
    let (whole, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}${}.{}", if negative { "-" } else { "" }, grouped, cents)
}
