// 🔎 Transaction list queries - search, filter and sort for list views

use crate::entities::{Transaction, TransactionKind};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    /// Case-insensitive substring of description or category
    pub search: Option<String>,

    /// `None` = all kinds
    pub kind: Option<TransactionKind>,

    /// Exact category name; `None` = all categories
    pub category: Option<String>,
}

impl TransactionFilter {
    pub fn matches(&self, tx: &Transaction) -> bool {
        let matches_search = match &self.search {
            Some(term) => {
                let term = term.to_lowercase();
                tx.description.to_lowercase().contains(&term)
                    || tx.category.to_lowercase().contains(&term)
            }
            None => true,
        };

        let matches_kind = self.kind.map_or(true, |kind| tx.kind == kind);
        let matches_category = self
            .category
            .as_deref()
            .map_or(true, |category| tx.category == category);

        matches_search && matches_kind && matches_category
    }

    pub fn is_active(&self) -> bool {
        self.search.is_some() || self.kind.is_some() || self.category.is_some()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    Date,
    Amount,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub order: SortOrder,
}

impl Sort {
    /// Selecting the active field flips the order; a new field keeps it
    pub fn select(self, field: SortField) -> Self {
        if self.field == field {
            Sort {
                field,
                order: self.order.toggled(),
            }
        } else {
            Sort { field, ..self }
        }
    }
}

/// Filtered and sorted copy of the list (stable: equal keys keep list order)
pub fn apply(transactions: &[Transaction], filter: &TransactionFilter, sort: Sort) -> Vec<Transaction> {
    let mut result: Vec<Transaction> = transactions
        .iter()
        .filter(|tx| filter.matches(tx))
        .cloned()
        .collect();

    result.sort_by(|a, b| {
        let ordering = match sort.field {
            SortField::Date => a.date.cmp(&b.date),
            SortField::Amount => a.amount.cmp(&b.amount),
        };

        match sort.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });

    result
}

/// First `n` entries of the (newest-first) list
pub fn recent(transactions: &[Transaction], n: usize) -> &[Transaction] {
    &transactions[..transactions.len().min(n)]
}
