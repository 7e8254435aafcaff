// 💸 Transaction Entity - one income or expense record
//
// Identity is the `id` (never changes). Everything else is a value the user
// may edit later through a `TransactionUpdate`.
//
// `category` is a free-text copy of a Category name, NOT a foreign key.
// Renaming or deleting a Category leaves existing transactions untouched.

use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// TRANSACTION KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming in
    Income,

    /// Money going out
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    /// Sign shown next to amounts in reports
    pub fn sign(&self) -> &'static str {
        match self {
            TransactionKind::Income => "+",
            TransactionKind::Expense => "-",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(anyhow!("Unknown transaction type: '{}'", other)),
        }
    }
}

// ============================================================================
// TRANSACTION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Stable identity - assigned once by the store
    pub id: String,

    #[serde(rename = "type")]
    pub kind: TransactionKind,

    /// Non-negative amount; the sign comes from `kind`. Stored as a JSON number
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,

    pub category: String,

    pub description: String,

    /// Day the money moved (user supplied)
    pub date: NaiveDate,

    /// When the record was created in the store
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Build a stored transaction from a submitted draft
    pub fn from_draft(id: String, draft: TransactionDraft, created_at: DateTime<Utc>) -> Self {
        Transaction {
            id,
            kind: draft.kind,
            amount: draft.amount,
            category: draft.category,
            description: draft.description,
            date: draft.date,
            created_at,
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// Amount with the kind's sign applied (income positive, expense negative)
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }
}

// ============================================================================
// DRAFT & UPDATE
// ============================================================================

/// User-submitted transaction data (no id, no creation timestamp yet)
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
}

impl TransactionDraft {
    /// Presence check - category and description must not be blank
    pub fn is_complete(&self) -> bool {
        !self.category.trim().is_empty() && !self.description.trim().is_empty()
    }
}

/// Partial update: only `Some` fields are applied
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionUpdate {
    pub kind: Option<TransactionKind>,
    pub amount: Option<Decimal>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
}

impl TransactionUpdate {
    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.amount.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.date.is_none()
    }

    /// A present category or description must not be blank
    pub fn is_complete(&self) -> bool {
        let not_blank = |field: &Option<String>| field.as_deref().map_or(true, |v| !v.trim().is_empty());
        not_blank(&self.category) && not_blank(&self.description)
    }

    /// Apply present fields; identity and creation time are never touched
    pub fn apply_to(&self, tx: &mut Transaction) {
        if let Some(kind) = self.kind {
            tx.kind = kind;
        }
        if let Some(amount) = self.amount {
            tx.amount = amount;
        }
        if let Some(category) = &self.category {
            tx.category = category.clone();
        }
        if let Some(description) = &self.description {
            tx.description = description.clone();
        }
        if let Some(date) = self.date {
            tx.date = date;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> TransactionDraft {
        TransactionDraft {
            kind: TransactionKind::Expense,
            amount: Decimal::new(4599, 2),
            category: "Food & Dining".to_string(),
            description: "Lunch".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        }
    }

    #[test]
    fn test_kind_parse_and_display() {
        assert_eq!("income".parse::<TransactionKind>().unwrap(), TransactionKind::Income);
        assert_eq!(" Expense ".parse::<TransactionKind>().unwrap(), TransactionKind::Expense);
        assert!("transfer".parse::<TransactionKind>().is_err());
        assert_eq!(TransactionKind::Expense.to_string(), "expense");
    }

    #[test]
    fn test_draft_presence_check() {
        assert!(draft().is_complete());

        let mut blank_category = draft();
        blank_category.category = "  ".to_string();
        assert!(!blank_category.is_complete());

        let mut blank_description = draft();
        blank_description.description = String::new();
        assert!(!blank_description.is_complete());
    }

    #[test]
    fn test_update_applies_only_present_fields() {
        let created = Utc::now();
        let mut tx = Transaction::from_draft("tx-1".to_string(), draft(), created);

        let update = TransactionUpdate {
            amount: Some(Decimal::new(50, 0)),
            description: Some("Dinner".to_string()),
            ..Default::default()
        };
        update.apply_to(&mut tx);

        assert_eq!(tx.id, "tx-1");
        assert_eq!(tx.amount, Decimal::new(50, 0));
        assert_eq!(tx.description, "Dinner");
        assert_eq!(tx.category, "Food & Dining");
        assert_eq!(tx.created_at, created);
    }

    #[test]
    fn test_serde_uses_stored_field_names() {
        let json = r#"{
            "id": "1700000000000",
            "type": "income",
            "amount": 1000,
            "category": "Salary",
            "description": "October pay",
            "date": "2024-10-01",
            "createdAt": "2024-10-01T09:30:00.000Z"
        }"#;

        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.kind, TransactionKind::Income);
        assert_eq!(tx.amount, Decimal::new(1000, 0));
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2024, 10, 1).unwrap());

        let out = serde_json::to_value(&tx).unwrap();
        assert_eq!(out["type"], "income");
        assert_eq!(out["amount"].as_f64(), Some(1000.0));
        assert!(out.get("createdAt").is_some());
    }

    #[test]
    fn test_amount_written_as_number() {
        let tx = Transaction::from_draft("a".to_string(), draft(), Utc::now());
        let json = serde_json::to_string(&tx).unwrap();
        assert!(json.contains(r#""amount":45.99"#));

        // Entries written with string amounts still load
        let legacy = json.replace(r#""amount":45.99"#, r#""amount":"45.99""#);
        let back: Transaction = serde_json::from_str(&legacy).unwrap();
        assert_eq!(back.amount, Decimal::new(4599, 2));

        let reloaded: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(reloaded, tx);
    }

    #[test]
    fn test_update_blank_fields_are_incomplete() {
        assert!(TransactionUpdate::default().is_complete());

        let blank_description = TransactionUpdate {
            description: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(!blank_description.is_complete());

        let blank_category = TransactionUpdate {
            category: Some(String::new()),
            amount: Some(Decimal::ONE),
            ..Default::default()
        };
        assert!(!blank_category.is_complete());
    }

    #[test]
    fn test_signed_amount() {
        let tx = Transaction::from_draft("a".to_string(), draft(), Utc::now());
        assert_eq!(tx.signed_amount(), Decimal::new(-4599, 2));
        assert!(tx.is_expense());
    }
}
