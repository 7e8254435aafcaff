// 🗄️ Local Storage - named entries holding serialized lists
//
// Two entries, no schema version:
// - financeTransactions → JSON array of Transaction
// - financeCategories   → JSON array of Category
//
// Reading absent or malformed data never fails: the caller gets the fallback
// (empty list / default categories) and a warning is logged.

use anyhow::{Context, Result};
use log::{debug, warn};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

use crate::entities::{default_categories, Category, Transaction};

pub const TRANSACTIONS_KEY: &str = "financeTransactions";
pub const CATEGORIES_KEY: &str = "financeCategories";

// ============================================================================
// STORAGE TRAIT
// ============================================================================

/// Key-value persistence collaborator injected into the store
pub trait LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;

    fn remove_item(&mut self, key: &str) -> Result<()>;
}

// ============================================================================
// SQLITE BACKEND
// ============================================================================

pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Open (or create) the database file, creating parent directories
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create data directory {}", parent.display())
                })?;
            }
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database {}", path.display()))?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    pub fn from_connection(conn: Connection) -> Result<Self> {
        setup_database(&conn)?;
        Ok(SqliteStorage { conn })
    }

    /// Number of stored entries
    pub fn entry_count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM local_storage", [], |row| row.get(0))?;
        Ok(count)
    }
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery (in-memory databases report "memory")
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS local_storage (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    Ok(())
}

impl LocalStorage for SqliteStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("Failed to read entry '{}'", key))?;

        Ok(value)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO local_storage (key, value, updated_at)
                 VALUES (?1, ?2, CURRENT_TIMESTAMP)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP",
                params![key, value],
            )
            .with_context(|| format!("Failed to write entry '{}'", key))?;

        debug!("Wrote entry '{}' ({} bytes)", key, value.len());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM local_storage WHERE key = ?1", params![key])?;
        Ok(())
    }
}

// ============================================================================
// IN-MEMORY BACKEND
// ============================================================================

#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

// ============================================================================
// LIST LOAD / SAVE
// ============================================================================

/// Deserialize a JSON list entry; `None` when absent or malformed
fn load_list<T: DeserializeOwned>(storage: &dyn LocalStorage, key: &str) -> Result<Option<Vec<T>>> {
    let raw = match storage.get_item(key)? {
        Some(raw) => raw,
        None => return Ok(None),
    };

    match serde_json::from_str::<Vec<T>>(&raw) {
        Ok(items) => Ok(Some(items)),
        Err(e) => {
            warn!("Ignoring malformed entry '{}': {}", key, e);
            Ok(None)
        }
    }
}

fn save_list<T: Serialize>(storage: &mut dyn LocalStorage, key: &str, items: &[T]) -> Result<()> {
    let json = serde_json::to_string(items)
        .with_context(|| format!("Failed to serialize entry '{}'", key))?;
    storage.set_item(key, &json)
}

pub fn load_transactions(storage: &dyn LocalStorage) -> Result<Vec<Transaction>> {
    Ok(load_list(storage, TRANSACTIONS_KEY)?.unwrap_or_default())
}

pub fn load_categories(storage: &dyn LocalStorage) -> Result<Vec<Category>> {
    Ok(load_list(storage, CATEGORIES_KEY)?.unwrap_or_else(default_categories))
}

pub fn save_transactions(storage: &mut dyn LocalStorage, transactions: &[Transaction]) -> Result<()> {
    save_list(storage, TRANSACTIONS_KEY, transactions)
}

pub fn save_categories(storage: &mut dyn LocalStorage, categories: &[Category]) -> Result<()> {
    save_list(storage, CATEGORIES_KEY, categories)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::TransactionKind;
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;

    fn create_test_transaction(id: &str, kind: TransactionKind, amount: i64, category: &str) -> Transaction {
        Transaction {
            id: id.to_string(),
            kind,
            amount: Decimal::new(amount, 0),
            category: category.to_string(),
            description: format!("{} test", category),
            date: NaiveDate::from_ymd_opt(2024, 12, 1).unwrap(),
            created_at: Utc.with_ymd_and_hms(2024, 12, 1, 10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_sqlite_set_get_overwrite() {
        let mut storage = SqliteStorage::open_in_memory().unwrap();

        assert_eq!(storage.get_item("k").unwrap(), None);

        storage.set_item("k", "one").unwrap();
        storage.set_item("k", "two").unwrap();

        assert_eq!(storage.get_item("k").unwrap(), Some("two".to_string()));
        assert_eq!(storage.entry_count().unwrap(), 1);

        storage.remove_item("k").unwrap();
        assert_eq!(storage.get_item("k").unwrap(), None);
    }

    #[test]
    fn test_absent_entries_fall_back() {
        let storage = MemoryStorage::new();

        assert!(load_transactions(&storage).unwrap().is_empty());
        assert_eq!(load_categories(&storage).unwrap(), default_categories());
    }

    #[test]
    fn test_malformed_entries_fall_back() {
        let mut storage = MemoryStorage::new();
        storage.set_item(TRANSACTIONS_KEY, "{not json").unwrap();
        storage.set_item(CATEGORIES_KEY, r#"[{"id": 1}]"#).unwrap();

        assert!(load_transactions(&storage).unwrap().is_empty());
        assert_eq!(load_categories(&storage).unwrap(), default_categories());
    }

    #[test]
    fn test_lists_round_trip_through_sqlite() {
        let mut storage = SqliteStorage::open_in_memory().unwrap();

        let transactions = vec![
            create_test_transaction("a", TransactionKind::Income, 1000, "Salary"),
            create_test_transaction("b", TransactionKind::Expense, 200, "Food & Dining"),
        ];
        let mut categories = default_categories();
        categories.push(Category::new("x", "Gifts", TransactionKind::Income, "#F59E0B", "Gift"));

        save_transactions(&mut storage, &transactions).unwrap();
        save_categories(&mut storage, &categories).unwrap();

        assert_eq!(load_transactions(&storage).unwrap(), transactions);
        assert_eq!(load_categories(&storage).unwrap(), categories);
    }

    #[test]
    fn test_empty_category_list_is_kept() {
        let mut storage = MemoryStorage::new();
        save_categories(&mut storage, &[]).unwrap();

        // Only absent or malformed data triggers the default seed
        assert!(load_categories(&storage).unwrap().is_empty());
    }
}
