// 📒 Finance Store - the explicit owner of transactions and categories
//
// Every mutation builds the next list, persists it through the injected
// `LocalStorage`, and only then swaps it in. A failed write leaves the store
// exactly as it was.
//
// Logical no-ops (incomplete drafts or updates, unknown ids) are not errors;
// the `Result` only carries storage failures.

use anyhow::Result;
use chrono::Utc;
use log::{debug, info};

use crate::db::{self, LocalStorage};
use crate::entities::{
    Category, CategoryDraft, CategoryUpdate, Transaction, TransactionDraft, TransactionKind,
    TransactionUpdate,
};

// ============================================================================
// ID GENERATION
// ============================================================================

pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

/// Random UUID v4 ids (the default)
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&mut self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Predictable ids (`<prefix>-1`, `<prefix>-2`, ...) for tests and fixtures
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: &str) -> Self {
        SequentialIds {
            prefix: prefix.to_string(),
            next: 1,
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

// ============================================================================
// STORE
// ============================================================================

pub struct FinanceStore<S: LocalStorage> {
    storage: S,
    ids: Box<dyn IdGenerator>,
    transactions: Vec<Transaction>,
    categories: Vec<Category>,
}

impl<S: LocalStorage> FinanceStore<S> {
    /// Restore both lists from storage, using UUID ids for new records
    pub fn open(storage: S) -> Result<Self> {
        Self::with_id_generator(storage, Box::new(UuidGenerator))
    }

    pub fn with_id_generator(storage: S, ids: Box<dyn IdGenerator>) -> Result<Self> {
        let transactions = db::load_transactions(&storage)?;
        let categories = db::load_categories(&storage)?;

        info!(
            "Loaded {} transactions and {} categories",
            transactions.len(),
            categories.len()
        );

        Ok(FinanceStore {
            storage,
            ids,
            transactions,
            categories,
        })
    }

    // ------------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------------

    /// Newest-first by insertion
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn transaction(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|tx| tx.id == id)
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn categories_of(&self, kind: TransactionKind) -> Vec<&Category> {
        self.categories.iter().filter(|c| c.kind == kind).collect()
    }

    /// Transactions whose free-text category equals `name`
    pub fn transactions_using_category(&self, name: &str) -> usize {
        self.transactions.iter().filter(|tx| tx.category == name).count()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    // ------------------------------------------------------------------------
    // Transaction mutations
    // ------------------------------------------------------------------------

    /// Prepend a new transaction; `None` when the draft is incomplete
    pub fn add_transaction(&mut self, draft: TransactionDraft) -> Result<Option<Transaction>> {
        if !draft.is_complete() {
            debug!("Dropping incomplete transaction draft");
            return Ok(None);
        }

        let tx = Transaction::from_draft(self.ids.next_id(), draft, Utc::now());
        let mut next = Vec::with_capacity(self.transactions.len() + 1);
        next.push(tx.clone());
        next.extend(self.transactions.iter().cloned());
        self.commit_transactions(next)?;

        debug!("Added transaction {}", tx.id);
        Ok(Some(tx))
    }

    /// Returns false when no transaction has this id or a present field is blank
    pub fn update_transaction(&mut self, id: &str, update: &TransactionUpdate) -> Result<bool> {
        if !update.is_complete() {
            debug!("Dropping transaction update with a blank field");
            return Ok(false);
        }

        let index = match self.transactions.iter().position(|tx| tx.id == id) {
            Some(index) => index,
            None => return Ok(false),
        };

        let mut next = self.transactions.clone();
        update.apply_to(&mut next[index]);
        self.commit_transactions(next)?;

        debug!("Updated transaction {}", id);
        Ok(true)
    }

    pub fn delete_transaction(&mut self, id: &str) -> Result<bool> {
        if !self.transactions.iter().any(|tx| tx.id == id) {
            return Ok(false);
        }

        let next: Vec<Transaction> = self.transactions.iter().filter(|tx| tx.id != id).cloned().collect();
        self.commit_transactions(next)?;

        debug!("Deleted transaction {}", id);
        Ok(true)
    }

    // ------------------------------------------------------------------------
    // Category mutations
    // ------------------------------------------------------------------------

    /// Append a new category; `None` when the name is blank
    pub fn add_category(&mut self, draft: CategoryDraft) -> Result<Option<Category>> {
        if !draft.is_complete() {
            debug!("Dropping category draft without a name");
            return Ok(None);
        }

        let category = Category::from_draft(self.ids.next_id(), draft);
        let mut next = self.categories.clone();
        next.push(category.clone());
        self.commit_categories(next)?;

        debug!("Added category {} ({})", category.name, category.id);
        Ok(Some(category))
    }

    /// Returns false when no category has this id or the new name is blank
    pub fn update_category(&mut self, id: &str, update: &CategoryUpdate) -> Result<bool> {
        if !update.is_complete() {
            debug!("Dropping category update with a blank name");
            return Ok(false);
        }

        let index = match self.categories.iter().position(|c| c.id == id) {
            Some(index) => index,
            None => return Ok(false),
        };

        let mut next = self.categories.clone();
        update.apply_to(&mut next[index]);
        self.commit_categories(next)?;

        debug!("Updated category {}", id);
        Ok(true)
    }

    pub fn delete_category(&mut self, id: &str) -> Result<bool> {
        if !self.categories.iter().any(|c| c.id == id) {
            return Ok(false);
        }

        let next: Vec<Category> = self.categories.iter().filter(|c| c.id != id).cloned().collect();
        self.commit_categories(next)?;

        debug!("Deleted category {}", id);
        Ok(true)
    }

    // The in-memory list only changes once storage accepted the new one

    fn commit_transactions(&mut self, next: Vec<Transaction>) -> Result<()> {
        db::save_transactions(&mut self.storage, &next)?;
        self.transactions = next;
        Ok(())
    }

    fn commit_categories(&mut self, next: Vec<Category>) -> Result<()> {
        db::save_categories(&mut self.storage, &next)?;
        self.categories = next;
        Ok(())
    }
}
