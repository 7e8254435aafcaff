// Entity Models
//
// Each entity has:
// - Stable identity (id) that NEVER changes
// - Values the user can edit through a partial update
// - A draft type for data submitted before an id exists

pub mod category;
pub mod transaction;

pub use category::{default_categories, Category, CategoryDraft, CategoryUpdate, DEFAULT_CATEGORY_COLOR};
pub use transaction::{Transaction, TransactionDraft, TransactionKind, TransactionUpdate};
