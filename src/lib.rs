// Finance Tracker - Core Library
// Exposes all modules for use in the CLI, the TUI dashboard, and tests

pub mod aggregator;
pub mod config;
pub mod db;
pub mod entities;
pub mod export;
pub mod pdf;
pub mod query;
pub mod store;

// Re-export commonly used types
pub use aggregator::{
    category_breakdown, format_currency, monthly_series, monthly_series_now, totals,
    CategoryData, MonthlyData, Totals, DEFAULT_MONTH_COUNT,
};
pub use config::Config;
pub use db::{LocalStorage, MemoryStorage, SqliteStorage, CATEGORIES_KEY, TRANSACTIONS_KEY};
pub use entities::{
    default_categories, Category, CategoryDraft, CategoryUpdate, Transaction, TransactionDraft,
    TransactionKind, TransactionUpdate, DEFAULT_CATEGORY_COLOR,
};
pub use export::{
    csv_file_name, export_csv, export_pdf, finance_report_pdf, import_csv, import_csv_file,
    transactions_to_csv, REPORT_FILE_NAME,
};
pub use pdf::PdfDocument;
pub use query::{Sort, SortField, SortOrder, TransactionFilter};
pub use store::{FinanceStore, IdGenerator, SequentialIds, UuidGenerator};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
