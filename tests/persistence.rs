// End-to-end checks: SQLite-backed store survives reopen, export feeds import

use chrono::NaiveDate;
use finance_tracker::{
    export_csv, export_pdf, import_csv_file, totals, CategoryDraft, FinanceStore, LocalStorage,
    SequentialIds, SqliteStorage, TransactionDraft, TransactionKind, TRANSACTIONS_KEY,
};
use rust_decimal::Decimal;
use tempfile::TempDir;

fn draft(kind: TransactionKind, cents: i64, category: &str, description: &str, day: u32) -> TransactionDraft {
    TransactionDraft {
        kind,
        amount: Decimal::new(cents, 2),
        category: category.to_string(),
        description: description.to_string(),
        date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
    }
}

#[test]
fn test_store_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("nested").join("finance.db");

    let kept_id = {
        let storage = SqliteStorage::open(&db_path).unwrap();
        let mut store =
            FinanceStore::with_id_generator(storage, Box::new(SequentialIds::new("t"))).unwrap();

        let kept = store
            .add_transaction(draft(TransactionKind::Income, 250000, "Salary", "March pay", 1))
            .unwrap()
            .unwrap();
        let dropped = store
            .add_transaction(draft(TransactionKind::Expense, 1299, "Entertainment", "Cinema", 4))
            .unwrap()
            .unwrap();
        assert!(store.delete_transaction(&dropped.id).unwrap());

        store
            .add_category(CategoryDraft::named("Pets", TransactionKind::Expense))
            .unwrap()
            .unwrap();

        kept.id
    };

    let storage = SqliteStorage::open(&db_path).unwrap();
    assert!(storage.get_item(TRANSACTIONS_KEY).unwrap().is_some());

    let store = FinanceStore::open(storage).unwrap();
    assert_eq!(store.transactions().len(), 1);
    assert_eq!(store.transactions()[0].id, kept_id);
    assert_eq!(store.transactions()[0].description, "March pay");
    assert_eq!(store.categories().len(), 9);
    assert_eq!(store.categories()[8].name, "Pets");
}

#[test]
fn test_exported_csv_imports_into_fresh_store() {
    let dir = TempDir::new().unwrap();
    let today = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();

    let mut source = FinanceStore::open(SqliteStorage::open_in_memory().unwrap()).unwrap();
    source
        .add_transaction(draft(TransactionKind::Income, 250000, "Salary", "March pay", 1))
        .unwrap();
    source
        .add_transaction(draft(TransactionKind::Expense, 4550, "Food & Dining", "Dinner, \"Luigi's\"", 8))
        .unwrap();

    let csv_path = export_csv(dir.path(), source.transactions(), today).unwrap();
    assert!(csv_path.ends_with("transactions-2024-03-31.csv"));

    let drafts = import_csv_file(&csv_path).unwrap();
    assert_eq!(drafts.len(), 2);

    let mut target = FinanceStore::open(SqliteStorage::open_in_memory().unwrap()).unwrap();
    // File is newest-first; add oldest first so the newest lands on top again
    for d in drafts.into_iter().rev() {
        target.add_transaction(d).unwrap();
    }

    assert_eq!(target.transactions()[0].description, "Dinner, \"Luigi's\"");
    assert_eq!(target.transactions()[1].description, "March pay");
    assert_eq!(totals(target.transactions()), totals(source.transactions()));
}

#[test]
fn test_pdf_report_written_to_disk() {
    let dir = TempDir::new().unwrap();
    let today = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();

    let mut store = FinanceStore::open(SqliteStorage::open_in_memory().unwrap()).unwrap();
    store
        .add_transaction(draft(TransactionKind::Expense, 8000, "Transportation", "Fuel", 12))
        .unwrap();

    let path = export_pdf(dir.path(), store.transactions(), today).unwrap();
    let bytes = std::fs::read(&path).unwrap();

    assert!(path.ends_with("finance-report.pdf"));
    assert!(bytes.starts_with(b"%PDF-1.4"));
    assert!(bytes.ends_with(b"%%EOF\n"));
}
