// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};

// Use library instead of local modules
use finance_tracker::{
    category_breakdown, export_csv, export_pdf, format_currency, import_csv_file, monthly_series,
    query, totals, CategoryDraft, CategoryUpdate, Config, FinanceStore, Sort, SortField,
    SortOrder, SqliteStorage, Transaction, TransactionDraft, TransactionFilter, TransactionKind,
    TransactionUpdate,
};

// ============================================================================
// CLI DEFINITION
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "finance-tracker", version, about = "Track income and expenses, view dashboards, export reports")]
struct Cli {
    /// SQLite file holding the data (overrides FINANCE_TRACKER_DB)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a new transaction
    Add {
        kind: KindArg,

        #[arg(long, value_parser = parse_amount)]
        amount: Decimal,

        #[arg(long)]
        category: String,

        #[arg(long)]
        description: String,

        /// yyyy-mm-dd (defaults to today)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },

    /// Change fields of an existing transaction
    Edit {
        id: String,

        #[arg(long)]
        kind: Option<KindArg>,

        #[arg(long, value_parser = parse_amount)]
        amount: Option<Decimal>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },

    /// Remove a transaction
    Delete { id: String },

    /// List transactions
    List {
        /// Matches description or category (case-insensitive)
        #[arg(long)]
        search: Option<String>,

        #[arg(long)]
        kind: Option<KindArg>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long, value_enum, default_value_t = SortArg::Date)]
        sort: SortArg,

        #[arg(long, value_enum, default_value_t = OrderArg::Desc)]
        order: OrderArg,

        #[arg(long)]
        limit: Option<usize>,
    },

    /// Totals, monthly trend and category breakdown
    Dashboard {
        /// Trailing months in the trend (overrides FINANCE_TRACKER_MONTHS)
        #[arg(long)]
        months: Option<usize>,
    },

    /// Manage categories
    Category {
        #[command(subcommand)]
        action: CategoryCommand,
    },

    /// Write transactions-<date>.csv or finance-report.pdf
    Export {
        format: ExportFormat,

        /// Output directory (overrides FINANCE_TRACKER_EXPORT_DIR)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Add every row of a previously exported CSV
    Import { file: PathBuf },

    /// Interactive terminal dashboard
    Ui,
}

#[derive(Subcommand, Debug)]
enum CategoryCommand {
    List,

    Add {
        name: String,

        #[arg(long)]
        kind: KindArg,

        #[arg(long, default_value = "#EF4444")]
        color: String,

        #[arg(long, default_value = "Tag")]
        icon: String,
    },

    Edit {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        kind: Option<KindArg>,

        #[arg(long)]
        color: Option<String>,

        #[arg(long)]
        icon: Option<String>,
    },

    Delete { id: String },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum KindArg {
    Income,
    Expense,
}

impl From<KindArg> for TransactionKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Income => TransactionKind::Income,
            KindArg::Expense => TransactionKind::Expense,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum SortArg {
    Date,
    Amount,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OrderArg {
    Asc,
    Desc,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ExportFormat {
    Csv,
    Pdf,
}

fn parse_amount(raw: &str) -> std::result::Result<Decimal, String> {
    let amount: Decimal = raw
        .trim()
        .parse()
        .map_err(|e| format!("invalid amount '{}': {}", raw, e))?;

    if amount.is_sign_negative() && !amount.is_zero() {
        return Err("amount must not be negative; use the income/expense type instead".to_string());
    }

    Ok(amount)
}

fn parse_date(raw: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{}' (expected yyyy-mm-dd): {}", raw, e))
}

// ============================================================================
// ENTRY POINT
// ============================================================================

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(db) = cli.db {
        config.db_path = db;
    }

    let storage = SqliteStorage::open(&config.db_path)?;
    let mut store = FinanceStore::open(storage)
        .with_context(|| format!("Failed to load data from {}", config.db_path.display()))?;

    match cli.command {
        Some(Command::Add { kind, amount, category, description, date }) => {
            let draft = TransactionDraft {
                kind: kind.into(),
                amount,
                category,
                description,
                date: date.unwrap_or_else(today),
            };
            match store.add_transaction(draft)? {
                Some(tx) => println!("✓ Added {} {} ({})", tx.kind, format_currency(tx.amount), tx.id),
                None => println!("⚠️  Nothing added: category and description are required"),
            }
        }
        Some(Command::Edit { id, kind, amount, category, description, date }) => {
            let update = TransactionUpdate {
                kind: kind.map(Into::into),
                amount,
                category,
                description,
                date,
            };
            if update.is_empty() {
                println!("⚠️  Nothing to change");
            } else if !update.is_complete() {
                println!("⚠️  Nothing changed: category and description must not be blank");
            } else if store.update_transaction(&id, &update)? {
                println!("✓ Updated transaction {}", id);
            } else {
                println!("⚠️  No transaction with id {}", id);
            }
        }
        Some(Command::Delete { id }) => {
            if store.delete_transaction(&id)? {
                println!("✓ Deleted transaction {}", id);
            } else {
                println!("⚠️  No transaction with id {}", id);
            }
        }
        Some(Command::List { search, kind, category, sort, order, limit }) => {
            let filter = TransactionFilter {
                search,
                kind: kind.map(Into::into),
                category,
            };
            let sort = Sort {
                field: match sort {
                    SortArg::Date => SortField::Date,
                    SortArg::Amount => SortField::Amount,
                },
                order: match order {
                    OrderArg::Asc => SortOrder::Asc,
                    OrderArg::Desc => SortOrder::Desc,
                },
            };
            run_list(store.transactions(), &filter, sort, limit);
        }
        Some(Command::Dashboard { months }) => {
            run_dashboard(&store, months.unwrap_or(config.dashboard_months));
        }
        Some(Command::Category { action }) => run_category(&mut store, action)?,
        Some(Command::Export { format, out }) => {
            let dir = out.unwrap_or(config.export_dir);
            let path = match format {
                ExportFormat::Csv => export_csv(&dir, store.transactions(), today())?,
                ExportFormat::Pdf => export_pdf(&dir, store.transactions(), today())?,
            };
            println!("📄 Exported {} transactions to {}", store.transactions().len(), path.display());
        }
        Some(Command::Import { file }) => run_import(&mut store, &file)?,
        Some(Command::Ui) | None => run_ui_mode(&store, config.dashboard_months)?,
    }

    Ok(())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

// ============================================================================
// COMMANDS
// ============================================================================

fn print_transaction(tx: &Transaction) {
    println!(
        "{}  {:<8} {:>14}  {:<20} {}  [{}]",
        tx.date.format("%Y-%m-%d"),
        tx.kind,
        format!("{}{}", tx.kind.sign(), format_currency(tx.amount)),
        tx.category,
        tx.description,
        tx.id
    );
}

fn run_list(transactions: &[Transaction], filter: &TransactionFilter, sort: Sort, limit: Option<usize>) {
    let result = query::apply(transactions, filter, sort);
    let shown = limit.unwrap_or(result.len()).min(result.len());

    println!("📋 {} transactions", result.len());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    if result.is_empty() {
        println!("No transactions found");
        if filter.is_active() {
            println!("Try adjusting your filters");
        }
        return;
    }

    for tx in &result[..shown] {
        print_transaction(tx);
    }
}

fn run_dashboard<S: finance_tracker::LocalStorage>(store: &FinanceStore<S>, months: usize) {
    let transactions = store.transactions();
    let summary = totals(transactions);

    println!("📊 Dashboard");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("  Total Income:   {:>14}", format_currency(summary.income));
    println!("  Total Expenses: {:>14}", format_currency(summary.expenses));
    println!("  Net Balance:    {:>14}", format_currency(summary.net));

    println!("\n📈 Monthly Trend");
    println!("  {:<10} {:>14} {:>14} {:>14}", "Month", "Income", "Expenses", "Net");
    for month in monthly_series(transactions, months, today()) {
        println!(
            "  {:<10} {:>14} {:>14} {:>14}",
            month.month,
            format_currency(month.income),
            format_currency(month.expenses),
            format_currency(month.net)
        );
    }

    for (title, kind) in [
        ("💸 Top Expense Categories", TransactionKind::Expense),
        ("💰 Top Income Sources", TransactionKind::Income),
    ] {
        println!("\n{}", title);
        let breakdown = category_breakdown(transactions, store.categories(), kind);
        if breakdown.is_empty() {
            println!("  (none)");
        }
        for item in breakdown.iter().take(5) {
            println!("  {:<24} {:>14}  {}", item.name, format_currency(item.value), item.color);
        }
    }

    println!("\n🕒 Recent Transactions");
    for tx in query::recent(transactions, 5) {
        print_transaction(tx);
    }
}

fn warn_orphaned<S: finance_tracker::LocalStorage>(store: &FinanceStore<S>, name: &str) {
    let count = store.transactions_using_category(name);
    if count > 0 {
        println!(
            "⚠️  {} transactions still use the category name '{}' (they are not updated)",
            count, name
        );
    }
}

fn run_category<S: finance_tracker::LocalStorage>(
    store: &mut FinanceStore<S>,
    action: CategoryCommand,
) -> Result<()> {
    match action {
        CategoryCommand::List => {
            for kind in [TransactionKind::Income, TransactionKind::Expense] {
                println!("🏷️  {} categories", kind);
                for category in store.categories_of(kind) {
                    println!(
                        "  {:<24} {}  {:<16} [{}]",
                        category.name, category.color, category.icon, category.id
                    );
                }
            }
        }
        CategoryCommand::Add { name, kind, color, icon } => {
            let draft = CategoryDraft {
                name,
                kind: kind.into(),
                color,
                icon,
            };
            match store.add_category(draft)? {
                Some(category) => println!("✓ Added category {} ({})", category.name, category.id),
                None => println!("⚠️  Nothing added: a category name is required"),
            }
        }
        CategoryCommand::Edit { id, name, kind, color, icon } => {
            let old_name = store.category(&id).map(|c| c.name.clone());
            let renamed = name.is_some() && name != old_name;

            let update = CategoryUpdate {
                name,
                kind: kind.map(Into::into),
                color,
                icon,
            };

            if !update.is_complete() {
                println!("⚠️  Nothing changed: a category name must not be blank");
            } else if store.update_category(&id, &update)? {
                println!("✓ Updated category {}", id);
                if let (true, Some(old_name)) = (renamed, old_name) {
                    warn_orphaned(store, &old_name);
                }
            } else {
                println!("⚠️  No category with id {}", id);
            }
        }
        CategoryCommand::Delete { id } => {
            let name = store.category(&id).map(|c| c.name.clone());
            if store.delete_category(&id)? {
                println!("✓ Deleted category {}", id);
                if let Some(name) = name {
                    warn_orphaned(store, &name);
                }
            } else {
                println!("⚠️  No category with id {}", id);
            }
        }
    }

    Ok(())
}

fn run_import<S: finance_tracker::LocalStorage>(store: &mut FinanceStore<S>, file: &Path) -> Result<()> {
    println!("📂 Loading CSV...");
    let drafts = import_csv_file(file)?;
    println!("✓ Read {} rows from {}", drafts.len(), file.display());

    let mut added = 0;
    let mut skipped = 0;

    // Oldest rows first so the newest ends up at the top of the list
    for draft in drafts.into_iter().rev() {
        match store.add_transaction(draft)? {
            Some(_) => added += 1,
            None => skipped += 1,
        }
    }

    println!("✓ Imported: {} transactions", added);
    if skipped > 0 {
        println!("⚠️  Skipped incomplete rows: {}", skipped);
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode<S: finance_tracker::LocalStorage>(store: &FinanceStore<S>, months: usize) -> Result<()> {
    println!("🖥️  Loading Finance Tracker UI...\n");

    let mut app = ui::App::new(
        store.transactions().to_vec(),
        store.categories().to_vec(),
        months,
        today(),
    );
    ui::run_ui(&mut app)?;

    println!("\n✅ UI closed successfully");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode<S: finance_tracker::LocalStorage>(store: &FinanceStore<S>, months: usize) -> Result<()> {
    eprintln!("TUI mode not available (rebuild with --features tui); showing the dashboard instead\n");
    run_dashboard(store, months);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("12.50").unwrap(), Decimal::new(1250, 2));
        assert_eq!(parse_amount(" 0 ").unwrap(), Decimal::ZERO);
        assert!(parse_amount("-1").is_err());
        assert!(parse_amount("ten").is_err());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2026-10-19").unwrap(),
            NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
        );
        assert!(parse_date("10/19/2026").is_err());
    }

    #[test]
    fn test_cli_parses_add() {
        let cli = Cli::try_parse_from([
            "finance-tracker",
            "add",
            "expense",
            "--amount",
            "45.99",
            "--category",
            "Food & Dining",
            "--description",
            "Lunch",
            "--date",
            "2024-12-31",
        ])
        .unwrap();

        match cli.command {
            Some(Command::Add { kind, amount, date, .. }) => {
                assert_eq!(TransactionKind::from(kind), TransactionKind::Expense);
                assert_eq!(amount, Decimal::new(4599, 2));
                assert_eq!(date, NaiveDate::from_ymd_opt(2024, 12, 31));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_rejects_negative_amount() {
        let result = Cli::try_parse_from([
            "finance-tracker", "add", "income", "--amount", "-5", "--category", "Salary",
            "--description", "x",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_verify() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
