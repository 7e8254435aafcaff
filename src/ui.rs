use anyhow::Result;
use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use finance_tracker::{
    category_breakdown, format_currency, monthly_series, query, totals, Category, CategoryData,
    MonthlyData, Sort, SortField, SortOrder, Totals, Transaction, TransactionFilter,
    TransactionKind,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{BarChart, Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use rust_decimal::prelude::ToPrimitive;
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    Transactions,
    Categories,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Dashboard => Page::Transactions,
            Page::Transactions => Page::Categories,
            Page::Categories => Page::Dashboard,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Dashboard => Page::Categories,
            Page::Transactions => Page::Dashboard,
            Page::Categories => Page::Transactions,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Transactions => "Transactions",
            Page::Categories => "Categories",
        }
    }
}

pub struct App {
    pub transactions: Vec<Transaction>,
    pub categories: Vec<Category>,
    pub filtered_transactions: Vec<Transaction>,
    pub state: TableState,
    pub current_page: Page,
    pub show_detail: bool,
    pub filter: TransactionFilter,
    pub sort: Sort,
    pub months: usize,
    pub today: NaiveDate,
}

impl App {
    pub fn new(
        transactions: Vec<Transaction>,
        categories: Vec<Category>,
        months: usize,
        today: NaiveDate,
    ) -> Self {
        let mut app = Self {
            transactions,
            categories,
            filtered_transactions: Vec::new(),
            state: TableState::default(),
            current_page: Page::Dashboard,
            show_detail: false,
            filter: TransactionFilter::default(),
            sort: Sort::default(),
            months,
            today,
        };
        app.refresh();
        app
    }

    /// Recompute the visible list and reset the selection to the first row
    fn refresh(&mut self) {
        self.filtered_transactions = query::apply(&self.transactions, &self.filter, self.sort);

        if !self.filtered_transactions.is_empty() {
            self.state.select(Some(0));
        } else {
            self.state.select(None);
        }
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    pub fn selected_transaction(&self) -> Option<&Transaction> {
        self.state.selected().and_then(|i| self.filtered_transactions.get(i))
    }

    pub fn filter_kind(&mut self, kind: Option<TransactionKind>) {
        self.filter.kind = kind;
        self.refresh();
    }

    /// Cycle through the category names present in the list, then back to "all"
    pub fn cycle_category(&mut self) {
        let mut names: Vec<&str> = self.transactions.iter().map(|tx| tx.category.as_str()).collect();
        names.sort();
        names.dedup();

        let next = match &self.filter.category {
            None => names.first().map(|n| n.to_string()),
            Some(current) => names
                .iter()
                .position(|n| n == current)
                .and_then(|i| names.get(i + 1))
                .map(|n| n.to_string()),
        };

        self.filter.category = next;
        self.refresh();
    }

    pub fn clear_filter(&mut self) {
        self.filter = TransactionFilter::default();
        self.refresh();
    }

    pub fn sort_by(&mut self, field: SortField) {
        self.sort = self.sort.select(field);
        self.refresh();
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
    }

    pub fn totals(&self) -> Totals {
        totals(&self.transactions)
    }

    pub fn monthly(&self) -> Vec<MonthlyData> {
        monthly_series(&self.transactions, self.months, self.today)
    }

    pub fn breakdown(&self, kind: TransactionKind) -> Vec<CategoryData> {
        category_breakdown(&self.transactions, &self.categories, kind)
    }

    pub fn next(&mut self) {
        let len = self.filtered_transactions.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i >= len - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.filtered_transactions.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let len = self.filtered_transactions.len();
        if len == 0 {
            return;
        }
        let i = self.state.selected().map_or(0, |i| (i + 20).min(len - 1));
        self.state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        if self.filtered_transactions.is_empty() {
            return;
        }
        let i = self.state.selected().map_or(0, |i| i.saturating_sub(20));
        self.state.select(Some(i));
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Enter => app.toggle_detail(),
                KeyCode::Tab => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        app.previous_page();
                    } else {
                        app.next_page();
                    }
                }
                KeyCode::BackTab => app.previous_page(),
                KeyCode::Char('1') => app.filter_kind(None),
                KeyCode::Char('2') => app.filter_kind(Some(TransactionKind::Income)),
                KeyCode::Char('3') => app.filter_kind(Some(TransactionKind::Expense)),
                KeyCode::Char('g') => app.cycle_category(),
                KeyCode::Char('c') => app.clear_filter(),
                KeyCode::Char('d') => app.sort_by(SortField::Date),
                KeyCode::Char('a') => app.sort_by(SortField::Amount),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::PageDown => app.page_down(),
                KeyCode::PageUp => app.page_up(),
                KeyCode::Home if !app.filtered_transactions.is_empty() => app.state.select(Some(0)),
                KeyCode::End if !app.filtered_transactions.is_empty() => {
                    app.state.select(Some(app.filtered_transactions.len() - 1));
                }
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.current_page {
        Page::Dashboard => render_dashboard(f, chunks[1], app),
        Page::Transactions if app.show_detail => {
            let content_chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(chunks[1]);

            render_table(f, content_chunks[0], app);
            render_detail_panel(f, content_chunks[1], app);
        }
        Page::Transactions => render_table(f, chunks[1], app),
        Page::Categories => render_categories(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2], app);
}

fn kind_color(kind: TransactionKind) -> Color {
    match kind {
        TransactionKind::Income => Color::Green,
        TransactionKind::Expense => Color::Red,
    }
}

fn header_style() -> Style {
    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
}

fn bordered(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(title)
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let summary = app.totals();

    let mut tab_spans = vec![];
    for (i, page) in [Page::Dashboard, Page::Transactions, Page::Categories].iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(page.title().to_string(), style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("↑ {}", format_currency(summary.income)),
        Style::default().fg(Color::Green),
    ));
    tab_spans.push(Span::raw("  "));
    tab_spans.push(Span::styled(
        format!("↓ {}", format_currency(summary.expenses)),
        Style::default().fg(Color::Red),
    ));
    tab_spans.push(Span::raw("  "));
    tab_spans.push(Span::styled(
        format!("= {}", format_currency(summary.net)),
        Style::default().fg(if summary.net.is_sign_negative() { Color::Red } else { Color::White }),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn render_dashboard(f: &mut Frame, area: Rect, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);
    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    let monthly = app.monthly();

    // Whole-dollar expenses per month for the bar chart
    let labels: Vec<String> = monthly.iter().map(|m| m.month.clone()).collect();
    let bars: Vec<(&str, u64)> = monthly
        .iter()
        .zip(&labels)
        .map(|(m, label)| (label.as_str(), m.expenses.trunc().to_u64().unwrap_or(0)))
        .collect();

    let chart = BarChart::default()
        .block(bordered(" Monthly Expenses "))
        .data(bars.as_slice())
        .bar_width(9)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Red))
        .value_style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD));
    f.render_widget(chart, top[0]);

    let trend_rows = monthly.iter().map(|m| {
        Row::new(vec![
            Cell::from(m.month.clone()),
            Cell::from(format_currency(m.income)).style(Style::default().fg(Color::Green)),
            Cell::from(format_currency(m.expenses)).style(Style::default().fg(Color::Red)),
            Cell::from(format_currency(m.net)),
        ])
    });
    let trend = Table::new(
        trend_rows,
        [
            Constraint::Length(10),
            Constraint::Length(14),
            Constraint::Length(14),
            Constraint::Length(14),
        ],
    )
    .header(Row::new(["Month", "Income", "Expenses", "Net"].map(|h| Cell::from(h).style(header_style()))))
    .block(bordered(" Monthly Trend "));
    f.render_widget(trend, top[1]);

    render_breakdown(f, bottom[0], app, TransactionKind::Expense, " Expenses by Category ");

    let recent_rows = query::recent(&app.transactions, 5).iter().map(|tx| {
        Row::new(vec![
            Cell::from(tx.date.format("%Y-%m-%d").to_string()),
            Cell::from(truncate(&tx.description, 24)),
            Cell::from(format!("{}{}", tx.kind.sign(), format_currency(tx.amount)))
                .style(Style::default().fg(kind_color(tx.kind))),
        ])
    });
    let recent = Table::new(
        recent_rows,
        [Constraint::Length(12), Constraint::Length(26), Constraint::Length(14)],
    )
    .block(bordered(" Recent Transactions "));
    f.render_widget(recent, bottom[1]);
}

fn render_breakdown(f: &mut Frame, area: Rect, app: &App, kind: TransactionKind, title: &str) {
    let rows = app.breakdown(kind).into_iter().take(5).map(|item| {
        Row::new(vec![
            Cell::from("■").style(Style::default().fg(hex_color(&item.color))),
            Cell::from(truncate(&item.name, 24)),
            Cell::from(format_currency(item.value)),
        ])
    });

    let table = Table::new(
        rows,
        [Constraint::Length(2), Constraint::Length(26), Constraint::Length(14)],
    )
    .block(bordered(title));
    f.render_widget(table, area);
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["Date", "Type", "Category", "Description", "Amount"]
        .iter()
        .map(|h| Cell::from(*h).style(header_style()));

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.filtered_transactions.iter().map(|tx| {
        let color = kind_color(tx.kind);

        let cells = vec![
            Cell::from(tx.date.format("%Y-%m-%d").to_string()),
            Cell::from(tx.kind.to_string()).style(Style::default().fg(color)),
            Cell::from(truncate(&tx.category, 20)),
            Cell::from(truncate(&tx.description, 30)),
            Cell::from(format!("{}{}", tx.kind.sign(), format_currency(tx.amount)))
                .style(Style::default().fg(color)),
        ];

        Row::new(cells).height(1)
    });

    let title = format!(" Transactions ({}) ", app.filtered_transactions.len());
    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(9),
            Constraint::Length(22),
            Constraint::Length(32),
            Constraint::Length(14),
        ],
    )
    .header(header)
    .block(bordered(&title))
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_categories(f: &mut Frame, area: Rect, app: &App) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    for (kind, half) in [TransactionKind::Income, TransactionKind::Expense].into_iter().zip(halves.iter()) {
        let rows = app.categories.iter().filter(|c| c.kind == kind).map(|c| {
            let used = app.transactions.iter().filter(|tx| tx.category == c.name).count();
            Row::new(vec![
                Cell::from("■").style(Style::default().fg(hex_color(&c.color))),
                Cell::from(truncate(&c.name, 22)),
                Cell::from(c.icon.clone()),
                Cell::from(format!("{}", used)),
            ])
        });

        let title = match kind {
            TransactionKind::Income => " Income Categories ",
            TransactionKind::Expense => " Expense Categories ",
        };

        let table = Table::new(
            rows,
            [
                Constraint::Length(2),
                Constraint::Length(24),
                Constraint::Length(16),
                Constraint::Length(6),
            ],
        )
        .header(Row::new(["", "Name", "Icon", "Used"].map(|h| Cell::from(h).style(header_style()))))
        .block(bordered(title));

        f.render_widget(table, *half);
    }
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);
    let total = app.filtered_transactions.len();

    let mut status_spans = vec![Span::styled(
        format!(" Row: {}/{} ", selected, total),
        Style::default().fg(Color::Cyan),
    )];

    let sort_name = match (app.sort.field, app.sort.order) {
        (SortField::Date, SortOrder::Desc) => "date ↓",
        (SortField::Date, SortOrder::Asc) => "date ↑",
        (SortField::Amount, SortOrder::Desc) => "amount ↓",
        (SortField::Amount, SortOrder::Asc) => "amount ↑",
    };
    status_spans.push(Span::raw(" | Sort: "));
    status_spans.push(Span::styled(sort_name, Style::default().fg(Color::Green)));

    // Show filter status if active
    if app.filter.is_active() {
        let mut parts = vec![];
        if let Some(kind) = app.filter.kind {
            parts.push(kind.to_string());
        }
        if let Some(category) = &app.filter.category {
            parts.push(category.clone());
        }
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(
            format!("Filter: {}", parts.join(", ")),
            Style::default().fg(Color::Green),
        ));
        status_spans.push(Span::raw(" ("));
        status_spans.push(Span::styled("c", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" clear)"));
    }

    for (key, label) in [
        ("1/2/3", " All/In/Out | "),
        ("g", " Category | "),
        ("d/a", " Sort | "),
        ("Tab", " Page | "),
        ("Enter", " Details | "),
    ] {
        status_spans.push(Span::styled(key, Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(label));
    }
    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Transaction Details ");

    let tx = match app.selected_transaction() {
        Some(t) => t,
        None => {
            f.render_widget(Paragraph::new("No transaction selected").block(block), area);
            return;
        }
    };

    let label = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let field = |name: &'static str, value: String| {
        vec![
            Line::from(vec![Span::styled(format!("  {}: ", name), label), Span::raw(value)]),
            Line::from(""),
        ]
    };

    let mut content = vec![Line::from("")];
    content.extend(field("Date", tx.date.format("%Y-%m-%d").to_string()));
    content.extend(field("Type", tx.kind.to_string()));
    content.extend(field("Amount", format!("{}{}", tx.kind.sign(), format_currency(tx.amount))));
    content.extend(field("Category", tx.category.clone()));
    content.extend(field("Created", tx.created_at.format("%Y-%m-%d %H:%M UTC").to_string()));
    content.extend(field("Id", tx.id.clone()));
    content.push(Line::from("  ─────────────────────────────────────"));
    content.push(Line::from(""));
    content.push(Line::from(vec![Span::styled(
        "  DESCRIPTION",
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    )]));
    content.push(Line::from(""));
    for line in wrap_text(&tx.description, 35) {
        content.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(line, Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC)),
        ]));
    }

    f.render_widget(Paragraph::new(content).block(block), area);
}

/// "#RRGGBB" → terminal color, gray when unparseable
fn hex_color(hex: &str) -> Color {
    let digits = hex.trim_start_matches('#');
    if digits.len() != 6 || !digits.is_ascii() {
        return Color::Gray;
    }

    match (
        u8::from_str_radix(&digits[0..2], 16),
        u8::from_str_radix(&digits[2..4], 16),
        u8::from_str_radix(&digits[4..6], 16),
    ) {
        (Ok(r), Ok(g), Ok(b)) => Color::Rgb(r, g, b),
        _ => Color::Gray,
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        if !current_line.is_empty() && current_line.len() + word.len() + 1 > width {
            lines.push(std::mem::take(&mut current_line));
        }
        if !current_line.is_empty() {
            current_line.push(' ');
        }
        current_line.push_str(word);
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    lines
}
