use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Gauge, List, ListItem, Paragraph, Row, Table, Tabs, Wrap},
    Frame,
};

use crate::budget::money::format_currency;
use crate::cli::state::{self, App};
use crate::cli::util;

pub fn draw(f: &mut Frame, app: &mut App) {
    let area = f.area();

    // top tabs | main content | bottom status line
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .split(area);

    let titles = ["Weeks", "Fixed", "AddExpense", "Help"]
        .into_iter()
        .map(|t| Line::from(Span::raw(t)))
        .collect::<Vec<_>>();
    let tabs = Tabs::new(titles)
        .select(match app.tab {
            state::Tab::Weeks => 0,
            state::Tab::Fixed => 1,
            state::Tab::AddWeekly => 2,
            state::Tab::Help => 3,
        })
        .block(Block::default().borders(Borders::ALL).title("Home Budget"))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD));
    f.render_widget(tabs, root[0]);

    match app.tab {
        state::Tab::Weeks => draw_weeks(f, root[1], app),
        state::Tab::Fixed => draw_fixed(f, root[1], app),
        state::Tab::AddWeekly => draw_add_weekly(f, root[1], app),
        state::Tab::Help => draw_help(f, root[1]),
    }

    let status = Paragraph::new(app.status.clone());
    f.render_widget(status, root[2]);

    if app.fixed.creating {
        let area = center_rect(root[1], 56, 12);
        f.render_widget(Clear, area);
        draw_fixed_modal(f, area, app);
    }
    if app.weeks.editing_income {
        let area = center_rect(root[1], 46, 6);
        f.render_widget(Clear, area);
        draw_income_modal(f, area, app);
    }
}

// Weeks page

fn draw_weeks(f: &mut Frame, area: Rect, app: &mut App) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(cols[0]);

    let remainder = app.weeks.income - app.weeks.fixed_total;
    let summary = Paragraph::new(format!(
        "Income      : {}\nFixed total : {}\nRemainder   : {}\nBase / week : {}",
        format_currency(app.weeks.income),
        format_currency(app.weeks.fixed_total),
        format_currency(remainder),
        format_currency(app.weeks.allocations[0].base_allocation),
    ))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Month  (i=set income, ←/→ week, a=add, c/C=clear, x=delete)"),
    );
    f.render_widget(summary, left[0]);

    for (i, alloc) in app.weeks.allocations.iter().enumerate() {
        let pct = alloc.available_percent();
        let color = if pct >= 70.0 {
            Color::Green
        } else if pct >= 40.0 {
            Color::Yellow
        } else {
            Color::Red
        };

        let marker = if i == app.weeks.selected_week { " ◀" } else { "" };
        let title = format!("Week {}{}", i + 1, marker);
        let label = format!(
            "{} of {}",
            format_currency(alloc.available),
            format_currency(alloc.effective_allocation)
        );

        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title(title))
            .gauge_style(Style::default().fg(color))
            .ratio(pct / 100.0)
            .label(label);
        f.render_widget(gauge, left[i + 1]);
    }

    // expense list for the selected week
    let alloc = &app.weeks.allocations[app.weeks.selected_week];
    let items: Vec<ListItem> = app
        .current_week_expenses()
        .iter()
        .map(|e| {
            ListItem::new(Line::from(format!(
                "{}  {}  ({})",
                e.description,
                format_currency(e.amount),
                util::iso(&e.date)
            )))
        })
        .collect();

    let title = format!(
        "Week {} expenses — spent {}, carries {} forward",
        app.weeks.selected_week + 1,
        format_currency(alloc.spent),
        format_currency(alloc.deficit_carried_to_next),
    );
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    f.render_stateful_widget(list, cols[1], &mut app.weeks.sel);
}

fn draw_income_modal(f: &mut Frame, area: Rect, app: &App) {
    let lines = vec![
        format!("Total income: {}", app.weeks.income_input.value),
        "".into(),
        "Enter: save | Esc: cancel".into(),
    ]
    .join("\n");

    let p = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Set Income"));
    f.render_widget(p, area);
}

// Fixed expenses page

fn draw_fixed(f: &mut Frame, area: Rect, app: &mut App) {
    let header = Row::new(vec!["Date", "Description", "Amount", "Status", "Notes"]).height(1);

    let body: Vec<Row> = app
        .fixed
        .list
        .iter()
        .map(|e| {
            Row::new(vec![
                Cell::from(util::iso(&e.date)),
                Cell::from(e.description.clone()),
                Cell::from(format_currency(e.amount)),
                Cell::from(format!("{:?}", e.status)),
                Cell::from(e.notes.clone().unwrap_or_default()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Percentage(35),
        Constraint::Length(14),
        Constraint::Length(9),
        Constraint::Percentage(30),
    ];

    let mut sel = app.fixed.sel.clone();
    let table = Table::new(body, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Fixed Expenses  (n=new, p=toggle paid, x=delete, r=refresh, b=back)"),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    f.render_stateful_widget(table, area, &mut sel);
    app.fixed.sel = sel;
}

fn draw_fixed_modal(f: &mut Frame, area: Rect, app: &mut App) {
    use crate::cli::state::FixedField;

    let form = &app.fixed.form;
    let marker = |field: FixedField| if form.focus == field { "  <editing>" } else { "" };

    let lines = vec![
        format!("Description : {}{}", form.description.value, marker(FixedField::Description)),
        format!("Amount      : {}{}", form.amount.value, marker(FixedField::Amount)),
        format!("Date        : {}{}", form.date.value, marker(FixedField::Date)),
        format!("Notes       : {}{}", form.notes.value, marker(FixedField::Notes)),
        "".into(),
        "TAB: switch field | Enter: create | Esc: cancel".into(),
        form.error.clone().unwrap_or_default(),
    ]
    .join("\n");

    let p = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("New Fixed Expense"));
    f.render_widget(p, area);
}

// Add weekly expense page

fn draw_add_weekly(f: &mut Frame, area: Rect, app: &mut App) {
    use crate::cli::state::WeeklyField;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(8)])
        .split(area);

    let (m_desc, m_amount, m_date) = match app.add.editing {
        Some(WeeklyField::Description) => ("  <editing>", "", ""),
        Some(WeeklyField::Amount) => ("", "  <editing>", ""),
        Some(WeeklyField::Date) => ("", "", "  <editing>"),
        None => ("", "", ""),
    };

    let form_lines = vec![
        format!("Week        : {}  (←/→ to change)", app.add.week),
        format!("Description : {}{}", app.add.description.value, m_desc),
        format!("Amount      : {}{}", app.add.amount.value, m_amount),
        format!("Date        : {}{}", app.add.date.value, m_date),
    ]
    .join("\n");

    let form_p = Paragraph::new(form_lines)
        .block(Block::default().borders(Borders::ALL).title("Add Weekly Expense"));
    f.render_widget(form_p, chunks[0]);

    let help_lines = vec![
        "Controls:".into(),
        "  d/a/t: edit Description/Amount/Date".into(),
        "  Tab: next field (while editing)".into(),
        "  Enter or s: save | Esc: back".into(),
        "  Amounts accept localized input, e.g. $1.234,50".into(),
        String::new(),
        if let Some(err) = &app.add.error {
            format!("Error: {err}")
        } else if let Some(ok) = &app.add.success {
            format!("Success: {ok}")
        } else {
            String::new()
        },
    ]
    .join("\n");

    let help_p = Paragraph::new(help_lines)
        .block(Block::default().borders(Borders::ALL).title("Help & Status"))
        .wrap(Wrap { trim: true });
    f.render_widget(help_p, chunks[1]);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let help_text = vec![
        "Global Keys:",
        "  q        : Quit App",
        "  ?        : Open this Help tab",
        "",
        "Weeks Tab:",
        "  Left/Right : Select week",
        "  Up/Down    : Navigate the week's expenses",
        "  i          : Set total monthly income",
        "  a          : Add an expense to the selected week",
        "  x/Del      : Delete selected expense",
        "  c          : Clear the selected week",
        "  C          : Clear all weeks",
        "  r          : Refresh",
        "  f/Tab      : Go to Fixed Expenses",
        "",
        "Fixed Tab:",
        "  Up/Down  : Navigate list",
        "  n        : New fixed expense",
        "  p        : Toggle Pending/Paid",
        "  x/Del    : Delete selected expense",
        "  r        : Refresh",
        "  b/Esc    : Back to Weeks",
        "",
        "Add Expense Tab:",
        "  Left/Right : Change target week",
        "  d/a/t      : Edit Description/Amount/Date",
        "  Enter / s  : Save",
        "  Esc        : Back to Weeks",
    ]
    .join("\n");

    let p = Paragraph::new(help_text)
        .block(Block::default().borders(Borders::ALL).title("Help & Keybindings"));

    f.render_widget(p, area);
}

fn center_rect(rect: Rect, w: u16, h: u16) -> Rect {
    let x = rect.x + rect.width.saturating_sub(w) / 2;
    let y = rect.y + rect.height.saturating_sub(h) / 2;
    Rect {
        x,
        y,
        width: w.min(rect.width),
        height: h.min(rect.height),
    }
}
