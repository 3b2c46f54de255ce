// src/cli/state.rs
use std::collections::BTreeMap;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::widgets::{ListState, TableState};
use rust_decimal::Decimal;

use crate::budget::{money, WeekAllocation, WEEKS_PER_MONTH};
use crate::cli::api::Client;
use crate::cli::input::LineEdit;
use crate::cli::util;
use crate::database::models::{FixedExpense, WeeklyExpense};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Weeks,
    Fixed,
    AddWeekly,
    Help,
}

#[derive(Default)]
pub struct WeeksPage {
    pub allocations: [WeekAllocation; WEEKS_PER_MONTH],
    pub expenses: BTreeMap<u8, Vec<WeeklyExpense>>,
    pub income: Decimal,
    pub fixed_total: Decimal,
    pub selected_week: usize,
    pub sel: ListState,
    pub editing_income: bool,
    pub income_input: LineEdit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixedField {
    Description,
    Amount,
    Date,
    Notes,
}

impl Default for FixedField {
    fn default() -> Self {
        FixedField::Description
    }
}

#[derive(Default, Clone)]
pub struct FixedForm {
    pub description: LineEdit,
    pub amount: LineEdit,
    pub date: LineEdit,
    pub notes: LineEdit,
    pub focus: FixedField,
    pub error: Option<String>,
}

impl FixedForm {
    fn field_mut(&mut self) -> &mut LineEdit {
        match self.focus {
            FixedField::Description => &mut self.description,
            FixedField::Amount => &mut self.amount,
            FixedField::Date => &mut self.date,
            FixedField::Notes => &mut self.notes,
        }
    }

    fn next_field(&mut self) {
        use FixedField::*;
        self.focus = match self.focus {
            Description => Amount,
            Amount => Date,
            Date => Notes,
            Notes => Description,
        };
    }

    fn prev_field(&mut self) {
        use FixedField::*;
        self.focus = match self.focus {
            Description => Notes,
            Amount => Description,
            Date => Amount,
            Notes => Date,
        };
    }
}

#[derive(Default)]
pub struct FixedPage {
    pub list: Vec<FixedExpense>,
    pub sel: TableState,
    pub creating: bool,
    pub form: FixedForm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeeklyField {
    Description,
    Amount,
    Date,
}

#[derive(Default, Clone)]
pub struct AddWeeklyForm {
    pub week: u8,
    pub description: LineEdit,
    pub amount: LineEdit,
    pub date: LineEdit,
    pub editing: Option<WeeklyField>,
    pub error: Option<String>,
    pub success: Option<String>,
}

impl AddWeeklyForm {
    fn field_mut(&mut self, field: WeeklyField) -> &mut LineEdit {
        match field {
            WeeklyField::Description => &mut self.description,
            WeeklyField::Amount => &mut self.amount,
            WeeklyField::Date => &mut self.date,
        }
    }
}

fn next_weekly_field(f: WeeklyField) -> WeeklyField {
    use WeeklyField::*;
    match f {
        Description => Amount,
        Amount => Date,
        Date => Description,
    }
}

fn prev_weekly_field(f: WeeklyField) -> WeeklyField {
    use WeeklyField::*;
    match f {
        Description => Date,
        Amount => Description,
        Date => Amount,
    }
}

pub struct App {
    pub api: Client,
    pub tab: Tab,
    pub status: String,
    pub quit: bool,
    pub weeks: WeeksPage,
    pub fixed: FixedPage,
    pub add: AddWeeklyForm,
}

impl App {
    pub fn new(api: Client) -> Self {
        let mut add = AddWeeklyForm::default();
        add.week = 1;
        add.date.set(util::iso(&util::today()));

        Self {
            api,
            tab: Tab::Weeks,
            status: "Press ? for help | q to quit".into(),
            quit: false,
            weeks: WeeksPage::default(),
            fixed: FixedPage::default(),
            add,
        }
    }

    /*==========Refresh===========*/

    pub async fn refresh_weeks(&mut self) {
        if let Err(e) = self.load_weeks().await {
            // placeholder values instead of stale or partial data
            self.weeks.allocations = Default::default();
            self.weeks.expenses.clear();
            self.weeks.income = Decimal::ZERO;
            self.weeks.fixed_total = Decimal::ZERO;
            self.status = format!("Load failed: {e}");
        }
    }

    async fn load_weeks(&mut self) -> anyhow::Result<()> {
        self.weeks.income = self.api.total_income().await?;
        self.weeks.fixed_total = self.api.total_fixed().await?;
        self.weeks.expenses = self.api.list_weekly().await?;
        self.weeks.allocations = self.api.allocations().await?;
        self.clamp_week_selection();
        Ok(())
    }

    pub async fn refresh_fixed(&mut self) {
        match self.api.list_fixed().await {
            Ok(list) => {
                self.fixed.list = list;
                let len = self.fixed.list.len();
                match (len, self.fixed.sel.selected()) {
                    (0, _) => self.fixed.sel.select(None),
                    (n, Some(i)) if i >= n => self.fixed.sel.select(Some(n - 1)),
                    (_, None) => self.fixed.sel.select(Some(0)),
                    _ => {}
                }
            }
            Err(e) => {
                self.fixed.list.clear();
                self.status = format!("Load failed: {e}");
            }
        }
    }

    /*==========Selection===========*/

    pub fn current_week(&self) -> u8 {
        (self.weeks.selected_week + 1) as u8
    }

    pub fn current_week_expenses(&self) -> &[WeeklyExpense] {
        self.weeks
            .expenses
            .get(&self.current_week())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn clamp_week_selection(&mut self) {
        let len = self.current_week_expenses().len();
        match (len, self.weeks.sel.selected()) {
            (0, _) => self.weeks.sel.select(None),
            (n, Some(i)) if i >= n => self.weeks.sel.select(Some(n - 1)),
            (_, None) => self.weeks.sel.select(Some(0)),
            _ => {}
        }
    }

    fn move_week(&mut self, delta: i32) {
        let n = WEEKS_PER_MONTH as i32;
        self.weeks.selected_week =
            (self.weeks.selected_week as i32 + delta).rem_euclid(n) as usize;
        self.weeks.sel.select(None);
        self.clamp_week_selection();
    }

    fn move_expense(&mut self, delta: isize) {
        let n = self.current_week_expenses().len();
        if n == 0 {
            self.weeks.sel.select(None);
            return;
        }
        let cur = self.weeks.sel.selected().unwrap_or(0) as isize;
        let next = (cur + delta).rem_euclid(n as isize) as usize;
        self.weeks.sel.select(Some(next));
    }

    fn move_fixed(&mut self, delta: isize) {
        let n = self.fixed.list.len();
        if n == 0 {
            self.fixed.sel.select(None);
            return;
        }
        let cur = self.fixed.sel.selected().unwrap_or(0) as isize;
        let next = (cur + delta).rem_euclid(n as isize) as usize;
        self.fixed.sel.select(Some(next));
    }

    /*==========Key handling===========*/

    pub async fn handle_key(&mut self, k: KeyEvent) -> anyhow::Result<()> {
        if k.kind != KeyEventKind::Press {
            return Ok(());
        }
        if self.weeks.editing_income {
            self.handle_income_input(k).await;
            return Ok(());
        }
        if self.fixed.creating {
            self.handle_fixed_form_input(k).await;
            return Ok(());
        }
        if self.tab == Tab::AddWeekly && self.add.editing.is_some() {
            self.handle_add_weekly_input(k);
            return Ok(());
        }

        match self.tab {
            Tab::Weeks => match k.code {
                KeyCode::Char('q') => self.quit = true,
                KeyCode::Left => self.move_week(-1),
                KeyCode::Right => self.move_week(1),
                KeyCode::Up => self.move_expense(-1),
                KeyCode::Down => self.move_expense(1),
                KeyCode::Char('a') => {
                    let week = self.current_week();
                    self.add = AddWeeklyForm::default();
                    self.add.week = week;
                    self.add.date.set(util::iso(&util::today()));
                    self.tab = Tab::AddWeekly;
                }
                KeyCode::Char('i') => {
                    self.weeks.editing_income = true;
                    self.weeks.income_input.set(self.weeks.income.to_string());
                }
                KeyCode::Char('x') | KeyCode::Delete => self.delete_selected_expense().await,
                KeyCode::Char('c') => self.clear_selected_week().await,
                KeyCode::Char('C') => self.clear_all_weeks().await,
                KeyCode::Char('r') => self.refresh_weeks().await,
                KeyCode::Char('f') | KeyCode::Tab => {
                    self.tab = Tab::Fixed;
                    self.refresh_fixed().await;
                }
                KeyCode::Char('?') => self.tab = Tab::Help,
                _ => {}
            },
            Tab::Fixed => match k.code {
                KeyCode::Char('q') => self.quit = true,
                KeyCode::Up => self.move_fixed(-1),
                KeyCode::Down => self.move_fixed(1),
                KeyCode::Char('n') => {
                    self.fixed.form = FixedForm::default();
                    self.fixed.form.date.set(util::iso(&util::today()));
                    self.fixed.creating = true;
                }
                KeyCode::Char('p') => self.toggle_fixed_status().await,
                KeyCode::Char('x') | KeyCode::Delete => self.delete_selected_fixed().await,
                KeyCode::Char('r') => self.refresh_fixed().await,
                KeyCode::Char('b') | KeyCode::Esc | KeyCode::Tab => {
                    self.tab = Tab::Weeks;
                    self.refresh_weeks().await;
                }
                KeyCode::Char('?') => self.tab = Tab::Help,
                _ => {}
            },
            Tab::AddWeekly => match k.code {
                KeyCode::Char('q') => self.quit = true,
                KeyCode::Esc | KeyCode::Char('b') => {
                    self.tab = Tab::Weeks;
                    self.add.error = None;
                    self.refresh_weeks().await;
                }
                KeyCode::Left => self.add.week = if self.add.week <= 1 { 4 } else { self.add.week - 1 },
                KeyCode::Right => self.add.week = if self.add.week >= 4 { 1 } else { self.add.week + 1 },
                KeyCode::Char('d') => self.add.editing = Some(WeeklyField::Description),
                KeyCode::Char('a') => self.add.editing = Some(WeeklyField::Amount),
                KeyCode::Char('t') => self.add.editing = Some(WeeklyField::Date),
                KeyCode::Char('s') | KeyCode::Enter => self.submit_weekly().await,
                KeyCode::Char('?') => self.tab = Tab::Help,
                _ => {}
            },
            Tab::Help => match k.code {
                KeyCode::Char('q') => self.quit = true,
                KeyCode::Esc | KeyCode::Char('b') => self.tab = Tab::Weeks,
                _ => {}
            },
        }
        Ok(())
    }

    async fn handle_income_input(&mut self, k: KeyEvent) {
        match k.code {
            KeyCode::Esc => self.weeks.editing_income = false,
            KeyCode::Enter => self.submit_income().await,
            KeyCode::Char(c) => self.weeks.income_input.push(c),
            KeyCode::Backspace => self.weeks.income_input.backspace(),
            _ => {}
        }
    }

    async fn submit_income(&mut self) {
        let raw = self.weeks.income_input.value.clone();
        match money::normalize("income", &raw) {
            Ok(value) if value >= Decimal::ZERO => match self.api.set_total_income(value).await {
                Ok(stored) => {
                    self.weeks.editing_income = false;
                    self.status = format!("Income set to {}", money::format_currency(stored));
                    self.refresh_weeks().await;
                }
                Err(e) => self.status = format!("Save failed: {e}"),
            },
            _ => self.status = "Income must be a non-negative amount".into(),
        }
    }

    async fn handle_fixed_form_input(&mut self, k: KeyEvent) {
        match k.code {
            KeyCode::Esc => {
                self.fixed.creating = false;
                self.fixed.form = FixedForm::default();
            }
            KeyCode::Enter => self.submit_fixed().await,
            KeyCode::Tab | KeyCode::Down => self.fixed.form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.fixed.form.prev_field(),
            KeyCode::Char(c) => self.fixed.form.field_mut().push(c),
            KeyCode::Backspace => self.fixed.form.field_mut().backspace(),
            _ => {}
        }
    }

    async fn submit_fixed(&mut self) {
        if self.fixed.form.description.is_empty() {
            self.fixed.form.error = Some("Description is required".into());
            return;
        }
        let amount = match money::parse_amount("amount", self.fixed.form.amount.trimmed()) {
            Ok(a) => a,
            Err(e) => {
                self.fixed.form.error = Some(e.to_string());
                return;
            }
        };
        let date = match util::parse_date_any(self.fixed.form.date.trimmed()) {
            Some(d) => d,
            None => {
                self.fixed.form.error = Some("Format: YYYY-MM-DD".into());
                return;
            }
        };
        let notes = if self.fixed.form.notes.is_empty() {
            None
        } else {
            Some(self.fixed.form.notes.trimmed().to_string())
        };
        let description = self.fixed.form.description.trimmed().to_string();

        match self
            .api
            .create_fixed(&description, amount, date, notes.as_deref())
            .await
        {
            Ok(_) => {
                self.fixed.creating = false;
                self.fixed.form = FixedForm::default();
                self.status = "Fixed expense saved".into();
                self.refresh_fixed().await;
            }
            Err(e) => self.fixed.form.error = Some(format!("Save failed: {e}")),
        }
    }

    fn handle_add_weekly_input(&mut self, k: KeyEvent) {
        if let Some(field) = self.add.editing {
            match k.code {
                KeyCode::Char(c) => self.add.field_mut(field).push(c),
                KeyCode::Backspace => self.add.field_mut(field).backspace(),
                KeyCode::Enter | KeyCode::Esc => self.add.editing = None,
                KeyCode::Tab => self.add.editing = Some(next_weekly_field(field)),
                KeyCode::BackTab => self.add.editing = Some(prev_weekly_field(field)),
                _ => {}
            }
        }
    }

    async fn submit_weekly(&mut self) {
        // 1. Required fields
        if self.add.description.is_empty() {
            self.add.error = Some("Description is required".into());
            return;
        }

        // 2. Normalize the amount ("$1.234,50" style input is fine)
        let amount = match money::parse_amount("amount", self.add.amount.trimmed()) {
            Ok(a) => a,
            Err(e) => {
                self.add.error = Some(e.to_string());
                return;
            }
        };

        // 3. Parse date, defaulting to today
        let date = if self.add.date.is_empty() {
            util::today()
        } else {
            match util::parse_date_any(self.add.date.trimmed()) {
                Some(d) => d,
                None => {
                    self.add.error = Some("Format: YYYY-MM-DD".into());
                    return;
                }
            }
        };

        // 4. Send
        let description = self.add.description.trimmed().to_string();
        match self
            .api
            .create_weekly(self.add.week, &description, amount, date)
            .await
        {
            Ok(_) => {
                self.add.success = Some(format!(
                    "Saved {} to week {}",
                    money::format_currency(amount),
                    self.add.week
                ));
                self.add.error = None;
                self.add.description.clear();
                self.add.amount.clear();
            }
            Err(e) => {
                self.add.error = Some(format!("Save failed: {e}"));
                self.add.success = None;
            }
        }
    }

    /*==========Deletes and toggles===========*/

    async fn delete_selected_expense(&mut self) {
        let id = self
            .weeks
            .sel
            .selected()
            .and_then(|i| self.current_week_expenses().get(i))
            .map(|e| e.id);

        if let Some(id) = id {
            match self.api.delete_weekly(id).await {
                Ok(true) => {
                    self.status = "Deleted.".into();
                    self.refresh_weeks().await;
                }
                Ok(false) => self.status = "Expense was already gone".into(),
                Err(e) => self.status = format!("Delete failed: {e}"),
            }
        }
    }

    async fn clear_selected_week(&mut self) {
        let week = self.current_week();
        match self.api.clear_week(week).await {
            Ok(n) => {
                self.status = format!("Cleared {n} expense(s) from week {week}");
                self.refresh_weeks().await;
            }
            Err(e) => self.status = format!("Clear failed: {e}"),
        }
    }

    async fn clear_all_weeks(&mut self) {
        match self.api.clear_all_weeks().await {
            Ok(n) => {
                self.status = format!("Cleared {n} expense(s) across all weeks");
                self.refresh_weeks().await;
            }
            Err(e) => self.status = format!("Clear failed: {e}"),
        }
    }

    async fn delete_selected_fixed(&mut self) {
        let id = self
            .fixed
            .sel
            .selected()
            .and_then(|i| self.fixed.list.get(i))
            .map(|e| e.id);

        if let Some(id) = id {
            match self.api.delete_fixed(id).await {
                Ok(true) => {
                    self.status = "Deleted.".into();
                    self.refresh_fixed().await;
                }
                Ok(false) => self.status = "Expense was already gone".into(),
                Err(e) => self.status = format!("Delete failed: {e}"),
            }
        }
    }

    async fn toggle_fixed_status(&mut self) {
        let expense = self
            .fixed
            .sel
            .selected()
            .and_then(|i| self.fixed.list.get(i))
            .cloned();

        if let Some(expense) = expense {
            match self
                .api
                .set_fixed_status(&expense, expense.status.toggled())
                .await
            {
                Ok(Some(updated)) => {
                    self.status = format!("{} marked {:?}", updated.description, updated.status);
                    self.refresh_fixed().await;
                }
                Ok(None) => self.status = "Expense was already gone".into(),
                Err(e) => self.status = format!("Update failed: {e}"),
            }
        }
    }
}
