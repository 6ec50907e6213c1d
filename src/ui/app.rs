use chrono::{Local, NaiveDate};

use crate::session::{AuthForm, AuthMode, ExpenseForm, RecurringForm, State};
use crate::summary::{self, PeriodFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Expenses,
    Recurring,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Expenses, Self::Recurring]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Expenses => write!(f, "Gastos"),
            Self::Recurring => write!(f, "Recurrentes"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Form,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMANDO"),
            Self::Form => write!(f, "FORMULARIO"),
            Self::Confirm => write!(f, "CONFIRMAR"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PendingAction {
    DeleteExpense { id: i64, name: String },
    DeleteRecurring { id: i64, name: String },
}

/// Work for the session layer, produced by key handlers and commands and
/// carried out by the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    SubmitAuth,
    ToggleAuthMode,
    AddExpense,
    AddRecurring,
    ApplyRecurring(i64),
    DeleteExpense(i64),
    DeleteRecurring(i64),
    Sync,
    Logout,
    DismissError,
}

/// A labelled text field of the form currently on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Field {
    Name,
    Email,
    Password,
    Tag,
    Amount,
    Date,
}

impl Field {
    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::Name => "Nombre",
            Self::Email => "Email",
            Self::Password => "Contraseña",
            Self::Tag => "Etiqueta",
            Self::Amount => "Monto",
            Self::Date => "Fecha",
        }
    }

    pub(crate) fn placeholder(self, screen: Screen) -> &'static str {
        match (self, screen) {
            (Self::Name, Screen::Expenses) => "Ej: Supermercado",
            (Self::Name, Screen::Recurring) => "Ej: Luz, Agua, Internet",
            (Self::Tag, _) => "Escribe o completa con Tab",
            (Self::Amount, _) => "0.00",
            (Self::Date, _) => "AAAA-MM-DD",
            _ => "",
        }
    }
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,
    pub(crate) today: NaiveDate,

    // Login / register
    pub(crate) auth_mode: AuthMode,
    pub(crate) auth_form: AuthForm,
    pub(crate) auth_focus: usize,

    // Expenses
    pub(crate) filter: PeriodFilter,
    pub(crate) expense_index: usize,
    pub(crate) expense_scroll: usize,
    pub(crate) expense_form: ExpenseForm,

    // Recurring
    pub(crate) recurring_index: usize,
    pub(crate) recurring_scroll: usize,
    pub(crate) recurring_form: RecurringForm,

    pub(crate) form_focus: usize,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    /// Set when a sync was requested; the loop draws once before blocking on it.
    pub(crate) sync_requested: bool,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new() -> Self {
        Self::with_today(Local::now().date_naive())
    }

    pub(crate) fn with_today(today: NaiveDate) -> Self {
        Self {
            running: true,
            screen: Screen::Expenses,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,
            today,

            auth_mode: AuthMode::Login,
            auth_form: AuthForm::default(),
            auth_focus: 0,

            filter: PeriodFilter::default(),
            expense_index: 0,
            expense_scroll: 0,
            expense_form: ExpenseForm::new(today),

            recurring_index: 0,
            recurring_scroll: 0,
            recurring_form: RecurringForm::default(),

            form_focus: 0,

            pending_action: None,
            confirm_message: String::new(),

            sync_requested: false,

            visible_rows: 20,
        }
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    /// Refresh the date used by the period filter; the TUI may stay open past midnight.
    pub(crate) fn tick(&mut self) {
        self.today = Local::now().date_naive();
    }

    // ── Auth form ─────────────────────────────────────────────

    pub(crate) fn auth_fields(&self) -> &'static [Field] {
        match self.auth_mode {
            AuthMode::Login => &[Field::Email, Field::Password],
            AuthMode::Register => &[Field::Name, Field::Email, Field::Password],
        }
    }

    pub(crate) fn auth_value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.auth_form.name,
            Field::Email => &self.auth_form.email,
            Field::Password => &self.auth_form.password,
            _ => "",
        }
    }

    pub(crate) fn auth_value_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::Name => Some(&mut self.auth_form.name),
            Field::Email => Some(&mut self.auth_form.email),
            Field::Password => Some(&mut self.auth_form.password),
            _ => None,
        }
    }

    pub(crate) fn focused_auth_field(&self) -> Field {
        let fields = self.auth_fields();
        fields[self.auth_focus.min(fields.len() - 1)]
    }

    pub(crate) fn toggle_auth_mode(&mut self) {
        self.auth_mode = self.auth_mode.toggle();
        self.auth_focus = 0;
    }

    // ── Expense / recurring forms ─────────────────────────────

    pub(crate) fn form_title(&self) -> &'static str {
        match self.screen {
            Screen::Expenses => "Agregar Gasto",
            Screen::Recurring => "Nuevo Gasto Recurrente",
        }
    }

    pub(crate) fn form_fields(&self) -> &'static [Field] {
        match self.screen {
            Screen::Expenses => &[Field::Name, Field::Tag, Field::Amount, Field::Date],
            Screen::Recurring => &[Field::Name, Field::Tag, Field::Amount],
        }
    }

    pub(crate) fn focused_form_field(&self) -> Field {
        let fields = self.form_fields();
        fields[self.form_focus.min(fields.len() - 1)]
    }

    pub(crate) fn form_value(&self, field: Field) -> &str {
        match (self.screen, field) {
            (Screen::Expenses, Field::Name) => &self.expense_form.name,
            (Screen::Expenses, Field::Tag) => &self.expense_form.tag,
            (Screen::Expenses, Field::Amount) => &self.expense_form.amount,
            (Screen::Expenses, Field::Date) => &self.expense_form.date,
            (Screen::Recurring, Field::Name) => &self.recurring_form.name,
            (Screen::Recurring, Field::Tag) => &self.recurring_form.tag,
            (Screen::Recurring, Field::Amount) => &self.recurring_form.amount,
            _ => "",
        }
    }

    pub(crate) fn form_value_mut(&mut self, field: Field) -> Option<&mut String> {
        match (self.screen, field) {
            (Screen::Expenses, Field::Name) => Some(&mut self.expense_form.name),
            (Screen::Expenses, Field::Tag) => Some(&mut self.expense_form.tag),
            (Screen::Expenses, Field::Amount) => Some(&mut self.expense_form.amount),
            (Screen::Expenses, Field::Date) => Some(&mut self.expense_form.date),
            (Screen::Recurring, Field::Name) => Some(&mut self.recurring_form.name),
            (Screen::Recurring, Field::Tag) => Some(&mut self.recurring_form.tag),
            (Screen::Recurring, Field::Amount) => Some(&mut self.recurring_form.amount),
            _ => None,
        }
    }

    pub(crate) fn open_form(&mut self) {
        self.form_focus = 0;
        self.input_mode = InputMode::Form;
    }

    pub(crate) fn close_form(&mut self) {
        self.form_focus = 0;
        self.input_mode = InputMode::Normal;
    }

    /// Complete the tag field from known tags. Returns `false` when there
    /// was nothing to complete.
    pub(crate) fn complete_tag(&mut self, state: &State) -> bool {
        let tags = summary::available_tags(&state.expenses, &state.recurring);
        let current = self.form_value(Field::Tag).to_string();
        match summary::complete_tag(&tags, &current) {
            Some(tag) => {
                let tag = tag.to_string();
                if let Some(value) = self.form_value_mut(Field::Tag) {
                    *value = tag;
                }
                true
            }
            None => false,
        }
    }

    // ── Selection ─────────────────────────────────────────────

    /// Id of the highlighted expense in the currently filtered list.
    pub(crate) fn selected_expense(&self, state: &State) -> Option<(i64, String)> {
        let visible = summary::summarize(&state.expenses, &self.filter, self.today);
        visible
            .expenses
            .get(self.expense_index)
            .map(|e| (e.id, e.name.clone()))
    }

    pub(crate) fn selected_recurring(&self, state: &State) -> Option<(i64, String)> {
        state
            .recurring
            .get(self.recurring_index)
            .map(|r| (r.id, r.name.clone()))
    }

    /// Keep list cursors inside their lists after data or filter changes.
    pub(crate) fn clamp_selection(&mut self, state: &State) {
        let expenses = summary::summarize(&state.expenses, &self.filter, self.today)
            .expenses
            .len();
        if self.expense_index >= expenses {
            self.expense_index = expenses.saturating_sub(1);
        }
        if self.expense_scroll > self.expense_index {
            self.expense_scroll = self.expense_index;
        }
        if self.recurring_index >= state.recurring.len() {
            self.recurring_index = state.recurring.len().saturating_sub(1);
        }
        if self.recurring_scroll > self.recurring_index {
            self.recurring_scroll = self.recurring_index;
        }
    }

    /// Forget everything tied to the previous user.
    pub(crate) fn reset_for_logout(&mut self) {
        *self = Self {
            running: self.running,
            ..Self::with_today(self.today)
        };
    }
}
