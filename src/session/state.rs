use crate::models::{AuthUser, Expense, RecurringExpense};

/// Everything the client knows about the signed-in user. Only [`reduce`]
/// produces a new value.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct State {
    pub(crate) token: Option<String>,
    pub(crate) user: Option<AuthUser>,
    pub(crate) expenses: Vec<Expense>,
    pub(crate) recurring: Vec<RecurringExpense>,
    /// Global, dismissable error banner.
    pub(crate) error: Option<String>,
    /// Error shown on the login/register form only.
    pub(crate) auth_error: Option<String>,
    pub(crate) initializing: bool,
    pub(crate) syncing: bool,
}

impl State {
    pub(crate) fn starting() -> Self {
        Self {
            initializing: true,
            ..Self::default()
        }
    }

    pub(crate) fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    pub(crate) fn greeting(&self) -> Option<String> {
        self.user.as_ref().map(|u| format!("Hola, {}", u.name))
    }

    pub(crate) fn find_recurring(&self, id: i64) -> Option<&RecurringExpense> {
        self.recurring.iter().find(|r| r.id == id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Event {
    /// Bootstrap (or a session attempt) finished, successfully or not.
    Initialized,
    SessionStarted { token: String },
    SignedIn(AuthUser),
    SessionFailed(String),
    AuthFailed(String),
    AuthErrorCleared,
    SignedOut,

    SyncStarted,
    Synced {
        expenses: Vec<Expense>,
        recurring: Vec<RecurringExpense>,
    },
    SyncFailed(String),

    ExpenseCreated(Expense),
    RecurringCreated(RecurringExpense),
    RecurringApplied {
        id: i64,
        expense: Option<Expense>,
        recurring: Option<RecurringExpense>,
    },
    ExpenseDeleted(i64),
    RecurringDeleted(i64),

    Failed(String),
    ErrorDismissed,
}

pub(crate) fn reduce(mut state: State, event: Event) -> State {
    match event {
        Event::Initialized => {
            state.initializing = false;
        }
        Event::SessionStarted { token } => {
            state.error = None;
            state.token = Some(token);
        }
        Event::SignedIn(user) => {
            state.user = Some(user);
        }
        Event::SessionFailed(msg) => {
            state.token = None;
            state.user = None;
            state.error = Some(msg);
        }
        Event::AuthFailed(msg) => {
            state.auth_error = Some(msg);
        }
        Event::AuthErrorCleared => {
            state.auth_error = None;
        }
        Event::SignedOut => {
            state.token = None;
            state.user = None;
            state.expenses.clear();
            state.recurring.clear();
        }
        Event::SyncStarted => {
            state.syncing = true;
        }
        Event::Synced {
            expenses,
            recurring,
        } => {
            state.expenses = expenses;
            state.recurring = recurring;
            state.syncing = false;
        }
        Event::SyncFailed(msg) => {
            state.error = Some(msg);
            state.syncing = false;
        }
        Event::ExpenseCreated(expense) => {
            state.expenses.push(expense);
        }
        Event::RecurringCreated(recurring) => {
            state.recurring.insert(0, recurring);
        }
        Event::RecurringApplied {
            id,
            expense,
            recurring,
        } => {
            if let Some(expense) = expense {
                state.expenses.push(expense);
            }
            if let Some(updated) = recurring {
                if let Some(slot) = state.recurring.iter_mut().find(|r| r.id == id) {
                    *slot = updated;
                }
            }
        }
        Event::ExpenseDeleted(id) => {
            state.expenses.retain(|e| e.id != id);
            for r in state.recurring.iter_mut().filter(|r| r.references(id)) {
                r.clear_application();
            }
        }
        Event::RecurringDeleted(id) => {
            state.recurring.retain(|r| r.id != id);
        }
        Event::Failed(msg) => {
            state.error = Some(msg);
        }
        Event::ErrorDismissed => {
            state.error = None;
        }
    }
    state
}
