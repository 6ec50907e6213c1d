mod forms;
mod state;

use chrono::{DateTime, TimeZone};
use tracing::{info, warn};

use crate::api::{ApiError, AuthResponse, ExpenseApi};
use crate::models::AuthUser;
use crate::store::Storage;
use forms::AuthRequest;
use state::{reduce, Event};

pub(crate) use forms::{AuthForm, AuthMode, ExpenseForm, RecurringForm};
pub(crate) use state::State;

pub(crate) const ALREADY_APPLIED: &str = "Este gasto recurrente ya fue aplicado este mes";

/// How a user action ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// The server confirmed the change.
    Done,
    /// Nothing was sent: no session, incomplete form or unknown record.
    Skipped,
    /// The global error now explains what went wrong.
    Failed,
}

/// Session, synchronization and mutations against the expense API.
///
/// All state changes go through [`reduce`]; this type only sequences the
/// remote calls and the token store around it.
pub(crate) struct Tracker<A: ExpenseApi> {
    api: A,
    storage: Storage,
    state: State,
}

impl<A: ExpenseApi> Tracker<A> {
    pub(crate) fn new(api: A, storage: Storage) -> Self {
        Self {
            api,
            storage,
            state: State::starting(),
        }
    }

    pub(crate) fn state(&self) -> &State {
        &self.state
    }

    fn dispatch(&mut self, event: Event) {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, event);
    }

    fn fail(&mut self, action: &str, err: ApiError) -> Outcome {
        warn!(action, error = %err, "request failed");
        self.dispatch(Event::Failed(err.to_string()));
        Outcome::Failed
    }

    // ── Session ───────────────────────────────────────────────

    /// Resume the persisted session, if any.
    pub(crate) fn bootstrap(&mut self) {
        match self.storage.token() {
            Ok(Some(token)) => self.initialize_session(token, None),
            Ok(None) => self.dispatch(Event::Initialized),
            Err(e) => {
                warn!(error = %e, "could not read stored token");
                self.dispatch(Event::Initialized);
            }
        }
    }

    /// Adopt `token`, resolve the user (asking the server when not given)
    /// and load both lists. Any failure signs the user out again.
    pub(crate) fn initialize_session(&mut self, token: String, user: Option<AuthUser>) {
        self.dispatch(Event::SessionStarted {
            token: token.clone(),
        });
        if let Err(e) = self.storage.save_token(&token) {
            warn!(error = %e, "could not persist token");
        }

        let user = match user {
            Some(user) => Ok(user),
            None => self.api.me(&token),
        };

        match user {
            Ok(user) => {
                info!(email = %user.email, "signed in");
                self.dispatch(Event::SignedIn(user));
                self.sync();
            }
            Err(err) => {
                warn!(error = %err, "session rejected");
                if let Err(e) = self.storage.clear_token() {
                    warn!(error = %e, "could not clear stored token");
                }
                self.dispatch(Event::SessionFailed(err.to_string()));
            }
        }
        self.dispatch(Event::Initialized);
    }

    /// Log in or register. Returns `true` once the server accepted the
    /// credentials, so the caller can clear the form.
    pub(crate) fn submit_auth(&mut self, mode: AuthMode, form: &AuthForm) -> bool {
        self.dispatch(Event::AuthErrorCleared);

        let request = match form.validate(mode) {
            Ok(request) => request,
            Err(msg) => {
                self.dispatch(Event::AuthFailed(msg));
                return false;
            }
        };

        let response = match &request {
            AuthRequest::Login(credentials) => self.api.login(credentials),
            AuthRequest::Register(registration) => self.api.register(registration),
        };

        match response {
            Ok(AuthResponse { token, user }) => {
                self.initialize_session(token, Some(user));
                true
            }
            Err(err) => {
                warn!(?mode, error = %err, "authentication failed");
                self.dispatch(Event::AuthFailed(err.to_string()));
                false
            }
        }
    }

    pub(crate) fn clear_auth_error(&mut self) {
        self.dispatch(Event::AuthErrorCleared);
    }

    pub(crate) fn logout(&mut self) {
        if let Err(e) = self.storage.clear_token() {
            warn!(error = %e, "could not clear stored token");
        }
        self.dispatch(Event::SignedOut);
        info!("signed out");
    }

    // ── Synchronization ───────────────────────────────────────

    /// Fetch both lists at once and replace them only if both arrive.
    pub(crate) fn sync(&mut self) -> Outcome {
        let Some(token) = self.state.token.clone() else {
            return Outcome::Skipped;
        };
        self.dispatch(Event::SyncStarted);

        let api = &self.api;
        let (expenses, recurring) = std::thread::scope(|s| {
            let expenses = s.spawn(|| api.list_expenses(&token));
            let recurring = s.spawn(|| api.list_recurring(&token));
            (
                expenses.join().unwrap_or(Err(ApiError::Interrupted)),
                recurring.join().unwrap_or(Err(ApiError::Interrupted)),
            )
        });

        match (expenses, recurring) {
            (Ok(expenses), Ok(recurring)) => {
                info!(
                    expenses = expenses.len(),
                    recurring = recurring.len(),
                    "synced"
                );
                self.dispatch(Event::Synced {
                    expenses,
                    recurring,
                });
                Outcome::Done
            }
            (Err(err), _) | (_, Err(err)) => {
                warn!(error = %err, "sync failed");
                self.dispatch(Event::SyncFailed(err.to_string()));
                Outcome::Failed
            }
        }
    }

    // ── Mutations ─────────────────────────────────────────────

    pub(crate) fn add_expense(&mut self, form: &ExpenseForm) -> Outcome {
        let Some(token) = self.state.token.clone() else {
            return Outcome::Skipped;
        };
        let Some(request) = form.to_request() else {
            return Outcome::Skipped;
        };

        match self.api.create_expense(&token, &request) {
            Ok(created) => {
                if let Some(expense) = created {
                    info!(id = expense.id, "expense created");
                    self.dispatch(Event::ExpenseCreated(expense));
                }
                Outcome::Done
            }
            Err(err) => self.fail("create expense", err),
        }
    }

    pub(crate) fn add_recurring(&mut self, form: &RecurringForm) -> Outcome {
        let Some(token) = self.state.token.clone() else {
            return Outcome::Skipped;
        };
        let Some(request) = form.to_request() else {
            return Outcome::Skipped;
        };

        match self.api.create_recurring(&token, &request) {
            Ok(created) => {
                if let Some(recurring) = created {
                    info!(id = recurring.id, "recurring expense created");
                    self.dispatch(Event::RecurringCreated(recurring));
                }
                Outcome::Done
            }
            Err(err) => self.fail("create recurring expense", err),
        }
    }

    /// Materialize recurring expense `id` for the month containing `now`.
    /// A template already applied this month is refused locally.
    pub(crate) fn apply_recurring<Tz: TimeZone>(&mut self, id: i64, now: &DateTime<Tz>) -> Outcome {
        let Some(token) = self.state.token.clone() else {
            return Outcome::Skipped;
        };
        let Some(recurring) = self.state.find_recurring(id) else {
            return Outcome::Skipped;
        };
        if !recurring.can_apply_at(now) {
            self.dispatch(Event::Failed(ALREADY_APPLIED.to_string()));
            return Outcome::Failed;
        }

        match self.api.apply_recurring(&token, id) {
            Ok(applied) => {
                info!(id, "recurring expense applied");
                self.dispatch(Event::RecurringApplied {
                    id,
                    expense: applied.expense,
                    recurring: applied.monthly_expense,
                });
                Outcome::Done
            }
            Err(err) => self.fail("apply recurring expense", err),
        }
    }

    pub(crate) fn delete_expense(&mut self, id: i64) -> Outcome {
        let Some(token) = self.state.token.clone() else {
            return Outcome::Skipped;
        };
        match self.api.delete_expense(&token, id) {
            Ok(()) => {
                info!(id, "expense deleted");
                self.dispatch(Event::ExpenseDeleted(id));
                Outcome::Done
            }
            Err(err) => self.fail("delete expense", err),
        }
    }

    pub(crate) fn delete_recurring(&mut self, id: i64) -> Outcome {
        let Some(token) = self.state.token.clone() else {
            return Outcome::Skipped;
        };
        match self.api.delete_recurring(&token, id) {
            Ok(()) => {
                info!(id, "recurring expense deleted");
                self.dispatch(Event::RecurringDeleted(id));
                Outcome::Done
            }
            Err(err) => self.fail("delete recurring expense", err),
        }
    }

    pub(crate) fn dismiss_error(&mut self) {
        self.dispatch(Event::ErrorDismissed);
    }
}
