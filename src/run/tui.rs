use anyhow::Result;
use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

use crate::api::ExpenseApi;
use crate::session::{Outcome, State, Tracker};
use crate::summary;
use crate::ui::app::{Action, App, InputMode, PendingAction, Screen};
use crate::ui::commands;
use crate::ui::util::{scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

pub(crate) fn as_tui<A: ExpenseApi>(tracker: &mut Tracker<A>) -> Result<()> {
    let mut app = App::new();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, tracker);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app<A: ExpenseApi>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    tracker: &mut Tracker<A>,
) -> Result<()> {
    // The splash stays up while the stored session is validated.
    terminal.draw(|f| crate::ui::render::render(f, app, tracker.state()))?;
    tracker.bootstrap();

    while app.running {
        app.tick();
        app.clamp_selection(tracker.state());
        terminal.draw(|f| {
            // tab, error, status and command bars plus the screen's own chrome
            let chrome = match app.screen {
                Screen::Expenses => 15,
                Screen::Recurring => 7,
            };
            app.visible_rows = (f.area().height.saturating_sub(chrome) as usize).max(1);
            crate::ui::render::render(f, app, tracker.state());
        })?;

        if app.sync_requested {
            app.sync_requested = false;
            perform(Action::Sync, app, tracker);
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.show_help {
                app.show_help = false;
                continue;
            }
            let action = handle_key(key, app, tracker.state());
            match action {
                // drawn once with the indicator before the blocking fetch
                Some(Action::Sync) => app.sync_requested = true,
                Some(action) => perform(action, app, tracker),
                None => {}
            }
        }
    }
    Ok(())
}

pub(crate) fn handle_key(key: KeyEvent, app: &mut App, state: &State) -> Option<Action> {
    if !state.is_authenticated() {
        return handle_login_input(key, app);
    }
    match app.input_mode {
        InputMode::Normal => handle_normal_input(key, app, state),
        InputMode::Command => handle_command_input(key, app, state),
        InputMode::Form => handle_form_input(key, app, state),
        InputMode::Confirm => handle_confirm_input(key, app),
    }
}

// ── Side effects ─────────────────────────────────────────────

fn perform<A: ExpenseApi>(action: Action, app: &mut App, tracker: &mut Tracker<A>) {
    match action {
        Action::SubmitAuth => {
            if tracker.submit_auth(app.auth_mode, &app.auth_form) {
                app.auth_form.clear();
                app.auth_focus = 0;
                app.screen = Screen::Expenses;
            }
        }
        Action::ToggleAuthMode => {
            app.toggle_auth_mode();
            tracker.clear_auth_error();
        }
        Action::AddExpense => match tracker.add_expense(&app.expense_form) {
            Outcome::Done => {
                app.set_status(format!("Gasto agregado: {}", app.expense_form.name.trim()));
                app.expense_form.reset(app.today);
                app.close_form();
            }
            Outcome::Skipped => app.set_status("Completa nombre, etiqueta, monto y fecha"),
            Outcome::Failed => app.close_form(),
        },
        Action::AddRecurring => match tracker.add_recurring(&app.recurring_form) {
            Outcome::Done => {
                app.set_status(format!(
                    "Gasto recurrente creado: {}",
                    app.recurring_form.name.trim()
                ));
                app.recurring_form.reset();
                app.recurring_index = 0;
                app.close_form();
            }
            Outcome::Skipped => app.set_status("Completa nombre, etiqueta y monto"),
            Outcome::Failed => app.close_form(),
        },
        Action::ApplyRecurring(id) => {
            if tracker.apply_recurring(id, &Local::now()) == Outcome::Done {
                app.set_status("Gasto recurrente aplicado a este mes");
            }
        }
        Action::DeleteExpense(id) => {
            if tracker.delete_expense(id) == Outcome::Done {
                app.set_status("Gasto eliminado");
            }
        }
        Action::DeleteRecurring(id) => {
            if tracker.delete_recurring(id) == Outcome::Done {
                app.set_status("Gasto recurrente eliminado");
            }
        }
        Action::Sync => {
            if tracker.sync() == Outcome::Done {
                app.set_status("Sincronizado");
            }
        }
        Action::Logout => {
            tracker.logout();
            app.reset_for_logout();
        }
        Action::DismissError => tracker.dismiss_error(),
    }
    app.clamp_selection(tracker.state());
}

// ── Input handlers ───────────────────────────────────────────

fn handle_login_input(key: KeyEvent, app: &mut App) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let count = app.auth_fields().len();
    match key.code {
        KeyCode::Esc => app.running = false,
        KeyCode::Char('q') | KeyCode::Char('c') if ctrl => app.running = false,
        KeyCode::Char('t') if ctrl => return Some(Action::ToggleAuthMode),
        KeyCode::Tab | KeyCode::Down => app.auth_focus = (app.auth_focus + 1) % count,
        KeyCode::BackTab | KeyCode::Up => app.auth_focus = (app.auth_focus + count - 1) % count,
        KeyCode::Enter => return Some(Action::SubmitAuth),
        KeyCode::Backspace => {
            let field = app.focused_auth_field();
            if let Some(value) = app.auth_value_mut(field) {
                value.pop();
            }
        }
        KeyCode::Char(c) if !ctrl => {
            let field = app.focused_auth_field();
            if let Some(value) = app.auth_value_mut(field) {
                value.push(c);
            }
        }
        _ => {}
    }
    None
}

fn handle_normal_input(key: KeyEvent, app: &mut App, state: &State) -> Option<Action> {
    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('q') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false;
        }
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Char('j') | KeyCode::Down => handle_move_down(app, state),
        KeyCode::Char('k') | KeyCode::Up => handle_move_up(app),
        KeyCode::Char('g') => handle_goto_top(app),
        KeyCode::Char('G') => handle_goto_bottom(app, state),
        KeyCode::Char('1') => app.screen = Screen::Expenses,
        KeyCode::Char('2') => app.screen = Screen::Recurring,
        KeyCode::Tab | KeyCode::BackTab => {
            app.screen = match app.screen {
                Screen::Expenses => Screen::Recurring,
                Screen::Recurring => Screen::Expenses,
            };
        }
        KeyCode::Char('[') => shift_period(app, false),
        KeyCode::Char(']') => shift_period(app, true),
        KeyCode::Char('a') => {
            if app.expense_form.date.trim().is_empty() {
                app.expense_form.reset(app.today);
            }
            app.open_form();
        }
        KeyCode::Char('A') if app.screen == Screen::Recurring => {
            return app.selected_recurring(state).map(|(id, _)| Action::ApplyRecurring(id));
        }
        KeyCode::Char('D') => confirm_delete(app, state),
        KeyCode::Char('r') => return Some(Action::Sync),
        KeyCode::Char('x') => return Some(Action::DismissError),
        KeyCode::Esc => app.status_message.clear(),
        _ => {}
    }
    None
}

fn handle_command_input(key: KeyEvent, app: &mut App, state: &State) -> Option<Action> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            match commands::handle_command(&input, app, state) {
                Ok(action) => return action,
                Err(e) => app.set_status(format!("Error: {e:#}")),
            }
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let trimmed = app.command_input.trim_end();
            if let Some(pos) = trimmed.rfind(' ') {
                app.command_input.truncate(pos + 1);
            } else {
                app.command_input.clear();
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    None
}

fn handle_form_input(key: KeyEvent, app: &mut App, state: &State) -> Option<Action> {
    let count = app.form_fields().len();
    let field = app.focused_form_field();
    match key.code {
        KeyCode::Esc => app.close_form(),
        KeyCode::Enter => {
            return Some(match app.screen {
                Screen::Expenses => Action::AddExpense,
                Screen::Recurring => Action::AddRecurring,
            });
        }
        KeyCode::Tab => {
            let completed = field == crate::ui::app::Field::Tag && app.complete_tag(state);
            if !completed {
                app.form_focus = (app.form_focus + 1) % count;
            }
        }
        KeyCode::Down => app.form_focus = (app.form_focus + 1) % count,
        KeyCode::BackTab | KeyCode::Up => app.form_focus = (app.form_focus + count - 1) % count,
        KeyCode::Backspace => {
            if let Some(value) = app.form_value_mut(field) {
                value.pop();
            }
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(value) = app.form_value_mut(field) {
                value.push(c);
            }
        }
        _ => {}
    }
    None
}

fn handle_confirm_input(key: KeyEvent, app: &mut App) -> Option<Action> {
    let action = match key.code {
        KeyCode::Char('y' | 'Y' | 's' | 'S') => match app.pending_action.take() {
            Some(PendingAction::DeleteExpense { id, .. }) => Some(Action::DeleteExpense(id)),
            Some(PendingAction::DeleteRecurring { id, .. }) => Some(Action::DeleteRecurring(id)),
            None => None,
        },
        _ => {
            app.pending_action = None;
            app.set_status("Cancelado");
            None
        }
    };
    app.input_mode = InputMode::Normal;
    app.confirm_message.clear();
    action
}

// ── Helpers ──────────────────────────────────────────────────

fn confirm_delete(app: &mut App, state: &State) {
    let pending = match app.screen {
        Screen::Expenses => app
            .selected_expense(state)
            .map(|(id, name)| PendingAction::DeleteExpense { id, name }),
        Screen::Recurring => app
            .selected_recurring(state)
            .map(|(id, name)| PendingAction::DeleteRecurring { id, name }),
    };
    let Some(pending) = pending else {
        app.set_status("Nada seleccionado");
        return;
    };
    app.confirm_message = match &pending {
        PendingAction::DeleteExpense { name, .. } => format!("¿Eliminar el gasto '{name}'?"),
        PendingAction::DeleteRecurring { name, .. } => {
            format!("¿Eliminar el gasto recurrente '{name}'?")
        }
    };
    app.pending_action = Some(pending);
    app.input_mode = InputMode::Confirm;
}

fn shift_period(app: &mut App, forward: bool) {
    app.filter.period = if forward {
        app.filter.period.next()
    } else {
        app.filter.period.prev()
    };
    app.expense_index = 0;
    app.expense_scroll = 0;
    app.set_status(format!("Período: {}", app.filter.describe(app.today)));
}

fn visible_expense_count(app: &App, state: &State) -> usize {
    summary::summarize(&state.expenses, &app.filter, app.today)
        .expenses
        .len()
}

fn handle_move_down(app: &mut App, state: &State) {
    let page = app.visible_rows;
    match app.screen {
        Screen::Expenses => {
            let len = visible_expense_count(app, state);
            scroll_down(&mut app.expense_index, &mut app.expense_scroll, len, page);
        }
        Screen::Recurring => {
            let len = state.recurring.len();
            scroll_down(&mut app.recurring_index, &mut app.recurring_scroll, len, page);
        }
    }
}

fn handle_move_up(app: &mut App) {
    match app.screen {
        Screen::Expenses => scroll_up(&mut app.expense_index, &mut app.expense_scroll),
        Screen::Recurring => scroll_up(&mut app.recurring_index, &mut app.recurring_scroll),
    }
}

fn handle_goto_top(app: &mut App) {
    match app.screen {
        Screen::Expenses => scroll_to_top(&mut app.expense_index, &mut app.expense_scroll),
        Screen::Recurring => scroll_to_top(&mut app.recurring_index, &mut app.recurring_scroll),
    }
}

fn handle_goto_bottom(app: &mut App, state: &State) {
    let page = app.visible_rows;
    match app.screen {
        Screen::Expenses => {
            let len = visible_expense_count(app, state);
            scroll_to_bottom(&mut app.expense_index, &mut app.expense_scroll, len, page);
        }
        Screen::Recurring => {
            let len = state.recurring.len();
            scroll_to_bottom(&mut app.recurring_index, &mut app.recurring_scroll, len, page);
        }
    }
}

#[cfg(test)]
#[path = "tui_tests.rs"]
mod tests;
