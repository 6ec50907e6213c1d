#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use super::app::{Action, App, Screen};
use super::commands::*;
use crate::models::Expense;
use crate::session::State;
use crate::summary::Period;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 12).unwrap()
}

fn state() -> State {
    State {
        expenses: vec![
            Expense {
                id: 1,
                name: "Pizza".into(),
                tag: "Comida".into(),
                amount: dec!(1000),
                date: today(),
            },
            Expense {
                id: 2,
                name: "Viaje".into(),
                tag: "Ocio".into(),
                amount: dec!(300.5),
                date: NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(),
            },
        ],
        ..State::default()
    }
}

#[test]
fn test_levenshtein() {
    assert_eq!(levenshtein("", ""), 0);
    assert_eq!(levenshtein("sync", "sync"), 0);
    assert_eq!(levenshtein("snyc", "sync"), 2);
    assert_eq!(levenshtein("periodo", "period"), 1);
    assert_eq!(levenshtein("", "abc"), 3);
}

#[test]
fn test_unknown_command_suggests() {
    let mut app = App::with_today(today());
    let result = handle_command("sinc", &mut app, &state()).unwrap();
    assert_eq!(result, None);
    assert!(app.status_message.contains(":sinc"));
    assert!(app.status_message.contains(":sync"));
}

#[test]
fn test_empty_command_is_noop() {
    let mut app = App::with_today(today());
    assert_eq!(handle_command("   ", &mut app, &state()).unwrap(), None);
    assert!(app.status_message.is_empty());
}

#[test]
fn test_actions_returned() {
    let mut app = App::with_today(today());
    let s = state();
    assert_eq!(handle_command("sync", &mut app, &s).unwrap(), Some(Action::Sync));
    assert_eq!(
        handle_command("logout", &mut app, &s).unwrap(),
        Some(Action::Logout)
    );
}

#[test]
fn test_quit_and_navigation() {
    let mut app = App::with_today(today());
    let s = state();
    handle_command("rec", &mut app, &s).unwrap();
    assert_eq!(app.screen, Screen::Recurring);
    handle_command("gastos", &mut app, &s).unwrap();
    assert_eq!(app.screen, Screen::Expenses);
    handle_command("q", &mut app, &s).unwrap();
    assert!(!app.running);
}

#[test]
fn test_periodo() {
    let mut app = App::with_today(today());
    let s = state();
    handle_command("periodo año", &mut app, &s).unwrap();
    assert_eq!(app.filter.period, Period::Year);
    assert!(app.status_message.starts_with("Período: Año"));

    handle_command("p quincena", &mut app, &s).unwrap();
    assert_eq!(app.filter.period, Period::Year);
    assert_eq!(app.status_message, "Período desconocido: quincena");
}

#[test]
fn test_rango() {
    let mut app = App::with_today(today());
    let s = state();
    handle_command("rango 2024-01-31 2024-01-01", &mut app, &s).unwrap();
    assert_eq!(app.filter.period, Period::Custom);
    assert_eq!(
        app.filter.bounds(today()),
        Some((
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
        ))
    );

    handle_command("rango", &mut app, &s).unwrap();
    assert_eq!(app.filter.bounds(today()), None);

    handle_command("rango ayer hoy", &mut app, &s).unwrap();
    assert_eq!(app.status_message, "Fechas inválidas. Usa AAAA-MM-DD");
}

#[test]
fn test_export_writes_visible_expenses() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("junio.csv");
    let mut app = App::with_today(today());

    let input = format!("export {}", path.display());
    handle_command(&input, &mut app, &state()).unwrap();
    assert!(app.status_message.starts_with("Exportados 1 gastos"));

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("Pizza"));
    assert!(!content.contains("Viaje"));
}

#[test]
fn test_export_bad_path_is_error() {
    let mut app = App::with_today(today());
    let result = handle_command(
        "export /nonexistent-dir/gastos.csv",
        &mut app,
        &state(),
    );
    assert!(result.is_err());
}
