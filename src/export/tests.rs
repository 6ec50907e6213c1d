#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;
use crate::summary::Period;

fn make_expense(id: i64, name: &str, date: NaiveDate) -> Expense {
    Expense {
        id,
        name: name.into(),
        tag: "Comida".into(),
        amount: dec!(1000),
        date,
    }
}

#[test]
fn test_export_csv_writes_rows() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("out.csv");
    let day = NaiveDate::from_ymd_opt(2024, 6, 12).unwrap();
    let pizza = make_expense(1, "Pizza", day);
    let comma = make_expense(2, "Pan, leche", day);

    let count = export_csv(&path, &[&pizza, &comma]).unwrap();

    assert_eq!(count, 2);
    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "fecha,nombre,etiqueta,monto");
    assert_eq!(lines[1], "2024-06-12,Pizza,Comida,1000.00");
    assert_eq!(lines[2], "2024-06-12,\"Pan, leche\",Comida,1000.00");
}

#[test]
fn test_export_csv_empty_has_header_only() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("empty.csv");
    assert_eq!(export_csv(&path, &[]).unwrap(), 0);
    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 1);
}

#[test]
fn test_export_csv_bad_path() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("missing").join("out.csv");
    assert!(export_csv(&path, &[]).is_err());
}

#[test]
fn test_default_export_path_names_period() {
    let today = NaiveDate::from_ymd_opt(2024, 6, 12).unwrap();
    let path = default_export_path(&PeriodFilter::new(Period::Month), today);
    assert!(path.ends_with("gastos-mes-2024-06-01.csv"));
    let path = default_export_path(&PeriodFilter::custom(None, None), today);
    assert!(path.ends_with("gastos-todo.csv"));
}

#[test]
fn test_shellexpand_plain_path() {
    assert_eq!(shellexpand("/tmp/x.csv"), "/tmp/x.csv");
    assert_eq!(shellexpand("x.csv"), "x.csv");
}
