use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

use crate::models::Expense;
use crate::summary::PeriodFilter;

const HEADERS: [&str; 4] = ["fecha", "nombre", "etiqueta", "monto"];

/// Write `expenses` to a CSV file. Returns the number of rows written.
pub(crate) fn export_csv(path: &Path, expenses: &[&Expense]) -> Result<usize> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    wtr.write_record(HEADERS)?;
    for expense in expenses {
        wtr.write_record([
            expense.date.format("%Y-%m-%d").to_string(),
            expense.name.clone(),
            expense.tag.clone(),
            format!("{:.2}", expense.amount),
        ])?;
    }
    wtr.flush().context("Failed to write CSV file")?;
    Ok(expenses.len())
}

/// `~/gastos-<period>-<start>.csv`, or `gastos-todo.csv` for an open range.
pub(crate) fn default_export_path(filter: &PeriodFilter, today: NaiveDate) -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
    let name = match filter.bounds(today) {
        Some((start, _)) => format!(
            "gastos-{}-{start}.csv",
            filter.period.as_str().to_lowercase()
        ),
        None => "gastos-todo.csv".to_string(),
    };
    PathBuf::from(home).join(name)
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests;
