use chrono::{Datelike, Days, Months, NaiveDate};
use rust_decimal::Decimal;
use std::collections::{BTreeSet, HashMap};

use crate::models::{Expense, RecurringExpense};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum Period {
    Day,
    Week,
    #[default]
    Month,
    Year,
    Custom,
}

impl Period {
    pub(crate) fn all() -> &'static [Period] {
        &[
            Self::Day,
            Self::Week,
            Self::Month,
            Self::Year,
            Self::Custom,
        ]
    }

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "Día",
            Self::Week => "Semana",
            Self::Month => "Mes",
            Self::Year => "Año",
            Self::Custom => "Custom",
        }
    }

    /// Accepts Spanish and English names, with or without accents.
    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "dia" | "día" | "day" | "d" => Some(Self::Day),
            "semana" | "week" | "w" | "s" => Some(Self::Week),
            "mes" | "month" | "m" => Some(Self::Month),
            "año" | "ano" | "anio" | "year" | "y" | "a" => Some(Self::Year),
            "custom" | "rango" | "range" | "c" => Some(Self::Custom),
            _ => None,
        }
    }

    pub(crate) fn next(self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|p| *p == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    pub(crate) fn prev(self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|p| *p == self).unwrap_or(0);
        all[(idx + all.len() - 1) % all.len()]
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The selected period plus the explicit range used by [`Period::Custom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct PeriodFilter {
    pub(crate) period: Period,
    pub(crate) custom_start: Option<NaiveDate>,
    pub(crate) custom_end: Option<NaiveDate>,
}

impl PeriodFilter {
    pub(crate) fn new(period: Period) -> Self {
        Self {
            period,
            ..Self::default()
        }
    }

    pub(crate) fn custom(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self {
            period: Period::Custom,
            custom_start: start,
            custom_end: end,
        }
    }

    /// Inclusive `[start, end]` window for `today`, or `None` when every
    /// expense passes (custom range with a missing bound).
    pub(crate) fn bounds(&self, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        match self.period {
            Period::Day => Some((today, today)),
            Period::Week => {
                let offset = u64::from(today.weekday().num_days_from_monday());
                let start = today.checked_sub_days(Days::new(offset))?;
                let end = start.checked_add_days(Days::new(6))?;
                Some((start, end))
            }
            Period::Month => {
                let start = today.with_day(1)?;
                let end = start
                    .checked_add_months(Months::new(1))?
                    .pred_opt()?;
                Some((start, end))
            }
            Period::Year => Some((
                NaiveDate::from_ymd_opt(today.year(), 1, 1)?,
                NaiveDate::from_ymd_opt(today.year(), 12, 31)?,
            )),
            Period::Custom => match (self.custom_start, self.custom_end) {
                (Some(a), Some(b)) if a <= b => Some((a, b)),
                (Some(a), Some(b)) => Some((b, a)),
                _ => None,
            },
        }
    }

    pub(crate) fn matches(&self, expense: &Expense, today: NaiveDate) -> bool {
        if self.period == Period::Day {
            return expense.is_on(today);
        }
        match self.bounds(today) {
            Some((start, end)) => start <= expense.date && expense.date <= end,
            None => true,
        }
    }

    /// Short label for headers, e.g. `Mes (2024-06-01 – 2024-06-30)`.
    pub(crate) fn describe(&self, today: NaiveDate) -> String {
        match self.bounds(today) {
            Some((start, end)) if start == end => format!("{} ({start})", self.period),
            Some((start, end)) => format!("{} ({start} – {end})", self.period),
            None => format!("{} (todo)", self.period),
        }
    }
}

/// Visible expenses for a period plus their totals.
#[derive(Debug, Clone)]
pub(crate) struct Summary<'a> {
    /// Most recent first; equal dates keep their original order.
    pub(crate) expenses: Vec<&'a Expense>,
    pub(crate) total: Decimal,
    /// Largest subtotal first, ties broken by tag.
    pub(crate) by_tag: Vec<(String, Decimal)>,
}

pub(crate) fn summarize<'a>(
    expenses: &'a [Expense],
    filter: &PeriodFilter,
    today: NaiveDate,
) -> Summary<'a> {
    let mut visible: Vec<&Expense> = expenses
        .iter()
        .filter(|e| filter.matches(e, today))
        .collect();
    visible.sort_by(|a, b| b.date.cmp(&a.date));

    let total = visible
        .iter()
        .fold(Decimal::ZERO, |acc, e| saturating_add(acc, e.amount));

    let mut groups: HashMap<&str, Decimal> = HashMap::new();
    for expense in &visible {
        let subtotal = groups.entry(expense.tag.as_str()).or_insert(Decimal::ZERO);
        *subtotal = saturating_add(*subtotal, expense.amount);
    }
    let mut by_tag: Vec<(String, Decimal)> = groups
        .into_iter()
        .map(|(tag, amount)| (tag.to_string(), amount))
        .collect();
    by_tag.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    Summary {
        expenses: visible,
        total,
        by_tag,
    }
}

/// Sums clamp at `Decimal::MAX`/`Decimal::MIN` instead of panicking.
fn saturating_add(a: Decimal, b: Decimal) -> Decimal {
    a.checked_add(b).unwrap_or(if b.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    })
}

/// Distinct tags across both lists, alphabetical. Used for tag completion.
pub(crate) fn available_tags(expenses: &[Expense], recurring: &[RecurringExpense]) -> Vec<String> {
    let tags: BTreeSet<&str> = expenses
        .iter()
        .map(|e| e.tag.as_str())
        .chain(recurring.iter().map(|r| r.tag.as_str()))
        .filter(|t| !t.trim().is_empty())
        .collect();
    tags.into_iter().map(str::to_string).collect()
}

/// First known tag starting with `prefix` (case-insensitive), for Tab completion.
pub(crate) fn complete_tag<'a>(tags: &'a [String], prefix: &str) -> Option<&'a str> {
    if prefix.is_empty() {
        return None;
    }
    let lower = prefix.to_lowercase();
    tags.iter()
        .find(|t| t.to_lowercase().starts_with(&lower) && t.len() > prefix.len())
        .map(String::as_str)
}

#[cfg(test)]
mod tests;
