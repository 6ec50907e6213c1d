use chrono::{DateTime, Datelike, FixedOffset, TimeZone};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// A monthly template that can be materialized into an [`super::Expense`]
/// at most once per calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RecurringExpense {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) tag: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub(crate) amount: Decimal,
    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub(crate) last_applied_at: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) last_expense_id: Option<i64>,
}

impl RecurringExpense {
    /// Whether the template may be applied at `now`.
    ///
    /// The stored timestamp is converted into `now`'s timezone before the
    /// month comparison, so the caller picks the calendar (local for the UI).
    pub(crate) fn can_apply_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        match &self.last_applied_at {
            None => true,
            Some(last) => {
                let last = last.with_timezone(&now.timezone());
                !(last.year() == now.year() && last.month() == now.month())
            }
        }
    }

    /// Forget the last materialized expense so the template becomes eligible again.
    pub(crate) fn clear_application(&mut self) {
        self.last_applied_at = None;
        self.last_expense_id = None;
    }

    pub(crate) fn references(&self, expense_id: i64) -> bool {
        self.last_expense_id == Some(expense_id)
    }
}

// Unparsable timestamps count as "never applied".
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok()))
}
