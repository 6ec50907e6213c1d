use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Expense {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) tag: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub(crate) amount: Decimal,
    #[serde(deserialize_with = "deserialize_date")]
    pub(crate) date: NaiveDate,
}

impl Expense {
    pub(crate) fn is_on(&self, day: NaiveDate) -> bool {
        self.date == day
    }
}

/// Parse the calendar date of an API date field.
///
/// The server sends either a plain `YYYY-MM-DD` or a full RFC 3339 timestamp
/// for the same column; in both cases the date written in the string wins.
pub(crate) fn parse_api_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.date_naive());
    }
    s.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_api_date(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {raw}")))
}
