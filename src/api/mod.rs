mod client;
mod error;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::models::{AuthUser, Expense, RecurringExpense};

pub(crate) use client::HttpClient;
pub(crate) use error::ApiError;

pub(crate) type ApiResult<T> = Result<T, ApiError>;

// ── Request payloads ──────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct Credentials {
    pub(crate) email: String,
    pub(crate) password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct Registration {
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct NewExpense {
    pub(crate) name: String,
    pub(crate) tag: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub(crate) amount: Decimal,
    pub(crate) date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct NewRecurringExpense {
    pub(crate) name: String,
    pub(crate) tag: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub(crate) amount: Decimal,
}

// ── Responses ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AuthResponse {
    pub(crate) token: String,
    pub(crate) user: AuthUser,
}

/// Result of materializing a recurring expense. Either half may be missing
/// if the server answered with an unexpected shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct AppliedRecurring {
    pub(crate) expense: Option<Expense>,
    pub(crate) monthly_expense: Option<RecurringExpense>,
}

// Wire envelopes. Every field is optional: a missing or mis-shaped field is
// treated as absent rather than as a failed request. Lists keep the records
// that decode and drop the rest one by one.

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };
    let kept = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(error = %e, "skipping malformed record");
                None
            }
        })
        .collect();
    Ok(Some(kept))
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value)
        .map_err(|e| warn!(error = %e, "ignoring malformed record"))
        .ok())
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AuthEnvelope {
    token: Option<String>,
    user: Option<AuthUser>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UserEnvelope {
    user: Option<AuthUser>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ExpensesEnvelope {
    #[serde(deserialize_with = "lenient_list")]
    expenses: Option<Vec<Expense>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct MonthlyExpensesEnvelope {
    #[serde(deserialize_with = "lenient_list")]
    monthly_expenses: Option<Vec<RecurringExpense>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ExpenseEnvelope {
    #[serde(deserialize_with = "lenient")]
    expense: Option<Expense>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct MonthlyExpenseEnvelope {
    #[serde(deserialize_with = "lenient")]
    monthly_expense: Option<RecurringExpense>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct AppliedEnvelope {
    #[serde(deserialize_with = "lenient")]
    expense: Option<Expense>,
    #[serde(deserialize_with = "lenient")]
    monthly_expense: Option<RecurringExpense>,
}

/// The remote expense API. Every call except the auth ones carries the bearer token.
///
/// `Sync` so the synchronizer can fetch both lists from scoped threads.
pub(crate) trait ExpenseApi: Sync {
    fn register(&self, req: &Registration) -> ApiResult<AuthResponse>;
    fn login(&self, req: &Credentials) -> ApiResult<AuthResponse>;
    fn me(&self, token: &str) -> ApiResult<AuthUser>;

    fn list_expenses(&self, token: &str) -> ApiResult<Vec<Expense>>;
    fn create_expense(&self, token: &str, req: &NewExpense) -> ApiResult<Option<Expense>>;
    fn delete_expense(&self, token: &str, id: i64) -> ApiResult<()>;

    fn list_recurring(&self, token: &str) -> ApiResult<Vec<RecurringExpense>>;
    fn create_recurring(
        &self,
        token: &str,
        req: &NewRecurringExpense,
    ) -> ApiResult<Option<RecurringExpense>>;
    fn apply_recurring(&self, token: &str, id: i64) -> ApiResult<AppliedRecurring>;
    fn delete_recurring(&self, token: &str, id: i64) -> ApiResult<()>;
}
