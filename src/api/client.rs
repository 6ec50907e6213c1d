use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::*;

/// Blocking JSON client for the expense API.
#[derive(Clone)]
pub(crate) struct HttpClient {
    http: Client,
    base_url: String,
}

impl HttpClient {
    pub(crate) fn new(base_url: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Client that ignores proxy settings from the environment.
    #[cfg(test)]
    pub(crate) fn direct(base_url: &str) -> Self {
        Self {
            http: Client::builder()
                .no_proxy()
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send one request and return the JSON body, if any.
    ///
    /// `Ok(None)` covers 204, non-JSON success bodies and bodies that fail to parse.
    fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&impl Serialize>,
        token: Option<&str>,
    ) -> ApiResult<Option<Value>> {
        debug!(%method, path, "api request");
        let mut req = self.http.request(method.clone(), self.url(path));
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let response = req.send().map_err(|e| {
            warn!(%method, path, error = %e, "api unreachable");
            ApiError::Network {
                method: method.to_string(),
                path: path.to_string(),
                reason: e.to_string(),
            }
        })?;

        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("application/json"));

        if !status.is_success() {
            let body = if is_json {
                response.json::<Value>().ok()
            } else {
                None
            };
            let err = ApiError::from_status(status.as_u16(), method.as_str(), path, body.as_ref());
            warn!(%method, path, status = status.as_u16(), error = %err, "api rejected request");
            return Err(err);
        }

        if status == StatusCode::NO_CONTENT || !is_json {
            return Ok(None);
        }
        Ok(response.json::<Value>().ok())
    }

    fn get<T: DeserializeOwned + Default>(&self, path: &str, token: &str) -> ApiResult<T> {
        let body = self.send(Method::GET, path, None::<&()>, Some(token))?;
        Ok(decode(body))
    }

    fn post<T: DeserializeOwned + Default>(
        &self,
        path: &str,
        body: Option<&impl Serialize>,
        token: Option<&str>,
    ) -> ApiResult<T> {
        let body = self.send(Method::POST, path, body, token)?;
        Ok(decode(body))
    }

    fn delete(&self, path: &str, token: &str) -> ApiResult<()> {
        self.send(Method::DELETE, path, None::<&()>, Some(token))?;
        Ok(())
    }

    fn authenticate(&self, path: &str, body: &impl Serialize) -> ApiResult<AuthResponse> {
        let envelope: AuthEnvelope = self.post(path, Some(body), None)?;
        match (envelope.token, envelope.user) {
            (Some(token), Some(user)) => Ok(AuthResponse { token, user }),
            _ => Err(ApiError::Malformed(format!("POST {path}"))),
        }
    }
}

/// Decode an optional JSON body into an envelope, falling back to its default.
pub(crate) fn decode<T: DeserializeOwned + Default>(body: Option<Value>) -> T {
    body.and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default()
}

impl ExpenseApi for HttpClient {
    fn register(&self, req: &Registration) -> ApiResult<AuthResponse> {
        self.authenticate("/auth/register", req)
    }

    fn login(&self, req: &Credentials) -> ApiResult<AuthResponse> {
        self.authenticate("/auth/login", req)
    }

    fn me(&self, token: &str) -> ApiResult<AuthUser> {
        let envelope: UserEnvelope = self.get("/auth/me", token)?;
        envelope
            .user
            .ok_or_else(|| ApiError::Malformed("GET /auth/me".into()))
    }

    fn list_expenses(&self, token: &str) -> ApiResult<Vec<Expense>> {
        let envelope: ExpensesEnvelope = self.get("/expenses", token)?;
        Ok(envelope.expenses.unwrap_or_default())
    }

    fn create_expense(&self, token: &str, req: &NewExpense) -> ApiResult<Option<Expense>> {
        let envelope: ExpenseEnvelope = self.post("/expenses", Some(req), Some(token))?;
        Ok(envelope.expense)
    }

    fn delete_expense(&self, token: &str, id: i64) -> ApiResult<()> {
        self.delete(&format!("/expenses/{id}"), token)
    }

    fn list_recurring(&self, token: &str) -> ApiResult<Vec<RecurringExpense>> {
        let envelope: MonthlyExpensesEnvelope = self.get("/monthly-expenses", token)?;
        Ok(envelope.monthly_expenses.unwrap_or_default())
    }

    fn create_recurring(
        &self,
        token: &str,
        req: &NewRecurringExpense,
    ) -> ApiResult<Option<RecurringExpense>> {
        let envelope: MonthlyExpenseEnvelope =
            self.post("/monthly-expenses", Some(req), Some(token))?;
        Ok(envelope.monthly_expense)
    }

    fn apply_recurring(&self, token: &str, id: i64) -> ApiResult<AppliedRecurring> {
        let envelope: AppliedEnvelope = self.post(
            &format!("/monthly-expenses/{id}/apply"),
            None::<&()>,
            Some(token),
        )?;
        Ok(AppliedRecurring {
            expense: envelope.expense,
            monthly_expense: envelope.monthly_expense,
        })
    }

    fn delete_recurring(&self, token: &str, id: i64) -> ApiResult<()> {
        self.delete(&format!("/monthly-expenses/{id}"), token)
    }
}
