use serde_json::Value;

/// Failure talking to the expense API. `Display` is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum ApiError {
    #[error("No se pudo contactar al servidor ({method} {path}): {reason}")]
    Network {
        method: String,
        path: String,
        reason: String,
    },
    #[error("{message}")]
    Server { status: u16, message: String },
    #[error("Respuesta inesperada del servidor ({0})")]
    Malformed(String),
    #[error("La sincronización se interrumpió")]
    Interrupted,
}

impl ApiError {
    pub(crate) fn from_status(status: u16, method: &str, path: &str, body: Option<&Value>) -> Self {
        Self::Server {
            status,
            message: server_message(status, method, path, body),
        }
    }
}

/// Build the message for a non-2xx response.
///
/// A string `error` field in a JSON body wins over the generic status text;
/// a non-blank string `details` is appended in parentheses.
pub(crate) fn server_message(status: u16, method: &str, path: &str, body: Option<&Value>) -> String {
    let field = |name: &str| {
        body.and_then(|b| b.get(name))
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    let message = field("error")
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("El servidor respondió {status} al intentar {method} {path}"));

    match field("details").filter(|d| !d.trim().is_empty()) {
        Some(detail) => format!("{message} ({detail})"),
        None => message,
    }
}
