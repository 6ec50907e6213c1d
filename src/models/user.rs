use serde::{Deserialize, Serialize};

/// The signed-in principal. Only ever held in memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct AuthUser {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) email: String,
}
