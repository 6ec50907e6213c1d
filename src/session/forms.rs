use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::api::{Credentials, NewExpense, NewRecurringExpense, Registration};

const MIN_PASSWORD_LEN: usize = 6;

// No `\s` here: the regex crate is built without unicode tables.
const EMAIL_PATTERN: &str = r"^[^@ \t\r\n]+@[^@ \t\r\n]+\.[^@ \t\r\n]+$";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum AuthMode {
    #[default]
    Login,
    Register,
}

impl AuthMode {
    pub(crate) fn toggle(self) -> Self {
        match self {
            Self::Login => Self::Register,
            Self::Register => Self::Login,
        }
    }

    pub(crate) fn title(self) -> &'static str {
        match self {
            Self::Login => "Inicia Sesión",
            Self::Register => "Crea tu cuenta",
        }
    }
}

/// A validated login or registration request.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum AuthRequest {
    Login(Credentials),
    Register(Registration),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct AuthForm {
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) password: String,
}

impl AuthForm {
    /// Check required fields for `mode` and build the request. The error is
    /// the message shown on the form.
    pub(crate) fn validate(&self, mode: AuthMode) -> Result<AuthRequest, String> {
        let name = self.name.trim();
        let email = self.email.trim();

        if mode == AuthMode::Register && name.is_empty() {
            return Err("El nombre es obligatorio".into());
        }
        if email.is_empty() {
            return Err("El email es obligatorio".into());
        }
        if !is_valid_email(email) {
            return Err("Ingresa un email válido".into());
        }
        if self.password.is_empty() {
            return Err("La contraseña es obligatoria".into());
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(format!(
                "La contraseña debe tener al menos {MIN_PASSWORD_LEN} caracteres"
            ));
        }

        Ok(match mode {
            AuthMode::Login => AuthRequest::Login(Credentials {
                email: email.to_string(),
                password: self.password.clone(),
            }),
            AuthMode::Register => AuthRequest::Register(Registration {
                name: name.to_string(),
                email: email.to_string(),
                password: self.password.clone(),
            }),
        })
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}

pub(crate) fn is_valid_email(s: &str) -> bool {
    Regex::new(EMAIL_PATTERN).is_ok_and(|re| re.is_match(s))
}

/// Parse a user-typed amount. Accepts a leading `$` and a decimal comma.
pub(crate) fn parse_amount(s: &str) -> Option<Decimal> {
    let s = s.trim().trim_start_matches('$').trim();
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_str(&s.replace(',', ".")))
        .ok()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ExpenseForm {
    pub(crate) name: String,
    pub(crate) tag: String,
    pub(crate) amount: String,
    pub(crate) date: String,
}

impl ExpenseForm {
    pub(crate) fn new(today: NaiveDate) -> Self {
        Self {
            name: String::new(),
            tag: String::new(),
            amount: String::new(),
            date: today.format("%Y-%m-%d").to_string(),
        }
    }

    /// `None` when a field is missing or does not parse; nothing is sent then.
    pub(crate) fn to_request(&self) -> Option<NewExpense> {
        let name = non_blank(&self.name)?;
        let tag = non_blank(&self.tag)?;
        let amount = parse_amount(&self.amount)?;
        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").ok()?;
        Some(NewExpense {
            name,
            tag,
            amount,
            date,
        })
    }

    pub(crate) fn reset(&mut self, today: NaiveDate) {
        *self = Self::new(today);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct RecurringForm {
    pub(crate) name: String,
    pub(crate) tag: String,
    pub(crate) amount: String,
}

impl RecurringForm {
    pub(crate) fn to_request(&self) -> Option<NewRecurringExpense> {
        Some(NewRecurringExpense {
            name: non_blank(&self.name)?,
            tag: non_blank(&self.tag)?,
            amount: parse_amount(&self.amount)?,
        })
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}

fn non_blank(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}
