// ── Form validation ──
//
// Field-scoped checks for the sign-in and sign-up forms. Failures are
// data (`FormErrors`), never errors: the view renders them next to the
// offending field.

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::Serialize;
use strum::{AsRefStr, Display};

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

/// `None` only if the pattern fails to compile, which the tests rule out.
static EMAIL_RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(EMAIL_PATTERN).ok());

pub const MIN_PASSWORD_CHARS: usize = 8;
pub const MIN_NAME_CHARS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FormField {
    Name,
    Email,
    Password,
}

/// Field → message, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors {
    errors: IndexMap<FormField, String>,
}

impl FormErrors {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.errors.iter().map(|(f, m)| (*f, m.as_str()))
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    fn insert(&mut self, field: FormField, message: &str) {
        self.errors.insert(field, message.to_owned());
    }
}

impl std::fmt::Display for FormErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.iter().map(|(field, msg)| format!("{field}: {msg}")).collect();
        f.write_str(&parts.join("; "))
    }
}

// ── Field rules ──────────────────────────────────────────────────────

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.as_ref().is_some_and(|re| re.is_match(email))
}

/// At least eight characters with a lowercase letter, an uppercase
/// letter, and a digit.
pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_CHARS
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
}

pub fn is_valid_name(name: &str) -> bool {
    name.trim().chars().count() >= MIN_NAME_CHARS
}

fn check_email(errors: &mut FormErrors, email: &str) {
    if email.is_empty() {
        errors.insert(FormField::Email, "Email is required");
    } else if !is_valid_email(email) {
        errors.insert(FormField::Email, "Invalid email format");
    }
}

// ── Forms ────────────────────────────────────────────────────────────

/// Sign-in only checks that a password was entered.
pub fn validate_login(email: &str, password: &str) -> FormErrors {
    let mut errors = FormErrors::default();
    check_email(&mut errors, email);
    if password.is_empty() {
        errors.insert(FormField::Password, "Password is required");
    }
    errors
}

pub fn validate_signup(email: &str, password: &str, name: &str) -> FormErrors {
    let mut errors = FormErrors::default();

    if name.is_empty() {
        errors.insert(FormField::Name, "Name is required");
    } else if !is_valid_name(name) {
        errors.insert(FormField::Name, "Name must be at least 2 characters");
    }

    check_email(&mut errors, email);

    if password.is_empty() {
        errors.insert(FormField::Password, "Password is required");
    } else if !is_valid_password(password) {
        errors.insert(
            FormField::Password,
            "Password must be at least 8 characters with uppercase, lowercase, and number",
        );
    }

    errors
}
