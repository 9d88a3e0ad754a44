//! Field checks that need no collaborator.
//!
//! Each check returns a [`Verdict`] instead of an error; bad input is an
//! expected outcome here, not a fault.

use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use std::fmt;

pub const MIN_PASSWORD_LENGTH: usize = 8;

pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 8 characters long";
pub const PASSWORD_MISMATCH: &str = "Password confirmation does not match";
pub const EMAIL_NOT_UNIVERSITY: &str = "Email is not from a university";
pub const EMAIL_UNVERIFIABLE: &str = "Unable to verify university email, please try again later";
pub const USERNAME_TAKEN: &str = "Username has already been taken";
pub const USERNAME_REQUIRED: &str = "Username is required";
pub const INVALID_START_YEAR: &str = "Invalid start year selected";

/// Submission fields that carry a validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Password,
    RePassword,
    Email,
    Username,
    StartYear,
}

impl Field {
    /// JSON key of the field, also used as the key in the `errors` map.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Password => "password",
            Self::RePassword => "rePassword",
            Self::Email => "email",
            Self::Username => "username",
            Self::StartYear => "startYear",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one rule applied to one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub field: Field,
    pub reason: Option<&'static str>,
}

impl Verdict {
    #[must_use]
    pub const fn pass(field: Field) -> Self {
        Self {
            field,
            reason: None,
        }
    }

    #[must_use]
    pub const fn fail(field: Field, reason: &'static str) -> Self {
        Self {
            field,
            reason: Some(reason),
        }
    }

    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.reason.is_none()
    }
}

/// Length and confirmation rules. Both always run, so a short password with
/// a wrong confirmation reports two reasons.
#[must_use]
pub fn password(password: Option<&SecretString>, re_password: Option<&SecretString>) -> [Verdict; 2] {
    let password = password.map(|p| p.expose_secret());
    let re_password = re_password.map(|p| p.expose_secret());

    let length = if password.map_or(0, |p| p.chars().count()) >= MIN_PASSWORD_LENGTH {
        Verdict::pass(Field::Password)
    } else {
        Verdict::fail(Field::Password, PASSWORD_TOO_SHORT)
    };

    let confirmation = if password == re_password {
        Verdict::pass(Field::RePassword)
    } else {
        Verdict::fail(Field::RePassword, PASSWORD_MISMATCH)
    };

    [length, confirmation]
}

/// Inclusive window of accepted start years around the current year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearWindow {
    past: u16,
    future: u16,
}

impl YearWindow {
    pub const DEFAULT_PAST: u16 = 10;
    pub const DEFAULT_FUTURE: u16 = 10;
    /// `current + 11` must always be rejected.
    pub const MAX_FUTURE: u16 = 10;

    /// `future` is clamped to [`Self::MAX_FUTURE`].
    #[must_use]
    pub fn new(past: u16, future: u16) -> Self {
        Self {
            past,
            future: future.min(Self::MAX_FUTURE),
        }
    }

    #[must_use]
    pub const fn past(&self) -> u16 {
        self.past
    }

    #[must_use]
    pub const fn future(&self) -> u16 {
        self.future
    }

    #[must_use]
    pub fn contains(&self, year: i64, current_year: i32) -> bool {
        let current = i64::from(current_year);
        (current - i64::from(self.past)..=current + i64::from(self.future)).contains(&year)
    }
}

impl Default for YearWindow {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PAST, Self::DEFAULT_FUTURE)
    }
}

#[must_use]
pub fn start_year(start_year: Option<i64>, current_year: i32, window: &YearWindow) -> Verdict {
    match start_year {
        Some(year) if window.contains(year, current_year) => Verdict::pass(Field::StartYear),
        _ => Verdict::fail(Field::StartYear, INVALID_START_YEAR),
    }
}

/// Lightweight shape check: one `@`, no whitespace, a dot in the domain.
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

/// Domain part of a well-formed address, `None` otherwise.
#[must_use]
pub fn email_domain(email: &str) -> Option<&str> {
    if !valid_email(email) {
        return None;
    }
    email.split_once('@').map(|(_, domain)| domain)
}
