use secrecy::SecretString;
use serde_json::Value;
use std::fmt;

/// Untrusted signup payload.
///
/// Every field is optional; a missing key and a value of the wrong JSON type
/// both end up as `None` and are rejected by the matching validator.
#[derive(Clone, Default)]
pub struct RegistrationSubmission {
    pub password: Option<SecretString>,
    pub re_password: Option<SecretString>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub start_year: Option<i64>,
}

impl RegistrationSubmission {
    /// Lenient parse of a JSON body. Keys this service does not validate
    /// (degree, interests, ...) are ignored.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        Self {
            password: text(value, "password").map(SecretString::from),
            re_password: text(value, "rePassword").map(SecretString::from),
            email: text(value, "email"),
            username: text(value, "username"),
            start_year: integer(value, "startYear"),
        }
    }
}

// passwords stay out of the logs
impl fmt::Debug for RegistrationSubmission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationSubmission")
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("re_password", &self.re_password.as_ref().map(|_| "[REDACTED]"))
            .field("email", &self.email)
            .field("username", &self.username)
            .field("start_year", &self.start_year)
            .finish()
    }
}

fn text(value: &Value, key: &str) -> Option<String> {
    value.get(key)?.as_str().map(str::to_string)
}

fn integer(value: &Value, key: &str) -> Option<i64> {
    match value.get(key)? {
        Value::Number(number) => number.as_i64().or_else(|| number.as_f64().and_then(whole)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// `2024.0` is a year, `2024.5` is not
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn whole(n: f64) -> Option<i64> {
    (n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64).then_some(n as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use serde_json::json;

    #[test]
    fn from_json_reads_known_keys() {
        let submission = RegistrationSubmission::from_json(&json!({
            "password": "longenoughpassword",
            "rePassword": "longenoughpassword",
            "email": "test@university.com",
            "username": "alice",
            "startYear": 2024,
            "degree": 3,
            "interests": ["Flatmate"],
        }));

        assert_eq!(
            submission.password.as_ref().map(|p| p.expose_secret()),
            Some("longenoughpassword")
        );
        assert_eq!(submission.email.as_deref(), Some("test@university.com"));
        assert_eq!(submission.username.as_deref(), Some("alice"));
        assert_eq!(submission.start_year, Some(2024));
    }

    #[test]
    fn from_json_tolerates_wrong_types() {
        let submission = RegistrationSubmission::from_json(&json!({
            "password": 12_345_678,
            "email": ["a@b.com"],
            "username": null,
            "startYear": "not a year",
        }));

        assert!(submission.password.is_none());
        assert!(submission.email.is_none());
        assert!(submission.username.is_none());
        assert!(submission.start_year.is_none());
    }

    #[test]
    fn from_json_accepts_integer_like_year() {
        let submission = RegistrationSubmission::from_json(&json!({ "startYear": " 2023 " }));
        assert_eq!(submission.start_year, Some(2023));

        let submission = RegistrationSubmission::from_json(&json!({ "startYear": 2023.5 }));
        assert!(submission.start_year.is_none());
    }

    #[test]
    fn from_json_accepts_whole_float_year() {
        let submission = RegistrationSubmission::from_json(&json!({ "startYear": 2026.0 }));
        assert_eq!(submission.start_year, Some(2026));

        let submission = RegistrationSubmission::from_json(&json!({ "startYear": 1e300 }));
        assert!(submission.start_year.is_none());
    }

    #[test]
    fn from_json_non_object_is_empty() {
        let submission = RegistrationSubmission::from_json(&Value::Null);
        assert!(submission.password.is_none());
        assert!(submission.start_year.is_none());
    }

    #[test]
    fn debug_redacts_passwords() {
        let submission = RegistrationSubmission::from_json(&json!({
            "password": "hunter2hunter2",
            "rePassword": "hunter2hunter2",
        }));
        let debug = format!("{submission:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("[REDACTED]"));
    }
}
