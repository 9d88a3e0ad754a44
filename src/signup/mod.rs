//! Signup validation pipeline.
//!
//! [`SignupValidator`] runs every field check against one
//! [`RegistrationSubmission`] and folds the failures into
//! [`ValidationErrors`]. The directory and store lookups run concurrently;
//! nothing short-circuits, so a client sees every problem in one response.

pub mod directory;
pub mod store;
pub mod submission;
pub mod validators;

pub use directory::{EmailDirectory, HttpDirectory, Institution, StaticDirectory};
pub use store::{Account, AccountStore, PgAccountStore, StoreError};
pub use submission::RegistrationSubmission;
pub use validators::{Field, Verdict, YearWindow};

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, sync::Arc};
use tracing::{debug, instrument, warn};
use utoipa::ToSchema;

/// Failing field name → reasons. Empty means the submission is accepted.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    /// Keep the reason of a failing verdict; passing verdicts are dropped.
    pub fn record(&mut self, verdict: Verdict) {
        if let Some(reason) = verdict.reason {
            self.0
                .entry(verdict.field.as_str().to_string())
                .or_default()
                .push(reason.to_string());
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn get(&self, field: Field) -> Option<&[String]> {
        self.0.get(field.as_str()).map(Vec::as_slice)
    }

    #[must_use]
    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(field.as_str())
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl Extend<Verdict> for ValidationErrors {
    fn extend<T: IntoIterator<Item = Verdict>>(&mut self, iter: T) {
        for verdict in iter {
            self.record(verdict);
        }
    }
}

/// Runs all field checks for a submission.
#[derive(Clone)]
pub struct SignupValidator {
    directory: Arc<dyn EmailDirectory>,
    store: Arc<dyn AccountStore>,
    years: YearWindow,
}

impl SignupValidator {
    #[must_use]
    pub fn new(
        directory: Arc<dyn EmailDirectory>,
        store: Arc<dyn AccountStore>,
        years: YearWindow,
    ) -> Self {
        Self {
            directory,
            store,
            years,
        }
    }

    /// Validate against the current calendar year (UTC).
    ///
    /// # Errors
    /// Returns [`StoreError`] when the account store cannot answer; field
    /// failures are never errors.
    pub async fn validate(
        &self,
        submission: &RegistrationSubmission,
    ) -> Result<ValidationErrors, StoreError> {
        self.validate_at(submission, Utc::now().year()).await
    }

    /// # Errors
    /// Returns [`StoreError`] when the account store cannot answer.
    #[instrument(skip(self, submission))]
    pub async fn validate_at(
        &self,
        submission: &RegistrationSubmission,
        current_year: i32,
    ) -> Result<ValidationErrors, StoreError> {
        let (email, username) = tokio::join!(
            self.check_email(submission.email.as_deref()),
            self.check_username(submission.username.as_deref()),
        );

        let mut errors = ValidationErrors::default();

        errors.extend(validators::password(
            submission.password.as_ref(),
            submission.re_password.as_ref(),
        ));
        errors.record(validators::start_year(
            submission.start_year,
            current_year,
            &self.years,
        ));
        errors.record(email);
        errors.record(username?);

        debug!(
            failed = ?errors.fields().collect::<Vec<_>>(),
            "signup validation finished"
        );

        Ok(errors)
    }

    /// The domain must appear in some institution's domain list. A directory
    /// failure rejects the field with a retry hint instead of failing the request.
    pub async fn check_email(&self, email: Option<&str>) -> Verdict {
        let Some(domain) = email.and_then(validators::email_domain) else {
            return Verdict::fail(Field::Email, validators::EMAIL_NOT_UNIVERSITY);
        };

        match self.directory.institutions().await {
            Ok(institutions) => {
                let known = institutions
                    .iter()
                    .flat_map(|institution| institution.domains.iter())
                    .any(|known| known == domain);

                if known {
                    Verdict::pass(Field::Email)
                } else {
                    Verdict::fail(Field::Email, validators::EMAIL_NOT_UNIVERSITY)
                }
            }
            Err(e) => {
                warn!("Email directory unavailable: {}", e);
                Verdict::fail(Field::Email, validators::EMAIL_UNVERIFIABLE)
            }
        }
    }

    /// # Errors
    /// Returns [`StoreError`] if the lookup fails; that is never read as
    /// "available" or "taken".
    pub async fn check_username(&self, username: Option<&str>) -> Result<Verdict, StoreError> {
        let Some(username) = username.filter(|u| !u.trim().is_empty()) else {
            return Ok(Verdict::fail(Field::Username, validators::USERNAME_REQUIRED));
        };

        let accounts = self.store.find_by_username(username).await?;

        if accounts.is_empty() {
            Ok(Verdict::pass(Field::Username))
        } else {
            Ok(Verdict::fail(Field::Username, validators::USERNAME_TAKEN))
        }
    }
}
