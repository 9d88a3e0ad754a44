//! # Unisignup
//!
//! `unisignup` validates account submissions for a university social app
//! before they are persisted by the account service.
//!
//! ## Signup validation
//!
//! A submission goes through every field check in one pass and all failures
//! are reported together:
//!
//! - **Password:** at least 8 characters, and the confirmation must match exactly.
//! - **Email:** the domain after `@` must belong to an institution listed by the
//!   email-domain directory. A directory outage fails the email field, not the request.
//! - **Username:** must not already exist in the account store. A store outage is
//!   a server error, never a "taken" or "available" answer.
//! - **Start year:** must fall inside a window around the current calendar year.
//!
//! The directory and the store are injected as trait objects so the pipeline can
//! run against fixtures in tests.

pub mod api;
pub mod cli;
pub mod signup;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
