//! Route handlers for the signup service.

pub mod health;
pub use self::health::health;

pub mod signup;
pub use self::signup::signup;

/// Plain-text liveness probe.
pub async fn hello() -> &'static str {
    "Hello, World!"
}
