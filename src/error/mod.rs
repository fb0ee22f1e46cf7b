//! The unified error handling system for the application.

use std::fmt::Display;

pub use types::{AppError, UNSUPPORTED_PROVIDER_MESSAGE};

/// A unified `Result` type for the entire application.
pub type Result<T> = std::result::Result<T, AppError>;

pub mod macros;
pub mod types;

/// Attach a human readable context to a fallible operation.
pub trait Context<T, E> {
    #[track_caller]
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display;

    #[track_caller]
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Display;
}

impl<T, E> Context<T, E> for std::result::Result<T, E>
where
    E: Into<AppError>,
{
    #[track_caller]
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display,
    {
        self.with_context(|| context)
    }

    #[track_caller]
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Display,
    {
        self.map_err(|error| AppError::Context {
            context: context().to_string(),
            source: Box::new(error.into()),
        })
    }
}

/// Error category for monitoring and alerting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Caused by the client (bad provider name, missing code, invalid token).
    /// Corresponds to 4xx HTTP status codes.
    Client,
    /// Caused by the server or an upstream identity provider.
    /// Corresponds to 5xx HTTP status codes.
    Server,
}
