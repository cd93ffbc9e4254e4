//! crates/mindinote_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like local storage or
//! the remote backend.

use async_trait::async_trait;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., filesystem, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Storage error: {0}")]
    Storage(String),
    /// A remote call failed or answered with a non-success status. The message is
    /// meant to be shown to the user as is.
    #[error("{0}")]
    Remote(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// A named key-value slot store, the equivalent of browser local storage.
///
/// Calls are synchronous local I/O.
pub trait NoteStorage: Send + Sync {
    /// Reads the value stored under `key`. An absent slot is `Ok(None)`.
    fn read(&self, key: &str) -> PortResult<Option<String>>;

    /// Replaces the value stored under `key`.
    fn write(&self, key: &str, value: &str) -> PortResult<()>;
}

#[async_trait]
pub trait SummarizationService: Send + Sync {
    /// Produces a summary of the given text.
    async fn summarize(&self, text: &str) -> PortResult<String>;
}

/// What the backend reports after a signup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupOutcome {
    pub user_id: String,
    pub email: String,
    pub is_new: bool,
}

#[async_trait]
pub trait AccountService: Send + Sync {
    /// Registers a user, or returns the existing one with the same email.
    async fn signup(&self, email: &str, name: &str, password: &str) -> PortResult<SignupOutcome>;

    /// Fetches the opaque id of the shared demo user.
    async fn demo_user(&self) -> PortResult<String>;
}
