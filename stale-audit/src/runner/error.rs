//! Runner error types.

/// Errors that stop a scan before or while enumerating organizations.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Configuration errors.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// GitHub API client initialization errors.
    #[error(transparent)]
    Octocrab(#[from] octocrab::Error),

    /// Credentials were rejected by the hosting service.
    #[error("Authentication failed: {message}")]
    Auth { message: String },
}
