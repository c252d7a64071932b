//! Inspector error types with recoverability classification

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Error types organized by failure domain.
///
/// The inspector's contract is that nothing throws past the subsystem
/// boundary: every call site that observes one of these either advances to
/// the next strategy, degrades the result, or logs and continues. The
/// [`is_recoverable`][Error::is_recoverable] split exists so callers can
/// tell "try the next rung" failures apart from genuine misconfiguration.
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // Target Access Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Access to target context denied: {reason}")]
    AccessDenied { reason: String },

    #[error("Injection failed: {message}")]
    Injection { message: String },

    #[error("All injection strategies failed for the target surface")]
    InjectionExhausted,

    // ─────────────────────────────────────────────────────────────
    // Wire Protocol Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Protocol error: {message}")]
    Protocol { message: String },

    #[error("Channel send error: {message}")]
    ChannelSend { message: String },

    #[error("Channel closed unexpectedly")]
    ChannelClosed,

    // ─────────────────────────────────────────────────────────────
    // Source Resolution Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Search error: {message}")]
    Search { message: String },

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn access_denied(reason: impl Into<String>) -> Self {
        Self::AccessDenied {
            reason: reason.into(),
        }
    }

    pub fn injection(message: impl Into<String>) -> Self {
        Self::Injection {
            message: message.into(),
        }
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    pub fn channel_send(message: impl Into<String>) -> Self {
        Self::ChannelSend {
            message: message.into(),
        }
    }

    pub fn search(message: impl Into<String>) -> Self {
        Self::Search {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Check if this error is recoverable within the inspection flow.
    ///
    /// Recoverable errors are absorbed by the fallback ladder: access
    /// failures advance to the next injection strategy, protocol and
    /// channel failures degrade the result, search failures produce an
    /// empty candidate list.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::AccessDenied { .. }
                | Error::Injection { .. }
                | Error::InjectionExhausted
                | Error::Protocol { .. }
                | Error::ChannelSend { .. }
                | Error::ChannelClosed
                | Error::Search { .. }
                | Error::Json(_)
        )
    }

    /// Check if this error should abort the caller entirely.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Config { .. } | Error::Io(_))
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Context Extensions
// ─────────────────────────────────────────────────────────────────

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", context.into(), err);
            err
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", f(), err);
            err
        })
    }
}
