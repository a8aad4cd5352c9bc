use thiserror::Error;

use crate::addr::IdKind;

/// Top-level error type for the `flare-api` crate.
///
/// Covers every failure mode across the library: identifier encoding,
/// dynamic record access, authentication, transport, and controller-side
/// HTTP errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Identifier codec ────────────────────────────────────────────
    /// Input does not match the expected width/format for its kind.
    /// Always a caller bug; never worth retrying.
    #[error("Malformed {kind} identifier {input:?}: {reason}")]
    MalformedIdentifier {
        kind: IdKind,
        input: String,
        reason: String,
    },

    // ── Dynamic records ─────────────────────────────────────────────
    /// A field the caller expected is absent from the controller response.
    /// Surfaced immediately, never defaulted.
    #[error("Field {field:?} not found in record")]
    FieldNotFound { field: String },

    // ── Authentication ──────────────────────────────────────────────
    /// Token acquisition failed (wrong credentials, expired session, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS configuration or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Controller ──────────────────────────────────────────────────
    /// Non-2xx response from the controller, with the raw body.
    ///
    /// The library does not interpret controller-specific semantics
    /// ("flow table full" and friends) -- that is left to the caller.
    #[error("Controller error (HTTP {status}): {body}")]
    Controller { status: u16, body: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the controller reported a missing resource (HTTP 404).
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Controller { status: 404, .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if this is a transient error worth retrying.
    ///
    /// The library itself never retries; callers use this to decide.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Controller { status, .. } => *status == 503,
            _ => false,
        }
    }

    /// The HTTP status carried by this error, if any.
    ///
    /// Transport failures (connection refused, DNS) have no status.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Controller { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
