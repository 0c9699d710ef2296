//! Authorization error taxonomy.
//!
//! Denial is a normal outcome (`Ok(false)` or a typed result), never an
//! exceptional control-flow path. The variants here cover the cases the
//! request-handling middleware must distinguish: missing identity, explicit
//! denial, infrastructure failure, cancellation, and unimplemented scope
//! semantics. Nothing in the engine retries; retries, if any, belong to the
//! store client.

use thiserror::Error;
use warden_store::StoreError;
use warden_types::PrincipalId;

/// Error type for authorization operations.
#[derive(Debug, Error)]
pub enum AuthzError {
    /// No valid principal was presented. Maps to a 401-class response.
    #[error("no authenticated principal presented")]
    Unauthenticated,

    /// The principal is known but lacks the required permission.
    /// Maps to a 403-class response.
    ///
    /// `held` carries the principal's current permission list only when the
    /// gateway is configured to expose grant details (a debug concern; end
    /// users see a generic "not authorized").
    #[error("permission '{permission}' denied for principal {principal}")]
    PermissionDenied {
        principal: PrincipalId,
        permission: String,
        held: Option<Vec<String>>,
    },

    /// A resource/action check failed during data-access resolution.
    /// Maps to a 403-class response carrying the resource and action.
    #[error("access to {resource}.{action} denied for principal {principal}")]
    DataAccessDenied {
        principal: PrincipalId,
        resource: String,
        action: String,
    },

    /// The grant/catalog store could not be read.
    ///
    /// Callers MUST fail closed: treat this as a denial at the protocol
    /// level while alerting on it as an operational incident. It is never
    /// an empty, "safe-looking" permission set.
    #[error("grant store unavailable: {reason}")]
    StoreUnavailable { reason: String },

    /// The requested scope semantics are not implemented.
    ///
    /// Raised instead of silently narrowing a scope to something else, so
    /// callers cannot mistake a narrower-than-intended result for policy.
    #[error("{feature} is not implemented")]
    NotImplemented { feature: String },

    /// The check was aborted by the caller's cancellation or deadline.
    /// No decision was produced; this is distinct from a denial.
    #[error("authorization check cancelled")]
    Cancelled,
}

impl From<StoreError> for AuthzError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable { reason } => AuthzError::StoreUnavailable { reason },
            StoreError::Cancelled => AuthzError::Cancelled,
        }
    }
}

/// Result type for authorization operations.
pub type Result<T> = std::result::Result<T, AuthzError>;
