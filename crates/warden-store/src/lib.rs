//! # warden-store: Grant store contracts
//!
//! Read contracts between the authorization engine and the systems that own
//! grant state:
//! - [`PrincipalGrantStore`] - role assignments and direct grants per principal
//! - [`PermissionCatalog`] - the permission set attached to each role
//! - [`DepartmentDirectory`] - department membership for department-scoped rows
//!
//! The engine only reads. Granting and revoking are administrative concerns
//! that live behind these traits; the only contract with the engine is that
//! the next resolution reflects the new state.
//!
//! [`MemoryStore`] implements all three contracts in memory and is used as
//! the default backing store in tests and small deployments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use warden_types::{DataScope, DepartmentId, PrincipalId, RoleId};

mod memory;

pub use memory::MemoryStore;

// ============================================================================
// Errors
// ============================================================================

/// Error type for store reads.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not be reached.
    ///
    /// Callers must treat this as fail-closed: it is never equivalent to
    /// "no grants". It is also an operational incident, not a normal denial.
    #[error("grant store unavailable: {reason}")]
    Unavailable { reason: String },

    /// The read was aborted by the caller's cancellation or deadline.
    ///
    /// A cancelled read produced no decision; callers must not interpret
    /// it as a denial.
    #[error("store read cancelled")]
    Cancelled,
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

// ============================================================================
// Records
// ============================================================================

/// A named bundle of permissions assignable to principals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Stable identifier.
    pub id: RoleId,

    /// Unique role name (e.g. `"editor"`).
    pub name: String,

    /// System roles are not end-user-deletable or editable. Enforced by the
    /// administrative layer, carried here for its benefit.
    pub is_system: bool,
}

impl Role {
    /// Creates a non-system role.
    pub fn new(id: RoleId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_system: false,
        }
    }

    /// Marks this role as a system role.
    pub fn system(mut self) -> Self {
        self.is_system = true;
        self
    }
}

/// Links a principal to a role, optionally overriding the role's default
/// data scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    /// The principal holding the role.
    pub principal: PrincipalId,

    /// The assigned role. Embedded in full so role-name checks need no
    /// second catalog round-trip.
    pub role: Role,

    /// Row-visibility override for this assignment, if any.
    pub data_scope: Option<DataScope>,

    /// Expiry timestamp. `None` = never expires.
    pub expires_at: Option<DateTime<Utc>>,

    /// Deactivated assignments contribute nothing to resolution.
    pub is_active: bool,
}

impl RoleAssignment {
    /// Creates an active, non-expiring assignment with no scope override.
    pub fn new(principal: PrincipalId, role: Role) -> Self {
        Self {
            principal,
            role,
            data_scope: None,
            expires_at: None,
            is_active: true,
        }
    }

    /// Sets the data-scope override.
    pub fn with_data_scope(mut self, scope: DataScope) -> Self {
        self.data_scope = Some(scope);
        self
    }

    /// Sets the expiry timestamp.
    pub fn expiring_at(mut self, at: DateTime<Utc>) -> Self {
        self.expires_at = Some(at);
        self
    }

    /// Marks the assignment inactive.
    pub fn deactivated(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Returns whether this assignment contributes to a resolution at `now`.
    ///
    /// Inactive assignments and assignments whose expiry is in the past
    /// contribute nothing.
    pub fn is_effective_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.expires_at.is_none_or(|at| at > now)
    }
}

/// Whether a direct grant adds or removes a permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrantType {
    /// Grants the permission regardless of role membership.
    Direct,

    /// Revokes the permission regardless of role or other direct grants.
    /// Explicit deny dominates every allow for that exact name.
    Restricted,
}

/// A permission attached to a principal outside of any role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectGrant {
    /// The principal the grant applies to.
    pub principal: PrincipalId,

    /// Permission name (e.g. `"article.publish"`).
    pub permission: String,

    /// Direct (allow) or restricted (deny).
    pub grant_type: GrantType,

    /// Expiry timestamp. `None` = never expires.
    pub expires_at: Option<DateTime<Utc>>,

    /// Deactivated grants contribute nothing to resolution.
    pub is_active: bool,
}

impl DirectGrant {
    /// Creates an active, non-expiring `direct` grant.
    pub fn direct(principal: PrincipalId, permission: impl Into<String>) -> Self {
        Self {
            principal,
            permission: permission.into(),
            grant_type: GrantType::Direct,
            expires_at: None,
            is_active: true,
        }
    }

    /// Creates an active, non-expiring `restricted` grant (explicit deny).
    pub fn restricted(principal: PrincipalId, permission: impl Into<String>) -> Self {
        Self {
            grant_type: GrantType::Restricted,
            ..Self::direct(principal, permission)
        }
    }

    /// Sets the expiry timestamp.
    pub fn expiring_at(mut self, at: DateTime<Utc>) -> Self {
        self.expires_at = Some(at);
        self
    }

    /// Marks the grant inactive.
    pub fn deactivated(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Returns whether this grant contributes to a resolution at `now`.
    pub fn is_effective_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.expires_at.is_none_or(|at| at > now)
    }
}

// ============================================================================
// Read contracts
// ============================================================================

/// Per-principal grant state, read-only from the engine's perspective.
///
/// Implementations should pre-filter records with `is_active = false`; the
/// resolver re-checks the active flag and applies expiry against the
/// resolution timestamp regardless, since expiry depends on when the
/// resolution runs.
pub trait PrincipalGrantStore {
    /// Returns the active role assignments for a principal, in a stable
    /// order (used to break ties between equal-priority scope overrides).
    fn active_role_assignments(&self, principal: PrincipalId) -> Result<Vec<RoleAssignment>>;

    /// Returns the active direct grants for a principal.
    fn active_direct_grants(&self, principal: PrincipalId) -> Result<Vec<DirectGrant>>;
}

/// The registry of permissions attached to each role.
pub trait PermissionCatalog {
    /// Returns the permission names granted by a role.
    fn permissions_for_role(&self, role: RoleId) -> Result<Vec<String>>;
}

/// Department membership, used to narrow department-scoped row access.
pub trait DepartmentDirectory {
    /// Returns the department a principal belongs to, if any.
    fn department_of(&self, principal: PrincipalId) -> Result<Option<DepartmentId>>;
}

// ----------------------------------------------------------------------------
// Blanket impls so one backing object can serve every contract by reference.
// ----------------------------------------------------------------------------

impl<T: PrincipalGrantStore + ?Sized> PrincipalGrantStore for &T {
    fn active_role_assignments(&self, principal: PrincipalId) -> Result<Vec<RoleAssignment>> {
        (**self).active_role_assignments(principal)
    }

    fn active_direct_grants(&self, principal: PrincipalId) -> Result<Vec<DirectGrant>> {
        (**self).active_direct_grants(principal)
    }
}

impl<T: PermissionCatalog + ?Sized> PermissionCatalog for &T {
    fn permissions_for_role(&self, role: RoleId) -> Result<Vec<String>> {
        (**self).permissions_for_role(role)
    }
}

impl<T: DepartmentDirectory + ?Sized> DepartmentDirectory for &T {
    fn department_of(&self, principal: PrincipalId) -> Result<Option<DepartmentId>> {
        (**self).department_of(principal)
    }
}

impl<T: PrincipalGrantStore + ?Sized> PrincipalGrantStore for std::sync::Arc<T> {
    fn active_role_assignments(&self, principal: PrincipalId) -> Result<Vec<RoleAssignment>> {
        (**self).active_role_assignments(principal)
    }

    fn active_direct_grants(&self, principal: PrincipalId) -> Result<Vec<DirectGrant>> {
        (**self).active_direct_grants(principal)
    }
}

impl<T: PermissionCatalog + ?Sized> PermissionCatalog for std::sync::Arc<T> {
    fn permissions_for_role(&self, role: RoleId) -> Result<Vec<String>> {
        (**self).permissions_for_role(role)
    }
}

impl<T: DepartmentDirectory + ?Sized> DepartmentDirectory for std::sync::Arc<T> {
    fn department_of(&self, principal: PrincipalId) -> Result<Option<DepartmentId>> {
        (**self).department_of(principal)
    }
}

// ============================================================================
// Tests
// ============================================================================
