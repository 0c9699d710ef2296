//! In-memory grant store.
//!
//! Backs tests and small single-process deployments. Administrative
//! mutators live here; the engine itself only goes through the read
//! contracts.

use std::collections::BTreeMap;
use std::sync::RwLock;

use warden_types::{DepartmentId, PrincipalId, RoleId};

use crate::{
    DepartmentDirectory, DirectGrant, PermissionCatalog, PrincipalGrantStore, Result,
    RoleAssignment, StoreError,
};

#[derive(Debug, Default)]
struct Inner {
    assignments: Vec<RoleAssignment>,
    grants: Vec<DirectGrant>,
    role_permissions: BTreeMap<RoleId, Vec<String>>,
    departments: BTreeMap<PrincipalId, DepartmentId>,
    unavailable: bool,
}

/// In-memory implementation of every store contract.
///
/// Assignments and grants are returned in insertion order, which makes
/// scope tie-breaking deterministic. The `set_unavailable` toggle simulates
/// a store outage so fail-closed behavior can be exercised in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a role assignment.
    pub fn add_role_assignment(&self, assignment: RoleAssignment) {
        self.write().assignments.push(assignment);
    }

    /// Records a direct grant.
    pub fn add_direct_grant(&self, grant: DirectGrant) {
        self.write().grants.push(grant);
    }

    /// Sets the permission names attached to a role.
    pub fn set_role_permissions(&self, role: RoleId, permissions: Vec<String>) {
        self.write().role_permissions.insert(role, permissions);
    }

    /// Records a principal's department membership.
    pub fn set_department(&self, principal: PrincipalId, department: DepartmentId) {
        self.write().departments.insert(principal, department);
    }

    /// Simulates a store outage: while set, every read fails with
    /// [`StoreError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.write().unavailable = unavailable;
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        // A poisoned lock means a writer panicked mid-mutation; the data is
        // still structurally sound (Vec pushes and map inserts), so recover.
        self.inner
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Inner>> {
        let guard = self
            .inner
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if guard.unavailable {
            return Err(StoreError::Unavailable {
                reason: "memory store marked unavailable".to_string(),
            });
        }
        Ok(guard)
    }
}

impl PrincipalGrantStore for MemoryStore {
    fn active_role_assignments(&self, principal: PrincipalId) -> Result<Vec<RoleAssignment>> {
        let inner = self.read()?;
        Ok(inner
            .assignments
            .iter()
            .filter(|a| a.principal == principal && a.is_active)
            .cloned()
            .collect())
    }

    fn active_direct_grants(&self, principal: PrincipalId) -> Result<Vec<DirectGrant>> {
        let inner = self.read()?;
        Ok(inner
            .grants
            .iter()
            .filter(|g| g.principal == principal && g.is_active)
            .cloned()
            .collect())
    }
}

impl PermissionCatalog for MemoryStore {
    fn permissions_for_role(&self, role: RoleId) -> Result<Vec<String>> {
        let inner = self.read()?;
        Ok(inner.role_permissions.get(&role).cloned().unwrap_or_default())
    }
}

impl DepartmentDirectory for MemoryStore {
    fn department_of(&self, principal: PrincipalId) -> Result<Option<DepartmentId>> {
        let inner = self.read()?;
        Ok(inner.departments.get(&principal).copied())
    }
}
