//! Permission resolution.
//!
//! Merges role-derived and direct grants into one effective permission set
//! per principal. A resolution is a pure function of current store state:
//! nothing is cached, and every call sees whatever the store holds at read
//! time.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use tracing::debug;
use warden_store::{GrantType, PermissionCatalog, PrincipalGrantStore, Role};
use warden_types::{DataScope, PrincipalId};

use crate::error::Result;
use crate::permission::EffectivePermissionSet;

/// Resolves principals to effective permission sets.
///
/// Reads through the grant store and permission catalog contracts; fails
/// with [`crate::AuthzError::StoreUnavailable`] when either cannot be
/// reached. A resolution failure is never reported as an empty permission
/// set — callers must be able to distinguish "resolved to no permissions"
/// from "resolution failed".
pub struct PermissionResolver<G, C> {
    grants: G,
    catalog: C,
}

impl<G: PrincipalGrantStore, C: PermissionCatalog> PermissionResolver<G, C> {
    /// Creates a resolver over the given store contracts.
    pub fn new(grants: G, catalog: C) -> Self {
        Self { grants, catalog }
    }

    /// Resolves the principal's effective permission set as of now.
    pub fn resolve(&self, principal: PrincipalId) -> Result<EffectivePermissionSet> {
        self.resolve_at(principal, Utc::now())
    }

    /// Resolves the principal's effective permission set as of `now`.
    ///
    /// The timestamp is threaded explicitly so every expiry check within
    /// one resolution sees the same instant.
    pub fn resolve_at(
        &self,
        principal: PrincipalId,
        now: DateTime<Utc>,
    ) -> Result<EffectivePermissionSet> {
        let assignments: Vec<_> = self
            .grants
            .active_role_assignments(principal)?
            .into_iter()
            .filter(|a| a.is_effective_at(now))
            .collect();

        let mut roles: Vec<Role> = Vec::new();
        let mut role_permissions: BTreeSet<String> = BTreeSet::new();
        for assignment in &assignments {
            // A role assigned twice (e.g. with different scopes) contributes
            // its permissions once.
            if roles.iter().any(|r| r.id == assignment.role.id) {
                continue;
            }
            for name in self.catalog.permissions_for_role(assignment.role.id)? {
                role_permissions.insert(name);
            }
            roles.push(assignment.role.clone());
        }

        let mut direct_permissions: BTreeSet<String> = BTreeSet::new();
        let mut restricted_permissions: BTreeSet<String> = BTreeSet::new();
        for grant in self.grants.active_direct_grants(principal)? {
            if !grant.is_effective_at(now) {
                continue;
            }
            match grant.grant_type {
                GrantType::Direct => {
                    direct_permissions.insert(grant.permission);
                }
                GrantType::Restricted => {
                    restricted_permissions.insert(grant.permission);
                }
            }
        }

        // final = (role ∪ direct) \ restricted, by exact name.
        let mut permissions = role_permissions;
        permissions.extend(direct_permissions.iter().cloned());
        permissions.retain(|name| !restricted_permissions.contains(name));

        // Widest scope override wins; the first assignment wins ties.
        let mut data_scope: Option<&DataScope> = None;
        for assignment in &assignments {
            if let Some(scope) = &assignment.data_scope {
                if data_scope.is_none_or(|current| scope.priority() > current.priority()) {
                    data_scope = Some(scope);
                }
            }
        }

        debug!(
            principal = %principal,
            roles = roles.len(),
            permissions = permissions.len(),
            restricted = restricted_permissions.len(),
            "resolved effective permission set"
        );

        Ok(EffectivePermissionSet::new(
            roles,
            permissions,
            direct_permissions,
            restricted_permissions,
            data_scope.cloned(),
        ))
    }
}

// ============================================================================
// Tests
// ============================================================================
