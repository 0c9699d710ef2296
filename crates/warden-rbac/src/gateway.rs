//! The authorization gateway.
//!
//! Composition root consumed by request-handling middleware. Every entry
//! point takes an explicit [`AuthContext`], resolves the principal's
//! effective permission set fresh (no implicit caching), and returns a
//! typed result. Denial is a normal outcome, not an error; only missing
//! identity and infrastructure failure are errors.
//!
//! Grant and denial decisions are logged with structured fields; these
//! events are the audit-log trigger points.

use tracing::{error, info, warn};
use warden_store::{PermissionCatalog, PrincipalGrantStore};
use warden_types::{AuthContext, PrincipalId};

use crate::access::{DataAccessResult, resolve_data_access};
use crate::error::{AuthzError, Result};
use crate::permission::{EffectivePermissionSet, operation_name};
use crate::resolver::PermissionResolver;

/// Behavior toggles for the gateway.
#[derive(Debug, Clone)]
pub struct GatewayOptions {
    /// Log granted checks at `info`.
    pub log_granted: bool,

    /// Log denied checks at `warn`.
    pub log_denied: bool,

    /// Attach the principal's current permission list to
    /// [`AuthzError::PermissionDenied`]. Debug aid only: it discloses
    /// authorization internals to the caller and should stay off in
    /// production.
    pub expose_grant_details: bool,
}

impl Default for GatewayOptions {
    fn default() -> Self {
        Self {
            log_granted: true,
            log_denied: true,
            expose_grant_details: false,
        }
    }
}

/// Authorization entry points over a grant store and permission catalog.
///
/// Callers needing several checks for one request should call
/// [`AuthorizationGateway::resolve`] once and reuse the returned set's
/// check methods; each `check_*` call performs its own resolution.
pub struct AuthorizationGateway<G, C> {
    resolver: PermissionResolver<G, C>,
    options: GatewayOptions,
}

impl<G: PrincipalGrantStore, C: PermissionCatalog> AuthorizationGateway<G, C> {
    /// Creates a gateway with default options.
    pub fn new(grants: G, catalog: C) -> Self {
        Self {
            resolver: PermissionResolver::new(grants, catalog),
            options: GatewayOptions::default(),
        }
    }

    /// Overrides the gateway options.
    pub fn with_options(mut self, options: GatewayOptions) -> Self {
        self.options = options;
        self
    }

    /// Resolves the effective permission set for the request identity.
    pub fn resolve(&self, ctx: &AuthContext) -> Result<EffectivePermissionSet> {
        let principal = principal_of(ctx)?;
        self.resolve_principal(principal)
    }

    /// Returns whether the principal holds the named permission.
    pub fn check_permission(&self, ctx: &AuthContext, name: &str) -> Result<bool> {
        let principal = principal_of(ctx)?;
        let set = self.resolve_principal(principal)?;
        let allowed = set.allows(name);
        self.audit(principal, "permission", name, allowed);
        Ok(allowed)
    }

    /// Returns whether the principal holds at least one of the named
    /// permissions. An empty list is never satisfied.
    pub fn check_any_permission(&self, ctx: &AuthContext, names: &[&str]) -> Result<bool> {
        let principal = principal_of(ctx)?;
        let set = self.resolve_principal(principal)?;
        let allowed = names.iter().any(|name| set.allows(name));
        self.audit(principal, "any-permission", &names.join(","), allowed);
        Ok(allowed)
    }

    /// Returns whether the principal holds every named permission.
    /// An empty list is trivially satisfied.
    pub fn check_all_permissions(&self, ctx: &AuthContext, names: &[&str]) -> Result<bool> {
        let principal = principal_of(ctx)?;
        let set = self.resolve_principal(principal)?;
        let allowed = names.iter().all(|name| set.allows(name));
        self.audit(principal, "all-permissions", &names.join(","), allowed);
        Ok(allowed)
    }

    /// Returns whether the principal holds a role with the given name.
    pub fn check_role(&self, ctx: &AuthContext, role_name: &str) -> Result<bool> {
        let principal = principal_of(ctx)?;
        let set = self.resolve_principal(principal)?;
        let held = set.has_role(role_name);
        self.audit(principal, "role", role_name, held);
        Ok(held)
    }

    /// Resolves row scope and field visibility for a resource/action pair.
    ///
    /// Denial is reported in the result (`has_access = false`), not as an
    /// error.
    pub fn check_data_access(
        &self,
        ctx: &AuthContext,
        resource: &str,
        action: &str,
    ) -> Result<DataAccessResult> {
        let principal = principal_of(ctx)?;
        let set = self.resolve_principal(principal)?;
        let result = resolve_data_access(&set, resource, action);
        self.audit(
            principal,
            "data-access",
            &operation_name(resource, action),
            result.has_access,
        );
        Ok(result)
    }

    /// Like [`Self::check_permission`], but maps denial to
    /// [`AuthzError::PermissionDenied`] for middleware that turns errors
    /// into protocol responses.
    pub fn require_permission(&self, ctx: &AuthContext, name: &str) -> Result<()> {
        let principal = principal_of(ctx)?;
        let set = self.resolve_principal(principal)?;
        let allowed = set.allows(name);
        self.audit(principal, "permission", name, allowed);

        if allowed {
            Ok(())
        } else {
            let held = self
                .options
                .expose_grant_details
                .then(|| set.permissions().iter().cloned().collect());
            Err(AuthzError::PermissionDenied {
                principal,
                permission: name.to_string(),
                held,
            })
        }
    }

    /// Like [`Self::check_data_access`], but maps denial to
    /// [`AuthzError::DataAccessDenied`].
    pub fn require_data_access(
        &self,
        ctx: &AuthContext,
        resource: &str,
        action: &str,
    ) -> Result<DataAccessResult> {
        let result = self.check_data_access(ctx, resource, action)?;
        if result.has_access {
            Ok(result)
        } else {
            Err(AuthzError::DataAccessDenied {
                principal: principal_of(ctx)?,
                resource: resource.to_string(),
                action: action.to_string(),
            })
        }
    }

    fn resolve_principal(&self, principal: PrincipalId) -> Result<EffectivePermissionSet> {
        self.resolver.resolve(principal).map_err(|err| {
            if let AuthzError::StoreUnavailable { reason } = &err {
                // Operational incident, distinct from a normal denial.
                error!(
                    principal = %principal,
                    reason = %reason,
                    "authorization store unavailable, failing closed"
                );
            }
            err
        })
    }

    fn audit(&self, principal: PrincipalId, kind: &str, subject: &str, allowed: bool) {
        if allowed {
            if self.options.log_granted {
                info!(
                    principal = %principal,
                    check = kind,
                    subject = subject,
                    "authorization granted"
                );
            }
        } else if self.options.log_denied {
            warn!(
                principal = %principal,
                check = kind,
                subject = subject,
                "authorization denied"
            );
        }
    }
}

fn principal_of(ctx: &AuthContext) -> Result<PrincipalId> {
    ctx.principal().ok_or(AuthzError::Unauthenticated)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use warden_store::{DirectGrant, MemoryStore, Role, RoleAssignment};
    use warden_types::{DataScope, RoleId};

    fn alice() -> PrincipalId {
        PrincipalId::new(1)
    }

    fn ctx() -> AuthContext {
        AuthContext::Authenticated(alice())
    }

    fn store_with_editor(permissions: &[&str]) -> MemoryStore {
        let store = MemoryStore::new();
        store.set_role_permissions(
            RoleId::new(1),
            permissions.iter().map(ToString::to_string).collect(),
        );
        store.add_role_assignment(RoleAssignment::new(
            alice(),
            Role::new(RoleId::new(1), "editor"),
        ));
        store
    }

    #[test]
    fn test_anonymous_context_is_unauthenticated() {
        let store = MemoryStore::new();
        let gateway = AuthorizationGateway::new(&store, &store);
        let anonymous = AuthContext::Anonymous;

        assert!(matches!(
            gateway.check_permission(&anonymous, "article.read"),
            Err(AuthzError::Unauthenticated)
        ));
        assert!(matches!(
            gateway.check_role(&anonymous, "editor"),
            Err(AuthzError::Unauthenticated)
        ));
        assert!(matches!(
            gateway.check_data_access(&anonymous, "order", "read"),
            Err(AuthzError::Unauthenticated)
        ));
    }

    #[test]
    fn test_check_permission_through_role() {
        let store = store_with_editor(&["article.read"]);
        let gateway = AuthorizationGateway::new(&store, &store);

        assert!(gateway.check_permission(&ctx(), "article.read").expect("check"));
        assert!(!gateway
            .check_permission(&ctx(), "article.delete")
            .expect("check"));
    }

    #[test]
    fn test_check_any_and_all() {
        let store = store_with_editor(&["article.read", "article.update"]);
        let gateway = AuthorizationGateway::new(&store, &store);

        assert!(gateway
            .check_any_permission(&ctx(), &["article.delete", "article.read"])
            .expect("check"));
        assert!(!gateway
            .check_any_permission(&ctx(), &["article.delete", "article.publish"])
            .expect("check"));

        assert!(gateway
            .check_all_permissions(&ctx(), &["article.read", "article.update"])
            .expect("check"));
        assert!(!gateway
            .check_all_permissions(&ctx(), &["article.read", "article.delete"])
            .expect("check"));
    }

    #[test]
    fn test_check_any_empty_list_is_denied() {
        let store = store_with_editor(&["article.read"]);
        let gateway = AuthorizationGateway::new(&store, &store);

        assert!(!gateway.check_any_permission(&ctx(), &[]).expect("check"));
        assert!(gateway.check_all_permissions(&ctx(), &[]).expect("check"));
    }

    #[test]
    fn test_check_role() {
        let store = store_with_editor(&["article.read"]);
        let gateway = AuthorizationGateway::new(&store, &store);

        assert!(gateway.check_role(&ctx(), "editor").expect("check"));
        assert!(!gateway.check_role(&ctx(), "admin").expect("check"));
    }

    #[test]
    fn test_data_access_denial_scenario() {
        let store = store_with_editor(&["article.read"]);
        let gateway = AuthorizationGateway::new(&store, &store);

        let result = gateway
            .check_data_access(&ctx(), "order", "read")
            .expect("check");
        assert!(!result.has_access);
        assert!(result.allowed_fields.is_empty());
    }

    #[test]
    fn test_data_access_with_scope_and_fields() {
        let store = store_with_editor(&[
            "order.read",
            "order.read.field.id",
            "order.read.field.total",
        ]);
        store.add_role_assignment(
            RoleAssignment::new(alice(), Role::new(RoleId::new(2), "auditor"))
                .with_data_scope(DataScope::All),
        );
        let gateway = AuthorizationGateway::new(&store, &store);

        let result = gateway
            .check_data_access(&ctx(), "order", "read")
            .expect("check");
        assert!(result.has_access);
        assert_eq!(result.scope, DataScope::All);
        assert_eq!(result.allowed_fields.len(), 2);
    }

    #[test]
    fn test_store_failure_fails_closed_everywhere() {
        let store = store_with_editor(&["article.read"]);
        store.set_unavailable(true);
        let gateway = AuthorizationGateway::new(&store, &store);

        assert!(matches!(
            gateway.check_permission(&ctx(), "article.read"),
            Err(AuthzError::StoreUnavailable { .. })
        ));
        assert!(matches!(
            gateway.check_any_permission(&ctx(), &["article.read"]),
            Err(AuthzError::StoreUnavailable { .. })
        ));
        assert!(matches!(
            gateway.check_role(&ctx(), "editor"),
            Err(AuthzError::StoreUnavailable { .. })
        ));
        assert!(matches!(
            gateway.check_data_access(&ctx(), "article", "read"),
            Err(AuthzError::StoreUnavailable { .. })
        ));
        assert!(matches!(
            gateway.require_permission(&ctx(), "article.read"),
            Err(AuthzError::StoreUnavailable { .. })
        ));
    }

    #[test]
    fn test_require_permission_denial_carries_no_details_by_default() {
        let store = store_with_editor(&["article.read"]);
        let gateway = AuthorizationGateway::new(&store, &store);

        let err = gateway
            .require_permission(&ctx(), "article.delete")
            .expect_err("denied");
        match err {
            AuthzError::PermissionDenied {
                permission, held, ..
            } => {
                assert_eq!(permission, "article.delete");
                assert_eq!(held, None);
            }
            other => panic!("expected PermissionDenied, got {other:?}"),
        }
    }

    #[test]
    fn test_require_permission_exposes_details_when_configured() {
        let store = store_with_editor(&["article.read"]);
        let gateway = AuthorizationGateway::new(&store, &store).with_options(GatewayOptions {
            expose_grant_details: true,
            ..GatewayOptions::default()
        });

        let err = gateway
            .require_permission(&ctx(), "article.delete")
            .expect_err("denied");
        match err {
            AuthzError::PermissionDenied { held, .. } => {
                let held = held.expect("details exposed");
                assert!(held.contains(&"article.read".to_string()));
            }
            other => panic!("expected PermissionDenied, got {other:?}"),
        }
    }

    #[test]
    fn test_require_data_access() {
        let store = store_with_editor(&["order.read"]);
        let gateway = AuthorizationGateway::new(&store, &store);

        let result = gateway
            .require_data_access(&ctx(), "order", "read")
            .expect("granted");
        assert!(result.has_access);

        let err = gateway
            .require_data_access(&ctx(), "order", "delete")
            .expect_err("denied");
        assert!(matches!(
            err,
            AuthzError::DataAccessDenied { resource, action, .. }
                if resource == "order" && action == "delete"
        ));
    }
}
