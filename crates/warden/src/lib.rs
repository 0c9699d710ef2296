//! # Warden
//!
//! An authorization engine. Given a principal (an authenticated actor) and
//! a requested capability, Warden computes whether that capability is
//! granted, which rows of data the principal may see, and which fields of
//! a record may be exposed.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Warden                               │
//! │  ┌─────────┐   ┌───────────┐   ┌──────────┐   ┌───────────┐  │
//! │  │  Store  │ → │ Resolver  │ → │ Gateway  │ → │  Caller   │  │
//! │  │ (reads) │   │(pure sets)│   │(decisions)│  │(middleware)│ │
//! │  └─────────┘   └───────────┘   └──────────┘   └───────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//!
//! use warden::{
//!     AuthContext, AuthorizationGateway, MemoryStore, PrincipalId, Role, RoleAssignment,
//!     RoleId,
//! };
//!
//! let store = Arc::new(MemoryStore::new());
//! store.set_role_permissions(
//!     RoleId::new(1),
//!     vec!["article.read".to_string(), "article.update".to_string()],
//! );
//! store.add_role_assignment(RoleAssignment::new(
//!     PrincipalId::new(1),
//!     Role::new(RoleId::new(1), "editor"),
//! ));
//!
//! let gateway = AuthorizationGateway::new(Arc::clone(&store), Arc::clone(&store));
//! let ctx = AuthContext::Authenticated(PrincipalId::new(1));
//!
//! assert!(gateway.check_permission(&ctx, "article.read")?);
//! assert!(!gateway.check_permission(&ctx, "article.delete")?);
//! # Ok::<(), warden::AuthzError>(())
//! ```
//!
//! # Modules
//!
//! - **Types**: [`PrincipalId`], [`AuthContext`], [`DataScope`], [`Predicate`]
//! - **Store contracts**: [`PrincipalGrantStore`], [`PermissionCatalog`],
//!   [`DepartmentDirectory`], [`MemoryStore`]
//! - **Engine**: [`AuthorizationGateway`], [`PermissionResolver`],
//!   [`ScopeFilter`], [`filter_fields`]
//! - **Configuration**: [`WardenConfig`], [`ConfigLoader`]

pub use warden_config::{AuditConfig, ConfigLoader, EngineConfig, WardenConfig};
pub use warden_rbac::{
    AuthorizationGateway, AuthzError, DataAccessResult, EffectivePermissionSet, GatewayOptions,
    Permission, PermissionResolver, QueryDescriptor, Result, ScopeFilter, WILDCARD, filter_fields,
    resolve_data_access,
};
pub use warden_store::{
    DepartmentDirectory, DirectGrant, GrantType, MemoryStore, PermissionCatalog,
    PrincipalGrantStore, Role, RoleAssignment, StoreError,
};
pub use warden_types::{
    AuthContext, DataScope, DepartmentId, Predicate, PrincipalId, RoleId, ScalarValue,
};

/// Builds gateway options from configuration.
pub fn gateway_options(config: &WardenConfig) -> GatewayOptions {
    GatewayOptions {
        log_granted: config.audit.log_granted,
        log_denied: config.audit.log_denied,
        expose_grant_details: config.engine.expose_grant_details,
    }
}

/// Builds a scope filter from configuration, without department support.
///
/// Pair with [`scope_filter_with_directory`] when a department directory
/// is available; without one, department-scoped requests fail with
/// [`AuthzError::NotImplemented`] rather than silently narrowing.
pub fn scope_filter(config: &WardenConfig) -> ScopeFilter {
    ScopeFilter::new()
        .with_owner_field(config.engine.owner_field.clone())
        .with_department_field(config.engine.department_field.clone())
}

/// Builds a scope filter from configuration with department support.
pub fn scope_filter_with_directory(
    config: &WardenConfig,
    directory: impl DepartmentDirectory + Send + Sync + 'static,
) -> ScopeFilter {
    scope_filter(config).with_directory(directory)
}
