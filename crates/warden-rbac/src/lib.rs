//! # warden-rbac: Permission resolution and enforcement
//!
//! The authorization engine for Warden:
//! - **Permission resolution** (roles + direct grants, restriction override)
//! - **Row-level scoping** (`All` / `Department` / `SelfOnly` / `Custom`)
//! - **Field-level filtering** (record redaction to an allow-list)
//! - **Gateway surface** for request-handling middleware
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Request (AuthContext + capability)          │
//! └─────────────────┬───────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  AuthorizationGateway                        │
//! │  ├─ PermissionResolver (store reads)         │
//! │  ├─ Data-access resolution (scope + fields)  │
//! │  └─ Audit trigger points (tracing)           │
//! └─────────────────┬───────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  Decision                                    │
//! │  - granted / denied (normal outcome)         │
//! │  - row predicate (ScopeFilter)               │
//! │  - field allow-list (filter_fields)          │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Data flows one direction: store → resolver → gateway → caller. The
//! engine never writes; granting and revoking belong to administrative
//! collaborators, and the next resolution reflects whatever they changed.
//! Every set is resolved fresh per call — there is no cache and no
//! long-lived mutable state anywhere in this crate.
//!
//! ## Examples
//!
//! ### Permission checks
//!
//! ```
//! use std::sync::Arc;
//!
//! use warden_rbac::AuthorizationGateway;
//! use warden_store::{DirectGrant, MemoryStore, Role, RoleAssignment};
//! use warden_types::{AuthContext, PrincipalId, RoleId};
//!
//! let store = Arc::new(MemoryStore::new());
//! store.set_role_permissions(RoleId::new(1), vec!["article.read".to_string()]);
//! store.add_role_assignment(RoleAssignment::new(
//!     PrincipalId::new(7),
//!     Role::new(RoleId::new(1), "editor"),
//! ));
//! store.add_direct_grant(DirectGrant::direct(PrincipalId::new(7), "article.publish"));
//! store.add_direct_grant(DirectGrant::restricted(PrincipalId::new(7), "article.read"));
//!
//! let gateway = AuthorizationGateway::new(Arc::clone(&store), Arc::clone(&store));
//! let ctx = AuthContext::Authenticated(PrincipalId::new(7));
//!
//! // Granted directly, outside any role.
//! assert!(gateway.check_permission(&ctx, "article.publish")?);
//!
//! // The restriction dominates the role grant.
//! assert!(!gateway.check_permission(&ctx, "article.read")?);
//! # Ok::<(), warden_rbac::AuthzError>(())
//! ```
//!
//! ### Field filtering
//!
//! ```
//! use std::collections::BTreeSet;
//!
//! use serde_json::json;
//! use warden_rbac::filter_fields;
//!
//! let allowed = BTreeSet::from(["name".to_string(), "email".to_string()]);
//! let record = json!({"name": "x", "email": "y", "ssn": "z"});
//!
//! assert_eq!(
//!     filter_fields(&record, &allowed),
//!     json!({"name": "x", "email": "y"})
//! );
//! ```

pub mod access;
pub mod error;
pub mod fields;
pub mod gateway;
pub mod permission;
pub mod resolver;
pub mod scope;

// Re-export commonly used types
pub use access::{DataAccessResult, resolve_data_access};
pub use error::{AuthzError, Result};
pub use fields::filter_fields;
pub use gateway::{AuthorizationGateway, GatewayOptions};
pub use permission::{
    EffectivePermissionSet, Permission, PermissionNameError, WILDCARD, field_name, operation_name,
};
pub use resolver::PermissionResolver;
pub use scope::{DEFAULT_DEPARTMENT_FIELD, DEFAULT_OWNER_FIELD, QueryDescriptor, ScopeFilter};
