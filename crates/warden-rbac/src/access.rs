//! Data-access resolution.
//!
//! Derives row-level scope and the field allow-list for a resource/action
//! pair from an already-resolved permission set. Pure: no store reads
//! happen here.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use warden_types::DataScope;

use crate::permission::{EffectivePermissionSet, operation_name};

/// The outcome of a data-access check for one `(resource, action)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataAccessResult {
    /// Whether the operation itself is granted.
    pub has_access: bool,

    /// Row visibility for the operation. Defaults to the narrowest scope
    /// when no assignment carried an override; meaningless when
    /// `has_access` is false.
    pub scope: DataScope,

    /// Fields of the record the principal may see. Empty means the field
    /// dimension is unrestricted for this resource/action, not "deny all".
    pub allowed_fields: BTreeSet<String>,
}

impl DataAccessResult {
    /// The denied result: narrowest scope, no fields.
    pub fn denied() -> Self {
        Self {
            has_access: false,
            scope: DataScope::SelfOnly,
            allowed_fields: BTreeSet::new(),
        }
    }
}

/// Derives the data-access result for `(resource, action)` from a resolved
/// permission set.
///
/// The operation check uses the `"{resource}.{action}"` permission name,
/// including wildcard and restriction semantics. When granted, the scope
/// comes from the set (default [`DataScope::SelfOnly`]) and the field
/// allow-list from `"{resource}.{action}.field.{F}"` grants.
pub fn resolve_data_access(
    set: &EffectivePermissionSet,
    resource: &str,
    action: &str,
) -> DataAccessResult {
    if !set.allows(&operation_name(resource, action)) {
        return DataAccessResult::denied();
    }

    DataAccessResult {
        has_access: true,
        scope: set.data_scope().cloned().unwrap_or_default(),
        allowed_fields: set.allowed_fields(resource, action),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_store::Role;
    use warden_types::RoleId;

    fn set_with(
        permissions: &[&str],
        restricted: &[&str],
        scope: Option<DataScope>,
    ) -> EffectivePermissionSet {
        EffectivePermissionSet::new(
            vec![Role::new(RoleId::new(1), "editor")],
            permissions.iter().map(ToString::to_string).collect(),
            BTreeSet::new(),
            restricted.iter().map(ToString::to_string).collect(),
            scope,
        )
    }

    #[test]
    fn test_denied_when_operation_not_granted() {
        let set = set_with(&["article.read"], &[], Some(DataScope::All));

        let result = resolve_data_access(&set, "order", "read");
        assert!(!result.has_access);
        // Scope is a safe placeholder, irrelevant since access is denied.
        assert_eq!(result.scope, DataScope::SelfOnly);
        assert!(result.allowed_fields.is_empty());
    }

    #[test]
    fn test_granted_takes_scope_from_set() {
        let set = set_with(&["order.read"], &[], Some(DataScope::All));

        let result = resolve_data_access(&set, "order", "read");
        assert!(result.has_access);
        assert_eq!(result.scope, DataScope::All);
    }

    #[test]
    fn test_granted_defaults_to_self_scope() {
        let set = set_with(&["order.read"], &[], None);

        let result = resolve_data_access(&set, "order", "read");
        assert!(result.has_access);
        assert_eq!(result.scope, DataScope::SelfOnly);
    }

    #[test]
    fn test_field_grants_narrow_the_allow_list() {
        let set = set_with(
            &[
                "user.read",
                "user.read.field.name",
                "user.read.field.email",
                "user.update.field.phone",
            ],
            &[],
            None,
        );

        let result = resolve_data_access(&set, "user", "read");
        assert!(result.has_access);
        assert_eq!(
            result.allowed_fields,
            BTreeSet::from(["name".to_string(), "email".to_string()])
        );
    }

    #[test]
    fn test_no_field_grants_means_unrestricted() {
        let set = set_with(&["user.read"], &[], None);

        let result = resolve_data_access(&set, "user", "read");
        assert!(result.has_access);
        assert!(result.allowed_fields.is_empty());
    }

    #[test]
    fn test_wildcard_grants_operation() {
        let set = set_with(&["*"], &[], Some(DataScope::Department));

        let result = resolve_data_access(&set, "order", "read");
        assert!(result.has_access);
        assert_eq!(result.scope, DataScope::Department);
    }

    #[test]
    fn test_restricted_operation_denied_despite_wildcard() {
        let set = set_with(&["*"], &["order.read"], Some(DataScope::All));

        let result = resolve_data_access(&set, "order", "read");
        assert!(!result.has_access);
    }
}
