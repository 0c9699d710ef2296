//! Permission names and the resolved permission set.
//!
//! Permission names follow the convention `"{resource}.{action}"`, with
//! field-scoped grants spelled `"{resource}.{action}.field.{field}"`. The
//! reserved name `"*"` is the universal wildcard: it satisfies any check
//! whose name is not itself individually restricted.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use warden_store::Role;
use warden_types::DataScope;

/// The universal wildcard permission name.
pub const WILDCARD: &str = "*";

/// Error type for permission-name parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PermissionNameError {
    /// The name does not follow the `resource.action[.field.name]` convention.
    #[error("invalid permission name: {name:?}")]
    InvalidName { name: String },
}

/// A catalog entry: a named capability decomposed into resource, action,
/// and optional field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    /// Globally unique name.
    pub name: String,

    /// The resource the capability applies to (e.g. `"article"`).
    pub resource: String,

    /// The operation on the resource (e.g. `"read"`).
    pub action: String,

    /// For field-scoped grants, the field being exposed.
    pub field: Option<String>,
}

impl Permission {
    /// Parses a permission name into its parts.
    ///
    /// Accepted forms:
    /// - `"*"` (the universal wildcard)
    /// - `"{resource}.{action}"`
    /// - `"{resource}.{action}.field.{field}"`
    pub fn parse(name: &str) -> Result<Self, PermissionNameError> {
        if name == WILDCARD {
            return Ok(Self {
                name: WILDCARD.to_string(),
                resource: WILDCARD.to_string(),
                action: WILDCARD.to_string(),
                field: None,
            });
        }

        let parts: Vec<&str> = name.split('.').collect();
        let invalid = || PermissionNameError::InvalidName {
            name: name.to_string(),
        };

        if parts.iter().any(|p| p.is_empty()) {
            return Err(invalid());
        }

        match parts.as_slice() {
            &[resource, action] => Ok(Self {
                name: name.to_string(),
                resource: resource.to_string(),
                action: action.to_string(),
                field: None,
            }),
            &[resource, action, marker, field] if marker == "field" => Ok(Self {
                name: name.to_string(),
                resource: resource.to_string(),
                action: action.to_string(),
                field: Some(field.to_string()),
            }),
            _ => Err(invalid()),
        }
    }
}

/// Formats the operation-level permission name for a resource/action pair.
pub fn operation_name(resource: &str, action: &str) -> String {
    format!("{resource}.{action}")
}

/// Formats the field-scoped permission name for a resource/action/field.
pub fn field_name(resource: &str, action: &str, field: &str) -> String {
    format!("{resource}.{action}.field.{field}")
}

/// Extracts the field from a name matching
/// `"{resource}.{action}.field.{F}"`, or `None` if the name is not a
/// field grant for that resource/action.
pub(crate) fn field_suffix<'a>(name: &'a str, resource: &str, action: &str) -> Option<&'a str> {
    name.strip_prefix(resource)?
        .strip_prefix('.')?
        .strip_prefix(action)?
        .strip_prefix(".field.")
        .filter(|f| !f.is_empty() && !f.contains('.'))
}

// ============================================================================
// EffectivePermissionSet
// ============================================================================

/// The resolved permission state of one principal at one instant.
///
/// Constructed fresh per resolution call, used, and discarded; it has no
/// persistence and no cross-call identity. All state lives in the external
/// store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectivePermissionSet {
    roles: Vec<Role>,
    permissions: BTreeSet<String>,
    direct_permissions: BTreeSet<String>,
    restricted_permissions: BTreeSet<String>,
    data_scope: Option<DataScope>,
}

impl EffectivePermissionSet {
    pub(crate) fn new(
        roles: Vec<Role>,
        permissions: BTreeSet<String>,
        direct_permissions: BTreeSet<String>,
        restricted_permissions: BTreeSet<String>,
        data_scope: Option<DataScope>,
    ) -> Self {
        Self {
            roles,
            permissions,
            direct_permissions,
            restricted_permissions,
            data_scope,
        }
    }

    /// Returns whether the set satisfies a permission check for `name`.
    ///
    /// True iff `name` is in the final set, or the wildcard is in the final
    /// set and `name` is not individually restricted.
    pub fn allows(&self, name: &str) -> bool {
        if self.restricted_permissions.contains(name) {
            return false;
        }
        self.permissions.contains(name) || self.permissions.contains(WILDCARD)
    }

    /// Returns whether the principal holds a role with the given name.
    pub fn has_role(&self, role_name: &str) -> bool {
        self.roles.iter().any(|r| r.name == role_name)
    }

    /// The roles contributing to this set.
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// The final permission names (role-derived plus direct, minus
    /// restricted).
    pub fn permissions(&self) -> &BTreeSet<String> {
        &self.permissions
    }

    /// The permission names granted directly, outside of any role.
    pub fn direct_permissions(&self) -> &BTreeSet<String> {
        &self.direct_permissions
    }

    /// The permission names explicitly revoked for this principal.
    pub fn restricted_permissions(&self) -> &BTreeSet<String> {
        &self.restricted_permissions
    }

    /// The selected row-visibility scope, if any assignment carried one.
    pub fn data_scope(&self) -> Option<&DataScope> {
        self.data_scope.as_ref()
    }

    /// Extracts the allowed fields for a resource/action from field-scoped
    /// grants in the final set.
    ///
    /// An empty result means the field dimension is unrestricted for this
    /// resource/action, not "deny all fields".
    pub fn allowed_fields(&self, resource: &str, action: &str) -> BTreeSet<String> {
        self.permissions
            .iter()
            .filter_map(|name| field_suffix(name, resource, action))
            .map(ToString::to_string)
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;
    use warden_types::RoleId;

    #[test_case("article.read", "article", "read", None; "operation name")]
    #[test_case("order.update", "order", "update", None; "another operation")]
    #[test_case("user.read.field.email", "user", "read", Some("email"); "field grant")]
    fn test_parse_valid(name: &str, resource: &str, action: &str, field: Option<&str>) {
        let permission = Permission::parse(name).expect("valid name");
        assert_eq!(permission.resource, resource);
        assert_eq!(permission.action, action);
        assert_eq!(permission.field.as_deref(), field);
    }

    #[test_case(""; "empty")]
    #[test_case("article"; "missing action")]
    #[test_case("article."; "empty action")]
    #[test_case(".read"; "empty resource")]
    #[test_case("article.read.extra"; "three segments")]
    #[test_case("article.read.field."; "empty field")]
    #[test_case("a.b.c.d.e"; "too many segments")]
    fn test_parse_invalid(name: &str) {
        assert!(Permission::parse(name).is_err());
    }

    #[test]
    fn test_parse_wildcard() {
        let permission = Permission::parse(WILDCARD).expect("wildcard parses");
        assert_eq!(permission.name, "*");
        assert_eq!(permission.field, None);
    }

    #[test]
    fn test_name_formatting() {
        assert_eq!(operation_name("article", "read"), "article.read");
        assert_eq!(
            field_name("user", "read", "email"),
            "user.read.field.email"
        );
    }

    #[test]
    fn test_field_suffix_extraction() {
        assert_eq!(
            field_suffix("user.read.field.email", "user", "read"),
            Some("email")
        );
        assert_eq!(field_suffix("user.read", "user", "read"), None);
        assert_eq!(field_suffix("user.read.field.email", "user", "update"), None);
        assert_eq!(field_suffix("account.read.field.iban", "user", "read"), None);
    }

    fn set_with(permissions: &[&str], restricted: &[&str]) -> EffectivePermissionSet {
        EffectivePermissionSet::new(
            vec![Role::new(RoleId::new(1), "editor")],
            permissions.iter().map(ToString::to_string).collect(),
            BTreeSet::new(),
            restricted.iter().map(ToString::to_string).collect(),
            None,
        )
    }

    #[test]
    fn test_allows_exact_name() {
        let set = set_with(&["article.read"], &[]);
        assert!(set.allows("article.read"));
        assert!(!set.allows("article.delete"));
    }

    #[test]
    fn test_wildcard_satisfies_unrestricted_checks() {
        let set = set_with(&["*"], &["article.delete"]);
        assert!(set.allows("article.read"));
        assert!(set.allows("anything.at.all"));
        // Restricted names are not reachable through the wildcard.
        assert!(!set.allows("article.delete"));
    }

    #[test]
    fn test_restricted_name_never_allowed() {
        // Even a name present in the final set loses to a restriction.
        let set = set_with(&["article.read"], &["article.read"]);
        assert!(!set.allows("article.read"));
    }

    #[test]
    fn test_has_role_by_name() {
        let set = set_with(&[], &[]);
        assert!(set.has_role("editor"));
        assert!(!set.has_role("admin"));
    }

    #[test]
    fn test_allowed_fields_extraction() {
        let set = set_with(
            &[
                "user.read",
                "user.read.field.name",
                "user.read.field.email",
                "user.update.field.name",
                "order.read.field.total",
            ],
            &[],
        );

        let fields = set.allowed_fields("user", "read");
        assert_eq!(
            fields,
            BTreeSet::from(["name".to_string(), "email".to_string()])
        );
    }

    #[test]
    fn test_allowed_fields_empty_when_no_field_grants() {
        let set = set_with(&["user.read"], &[]);
        assert!(set.allowed_fields("user", "read").is_empty());
    }
}
