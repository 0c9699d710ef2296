//! Row-scope narrowing.
//!
//! Applies a resolved [`DataScope`] to a data-access request before it
//! reaches the data layer. Narrowing always emits typed predicates; no
//! scope ever turns into text spliced into a query language.

use tracing::warn;
use warden_store::DepartmentDirectory;
use warden_types::{DataScope, Predicate, PrincipalId};

use crate::error::{AuthzError, Result};

/// Default record field holding the owning principal's id.
pub const DEFAULT_OWNER_FIELD: &str = "owner_id";

/// Default record field holding the owning department's id.
pub const DEFAULT_DEPARTMENT_FIELD: &str = "department_id";

/// A data-access request: the resource and action being performed, plus
/// the row constraints accumulated so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDescriptor {
    /// Resource being queried (e.g. `"order"`).
    pub resource: String,

    /// Action being performed (e.g. `"read"`).
    pub action: String,

    /// Row constraints. `None` = unconstrained.
    pub predicate: Option<Predicate>,
}

impl QueryDescriptor {
    /// Creates an unconstrained request for a resource/action pair.
    pub fn new(resource: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            action: action.into(),
            predicate: None,
        }
    }

    /// Sets an initial caller-supplied constraint.
    pub fn with_predicate(mut self, predicate: Predicate) -> Self {
        self.predicate = Some(predicate);
        self
    }

    /// AND-combines an additional constraint onto the request.
    fn constrained(mut self, predicate: Predicate) -> Self {
        self.predicate = Some(match self.predicate.take() {
            Some(existing) => Predicate::And(vec![existing, predicate]),
            None => predicate,
        });
        self
    }
}

/// Narrows data-access requests according to a resolved scope.
///
/// Field names for owner and department columns are configurable; an
/// optional [`DepartmentDirectory`] backs `Department` scope. Without a
/// directory, department narrowing raises
/// [`AuthzError::NotImplemented`] rather than silently collapsing to
/// self-only rows.
pub struct ScopeFilter {
    owner_field: String,
    department_field: String,
    directory: Option<Box<dyn DepartmentDirectory + Send + Sync>>,
}

impl ScopeFilter {
    /// Creates a filter with default field names and no department
    /// directory.
    pub fn new() -> Self {
        Self {
            owner_field: DEFAULT_OWNER_FIELD.to_string(),
            department_field: DEFAULT_DEPARTMENT_FIELD.to_string(),
            directory: None,
        }
    }

    /// Sets the record field holding the owning principal's id.
    pub fn with_owner_field(mut self, field: impl Into<String>) -> Self {
        self.owner_field = field.into();
        self
    }

    /// Sets the record field holding the owning department's id.
    pub fn with_department_field(mut self, field: impl Into<String>) -> Self {
        self.department_field = field.into();
        self
    }

    /// Enables department-scoped narrowing through the given directory.
    pub fn with_directory(
        mut self,
        directory: impl DepartmentDirectory + Send + Sync + 'static,
    ) -> Self {
        self.directory = Some(Box::new(directory));
        self
    }

    /// Applies a scope to a request, returning the narrowed request.
    ///
    /// - `All`: unchanged.
    /// - `SelfOnly`: rows owned by the principal.
    /// - `Department`: rows owned by the principal's department; a
    ///   principal with no department membership is denied, and without a
    ///   configured directory the scope is unimplemented.
    /// - `Custom`: the scope's predicates, all of which must hold.
    pub fn apply(
        &self,
        query: QueryDescriptor,
        scope: &DataScope,
        principal: PrincipalId,
    ) -> Result<QueryDescriptor> {
        match scope {
            DataScope::All => Ok(query),
            DataScope::SelfOnly => {
                let owner = Predicate::eq(self.owner_field.clone(), principal);
                Ok(query.constrained(owner))
            }
            DataScope::Department => self.apply_department(query, principal),
            DataScope::Custom(conditions) => {
                Ok(query.constrained(Predicate::And(conditions.clone())))
            }
        }
    }

    fn apply_department(
        &self,
        query: QueryDescriptor,
        principal: PrincipalId,
    ) -> Result<QueryDescriptor> {
        let Some(directory) = &self.directory else {
            return Err(AuthzError::NotImplemented {
                feature: "department-scoped row filtering".to_string(),
            });
        };

        match directory.department_of(principal)? {
            Some(department) => {
                let membership = Predicate::eq(self.department_field.clone(), department);
                Ok(query.constrained(membership))
            }
            None => {
                warn!(
                    principal = %principal,
                    resource = %query.resource,
                    "department scope with no department membership, denying"
                );
                Err(AuthzError::DataAccessDenied {
                    principal,
                    resource: query.resource,
                    action: query.action,
                })
            }
        }
    }
}

impl Default for ScopeFilter {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
