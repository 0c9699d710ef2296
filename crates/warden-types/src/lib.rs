//! # warden-types: Core types for `Warden`
//!
//! This crate contains shared types used across the Warden system:
//! - Entity IDs ([`PrincipalId`], [`RoleId`], [`DepartmentId`])
//! - Request identity ([`AuthContext`])
//! - Row visibility ([`DataScope`])
//! - Typed row predicates ([`Predicate`], [`ScalarValue`])

use std::cmp::Ordering;
use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Entity IDs - All Copy (cheap 8-byte values)
// ============================================================================

/// Unique identifier for an authenticated actor.
///
/// Principals are opaque to the engine: no attributes beyond identity are
/// owned here. The identity provider that authenticates a request supplies
/// this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PrincipalId(u64);

impl PrincipalId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl Display for PrincipalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PrincipalId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<PrincipalId> for u64 {
    fn from(id: PrincipalId) -> Self {
        id.0
    }
}

/// Unique identifier for a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoleId(u64);

impl RoleId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl Display for RoleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RoleId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<RoleId> for u64 {
    fn from(id: RoleId) -> Self {
        id.0
    }
}

/// Unique identifier for a department (organizational unit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DepartmentId(u64);

impl DepartmentId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl Display for DepartmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for DepartmentId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<DepartmentId> for u64 {
    fn from(id: DepartmentId) -> Self {
        id.0
    }
}

// ============================================================================
// AuthContext
// ============================================================================

/// Identity context for a single request.
///
/// Constructed by the session layer and passed explicitly into every engine
/// entry point. There is deliberately no ambient/global session state: a
/// function that needs to know who is asking takes an `AuthContext`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthContext {
    /// No valid principal was presented.
    Anonymous,

    /// An authenticated principal.
    Authenticated(PrincipalId),
}

impl AuthContext {
    /// Returns the principal, or `None` for anonymous requests.
    pub fn principal(&self) -> Option<PrincipalId> {
        match self {
            AuthContext::Anonymous => None,
            AuthContext::Authenticated(p) => Some(*p),
        }
    }

    /// Returns whether a principal was presented.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthContext::Authenticated(_))
    }
}

impl From<PrincipalId> for AuthContext {
    fn from(principal: PrincipalId) -> Self {
        AuthContext::Authenticated(principal)
    }
}

// ============================================================================
// DataScope
// ============================================================================

/// Row-visibility descriptor attached to a role assignment.
///
/// Determines which rows of a resource a principal may see once the
/// operation itself has been granted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataScope {
    /// All rows are visible.
    All,

    /// Rows belonging to the principal's department.
    Department,

    /// Only rows owned by the principal.
    SelfOnly,

    /// Rows matching the given predicates (all must hold).
    Custom(Vec<Predicate>),
}

impl DataScope {
    /// Returns the breadth rank of this scope (higher = wider visibility).
    ///
    /// Used when a principal holds several role assignments with scope
    /// overrides: the widest scope wins, ties broken by assignment order.
    pub fn priority(&self) -> u8 {
        match self {
            DataScope::All => 3,
            DataScope::Department => 2,
            DataScope::Custom(_) => 1,
            DataScope::SelfOnly => 0,
        }
    }
}

impl Default for DataScope {
    /// Defaults to `SelfOnly` (safe default: narrowest visibility).
    fn default() -> Self {
        DataScope::SelfOnly
    }
}

// ============================================================================
// ScalarValue
// ============================================================================

/// A scalar comparison operand in a row predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScalarValue {
    /// UTF-8 string.
    Str(String),
    /// Signed 64-bit integer.
    Int(i64),
    /// Boolean.
    Bool(bool),
}

impl ScalarValue {
    /// Compares this operand against a JSON value of the same kind.
    ///
    /// Returns `None` when the kinds differ (a type-mismatched comparison
    /// never matches, it does not error).
    fn compare(&self, value: &Value) -> Option<Ordering> {
        match (self, value) {
            (ScalarValue::Str(s), Value::String(v)) => Some(v.as_str().cmp(s.as_str())),
            (ScalarValue::Int(i), Value::Number(n)) => n.as_i64().map(|v| v.cmp(i)),
            (ScalarValue::Bool(b), Value::Bool(v)) => Some(v.cmp(b)),
            _ => None,
        }
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::Str(value.to_string())
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Int(value)
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        ScalarValue::Bool(value)
    }
}

impl From<PrincipalId> for ScalarValue {
    fn from(principal: PrincipalId) -> Self {
        // Row owner columns store the principal's numeric id.
        ScalarValue::Int(u64::from(principal) as i64)
    }
}

impl From<DepartmentId> for ScalarValue {
    fn from(department: DepartmentId) -> Self {
        ScalarValue::Int(u64::from(department) as i64)
    }
}

// ============================================================================
// Predicate
// ============================================================================

/// A typed row predicate over named fields.
///
/// Scope narrowing is expressed as structured predicates handed to the data
/// layer, never as text fragments spliced into a query language. Predicates
/// can be combined with `And`, `Or`, and `Not` to express arbitrarily
/// complex row filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Predicate {
    /// Field equals the value.
    Eq { field: String, value: ScalarValue },
    /// Field does not equal the value.
    Ne { field: String, value: ScalarValue },
    /// Field is less than the value.
    Lt { field: String, value: ScalarValue },
    /// Field is less than or equal to the value.
    Le { field: String, value: ScalarValue },
    /// Field is greater than the value.
    Gt { field: String, value: ScalarValue },
    /// Field is greater than or equal to the value.
    Ge { field: String, value: ScalarValue },
    /// Field is one of the listed values.
    In {
        field: String,
        values: Vec<ScalarValue>,
    },
    /// All sub-predicates must hold.
    And(Vec<Predicate>),
    /// At least one sub-predicate must hold.
    Or(Vec<Predicate>),
    /// The sub-predicate must not hold.
    Not(Box<Predicate>),
}

impl Predicate {
    /// Convenience constructor for an equality predicate.
    pub fn eq(field: impl Into<String>, value: impl Into<ScalarValue>) -> Self {
        Predicate::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Evaluates this predicate against a JSON record.
    ///
    /// Field lookups are top-level only. A missing field or a
    /// type-mismatched comparison evaluates to `false`, never an error.
    pub fn matches(&self, record: &Value) -> bool {
        match self {
            Predicate::Eq { field, value } => {
                cmp_field(record, field, value).is_some_and(Ordering::is_eq)
            }
            Predicate::Ne { field, value } => {
                cmp_field(record, field, value).is_some_and(Ordering::is_ne)
            }
            Predicate::Lt { field, value } => {
                cmp_field(record, field, value).is_some_and(Ordering::is_lt)
            }
            Predicate::Le { field, value } => {
                cmp_field(record, field, value).is_some_and(Ordering::is_le)
            }
            Predicate::Gt { field, value } => {
                cmp_field(record, field, value).is_some_and(Ordering::is_gt)
            }
            Predicate::Ge { field, value } => {
                cmp_field(record, field, value).is_some_and(Ordering::is_ge)
            }
            Predicate::In { field, values } => record.get(field).is_some_and(|v| {
                values
                    .iter()
                    .any(|candidate| candidate.compare(v).is_some_and(Ordering::is_eq))
            }),
            Predicate::And(sub) => sub.iter().all(|p| p.matches(record)),
            Predicate::Or(sub) => sub.iter().any(|p| p.matches(record)),
            Predicate::Not(sub) => !sub.matches(record),
        }
    }
}

/// Compares a record field against an operand.
///
/// `Some(Ordering)` reflects `record.field <op> operand`; `None` means the
/// field is absent or of a different kind.
fn cmp_field(record: &Value, field: &str, value: &ScalarValue) -> Option<Ordering> {
    record.get(field).and_then(|v| value.compare(v))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_id_conversions() {
        let principal = PrincipalId::from(42);
        assert_eq!(u64::from(principal), 42);
        assert_eq!(principal.to_string(), "42");

        let role = RoleId::new(7);
        assert_eq!(u64::from(role), 7);
    }

    #[test]
    fn test_auth_context() {
        let ctx = AuthContext::from(PrincipalId::new(5));
        assert!(ctx.is_authenticated());
        assert_eq!(ctx.principal(), Some(PrincipalId::new(5)));

        assert!(!AuthContext::Anonymous.is_authenticated());
        assert_eq!(AuthContext::Anonymous.principal(), None);
    }

    #[test]
    fn test_scope_priority_ordering() {
        // All > Department > Custom > SelfOnly
        assert!(DataScope::All.priority() > DataScope::Department.priority());
        assert!(DataScope::Department.priority() > DataScope::Custom(vec![]).priority());
        assert!(DataScope::Custom(vec![]).priority() > DataScope::SelfOnly.priority());
    }

    #[test]
    fn test_default_scope_is_narrowest() {
        assert_eq!(DataScope::default(), DataScope::SelfOnly);
    }

    #[test]
    fn test_predicate_eq() {
        let record = json!({"owner_id": 42, "status": "active"});

        assert!(Predicate::eq("owner_id", 42i64).matches(&record));
        assert!(!Predicate::eq("owner_id", 43i64).matches(&record));
        assert!(Predicate::eq("status", "active").matches(&record));
    }

    #[test]
    fn test_predicate_missing_field_never_matches() {
        let record = json!({"owner_id": 42});

        assert!(!Predicate::eq("absent", 1i64).matches(&record));
        let ne = Predicate::Ne {
            field: "absent".to_string(),
            value: ScalarValue::Int(1),
        };
        // Ne also fails on a missing field: no comparison, no match.
        assert!(!ne.matches(&record));
    }

    #[test]
    fn test_predicate_type_mismatch_never_matches() {
        let record = json!({"owner_id": "not-a-number"});
        assert!(!Predicate::eq("owner_id", 42i64).matches(&record));
    }

    #[test]
    fn test_predicate_ordering() {
        let record = json!({"amount": 100});

        let gt = Predicate::Gt {
            field: "amount".to_string(),
            value: ScalarValue::Int(50),
        };
        let lt = Predicate::Lt {
            field: "amount".to_string(),
            value: ScalarValue::Int(50),
        };
        assert!(gt.matches(&record));
        assert!(!lt.matches(&record));
    }

    #[test]
    fn test_predicate_in_list() {
        let record = json!({"region": "eu-west"});

        let pred = Predicate::In {
            field: "region".to_string(),
            values: vec![ScalarValue::from("us-east"), ScalarValue::from("eu-west")],
        };
        assert!(pred.matches(&record));
    }

    #[test]
    fn test_predicate_combinators() {
        let record = json!({"owner_id": 42, "status": "active"});

        let both = Predicate::And(vec![
            Predicate::eq("owner_id", 42i64),
            Predicate::eq("status", "active"),
        ]);
        assert!(both.matches(&record));

        let either = Predicate::Or(vec![
            Predicate::eq("owner_id", 99i64),
            Predicate::eq("status", "active"),
        ]);
        assert!(either.matches(&record));

        let negated = Predicate::Not(Box::new(Predicate::eq("status", "archived")));
        assert!(negated.matches(&record));
    }
}
