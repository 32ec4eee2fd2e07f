//! Caller identity and scope resolution.
//!
//! The identity provider authenticates callers and asserts organization
//! membership and role; this module turns that assertion into the single
//! opaque scope every downstream filter keys on.

use std::fmt;
use std::str::FromStr;

/// Caller role within an organization scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum ScopeRole {
    /// Regular member.
    #[default]
    Member,
    /// Organization administrator.
    Admin,
}

impl ScopeRole {
    /// Convert role to its string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeRole::Member => "member",
            ScopeRole::Admin => "admin",
        }
    }
}

impl fmt::Display for ScopeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ScopeRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "member" => Ok(ScopeRole::Member),
            "admin" => Ok(ScopeRole::Admin),
            _ => Err(format!("unknown role: {s}")),
        }
    }
}

impl TryFrom<String> for ScopeRole {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// An authenticated caller, as asserted by the identity provider.
#[derive(Debug, Clone)]
pub struct Caller {
    /// The caller's user id.
    pub user_id: String,
    /// Organization the caller belongs to, if any.
    pub org_id: Option<String>,
    /// Role asserted for the organization.
    pub role: ScopeRole,
}

impl Caller {
    /// Create a caller with a personal (non-organization) identity.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            org_id: None,
            role: ScopeRole::Member,
        }
    }

    /// Set the organization membership.
    pub fn with_org(mut self, org_id: impl Into<String>, role: ScopeRole) -> Self {
        self.org_id = Some(org_id.into());
        self.role = role;
        self
    }

    /// Resolve the caller's scope.
    ///
    /// Organization id if the caller belongs to one, else the caller's own
    /// user id. Roles only exist inside an organization; a personal scope
    /// is always `member`.
    pub fn resolve_scope(&self) -> Scope {
        match &self.org_id {
            Some(org_id) => Scope {
                id: org_id.clone(),
                role: self.role,
            },
            None => Scope {
                id: self.user_id.clone(),
                role: ScopeRole::Member,
            },
        }
    }
}

/// A resolved visibility scope, computed once per request.
///
/// File and favorite operations are scope-agnostic: they key on `id` and
/// never branch on whether it names an organization or a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    /// Opaque scope identifier.
    pub id: String,
    /// The caller's role within this scope.
    pub role: ScopeRole,
}

impl Scope {
    /// Check if the caller administers this scope.
    pub fn is_admin(&self) -> bool {
        self.role == ScopeRole::Admin
    }
}
