//! Value Objects for the wire protocol.

use std::{borrow::Borrow, fmt};

use super::error::ValueObjectError;

/// Domain of the only kind reachable before authentication.
pub const BOOTSTRAP_DOMAIN: &str = "auth";

/// Action of the only kind reachable before authentication.
pub const BOOTSTRAP_ACTION: &str = "validate";

/// Message kind value object, `<domain>:<action>`.
///
/// Used as the compound key into the handler registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Kind {
    domain: String,
    action: String,
}

impl Kind {
    /// Parse a raw `kind` string.
    pub fn parse(raw: &str) -> Result<Self, ValueObjectError> {
        let mut parts = raw.split(':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(domain), Some(action), None) if !domain.is_empty() && !action.is_empty() => {
                Ok(Self {
                    domain: domain.to_string(),
                    action: action.to_string(),
                })
            }
            _ => Err(ValueObjectError::KindMalformed(raw.to_string())),
        }
    }

    /// Kind from compile-time parts, which must be non-empty and colon-free.
    pub fn from_static(domain: &'static str, action: &'static str) -> Self {
        debug_assert!(
            !domain.is_empty()
                && !action.is_empty()
                && !domain.contains(':')
                && !action.contains(':'),
            "invalid static kind {domain}:{action}"
        );
        Self {
            domain: domain.to_string(),
            action: action.to_string(),
        }
    }

    /// The bootstrap kind, `auth:validate`.
    pub fn bootstrap() -> Self {
        Self::from_static(BOOTSTRAP_DOMAIN, BOOTSTRAP_ACTION)
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    /// Whether this kind may be dispatched on an unauthenticated session.
    ///
    /// Both parts must match; `auth:<anything>` and `<anything>:validate`
    /// are rejected.
    pub fn is_bootstrap(&self) -> bool {
        self.domain == BOOTSTRAP_DOMAIN && self.action == BOOTSTRAP_ACTION
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.domain, self.action)
    }
}

/// Authenticated identity value object.
///
/// Assigned by an authentication handler; used as the hub registry key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity(String);

impl Identity {
    /// Create a new Identity.
    ///
    /// # Errors
    ///
    /// Returns `ValueObjectError::IdentityEmpty` for an empty string, which
    /// is reserved for "not yet authenticated".
    pub fn new(id: impl Into<String>) -> Result<Self, ValueObjectError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValueObjectError::IdentityEmpty);
        }
        Ok(Self(id))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl Borrow<str> for Identity {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
