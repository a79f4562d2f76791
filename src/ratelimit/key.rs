//! Request keys and scope namespacing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Subject used when neither a principal nor a client address is known.
pub const ANON_SUBJECT: &str = "anon";

/// The request class an admission check is made under.
///
/// Each scope has its own policy and its own counter store; counters
/// never bleed across scopes even for identical subjects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Assistant chat messages.
    Chat,
    /// Booking creation and mutation.
    Booking,
    /// Sign-in and token refresh.
    Auth,
}

impl Scope {
    /// Every scope the service knows about.
    pub const ALL: [Scope; 3] = [Scope::Chat, Scope::Booking, Scope::Auth];

    /// The scope's wire and key-namespace name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Chat => "chat",
            Scope::Booking => "booking",
            Scope::Auth => "auth",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when a scope name does not match any known scope.
#[derive(Debug, thiserror::Error)]
#[error("unknown rate limit scope: {0}")]
pub struct UnknownScope(String);

impl FromStr for Scope {
    type Err = UnknownScope;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chat" => Ok(Scope::Chat),
            "booking" => Ok(Scope::Booking),
            "auth" => Ok(Scope::Auth),
            other => Err(UnknownScope(other.to_string())),
        }
    }
}

/// Derive the store key for a request.
///
/// The subject is, in priority order: the authenticated principal id,
/// the client network address, or the literal [`ANON_SUBJECT`]
/// fallback. Empty strings count as absent.
pub fn derive_key(scope: Scope, principal: Option<&str>, remote_addr: Option<&str>) -> String {
    let subject = principal
        .filter(|p| !p.is_empty())
        .or_else(|| remote_addr.filter(|a| !a.is_empty()))
        .unwrap_or(ANON_SUBJECT);
    format!("{}:{}", scope.as_str(), subject)
}
