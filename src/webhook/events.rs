//! GitHub webhook event types
//!
//! Event routing is a match over closed enums rather than string branching:
//! the `X-GitHub-Event` header maps to [`EventKind`] and the organization
//! event's `action` field to [`OrgAction`], each with an explicit
//! unknown/other arm.

use serde::Deserialize;

/// Delivery header GitHub sets on every webhook request
pub const EVENT_HEADER: &str = "X-GitHub-Event";

// =============================================================================
// Event Kind
// =============================================================================

/// Recognized values of the `X-GitHub-Event` header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Registration handshake
    Ping,
    /// Organization membership change
    Organization,
    /// Anything else; acknowledged and ignored
    Unknown,
}

impl EventKind {
    /// Classify the raw header value; a missing header is `Unknown`.
    pub fn from_header(value: Option<&str>) -> Self {
        match value {
            Some("ping") => EventKind::Ping,
            Some("organization") => EventKind::Organization,
            _ => EventKind::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Ping => "ping",
            EventKind::Organization => "organization",
            EventKind::Unknown => "unknown",
        }
    }
}

// =============================================================================
// Organization Event Payload
// =============================================================================

/// `action` values carried by organization events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrgAction {
    MemberAdded,
    MemberInvited,
    MemberRemoved,
    #[serde(other)]
    Other,
}

/// Organization event payload, reduced to the fields the receiver reads.
///
/// Everything is optional so a missing key surfaces as `None` instead of a
/// deserialization failure; the handler logs and acknowledges anyway.
#[derive(Debug, Deserialize)]
pub struct OrgEvent {
    pub action: Option<OrgAction>,
    pub membership: Option<OrgMembership>,
}

#[derive(Debug, Deserialize)]
pub struct OrgMembership {
    pub user: Option<OrgUser>,
}

#[derive(Debug, Deserialize)]
pub struct OrgUser {
    pub login: Option<String>,
}

impl OrgEvent {
    /// The affected member's login, when the payload carries one.
    pub fn login(&self) -> Option<&str> {
        self.membership
            .as_ref()?
            .user
            .as_ref()?
            .login
            .as_deref()
    }
}

/// Ping payload; only the hook id is logged.
#[derive(Debug, Deserialize)]
pub struct PingEvent {
    pub hook: Option<PingHook>,
}

#[derive(Debug, Deserialize)]
pub struct PingHook {
    pub id: Option<u64>,
}
