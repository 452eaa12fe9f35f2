//! Client invitation model - read-only dashboard access handed to a client.

use serde::{Deserialize, Serialize};
use crate::error::ValidationError;
use crate::id::InvitationId;
use crate::Time;

/// How long an invite link stays valid.
pub const INVITE_VALIDITY_DAYS: i64 = 7;

/// An invitation sent to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInvitation {
    /// Unique identifier
    pub id: InvitationId,

    /// Client contact name
    pub client_name: String,

    /// Client email address
    pub client_email: String,

    /// Project the client gets access to
    pub project_name: String,

    /// Personal message included in the email
    #[serde(default)]
    pub message: String,

    /// Granted access level
    pub access_level: AccessLevel,

    /// Delivery state
    pub status: InvitationStatus,

    /// When the invitation was sent
    pub invited_at: Time,

    /// Link the client opens
    pub invite_link: String,

    /// When the link stops working
    pub expires_at: Time,

    /// Whether the (simulated) email went out
    pub email_sent: bool,
}

impl ClientInvitation {
    /// Whether the link is still valid at `now`.
    pub fn is_active(&self, now: Time) -> bool {
        now < self.expires_at
    }
}

/// What an invited client may do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessLevel {
    /// See progress & updates
    #[default]
    ViewOnly,
    /// View and add feedback
    Comment,
}

impl AccessLevel {
    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::ViewOnly => "view-only",
            AccessLevel::Comment => "comment",
        }
    }
}

impl std::fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for AccessLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "view-only" | "view" => Ok(AccessLevel::ViewOnly),
            "comment" => Ok(AccessLevel::Comment),
            other => Err(ValidationError::unknown("access level", other)),
        }
    }
}

/// Delivery state of an invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvitationStatus {
    /// Delivered to the client; the only state an invitation reaches.
    Sent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_level_defaults_to_view_only() {
        assert_eq!(AccessLevel::default(), AccessLevel::ViewOnly);
        assert_eq!(serde_json::to_string(&AccessLevel::ViewOnly).unwrap(), "\"view-only\"");
        assert_eq!("comment".parse::<AccessLevel>().unwrap(), AccessLevel::Comment);
        assert!("admin".parse::<AccessLevel>().is_err());
    }
}
