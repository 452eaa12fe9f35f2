//! User-facing preferences shared across screens.

use serde::{Deserialize, Serialize};

/// Preferences every view reads from one place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Dark colour scheme
    #[serde(default)]
    pub dark_mode: bool,

    /// Signed-in freelancer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_user: Option<UserProfile>,
}

/// The freelancer operating the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Display name
    pub name: String,
    /// Contact email
    pub email: String,
}
