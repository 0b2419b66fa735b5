use serde::{Deserialize, Serialize};

/// The signed-in principal as reported by the identity provider.
///
/// Wholly replaced on every update, never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub email_verified: bool,
    /// Anonymous (guest) principals have no email or profile.
    #[serde(default)]
    pub is_anonymous: bool,
}

impl UserIdentity {
    /// Name to greet the user with: display name, then email, then `Guest`.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .or(self.email.as_deref())
            .unwrap_or("Guest")
    }
}
