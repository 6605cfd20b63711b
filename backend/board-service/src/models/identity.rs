use serde::{Deserialize, Serialize};

/// How the current identity authenticated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "provider", rename_all = "snake_case")]
pub enum SignInMethod {
    Password,
    Federated(String),
}

/// Authenticated identity as reported by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub uid: String,
    pub email: Option<String>,
    pub method: SignInMethod,
}

impl Identity {
    /// Uppercase first letter of the email, `U` when there is none
    pub fn initial(&self) -> char {
        self.email
            .as_deref()
            .and_then(|email| email.chars().next())
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('U')
    }
}

/// Session as mirrored from the identity provider
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    /// The provider has not answered yet
    #[default]
    Unknown,
    SignedOut,
    SignedIn(Identity),
}

impl SessionState {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            SessionState::SignedIn(identity) => Some(identity),
            _ => None,
        }
    }
}
