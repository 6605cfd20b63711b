//! Identity provider boundary.
//!
//! The gateway talks to an identity provider only through these traits, so
//! an in-process provider and a hosted one are interchangeable.

use async_trait::async_trait;

use super::error::{AuthError, AuthErrorCode};
use crate::models::Identity;

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Identity persisted by the provider from an earlier sign-in, if any
    async fn current_identity(&self) -> Result<Option<Identity>, AuthError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    async fn create_account(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    async fn sign_in_federated(&self) -> Result<Identity, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;
}

/// Profile returned by a federated exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FederatedProfile {
    /// Provider-scoped subject identifier
    pub subject: String,
    pub email: Option<String>,
}

/// The interactive half of federated sign-in (an OAuth popup in a browser)
#[async_trait]
pub trait FederatedAuthority: Send + Sync {
    fn provider_name(&self) -> &str;

    async fn authorize(&self) -> Result<FederatedProfile, AuthError>;
}

/// Authority answering every exchange with a fixed outcome
pub struct StaticFederatedAuthority {
    name: String,
    outcome: Result<FederatedProfile, AuthErrorCode>,
}

impl StaticFederatedAuthority {
    pub fn approving(name: impl Into<String>, profile: FederatedProfile) -> Self {
        Self {
            name: name.into(),
            outcome: Ok(profile),
        }
    }

    pub fn failing(name: impl Into<String>, code: AuthErrorCode) -> Self {
        Self {
            name: name.into(),
            outcome: Err(code),
        }
    }

    /// No federated provider configured: every attempt reports a blocked popup
    pub fn disabled() -> Self {
        Self::failing("none", AuthErrorCode::PopupBlocked)
    }
}

#[async_trait]
impl FederatedAuthority for StaticFederatedAuthority {
    fn provider_name(&self) -> &str {
        &self.name
    }

    async fn authorize(&self) -> Result<FederatedProfile, AuthError> {
        self.outcome
            .clone()
            .map_err(|code| AuthError::new(code, format!("{} sign-in failed", self.name)))
    }
}
