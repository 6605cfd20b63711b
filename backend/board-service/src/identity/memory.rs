//! In-process identity provider.
//!
//! Accounts live in a `DashMap` keyed by normalized email; password hashes
//! are Argon2id. The provider remembers the signed-in identity the way a
//! hosted provider persists its session across page loads.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use super::error::{AuthError, AuthErrorCode};
use super::password::{hash_password, verify_password};
use super::provider::{FederatedAuthority, IdentityProvider};
use super::validators::{normalize_email, validate_email};
use crate::models::{Identity, SignInMethod};

struct Account {
    uid: String,
    email: String,
    password_hash: String,
}

pub struct MemoryIdentityProvider {
    accounts: DashMap<String, Account>,
    /// "<provider>:<subject>" -> uid
    federated_links: DashMap<String, String>,
    federated: Arc<dyn FederatedAuthority>,
    current: RwLock<Option<Identity>>,
}

impl MemoryIdentityProvider {
    pub fn new(federated: Arc<dyn FederatedAuthority>) -> Self {
        Self {
            accounts: DashMap::new(),
            federated_links: DashMap::new(),
            federated,
            current: RwLock::new(None),
        }
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    async fn remember(&self, identity: Identity) -> Identity {
        *self.current.write().await = Some(identity.clone());
        identity
    }
}

async fn run_blocking<T, F>(work: F) -> Result<T, AuthError>
where
    F: FnOnce() -> Result<T, AuthError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AuthError::internal(format!("password task failed: {}", e)))?
}

#[async_trait]
impl IdentityProvider for MemoryIdentityProvider {
    async fn current_identity(&self) -> Result<Option<Identity>, AuthError> {
        Ok(self.current.read().await.clone())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let key = normalize_email(email);
        if !validate_email(&key) {
            return Err(AuthErrorCode::InvalidEmail.into());
        }

        let (uid, stored_email, password_hash) = match self.accounts.get(&key) {
            Some(account) => (
                account.uid.clone(),
                account.email.clone(),
                account.password_hash.clone(),
            ),
            None => return Err(AuthErrorCode::UserNotFound.into()),
        };

        let candidate = password.to_string();
        let matches = run_blocking(move || verify_password(&candidate, &password_hash)).await?;
        if !matches {
            debug!(%uid, "password mismatch");
            return Err(AuthErrorCode::WrongPassword.into());
        }

        Ok(self
            .remember(Identity {
                uid,
                email: Some(stored_email),
                method: SignInMethod::Password,
            })
            .await)
    }

    async fn create_account(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let key = normalize_email(email);
        if !validate_email(&key) {
            return Err(AuthErrorCode::InvalidEmail.into());
        }

        let candidate = password.to_string();
        let password_hash = run_blocking(move || hash_password(&candidate)).await?;

        let uid = Uuid::new_v4().simple().to_string();
        match self.accounts.entry(key.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                return Err(AuthErrorCode::EmailAlreadyInUse.into())
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(Account {
                    uid: uid.clone(),
                    email: key.clone(),
                    password_hash,
                });
            }
        }

        info!(%uid, "account created");
        Ok(self
            .remember(Identity {
                uid,
                email: Some(key),
                method: SignInMethod::Password,
            })
            .await)
    }

    async fn sign_in_federated(&self) -> Result<Identity, AuthError> {
        let profile = self.federated.authorize().await?;
        let provider = self.federated.provider_name().to_string();
        let link = format!("{}:{}", provider, profile.subject);

        let uid = self
            .federated_links
            .entry(link)
            .or_insert_with(|| Uuid::new_v4().simple().to_string())
            .value()
            .clone();

        Ok(self
            .remember(Identity {
                uid,
                email: profile.email.map(|email| normalize_email(&email)),
                method: SignInMethod::Federated(provider),
            })
            .await)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        *self.current.write().await = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::provider::{FederatedProfile, StaticFederatedAuthority};

    fn provider() -> MemoryIdentityProvider {
        MemoryIdentityProvider::new(Arc::new(StaticFederatedAuthority::approving(
            "google",
            FederatedProfile {
                subject: "sub-1".into(),
                email: Some("Fed@Example.com".into()),
            },
        )))
    }

    fn code(result: Result<Identity, AuthError>) -> AuthErrorCode {
        result.expect_err("expected failure").code
    }

    #[tokio::test]
    async fn test_sign_up_then_sign_in() {
        let provider = provider();
        let created = provider
            .create_account("Mina@Example.com", "secret1")
            .await
            .unwrap();
        assert_eq!(created.email.as_deref(), Some("mina@example.com"));

        let signed_in = provider.sign_in("mina@example.com", "secret1").await.unwrap();
        assert_eq!(signed_in.uid, created.uid);
        assert_eq!(
            provider.current_identity().await.unwrap(),
            Some(signed_in)
        );
    }

    #[tokio::test]
    async fn test_error_codes() {
        let provider = provider();
        provider.create_account("a@example.com", "secret1").await.unwrap();

        assert_eq!(
            code(provider.create_account("a@example.com", "secret2").await),
            AuthErrorCode::EmailAlreadyInUse
        );
        assert_eq!(
            code(provider.create_account("not-an-email", "secret1").await),
            AuthErrorCode::InvalidEmail
        );
        assert_eq!(
            code(provider.create_account("b@example.com", "123").await),
            AuthErrorCode::WeakPassword
        );
        assert_eq!(
            code(provider.sign_in("nobody@example.com", "secret1").await),
            AuthErrorCode::UserNotFound
        );
        assert_eq!(
            code(provider.sign_in("a@example.com", "wrong-one").await),
            AuthErrorCode::WrongPassword
        );
        assert_eq!(provider.account_count(), 1);
    }

    #[tokio::test]
    async fn test_federated_sign_in_is_stable_per_subject() {
        let provider = provider();
        let first = provider.sign_in_federated().await.unwrap();
        let second = provider.sign_in_federated().await.unwrap();
        assert_eq!(first.uid, second.uid);
        assert_eq!(first.email.as_deref(), Some("fed@example.com"));
        assert_eq!(first.method, SignInMethod::Federated("google".into()));
    }

    #[tokio::test]
    async fn test_federated_failure_passes_code_through() {
        let provider = MemoryIdentityProvider::new(Arc::new(StaticFederatedAuthority::failing(
            "google",
            AuthErrorCode::PopupClosedByUser,
        )));
        assert_eq!(
            code(provider.sign_in_federated().await),
            AuthErrorCode::PopupClosedByUser
        );
        assert_eq!(provider.current_identity().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_sign_out_forgets_identity() {
        let provider = provider();
        provider.create_account("a@example.com", "secret1").await.unwrap();
        provider.sign_out().await.unwrap();
        assert_eq!(provider.current_identity().await.unwrap(), None);
    }
}
