//! Identity Gateway: the only path through which the shell signs users
//! in and out.
//!
//! Operations resolve to `()` on success. The new session is never
//! returned from the call; it is published on the session watch channel
//! and observed asynchronously by every subscriber.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

use super::error::AuthError;
use super::provider::IdentityProvider;
use crate::metrics::AUTH_ATTEMPTS_TOTAL;
use crate::models::{Identity, SessionState};

/// Receiving side of the session channel
pub type SessionWatch = watch::Receiver<SessionState>;

pub struct IdentityGateway {
    provider: Arc<dyn IdentityProvider>,
    session: watch::Sender<SessionState>,
}

impl IdentityGateway {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        let (session, _) = watch::channel(SessionState::Unknown);
        Self { provider, session }
    }

    pub fn session_watch(&self) -> SessionWatch {
        self.session.subscribe()
    }

    pub fn current_session(&self) -> SessionState {
        self.session.borrow().clone()
    }

    pub fn current_identity(&self) -> Option<Identity> {
        self.session.borrow().identity().cloned()
    }

    /// Resolve the initial session from the provider. A provider failure
    /// leaves the user signed out.
    pub async fn bootstrap(&self) {
        let state = match self.provider.current_identity().await {
            Ok(Some(identity)) => SessionState::SignedIn(identity),
            Ok(None) => SessionState::SignedOut,
            Err(e) => {
                warn!(error = %e, "session bootstrap failed, treating as signed out");
                SessionState::SignedOut
            }
        };
        self.publish(state);
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let result = self.provider.sign_in(email, password).await;
        self.settle("password", result)
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let result = self.provider.create_account(email, password).await;
        self.settle("sign_up", result)
    }

    pub async fn sign_in_with_federated_provider(&self) -> Result<(), AuthError> {
        let result = self.provider.sign_in_federated().await;
        self.settle("federated", result)
    }

    pub async fn sign_out(&self) -> Result<(), AuthError> {
        match self.provider.sign_out().await {
            Ok(()) => {
                AUTH_ATTEMPTS_TOTAL
                    .with_label_values(&["sign_out", "ok"])
                    .inc();
                info!("signed out");
                self.publish(SessionState::SignedOut);
                Ok(())
            }
            Err(e) => {
                AUTH_ATTEMPTS_TOTAL
                    .with_label_values(&["sign_out", "error"])
                    .inc();
                warn!(error = %e, "sign-out failed");
                Err(e)
            }
        }
    }

    fn settle(
        &self,
        method: &'static str,
        result: Result<Identity, AuthError>,
    ) -> Result<(), AuthError> {
        match result {
            Ok(identity) => {
                AUTH_ATTEMPTS_TOTAL.with_label_values(&[method, "ok"]).inc();
                info!(uid = %identity.uid, method, "signed in");
                self.publish(SessionState::SignedIn(identity));
                Ok(())
            }
            Err(e) => {
                AUTH_ATTEMPTS_TOTAL
                    .with_label_values(&[method, "error"])
                    .inc();
                info!(code = %e.code, method, "identity operation rejected");
                Err(e)
            }
        }
    }

    fn publish(&self, state: SessionState) {
        self.session.send_replace(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::error::AuthErrorCode;
    use crate::identity::memory::MemoryIdentityProvider;
    use crate::identity::provider::{FederatedProfile, StaticFederatedAuthority};
    use std::time::Duration;

    fn gateway() -> IdentityGateway {
        let federated = StaticFederatedAuthority::approving(
            "google",
            FederatedProfile {
                subject: "s".into(),
                email: Some("fed@example.com".into()),
            },
        );
        IdentityGateway::new(Arc::new(MemoryIdentityProvider::new(Arc::new(federated))))
    }

    #[tokio::test]
    async fn test_starts_unknown_and_bootstraps_signed_out() {
        let gateway = gateway();
        assert_eq!(gateway.current_session(), SessionState::Unknown);
        gateway.bootstrap().await;
        assert_eq!(gateway.current_session(), SessionState::SignedOut);
        assert!(gateway.current_identity().is_none());
    }

    #[tokio::test]
    async fn test_sign_up_is_observed_by_subscribers() {
        let gateway = gateway();
        gateway.bootstrap().await;
        let mut watch = gateway.session_watch();

        gateway.sign_up("new@example.com", "secret1").await.unwrap();

        tokio::time::timeout(Duration::from_secs(1), watch.changed())
            .await
            .expect("session change not observed")
            .unwrap();
        let observed = watch.borrow_and_update().clone();
        assert_eq!(
            observed.identity().and_then(|i| i.email.clone()).as_deref(),
            Some("new@example.com")
        );
    }

    #[tokio::test]
    async fn test_failed_sign_in_leaves_session_untouched() {
        let gateway = gateway();
        gateway.bootstrap().await;
        let err = gateway
            .sign_in("ghost@example.com", "secret1")
            .await
            .unwrap_err();
        assert_eq!(err.code, AuthErrorCode::UserNotFound);
        assert_eq!(gateway.current_session(), SessionState::SignedOut);
    }

    #[tokio::test]
    async fn test_sign_out_publishes_signed_out() {
        let gateway = gateway();
        gateway.sign_in_with_federated_provider().await.unwrap();
        assert!(gateway.current_identity().is_some());
        gateway.sign_out().await.unwrap();
        assert_eq!(gateway.current_session(), SessionState::SignedOut);
    }

    #[tokio::test]
    async fn test_bootstrap_restores_provider_session() {
        let gateway = gateway();
        gateway.sign_up("keep@example.com", "secret1").await.unwrap();

        // A second gateway over the same provider sees the persisted session
        let provider = gateway.provider.clone();
        let restored = IdentityGateway::new(provider);
        restored.bootstrap().await;
        assert_eq!(
            restored.current_identity().and_then(|i| i.email),
            Some("keep@example.com".to_string())
        );
    }
}
