//! Process-wide handles, constructed once at startup and injected into
//! handlers.

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::{Config, StoreBackend};
use crate::i18n::Locale;
use crate::identity::{
    FederatedAuthority, FederatedProfile, IdentityGateway, IdentityProvider,
    MemoryIdentityProvider, StaticFederatedAuthority,
};
use crate::shell::{spawn_session_driver, Shell, ShellSettings};
use crate::store::{AccessRules, DocumentStore, MemoryDocumentStore, PgDocumentStore};

#[derive(Clone)]
pub struct AppState {
    pub shell: Arc<Mutex<Shell>>,
    pub gateway: Arc<IdentityGateway>,
    pub store: Arc<dyn DocumentStore>,
    pub locale: Locale,
    /// Largest request body accepted, sized for image uploads
    pub max_payload_bytes: usize,
    driver: Arc<JoinHandle<()>>,
}

impl AppState {
    /// Wire provider, gateway, store and shell, then resolve the first session
    pub async fn assemble(
        provider: Arc<dyn IdentityProvider>,
        store: Arc<dyn DocumentStore>,
        settings: ShellSettings,
        max_payload_bytes: usize,
    ) -> Self {
        let gateway = Arc::new(IdentityGateway::new(provider));
        let locale = settings.locale;
        let shell = Arc::new(Mutex::new(Shell::new(
            gateway.clone(),
            store.clone(),
            settings,
        )));

        gateway.bootstrap().await;
        shell.lock().await.sync();
        let driver = spawn_session_driver(shell.clone(), gateway.session_watch());

        Self {
            shell,
            gateway,
            store,
            locale,
            max_payload_bytes,
            driver: Arc::new(driver),
        }
    }

    /// Build everything the configuration asks for
    pub async fn from_config(config: &Config) -> Result<Self> {
        let rules = config.store.access_rules()?;

        let store: Arc<dyn DocumentStore> = match config.store.backend {
            StoreBackend::Memory => {
                info!("using in-memory document store");
                Arc::new(MemoryDocumentStore::with_limit(
                    rules,
                    config.store.max_document_bytes,
                ))
            }
            StoreBackend::Postgres => {
                let url = config
                    .store
                    .database_url
                    .as_deref()
                    .context("DATABASE_URL is required for the postgres store")?;
                let store = PgDocumentStore::connect(
                    url,
                    config.store.max_connections,
                    rules,
                    config.store.max_document_bytes,
                )
                .await
                .context("failed to connect document store")?;
                Arc::new(store)
            }
        };

        let federated: Arc<dyn FederatedAuthority> = match &config.federated.static_email {
            Some(email) => Arc::new(StaticFederatedAuthority::approving(
                config.federated.provider_name.clone(),
                FederatedProfile {
                    subject: email.clone(),
                    email: Some(email.clone()),
                },
            )),
            None => Arc::new(StaticFederatedAuthority::disabled()),
        };
        let provider = Arc::new(MemoryIdentityProvider::new(federated));

        let settings = ShellSettings {
            locale: config.app.locale,
            image_warn_bytes: config.composer.image_warn_bytes,
            federated_provider: config.federated.provider_name.clone(),
            rules_hint: AccessRules::recommended().describe(),
        };

        // Base64 inflates images by a third, leave room for that
        let max_payload_bytes = config.store.max_document_bytes * 2;

        Ok(Self::assemble(provider, store, settings, max_payload_bytes).await)
    }

    /// Stop following session changes
    pub fn shutdown(&self) {
        self.driver.abort();
    }
}
