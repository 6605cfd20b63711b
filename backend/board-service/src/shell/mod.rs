//! Presentation Shell.
//!
//! Three screens, chosen only by the observed session: `Loading` until the
//! provider answers, `Anonymous` with the credential form, `Authenticated`
//! with the workspace (identity summary, composer, mounted board).

mod form;
pub mod html;
mod screen;

pub use form::{CredentialForm, FormMode};
pub use screen::{
    ComposerView, FeedStatus, FeedView, FormView, PostCard, Screen, UserSummary, WorkspaceView,
};

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::board::{BoardError, BoardView};
use crate::composer::{Composer, ComposerError};
use crate::feed::FeedStore;
use crate::i18n::Locale;
use crate::identity::{handle_auth, AuthAction, AuthError, IdentityGateway, SessionWatch};
use crate::models::{Identity, SessionState};
use crate::store::{AccessRules, DocumentStore};

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("already signed in")]
    NotAnonymous,

    #[error("sign in first")]
    NotAuthenticated,

    #[error("{message}")]
    Auth { message: String, source: AuthError },

    #[error(transparent)]
    Composer(#[from] ComposerError),

    #[error(transparent)]
    Board(#[from] BoardError),
}

#[derive(Debug, Clone)]
pub struct ShellSettings {
    pub locale: Locale,
    pub image_warn_bytes: usize,
    pub federated_provider: String,
    /// Rule text shown with the degraded notice
    pub rules_hint: String,
}

impl Default for ShellSettings {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            image_warn_bytes: crate::composer::DEFAULT_IMAGE_WARN_BYTES,
            federated_provider: "google".to_string(),
            rules_hint: AccessRules::recommended().describe(),
        }
    }
}

/// The authenticated screen's state
pub struct Workspace {
    identity: Identity,
    board: BoardView,
    composer: Composer,
}

impl Workspace {
    fn mount(identity: Identity, feed: FeedStore, image_warn_bytes: usize) -> Self {
        Self {
            identity,
            board: BoardView::mount(feed),
            composer: Composer::new(image_warn_bytes),
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn board(&self) -> &BoardView {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut BoardView {
        &mut self.board
    }

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    pub fn composer_mut(&mut self) -> &mut Composer {
        &mut self.composer
    }

    /// Submit the composer; failures become board state
    pub async fn submit(&mut self) -> Result<Uuid, ComposerError> {
        self.board.dismiss_alert();
        match self.composer.submit(self.board.feed()).await {
            Ok(id) => Ok(id),
            Err(ComposerError::PermissionDenied) => {
                self.board.degrade();
                Err(ComposerError::PermissionDenied)
            }
            Err(e) => {
                self.board.set_alert(e.text());
                Err(e)
            }
        }
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), BoardError> {
        self.board.delete(id).await
    }
}

pub enum ShellState {
    Loading,
    Anonymous(CredentialForm),
    Authenticated(Workspace),
}

pub struct Shell {
    gateway: Arc<IdentityGateway>,
    store: Arc<dyn DocumentStore>,
    settings: ShellSettings,
    state: ShellState,
}

impl Shell {
    pub fn new(
        gateway: Arc<IdentityGateway>,
        store: Arc<dyn DocumentStore>,
        settings: ShellSettings,
    ) -> Self {
        Self {
            gateway,
            store,
            settings,
            state: ShellState::Loading,
        }
    }

    pub fn state(&self) -> &ShellState {
        &self.state
    }

    pub fn settings(&self) -> &ShellSettings {
        &self.settings
    }

    pub fn gateway(&self) -> &Arc<IdentityGateway> {
        &self.gateway
    }

    /// The only transition function. Re-applying the current session is a
    /// no-op, so the mounted board survives duplicate notifications.
    pub fn apply(&mut self, session: SessionState) {
        match session {
            SessionState::Unknown => {
                if !matches!(self.state, ShellState::Loading) {
                    self.state = ShellState::Loading;
                }
            }
            SessionState::SignedOut => {
                if !matches!(self.state, ShellState::Anonymous(_)) {
                    debug!("shell: anonymous");
                    self.state = ShellState::Anonymous(CredentialForm::default());
                }
            }
            SessionState::SignedIn(identity) => {
                if let ShellState::Authenticated(workspace) = &mut self.state {
                    if workspace.identity.uid == identity.uid {
                        workspace.identity = identity;
                        return;
                    }
                }

                debug!(uid = %identity.uid, "shell: authenticated");
                let feed = FeedStore::new(self.store.clone(), self.gateway.session_watch());
                // Replacing the state drops any previous workspace and its subscription
                self.state = ShellState::Authenticated(Workspace::mount(
                    identity,
                    feed,
                    self.settings.image_warn_bytes,
                ));
            }
        }
    }

    /// Apply the gateway's latest session value
    pub fn sync(&mut self) {
        let session = self.gateway.current_session();
        self.apply(session);
    }

    pub fn form_mut(&mut self) -> Result<&mut CredentialForm, ShellError> {
        match &mut self.state {
            ShellState::Anonymous(form) => Ok(form),
            _ => Err(ShellError::NotAnonymous),
        }
    }

    pub fn workspace(&self) -> Result<&Workspace, ShellError> {
        match &self.state {
            ShellState::Authenticated(workspace) => Ok(workspace),
            _ => Err(ShellError::NotAuthenticated),
        }
    }

    pub fn workspace_mut(&mut self) -> Result<&mut Workspace, ShellError> {
        match &mut self.state {
            ShellState::Authenticated(workspace) => Ok(workspace),
            _ => Err(ShellError::NotAuthenticated),
        }
    }

    /// Sign in or sign up according to the form's mode
    pub async fn submit_credentials(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<(), ShellError> {
        let mode = {
            let form = self.form_mut()?;
            form.begin(email);
            form.mode
        };

        let result = match mode {
            FormMode::SignIn => self.gateway.sign_in(email, password).await,
            FormMode::SignUp => self.gateway.sign_up(email, password).await,
        };
        self.settle_auth(mode.action(), result)
    }

    pub async fn sign_in_federated(&mut self) -> Result<(), ShellError> {
        self.form_mut()?.begin("");
        let result = self.gateway.sign_in_with_federated_provider().await;
        self.settle_auth(AuthAction::Federated, result)
    }

    fn settle_auth(
        &mut self,
        action: AuthAction,
        result: Result<(), AuthError>,
    ) -> Result<(), ShellError> {
        match result {
            Ok(()) => {
                self.sync();
                Ok(())
            }
            Err(source) => {
                let message = handle_auth(action, &source, self.settings.locale).to_string();
                if let Ok(form) = self.form_mut() {
                    form.finish(Some(message.clone()));
                }
                Err(ShellError::Auth { message, source })
            }
        }
    }

    /// Sign out. A provider failure is logged and the screen is left as is.
    pub async fn sign_out(&mut self) {
        if let ShellState::Authenticated(_) = self.state {
            if let Err(e) = self.gateway.sign_out().await {
                warn!(error = %e, "sign-out failed");
                return;
            }
            self.sync();
        }
    }

    pub fn screen(&self) -> Screen {
        let locale = self.settings.locale;
        match &self.state {
            ShellState::Loading => Screen::Loading,
            ShellState::Anonymous(form) => Screen::Anonymous(FormView {
                mode: form.mode,
                email: form.email.clone(),
                error: form.error.clone(),
                federated_provider: self.settings.federated_provider.clone(),
            }),
            ShellState::Authenticated(workspace) => {
                let composer = workspace.composer();
                let board = workspace.board().state();
                Screen::Authenticated(WorkspaceView {
                    user: UserSummary::from(workspace.identity()),
                    composer: ComposerView {
                        title: composer.title().to_string(),
                        content_html: composer.content_html(),
                        selection: composer.buffer().selection(),
                        active_marks: composer.buffer().active_marks(),
                        notice: composer.notice().map(|t| t.in_locale(locale).to_string()),
                    },
                    feed: FeedView::new(
                        &board,
                        Some(workspace.identity().uid.as_str()),
                        locale,
                        &self.settings.rules_hint,
                    ),
                })
            }
        }
    }
}

/// Feed session changes into `Shell::apply` until the gateway goes away
pub fn spawn_session_driver(shell: Arc<Mutex<Shell>>, mut session: SessionWatch) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let current = session.borrow_and_update().clone();
            shell.lock().await.apply(current);
            if session.changed().await.is_err() {
                break;
            }
        }
        info!("session driver stopped");
    })
}
