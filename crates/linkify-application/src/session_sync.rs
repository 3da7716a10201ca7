//! Session synchronizer.
//!
//! Reconciles three credential sources into one state machine: the locally
//! persisted token (validated at startup), credentials pushed by the
//! embedding host over the message channel, and interactive login. States
//! move `Unauthenticated -> Validating -> Authenticated`, falling back to
//! `Unauthenticated` on any validation failure.
//!
//! Handlers are cooperative: nothing blocks, and a verify result landing
//! after a newer credential superseded it is discarded, never applied.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use linkify_core::config::AppConfig;
use linkify_core::error::{LinkifyError, Result};
use linkify_core::gateway::{BackendGateway, VerifyResponse};
use linkify_core::message::{InboundMessage, OutboundMessage, RestoreAuthPayload};
use linkify_core::navigator::{Navigator, Route};
use linkify_core::session::{EmbeddingContext, Session, SessionStore, SyncState};
use linkify_interaction::dispatcher::{MessageDispatcher, Topic};
use linkify_interaction::host_link::HostLink;

/// State machine reconciling stored and host-pushed credentials.
pub struct SessionSynchronizer {
    config: AppConfig,
    context: EmbeddingContext,
    store: Arc<dyn SessionStore>,
    gateway: Arc<dyn BackendGateway>,
    navigator: Arc<dyn Navigator>,
    host: HostLink,
    state: RwLock<SyncState>,
    /// Token whose verify call is in flight; late results for any other
    /// token are stale and get discarded.
    pending_token: Mutex<Option<String>>,
}

impl SessionSynchronizer {
    pub fn new(
        config: AppConfig,
        context: EmbeddingContext,
        store: Arc<dyn SessionStore>,
        gateway: Arc<dyn BackendGateway>,
        navigator: Arc<dyn Navigator>,
        host: HostLink,
    ) -> Self {
        Self {
            config,
            context,
            store,
            gateway,
            navigator,
            host,
            state: RwLock::new(SyncState::Unauthenticated),
            pending_token: Mutex::new(None),
        }
    }

    /// Current synchronizer state.
    pub async fn state(&self) -> SyncState {
        *self.state.read().await
    }

    /// The established session, if any.
    pub async fn session(&self) -> Option<Session> {
        self.store.get().await
    }

    async fn set_state(&self, next: SyncState) {
        *self.state.write().await = next;
    }

    /// The established session matching a token, used to make credential
    /// re-delivery a no-op.
    async fn established_session(&self, token: &str) -> Option<Session> {
        if self.state().await != SyncState::Authenticated {
            return None;
        }
        self.store.get().await.filter(|session| session.token == token)
    }

    /// Clears every trace of the credential and falls back to
    /// `Unauthenticated`. Store failures are logged, not propagated: the
    /// in-memory state must fail safe regardless.
    async fn reset_unauthenticated(&self) {
        if let Err(e) = self.store.clear().await {
            warn!(error = %e, "failed to clear session store");
        }
        self.set_state(SyncState::Unauthenticated).await;
    }

    /// Validates a token persisted by a previous run.
    ///
    /// This is the one synchronous gate in the subsystem: it completes
    /// (success or failure) before protected content is rendered. Failures
    /// are silent toward the UI; the outcome is simply the resulting state.
    pub async fn validate_startup_session(&self) -> Result<()> {
        let Some(token) = self.store.stored_token().await else {
            debug!("no stored credential; starting unauthenticated");
            return Ok(());
        };

        self.set_state(SyncState::Validating).await;
        match self.gateway.verify().await {
            Ok(VerifyResponse {
                valid: true,
                user: Some(user),
            }) => {
                self.store.set(Session::new(token, user)).await?;
                self.set_state(SyncState::Authenticated).await;
                info!("stored credential validated");
            }
            Ok(_) => {
                info!("stored credential rejected; clearing session");
                self.reset_unauthenticated().await;
            }
            Err(e) => {
                warn!(error = %e, "startup verification failed; clearing session");
                self.reset_unauthenticated().await;
            }
        }
        Ok(())
    }

    /// Handles one session-concern message from the host. Never propagates
    /// an error across the listener boundary.
    pub async fn handle_message(&self, message: InboundMessage) {
        match message {
            InboundMessage::RestoreAuth(payload) => self.restore_session(payload).await,
            InboundMessage::ExtensionAuthToken(payload) => {
                // Failures stay local: the host may simply push again.
                if let Err(e) = self.establish_with_token(payload.token).await {
                    debug!(error = %e, "host credential not adopted");
                }
            }
            other => debug!(tag = other.tag(), "session listener ignoring message"),
        }
    }

    /// Adopts a host-restored credential without re-validation; the host
    /// already validated it. Re-delivery of the same credential is a no-op.
    async fn restore_session(&self, payload: RestoreAuthPayload) {
        let RestoreAuthPayload {
            auth,
            account_domain,
        } = payload;

        if self.established_session(&auth.token).await.is_some() {
            debug!("duplicate RESTORE_AUTH ignored");
            return;
        }

        let session = Session::restored(auth.token, auth.user, account_domain);
        if let Err(e) = self.store.set(session).await {
            warn!(error = %e, "failed to persist restored session");
            return;
        }
        self.set_state(SyncState::Authenticated).await;
        info!("session restored from host");
    }

    /// Persists a fresh token, verifies it, and establishes the session.
    ///
    /// Shared by the host-pushed `EXTENSION_AUTH_TOKEN` path and
    /// interactive [`login`](Self::login). Emits `AUTH_SUCCESS` to the host
    /// when embedded. Idempotent for a token that is already established:
    /// no second verify call, no duplicate notification.
    async fn establish_with_token(&self, token: String) -> Result<Session> {
        if let Some(existing) = self.established_session(&token).await {
            debug!("credential already established; ignoring re-delivery");
            return Ok(existing);
        }

        // The verify call must carry the candidate token, so persist and
        // attach it before the session exists.
        self.store.stage_token(token.clone()).await?;
        *self.pending_token.lock().await = Some(token.clone());
        self.set_state(SyncState::Validating).await;

        let verdict = self.gateway.verify().await;

        {
            let mut pending = self.pending_token.lock().await;
            if pending.as_deref() != Some(token.as_str()) {
                debug!("verify result superseded by a newer credential; discarding");
                return Err(LinkifyError::internal("credential superseded"));
            }
            pending.take();
        }

        match verdict {
            Ok(VerifyResponse {
                valid: true,
                user: Some(user),
            }) => {
                let session = Session::new(token.clone(), user);
                self.store.set(session.clone()).await?;
                self.set_state(SyncState::Authenticated).await;
                info!("credential validated; session established");

                if self.context.is_embedded() {
                    self.host.send(OutboundMessage::AuthSuccess {
                        token,
                        user: session.user.clone(),
                        account_domain: session.account_domain.clone().unwrap_or_default(),
                    });
                }
                Ok(session)
            }
            Ok(_) => {
                warn!("credential rejected by backend");
                self.reset_unauthenticated().await;
                Err(LinkifyError::credential_invalid("verify returned invalid"))
            }
            Err(e) if e.is_credential_invalid() => {
                self.reset_unauthenticated().await;
                Err(e)
            }
            Err(e) => {
                // Network-class failure: keep the staged token so a retry
                // can pick it up, but the state falls back regardless.
                warn!(error = %e, "credential verification failed");
                self.set_state(SyncState::Unauthenticated).await;
                Err(e)
            }
        }
    }

    /// Interactive login with a token from the OAuth callback.
    ///
    /// Standalone completion navigates to the main view; embedded
    /// completion leaves navigation to the host (which got `AUTH_SUCCESS`).
    pub async fn login(&self, token: String) -> Result<Session> {
        let session = self.establish_with_token(token).await?;
        if !self.context.is_embedded() {
            self.navigator.navigate(Route::Companies);
        }
        Ok(session)
    }

    /// Hands the user to the OAuth provider.
    ///
    /// The backend health probe is best-effort: its failure is logged and
    /// the flow continues either way.
    pub async fn begin_oauth_login(&self) {
        let url = self.config.oauth_login_url();
        if let Err(e) = self.gateway.health().await {
            warn!(error = %e, "backend health probe failed; continuing to OAuth");
        }
        if self.context.is_embedded() {
            self.host.send(OutboundMessage::OpenOauthTab { url });
        } else {
            self.navigator.open_external(&url);
        }
    }

    /// Logs out: backend first (failure logged, never fatal), then the
    /// local session is cleared unconditionally.
    pub async fn logout(&self) {
        if let Err(e) = self.gateway.logout().await {
            warn!(error = %e, "backend logout failed; clearing local session anyway");
        }
        self.reset_unauthenticated().await;
        self.navigator.navigate(Route::Login);
    }

    /// Reacts to a 401-class response from any backend call: the same
    /// clearing path as logout, then navigation to the unauthenticated
    /// entry point. No logout call is made; the backend already disowned
    /// the credential.
    pub async fn handle_unauthorized(&self) {
        warn!("backend rejected the credential; clearing session");
        self.reset_unauthenticated().await;
        self.navigator.navigate(Route::Login);
    }

    /// Spawns the session-concern listener. The subscription deregisters
    /// itself when the task ends.
    pub fn spawn_listener(
        self: Arc<Self>,
        dispatcher: &MessageDispatcher,
    ) -> tokio::task::JoinHandle<()> {
        let mut subscription = dispatcher.subscribe(Topic::Session);
        tokio::spawn(async move {
            while let Some(message) = subscription.recv().await {
                self.handle_message(message).await;
            }
        })
    }
}
