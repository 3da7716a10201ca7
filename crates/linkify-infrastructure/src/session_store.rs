//! File-backed session store.
//!
//! Persists the single credential key under the data directory and keeps
//! the resolved user identity in memory only: after a restart the token is
//! re-validated before any user is adopted. Every mutation also updates the
//! shared [`AuthCredential`] so backend calls stay authenticated
//! consistently.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::debug;

use linkify_core::error::Result;
use linkify_core::session::{Session, SessionStore};

use crate::credential::AuthCredential;
use crate::paths::LinkifyPaths;

/// Session store persisting the token to one file.
pub struct FileSessionStore {
    token_path: PathBuf,
    /// Durable token mirror (staged or adopted).
    token: Arc<RwLock<Option<String>>>,
    /// Memory-only session; present iff the last validation succeeded.
    session: Arc<RwLock<Option<Session>>>,
    credential: AuthCredential,
}

impl FileSessionStore {
    /// Opens the store, loading a token persisted by a previous run and
    /// attaching it to the gateway credential for the startup verify call.
    pub async fn open(paths: &LinkifyPaths, credential: AuthCredential) -> Result<Self> {
        fs::create_dir_all(paths.base_dir()).await?;
        let token_path = paths.token_file();

        let stored = match fs::read_to_string(&token_path).await {
            Ok(raw) => {
                let token = raw.trim().to_string();
                (!token.is_empty()).then_some(token)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        if let Some(token) = &stored {
            debug!("persisted credential found; attaching for validation");
            credential.attach(token.clone()).await;
        }

        Ok(Self {
            token_path,
            token: Arc::new(RwLock::new(stored)),
            session: Arc::new(RwLock::new(None)),
            credential,
        })
    }

    async fn persist(&self, token: &str) -> Result<()> {
        fs::write(&self.token_path, token).await?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn get(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    async fn set(&self, session: Session) -> Result<()> {
        self.persist(&session.token).await?;
        self.credential.attach(session.token.clone()).await;
        *self.token.write().await = Some(session.token.clone());
        *self.session.write().await = Some(session);
        Ok(())
    }

    async fn stage_token(&self, token: String) -> Result<()> {
        self.persist(&token).await?;
        self.credential.attach(token.clone()).await;
        *self.token.write().await = Some(token);
        Ok(())
    }

    async fn stored_token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    async fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.token_path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        self.credential.detach().await;
        *self.token.write().await = None;
        *self.session.write().await = None;
        debug!("session store cleared");
        Ok(())
    }
}
