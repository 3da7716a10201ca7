//! Shared bearer credential handle.
//!
//! The session store and the HTTP gateway hold the same handle: every
//! store mutation updates it, and every outgoing request reads it, so
//! backend calls are authenticated consistently without the two components
//! knowing about each other.

use std::sync::Arc;

use tokio::sync::RwLock;

/// Cloneable handle to the bearer token attached to backend requests.
#[derive(Debug, Clone, Default)]
pub struct AuthCredential {
    token: Arc<RwLock<Option<String>>>,
}

impl AuthCredential {
    /// Creates an empty handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a token; subsequent requests carry it as a bearer credential.
    pub async fn attach(&self, token: String) {
        *self.token.write().await = Some(token);
    }

    /// Detaches the token; subsequent requests go out unauthenticated.
    pub async fn detach(&self) {
        *self.token.write().await = None;
    }

    /// The currently attached token, if any.
    pub async fn bearer(&self) -> Option<String> {
        self.token.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_attach_detach() {
        let credential = AuthCredential::new();
        assert_eq!(credential.bearer().await, None);

        credential.attach("abc".to_string()).await;
        assert_eq!(credential.bearer().await, Some("abc".to_string()));

        credential.detach().await;
        assert_eq!(credential.bearer().await, None);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let credential = AuthCredential::new();
        let clone = credential.clone();
        credential.attach("tok".to_string()).await;
        assert_eq!(clone.bearer().await, Some("tok".to_string()));
    }
}
