//! Embedding detection.
//!
//! Determines, once per process lifetime, whether the application runs
//! inside a foreign host frame. An embedding host hands its channel
//! endpoint down via the environment; probing that endpoint is the
//! equivalent of comparing the application's own frame identity to its
//! top-level ancestor.

use std::env;
use std::path::PathBuf;

use once_cell::sync::OnceCell;
use tracing::warn;

use linkify_core::config::{AppConfig, HOST_CHANNEL_ENV};
use linkify_core::session::EmbeddingContext;

static CONTEXT: OnceCell<EmbeddingContext> = OnceCell::new();

/// Outcome of inspecting the environment for a host linkage.
#[derive(Debug, Clone)]
pub struct HostProbe {
    /// Endpoint the host handed down, if any.
    pub endpoint: Option<PathBuf>,
    /// Whether the endpoint could actually be reached.
    pub accessible: bool,
}

impl HostProbe {
    /// Probes the process environment directly.
    pub fn from_env() -> Self {
        Self::from_endpoint(env::var_os(HOST_CHANNEL_ENV).map(PathBuf::from))
    }

    /// Probes using an already-loaded configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::from_endpoint(config.host_channel.clone())
    }

    fn from_endpoint(endpoint: Option<PathBuf>) -> Self {
        let accessible = endpoint
            .as_deref()
            .is_some_and(|path| std::fs::metadata(path).is_ok());
        Self {
            endpoint,
            accessible,
        }
    }
}

/// Classifies a probe outcome.
///
/// A present endpoint means a host exists, whether or not it can be
/// reached: an access failure is itself evidence of embedding (the
/// cross-origin-ancestor case), never an error to propagate.
pub fn detect(probe: &HostProbe) -> EmbeddingContext {
    match &probe.endpoint {
        None => EmbeddingContext::Standalone,
        Some(path) => {
            if !probe.accessible {
                warn!(endpoint = %path.display(), "host endpoint present but not reachable; treating as embedded");
            }
            EmbeddingContext::Embedded
        }
    }
}

/// Detects the embedding context exactly once per process and caches it.
///
/// Later calls return the first result regardless of the probe passed;
/// the context is immutable for the process lifetime.
pub fn init(probe: &HostProbe) -> EmbeddingContext {
    *CONTEXT.get_or_init(|| detect(probe))
}

/// The cached context, if `init` ran already.
pub fn current() -> Option<EmbeddingContext> {
    CONTEXT.get().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_endpoint_is_standalone() {
        let probe = HostProbe {
            endpoint: None,
            accessible: false,
        };
        assert_eq!(detect(&probe), EmbeddingContext::Standalone);
    }

    #[test]
    fn test_reachable_endpoint_is_embedded() {
        let probe = HostProbe {
            endpoint: Some(PathBuf::from("/tmp/host.sock")),
            accessible: true,
        };
        assert_eq!(detect(&probe), EmbeddingContext::Embedded);
    }

    #[test]
    fn test_access_failure_still_counts_as_embedded() {
        let probe = HostProbe {
            endpoint: Some(PathBuf::from("/nonexistent/host.sock")),
            accessible: false,
        };
        assert_eq!(detect(&probe), EmbeddingContext::Embedded);
    }
}
