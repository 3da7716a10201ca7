//! Application wiring.
//!
//! Builds the whole subsystem in dependency order: embedding detection
//! first (it decides whether a host channel exists), then storage and the
//! gateway sharing one credential handle, then the startup validation gate,
//! and finally the two per-concern listeners. `READY` is announced before
//! any inbound subscription is registered; the dispatcher's buffering still
//! covers a host that pushed even earlier.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use linkify_core::config::AppConfig;
use linkify_core::navigator::Navigator;
use linkify_core::session::EmbeddingContext;
use linkify_infrastructure::{AuthCredential, FileSessionStore, HttpBackendGateway, LinkifyPaths};
use linkify_interaction::dispatcher::MessageDispatcher;
use linkify_interaction::host_link::HostLink;
use linkify_interaction::{embedding, transport};

use crate::analysis::AnalysisWorkflow;
use crate::session_sync::SessionSynchronizer;

/// The wired application core.
pub struct App {
    pub config: AppConfig,
    pub context: EmbeddingContext,
    pub dispatcher: MessageDispatcher,
    pub host: HostLink,
    pub sessions: Arc<SessionSynchronizer>,
    pub analysis: Arc<AnalysisWorkflow>,
    /// Listener and transport tasks; they end when their channels close.
    pub tasks: Vec<JoinHandle<()>>,
}

/// Wires and starts the subsystem.
///
/// Returns only after the startup session validation gate completed, so
/// the caller can render protected content based on the resulting state.
pub async fn bootstrap(config: AppConfig, navigator: Arc<dyn Navigator>) -> Result<App> {
    let probe = embedding::HostProbe::from_config(&config);
    let context = embedding::init(&probe);
    info!(%context, "embedding context detected");

    let credential = AuthCredential::new();
    let paths = LinkifyPaths::resolve(config.data_dir.clone())
        .context("Failed to resolve data directory")?;
    let store = Arc::new(
        FileSessionStore::open(&paths, credential.clone())
            .await
            .context("Failed to open session store")?,
    );
    let gateway = Arc::new(HttpBackendGateway::new(&config, credential));

    let (host, outbound_rx) = HostLink::channel();
    let dispatcher = MessageDispatcher::new();
    let mut tasks = Vec::new();

    if context.is_embedded() {
        // Readiness goes out before any inbound listener exists.
        host.announce_ready();

        #[cfg(unix)]
        if let Some(endpoint) = &config.host_channel {
            match transport::connect_host(endpoint).await {
                Ok(stream) => {
                    let pump_dispatcher = dispatcher.clone();
                    tasks.push(tokio::spawn(async move {
                        if let Err(e) =
                            transport::run_host_transport(stream, pump_dispatcher, outbound_rx)
                                .await
                        {
                            warn!(error = %e, "host transport stopped");
                        }
                    }));
                }
                Err(e) => {
                    // Still embedded: an unreachable host endpoint is
                    // evidence of a host, not of standalone operation.
                    warn!(error = %e, "could not connect to host endpoint");
                }
            }
        }
    }

    let sessions = Arc::new(SessionSynchronizer::new(
        config.clone(),
        context,
        store.clone(),
        gateway.clone(),
        navigator,
        host.clone(),
    ));

    // The one synchronous gate: resolve the stored credential before
    // anything protected is rendered.
    sessions
        .validate_startup_session()
        .await
        .context("Startup session validation failed")?;

    let analysis = Arc::new(AnalysisWorkflow::new(
        context,
        store,
        gateway,
        sessions.clone(),
        host.clone(),
    ));

    tasks.push(sessions.clone().spawn_listener(&dispatcher));
    tasks.push(analysis.clone().spawn_listener(&dispatcher));

    Ok(App {
        config,
        context,
        dispatcher,
        host,
        sessions,
        analysis,
        tasks,
    })
}
