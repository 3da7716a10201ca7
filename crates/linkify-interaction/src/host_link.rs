//! Outbound side of the host channel.
//!
//! `HostLink` is the single handle services use to message the host. It
//! owns the readiness announcement: `READY` goes out exactly once, and is
//! structurally guaranteed to precede any `AUTH_SUCCESS` or `START_SEARCH`
//! because sending either of those announces readiness first.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use linkify_core::message::OutboundMessage;

/// Cloneable sender for outbound host messages.
#[derive(Clone)]
pub struct HostLink {
    tx: UnboundedSender<OutboundMessage>,
    ready_announced: Arc<AtomicBool>,
}

impl HostLink {
    /// Creates a link and the receiver a transport pump drains.
    pub fn channel() -> (Self, UnboundedReceiver<OutboundMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let link = Self {
            tx,
            ready_announced: Arc::new(AtomicBool::new(false)),
        };
        (link, rx)
    }

    /// Announces readiness to the host, exactly once.
    ///
    /// Returns whether this call performed the announcement.
    pub fn announce_ready(&self) -> bool {
        if self.ready_announced.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.dispatch(OutboundMessage::Ready);
        true
    }

    /// Whether `READY` has gone out.
    pub fn is_ready_announced(&self) -> bool {
        self.ready_announced.load(Ordering::SeqCst)
    }

    /// Sends a message to the host.
    ///
    /// Session/search notifications implicitly announce readiness first so
    /// the outbound ordering contract holds no matter who sends first.
    pub fn send(&self, message: OutboundMessage) {
        match message {
            OutboundMessage::Ready => {
                self.announce_ready();
            }
            OutboundMessage::AuthSuccess { .. } | OutboundMessage::StartSearch { .. } => {
                self.announce_ready();
                self.dispatch(message);
            }
            _ => self.dispatch(message),
        }
    }

    fn dispatch(&self, message: OutboundMessage) {
        let tag = message.tag();
        if self.tx.send(message).is_err() {
            // Host side is gone; outbound messages are fire-and-forget.
            debug!(tag, "host channel closed; dropping outbound message");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_goes_out_exactly_once() {
        let (link, mut rx) = HostLink::channel();
        assert!(link.announce_ready());
        assert!(!link.announce_ready());
        link.send(OutboundMessage::Ready);

        assert_eq!(rx.try_recv().unwrap(), OutboundMessage::Ready);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_auth_success_is_preceded_by_ready() {
        let (link, mut rx) = HostLink::channel();
        link.send(OutboundMessage::OpenOauthTab {
            url: "https://api/auth/google".to_string(),
        });
        link.send(OutboundMessage::StartSearch {
            workflow_id: 1,
            company_name: "Acme".to_string(),
            personas: vec![],
        });

        // OPEN_OAUTH_TAB carries no ordering requirement; START_SEARCH does.
        assert_eq!(
            rx.try_recv().unwrap(),
            OutboundMessage::OpenOauthTab {
                url: "https://api/auth/google".to_string()
            }
        );
        assert_eq!(rx.try_recv().unwrap(), OutboundMessage::Ready);
        assert!(matches!(
            rx.try_recv().unwrap(),
            OutboundMessage::StartSearch { workflow_id: 1, .. }
        ));
    }

    #[test]
    fn test_send_after_receiver_dropped_does_not_panic() {
        let (link, rx) = HostLink::channel();
        drop(rx);
        link.send(OutboundMessage::Ready);
        link.send(OutboundMessage::OpenOauthTab {
            url: "u".to_string(),
        });
    }
}
