//! Inbound message dispatch.
//!
//! Each raw channel frame is decoded exactly once at this boundary and
//! routed by tag to one of two logical concerns: session messages and
//! analysis messages. Each concern registers exactly one subscriber; the
//! subscription deregisters itself when dropped, and messages that arrive
//! while a concern has no subscriber are buffered and flushed on
//! attachment; this is how a host racing a credential push ahead of the
//! readiness announcement is tolerated.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

use linkify_core::message::InboundMessage;

/// Logical concerns inbound messages route to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Credential lifecycle: `RESTORE_AUTH`, `EXTENSION_AUTH_TOKEN`.
    Session,
    /// Analysis workflow: `EXTENSION_DATA`, `PROFILE_DATA`, `PEOPLE_RESULT`.
    Analysis,
}

impl Topic {
    /// The concern a message belongs to; `None` for unrecognized tags.
    pub fn of(message: &InboundMessage) -> Option<Self> {
        match message {
            InboundMessage::RestoreAuth(_) | InboundMessage::ExtensionAuthToken(_) => {
                Some(Self::Session)
            }
            InboundMessage::ExtensionData(_)
            | InboundMessage::ProfileData(_)
            | InboundMessage::PeopleResult(_) => Some(Self::Analysis),
            InboundMessage::Unknown { .. } => None,
        }
    }
}

#[derive(Default)]
struct RouteState {
    generation: u64,
    sender: Option<UnboundedSender<InboundMessage>>,
    buffer: VecDeque<InboundMessage>,
}

/// Routes decoded inbound messages to per-concern subscribers.
#[derive(Clone, Default)]
pub struct MessageDispatcher {
    routes: Arc<Mutex<HashMap<Topic, RouteState>>>,
}

impl MessageDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes one raw frame and routes it.
    ///
    /// Never panics and never propagates an error across the listener
    /// boundary: a malformed frame is logged and dropped so it cannot
    /// break the channel for subsequent messages.
    pub fn dispatch_raw(&self, raw: &str) {
        match InboundMessage::decode(raw) {
            Ok(message) => self.dispatch(message),
            Err(e) => warn!(error = %e, "dropping malformed inbound frame"),
        }
    }

    /// Routes an already-decoded message.
    pub fn dispatch(&self, message: InboundMessage) {
        let Some(topic) = Topic::of(&message) else {
            debug!(tag = message.tag(), "ignoring message with unrecognized tag");
            return;
        };

        let mut routes = self.routes.lock().expect("dispatcher lock poisoned");
        let route = routes.entry(topic).or_default();
        if let Some(sender) = &route.sender {
            if let Err(e) = sender.send(message) {
                // Subscriber task is gone but its guard has not run yet;
                // fall back to buffering for the next subscriber.
                route.sender = None;
                route.buffer.push_back(e.0);
            }
        } else {
            route.buffer.push_back(message);
        }
    }

    /// Attaches the subscriber for a concern.
    ///
    /// Buffered messages are flushed to it in arrival order. Registering
    /// over a live subscriber detaches the old one (latest wins, as on a
    /// component remount).
    pub fn subscribe(&self, topic: Topic) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let generation = {
            let mut routes = self.routes.lock().expect("dispatcher lock poisoned");
            let route = routes.entry(topic).or_default();
            if route.sender.is_some() {
                warn!(?topic, "replacing existing subscriber");
            }
            while let Some(buffered) = route.buffer.pop_front() {
                // Flush cannot fail: we still hold rx.
                let _ = tx.send(buffered);
            }
            route.generation += 1;
            route.sender = Some(tx);
            route.generation
        };

        Subscription {
            topic,
            receiver: rx,
            _guard: SubscriptionGuard {
                topic,
                generation,
                routes: Arc::clone(&self.routes),
            },
        }
    }
}

/// A live subscription to one concern's inbound messages.
///
/// Dropping it deregisters the subscriber; messages arriving afterwards
/// are buffered for the next subscription.
pub struct Subscription {
    topic: Topic,
    receiver: UnboundedReceiver<InboundMessage>,
    _guard: SubscriptionGuard,
}

impl Subscription {
    /// Receives the next message, `None` once the dispatcher is gone.
    pub async fn recv(&mut self) -> Option<InboundMessage> {
        self.receiver.recv().await
    }

    /// Non-blocking receive, for tests and draining.
    pub fn try_recv(&mut self) -> Option<InboundMessage> {
        self.receiver.try_recv().ok()
    }

    pub fn topic(&self) -> Topic {
        self.topic
    }
}

struct SubscriptionGuard {
    topic: Topic,
    generation: u64,
    routes: Arc<Mutex<HashMap<Topic, RouteState>>>,
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        if let Ok(mut routes) = self.routes.lock()
            && let Some(route) = routes.get_mut(&self.topic)
            // Only detach if no newer subscriber replaced this one.
            && route.generation == self.generation
        {
            route.sender = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkify_core::message::ExtensionAuthTokenPayload;

    fn token_message(token: &str) -> InboundMessage {
        InboundMessage::ExtensionAuthToken(ExtensionAuthTokenPayload {
            token: token.to_string(),
        })
    }

    #[tokio::test]
    async fn test_routes_by_concern() {
        let dispatcher = MessageDispatcher::new();
        let mut session = dispatcher.subscribe(Topic::Session);
        let mut analysis = dispatcher.subscribe(Topic::Analysis);

        dispatcher.dispatch_raw(r#"{"type":"EXTENSION_AUTH_TOKEN","token":"t1"}"#);
        dispatcher.dispatch_raw(
            r#"{"type":"PEOPLE_RESULT","personaType":"champion","person":{"name":"Ann","profileUrl":""}}"#,
        );

        assert_eq!(session.recv().await.unwrap(), token_message("t1"));
        assert!(matches!(
            analysis.recv().await.unwrap(),
            InboundMessage::PeopleResult(_)
        ));
        assert!(session.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_messages_before_attachment_are_flushed_in_order() {
        let dispatcher = MessageDispatcher::new();

        // The host raced two messages ahead of listener attachment.
        dispatcher.dispatch(token_message("first"));
        dispatcher.dispatch(token_message("second"));

        let mut session = dispatcher.subscribe(Topic::Session);
        assert_eq!(session.recv().await.unwrap(), token_message("first"));
        assert_eq!(session.recv().await.unwrap(), token_message("second"));
    }

    #[tokio::test]
    async fn test_malformed_and_unknown_frames_do_not_break_the_channel() {
        let dispatcher = MessageDispatcher::new();
        let mut session = dispatcher.subscribe(Topic::Session);

        dispatcher.dispatch_raw("not json at all");
        dispatcher.dispatch_raw(r#"{"type":"NO_SUCH_TAG"}"#);
        dispatcher.dispatch_raw(r#"{"type":"EXTENSION_AUTH_TOKEN","token":"t9"}"#);

        assert_eq!(session.recv().await.unwrap(), token_message("t9"));
    }

    #[tokio::test]
    async fn test_dropped_subscription_rebuffers_for_the_next_one() {
        let dispatcher = MessageDispatcher::new();
        let session = dispatcher.subscribe(Topic::Session);
        drop(session);

        dispatcher.dispatch(token_message("after-drop"));

        let mut session = dispatcher.subscribe(Topic::Session);
        assert_eq!(session.recv().await.unwrap(), token_message("after-drop"));
    }

    #[tokio::test]
    async fn test_resubscribe_replaces_previous_subscriber() {
        let dispatcher = MessageDispatcher::new();
        let mut old = dispatcher.subscribe(Topic::Session);
        let mut new = dispatcher.subscribe(Topic::Session);

        dispatcher.dispatch(token_message("t"));
        assert_eq!(new.recv().await.unwrap(), token_message("t"));
        assert!(old.try_recv().is_none());

        // Dropping the stale subscription must not detach the live one.
        drop(old);
        dispatcher.dispatch(token_message("t2"));
        assert_eq!(new.recv().await.unwrap(), token_message("t2"));
    }
}
