//! Host-channel side of the companion: embedding detection, the outbound
//! link with its readiness contract, per-concern inbound dispatch, and the
//! newline-delimited-JSON transport pump.

pub mod dispatcher;
pub mod embedding;
pub mod host_link;
pub mod transport;

pub use dispatcher::{MessageDispatcher, Subscription, Topic};
pub use embedding::HostProbe;
pub use host_link::HostLink;
