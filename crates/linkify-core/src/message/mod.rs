//! Message envelope protocol for the host channel.
//!
//! Cross-context messages travel as JSON objects discriminated by a `type`
//! tag. Each direction has a closed tagged-variant type; decoding happens
//! exactly once at the channel boundary, and an unrecognized tag maps to
//! [`InboundMessage::Unknown`] instead of failing the decode.
//!
//! No ordering is guaranteed across inbound message types, and multiple
//! messages of the same type may arrive in any order relative to each
//! other.

mod inbound;
mod outbound;

// Re-export public API
pub use inbound::{
    AuthEnvelope, ExtensionAuthTokenPayload, ExtensionDataPayload, InboundMessage,
    PeopleResultPayload, ProfileDataPayload, RestoreAuthPayload,
};
pub use outbound::OutboundMessage;
