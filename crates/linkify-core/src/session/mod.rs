//! Session domain module.
//!
//! This module contains the session domain model, synchronization state
//! types, and the store trait the application layer depends on.
//!
//! # Module Structure
//!
//! - `model`: Session and user identity models (`Session`, `UserIdentity`)
//! - `state`: Synchronization state types (`SyncState`, `EmbeddingContext`)
//! - `store`: Store trait for credential persistence (`SessionStore`)

mod model;
mod state;
mod store;

// Re-export public API
pub use model::{Session, UserIdentity};
pub use state::{EmbeddingContext, SyncState};
pub use store::SessionStore;
