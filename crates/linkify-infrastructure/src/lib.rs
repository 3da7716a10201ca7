//! I/O implementations behind the traits `linkify-core` defines: durable
//! credential storage, the shared bearer credential handle, and the HTTP
//! backend gateway.

pub mod credential;
pub mod http_gateway;
pub mod paths;
pub mod session_store;

pub use credential::AuthCredential;
pub use http_gateway::HttpBackendGateway;
pub use paths::LinkifyPaths;
pub use session_store::FileSessionStore;
