//! Stateful services of the companion: the session synchronizer, the
//! analysis workflow, and the wiring that assembles them over the
//! infrastructure and interaction layers.

pub mod analysis;
pub mod bootstrap;
pub mod session_sync;
pub mod telemetry;

pub use analysis::{AnalysisView, AnalysisWorkflow, PersonaDisplay};
pub use bootstrap::{App, bootstrap};
pub use session_sync::SessionSynchronizer;
