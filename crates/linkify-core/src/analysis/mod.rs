//! Analysis domain module.
//!
//! Models for the company/person analysis workflow and the aggregate of
//! streaming person-match fragments.

mod aggregate;
mod model;

// Re-export public API
pub use aggregate::AggregateResultSet;
pub use model::{
    CompanyAnalysisResponse, CompanyInformation, CompanyRecord, AnalysisData,
    PersonAnalysisResponse, PersonMatch, PersonaSpec,
};
