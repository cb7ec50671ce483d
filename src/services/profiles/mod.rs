//! Profile search and completeness.
//!
//! `registry`, `completeness`, `filter`, `ranking` and `dispatcher` are pure
//! and synchronous; `ProfileService` wires them to storage and events.

pub mod completeness;
pub mod dispatcher;
pub mod filter;
pub mod ranking;
pub mod registry;
mod service;

pub use completeness::CompletenessReport;
pub use filter::SearchQuery;
pub use ranking::SearchPage;
pub use service::ProfileService;
