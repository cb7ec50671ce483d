//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by domain:
//! - `profile` - profile create/update bodies and responses
//! - `search` - caregiver search query and result page
//! - `health` - health check output
//! - `error` - common error response

mod error;
mod health;
mod profile;
mod search;

pub use error::ErrorResponse;
pub use health::{ComponentHealth, HealthResponse, HealthStatus};
pub use profile::{
    CaregiverSummary, CreateProfileRequest, FieldUpdateRequest, ProfileResponse,
    RegisterMeRequest, UpdateProfileRequest,
};
pub use search::{CaregiverSearchParams, SearchResultsResponse};
