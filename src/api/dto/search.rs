//! Caregiver search DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::api::dto::CaregiverSummary;
use crate::models::Profile;
use crate::services::profiles::{SearchPage, SearchQuery};

/// Query string of `GET /api/users/search/caregivers`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CaregiverSearchParams {
    /// Exact province match
    pub province: Option<String>,
    /// Case-insensitive substring of the languages list
    pub languages: Option<String>,
    /// Case-insensitive substring of the services list
    pub services: Option<String>,
    /// Case-insensitive substring of the specializations list
    pub specializations: Option<String>,
    #[param(minimum = 0)]
    pub min_experience: Option<i32>,
    /// Matches the active flag; defaults to `true`
    pub available: Option<bool>,
    pub age_min: Option<i32>,
    pub age_max: Option<i32>,
    /// Zero-based page
    #[param(minimum = 0, example = 0)]
    pub page: Option<i64>,
    #[param(minimum = 1, example = 20)]
    pub size: Option<i64>,
    /// `relevance`, `<field>`, `<field>,asc` or `<field>,desc`
    #[param(example = "yearsOfExperience,desc")]
    pub sort: Option<String>,
}

impl From<CaregiverSearchParams> for SearchQuery {
    fn from(params: CaregiverSearchParams) -> Self {
        SearchQuery {
            province: params.province,
            languages: params.languages,
            services: params.services,
            specializations: params.specializations,
            min_experience: params.min_experience,
            available: params.available,
            age_min: params.age_min,
            age_max: params.age_max,
            page: params.page,
            size: params.size,
            sort: params.sort,
        }
    }
}

/// One page of caregiver search results.
#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResultsResponse {
    pub items: Vec<CaregiverSummary>,
    /// Matches across all pages
    pub total: u64,
    pub page: u64,
    pub size: u64,
}

impl From<SearchPage<Profile>> for SearchResultsResponse {
    fn from(page: SearchPage<Profile>) -> Self {
        let page = page.map(CaregiverSummary::from);
        Self {
            items: page.items,
            total: page.total,
            page: page.page,
            size: page.size,
        }
    }
}
