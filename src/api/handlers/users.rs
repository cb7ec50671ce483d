//! Profile and caregiver search handlers under `/api/users`.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::{SEARCH_TAG, USER_TAG};
use crate::api::dto::{
    CaregiverSearchParams, CreateProfileRequest, ErrorResponse, FieldUpdateRequest,
    ProfileResponse, SearchResultsResponse, UpdateProfileRequest,
};
use crate::error::{AppError, AppResult};
use crate::models::{Profile, ProfileKey, UserRole};
use crate::services::profiles::CompletenessReport;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

/// Routes:
/// - GET /                                    - All profiles
/// - POST /                                   - Create profile
/// - GET /{id}                                - Profile by id
/// - GET /external/{externalAuthId}           - Profile by external auth id
/// - GET /role/{role}                         - Profiles by role
/// - PUT /{id}/profile                        - Bulk update by id
/// - PUT /external/{externalAuthId}/profile   - Bulk update by external auth id
/// - PATCH /external/{externalAuthId}/profile/{fieldName} - Single field update
/// - GET /external/{externalAuthId}/profile/completion    - Completeness report
/// - GET /caregivers, /caregivers/featured, /caregivers/verified
/// - GET /search/caregivers                   - Caregiver search
pub fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_profiles))
        .routes(routes!(create_profile))
        .routes(routes!(get_profile_by_id))
        .routes(routes!(get_profile_by_external_id))
        .routes(routes!(list_profiles_by_role))
        .routes(routes!(update_profile_by_id))
        .routes(routes!(update_profile_by_external_id))
        .routes(routes!(update_profile_field))
        .routes(routes!(get_profile_completion))
        .routes(routes!(list_caregivers))
        .routes(routes!(list_featured_caregivers))
        .routes(routes!(list_verified_caregivers))
        .routes(routes!(search_caregivers))
}

fn to_responses(profiles: Vec<Profile>) -> Vec<ProfileResponse> {
    profiles.into_iter().map(ProfileResponse::from).collect()
}

/// GET /api/users - Every profile of either role, by id
#[utoipa::path(
    get,
    path = "/",
    tag = USER_TAG,
    responses(
        (status = 200, description = "All profiles", body = Vec<ProfileResponse>)
    )
)]
async fn list_profiles(State(state): State<AppState>) -> AppResult<Json<Vec<ProfileResponse>>> {
    let profiles = state.services.profiles.list_profiles().await?;
    Ok(Json(to_responses(profiles)))
}

/// POST /api/users - Create profile
///
/// Publishes a `USER_CREATED` event once stored.
#[utoipa::path(
    post,
    path = "/",
    tag = USER_TAG,
    request_body = CreateProfileRequest,
    responses(
        (status = 201, description = "Profile created", body = ProfileResponse),
        (status = 400, description = "Invalid body or identity already registered", body = ErrorResponse)
    )
)]
async fn create_profile(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateProfileRequest>,
) -> AppResult<(StatusCode, Json<ProfileResponse>)> {
    let profile = state
        .services
        .profiles
        .create_profile(payload.into_new_profile())
        .await?;
    Ok((StatusCode::CREATED, Json(ProfileResponse::from(profile))))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = USER_TAG,
    params(("id" = i64, Path, description = "Profile id")),
    responses(
        (status = 200, description = "Profile found", body = ProfileResponse),
        (status = 404, description = "No profile with this id", body = ErrorResponse)
    )
)]
async fn get_profile_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ProfileResponse>> {
    let profile = state.services.profiles.get_profile(&ProfileKey::Id(id)).await?;
    Ok(Json(ProfileResponse::from(profile)))
}

#[utoipa::path(
    get,
    path = "/external/{externalAuthId}",
    tag = USER_TAG,
    params(("externalAuthId" = String, Path, description = "Identity provider subject id")),
    responses(
        (status = 200, description = "Profile found", body = ProfileResponse),
        (status = 404, description = "No profile with this external auth id", body = ErrorResponse)
    )
)]
async fn get_profile_by_external_id(
    State(state): State<AppState>,
    Path(external_auth_id): Path<String>,
) -> AppResult<Json<ProfileResponse>> {
    let profile = state
        .services
        .profiles
        .get_profile(&ProfileKey::ExternalAuthId(external_auth_id))
        .await?;
    Ok(Json(ProfileResponse::from(profile)))
}

/// GET /api/users/role/{role} - Profiles with a role, by id
#[utoipa::path(
    get,
    path = "/role/{role}",
    tag = USER_TAG,
    params(("role" = String, Path, description = "CAREGIVER, CLIENT (or PARENT) or ADMIN")),
    responses(
        (status = 200, description = "Profiles with the role", body = Vec<ProfileResponse>),
        (status = 400, description = "Unrecognized role", body = ErrorResponse)
    )
)]
async fn list_profiles_by_role(
    State(state): State<AppState>,
    Path(role): Path<String>,
) -> AppResult<Json<Vec<ProfileResponse>>> {
    let role: UserRole = role
        .parse()
        .map_err(|reason| AppError::Validation {
            field: "role".to_string(),
            reason,
        })?;
    let profiles = state.services.profiles.list_by_role(role).await?;
    Ok(Json(to_responses(profiles)))
}

#[utoipa::path(
    put,
    path = "/{id}/profile",
    tag = USER_TAG,
    params(("id" = i64, Path, description = "Profile id")),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ProfileResponse),
        (status = 400, description = "Invalid body", body = ErrorResponse),
        (status = 404, description = "No profile with this id", body = ErrorResponse)
    )
)]
async fn update_profile_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<Json<ProfileResponse>> {
    let profile = state
        .services
        .profiles
        .update_profile(&ProfileKey::Id(id), payload.into())
        .await?;
    Ok(Json(ProfileResponse::from(profile)))
}

#[utoipa::path(
    put,
    path = "/external/{externalAuthId}/profile",
    tag = USER_TAG,
    params(("externalAuthId" = String, Path, description = "Identity provider subject id")),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ProfileResponse),
        (status = 400, description = "Invalid body", body = ErrorResponse),
        (status = 404, description = "No profile with this external auth id", body = ErrorResponse)
    )
)]
async fn update_profile_by_external_id(
    State(state): State<AppState>,
    Path(external_auth_id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<Json<ProfileResponse>> {
    let profile = state
        .services
        .profiles
        .update_profile(&ProfileKey::ExternalAuthId(external_auth_id), payload.into())
        .await?;
    Ok(Json(ProfileResponse::from(profile)))
}

/// PATCH /api/users/external/{externalAuthId}/profile/{fieldName}
///
/// `fieldName` is matched case-insensitively; the JSON kind of `value` must
/// fit the field.
#[utoipa::path(
    patch,
    path = "/external/{externalAuthId}/profile/{fieldName}",
    tag = USER_TAG,
    params(
        ("externalAuthId" = String, Path, description = "Identity provider subject id"),
        ("fieldName" = String, Path, description = "Registered profile field, e.g. city or yearsOfExperience")
    ),
    request_body = FieldUpdateRequest,
    responses(
        (status = 200, description = "Field updated", body = ProfileResponse),
        (status = 400, description = "Unknown field or wrong value type", body = ErrorResponse),
        (status = 404, description = "No profile with this external auth id", body = ErrorResponse)
    )
)]
async fn update_profile_field(
    State(state): State<AppState>,
    Path((external_auth_id, field_name)): Path<(String, String)>,
    Json(payload): Json<FieldUpdateRequest>,
) -> AppResult<Json<ProfileResponse>> {
    let profile = state
        .services
        .profiles
        .update_profile_field(
            &ProfileKey::ExternalAuthId(external_auth_id),
            &field_name,
            &payload.value,
        )
        .await?;
    Ok(Json(ProfileResponse::from(profile)))
}

#[utoipa::path(
    get,
    path = "/external/{externalAuthId}/profile/completion",
    tag = USER_TAG,
    params(("externalAuthId" = String, Path, description = "Identity provider subject id")),
    responses(
        (status = 200, description = "Completeness report", body = CompletenessReport),
        (status = 404, description = "No profile with this external auth id", body = ErrorResponse)
    )
)]
async fn get_profile_completion(
    State(state): State<AppState>,
    Path(external_auth_id): Path<String>,
) -> AppResult<Json<CompletenessReport>> {
    let report = state
        .services
        .profiles
        .get_completion(&ProfileKey::ExternalAuthId(external_auth_id))
        .await?;
    Ok(Json(report))
}

/// GET /api/users/caregivers - Every caregiver, active or not, by id
#[utoipa::path(
    get,
    path = "/caregivers",
    tag = SEARCH_TAG,
    responses((status = 200, description = "All caregivers", body = Vec<ProfileResponse>))
)]
async fn list_caregivers(State(state): State<AppState>) -> AppResult<Json<Vec<ProfileResponse>>> {
    let profiles = state.services.profiles.list_caregivers().await?;
    Ok(Json(to_responses(profiles)))
}

#[utoipa::path(
    get,
    path = "/caregivers/featured",
    tag = SEARCH_TAG,
    responses((status = 200, description = "Active featured caregivers", body = Vec<ProfileResponse>))
)]
async fn list_featured_caregivers(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ProfileResponse>>> {
    let profiles = state.services.profiles.list_featured_caregivers().await?;
    Ok(Json(to_responses(profiles)))
}

#[utoipa::path(
    get,
    path = "/caregivers/verified",
    tag = SEARCH_TAG,
    responses((status = 200, description = "Active verified caregivers", body = Vec<ProfileResponse>))
)]
async fn list_verified_caregivers(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ProfileResponse>>> {
    let profiles = state.services.profiles.list_verified_caregivers().await?;
    Ok(Json(to_responses(profiles)))
}

/// GET /api/users/search/caregivers - Filtered, ranked, paginated search
#[utoipa::path(
    get,
    path = "/search/caregivers",
    tag = SEARCH_TAG,
    params(CaregiverSearchParams),
    responses(
        (status = 200, description = "One page of matches", body = SearchResultsResponse),
        (status = 400, description = "Invalid sort, page or size", body = ErrorResponse)
    )
)]
async fn search_caregivers(
    State(state): State<AppState>,
    Query(params): Query<CaregiverSearchParams>,
) -> AppResult<Json<SearchResultsResponse>> {
    let page = state
        .services
        .profiles
        .search_caregivers(&params.into())
        .await?;
    Ok(Json(SearchResultsResponse::from(page)))
}
