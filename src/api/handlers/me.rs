//! Current user (me) endpoints.
//!
//! The caller is identified by the bearer token; the verified subject id is
//! the profile's external auth id.

use axum::{Extension, Json, extract::Path, extract::State, http::StatusCode};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::ME_TAG;
use crate::api::dto::{
    ErrorResponse, FieldUpdateRequest, ProfileResponse, RegisterMeRequest, UpdateProfileRequest,
};
use crate::api::middleware::AuthSubject;
use crate::error::AppResult;
use crate::models::{NewProfile, ProfileKey};
use crate::services::profiles::CompletenessReport;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

/// Creates the "me" routes
///
/// # Routes
/// - `GET /me` - Caller's profile
/// - `POST /me` - Register the caller
/// - `PUT /me/profile` - Bulk update
/// - `PATCH /me/profile/{fieldName}` - Single field update
/// - `GET /me/profile/completion` - Completeness report
///
/// # Authentication
/// All routes require a bearer token via `auth_middleware`
pub fn me_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(get_me, register_me))
        .routes(routes!(update_my_profile))
        .routes(routes!(update_my_profile_field))
        .routes(routes!(get_my_completion))
}

fn caller_key(subject: &AuthSubject) -> ProfileKey {
    ProfileKey::ExternalAuthId(subject.0.subject_id.clone())
}

#[utoipa::path(
    get,
    path = "/",
    tag = ME_TAG,
    responses(
        (status = 200, description = "Caller's profile", body = ProfileResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Caller is not registered yet", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn get_me(
    State(state): State<AppState>,
    Extension(subject): Extension<AuthSubject>,
) -> AppResult<Json<ProfileResponse>> {
    let profile = state.services.profiles.get_profile(&caller_key(&subject)).await?;
    Ok(Json(ProfileResponse::from(profile)))
}

/// POST /api/me - Register the caller
///
/// Email and display name come from the token; role and phone from the body.
#[utoipa::path(
    post,
    path = "/",
    tag = ME_TAG,
    request_body = RegisterMeRequest,
    responses(
        (status = 201, description = "Profile created", body = ProfileResponse),
        (status = 400, description = "Invalid body or already registered", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn register_me(
    State(state): State<AppState>,
    Extension(AuthSubject(subject)): Extension<AuthSubject>,
    ValidatedJson(payload): ValidatedJson<RegisterMeRequest>,
) -> AppResult<(StatusCode, Json<ProfileResponse>)> {
    let new_profile = NewProfile {
        external_auth_id: subject.subject_id,
        email: subject.email,
        role: payload.role,
        primary_phone: payload.phone,
        display_name: subject.display_name,
    };
    let profile = state.services.profiles.create_profile(new_profile).await?;
    Ok((StatusCode::CREATED, Json(ProfileResponse::from(profile))))
}

#[utoipa::path(
    put,
    path = "/profile",
    tag = ME_TAG,
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ProfileResponse),
        (status = 400, description = "Invalid body", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Caller is not registered yet", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn update_my_profile(
    State(state): State<AppState>,
    Extension(subject): Extension<AuthSubject>,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<Json<ProfileResponse>> {
    let profile = state
        .services
        .profiles
        .update_profile(&caller_key(&subject), payload.into())
        .await?;
    Ok(Json(ProfileResponse::from(profile)))
}

#[utoipa::path(
    patch,
    path = "/profile/{fieldName}",
    tag = ME_TAG,
    params(("fieldName" = String, Path, description = "Registered profile field")),
    request_body = FieldUpdateRequest,
    responses(
        (status = 200, description = "Field updated", body = ProfileResponse),
        (status = 400, description = "Unknown field or wrong value type", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Caller is not registered yet", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn update_my_profile_field(
    State(state): State<AppState>,
    Extension(subject): Extension<AuthSubject>,
    Path(field_name): Path<String>,
    Json(payload): Json<FieldUpdateRequest>,
) -> AppResult<Json<ProfileResponse>> {
    let profile = state
        .services
        .profiles
        .update_profile_field(&caller_key(&subject), &field_name, &payload.value)
        .await?;
    Ok(Json(ProfileResponse::from(profile)))
}

#[utoipa::path(
    get,
    path = "/profile/completion",
    tag = ME_TAG,
    responses(
        (status = 200, description = "Completeness report", body = CompletenessReport),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Caller is not registered yet", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn get_my_completion(
    State(state): State<AppState>,
    Extension(subject): Extension<AuthSubject>,
) -> AppResult<Json<CompletenessReport>> {
    let report = state
        .services
        .profiles
        .get_completion(&caller_key(&subject))
        .await?;
    Ok(Json(report))
}
