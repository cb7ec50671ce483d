//! Profile request and response DTOs.

use std::sync::LazyLock;

use bigdecimal::{BigDecimal, RoundingMode};
use jiff::Timestamp;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::models::{NewProfile, Profile, ProfilePatch, UserRole, VerificationStatus};

/// Optional `+`, then 10 to 15 digits.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+]?[0-9]{10,15}$").expect("phone pattern compiles"));

fn validate_hourly_rate(rate: &BigDecimal) -> Result<(), ValidationError> {
    if *rate < BigDecimal::from(0) || *rate > BigDecimal::from(1000) {
        return Err(ValidationError::new("range")
            .with_message("Hourly rate must be between 0 and 1000".into()));
    }
    Ok(())
}

// ============================================================================
// Requests
// ============================================================================

/// Request body for `POST /api/users`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "externalAuthId": "u7Hq2mZk",
    "email": "li.mei@example.com",
    "role": "CAREGIVER",
    "phone": "+8613800000000"
}))]
pub struct CreateProfileRequest {
    /// Subject id issued by the identity provider
    #[validate(length(min = 1, max = 128, message = "External auth id is required"))]
    pub external_auth_id: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// `PARENT` is accepted as an alias of `CLIENT`
    #[serde(alias = "userType")]
    pub role: UserRole,

    #[validate(regex(path = *PHONE_RE, message = "Invalid phone number format"))]
    pub phone: Option<String>,

    #[validate(length(max = 255, message = "Display name must be at most 255 characters"))]
    pub display_name: Option<String>,
}

impl CreateProfileRequest {
    pub fn into_new_profile(self) -> NewProfile {
        NewProfile {
            external_auth_id: self.external_auth_id.trim().to_string(),
            email: self.email.trim().to_string(),
            role: self.role,
            primary_phone: self.phone,
            display_name: self.display_name,
        }
    }
}

/// Request body for `POST /api/me`. Identity comes from the bearer token.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterMeRequest {
    #[serde(alias = "userType")]
    pub role: UserRole,

    #[validate(regex(path = *PHONE_RE, message = "Invalid phone number format"))]
    pub phone: Option<String>,
}

/// Bulk partial update. Absent or `null` fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(max = 255, message = "Full name must be at most 255 characters"))]
    pub full_name: Option<String>,
    #[validate(length(max = 255, message = "Display name must be at most 255 characters"))]
    pub display_name: Option<String>,
    #[validate(range(min = 18, max = 100, message = "Age must be between 18 and 100"))]
    pub age: Option<i32>,
    #[validate(length(max = 500, message = "Profile photo URL must be at most 500 characters"))]
    pub profile_photo_url: Option<String>,

    #[validate(regex(path = *PHONE_RE, message = "Invalid phone number format"))]
    pub primary_phone: Option<String>,
    #[validate(length(max = 100, message = "WeChat ID must be at most 100 characters"))]
    pub wechat_id: Option<String>,
    #[validate(length(max = 500, message = "WeChat QR code URL must be at most 500 characters"))]
    pub wechat_qr_code_url: Option<String>,
    #[validate(length(max = 100, message = "Xiaohongshu handle must be at most 100 characters"))]
    pub xiaohongshu_handle: Option<String>,

    #[validate(length(max = 100, message = "City must be at most 100 characters"))]
    pub city: Option<String>,
    #[validate(length(max = 100, message = "Province must be at most 100 characters"))]
    pub province: Option<String>,
    #[validate(length(max = 100, message = "Country must be at most 100 characters"))]
    pub country: Option<String>,
    pub service_areas: Option<String>,
    #[validate(length(max = 255, message = "Current location must be at most 255 characters"))]
    pub current_location: Option<String>,
    pub willing_to_relocate: Option<bool>,

    #[validate(range(min = 0, max = 50, message = "Years of experience must be between 0 and 50"))]
    pub years_of_experience: Option<i32>,
    pub languages: Option<String>,
    pub specializations: Option<String>,
    pub certifications: Option<String>,
    pub services_offered: Option<String>,
    #[validate(custom(function = "validate_hourly_rate"))]
    #[schema(value_type = Option<f64>)]
    pub hourly_rate: Option<BigDecimal>,

    #[validate(length(max = 2000, message = "About me must be at most 2000 characters"))]
    pub about_me: Option<String>,
    pub professional_experience: Option<String>,
    pub education_background: Option<String>,
    pub special_skills: Option<String>,

    pub gallery_photos: Option<String>,
    pub certificates_photos: Option<String>,
}

impl From<UpdateProfileRequest> for ProfilePatch {
    fn from(req: UpdateProfileRequest) -> Self {
        ProfilePatch {
            full_name: req.full_name,
            display_name: req.display_name,
            age: req.age,
            profile_photo_url: req.profile_photo_url,
            primary_phone: req.primary_phone,
            wechat_id: req.wechat_id,
            wechat_qr_code_url: req.wechat_qr_code_url,
            xiaohongshu_handle: req.xiaohongshu_handle,
            city: req.city,
            province: req.province,
            country: req.country,
            service_areas: req.service_areas,
            current_location: req.current_location,
            willing_to_relocate: req.willing_to_relocate,
            years_of_experience: req.years_of_experience,
            languages: req.languages,
            specializations: req.specializations,
            certifications: req.certifications,
            services_offered: req.services_offered,
            hourly_rate: req
                .hourly_rate
                .map(|rate| rate.with_scale_round(2, RoundingMode::HalfUp)),
            about_me: req.about_me,
            professional_experience: req.professional_experience,
            education_background: req.education_background,
            special_skills: req.special_skills,
            gallery_photos: req.gallery_photos,
            certificates_photos: req.certificates_photos,
        }
    }
}

/// Body of a single-field update. The JSON kind of `value` must match the
/// field; `null` clears it.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[schema(example = json!({"value": "Guangdong"}))]
pub struct FieldUpdateRequest {
    #[schema(value_type = Object)]
    pub value: Value,
}

// ============================================================================
// Responses
// ============================================================================

/// Full profile as returned by lookups and updates.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: i64,
    pub external_auth_id: String,
    pub email: String,
    pub role: UserRole,

    pub full_name: Option<String>,
    pub display_name: Option<String>,
    pub age: Option<i32>,
    pub profile_photo_url: Option<String>,

    pub primary_phone: Option<String>,
    pub wechat_id: Option<String>,
    pub wechat_qr_code_url: Option<String>,
    pub xiaohongshu_handle: Option<String>,

    pub city: Option<String>,
    pub province: Option<String>,
    pub country: Option<String>,
    pub service_areas: Option<String>,
    pub current_location: Option<String>,
    pub willing_to_relocate: bool,

    pub years_of_experience: Option<i32>,
    pub languages: Option<String>,
    pub specializations: Option<String>,
    pub certifications: Option<String>,
    pub services_offered: Option<String>,
    /// Decimal, serialized as a string
    #[schema(value_type = Option<String>)]
    pub hourly_rate: Option<BigDecimal>,

    pub about_me: Option<String>,
    pub professional_experience: Option<String>,
    pub education_background: Option<String>,
    pub special_skills: Option<String>,

    pub gallery_photos: Option<String>,
    pub certificates_photos: Option<String>,

    #[schema(value_type = String)]
    pub total_rating: BigDecimal,
    pub total_reviews: i32,

    pub profile_completion_percentage: i32,
    pub is_featured: bool,
    pub is_active: bool,
    pub verification_status: VerificationStatus,
    pub profile_views: i32,
    #[schema(value_type = String, format = DateTime)]
    pub last_active_at: Timestamp,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: Timestamp,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: Timestamp,
}

impl From<Profile> for ProfileResponse {
    fn from(p: Profile) -> Self {
        Self {
            id: p.id,
            external_auth_id: p.external_auth_id,
            email: p.email,
            role: p.role,
            full_name: p.full_name,
            display_name: p.display_name,
            age: p.age,
            profile_photo_url: p.profile_photo_url,
            primary_phone: p.primary_phone,
            wechat_id: p.wechat_id,
            wechat_qr_code_url: p.wechat_qr_code_url,
            xiaohongshu_handle: p.xiaohongshu_handle,
            city: p.city,
            province: p.province,
            country: p.country,
            service_areas: p.service_areas,
            current_location: p.current_location,
            willing_to_relocate: p.willing_to_relocate,
            years_of_experience: p.years_of_experience,
            languages: p.languages,
            specializations: p.specializations,
            certifications: p.certifications,
            services_offered: p.services_offered,
            hourly_rate: p.hourly_rate,
            about_me: p.about_me,
            professional_experience: p.professional_experience,
            education_background: p.education_background,
            special_skills: p.special_skills,
            gallery_photos: p.gallery_photos,
            certificates_photos: p.certificates_photos,
            total_rating: p.total_rating,
            total_reviews: p.total_reviews,
            profile_completion_percentage: p.profile_completion_percentage,
            is_featured: p.is_featured,
            is_active: p.is_active,
            verification_status: p.verification_status,
            profile_views: p.profile_views,
            last_active_at: p.last_active_at,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Caregiver card shown in search results.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CaregiverSummary {
    pub id: i64,
    pub display_name: Option<String>,
    pub profile_photo_url: Option<String>,
    pub province: Option<String>,
    pub languages: Option<String>,
    pub services_offered: Option<String>,
    pub specializations: Option<String>,
    pub years_of_experience: Option<i32>,
    pub age: Option<i32>,
    pub profile_completion_percentage: i32,
    #[schema(value_type = String)]
    pub total_rating: BigDecimal,
    pub total_reviews: i32,
}

impl From<Profile> for CaregiverSummary {
    fn from(p: Profile) -> Self {
        Self {
            id: p.id,
            display_name: p.display_name,
            profile_photo_url: p.profile_photo_url,
            province: p.province,
            languages: p.languages,
            services_offered: p.services_offered,
            specializations: p.specializations,
            years_of_experience: p.years_of_experience,
            age: p.age,
            profile_completion_percentage: p.profile_completion_percentage,
            total_rating: p.total_rating,
            total_reviews: p.total_reviews,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_request_accepts_user_type_alias() {
        let req: CreateProfileRequest = serde_json::from_value(json!({
            "externalAuthId": "abc",
            "email": "a@example.com",
            "userType": "PARENT"
        }))
        .unwrap();
        assert_eq!(req.role, UserRole::Client);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_request_rejects_bad_email_and_phone() {
        let req: CreateProfileRequest = serde_json::from_value(json!({
            "externalAuthId": "abc",
            "email": "not-an-email",
            "role": "CLIENT",
            "phone": "12-34"
        }))
        .unwrap();
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("phone"));
    }

    #[test]
    fn test_update_request_limits() {
        let req: UpdateProfileRequest = serde_json::from_value(json!({
            "age": 17,
            "yearsOfExperience": 51,
            "hourlyRate": 1000.5,
            "primaryPhone": "+8613800000000",
            "city": "x".repeat(101)
        }))
        .unwrap();
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("age"));
        assert!(fields.contains_key("years_of_experience"));
        assert!(fields.contains_key("hourly_rate"));
        assert!(fields.contains_key("city"));
        assert!(!fields.contains_key("primary_phone"));
    }

    #[test]
    fn test_update_request_converts_to_patch() {
        let req: UpdateProfileRequest = serde_json::from_value(json!({
            "province": "Sichuan",
            "hourlyRate": 95,
            "willingToRelocate": true
        }))
        .unwrap();
        assert!(req.validate().is_ok());

        let patch = ProfilePatch::from(req);
        assert_eq!(patch.province.as_deref(), Some("Sichuan"));
        assert_eq!(patch.hourly_rate, Some(BigDecimal::from(95)));
        assert_eq!(patch.willing_to_relocate, Some(true));
        assert!(patch.city.is_none());
    }

    #[test]
    fn test_patch_rounds_hourly_rate_to_cents() {
        let req: UpdateProfileRequest =
            serde_json::from_value(json!({ "hourlyRate": 12.3 })).unwrap();
        let rate = ProfilePatch::from(req).hourly_rate.unwrap();
        assert_eq!(rate.to_string(), "12.30");

        let req: UpdateProfileRequest =
            serde_json::from_value(json!({ "hourlyRate": 85.5 })).unwrap();
        let rate = ProfilePatch::from(req).hourly_rate.unwrap();
        assert_eq!(rate.to_string(), "85.50");
    }

    #[test]
    fn test_profile_response_is_camel_case() {
        let mut profile =
            Profile::new("abc", "a@example.com", UserRole::Caregiver, Timestamp::UNIX_EPOCH);
        profile.id = 3;
        let body = serde_json::to_value(ProfileResponse::from(profile)).unwrap();
        assert_eq!(body["externalAuthId"], "abc");
        assert_eq!(body["role"], "CAREGIVER");
        assert_eq!(body["verificationStatus"], "UNVERIFIED");
        assert_eq!(body["country"], "China");
        assert_eq!(body["isActive"], true);
        assert_eq!(body["createdAt"], "1970-01-01T00:00:00Z");
    }
}
