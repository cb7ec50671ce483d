//! Profile domain model.
//!
//! `Profile` is a plain struct shared by every layer. The Postgres adapter maps
//! it to and from its own row types, so nothing here depends on the storage
//! layout except the two enums backed by Postgres enum types.

use bigdecimal::BigDecimal;
use diesel_derive_enum::DbEnum;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Country stamped on freshly created profiles.
pub const DEFAULT_COUNTRY: &str = "China";

// ============================================================================
// Enums
// ============================================================================

/// Account role. Fixed at creation.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    utoipa::ToSchema,
    DbEnum,
)]
#[db_enum(existing_type_path = "crate::schema::sql_types::UserRole")]
#[db_enum(value_style = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Caregiver,
    /// Family looking for care. `PARENT` is accepted on input.
    #[serde(alias = "PARENT")]
    Client,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Caregiver => "CAREGIVER",
            UserRole::Client => "CLIENT",
            UserRole::Admin => "ADMIN",
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CAREGIVER" => Ok(UserRole::Caregiver),
            "CLIENT" | "PARENT" => Ok(UserRole::Client),
            "ADMIN" => Ok(UserRole::Admin),
            _ => Err(format!(
                "Unrecognized role '{}'. Valid roles are: CAREGIVER, CLIENT, ADMIN",
                s
            )),
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity verification state of a profile.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    utoipa::ToSchema,
    DbEnum,
)]
#[db_enum(existing_type_path = "crate::schema::sql_types::VerificationStatus")]
#[db_enum(value_style = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    #[default]
    Unverified,
    Pending,
    Verified,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Unverified => "UNVERIFIED",
            VerificationStatus::Pending => "PENDING",
            VerificationStatus::Verified => "VERIFIED",
        }
    }
}

impl FromStr for VerificationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "UNVERIFIED" => Ok(VerificationStatus::Unverified),
            "PENDING" => Ok(VerificationStatus::Pending),
            "VERIFIED" => Ok(VerificationStatus::Verified),
            _ => Err(format!("Unrecognized verification status: {}", s)),
        }
    }
}

// ============================================================================
// Profile
// ============================================================================

/// A user profile: identity, optional self-description and platform state.
///
/// List-like attributes (languages, services, gallery photos, ...) are kept as
/// the free-form text clients send, usually comma separated.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub id: i64,
    pub external_auth_id: String,
    pub email: String,
    pub role: UserRole,

    // basic
    pub full_name: Option<String>,
    pub display_name: Option<String>,
    pub age: Option<i32>,
    pub profile_photo_url: Option<String>,

    // contact
    pub primary_phone: Option<String>,
    pub wechat_id: Option<String>,
    pub wechat_qr_code_url: Option<String>,
    pub xiaohongshu_handle: Option<String>,

    // location
    pub city: Option<String>,
    pub province: Option<String>,
    pub country: Option<String>,
    pub service_areas: Option<String>,
    pub current_location: Option<String>,
    pub willing_to_relocate: bool,

    // professional
    pub years_of_experience: Option<i32>,
    pub languages: Option<String>,
    pub specializations: Option<String>,
    pub certifications: Option<String>,
    pub services_offered: Option<String>,
    pub hourly_rate: Option<BigDecimal>,

    // rich text
    pub about_me: Option<String>,
    pub professional_experience: Option<String>,
    pub education_background: Option<String>,
    pub special_skills: Option<String>,

    // media
    pub gallery_photos: Option<String>,
    pub certificates_photos: Option<String>,

    // social proof, maintained elsewhere
    pub total_rating: BigDecimal,
    pub total_reviews: i32,

    // platform
    pub profile_completion_percentage: i32,
    pub is_featured: bool,
    pub is_active: bool,
    pub verification_status: VerificationStatus,
    pub profile_views: i32,
    pub last_active_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Profile {
    /// Builds an unsaved profile with platform defaults. `id` stays 0 until
    /// the store assigns one.
    pub fn new(
        external_auth_id: impl Into<String>,
        email: impl Into<String>,
        role: UserRole,
        now: Timestamp,
    ) -> Self {
        Self {
            id: 0,
            external_auth_id: external_auth_id.into(),
            email: email.into(),
            role,
            full_name: None,
            display_name: None,
            age: None,
            profile_photo_url: None,
            primary_phone: None,
            wechat_id: None,
            wechat_qr_code_url: None,
            xiaohongshu_handle: None,
            city: None,
            province: None,
            country: Some(DEFAULT_COUNTRY.to_string()),
            service_areas: None,
            current_location: None,
            willing_to_relocate: false,
            years_of_experience: None,
            languages: None,
            specializations: None,
            certifications: None,
            services_offered: None,
            hourly_rate: None,
            about_me: None,
            professional_experience: None,
            education_background: None,
            special_skills: None,
            gallery_photos: None,
            certificates_photos: None,
            total_rating: BigDecimal::from(0),
            total_reviews: 0,
            profile_completion_percentage: 0,
            is_featured: false,
            is_active: true,
            verification_status: VerificationStatus::Unverified,
            profile_views: 0,
            last_active_at: now,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_caregiver(&self) -> bool {
        self.role == UserRole::Caregiver
    }
}

/// Input for registering a profile. Everything else starts from defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProfile {
    pub external_auth_id: String,
    pub email: String,
    pub role: UserRole,
    pub primary_phone: Option<String>,
    pub display_name: Option<String>,
}

/// Partial update applied by the bulk update path. `None` means "leave as is".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfilePatch {
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
    pub willing_to_relocate: Option<bool>,
    pub years_of_experience: Option<i32>,
    pub languages: Option<String>,
    pub specializations: Option<String>,
    pub certifications: Option<String>,
    pub services_offered: Option<String>,
    pub hourly_rate: Option<BigDecimal>,
    pub about_me: Option<String>,
    pub professional_experience: Option<String>,
    pub education_background: Option<String>,
    pub special_skills: Option<String>,
    pub gallery_photos: Option<String>,
    pub certificates_photos: Option<String>,
}

/// How a caller addresses an existing profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileKey {
    Id(i64),
    ExternalAuthId(String),
}

impl ProfileKey {
    /// Field name and value, for not-found reporting.
    pub fn describe(&self) -> (&'static str, String) {
        match self {
            ProfileKey::Id(id) => ("id", id.to_string()),
            ProfileKey::ExternalAuthId(auth_id) => ("externalAuthId", auth_id.clone()),
        }
    }
}
