//! Applies profile mutations. Both paths re-score the profile and stamp
//! `updated_at`; persisting the result is up to the caller.

use jiff::Timestamp;
use serde_json::Value;

use crate::error::AppResult;
use crate::models::{Profile, ProfilePatch};
use crate::services::profiles::{completeness, registry};

fn assign<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

/// Copies every present field of `patch` onto `profile`.
pub fn apply_patch(profile: &mut Profile, patch: ProfilePatch, now: Timestamp) {
    assign(&mut profile.full_name, patch.full_name);
    assign(&mut profile.display_name, patch.display_name);
    assign(&mut profile.age, patch.age);
    assign(&mut profile.profile_photo_url, patch.profile_photo_url);
    assign(&mut profile.primary_phone, patch.primary_phone);
    assign(&mut profile.wechat_id, patch.wechat_id);
    assign(&mut profile.wechat_qr_code_url, patch.wechat_qr_code_url);
    assign(&mut profile.xiaohongshu_handle, patch.xiaohongshu_handle);
    assign(&mut profile.city, patch.city);
    assign(&mut profile.province, patch.province);
    assign(&mut profile.country, patch.country);
    assign(&mut profile.service_areas, patch.service_areas);
    assign(&mut profile.current_location, patch.current_location);
    if let Some(willing) = patch.willing_to_relocate {
        profile.willing_to_relocate = willing;
    }
    assign(&mut profile.years_of_experience, patch.years_of_experience);
    assign(&mut profile.languages, patch.languages);
    assign(&mut profile.specializations, patch.specializations);
    assign(&mut profile.certifications, patch.certifications);
    assign(&mut profile.services_offered, patch.services_offered);
    assign(&mut profile.hourly_rate, patch.hourly_rate);
    assign(&mut profile.about_me, patch.about_me);
    assign(&mut profile.professional_experience, patch.professional_experience);
    assign(&mut profile.education_background, patch.education_background);
    assign(&mut profile.special_skills, patch.special_skills);
    assign(&mut profile.gallery_photos, patch.gallery_photos);
    assign(&mut profile.certificates_photos, patch.certificates_photos);

    refresh(profile, now);
}

/// Sets one registered field by name. The profile is untouched on error.
pub fn apply_field(
    profile: &mut Profile,
    field_name: &str,
    raw: &Value,
    now: Timestamp,
) -> AppResult<()> {
    registry::apply(profile, field_name, raw)?;
    refresh(profile, now);
    Ok(())
}

fn refresh(profile: &mut Profile, now: Timestamp) {
    profile.profile_completion_percentage = completeness::score(profile);
    profile.updated_at = now;
}
