//! Field registry for single-field profile updates.
//!
//! Every field that may be edited by name is listed once in [`FIELDS`] with
//! its value kind and a typed setter. Lookup is case-insensitive. JSON `null`
//! clears the field.

use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::models::Profile;

/// Value kind a registered field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Boolean,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "string",
            FieldKind::Integer => "integer",
            FieldKind::Boolean => "boolean",
        }
    }
}

/// Typed setter for one registered field.
#[derive(Clone, Copy)]
pub enum FieldSetter {
    Text(fn(&mut Profile, Option<String>)),
    Integer(fn(&mut Profile, Option<i32>)),
    Boolean(fn(&mut Profile, Option<bool>)),
}

/// A field that may be updated by name.
#[derive(Clone, Copy)]
pub struct RegistryField {
    /// Canonical camelCase name.
    pub name: &'static str,
    setter: FieldSetter,
}

impl std::fmt::Debug for RegistryField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryField")
            .field("name", &self.name)
            .field("kind", &self.kind())
            .finish()
    }
}

impl RegistryField {
    const fn text(name: &'static str, set: fn(&mut Profile, Option<String>)) -> Self {
        Self {
            name,
            setter: FieldSetter::Text(set),
        }
    }

    const fn integer(name: &'static str, set: fn(&mut Profile, Option<i32>)) -> Self {
        Self {
            name,
            setter: FieldSetter::Integer(set),
        }
    }

    const fn boolean(name: &'static str, set: fn(&mut Profile, Option<bool>)) -> Self {
        Self {
            name,
            setter: FieldSetter::Boolean(set),
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self.setter {
            FieldSetter::Text(_) => FieldKind::Text,
            FieldSetter::Integer(_) => FieldKind::Integer,
            FieldSetter::Boolean(_) => FieldKind::Boolean,
        }
    }

    /// Checks the JSON kind of `raw` against the field and writes it.
    /// Nothing is written on mismatch.
    pub fn set(&self, profile: &mut Profile, raw: &Value) -> AppResult<()> {
        match (self.setter, raw) {
            (FieldSetter::Text(set), Value::Null) => set(profile, None),
            (FieldSetter::Integer(set), Value::Null) => set(profile, None),
            (FieldSetter::Boolean(set), Value::Null) => set(profile, None),
            (FieldSetter::Text(set), Value::String(s)) => set(profile, Some(s.clone())),
            (FieldSetter::Integer(set), Value::Number(n)) => {
                let value = n
                    .as_i64()
                    .and_then(|v| i32::try_from(v).ok())
                    .ok_or_else(|| self.mismatch(raw))?;
                set(profile, Some(value))
            }
            (FieldSetter::Boolean(set), Value::Bool(b)) => set(profile, Some(*b)),
            _ => return Err(self.mismatch(raw)),
        }
        Ok(())
    }

    fn mismatch(&self, raw: &Value) -> AppError {
        AppError::TypeMismatch {
            field: self.name.to_string(),
            expected: self.kind().as_str().to_string(),
            found: json_kind(raw).to_string(),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Fields editable by name. Identity, role, social proof and platform flags
/// are not listed and can only change through dedicated flows.
pub static FIELDS: &[RegistryField] = &[
    RegistryField::text("fullName", |p, v| p.full_name = v),
    RegistryField::text("displayName", |p, v| p.display_name = v),
    RegistryField::integer("age", |p, v| p.age = v),
    RegistryField::text("profilePhotoUrl", |p, v| p.profile_photo_url = v),
    RegistryField::text("primaryPhone", |p, v| p.primary_phone = v),
    RegistryField::text("wechatId", |p, v| p.wechat_id = v),
    RegistryField::text("wechatQrCodeUrl", |p, v| p.wechat_qr_code_url = v),
    RegistryField::text("xiaohongshuHandle", |p, v| p.xiaohongshu_handle = v),
    RegistryField::text("city", |p, v| p.city = v),
    RegistryField::text("province", |p, v| p.province = v),
    RegistryField::text("country", |p, v| p.country = v),
    RegistryField::text("serviceAreas", |p, v| p.service_areas = v),
    RegistryField::text("currentLocation", |p, v| p.current_location = v),
    RegistryField::boolean("willingToRelocate", |p, v| {
        p.willing_to_relocate = v.unwrap_or(false)
    }),
    RegistryField::integer("yearsOfExperience", |p, v| p.years_of_experience = v),
    RegistryField::text("languages", |p, v| p.languages = v),
    RegistryField::text("specializations", |p, v| p.specializations = v),
    RegistryField::text("certifications", |p, v| p.certifications = v),
    RegistryField::text("servicesOffered", |p, v| p.services_offered = v),
    RegistryField::text("aboutMe", |p, v| p.about_me = v),
    RegistryField::text("professionalExperience", |p, v| p.professional_experience = v),
    RegistryField::text("educationBackground", |p, v| p.education_background = v),
    RegistryField::text("specialSkills", |p, v| p.special_skills = v),
    RegistryField::text("galleryPhotos", |p, v| p.gallery_photos = v),
    RegistryField::text("certificatesPhotos", |p, v| p.certificates_photos = v),
];

/// Looks a field up by name, ignoring ASCII case.
pub fn resolve(field_name: &str) -> AppResult<&'static RegistryField> {
    FIELDS
        .iter()
        .find(|field| field.name.eq_ignore_ascii_case(field_name))
        .ok_or_else(|| AppError::UnknownField {
            field: field_name.to_string(),
        })
}

/// Resolves `field_name` and writes `raw` into the profile.
pub fn apply(profile: &mut Profile, field_name: &str, raw: &Value) -> AppResult<()> {
    resolve(field_name)?.set(profile, raw)
}
