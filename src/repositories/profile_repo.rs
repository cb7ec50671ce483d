//! Postgres-backed profile store.
//!
//! Uses diesel_async over the shared bb8 pool. Rows are mapped to and from
//! the domain `Profile` through `ProfileRow` (reads) and `ProfileRecord`
//! (inserts and full-row updates).

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use jiff_diesel::Timestamp;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::models::{Profile, UserRole, VerificationStatus};
use crate::repositories::ProfileStore;

/// Profile row as read from the `profiles` table.
#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct ProfileRow {
    id: i64,
    external_auth_id: String,
    email: String,
    role: UserRole,
    full_name: Option<String>,
    display_name: Option<String>,
    age: Option<i32>,
    profile_photo_url: Option<String>,
    primary_phone: Option<String>,
    wechat_id: Option<String>,
    wechat_qr_code_url: Option<String>,
    xiaohongshu_handle: Option<String>,
    city: Option<String>,
    province: Option<String>,
    country: Option<String>,
    service_areas: Option<String>,
    current_location: Option<String>,
    willing_to_relocate: bool,
    years_of_experience: Option<i32>,
    languages: Option<String>,
    specializations: Option<String>,
    certifications: Option<String>,
    services_offered: Option<String>,
    hourly_rate: Option<BigDecimal>,
    about_me: Option<String>,
    professional_experience: Option<String>,
    education_background: Option<String>,
    special_skills: Option<String>,
    gallery_photos: Option<String>,
    certificates_photos: Option<String>,
    total_rating: BigDecimal,
    total_reviews: i32,
    profile_completion_percentage: i32,
    is_featured: bool,
    is_active: bool,
    verification_status: VerificationStatus,
    profile_views: i32,
    last_active_at: Timestamp,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            id: row.id,
            external_auth_id: row.external_auth_id,
            email: row.email,
            role: row.role,
            full_name: row.full_name,
            display_name: row.display_name,
            age: row.age,
            profile_photo_url: row.profile_photo_url,
            primary_phone: row.primary_phone,
            wechat_id: row.wechat_id,
            wechat_qr_code_url: row.wechat_qr_code_url,
            xiaohongshu_handle: row.xiaohongshu_handle,
            city: row.city,
            province: row.province,
            country: row.country,
            service_areas: row.service_areas,
            current_location: row.current_location,
            willing_to_relocate: row.willing_to_relocate,
            years_of_experience: row.years_of_experience,
            languages: row.languages,
            specializations: row.specializations,
            certifications: row.certifications,
            services_offered: row.services_offered,
            hourly_rate: row.hourly_rate,
            about_me: row.about_me,
            professional_experience: row.professional_experience,
            education_background: row.education_background,
            special_skills: row.special_skills,
            gallery_photos: row.gallery_photos,
            certificates_photos: row.certificates_photos,
            total_rating: row.total_rating,
            total_reviews: row.total_reviews,
            profile_completion_percentage: row.profile_completion_percentage,
            is_featured: row.is_featured,
            is_active: row.is_active,
            verification_status: row.verification_status,
            profile_views: row.profile_views,
            last_active_at: row.last_active_at.to_jiff(),
            created_at: row.created_at.to_jiff(),
            updated_at: row.updated_at.to_jiff(),
        }
    }
}

/// Every column but `id`. `None` writes NULL on update so cleared fields stay
/// cleared.
#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::profiles)]
#[diesel(treat_none_as_null = true)]
struct ProfileRecord<'a> {
    external_auth_id: &'a str,
    email: &'a str,
    role: UserRole,
    full_name: Option<&'a str>,
    display_name: Option<&'a str>,
    age: Option<i32>,
    profile_photo_url: Option<&'a str>,
    primary_phone: Option<&'a str>,
    wechat_id: Option<&'a str>,
    wechat_qr_code_url: Option<&'a str>,
    xiaohongshu_handle: Option<&'a str>,
    city: Option<&'a str>,
    province: Option<&'a str>,
    country: Option<&'a str>,
    service_areas: Option<&'a str>,
    current_location: Option<&'a str>,
    willing_to_relocate: bool,
    years_of_experience: Option<i32>,
    languages: Option<&'a str>,
    specializations: Option<&'a str>,
    certifications: Option<&'a str>,
    services_offered: Option<&'a str>,
    hourly_rate: Option<&'a BigDecimal>,
    about_me: Option<&'a str>,
    professional_experience: Option<&'a str>,
    education_background: Option<&'a str>,
    special_skills: Option<&'a str>,
    gallery_photos: Option<&'a str>,
    certificates_photos: Option<&'a str>,
    total_rating: &'a BigDecimal,
    total_reviews: i32,
    profile_completion_percentage: i32,
    is_featured: bool,
    is_active: bool,
    verification_status: VerificationStatus,
    profile_views: i32,
    last_active_at: Timestamp,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl<'a> From<&'a Profile> for ProfileRecord<'a> {
    fn from(p: &'a Profile) -> Self {
        ProfileRecord {
            external_auth_id: &p.external_auth_id,
            email: &p.email,
            role: p.role,
            full_name: p.full_name.as_deref(),
            display_name: p.display_name.as_deref(),
            age: p.age,
            profile_photo_url: p.profile_photo_url.as_deref(),
            primary_phone: p.primary_phone.as_deref(),
            wechat_id: p.wechat_id.as_deref(),
            wechat_qr_code_url: p.wechat_qr_code_url.as_deref(),
            xiaohongshu_handle: p.xiaohongshu_handle.as_deref(),
            city: p.city.as_deref(),
            province: p.province.as_deref(),
            country: p.country.as_deref(),
            service_areas: p.service_areas.as_deref(),
            current_location: p.current_location.as_deref(),
            willing_to_relocate: p.willing_to_relocate,
            years_of_experience: p.years_of_experience,
            languages: p.languages.as_deref(),
            specializations: p.specializations.as_deref(),
            certifications: p.certifications.as_deref(),
            services_offered: p.services_offered.as_deref(),
            hourly_rate: p.hourly_rate.as_ref(),
            about_me: p.about_me.as_deref(),
            professional_experience: p.professional_experience.as_deref(),
            education_background: p.education_background.as_deref(),
            special_skills: p.special_skills.as_deref(),
            gallery_photos: p.gallery_photos.as_deref(),
            certificates_photos: p.certificates_photos.as_deref(),
            total_rating: &p.total_rating,
            total_reviews: p.total_reviews,
            profile_completion_percentage: p.profile_completion_percentage,
            is_featured: p.is_featured,
            is_active: p.is_active,
            verification_status: p.verification_status,
            profile_views: p.profile_views,
            last_active_at: Timestamp::from(p.last_active_at),
            created_at: Timestamp::from(p.created_at),
            updated_at: Timestamp::from(p.updated_at),
        }
    }
}

/// Profile store holding an async connection pool.
///
/// `AsyncDbPool` is reference counted, so cloning the store is cheap.
#[derive(Clone)]
pub struct PgProfileStore {
    pool: AsyncDbPool,
}

impl PgProfileStore {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn find_by_id(&self, profile_id: i64) -> AppResult<Option<Profile>> {
        use crate::schema::profiles::dsl::*;
        let mut conn = self.pool.get().await?;

        let row = profiles
            .filter(id.eq(profile_id))
            .select(ProfileRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)?;
        Ok(row.map(Profile::from))
    }

    async fn find_by_external_auth_id(&self, auth_id: &str) -> AppResult<Option<Profile>> {
        use crate::schema::profiles::dsl::*;
        let mut conn = self.pool.get().await?;

        let row = profiles
            .filter(external_auth_id.eq(auth_id))
            .select(ProfileRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)?;
        Ok(row.map(Profile::from))
    }

    async fn find_all(&self) -> AppResult<Vec<Profile>> {
        use crate::schema::profiles::dsl::*;
        let mut conn = self.pool.get().await?;

        let rows = profiles
            .order(id.asc())
            .select(ProfileRow::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)?;
        Ok(rows.into_iter().map(Profile::from).collect())
    }

    async fn find_by_role(&self, wanted: UserRole) -> AppResult<Vec<Profile>> {
        use crate::schema::profiles::dsl::*;
        let mut conn = self.pool.get().await?;

        let rows = profiles
            .filter(role.eq(wanted))
            .order(id.asc())
            .select(ProfileRow::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)?;
        Ok(rows.into_iter().map(Profile::from).collect())
    }

    async fn exists_by_external_auth_id(&self, auth_id: &str) -> AppResult<bool> {
        use crate::schema::profiles::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::select(diesel::dsl::exists(
            profiles.filter(external_auth_id.eq(auth_id)),
        ))
        .get_result(&mut conn)
        .await
        .map_err(AppError::from)
    }

    async fn exists_by_email(&self, address: &str) -> AppResult<bool> {
        use crate::schema::profiles::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::select(diesel::dsl::exists(profiles.filter(email.eq(address))))
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn create(&self, profile: Profile) -> AppResult<Profile> {
        use crate::schema::profiles::dsl::*;
        let mut conn = self.pool.get().await?;

        let row = diesel::insert_into(profiles)
            .values(ProfileRecord::from(&profile))
            .returning(ProfileRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)?;
        Ok(row.into())
    }

    async fn save(&self, profile: &Profile) -> AppResult<Profile> {
        use crate::schema::profiles::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::update(profiles.filter(id.eq(profile.id)))
            .set(ProfileRecord::from(profile))
            .returning(ProfileRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)?
            .map(Profile::from)
            .ok_or_else(|| AppError::profile_not_found("id", profile.id))
    }

    async fn ping(&self) -> AppResult<()> {
        let mut conn = self.pool.get().await?;
        diesel::sql_query("SELECT 1")
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(AppError::from)
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
