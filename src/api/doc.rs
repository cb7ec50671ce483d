use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

pub const USER_TAG: &str = "Profiles";
pub const SEARCH_TAG: &str = "Caregiver Search";
pub const ME_TAG: &str = "Me";
pub const HEALTH_TAG: &str = "Health";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Caregiver Hub",
        description = "Caregiver profiles, completeness scoring and search",
    ),
    modifiers(&SecurityAddon),
    components(
        schemas(
            crate::api::dto::ErrorResponse,
            crate::models::UserRole,
            crate::models::VerificationStatus,
            crate::services::profiles::CompletenessReport,
        )
    ),
    tags(
        (name = USER_TAG, description = "Profile registration, lookup and updates"),
        (name = SEARCH_TAG, description = "Caregiver listing and filtered search"),
        (name = ME_TAG, description = "Endpoints for the authenticated caller"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearerAuth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Identity provider bearer token"))
                        .build(),
                ),
            )
        }
    }
}
