//! Bearer-token verification.
//!
//! The HTTP layer only sees [`SubjectVerifier`]; [`JwtSubjectVerifier`] is the
//! HS256 implementation wired in from the `jwt` settings.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::JwtConfig;
use crate::error::{AppError, AppResult};
use crate::utils::jwt::{Claims, validate_token};

/// Identity established from a verified token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedSubject {
    /// Becomes the profile's external auth id
    pub subject_id: String,
    pub email: String,
    pub display_name: Option<String>,
}

impl From<Claims> for VerifiedSubject {
    fn from(claims: Claims) -> Self {
        Self {
            subject_id: claims.sub,
            email: claims.email,
            display_name: claims.name.filter(|name| !name.trim().is_empty()),
        }
    }
}

#[async_trait]
pub trait SubjectVerifier: Send + Sync {
    /// Fails with `AppError::Unauthorized` for any token it cannot accept.
    async fn verify_subject(&self, token: &str) -> AppResult<VerifiedSubject>;
}

/// Verifies HS256 tokens signed with the configured secret.
pub struct JwtSubjectVerifier {
    /// `None` when no secret is configured; every token is rejected
    secret: Option<String>,
}

impl JwtSubjectVerifier {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            secret: config.is_enabled().then(|| config.secret.clone()),
        }
    }
}

#[async_trait]
impl SubjectVerifier for JwtSubjectVerifier {
    async fn verify_subject(&self, token: &str) -> AppResult<VerifiedSubject> {
        let secret = self.secret.as_deref().ok_or_else(|| AppError::Unauthorized {
            message: "Authentication is not configured".to_string(),
        })?;

        let claims = validate_token(token, secret)?;
        if claims.sub.trim().is_empty() {
            return Err(AppError::Unauthorized {
                message: "Token has no subject".to_string(),
            });
        }
        Ok(claims.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::jwt::generate_token;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "a-test-secret-that-is-long-enough-123".to_string(),
            access_token_expiration: 1,
        }
    }

    #[tokio::test]
    async fn test_verifies_subject_and_profile_claims() {
        let config = config();
        let claims = Claims::new("auth0|abc", "mei@example.com", Some("Mei".to_string()), 1);
        let token = generate_token(&claims, &config.secret).unwrap();

        let subject = JwtSubjectVerifier::new(&config)
            .verify_subject(&token)
            .await
            .unwrap();
        assert_eq!(
            subject,
            VerifiedSubject {
                subject_id: "auth0|abc".to_string(),
                email: "mei@example.com".to_string(),
                display_name: Some("Mei".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_blank_name_is_dropped() {
        let config = config();
        let claims = Claims::new("auth0|abc", "mei@example.com", Some("  ".to_string()), 1);
        let token = generate_token(&claims, &config.secret).unwrap();

        let subject = JwtSubjectVerifier::new(&config)
            .verify_subject(&token)
            .await
            .unwrap();
        assert_eq!(subject.display_name, None);
    }

    #[tokio::test]
    async fn test_rejects_everything_without_secret() {
        let token = generate_token(
            &Claims::new("auth0|abc", "mei@example.com", None, 1),
            &config().secret,
        )
        .unwrap();

        let verifier = JwtSubjectVerifier::new(&JwtConfig::default());
        assert!(matches!(
            verifier.verify_subject(&token).await,
            Err(AppError::Unauthorized { .. })
        ));
    }

    #[tokio::test]
    async fn test_rejects_empty_subject() {
        let config = config();
        let token = generate_token(&Claims::new("", "mei@example.com", None, 1), &config.secret)
            .unwrap();
        assert!(matches!(
            JwtSubjectVerifier::new(&config).verify_subject(&token).await,
            Err(AppError::Unauthorized { .. })
        ));
    }
}
