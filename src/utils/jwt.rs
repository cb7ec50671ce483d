//! HS256 bearer tokens.

use jiff::Timestamp;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Claims carried by a bearer token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// External auth id of the subject
    pub sub: String,
    pub email: String,
    /// Display name, when the identity provider supplies one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiration time (unix seconds)
    pub exp: i64,
}

impl Claims {
    pub fn new(
        subject: impl Into<String>,
        email: impl Into<String>,
        name: Option<String>,
        expiration_hours: i64,
    ) -> Self {
        let now = Timestamp::now().as_second();
        Self {
            sub: subject.into(),
            email: email.into(),
            name,
            iat: now,
            exp: now.saturating_add(expiration_hours.saturating_mul(3600)),
        }
    }
}

/// Signs `claims` with `secret`.
///
/// ```ignore
/// let claims = Claims::new("auth0|42", "li@example.com", None, 24);
/// let token = generate_token(&claims, &settings.jwt.secret)?;
/// ```
pub fn generate_token(claims: &Claims, secret: &str) -> AppResult<String> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal {
        source: anyhow::anyhow!("Failed to generate JWT token: {}", e),
    })
}

/// Verifies signature and expiry and returns the claims.
pub fn validate_token(token: &str, secret: &str) -> AppResult<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::Unauthorized {
            message: "Token has expired".to_string(),
        },
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AppError::Unauthorized {
            message: "Invalid token signature".to_string(),
        },
        jsonwebtoken::errors::ErrorKind::InvalidToken => AppError::Unauthorized {
            message: "Invalid token".to_string(),
        },
        _ => AppError::Unauthorized {
            message: format!("Token validation failed: {}", e),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test_secret_key_for_jwt_testing_0123456789";

    fn unauthorized_message(result: AppResult<Claims>) -> String {
        match result {
            Err(AppError::Unauthorized { message }) => message,
            other => panic!("Expected Unauthorized, got {other:?}"),
        }
    }

    #[test]
    fn test_generate_and_validate() {
        let claims = Claims::new("auth0|7", "li@example.com", Some("Li".to_string()), 24);
        let token = generate_token(&claims, TEST_SECRET).unwrap();
        assert_eq!(token.matches('.').count(), 2);

        let decoded = validate_token(&token, TEST_SECRET).unwrap();
        assert_eq!(decoded, claims);
        assert!(decoded.exp > decoded.iat);
    }

    #[test]
    fn test_name_is_optional_on_the_wire() {
        let claims = Claims::new("auth0|7", "li@example.com", None, 1);
        let json = serde_json::to_value(&claims).unwrap();
        assert!(json.get("name").is_none());

        let token = generate_token(&claims, TEST_SECRET).unwrap();
        assert_eq!(validate_token(&token, TEST_SECRET).unwrap().name, None);
    }

    #[test]
    fn test_wrong_secret() {
        let token = generate_token(&Claims::new("s", "e@example.com", None, 1), TEST_SECRET).unwrap();
        let message = unauthorized_message(validate_token(&token, "another_secret_another_secret_xx"));
        assert!(message.contains("signature"));
    }

    #[test]
    fn test_expired_token() {
        let token = generate_token(&Claims::new("s", "e@example.com", None, -1), TEST_SECRET).unwrap();
        let message = unauthorized_message(validate_token(&token, TEST_SECRET));
        assert!(message.contains("expired"));
    }

    #[test]
    fn test_garbage_token() {
        assert!(matches!(
            validate_token("invalid.token.format", TEST_SECRET),
            Err(AppError::Unauthorized { .. })
        ));
    }
}
