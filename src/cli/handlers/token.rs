//! Token command handler
//!
//! Mints bearer tokens for local testing of the `/api/me` endpoints.

use crate::config::JwtConfig;
use crate::error::{AppError, AppResult};
use crate::utils::jwt::{Claims, generate_token};

pub struct TokenCommandHandler {
    jwt: JwtConfig,
}

impl TokenCommandHandler {
    pub fn new(jwt: JwtConfig) -> Self {
        Self { jwt }
    }

    /// Signs a token for the given identity with `jwt.secret`.
    pub fn mint(&self, subject: &str, email: &str, name: Option<String>) -> AppResult<String> {
        if !self.jwt.is_enabled() {
            return Err(AppError::Validation {
                field: "jwt.secret".to_string(),
                reason: "A signing secret must be configured to mint tokens".to_string(),
            });
        }

        let claims = Claims::new(subject, email, name, self.jwt.access_token_expiration);
        generate_token(&claims, &self.jwt.secret)
    }

    pub fn execute(&self, subject: &str, email: &str, name: Option<String>) -> AppResult<()> {
        let token = self.mint(subject, email, name)?;
        println!("{}", token);
        Ok(())
    }
}
