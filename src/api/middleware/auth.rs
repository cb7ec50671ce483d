//! Bearer authentication middleware for the `/me` routes.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::api::middleware::RequestId;
use crate::api::middleware::error_handler::error_to_response_with_request_id;
use crate::auth::VerifiedSubject;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Verified caller, inserted into request extensions by [`auth_middleware`]
/// and read by handlers through `Extension<AuthSubject>`.
#[derive(Debug, Clone)]
pub struct AuthSubject(pub VerifiedSubject);

fn bearer_token(request: &Request) -> AppResult<&str> {
    let value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized {
            message: "Missing authorization header".to_string(),
        })?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized {
            message: "Invalid authorization header format. Expected: Bearer <token>".to_string(),
        })
}

/// Rejects the request with 401 unless it carries a token the configured
/// verifier accepts.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let verified = match bearer_token(&request) {
        Ok(token) => state.verifier.verify_subject(token).await,
        Err(e) => Err(e),
    };

    match verified {
        Ok(subject) => {
            tracing::debug!(subject_id = %subject.subject_id, "Bearer token accepted");
            request.extensions_mut().insert(AuthSubject(subject));
            next.run(request).await
        }
        Err(e) => {
            let request_id = request.extensions().get::<RequestId>().map(|r| r.0.clone());
            tracing::debug!(error = %e, "Bearer token rejected");
            error_to_response_with_request_id(e, request_id).into_response()
        }
    }
}
