//! Identity header middleware

use axum::{body::Body, http::Request, middleware::Next, response::Response};

use crate::domain::entities::{Identity, Role};
use crate::error::AppError;

/// Subject identifier issued by the identity provider
pub const IDENTITY_HEADER: &str = "x-identity";
/// Role claim; absent means guest
pub const ROLE_HEADER: &str = "x-identity-role";

fn header<'a>(request: &'a Request<Body>, name: &str) -> Option<&'a str> {
    request
        .headers()
        .get(name)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Extract the caller identity from request headers
fn extract_identity(request: &Request<Body>) -> Result<Identity, AppError> {
    let id = header(request, IDENTITY_HEADER).ok_or(AppError::Unauthorized)?;

    let role = match header(request, ROLE_HEADER) {
        Some(raw) => raw.parse::<Role>().map_err(|e| {
            tracing::warn!(identity = %id, error = %e, "Rejected identity role");
            AppError::Unauthorized
        })?,
        None => Role::Guest,
    };

    Ok(Identity::new(id, role))
}

/// Authentication middleware
///
/// Validates the identity headers and injects the `Identity` into request
/// extensions. Requests without a usable identity get 401.
pub async fn identity_middleware(
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let identity = extract_identity(&request)?;
    tracing::debug!(identity = %identity.id, role = %identity.role, "Authenticated request");

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}
