//! Authentication middleware.

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};

use common::AppError;

use crate::state::AppState;

/// Resolve the bearer token and store the caller's
/// [`ResolvedIdentity`](domain::ResolvedIdentity) in the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let identity = state.access.resolve_token(&header).await?;
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}
