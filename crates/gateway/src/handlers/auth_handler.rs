//! Public handlers: login, self-registration and password restore.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::post,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use common::{AppError, AppResult};
use domain::TokenPair;

use super::validate_password;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// Header carrying the user id next to issued tokens.
pub const ID_HEADER: &str = "id";

/// Login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email)]
    #[schema(example = "test@yandex.ru")]
    pub email: String,
    #[validate(length(min = 1))]
    #[schema(example = "HGYKnu!98Tg")]
    pub password: String,
}

/// Customer registration request. Leave the password empty to get a generated one by mail.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CustomerRequest {
    #[validate(email(message = "invalid email"))]
    #[schema(example = "test@yandex.ru")]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = "validate_password"))]
    #[schema(example = "HGYKnu!98Tg")]
    pub password: String,
}

/// Password restore request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RestorePasswordRequest {
    #[validate(email(message = "invalid email"))]
    #[schema(example = "test@yandex.ru")]
    pub email: String,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/users/login", post(login))
        .route("/users/customer", post(create_customer))
        .route("/users/restorePassword", post(restore_password))
}

fn with_id_header(status: StatusCode, user_id: i32, tokens: TokenPair) -> Response {
    (status, [(ID_HEADER, user_id.to_string())], Json(tokens)).into_response()
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/users/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Tokens issued, user id in the `id` header", body = TokenPair),
        (status = 400, description = "Malformed request"),
        (status = 401, description = "Wrong email or password, or deactivated account")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Response> {
    let malformed = || AppError::BadRequest(AppError::InvalidCredentials.to_string());

    let Json(payload) = payload.map_err(|_| malformed())?;
    payload.validate().map_err(|_| malformed())?;

    let session = state
        .users
        .authenticate(&payload.email, &payload.password)
        .await?;

    Ok(with_id_header(StatusCode::OK, session.user_id, session.tokens))
}

/// Register a customer account
#[utoipa::path(
    post,
    path = "/users/customer",
    tag = "Authentication",
    request_body = CustomerRequest,
    responses(
        (status = 201, description = "Customer created, user id in the `id` header", body = TokenPair),
        (status = 400, description = "Validation error or email already taken")
    )
)]
pub async fn create_customer(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CustomerRequest>,
) -> AppResult<Response> {
    let session = state
        .users
        .create_customer(&payload.email, &payload.password)
        .await?;

    Ok(with_id_header(
        StatusCode::CREATED,
        session.user_id,
        session.tokens,
    ))
}

/// Replace a forgotten password with a generated one sent by mail
#[utoipa::path(
    post,
    path = "/users/restorePassword",
    tag = "Authentication",
    request_body = RestorePasswordRequest,
    responses(
        (status = 204, description = "New password sent"),
        (status = 400, description = "Unknown email")
    )
)]
pub async fn restore_password(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RestorePasswordRequest>,
) -> AppResult<StatusCode> {
    state.users.restore_password(&payload.email).await?;
    Ok(StatusCode::NO_CONTENT)
}
