//! Protected user management handlers.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use common::{AppError, AppResult};
use domain::{
    access, compact_date, DomainResult, Page, RequestFilters, ResolvedIdentity, ResponseUser,
};
use user_service_lib::service::AccessControl;

use super::validate_password;
use crate::extractors::validated;
use crate::state::AppState;

/// Header carrying the page count of a listing.
pub const PAGES_HEADER: &str = "pages";

/// Staff registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct StaffRequest {
    #[validate(email(message = "invalid email"))]
    #[schema(example = "courier@yandex.ru")]
    pub email: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    #[schema(example = "Courier")]
    pub role: String,
    #[serde(default)]
    #[validate(custom(function = "validate_password"))]
    pub password: String,
}

/// Password change request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(email(message = "invalid email"))]
    #[schema(example = "test@yandex.ru")]
    pub email: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub old_password: String,
    #[validate(
        length(min = 1, message = "must not be empty"),
        custom(function = "validate_password")
    )]
    pub new_password: String,
}

/// Listing query. Dates use the YYYYMMDD form.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub role: Option<String>,
    pub filter_data: Option<bool>,
    pub show_deleted: Option<bool>,
    #[serde(default, deserialize_with = "compact_date::option::deserialize")]
    #[param(value_type = Option<String>, example = "20220301")]
    pub start_time: Option<NaiveDate>,
    #[serde(default, deserialize_with = "compact_date::option::deserialize")]
    #[param(value_type = Option<String>, example = "20220331")]
    pub end_time: Option<NaiveDate>,
}

impl ListUsersQuery {
    fn page(&self) -> DomainResult<Page> {
        Page::new(self.page.unwrap_or(0), self.limit.unwrap_or(0)).checked()
    }

    fn filters(&self) -> RequestFilters {
        RequestFilters {
            show_deleted: self.show_deleted.unwrap_or(false),
            filter_data: self.filter_data.unwrap_or(false),
            start_time: self.start_time,
            end_time: self.end_time,
            role: self.role.clone().unwrap_or_default(),
        }
    }
}

/// Listing body; the page count travels in the `pages` header.
#[derive(Debug, Serialize, ToSchema)]
pub struct UsersResponse {
    pub data: Vec<ResponseUser>,
}

/// Body carrying the id of a created or deleted user.
#[derive(Debug, Serialize, ToSchema)]
pub struct IdResponse {
    pub id: i32,
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/", get(list_users).put(update_user))
        .route("/users/staff", post(create_staff))
        .route("/users/:id", get(get_user).delete(delete_user))
}

fn parse_id(raw: &str) -> AppResult<i32> {
    match raw.parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::BadRequest("Invalid id".to_string())),
    }
}

/// Get a user by id
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User", body = ResponseUser),
        (status = 400, description = "Invalid id"),
        (status = 401, description = "Unauthorized or not enough rights"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    Extension(identity): Extension<ResolvedIdentity>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ResponseUser>> {
    AccessControl::authorize(&identity, &access::GET_USER)?;
    let id = parse_id(&id)?;

    Ok(Json(state.users.get_user(id).await?))
}

/// List users with pagination and filters
#[utoipa::path(
    get,
    path = "/users/",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Page of users, page count in the `pages` header", body = UsersResponse),
        (status = 400, description = "Invalid query"),
        (status = 401, description = "Unauthorized or not enough rights")
    )
)]
pub async fn list_users(
    Extension(identity): Extension<ResolvedIdentity>,
    State(state): State<AppState>,
    query: Result<Query<ListUsersQuery>, QueryRejection>,
) -> AppResult<Response> {
    AccessControl::authorize(&identity, &access::LIST_USERS)?;
    let Query(query) = query.map_err(|e| AppError::validation(e.body_text()))?;

    let page = state.users.get_users(query.page()?, &query.filters()).await?;

    Ok((
        [(PAGES_HEADER, page.pages.to_string())],
        Json(UsersResponse { data: page.users }),
    )
        .into_response())
}

/// Register a staff member
#[utoipa::path(
    post,
    path = "/users/staff",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = StaffRequest,
    responses(
        (status = 201, description = "Staff member created", body = IdResponse),
        (status = 400, description = "Validation error, unknown role or email already taken"),
        (status = 401, description = "Unauthorized or not enough rights")
    )
)]
pub async fn create_staff(
    Extension(identity): Extension<ResolvedIdentity>,
    State(state): State<AppState>,
    payload: Result<Json<StaffRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<IdResponse>)> {
    AccessControl::authorize(&identity, &access::CREATE_STAFF)?;
    let payload = validated(payload)?;

    let id = state
        .users
        .create_staff(&payload.email, &payload.role, &payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

/// Change a password
#[utoipa::path(
    put,
    path = "/users/",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = UpdateUserRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Wrong email or password, or not enough rights")
    )
)]
pub async fn update_user(
    Extension(identity): Extension<ResolvedIdentity>,
    State(state): State<AppState>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> AppResult<StatusCode> {
    AccessControl::authorize(&identity, &access::UPDATE_USER)?;
    let payload = validated(payload)?;

    state
        .users
        .update_user(&payload.email, &payload.old_password, &payload.new_password)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Soft delete a user
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deactivated", body = IdResponse),
        (status = 400, description = "Invalid id"),
        (status = 401, description = "Unauthorized or not enough rights"),
        (status = 404, description = "User not found or already deleted")
    )
)]
pub async fn delete_user(
    Extension(identity): Extension<ResolvedIdentity>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<IdResponse>> {
    AccessControl::authorize(&identity, &access::DELETE_USER)?;
    let id = parse_id(&id)?;

    let id = state.users.delete_user(id).await?;
    Ok(Json(IdResponse { id }))
}
