use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::registration::UserRegistrationEntry,
    dto::stats::GeneralStatsResponse,
    dto::user::{
        UpdateUserAdminRequest, UpdateUserStatusRequest, UserDetailResponse, UserListParams,
        UserResponse, UserStatsResponse,
    },
};
use uuid::Uuid;

use crate::error::WebError;
use crate::middleware::auth::CurrentUser;

use super::services;

#[utoipa::path(
    get,
    path = "/api/users/me/registrations",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The member's registrations", body = Vec<UserRegistrationEntry>),
        (status = 401, description = "Unauthenticated")
    ),
    tag = "users"
)]
pub async fn my_registrations(
    State(db): State<Database>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Response, WebError> {
    let registrations = services::my_registrations(db.pool(), current.0.user_id).await?;

    Ok(Json(registrations).into_response())
}

#[utoipa::path(
    get,
    path = "/api/users/me/stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The member's activity summary", body = UserStatsResponse),
        (status = 401, description = "Unauthenticated")
    ),
    tag = "users"
)]
pub async fn my_stats(
    State(db): State<Database>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Response, WebError> {
    let stats = services::my_stats(db.pool(), &current.0).await?;

    Ok(Json(stats).into_response())
}

#[utoipa::path(
    get,
    path = "/api/users",
    params(UserListParams),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Paged list of accounts"),
        (status = 400, description = "Bad paging parameters"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Not an administrator")
    ),
    tag = "users"
)]
pub async fn list_users(
    State(db): State<Database>,
    Query(params): Query<UserListParams>,
) -> Result<Response, WebError> {
    let page = services::list_users(db.pool(), &params).await?;

    Ok(Json(page).into_response())
}

#[utoipa::path(
    get,
    path = "/api/users/stats/general",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Admin-wide counters", body = GeneralStatsResponse),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Not an administrator")
    ),
    tag = "users"
)]
pub async fn general_stats(State(db): State<Database>) -> Result<Response, WebError> {
    let stats = services::general_stats(db.pool()).await?;

    Ok(Json(stats).into_response())
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Account details", body = UserDetailResponse),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Not an administrator"),
        (status = 404, description = "User not found")
    ),
    tag = "users"
)]
pub async fn get_user(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let detail = services::get_user(db.pool(), id).await?;

    Ok(Json(detail).into_response())
}

#[utoipa::path(
    put,
    path = "/api/users/{id}/status",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = UpdateUserStatusRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Account status updated", body = UserResponse),
        (status = 400, description = "Admin accounts cannot be deactivated"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Not an administrator"),
        (status = 404, description = "User not found")
    ),
    tag = "users"
)]
pub async fn update_user_status(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserStatusRequest>,
) -> Result<Response, WebError> {
    let user = services::set_user_status(db.pool(), id, req.is_active).await?;

    Ok(Json(UserResponse::from(user)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/users/{id}/admin",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = UpdateUserAdminRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Administrator rights updated", body = UserResponse),
        (status = 400, description = "Cannot edit your own rights"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Not an administrator"),
        (status = 404, description = "User not found")
    ),
    tag = "users"
)]
pub async fn update_user_admin(
    State(db): State<Database>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserAdminRequest>,
) -> Result<Response, WebError> {
    let user =
        services::set_user_admin(db.pool(), current.0.user_id, id, req.is_admin).await?;

    Ok(Json(UserResponse::from(user)).into_response())
}
