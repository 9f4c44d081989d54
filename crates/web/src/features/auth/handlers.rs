use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::auth::{
        AuthResponse, ChangePasswordRequest, LoginRequest, RegisterAccountRequest,
        UpdateProfileRequest,
    },
    dto::user::UserResponse,
};
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::{CurrentUser, JwtKeys};

use super::services;

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterAccountRequest,
    responses(
        (status = 201, description = "Account created successfully", body = AuthResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already in use")
    ),
    tag = "auth"
)]
pub async fn register_account(
    State(db): State<Database>,
    State(jwt): State<JwtKeys>,
    Json(req): Json<RegisterAccountRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let user = services::register_account(db.pool(), &req).await?;

    let token = jwt
        .create_token(user.user_id)
        .map_err(|e| WebError::InternalServerError(format!("Failed to issue token: {e}")))?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: UserResponse::from(user),
        }),
    )
        .into_response())
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in successfully", body = AuthResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Bad credentials or deactivated account")
    ),
    tag = "auth"
)]
pub async fn login(
    State(db): State<Database>,
    State(jwt): State<JwtKeys>,
    Json(req): Json<LoginRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let user = services::login(db.pool(), &req.email, &req.password).await?;

    let token = jwt
        .create_token(user.user_id)
        .map_err(|e| WebError::InternalServerError(format!("Failed to issue token: {e}")))?;

    Ok(Json(AuthResponse {
        token,
        user: UserResponse::from(user),
    })
    .into_response())
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The authenticated account", body = UserResponse),
        (status = 401, description = "Unauthenticated")
    ),
    tag = "auth"
)]
pub async fn me(Extension(current): Extension<CurrentUser>) -> Result<Response, WebError> {
    Ok(Json(UserResponse::from(current.0)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/auth/profile",
    request_body = UpdateProfileRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthenticated")
    ),
    tag = "auth"
)]
pub async fn update_profile(
    State(db): State<Database>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let user = services::update_profile(db.pool(), current.0.user_id, &req.name).await?;

    Ok(Json(UserResponse::from(user)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/auth/change-password",
    request_body = ChangePasswordRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Wrong current password")
    ),
    tag = "auth"
)]
pub async fn change_password(
    State(db): State<Database>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    services::change_password(db.pool(), &current.0, &req).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
