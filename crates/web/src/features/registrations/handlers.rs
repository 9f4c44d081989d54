use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::registration::{
        FeedbackRequest, RecordResultRequest, RegisterResponse, RegistrationResponse,
        TournamentRegistrationEntry, UpdateRegistrationStatusRequest,
    },
    dto::tournament::TournamentSummary,
    dto::user::UserSummary,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::CurrentUser;

use super::services;

#[utoipa::path(
    post,
    path = "/api/tournaments/{id}/register",
    params(
        ("id" = Uuid, Path, description = "Tournament ID")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Registered successfully", body = RegisterResponse),
        (status = 400, description = "Rejected by the capacity policy"),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Tournament not found")
    ),
    tag = "registrations"
)]
pub async fn register_for_tournament(
    State(db): State<Database>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let (registration, tournament) =
        services::register(db.pool(), id, current.0.user_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Registration successful".to_string(),
            registration: RegistrationResponse::from(registration),
            tournament: TournamentSummary::from(tournament),
            user: UserSummary::from(current.0),
        }),
    )
        .into_response())
}

#[utoipa::path(
    delete,
    path = "/api/tournaments/{id}/register",
    params(
        ("id" = Uuid, Path, description = "Tournament ID")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Unregistered successfully", body = RegisterResponse),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "No registration found for this tournament")
    ),
    tag = "registrations"
)]
pub async fn unregister_from_tournament(
    State(db): State<Database>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let (registration, tournament) =
        services::unregister(db.pool(), id, current.0.user_id).await?;

    Ok(Json(RegisterResponse {
        message: "Unregistered successfully".to_string(),
        registration: RegistrationResponse::from(registration),
        tournament: TournamentSummary::from(tournament),
        user: UserSummary::from(current.0),
    })
    .into_response())
}

#[utoipa::path(
    get,
    path = "/api/tournaments/{id}/registrations",
    params(
        ("id" = Uuid, Path, description = "Tournament ID")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The tournament's registrations", body = Vec<TournamentRegistrationEntry>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Not an administrator"),
        (status = 404, description = "Tournament not found")
    ),
    tag = "registrations"
)]
pub async fn list_tournament_registrations(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let registrations = services::list_registrations(db.pool(), id).await?;

    Ok(Json(registrations).into_response())
}

#[utoipa::path(
    put,
    path = "/api/tournaments/{id}/registrations/{registration_id}/status",
    params(
        ("id" = Uuid, Path, description = "Tournament ID"),
        ("registration_id" = Uuid, Path, description = "Registration ID")
    ),
    request_body = UpdateRegistrationStatusRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Status updated", body = RegistrationResponse),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Not an administrator"),
        (status = 404, description = "Registration not found"),
        (status = 409, description = "Would duplicate an active registration")
    ),
    tag = "registrations"
)]
pub async fn update_registration_status(
    State(db): State<Database>,
    Path((id, registration_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateRegistrationStatusRequest>,
) -> Result<Response, WebError> {
    let registration =
        services::update_status(db.pool(), id, registration_id, req.status).await?;

    Ok(Json(RegistrationResponse::from(registration)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/tournaments/{id}/registrations/{registration_id}/result",
    params(
        ("id" = Uuid, Path, description = "Tournament ID"),
        ("registration_id" = Uuid, Path, description = "Registration ID")
    ),
    request_body = RecordResultRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Result recorded", body = RegistrationResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Not an administrator"),
        (status = 404, description = "Registration not found")
    ),
    tag = "registrations"
)]
pub async fn record_registration_result(
    State(db): State<Database>,
    Path((id, registration_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<RecordResultRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let registration = services::record_result(db.pool(), id, registration_id, &req).await?;

    Ok(Json(RegistrationResponse::from(registration)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/tournaments/{id}/registrations/{registration_id}/check-in",
    params(
        ("id" = Uuid, Path, description = "Tournament ID"),
        ("registration_id" = Uuid, Path, description = "Registration ID")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Participant checked in", body = RegistrationResponse),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Not an administrator"),
        (status = 404, description = "Registration not found")
    ),
    tag = "registrations"
)]
pub async fn check_in_registration(
    State(db): State<Database>,
    Path((id, registration_id)): Path<(Uuid, Uuid)>,
) -> Result<Response, WebError> {
    let registration = services::check_in(db.pool(), id, registration_id).await?;

    Ok(Json(RegistrationResponse::from(registration)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/tournaments/{id}/feedback",
    params(
        ("id" = Uuid, Path, description = "Tournament ID")
    ),
    request_body = FeedbackRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Feedback saved", body = RegistrationResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "No registration found for this tournament")
    ),
    tag = "registrations"
)]
pub async fn leave_feedback(
    State(db): State<Database>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<FeedbackRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let registration =
        services::leave_feedback(db.pool(), id, current.0.user_id, &req).await?;

    Ok(Json(RegistrationResponse::from(registration)).into_response())
}
