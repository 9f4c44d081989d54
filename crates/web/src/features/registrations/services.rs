use sqlx::PgPool;
use storage::{
    dto::registration::{FeedbackRequest, RecordResultRequest, TournamentRegistrationEntry},
    models::{Registration, RegistrationStatus, Tournament},
    repository::{registration::RegistrationRepository, tournament::TournamentRepository},
};
use uuid::Uuid;

use crate::error::{WebError, WebResult};

/// Register the member for a tournament. The repository runs the capacity
/// policy and the count resync inside one transaction; a policy rejection
/// surfaces as a domain error with the reason attached.
pub async fn register(
    pool: &PgPool,
    tournament_id: Uuid,
    user_id: Uuid,
) -> WebResult<(Registration, Tournament)> {
    let repo = RegistrationRepository::new(pool);
    Ok(repo.register(tournament_id, user_id).await?)
}

/// Cancel the member's registration, promoting from the waitlist if possible
pub async fn unregister(
    pool: &PgPool,
    tournament_id: Uuid,
    user_id: Uuid,
) -> WebResult<(Registration, Tournament)> {
    let repo = RegistrationRepository::new(pool);
    Ok(repo.unregister(tournament_id, user_id).await?)
}

/// A tournament's registrations with member context
pub async fn list_registrations(
    pool: &PgPool,
    tournament_id: Uuid,
) -> WebResult<Vec<TournamentRegistrationEntry>> {
    let tournaments = TournamentRepository::new(pool);
    let tournament = tournaments.find_by_id(tournament_id).await?;

    let repo = RegistrationRepository::new(pool);
    Ok(repo.list_for_tournament(tournament.tournament_id).await?)
}

/// Organizer-driven status change on a specific registration
pub async fn update_status(
    pool: &PgPool,
    tournament_id: Uuid,
    registration_id: Uuid,
    status: RegistrationStatus,
) -> WebResult<Registration> {
    let repo = RegistrationRepository::new(pool);
    let registration = find_in_tournament(&repo, tournament_id, registration_id).await?;

    Ok(repo
        .update_status(registration.registration_id, status)
        .await?)
}

/// Record a participant's final result
pub async fn record_result(
    pool: &PgPool,
    tournament_id: Uuid,
    registration_id: Uuid,
    req: &RecordResultRequest,
) -> WebResult<Registration> {
    let repo = RegistrationRepository::new(pool);
    let registration = find_in_tournament(&repo, tournament_id, registration_id).await?;

    Ok(repo.record_result(registration.registration_id, req).await?)
}

/// Check a participant in at the venue
pub async fn check_in(
    pool: &PgPool,
    tournament_id: Uuid,
    registration_id: Uuid,
) -> WebResult<Registration> {
    let repo = RegistrationRepository::new(pool);
    let registration = find_in_tournament(&repo, tournament_id, registration_id).await?;

    Ok(repo.check_in(registration.registration_id).await?)
}

/// Attach the member's feedback to their own registration
pub async fn leave_feedback(
    pool: &PgPool,
    tournament_id: Uuid,
    user_id: Uuid,
    req: &FeedbackRequest,
) -> WebResult<Registration> {
    let repo = RegistrationRepository::new(pool);
    Ok(repo
        .leave_feedback(tournament_id, user_id, req.rating, req.comment.as_deref())
        .await?)
}

/// Guards the nested route: the registration must belong to the tournament in
/// the path, otherwise the combination does not exist.
async fn find_in_tournament(
    repo: &RegistrationRepository<'_>,
    tournament_id: Uuid,
    registration_id: Uuid,
) -> WebResult<Registration> {
    let registration = repo.find_by_id(registration_id).await?;

    if registration.tournament_id != tournament_id {
        return Err(WebError::NotFound);
    }

    Ok(registration)
}
