use chrono::{DateTime, Duration, TimeZone, Utc};
use sqlx::PgPool;
use storage::{
    dto::stats::TournamentStatsResponse,
    dto::tournament::{CreateTournamentRequest, UpdateTournamentRequest},
    models::Tournament,
    repository::{registration::RegistrationRepository, tournament::TournamentRepository},
};
use uuid::Uuid;

use crate::error::{WebError, WebResult};

/// List all tournaments
pub async fn list_tournaments(pool: &PgPool) -> WebResult<Vec<Tournament>> {
    let repo = TournamentRepository::new(pool);
    Ok(repo.list().await?)
}

/// Tournaments starting within the next seven days
pub async fn weekly_tournaments(pool: &PgPool) -> WebResult<Vec<Tournament>> {
    let repo = TournamentRepository::new(pool);
    let now = Utc::now();
    Ok(repo.list_between(now, now + Duration::days(7)).await?)
}

/// Tournaments starting within the next thirty days
pub async fn monthly_tournaments(pool: &PgPool) -> WebResult<Vec<Tournament>> {
    let repo = TournamentRepository::new(pool);
    let now = Utc::now();
    Ok(repo.list_between(now, now + Duration::days(30)).await?)
}

/// Tournaments scheduled in the given calendar month
pub async fn calendar_tournaments(
    pool: &PgPool,
    year: i32,
    month: u32,
) -> WebResult<Vec<Tournament>> {
    let (from, to) = month_bounds(year, month)
        .ok_or_else(|| WebError::BadRequest("Invalid calendar month".to_string()))?;

    let repo = TournamentRepository::new(pool);
    Ok(repo.list_between(from, to).await?)
}

/// Get tournament by ID
pub async fn get_tournament(pool: &PgPool, id: Uuid) -> WebResult<Tournament> {
    let repo = TournamentRepository::new(pool);
    Ok(repo.find_by_id(id).await?)
}

/// Publish a new tournament
pub async fn create_tournament(
    pool: &PgPool,
    req: &CreateTournamentRequest,
    created_by: Uuid,
) -> WebResult<Tournament> {
    let repo = TournamentRepository::new(pool);
    Ok(repo.create(req, created_by).await?)
}

/// Edit a tournament; status changes must follow the lifecycle state machine
pub async fn update_tournament(
    pool: &PgPool,
    id: Uuid,
    req: &UpdateTournamentRequest,
) -> WebResult<Tournament> {
    let repo = TournamentRepository::new(pool);
    let existing = repo.find_by_id(id).await?;

    if let Some(next) = req.status
        && !existing.status.can_transition_to(next)
    {
        return Err(WebError::BadRequest(format!(
            "Cannot change tournament status from {} to {}",
            existing.status.as_str(),
            next.as_str()
        )));
    }

    Ok(repo.update(id, &existing, req).await?)
}

/// Delete a tournament, refused while anyone is still actively registered
pub async fn delete_tournament(pool: &PgPool, id: Uuid) -> WebResult<()> {
    let tournaments = TournamentRepository::new(pool);
    let tournament = tournaments.find_by_id(id).await?;

    let registrations = RegistrationRepository::new(pool);
    let active = registrations
        .count_active(tournament.tournament_id)
        .await?;
    if active > 0 {
        return Err(WebError::BadRequest(
            "Cannot delete a tournament with active registrations".to_string(),
        ));
    }

    Ok(tournaments.delete(tournament.tournament_id).await?)
}

/// Organizer dashboard counters
pub async fn tournament_stats(pool: &PgPool) -> WebResult<TournamentStatsResponse> {
    let repo = TournamentRepository::new(pool);
    Ok(repo.stats(Utc::now()).await?)
}

/// [from, to) bounds of a calendar month, None for an impossible month
fn month_bounds(year: i32, month: u32) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = chrono::NaiveDate::from_ymd_opt(year, month, 1)?;
    let end = if month == 12 {
        chrono::NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        chrono::NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };

    Some((
        Utc.from_utc_datetime(&start.and_hms_opt(0, 0, 0)?),
        Utc.from_utc_datetime(&end.and_hms_opt(0, 0, 0)?),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_bounds_cover_the_whole_month() {
        let (from, to) = month_bounds(2026, 2).unwrap();
        assert_eq!(from.to_rfc3339(), "2026-02-01T00:00:00+00:00");
        assert_eq!(to.to_rfc3339(), "2026-03-01T00:00:00+00:00");
    }

    #[test]
    fn december_rolls_into_the_next_year() {
        let (from, to) = month_bounds(2026, 12).unwrap();
        assert_eq!(from.to_rfc3339(), "2026-12-01T00:00:00+00:00");
        assert_eq!(to.to_rfc3339(), "2027-01-01T00:00:00+00:00");
    }

    #[test]
    fn impossible_months_are_rejected() {
        assert!(month_bounds(2026, 0).is_none());
        assert!(month_bounds(2026, 13).is_none());
    }
}
