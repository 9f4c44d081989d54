use chrono::Utc;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::dto::registration::{
    RecordResultRequest, RegistrationResponse, TournamentRegistrationEntry, UserRegistrationEntry,
};
use crate::dto::stats::RegistrationCounts;
use crate::dto::tournament::TournamentSummary;
use crate::dto::user::UserSummary;
use crate::error::{Result, StorageError};
use crate::models::{Registration, RegistrationStatus, Tournament};
use crate::services::capacity::{self, RegistrationDenial};

const REGISTRATION_COLUMNS: &str = "registration_id, user_id, tournament_id, registered_at, \
     status, notes, checked_in, checked_in_at, final_position, points, matches_won, matches_lost, \
     matches_drawn, prize, rating, feedback_comment, created_at, updated_at";

const TOURNAMENT_COLUMNS: &str = "tournament_id, name, description, game, starts_at, max_players, \
     current_players, status, created_by, registration_deadline, entry_fee, is_public, tags, \
     created_at, updated_at";

#[derive(sqlx::FromRow)]
struct RegistrationWithUserRow {
    #[sqlx(flatten)]
    registration: Registration,
    user_name: String,
    user_email: String,
}

#[derive(sqlx::FromRow)]
struct RegistrationWithTournamentRow {
    #[sqlx(flatten)]
    registration: Registration,
    tournament_name: String,
    tournament_game: String,
    tournament_starts_at: chrono::DateTime<Utc>,
    tournament_max_players: i32,
    tournament_current_players: i32,
}

/// Repository for Registration database operations. Register and unregister
/// run inside a transaction holding the tournament row lock, so requests for
/// the same tournament serialize at the storage layer.
pub struct RegistrationRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RegistrationRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Register `user_id` for a tournament. Runs the capacity policy against
    /// the locked tournament row; on admit, inserts a confirmed registration
    /// and resynchronizes the player count. Either both writes land or none.
    pub async fn register(
        &self,
        tournament_id: Uuid,
        user_id: Uuid,
    ) -> Result<(Registration, Tournament)> {
        let mut tx = self.pool.begin().await?;

        let tournament = Self::lock_tournament(&mut tx, tournament_id).await?;
        let existing = Self::find_active_in(&mut tx, user_id, tournament_id).await?;

        let now = Utc::now();
        capacity::can_register(&tournament, existing.as_ref(), now)?;

        let registration = sqlx::query_as::<_, Registration>(&format!(
            "INSERT INTO registrations (user_id, tournament_id, registered_at, status) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {REGISTRATION_COLUMNS}"
        ))
        .bind(user_id)
        .bind(tournament_id)
        .bind(now)
        .bind(RegistrationStatus::Confirmed)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            // The partial unique index backstops the policy check.
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.code().as_deref() == Some("23505")
            {
                return StorageError::RegistrationDenied(RegistrationDenial::AlreadyRegistered);
            }
            StorageError::from(e)
        })?;

        let tournament = Self::sync_player_count(&mut tx, tournament_id).await?;

        tx.commit().await?;

        Ok((registration, tournament))
    }

    /// Cancel the caller's active registration. Frees the slot, promotes the
    /// longest-waiting waitlisted entry (if any) and resynchronizes the count.
    pub async fn unregister(
        &self,
        tournament_id: Uuid,
        user_id: Uuid,
    ) -> Result<(Registration, Tournament)> {
        let mut tx = self.pool.begin().await?;

        Self::lock_tournament(&mut tx, tournament_id).await?;

        let registration = sqlx::query_as::<_, Registration>(&format!(
            "UPDATE registrations SET status = $3, updated_at = now() \
             WHERE user_id = $1 AND tournament_id = $2 AND status <> $3 \
             RETURNING {REGISTRATION_COLUMNS}"
        ))
        .bind(user_id)
        .bind(tournament_id)
        .bind(RegistrationStatus::Cancelled)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StorageError::NotFound)?;

        Self::promote_from_waitlist(&mut tx, tournament_id).await?;
        let tournament = Self::sync_player_count(&mut tx, tournament_id).await?;

        tx.commit().await?;

        Ok((registration, tournament))
    }

    /// The caller's active (non-cancelled) registration for a tournament
    pub async fn find_active(
        &self,
        user_id: Uuid,
        tournament_id: Uuid,
    ) -> Result<Option<Registration>> {
        let mut conn = self.pool.acquire().await?;
        Self::find_active_in(&mut conn, user_id, tournament_id).await
    }

    pub async fn find_by_id(&self, registration_id: Uuid) -> Result<Registration> {
        let registration = sqlx::query_as::<_, Registration>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM registrations WHERE registration_id = $1"
        ))
        .bind(registration_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(registration)
    }

    /// A tournament's registrations with user context, earliest first
    pub async fn list_for_tournament(
        &self,
        tournament_id: Uuid,
    ) -> Result<Vec<TournamentRegistrationEntry>> {
        let rows = sqlx::query_as::<_, RegistrationWithUserRow>(
            "SELECT r.*, u.name AS user_name, u.email AS user_email \
             FROM registrations r \
             JOIN users u ON u.user_id = r.user_id \
             WHERE r.tournament_id = $1 \
             ORDER BY r.registered_at ASC",
        )
        .bind(tournament_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| TournamentRegistrationEntry {
                user: UserSummary {
                    user_id: row.registration.user_id,
                    name: row.user_name,
                    email: row.user_email,
                },
                registration: RegistrationResponse::from(row.registration),
            })
            .collect())
    }

    /// A member's registrations with tournament context, newest first
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<UserRegistrationEntry>> {
        let rows = sqlx::query_as::<_, RegistrationWithTournamentRow>(
            "SELECT r.*, t.name AS tournament_name, t.game AS tournament_game, \
                    t.starts_at AS tournament_starts_at, t.max_players AS tournament_max_players, \
                    t.current_players AS tournament_current_players \
             FROM registrations r \
             JOIN tournaments t ON t.tournament_id = r.tournament_id \
             WHERE r.user_id = $1 \
             ORDER BY r.registered_at DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| UserRegistrationEntry {
                tournament: TournamentSummary {
                    tournament_id: row.registration.tournament_id,
                    name: row.tournament_name,
                    game: row.tournament_game,
                    starts_at: row.tournament_starts_at,
                    max_players: row.tournament_max_players,
                    current_players: row.tournament_current_players,
                },
                registration: RegistrationResponse::from(row.registration),
            })
            .collect())
    }

    /// Organizer-driven status change (confirm, waitlist, mark no-show, ...).
    /// Always followed by a count resync since any change may free or take a
    /// slot.
    pub async fn update_status(
        &self,
        registration_id: Uuid,
        status: RegistrationStatus,
    ) -> Result<Registration> {
        let mut tx = self.pool.begin().await?;

        let registration = sqlx::query_as::<_, Registration>(&format!(
            "UPDATE registrations SET status = $2, updated_at = now() \
             WHERE registration_id = $1 \
             RETURNING {REGISTRATION_COLUMNS}"
        ))
        .bind(registration_id)
        .bind(status)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.code().as_deref() == Some("23505")
            {
                return StorageError::ConstraintViolation(
                    "User already has an active registration for this tournament".to_string(),
                );
            }
            StorageError::from(e)
        })?
        .ok_or(StorageError::NotFound)?;

        Self::sync_player_count(&mut tx, registration.tournament_id).await?;

        tx.commit().await?;

        Ok(registration)
    }

    /// Record a participant's final result
    pub async fn record_result(
        &self,
        registration_id: Uuid,
        req: &RecordResultRequest,
    ) -> Result<Registration> {
        let registration = sqlx::query_as::<_, Registration>(&format!(
            "UPDATE registrations SET final_position = $2, points = $3, matches_won = $4, \
                 matches_lost = $5, matches_drawn = $6, prize = $7, updated_at = now() \
             WHERE registration_id = $1 \
             RETURNING {REGISTRATION_COLUMNS}"
        ))
        .bind(registration_id)
        .bind(req.final_position)
        .bind(req.points)
        .bind(req.matches_won)
        .bind(req.matches_lost)
        .bind(req.matches_drawn)
        .bind(&req.prize)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(registration)
    }

    /// Check a participant in at the venue
    pub async fn check_in(&self, registration_id: Uuid) -> Result<Registration> {
        let registration = sqlx::query_as::<_, Registration>(&format!(
            "UPDATE registrations SET checked_in = TRUE, checked_in_at = now(), \
                 updated_at = now() \
             WHERE registration_id = $1 \
             RETURNING {REGISTRATION_COLUMNS}"
        ))
        .bind(registration_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(registration)
    }

    /// Attach the member's feedback to their registration for a tournament
    pub async fn leave_feedback(
        &self,
        tournament_id: Uuid,
        user_id: Uuid,
        rating: i16,
        comment: Option<&str>,
    ) -> Result<Registration> {
        let registration = sqlx::query_as::<_, Registration>(&format!(
            "UPDATE registrations SET rating = $3, feedback_comment = $4, updated_at = now() \
             WHERE user_id = $1 AND tournament_id = $2 AND status <> $5 \
             RETURNING {REGISTRATION_COLUMNS}"
        ))
        .bind(user_id)
        .bind(tournament_id)
        .bind(rating)
        .bind(comment)
        .bind(RegistrationStatus::Cancelled)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(registration)
    }

    /// Number of active registrations for a tournament
    pub async fn count_active(&self, tournament_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM registrations WHERE tournament_id = $1 AND status <> $2",
        )
        .bind(tournament_id)
        .bind(RegistrationStatus::Cancelled)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Registration counters for the admin overview
    pub async fn stats(&self) -> Result<RegistrationCounts> {
        let (total, active, cancelled): (i64, i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), \
                    COUNT(*) FILTER (WHERE status IN ($1, $2)), \
                    COUNT(*) FILTER (WHERE status = $3) \
             FROM registrations",
        )
        .bind(RegistrationStatus::Pending)
        .bind(RegistrationStatus::Confirmed)
        .bind(RegistrationStatus::Cancelled)
        .fetch_one(self.pool)
        .await?;

        let cancellation_rate = if total > 0 {
            ((cancelled as f64 / total as f64) * 10_000.0).round() / 100.0
        } else {
            0.0
        };

        Ok(RegistrationCounts {
            total,
            active,
            cancelled,
            cancellation_rate,
        })
    }

    /// (tournaments joined, upcoming confirmed tournaments) for a member
    pub async fn user_activity(
        &self,
        user_id: Uuid,
        now: chrono::DateTime<Utc>,
    ) -> Result<(i64, i64)> {
        let joined: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM registrations WHERE user_id = $1 AND status IN ($2, $3)",
        )
        .bind(user_id)
        .bind(RegistrationStatus::Confirmed)
        .bind(RegistrationStatus::Completed)
        .fetch_one(self.pool)
        .await?;

        let upcoming: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM registrations r \
             JOIN tournaments t ON t.tournament_id = r.tournament_id \
             WHERE r.user_id = $1 AND r.status = $2 AND t.starts_at > $3",
        )
        .bind(user_id)
        .bind(RegistrationStatus::Confirmed)
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        Ok((joined, upcoming))
    }

    async fn lock_tournament(conn: &mut PgConnection, tournament_id: Uuid) -> Result<Tournament> {
        let tournament = sqlx::query_as::<_, Tournament>(&format!(
            "SELECT {TOURNAMENT_COLUMNS} FROM tournaments WHERE tournament_id = $1 FOR UPDATE"
        ))
        .bind(tournament_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(tournament)
    }

    async fn find_active_in(
        conn: &mut PgConnection,
        user_id: Uuid,
        tournament_id: Uuid,
    ) -> Result<Option<Registration>> {
        let registration = sqlx::query_as::<_, Registration>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM registrations \
             WHERE user_id = $1 AND tournament_id = $2 AND status <> $3"
        ))
        .bind(user_id)
        .bind(tournament_id)
        .bind(RegistrationStatus::Cancelled)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(registration)
    }

    /// Flip the FIFO-earliest waitlisted registration to confirmed. The
    /// capacity policy is deliberately not re-run: a waitlisted row only
    /// exists because the tournament was full when it was created.
    async fn promote_from_waitlist(conn: &mut PgConnection, tournament_id: Uuid) -> Result<()> {
        sqlx::query(
            "UPDATE registrations SET status = $2, updated_at = now() \
             WHERE registration_id = ( \
                 SELECT registration_id FROM registrations \
                 WHERE tournament_id = $1 AND status = $3 \
                 ORDER BY registered_at ASC \
                 LIMIT 1 \
             )",
        )
        .bind(tournament_id)
        .bind(RegistrationStatus::Confirmed)
        .bind(RegistrationStatus::Waitlisted)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Recompute `current_players` from the registrations table and persist
    /// it. Idempotent; safe to re-run at any point.
    async fn sync_player_count(conn: &mut PgConnection, tournament_id: Uuid) -> Result<Tournament> {
        let tournament = sqlx::query_as::<_, Tournament>(&format!(
            "UPDATE tournaments \
             SET current_players = ( \
                 SELECT COUNT(*)::INT FROM registrations \
                 WHERE tournament_id = $1 AND status <> $2 \
             ), updated_at = now() \
             WHERE tournament_id = $1 \
             RETURNING {TOURNAMENT_COLUMNS}"
        ))
        .bind(tournament_id)
        .bind(RegistrationStatus::Cancelled)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(tournament)
    }
}
