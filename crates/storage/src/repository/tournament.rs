use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::stats::TournamentStatsResponse;
use crate::dto::tournament::{CreateTournamentRequest, UpdateTournamentRequest};
use crate::error::{Result, StorageError};
use crate::models::{Tournament, TournamentStatus};

const TOURNAMENT_COLUMNS: &str = "tournament_id, name, description, game, starts_at, max_players, \
     current_players, status, created_by, registration_deadline, entry_fee, is_public, tags, \
     created_at, updated_at";

/// Repository for Tournament database operations
pub struct TournamentRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TournamentRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all tournaments, soonest first. Every list read doubles as a
    /// reconciliation pass over the denormalized player counts.
    pub async fn list(&self) -> Result<Vec<Tournament>> {
        self.reconcile_counts().await?;

        let tournaments = sqlx::query_as::<_, Tournament>(&format!(
            "SELECT {TOURNAMENT_COLUMNS} FROM tournaments ORDER BY starts_at ASC, created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(tournaments)
    }

    /// List tournaments starting within [from, to)
    pub async fn list_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Tournament>> {
        self.reconcile_counts().await?;

        let tournaments = sqlx::query_as::<_, Tournament>(&format!(
            "SELECT {TOURNAMENT_COLUMNS} FROM tournaments \
             WHERE starts_at >= $1 AND starts_at < $2 ORDER BY starts_at ASC"
        ))
        .bind(from)
        .bind(to)
        .fetch_all(self.pool)
        .await?;

        Ok(tournaments)
    }

    /// Get a tournament by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Tournament> {
        let tournament = sqlx::query_as::<_, Tournament>(&format!(
            "SELECT {TOURNAMENT_COLUMNS} FROM tournaments WHERE tournament_id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(tournament)
    }

    /// Create a new tournament on behalf of `created_by`
    pub async fn create(
        &self,
        req: &CreateTournamentRequest,
        created_by: Uuid,
    ) -> Result<Tournament> {
        let tournament = sqlx::query_as::<_, Tournament>(&format!(
            "INSERT INTO tournaments (name, description, game, starts_at, max_players, status, \
                 created_by, registration_deadline, entry_fee, is_public, tags) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {TOURNAMENT_COLUMNS}"
        ))
        .bind(&req.name)
        .bind(&req.description)
        .bind(&req.game)
        .bind(req.starts_at)
        .bind(req.max_players)
        .bind(req.status)
        .bind(created_by)
        .bind(req.registration_deadline)
        .bind(req.entry_fee)
        .bind(req.is_public)
        .bind(&req.tags)
        .fetch_one(self.pool)
        .await?;

        Ok(tournament)
    }

    /// Update an existing tournament, keeping any field the request leaves out
    pub async fn update(
        &self,
        id: Uuid,
        existing: &Tournament,
        req: &UpdateTournamentRequest,
    ) -> Result<Tournament> {
        let tournament = sqlx::query_as::<_, Tournament>(&format!(
            "UPDATE tournaments SET \
                 name = $2, description = $3, game = $4, starts_at = $5, max_players = $6, \
                 status = $7, registration_deadline = $8, entry_fee = $9, is_public = $10, \
                 tags = $11, updated_at = now() \
             WHERE tournament_id = $1 \
             RETURNING {TOURNAMENT_COLUMNS}"
        ))
        .bind(id)
        .bind(req.name.as_ref().unwrap_or(&existing.name))
        .bind(req.description.as_ref().or(existing.description.as_ref()))
        .bind(req.game.as_ref().unwrap_or(&existing.game))
        .bind(req.starts_at.unwrap_or(existing.starts_at))
        .bind(req.max_players.unwrap_or(existing.max_players))
        .bind(req.status.unwrap_or(existing.status))
        .bind(req.registration_deadline.or(existing.registration_deadline))
        .bind(req.entry_fee.or(existing.entry_fee))
        .bind(req.is_public.unwrap_or(existing.is_public))
        .bind(req.tags.as_ref().unwrap_or(&existing.tags))
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(tournament)
    }

    /// Delete a tournament by ID. Callers are expected to have verified that
    /// no active registrations remain; cancelled history rows cascade away.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM tournaments WHERE tournament_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    /// Repair drift between `current_players` and the actual number of active
    /// registrations. Idempotent; touches only rows that actually drifted.
    pub async fn reconcile_counts(&self) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE tournaments t \
             SET current_players = sub.cnt::INT \
             FROM ( \
                 SELECT t2.tournament_id, COUNT(r.registration_id) AS cnt \
                 FROM tournaments t2 \
                 LEFT JOIN registrations r \
                     ON r.tournament_id = t2.tournament_id AND r.status <> 'cancelled' \
                 GROUP BY t2.tournament_id \
             ) sub \
             WHERE sub.tournament_id = t.tournament_id AND t.current_players <> sub.cnt",
        )
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Organizer dashboard counters
    pub async fn stats(&self, now: DateTime<Utc>) -> Result<TournamentStatsResponse> {
        let (total, upcoming): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE starts_at > $1) FROM tournaments",
        )
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        let total_registrations: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM registrations")
                .fetch_one(self.pool)
                .await?;

        let average_participants: f64 = sqlx::query_scalar(
            "SELECT COALESCE(AVG(sub.cnt), 0)::FLOAT8 \
             FROM ( \
                 SELECT COUNT(r.registration_id) AS cnt \
                 FROM tournaments t \
                 LEFT JOIN registrations r \
                     ON r.tournament_id = t.tournament_id AND r.status <> 'cancelled' \
                 GROUP BY t.tournament_id \
             ) sub",
        )
        .fetch_one(self.pool)
        .await?;

        Ok(TournamentStatsResponse {
            total_tournaments: total,
            upcoming_tournaments: upcoming,
            past_tournaments: total - upcoming,
            total_registrations,
            average_participants: (average_participants * 10.0).round() / 10.0,
        })
    }

    /// Public site counters over tournaments
    pub async fn site_counts(&self, now: DateTime<Utc>) -> Result<(i64, i64, i64, i64)> {
        let counts: (i64, i64, i64, i64) = sqlx::query_as(
            "SELECT \
                 COUNT(*), \
                 COUNT(*) FILTER (WHERE starts_at >= $1 AND status NOT IN ($2, $3)), \
                 COUNT(*) FILTER (WHERE status = $3), \
                 COUNT(DISTINCT game) \
             FROM tournaments",
        )
        .bind(now)
        .bind(TournamentStatus::Cancelled)
        .bind(TournamentStatus::Completed)
        .fetch_one(self.pool)
        .await?;

        Ok(counts)
    }
}
