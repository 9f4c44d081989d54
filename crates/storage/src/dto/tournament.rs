use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{Tournament, TournamentStatus};

/// Request payload for publishing a new tournament
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateTournamentRequest {
    #[validate(length(
        min = 1,
        max = 200,
        message = "Name must be between 1 and 200 characters"
    ))]
    pub name: String,

    #[validate(length(max = 1000, message = "Description cannot exceed 1000 characters"))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Game must be between 1 and 100 characters"))]
    pub game: String,

    pub starts_at: DateTime<Utc>,

    #[validate(range(min = 2, max = 100, message = "Player capacity must be between 2 and 100"))]
    pub max_players: i32,

    #[serde(default = "default_status")]
    pub status: TournamentStatus,

    pub registration_deadline: Option<DateTime<Utc>>,

    pub entry_fee: Option<Decimal>,

    #[serde(default = "default_visibility")]
    pub is_public: bool,

    #[serde(default)]
    pub tags: Vec<String>,
}

/// Request payload for editing an existing tournament; absent fields are left
/// untouched
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateTournamentRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub game: Option<String>,

    pub starts_at: Option<DateTime<Utc>>,

    #[validate(range(min = 2, max = 100))]
    pub max_players: Option<i32>,

    pub status: Option<TournamentStatus>,

    pub registration_deadline: Option<DateTime<Utc>>,

    pub entry_fee: Option<Decimal>,

    pub is_public: Option<bool>,

    pub tags: Option<Vec<String>>,
}

/// Response containing tournament details
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TournamentResponse {
    pub tournament_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub game: String,
    pub starts_at: DateTime<Utc>,
    pub max_players: i32,
    pub current_players: i32,
    pub status: TournamentStatus,
    pub created_by: Uuid,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub entry_fee: Option<Decimal>,
    pub is_public: bool,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Trimmed tournament context attached to a registration for display
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TournamentSummary {
    pub tournament_id: Uuid,
    pub name: String,
    pub game: String,
    pub starts_at: DateTime<Utc>,
    pub max_players: i32,
    pub current_players: i32,
}

fn default_status() -> TournamentStatus {
    TournamentStatus::RegistrationOpen
}

fn default_visibility() -> bool {
    true
}

impl CreateTournamentRequest {
    /// Cross-field checks the derive cannot express
    pub fn validate_schedule(&self) -> Result<(), &'static str> {
        if let Some(deadline) = self.registration_deadline
            && deadline > self.starts_at
        {
            return Err("Registration deadline must not be after the tournament start");
        }

        if let Some(fee) = self.entry_fee
            && fee.is_sign_negative()
        {
            return Err("Entry fee cannot be negative");
        }

        Ok(())
    }
}

impl From<Tournament> for TournamentResponse {
    fn from(t: Tournament) -> Self {
        Self {
            tournament_id: t.tournament_id,
            name: t.name,
            description: t.description,
            game: t.game,
            starts_at: t.starts_at,
            max_players: t.max_players,
            current_players: t.current_players,
            status: t.status,
            created_by: t.created_by,
            registration_deadline: t.registration_deadline,
            entry_fee: t.entry_fee,
            is_public: t.is_public,
            tags: t.tags,
            created_at: t.created_at,
        }
    }
}

impl From<Tournament> for TournamentSummary {
    fn from(t: Tournament) -> Self {
        Self {
            tournament_id: t.tournament_id,
            name: t.name,
            game: t.game,
            starts_at: t.starts_at,
            max_players: t.max_players,
            current_players: t.current_players,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use rust_decimal::Decimal;

    use super::*;

    fn request() -> CreateTournamentRequest {
        CreateTournamentRequest {
            name: "Spring Cup".to_string(),
            description: None,
            game: "Chess".to_string(),
            starts_at: Utc::now() + Duration::days(14),
            max_players: 16,
            status: default_status(),
            registration_deadline: None,
            entry_fee: None,
            is_public: true,
            tags: vec![],
        }
    }

    #[test]
    fn default_status_is_open_for_registration() {
        let req: CreateTournamentRequest = serde_json::from_value(serde_json::json!({
            "name": "Spring Cup",
            "game": "Chess",
            "starts_at": "2030-04-01T18:00:00Z",
            "max_players": 16
        }))
        .unwrap();
        assert_eq!(req.status, TournamentStatus::RegistrationOpen);
        assert!(req.is_public);
        assert!(req.tags.is_empty());
    }

    #[test]
    fn capacity_bounds_are_enforced() {
        let mut req = request();
        req.max_players = 1;
        assert!(req.validate().is_err());
        req.max_players = 101;
        assert!(req.validate().is_err());
        req.max_players = 2;
        assert!(req.validate().is_ok());
    }

    #[test]
    fn deadline_after_start_is_rejected() {
        let mut req = request();
        req.registration_deadline = Some(req.starts_at + Duration::hours(1));
        assert!(req.validate_schedule().is_err());

        req.registration_deadline = Some(req.starts_at - Duration::hours(1));
        assert!(req.validate_schedule().is_ok());
    }

    #[test]
    fn negative_entry_fee_is_rejected() {
        let mut req = request();
        req.entry_fee = Some(Decimal::new(-500, 2));
        assert!(req.validate_schedule().is_err());
    }
}
