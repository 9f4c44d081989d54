use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::dto::tournament::TournamentSummary;
use crate::dto::user::UserSummary;
use crate::models::{Registration, RegistrationStatus};

/// Response containing registration details
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegistrationResponse {
    pub registration_id: Uuid,
    pub user_id: Uuid,
    pub tournament_id: Uuid,
    pub registered_at: DateTime<Utc>,
    pub status: RegistrationStatus,
    pub notes: Option<String>,
    pub checked_in: bool,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub final_position: Option<i32>,
    pub points: i32,
    pub matches_won: i32,
    pub matches_lost: i32,
    pub matches_drawn: i32,
    pub prize: Option<String>,
    pub rating: Option<i16>,
    pub feedback_comment: Option<String>,
}

/// Successful register/unregister envelope: the outcome message plus the
/// affected record with its tournament and member context
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub message: String,
    pub registration: RegistrationResponse,
    pub tournament: TournamentSummary,
    pub user: UserSummary,
}

/// A tournament's registration as the organizer sees it
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TournamentRegistrationEntry {
    #[serde(flatten)]
    pub registration: RegistrationResponse,
    pub user: UserSummary,
}

/// A member's registration with the tournament it belongs to
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserRegistrationEntry {
    #[serde(flatten)]
    pub registration: RegistrationResponse,
    pub tournament: TournamentSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateRegistrationStatusRequest {
    pub status: RegistrationStatus,
}

/// Organizer-recorded outcome for a participant
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RecordResultRequest {
    #[validate(range(min = 1, message = "Final position starts at 1"))]
    pub final_position: Option<i32>,

    #[serde(default)]
    pub points: i32,

    #[serde(default)]
    #[validate(range(min = 0))]
    pub matches_won: i32,

    #[serde(default)]
    #[validate(range(min = 0))]
    pub matches_lost: i32,

    #[serde(default)]
    #[validate(range(min = 0))]
    pub matches_drawn: i32,

    #[validate(length(max = 255))]
    pub prize: Option<String>,
}

/// Participant feedback on a tournament they were registered for
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct FeedbackRequest {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i16,

    #[validate(length(max = 1000, message = "Comment cannot exceed 1000 characters"))]
    pub comment: Option<String>,
}

impl From<Registration> for RegistrationResponse {
    fn from(r: Registration) -> Self {
        Self {
            registration_id: r.registration_id,
            user_id: r.user_id,
            tournament_id: r.tournament_id,
            registered_at: r.registered_at,
            status: r.status,
            notes: r.notes,
            checked_in: r.checked_in,
            checked_in_at: r.checked_in_at,
            final_position: r.final_position,
            points: r.points,
            matches_won: r.matches_won,
            matches_lost: r.matches_lost,
            matches_drawn: r.matches_drawn,
            prize: r.prize,
            rating: r.rating,
            feedback_comment: r.feedback_comment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds_are_enforced() {
        let mut req = FeedbackRequest {
            rating: 0,
            comment: None,
        };
        assert!(req.validate().is_err());
        req.rating = 6;
        assert!(req.validate().is_err());
        req.rating = 5;
        assert!(req.validate().is_ok());
    }

    #[test]
    fn result_position_must_be_positive() {
        let req = RecordResultRequest {
            final_position: Some(0),
            points: 0,
            matches_won: 0,
            matches_lost: 0,
            matches_drawn: 0,
            prize: None,
        };
        assert!(req.validate().is_err());
    }
}
