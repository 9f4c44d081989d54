use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "tournament_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    Planned,
    RegistrationOpen,
    RegistrationClosed,
    InProgress,
    Completed,
    Cancelled,
}

impl TournamentStatus {
    /// Whether an organizer may move a tournament from `self` to `next`.
    ///
    /// The lifecycle is strictly forward:
    /// planned -> registration_open -> registration_closed -> in_progress -> completed,
    /// with cancellation allowed from any non-terminal state. There are no
    /// time-based transitions; a past-dated tournament that was never closed
    /// still rejects registrations through the capacity policy.
    pub fn can_transition_to(self, next: TournamentStatus) -> bool {
        use TournamentStatus::*;

        if self == next {
            return true;
        }

        match (self, next) {
            (Planned, RegistrationOpen) => true,
            (RegistrationOpen, RegistrationClosed) => true,
            (RegistrationClosed, InProgress) => true,
            (InProgress, Completed) => true,
            (Planned | RegistrationOpen | RegistrationClosed | InProgress, Cancelled) => true,
            _ => false,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, TournamentStatus::Completed | TournamentStatus::Cancelled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TournamentStatus::Planned => "planned",
            TournamentStatus::RegistrationOpen => "registration_open",
            TournamentStatus::RegistrationClosed => "registration_closed",
            TournamentStatus::InProgress => "in_progress",
            TournamentStatus::Completed => "completed",
            TournamentStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Tournament {
    pub tournament_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub game: String,
    pub starts_at: chrono::DateTime<chrono::Utc>,
    pub max_players: i32,
    /// Denormalized count of active registrations; reconciled against the
    /// registrations table, never treated as the source of truth.
    pub current_players: i32,
    pub status: TournamentStatus,
    pub created_by: Uuid,
    pub registration_deadline: Option<chrono::DateTime<chrono::Utc>>,
    pub entry_fee: Option<Decimal>,
    pub is_public: bool,
    pub tags: Vec<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::TournamentStatus::*;

    #[test]
    fn forward_transitions_are_allowed() {
        assert!(Planned.can_transition_to(RegistrationOpen));
        assert!(RegistrationOpen.can_transition_to(RegistrationClosed));
        assert!(RegistrationClosed.can_transition_to(InProgress));
        assert!(InProgress.can_transition_to(Completed));
    }

    #[test]
    fn backward_and_skipping_transitions_are_rejected() {
        assert!(!RegistrationOpen.can_transition_to(Planned));
        assert!(!Planned.can_transition_to(InProgress));
        assert!(!Completed.can_transition_to(RegistrationOpen));
    }

    #[test]
    fn cancellation_only_from_non_terminal_states() {
        assert!(Planned.can_transition_to(Cancelled));
        assert!(RegistrationOpen.can_transition_to(Cancelled));
        assert!(InProgress.can_transition_to(Cancelled));
        assert!(!Completed.can_transition_to(Cancelled));
    }

    #[test]
    fn terminal_states_accept_nothing_new() {
        assert!(!Cancelled.can_transition_to(RegistrationOpen));
        assert!(!Completed.can_transition_to(InProgress));
    }

    #[test]
    fn self_transition_is_a_no_op() {
        assert!(Cancelled.can_transition_to(Cancelled));
        assert!(RegistrationOpen.can_transition_to(RegistrationOpen));
    }
}
