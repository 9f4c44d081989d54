use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "registration_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    Pending,
    Confirmed,
    Cancelled,
    Waitlisted,
    NoShow,
    Completed,
}

impl RegistrationStatus {
    /// Anything that is not cancelled holds a slot against the tournament's
    /// player count. Waitlisted rows are included: they keep their place in
    /// line and block a duplicate registration for the same pair.
    pub fn is_active(self) -> bool {
        self != RegistrationStatus::Cancelled
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Registration {
    pub registration_id: Uuid,
    pub user_id: Uuid,
    pub tournament_id: Uuid,
    pub registered_at: chrono::DateTime<chrono::Utc>,
    pub status: RegistrationStatus,
    pub notes: Option<String>,
    pub checked_in: bool,
    pub checked_in_at: Option<chrono::DateTime<chrono::Utc>>,
    pub final_position: Option<i32>,
    pub points: i32,
    pub matches_won: i32,
    pub matches_lost: i32,
    pub matches_drawn: i32,
    pub prize: Option<String>,
    pub rating: Option<i16>,
    pub feedback_comment: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::RegistrationStatus::*;

    #[test]
    fn only_cancelled_is_inactive() {
        assert!(!Cancelled.is_active());
        for status in [Pending, Confirmed, Waitlisted, NoShow, Completed] {
            assert!(status.is_active());
        }
    }
}
