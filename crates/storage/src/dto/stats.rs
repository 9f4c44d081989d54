use serde::Serialize;
use utoipa::ToSchema;

/// Public landing-page numbers
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SiteStatsResponse {
    pub total_members: i64,
    pub total_tournaments: i64,
    pub active_tournaments: i64,
    pub finished_tournaments: i64,
    pub total_games: i64,
    pub upcoming_tournaments: i64,
}

/// Organizer dashboard numbers for tournaments
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TournamentStatsResponse {
    pub total_tournaments: i64,
    pub upcoming_tournaments: i64,
    pub past_tournaments: i64,
    pub total_registrations: i64,
    /// Mean active registrations per tournament, one decimal
    pub average_participants: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserCounts {
    pub total: i64,
    pub active: i64,
    pub admins: i64,
    pub inactive: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TournamentCounts {
    pub total: i64,
    pub upcoming: i64,
    pub past: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RegistrationCounts {
    pub total: i64,
    /// Pending or confirmed
    pub active: i64,
    pub cancelled: i64,
    /// Percentage of all registrations that were cancelled, two decimals
    pub cancellation_rate: f64,
}

/// Admin-wide overview across users, tournaments and registrations
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GeneralStatsResponse {
    pub users: UserCounts,
    pub tournaments: TournamentCounts,
    pub registrations: RegistrationCounts,
}
