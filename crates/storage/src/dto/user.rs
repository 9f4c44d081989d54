use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::models::User;

/// Public view of an account; never carries the password hash
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Trimmed user context attached to a registration for display
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserSummary {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct UserListParams {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Case-insensitive name/email filter
    pub search: Option<String>,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    20
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateUserStatusRequest {
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateUserAdminRequest {
    pub is_admin: bool,
}

/// A member's own activity summary
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserStatsResponse {
    pub tournaments_joined: i64,
    pub upcoming_tournaments: i64,
    pub member_since: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Admin view of an account with its registration history
#[derive(Debug, Serialize, ToSchema)]
pub struct UserDetailResponse {
    pub user: UserResponse,
    pub registrations: Vec<crate::dto::registration::UserRegistrationEntry>,
    pub stats: UserStatsResponse,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            user_id: u.user_id,
            name: u.name,
            email: u.email,
            is_admin: u.is_admin,
            is_active: u.is_active,
            last_login: u.last_login,
            created_at: u.created_at,
        }
    }
}

impl From<User> for UserSummary {
    fn from(u: User) -> Self {
        Self {
            user_id: u.user_id,
            name: u.name,
            email: u.email,
        }
    }
}
