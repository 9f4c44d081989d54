use chrono::Utc;
use sqlx::PgPool;
use storage::{
    dto::common::PaginatedResponse,
    dto::registration::UserRegistrationEntry,
    dto::stats::{GeneralStatsResponse, TournamentCounts},
    dto::user::{UserDetailResponse, UserListParams, UserResponse, UserStatsResponse},
    models::User,
    repository::{
        registration::RegistrationRepository, tournament::TournamentRepository,
        user::UserRepository,
    },
};
use uuid::Uuid;

use crate::error::{WebError, WebResult};

/// The member's registrations with tournament context
pub async fn my_registrations(
    pool: &PgPool,
    user_id: Uuid,
) -> WebResult<Vec<UserRegistrationEntry>> {
    let repo = RegistrationRepository::new(pool);
    Ok(repo.list_for_user(user_id).await?)
}

/// The member's own activity summary
pub async fn my_stats(pool: &PgPool, user: &User) -> WebResult<UserStatsResponse> {
    let repo = RegistrationRepository::new(pool);
    let (joined, upcoming) = repo.user_activity(user.user_id, Utc::now()).await?;

    Ok(UserStatsResponse {
        tournaments_joined: joined,
        upcoming_tournaments: upcoming,
        member_since: user.created_at,
        last_login: user.last_login,
    })
}

/// Page through accounts, optionally filtered by name or email
pub async fn list_users(
    pool: &PgPool,
    params: &UserListParams,
) -> WebResult<PaginatedResponse<UserResponse>> {
    if params.page < 1 {
        return Err(WebError::BadRequest("page must be >= 1".to_string()));
    }
    if params.page_size < 1 || params.page_size > 100 {
        return Err(WebError::BadRequest(
            "page_size must be between 1 and 100".to_string(),
        ));
    }

    let repo = UserRepository::new(pool);
    let search = params.search.as_deref();

    let limit = i64::from(params.page_size);
    let offset = i64::from((params.page - 1) * params.page_size);

    let users = repo.list(search, limit, offset).await?;
    let total = repo.count(search).await?;

    let data = users.into_iter().map(UserResponse::from).collect();

    Ok(PaginatedResponse::new(
        data,
        params.page,
        params.page_size,
        total,
    ))
}

/// Admin view of one account with its registration history and summary
pub async fn get_user(pool: &PgPool, user_id: Uuid) -> WebResult<UserDetailResponse> {
    let repo = UserRepository::new(pool);
    let user = repo.find_by_id(user_id).await?;

    let registrations = RegistrationRepository::new(pool)
        .list_for_user(user.user_id)
        .await?;
    let stats = my_stats(pool, &user).await?;

    Ok(UserDetailResponse {
        user: UserResponse::from(user),
        registrations,
        stats,
    })
}

/// Activate or deactivate an account. Admin accounts cannot be deactivated.
pub async fn set_user_status(
    pool: &PgPool,
    user_id: Uuid,
    is_active: bool,
) -> WebResult<User> {
    let repo = UserRepository::new(pool);
    let user = repo.find_by_id(user_id).await?;

    if user.is_admin && !is_active {
        return Err(WebError::BadRequest(
            "Cannot deactivate an administrator account".to_string(),
        ));
    }

    Ok(repo.set_active(user.user_id, is_active).await?)
}

/// Grant or revoke administrator rights. Nobody edits their own rights.
pub async fn set_user_admin(
    pool: &PgPool,
    acting_user: Uuid,
    user_id: Uuid,
    is_admin: bool,
) -> WebResult<User> {
    if acting_user == user_id {
        return Err(WebError::BadRequest(
            "Cannot change your own administrator rights".to_string(),
        ));
    }

    let repo = UserRepository::new(pool);
    let user = repo.find_by_id(user_id).await?;

    Ok(repo.set_admin(user.user_id, is_admin).await?)
}

/// Admin-wide overview across users, tournaments and registrations
pub async fn general_stats(pool: &PgPool) -> WebResult<GeneralStatsResponse> {
    let users = UserRepository::new(pool).counts().await?;

    let tournament_stats = TournamentRepository::new(pool).stats(Utc::now()).await?;
    let tournaments = TournamentCounts {
        total: tournament_stats.total_tournaments,
        upcoming: tournament_stats.upcoming_tournaments,
        past: tournament_stats.past_tournaments,
    };

    let registrations = RegistrationRepository::new(pool).stats().await?;

    Ok(GeneralStatsResponse {
        users,
        tournaments,
        registrations,
    })
}
