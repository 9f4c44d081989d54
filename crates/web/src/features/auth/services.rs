use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;
use storage::{
    dto::auth::{ChangePasswordRequest, RegisterAccountRequest},
    models::User,
    repository::user::UserRepository,
};

use crate::error::{WebError, WebResult};

pub fn hash_password(password: &str) -> WebResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| WebError::InternalServerError(format!("Failed to hash password: {e}")))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Create a member account with a freshly hashed password
pub async fn register_account(pool: &PgPool, req: &RegisterAccountRequest) -> WebResult<User> {
    let password_hash = hash_password(&req.password)?;

    let repo = UserRepository::new(pool);
    let user = repo
        .create(&req.name, &req.email, &password_hash, false)
        .await?;

    Ok(user)
}

/// Verify credentials and stamp the login time. Deactivated accounts and bad
/// credentials produce the same status code, but deactivation gets its own
/// message so the member knows to contact an administrator.
pub async fn login(pool: &PgPool, email: &str, password: &str) -> WebResult<User> {
    let repo = UserRepository::new(pool);

    let user = repo
        .find_by_email(email)
        .await?
        .ok_or_else(|| WebError::Unauthorized("Invalid email or password".to_string()))?;

    if !user.is_active {
        return Err(WebError::Unauthorized(
            "Account is deactivated. Contact an administrator.".to_string(),
        ));
    }

    if !verify_password(password, &user.password_hash) {
        return Err(WebError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    repo.update_last_login(user.user_id).await?;
    let user = repo.find_by_id(user.user_id).await?;

    Ok(user)
}

pub async fn update_profile(pool: &PgPool, user_id: uuid::Uuid, name: &str) -> WebResult<User> {
    let repo = UserRepository::new(pool);
    let user = repo.update_profile(user_id, name).await?;
    Ok(user)
}

pub async fn change_password(
    pool: &PgPool,
    user: &User,
    req: &ChangePasswordRequest,
) -> WebResult<()> {
    if !verify_password(&req.current_password, &user.password_hash) {
        return Err(WebError::Unauthorized(
            "Current password is incorrect".to_string(),
        ));
    }

    let password_hash = hash_password(&req.new_password)?;

    let repo = UserRepository::new(pool);
    repo.update_password(user.user_id, &password_hash).await?;

    Ok(())
}

/// Idempotent admin bootstrap. Only runs when credentials are configured via
/// the environment; an existing account with the configured email wins.
pub async fn seed_admin(pool: &PgPool, email: &str, password: &str) -> anyhow::Result<()> {
    let repo = UserRepository::new(pool);

    if repo.find_by_email(email).await?.is_some() {
        tracing::debug!("Admin account already present, seed skipped");
        return Ok(());
    }

    let password_hash = hash_password(password).map_err(|e| anyhow::anyhow!("{e}"))?;
    repo.create("Administrator", email, &password_hash, true)
        .await?;

    tracing::info!("Seeded administrator account");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash_password("hunter42").unwrap();
        assert!(verify_password("hunter42", &hash));
        assert!(!verify_password("hunter43", &hash));
    }

    #[test]
    fn hashes_are_salted() {
        let first = hash_password("hunter42").unwrap();
        let second = hash_password("hunter42").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn verify_rejects_malformed_hashes() {
        assert!(!verify_password("hunter42", "not-a-phc-string"));
    }
}
