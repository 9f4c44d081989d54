use axum::extract::FromRef;
use storage::Database;

use crate::middleware::auth::JwtKeys;

/// Shared application state; handlers extract the piece they need
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: JwtKeys,
}

impl FromRef<AppState> for Database {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.jwt.clone()
    }
}
