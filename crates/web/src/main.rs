use anyhow::Context;
use axum::{Json, Router, routing::get};
use storage::Database;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;
mod middleware;
mod state;

use config::Config;
use middleware::auth::JwtKeys;
use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::auth::handlers::register_account,
        features::auth::handlers::login,
        features::auth::handlers::me,
        features::auth::handlers::update_profile,
        features::auth::handlers::change_password,
        features::tournaments::handlers::list_tournaments,
        features::tournaments::handlers::weekly_tournaments,
        features::tournaments::handlers::monthly_tournaments,
        features::tournaments::handlers::calendar_tournaments,
        features::tournaments::handlers::tournament_stats,
        features::tournaments::handlers::get_tournament,
        features::tournaments::handlers::create_tournament,
        features::tournaments::handlers::update_tournament,
        features::tournaments::handlers::delete_tournament,
        features::registrations::handlers::register_for_tournament,
        features::registrations::handlers::unregister_from_tournament,
        features::registrations::handlers::list_tournament_registrations,
        features::registrations::handlers::update_registration_status,
        features::registrations::handlers::record_registration_result,
        features::registrations::handlers::check_in_registration,
        features::registrations::handlers::leave_feedback,
        features::users::handlers::my_registrations,
        features::users::handlers::my_stats,
        features::users::handlers::list_users,
        features::users::handlers::general_stats,
        features::users::handlers::get_user,
        features::users::handlers::update_user_status,
        features::users::handlers::update_user_admin,
        features::stats::handlers::site_stats,
    ),
    components(
        schemas(
            storage::dto::auth::RegisterAccountRequest,
            storage::dto::auth::LoginRequest,
            storage::dto::auth::UpdateProfileRequest,
            storage::dto::auth::ChangePasswordRequest,
            storage::dto::auth::AuthResponse,
            storage::dto::user::UserResponse,
            storage::dto::user::UserSummary,
            storage::dto::user::UserDetailResponse,
            storage::dto::user::UserStatsResponse,
            storage::dto::user::UpdateUserStatusRequest,
            storage::dto::user::UpdateUserAdminRequest,
            storage::dto::tournament::CreateTournamentRequest,
            storage::dto::tournament::UpdateTournamentRequest,
            storage::dto::tournament::TournamentResponse,
            storage::dto::tournament::TournamentSummary,
            storage::dto::registration::RegistrationResponse,
            storage::dto::registration::RegisterResponse,
            storage::dto::registration::TournamentRegistrationEntry,
            storage::dto::registration::UserRegistrationEntry,
            storage::dto::registration::UpdateRegistrationStatusRequest,
            storage::dto::registration::RecordResultRequest,
            storage::dto::registration::FeedbackRequest,
            storage::dto::stats::SiteStatsResponse,
            storage::dto::stats::TournamentStatsResponse,
            storage::dto::stats::GeneralStatsResponse,
            storage::dto::stats::UserCounts,
            storage::dto::stats::TournamentCounts,
            storage::dto::stats::RegistrationCounts,
            storage::dto::common::PaginationMeta,
            storage::models::Tournament,
            storage::models::TournamentStatus,
            storage::models::Registration,
            storage::models::RegistrationStatus,
        )
    ),
    tags(
        (name = "auth", description = "Account registration and authentication"),
        (name = "tournaments", description = "Tournament catalog and administration"),
        (name = "registrations", description = "Tournament registration lifecycle"),
        (name = "users", description = "Member self-service and user administration"),
        (name = "stats", description = "Public site statistics"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting tournament registration API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    if let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) {
        features::auth::services::seed_admin(db.pool(), email, password)
            .await
            .context("Failed to seed administrator account")?;
    }

    let state = AppState {
        db,
        jwt: JwtKeys::new(&config.jwt_secret, config.jwt_expire_hours),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api/auth", features::auth::routes::routes(state.clone()))
        .nest(
            "/api/tournaments",
            features::tournaments::routes::routes(state.clone())
                .merge(features::registrations::routes::routes(state.clone())),
        )
        .nest("/api/users", features::users::routes::routes(state.clone()))
        .nest("/api/stats", features::stats::routes::routes())
        .route("/api/health", get(health))
        .layer(cors)
        .with_state(state);

    let bind_address = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {bind_address}"))?;

    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    axum::serve(listener, app).await?;

    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
    }))
}
