use clubhouse::account::{AccountRepository, InMemoryAccountRepository, PostgresAccountRepository};
use clubhouse::auth::password::Argon2PasswordHasher;
use clubhouse::auth::token::JwtTokenService;
use clubhouse::shared::AppState;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clubhouse=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting clubhouse membership server");

    // The signing secret has no default; refuse to start without it
    let tokens = Arc::new(JwtTokenService::from_env().expect("JWT_SECRET must be set"));

    // Pick the account store from the environment:
    let accounts: Arc<dyn AccountRepository + Send + Sync> = match std::env::var("DATABASE_URL") {
        Ok(database_url) => {
            let pool = sqlx::PgPool::connect(&database_url)
                .await
                .expect("Failed to connect to database");
            info!("Using PostgreSQL account store");
            Arc::new(PostgresAccountRepository::new(pool))
        }
        Err(_) => {
            info!("DATABASE_URL not set, using in-memory account store");
            Arc::new(InMemoryAccountRepository::new())
        }
    };

    let app_state = AppState::new(accounts, Arc::new(Argon2PasswordHasher::new()), tokens);

    let app = clubhouse::app(app_state);

    // run our app with hyper, listening globally on port 3000
    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    info!("Server running on http://localhost:3000");
    axum::serve(listener, app).await.unwrap();
}
