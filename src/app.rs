use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    Router,
};
use aws_sdk_s3::Client as S3Client;
use aws_sdk_sesv2::Client as SesClient;
use sqlx::PgPool;
use tower_http::cors::CorsLayer;

use crate::{
    config::{self, AppConfig, StorageConfig},
    database,
    error::Result,
    repositories::Repositories,
    routes,
    services::auth_events::{AuthEvent, AuthEvents},
};

#[derive(Clone)]
pub struct AppState {
    pub repos: Repositories,
    /// Pool Postgres en mode distant; absent en mode mémoire.
    pub db: Option<PgPool>,
    pub s3: Option<S3Client>,
    pub ses: Option<SesClient>,
    pub storage: StorageConfig,
    pub frontend_url: String,
    pub auth_events: AuthEvents,
}

pub async fn build(config: &AppConfig) -> Result<Router> {
    // Le backend est choisi ici, une seule fois; le reste de l'application
    // passe par le contrat de dépôts sans connaître le mode.
    let (repos, db) = if config.database.is_remote() {
        let pool = database::create_pool(&config.database).await?;
        (Repositories::postgres(pool.clone()), Some(pool))
    } else {
        tracing::warn!("DB_URL absent or placeholder, serving the in-memory fixture store");
        (Repositories::memory(), None)
    };

    let s3 = match config::load_s3_client().await {
        Ok(client) => Some(client),
        Err(e) => {
            tracing::warn!("S3 client unavailable, uploads disabled: {}", e);
            None
        }
    };

    let ses = match config::load_ses_client().await {
        Ok(client) => Some(client),
        Err(e) => {
            tracing::warn!("SES client unavailable, password reset emails disabled: {}", e);
            None
        }
    };

    let auth_events = AuthEvents::new();
    spawn_auth_event_logger(&auth_events);

    let state = AppState {
        repos,
        db,
        s3,
        ses,
        storage: config.storage.clone(),
        frontend_url: config.frontend_base().to_string(),
        auth_events,
    };

    let allowed_origins: Vec<HeaderValue> = config
        .cors
        .allowed_origins
        .iter()
        .map(|origin| {
            origin.parse::<HeaderValue>().map_err(|_| {
                crate::error::AppError::ConfigError(format!("Invalid CORS origin: {}", origin))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
        .allow_origin(allowed_origins);

    let app = routes::create_router()
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(cors)
        .with_state(state);

    Ok(app)
}

fn spawn_auth_event_logger(auth_events: &AuthEvents) {
    use tokio::sync::broadcast::error::RecvError;

    let mut rx = auth_events.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(AuthEvent::SignedIn { email }) => tracing::info!("User signed in: {}", email),
                Ok(AuthEvent::SignedOut) => tracing::info!("User signed out"),
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    });
}
