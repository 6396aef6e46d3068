use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use updraft_api::auth::{self, AppState, AppStateInner};
use updraft_api::middleware::{require_admin, require_auth};
use updraft_api::{updates, versions};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "updraft=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let jwt_secret =
        std::env::var("UPDRAFT_JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into());
    let db_path = std::env::var("UPDRAFT_DB_PATH").unwrap_or_else(|_| "updraft.db".into());
    let host = std::env::var("UPDRAFT_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("UPDRAFT_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;
    let admin_users: Vec<String> = std::env::var("UPDRAFT_ADMIN_USERS")
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    // Init database
    let db = updraft_db::Database::open(&PathBuf::from(&db_path))?;

    let state: AppState = Arc::new(AppStateInner {
        db,
        jwt_secret,
        admin_users,
    });

    // Routes
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/check", get(versions::check))
        .route("/latest", get(versions::latest))
        .with_state(state.clone());

    let user_routes = Router::new()
        .route("/log-update", post(updates::log_update))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state.clone());

    let admin_routes = Router::new()
        .route("/history", get(versions::history))
        .route("/stats", get(updates::get_stats))
        .route("/version", post(versions::upsert))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state);

    let app = Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .merge(admin_routes)
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Updraft server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
