//! # Atlas Node
//!
//! In-memory Atlas backend serving the project and account REST surface.
//! Used for local development and as the peer of the SDK's integration tests.

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod state;

pub use config::NodeConfig;
pub use state::{AppState, AuthUser};

/// Prefix every route is served under.
pub const BASE_PATH: &str = "/atlas";

/// Run the node until the listener fails.
pub async fn run_server(config: NodeConfig) -> anyhow::Result<()> {
    info!("Atlas node starting...");

    let state = AppState::new();
    seed_admin(&state, &config).await?;

    let app = create_router(state);
    let addr = config.addr();
    info!("Listening on http://{}{}", addr, BASE_PATH);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Make sure an administrator can log in on a fresh node.
pub async fn seed_admin(state: &AppState, config: &NodeConfig) -> atlas_core::Result<()> {
    if state.login_taken(&config.seed_admin_login).await {
        return Ok(());
    }
    state
        .register(
            atlas_core::AccountKind::Administrator,
            &config.seed_admin_login,
            &config.seed_admin_password,
        )
        .await?;
    info!(login = %config.seed_admin_login, "Seeded administrator account");
    Ok(())
}

/// Create the API router, nested under [`BASE_PATH`].
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let routes = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))

        // Auth
        .route("/auth/login", post(api::auth::login))
        .route("/auth/register/professor", post(api::auth::register_professor))
        .route("/auth/register/adm", post(api::auth::register_admin))
        .route("/auth/profile", get(api::auth::profile))

        // Projects
        .route(
            "/project",
            get(api::projects::list_projects).post(api::projects::create_project),
        )
        .route(
            "/project/:id",
            get(api::projects::get_project)
                .put(api::projects::update_project)
                .delete(api::projects::delete_project),
        )

        // Accounts
        .route(
            "/professor",
            get(api::accounts::list_professors)
                .post(api::accounts::create_professor)
                .delete(api::accounts::delete_all_professors),
        )
        .route(
            "/professor/:id",
            get(api::accounts::get_professor)
                .put(api::accounts::update_professor)
                .delete(api::accounts::delete_professor),
        )
        .route(
            "/adm",
            get(api::accounts::list_admins).post(api::accounts::create_admin),
        )
        .route(
            "/adm/:id",
            get(api::accounts::get_admin)
                .put(api::accounts::update_admin)
                .delete(api::accounts::delete_admin),
        );

    Router::new()
        .nest(BASE_PATH, routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
