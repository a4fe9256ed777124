/// Application state and router builder
///
/// This module defines the shared application state and builds the axum
/// router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use taskhub_api::{app::{build_router, AppState}, config::Config};
/// use taskhub_shared::db::pool::{create_pool, DatabaseConfig};
/// use taskhub_shared::store::postgres::PgStore;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(DatabaseConfig {
///     url: config.database.url.clone(),
///     ..Default::default()
/// })
/// .await?;
/// let state = AppState::new(Arc::new(PgStore::new(pool)), config);
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use taskhub_shared::auth::{jwt, policy::Actor};
use taskhub_shared::services::{projects::ProjectService, tasks::TaskService};
use taskhub_shared::store::Store;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::config::Config;
use crate::error::ApiError;

/// Shared application state
///
/// Cloned for each request handler via axum's `State` extractor; the
/// store handle and config sit behind `Arc` so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Persistence handle shared by every service
    pub store: Arc<dyn Store>,

    /// Project lifecycle service
    pub projects: ProjectService,

    /// Task lifecycle service
    pub tasks: TaskService,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates application state over an injected store
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        Self {
            projects: ProjectService::new(store.clone()),
            tasks: TaskService::new(store.clone()),
            store,
            config: Arc::new(config),
        }
    }

    /// Gets the secret used for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.auth.jwt_secret
    }
}

/// Builds the complete axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                          # Health check (public)
/// └── /v1/                             # API v1 (versioned)
///     ├── /auth/
///     │   ├── POST /register           # Public
///     │   ├── POST /login              # Public
///     │   ├── GET  /profile            # Bearer token
///     │   ├── PUT  /profile            # Bearer token
///     │   └── POST /logout             # Bearer token
///     ├── /projects/                   # Bearer token
///     │   ├── GET    /                 # List
///     │   ├── POST   /                 # Create
///     │   ├── GET    /:id
///     │   ├── PUT    /:id
///     │   ├── DELETE /:id
///     │   ├── POST   /:id/members
///     │   └── DELETE /:id/members/:user_id
///     └── /tasks/                      # Bearer token
///         ├── GET    /                 # List
///         ├── POST   /                 # Create
///         ├── GET    /stats
///         ├── GET    /:id
///         ├── PUT    /:id
///         └── DELETE /:id
/// ```
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Public auth endpoints
    let auth_public = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    // Auth endpoints that need an authenticated caller
    let auth_private = Router::new()
        .route(
            "/profile",
            get(routes::auth::profile).put(routes::auth::update_profile),
        )
        .route("/logout", post(routes::auth::logout))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            bearer_auth_layer,
        ));

    let project_routes = Router::new()
        .route(
            "/",
            get(routes::projects::list_projects).post(routes::projects::create_project),
        )
        .route(
            "/:id",
            get(routes::projects::get_project)
                .put(routes::projects::update_project)
                .delete(routes::projects::delete_project),
        )
        .route("/:id/members", post(routes::projects::add_member))
        .route(
            "/:id/members/:user_id",
            axum::routing::delete(routes::projects::remove_member),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            bearer_auth_layer,
        ));

    let task_routes = Router::new()
        .route(
            "/",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route("/stats", get(routes::tasks::task_stats))
        .route(
            "/:id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            bearer_auth_layer,
        ));

    let v1_routes = Router::new()
        .nest("/auth", auth_public.merge(auth_private))
        .nest("/projects", project_routes)
        .nest("/tasks", task_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// Bearer token authentication middleware
///
/// Extracts and validates the token from the Authorization header, then
/// injects the acting identity into request extensions for handlers to
/// pick up via `Extension<Actor>`.
async fn bearer_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::BadRequest("Expected Bearer token".to_string()))?;

    let claims = jwt::validate_token(token, state.jwt_secret())?;

    let actor = Actor::new(claims.sub, claims.roles);
    req.extensions_mut().insert(actor);

    Ok(next.run(req).await)
}
