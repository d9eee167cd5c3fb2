/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use taskdesk_api::{app::{build_router, AppState}, config::Config};
/// use taskdesk_shared::store::memory::MemoryStore;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = AppState::new(Arc::new(MemoryStore::new()), config);
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, routes};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use taskdesk_shared::{
    auth::{authenticate, AuthError, TokenIssuer, TokenVerifier},
    store::Store,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Users, tasks and comments
    pub store: Arc<dyn Store>,

    /// Mints tokens at login
    pub issuer: Arc<TokenIssuer>,

    /// Checks bearer tokens on protected routes
    pub verifier: Arc<TokenVerifier>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    ///
    /// The token issuer and verifier are both keyed from `config.jwt`.
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        let issuer = TokenIssuer::with_ttl(&config.jwt.secret, config.jwt.ttl());
        let verifier = TokenVerifier::new(&config.jwt.secret);

        Self {
            store,
            issuer: Arc::new(issuer),
            verifier: Arc::new(verifier),
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET    /health                    # public
/// ├── /auth/                            # public
/// │   ├── POST /register
/// │   └── POST /login
/// └── (bearer token required)
///     ├── GET    /user/me
///     ├── GET    /users
///     ├── POST   /tasks
///     ├── GET    /tasks
///     ├── GET    /tasks/:id
///     ├── PUT    /tasks/:id
///     ├── DELETE /tasks/:id
///     ├── POST   /tasks/:id/comments
///     ├── GET    /tasks/:id/comments
///     └── DELETE /comments/:comment_id
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Bearer authentication (protected routes only)
pub fn build_router(state: AppState) -> Router {
    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public, no auth required)
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    // Everything else requires a valid bearer token
    let protected_routes = Router::new()
        .route("/user/me", get(routes::users::me))
        .route("/users", get(routes::users::list_users))
        .route(
            "/tasks",
            post(routes::tasks::create_task).get(routes::tasks::list_tasks),
        )
        .route(
            "/tasks/:id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .route(
            "/tasks/:id/comments",
            post(routes::comments::create_comment).get(routes::comments::list_comments),
        )
        .route(
            "/comments/:comment_id",
            delete(routes::comments::delete_comment),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_bearer,
        ));

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.iter().any(|origin| origin == "*") {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            // Validated by Config::from_lookup
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
            .max_age(std::time::Duration::from_secs(12 * 60 * 60))
    };

    Router::new()
        .merge(health_routes)
        .nest("/auth", auth_routes)
        .merge(protected_routes)
        .fallback(routes::not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// Bearer authentication middleware layer
///
/// Validates the `Authorization: Bearer <token>` header and injects the
/// caller's `AuthenticatedIdentity` into request extensions. Any failure ends
/// the request with 401 before a handler runs.
async fn require_bearer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = match req.headers().get(header::AUTHORIZATION) {
        Some(value) => Some(value.to_str().map_err(|_| AuthError::InvalidFormat)?),
        None => None,
    };

    let identity = authenticate(header, &state.verifier).map_err(|e| {
        tracing::warn!(
            method = %req.method(),
            path = %req.uri().path(),
            error = %e,
            "Rejected unauthenticated request"
        );
        e
    })?;

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}
