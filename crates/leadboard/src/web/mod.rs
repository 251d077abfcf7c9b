//! HTTP dashboard server.

pub mod error;
pub mod handlers;
pub mod session;
pub mod views;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::geo::Geocoder;
use crate::store::{LeadSource, LeadStore, RefreshHandle};

pub use error::WebError;
pub use session::SessionStore;

/// Shared state handed to every handler.
pub struct AppState {
    /// Loaded leads.
    pub store: LeadStore,
    /// Where refreshes load from.
    pub source: Arc<dyn LeadSource>,
    /// Geocoder used by city search and the debug probe.
    pub geocoder: Arc<Geocoder>,
    /// Login sessions.
    pub sessions: SessionStore,
    /// Effective configuration.
    pub config: Arc<Config>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("store", &self.store)
            .field("geocoder", &self.geocoder)
            .field("sessions", &self.sessions)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Assemble state; sessions are configured from `config.auth`.
    #[must_use]
    pub fn new(
        config: Config,
        store: LeadStore,
        source: Arc<dyn LeadSource>,
        geocoder: Arc<Geocoder>,
    ) -> Self {
        let sessions = SessionStore::new(config.auth.password.as_deref(), config.session_ttl());
        Self {
            store,
            source,
            geocoder,
            sessions,
            config: Arc::new(config),
        }
    }
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route("/", get(handlers::dashboard))
        .route("/filter", get(handlers::filter_by_state))
        .route("/search", get(handlers::search_company))
        .route("/city-search", get(handlers::city_search))
        .route("/refresh-data", post(handlers::refresh_data))
        .route("/api/dashboard-data", get(handlers::dashboard_data))
        .route("/debug/geocoding", get(handlers::debug_geocoding))
        .route("/debug/current-data", get(handlers::debug_current_data))
        .route("/debug/smartsuite-data", get(handlers::debug_smartsuite_data))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            session::require_login,
        ));

    let public_dir = state.config.server.public_dir.clone();

    Router::new()
        .merge(protected)
        .route("/health", get(handlers::health))
        .route("/login", get(session::login_page).post(session::login))
        .route("/logout", post(session::logout))
        .route("/favicon.ico", get(handlers::favicon))
        .fallback_service(ServeDir::new(public_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the dashboard until Ctrl-C or SIGTERM, then stop the refresher.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound or the server fails.
pub async fn serve(state: Arc<AppState>, refresher: RefreshHandle) -> Result<()> {
    let address = state.config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| Error::Bind {
            address: address.clone(),
            source,
        })?;
    info!("Dashboard listening on http://{address}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    refresher.stop();
    info!("Server shut down");
    Ok(())
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
