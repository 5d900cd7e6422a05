mod auth_state;
mod config;
mod diagnostics;
mod routes;
mod state;
mod supabase;
mod views;

use std::sync::Arc;

#[tokio::main]
async fn main() {
    // A missing .env file is normal in production.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = match config::AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let backend = supabase::SupabaseClient::new(&config.supabase).expect("backend client init failed");
    let views = views::Views::new().expect("templates failed to compile");
    tracing::info!(
        url = %config.supabase.url,
        project_ref = config.supabase.project_ref().unwrap_or("unknown"),
        "backend client initialized"
    );

    let port = config.port;
    let state = state::AppState::new(Arc::new(backend), views, config);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "picshare listening");
    axum::serve(listener, app).await.expect("server failed");
}
