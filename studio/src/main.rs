use axum::http::{header, HeaderValue, Method};
use ractor::Actor;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};

use studio::api;
use studio::app_state::AppState;
use studio::completion::AnthropicClient;
use studio::workspace::{WorkspaceActor, WorkspaceArguments};

fn load_env_file() {
    let cwd = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            tracing::warn!(error = %e, "Could not determine current directory for .env lookup");
            return;
        }
    };

    let mut current = cwd.clone();
    loop {
        let candidate = current.join(".env");
        if candidate.exists() {
            match dotenvy::from_path(&candidate) {
                Ok(_) => {
                    tracing::info!(path = %candidate.display(), "Loaded environment from .env");
                }
                Err(e) => {
                    tracing::warn!(
                        path = %candidate.display(),
                        error = %e,
                        "Failed to load .env file"
                    );
                }
            }
            return;
        }

        if !current.pop() {
            break;
        }
    }

    tracing::info!(
        cwd = %cwd.display(),
        "No .env file found in current directory or ancestors; using process environment only"
    );
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Load .env values early so the provider key is available before the
    // client is constructed. Search the current directory and ancestors so
    // running from `studio/` still picks up a repo-root `.env`.
    load_env_file();

    tracing::info!("Starting Redraft Studio API Server");

    let completion = Arc::new(
        AnthropicClient::from_env().expect("completion client configuration failed"),
    );

    let (workspace, _handle) = Actor::spawn(
        Some(format!("workspace:{}", ulid::Ulid::new())),
        WorkspaceActor,
        WorkspaceArguments {
            completion: completion.clone(),
        },
    )
    .await
    .expect("Failed to spawn WorkspaceActor");

    tracing::info!("WorkspaceActor started");

    let app_state = AppState::new(workspace, completion);

    // Configure CORS to allow known UI origins
    let allowed_origins = ["http://localhost:3000", "http://127.0.0.1:3000"]
        .iter()
        .map(|origin| HeaderValue::from_str(origin).expect("Invalid CORS origin"))
        .collect::<Vec<_>>();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(std::time::Duration::from_secs(3600));

    let api_state = api::ApiState { app_state };
    let app = api::router().with_state(api_state).layer(cors);

    let bind = std::env::var("REDRAFT_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    tracing::info!(%bind, "Starting HTTP server");

    let listener = TcpListener::bind(&bind).await?;
    axum::serve(listener, app).await
}
