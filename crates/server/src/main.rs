// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod handlers;

#[cfg(test)]
mod tests;

use axum::{
    Router,
    routing::{delete, get, post},
};
use clap::Parser;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use workmode::{EnginePolicy, TeleworkEngine};
use workmode_persistence::{PersistenceError, SeedDocument, SqliteStore};

use crate::handlers::{
    handle_add_membership, handle_approve_override, handle_create_profile,
    handle_deactivate_profile, handle_delete_override, handle_get_profile, handle_impose_override,
    handle_list_overrides, handle_preview_pattern, handle_reject_override, handle_request_override,
    handle_resolve_day, handle_resolve_period, handle_resolve_week, handle_save_team_rule,
    handle_stats, handle_team_rules_for_user, handle_update_profile, handle_validate_override,
};

/// Workmode Server - HTTP server for hybrid work scheduling
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// JSON seed document to load into the store at startup
    #[arg(short, long)]
    seed: Option<PathBuf>,

    /// Address to bind the server to
    #[arg(short, long, default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    bind: IpAddr,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    engine: Arc<TeleworkEngine<SqliteStore>>,
}

fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/users/{user_id}/days/{date}", get(handle_resolve_day))
        .route("/users/{user_id}/weeks/{date}", get(handle_resolve_week))
        .route("/users/{user_id}/period", get(handle_resolve_period))
        .route("/users/{user_id}/stats", get(handle_stats))
        .route(
            "/users/{user_id}/pattern_preview",
            post(handle_preview_pattern),
        )
        .route("/users/{user_id}/overrides", get(handle_list_overrides))
        .route(
            "/users/{user_id}/profile",
            get(handle_get_profile)
                .post(handle_create_profile)
                .patch(handle_update_profile),
        )
        .route(
            "/users/{user_id}/profile/deactivate",
            post(handle_deactivate_profile),
        )
        .route("/users/{user_id}/team_rules", get(handle_team_rules_for_user))
        .route("/users/{user_id}/memberships", post(handle_add_membership))
        .route("/overrides", post(handle_request_override))
        .route("/overrides/validate", post(handle_validate_override))
        .route("/overrides/impose", post(handle_impose_override))
        .route("/overrides/{override_id}", delete(handle_delete_override))
        .route(
            "/overrides/{override_id}/approve",
            post(handle_approve_override),
        )
        .route(
            "/overrides/{override_id}/reject",
            post(handle_reject_override),
        )
        .route("/team_rules", post(handle_save_team_rule))
        .with_state(app_state)
}

async fn open_store(args: &Args) -> Result<SqliteStore, PersistenceError> {
    let store: SqliteStore = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path.display());
        SqliteStore::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        SqliteStore::new_in_memory()?
    };

    if let Some(seed_path) = &args.seed {
        info!("Loading seed document from: {}", seed_path.display());
        let seed: SeedDocument = SeedDocument::from_file(seed_path)?;
        store.load_seed(&seed).await?;
    }
    Ok(store)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Workmode Server");

    let store: SqliteStore = open_store(&args).await?;
    let policy: EnginePolicy = EnginePolicy::default();
    info!(
        include_weekends_in_period = policy.include_weekends_in_period,
        override_window_padding_days = policy.override_window_padding_days,
        "Engine policy"
    );

    let app_state: AppState = AppState {
        engine: Arc::new(TeleworkEngine::new(store, policy)),
    };
    let app: Router = build_router(app_state);

    let addr: SocketAddr = SocketAddr::new(args.bind, args.port);
    info!("Server listening on {}", addr);

    let listener: tokio::net::TcpListener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
