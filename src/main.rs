// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::process::ExitCode;

use chrono::Utc;
use tokio::signal;

use veilend_relay::{
    api::router,
    chain::ChainGateway,
    config::AppConfig,
    state::AppState,
    storage::{IdentityRepository, RelayDatabase},
    telemetry::init_tracing,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(config.log_format);

    let db = match RelayDatabase::open(&config.database_path) {
        Ok(db) => db,
        Err(e) => {
            tracing::error!(path = %config.database_path.display(), error = %e, "failed to open database");
            return ExitCode::FAILURE;
        }
    };

    match IdentityRepository::new(&db).clear_expired_nonces(Utc::now()) {
        Ok(0) => {}
        Ok(cleared) => tracing::info!(cleared, "cleared expired login nonces"),
        Err(e) => tracing::warn!(error = %e, "failed to clear expired nonces"),
    }

    let gateway = ChainGateway::from_config(&config);
    if config.rpc_url.is_none() {
        tracing::warn!("RPC_URL not set; contract reads are informational and writes will fail");
    }
    if config.admin.is_none() {
        tracing::warn!("admin credential not configured; contract writes will fail");
    }

    let addr = config.bind_addr();
    let environment = config.environment;
    let app = router(AppState::new(config, db, gateway));

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, error = %e, "failed to bind");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(%addr, ?environment, "VeiLend relay listening (docs at /docs)");

    if let Err(e) = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await {
        tracing::error!(error = %e, "server error");
        return ExitCode::FAILURE;
    }

    tracing::info!("shut down");
    ExitCode::SUCCESS
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
