// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Textpress — Document text processing service
//
// Entry point. Initialises logging, loads configuration, builds the backend
// services and serves HTTP until interrupted.

mod http;
mod multipart;
mod routes;
mod server;
mod services;

use std::path::PathBuf;

use textpress_core::AppConfig;
use textpress_core::error::Result;

use server::HttpServer;
use services::app_services::AppServices;
use services::data_dir::data_dir;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Textpress starting");

    if let Err(e) = run().await {
        tracing::error!(error = %e, "Textpress failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let data_dir = data_dir();
    let config_path = std::env::var("TEXTPRESS_CONFIG")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| data_dir.join("config.json"));

    let config = AppConfig::load(&config_path)?;
    let services = AppServices::init(&config, &data_dir)?;

    let mut server = HttpServer::new(config.server.bind_address.clone(), config.server.port)
        .with_read_timeout(config.server.read_timeout());
    server.start(services).await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("interrupt received, shutting down");

    server.stop().await
}
