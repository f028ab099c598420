// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! weat places directory server binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use weat_server::{cors_layer, create_app_state, create_router};
use weat_server_config::LogFormat;

mod version;

/// weat server - HTTP API for the places directory.
#[derive(Parser, Debug)]
#[command(name = "weat-server", about = "weat places directory server", version)]
struct Args {
	/// Path to a TOML config file (defaults to /etc/weat/server.toml)
	#[arg(long, env = "WEAT_SERVER_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show version and build information
	Version,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	if let Some(Command::Version) = args.command {
		println!("{}", version::format_version_info());
		return Ok(());
	}

	dotenvy::dotenv().ok();

	let config = match &args.config {
		Some(path) => weat_server_config::load_config_with_file(path)?,
		None => weat_server_config::load_config()?,
	};

	let (text_layer, json_layer) = match config.logging.format {
		LogFormat::Text => (Some(tracing_subscriber::fmt::layer()), None),
		LogFormat::Json => (None, Some(tracing_subscriber::fmt::layer().json())),
	};
	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| config.logging.level.clone().into()),
		)
		.with(text_layer)
		.with(json_layer)
		.init();

	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		database = %config.database.target,
		dev_mode = config.auth.dev_mode,
		"starting weat-server"
	);

	let pool = weat_server_db::create_pool(
		config.database.url.expose(),
		config.database.max_connections,
	)
	.await?;
	weat_server_db::run_migrations(&pool).await?;

	let state = create_app_state(pool, &config);
	let app = create_router(state)
		.layer(TraceLayer::new_for_http())
		.layer(cors_layer(&config.cors));

	let addr = config.socket_addr();
	tracing::info!("listening on {}", addr);

	let listener = tokio::net::TcpListener::bind(&addr).await?;

	tokio::select! {
		result = axum::serve(listener, app) => {
			if let Err(e) = result {
				tracing::error!(error = %e, "Server error");
			}
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("Received shutdown signal");
		}
	}

	tracing::info!("Server shutdown complete");
	Ok(())
}
