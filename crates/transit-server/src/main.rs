// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Transit route search server binary.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tower_http::{
	cors::{Any, CorsLayer},
	trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use transit_server::{version, AppState, RestApi};
use transit_server_config::{LogFormat, LoggingConfig, ServerConfig};
use transit_server_db::StaticFeedRepository;

/// Transit server - route search over a static GTFS feed.
#[derive(Parser, Debug)]
#[command(name = "transit-server", about = "Transit route search server", version)]
struct Args {
	/// Path to a TOML config file (defaults to /etc/transit/server.toml)
	#[arg(long, env = "TRANSIT_SERVER_CONFIG")]
	config: Option<PathBuf>,

	/// Subcommands for transit-server (e.g., `import`, `version`)
	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Replace the stored feed with a JSON snapshot, then exit
	Import {
		/// Snapshot file to load
		path: PathBuf,
	},
	/// Show version and build information
	Version,
}

fn init_tracing(logging: &LoggingConfig) {
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(logging.level.clone()));

	match logging.format {
		LogFormat::Json => tracing_subscriber::registry()
			.with(filter)
			.with(tracing_subscriber::fmt::layer().json())
			.init(),
		LogFormat::Pretty => tracing_subscriber::registry()
			.with(filter)
			.with(tracing_subscriber::fmt::layer())
			.init(),
	}
}

fn load_config(args: &Args) -> Result<ServerConfig, transit_server_config::ConfigError> {
	match &args.config {
		Some(path) => transit_server_config::load_config_with_file(path.clone()),
		None => transit_server_config::load_config(),
	}
}

async fn shutdown_signal() {
	if let Err(e) = tokio::signal::ctrl_c().await {
		tracing::error!(error = %e, "failed to listen for shutdown signal");
		std::future::pending::<()>().await;
	}
	tracing::info!("Received shutdown signal");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	if let Some(Command::Version) = args.command {
		println!("{}", version::format_version_info());
		return Ok(());
	}

	// Load .env file if present
	dotenvy::dotenv().ok();

	let config = load_config(&args)?;
	init_tracing(&config.logging);

	let pool = transit_server_db::create_pool(&config.database.url).await?;
	transit_server_db::run_migrations(&pool).await?;
	let feed_repo = StaticFeedRepository::new(pool.clone());

	if let Some(Command::Import { path }) = &args.command {
		let counts = transit_server_feed::import_feed_snapshot(&feed_repo, path).await?;
		tracing::info!(
			agencies = counts.agencies,
			routes = counts.routes,
			"feed import complete"
		);
		return Ok(());
	}

	if let Some(path) = &config.feed.snapshot_path {
		transit_server_feed::load_feed_snapshot(&feed_repo, path).await?;
	}

	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		database = %config.database.url,
		"starting transit-server"
	);

	let api = RestApi::new(AppState::new(pool, config.auth.clone()), &config);
	let app = api
		.router()
		.layer(TraceLayer::new_for_http())
		.layer(
			CorsLayer::new()
				.allow_origin(Any)
				.allow_methods(Any)
				.allow_headers(Any),
		);

	let addr = config.socket_addr();
	tracing::info!("listening on {}", addr);

	let listener = tokio::net::TcpListener::bind(&addr).await?;

	let result = axum::serve(
		listener,
		app.into_make_service_with_connect_info::<SocketAddr>(),
	)
	.with_graceful_shutdown(shutdown_signal())
	.await;

	if let Err(e) = result {
		tracing::error!(error = %e, "Server error");
	}

	api.shutdown().await;
	tracing::info!("Server shutdown complete");
	Ok(())
}
