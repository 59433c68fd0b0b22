// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Server configuration for Bugline.
//!
//! Settings are resolved from three layers, weakest first: built-in defaults,
//! a TOML file and `BUGLINE_SERVER_*` environment variables. A field set in a
//! stronger layer replaces the same field from a weaker one; unset fields fall
//! through.
//!
//! ```ignore
//! let config = bugline_server_config::load_config()?;
//! let listener = tokio::net::TcpListener::bind(config.socket_addr()).await?;
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{
	ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource, ENV_PREFIX, SYSTEM_CONFIG_PATH,
};

use std::path::PathBuf;

use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub database: DatabaseConfig,
	pub logging: LoggingConfig,
}

impl ServerConfig {
	/// `host:port` for the HTTP listener.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

fn standard_sources(file: TomlSource) -> Vec<Box<dyn ConfigSource>> {
	vec![
		Box::new(DefaultsSource),
		Box::new(file),
		Box::new(EnvSource::process()),
	]
}

/// Resolve configuration using the system config file at [`SYSTEM_CONFIG_PATH`].
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_from_sources(standard_sources(TomlSource::system()))
}

/// Resolve configuration using `path` in place of the system config file.
pub fn load_config_with_file(path: impl Into<PathBuf>) -> Result<ServerConfig, ConfigError> {
	load_from_sources(standard_sources(TomlSource::new(path)))
}

/// Stack `sources` weakest first and resolve the result.
pub fn load_from_sources(
	mut sources: Vec<Box<dyn ConfigSource>>,
) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|source| source.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in &sources {
		debug!(source = source.name(), precedence = ?source.precedence(), "applying config layer");
		merged.merge(source.load()?);
	}

	let config = ServerConfig {
		http: merged.http.unwrap_or_default().finalize(),
		database: merged.database.unwrap_or_default().finalize(),
		logging: merged.logging.unwrap_or_default().finalize(),
	};
	validate(&config)?;

	info!(
		addr = %config.socket_addr(),
		database = %config.database.url,
		max_connections = config.database.max_connections,
		log_level = %config.logging.level,
		"configuration resolved"
	);
	Ok(config)
}

fn validate(config: &ServerConfig) -> Result<(), ConfigError> {
	if config.http.host.trim().is_empty() {
		return Err(ConfigError::Validation("http.host must not be empty".to_string()));
	}
	if config.database.url.trim().is_empty() {
		return Err(ConfigError::Validation("database.url must not be empty".to_string()));
	}
	if config.database.max_connections == 0 {
		return Err(ConfigError::Validation(
			"database.max_connections must be at least 1".to_string(),
		));
	}
	Ok(())
}
