// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Where configuration layers come from.
//!
//! Each source yields a [`ServerConfigLayer`]; [`crate::load_from_sources`]
//! stacks them by [`Precedence`] so that later layers override earlier ones
//! field by field.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::ServerConfigLayer;
use crate::sections::{DatabaseConfigLayer, HttpConfigLayer, LoggingConfigLayer};

/// System-wide config file read when no `--config` path is given.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/bugline/server.toml";

/// Prefix shared by every environment override.
pub const ENV_PREFIX: &str = "BUGLINE_SERVER_";

/// Relative strength of a source. Stronger sources are applied last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults,
	ConfigFile,
	Environment,
}

pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ServerConfigLayer, ConfigError>;
}

/// Contributes nothing; every section falls back to its built-in defaults.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		Ok(ServerConfigLayer::default())
	}
}

/// A TOML file. A file that does not exist yields an empty layer.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new(SYSTEM_CONFIG_PATH)
	}

	pub fn path(&self) -> &Path {
		&self.path
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		let content = match std::fs::read_to_string(&self.path) {
			Ok(content) => content,
			Err(err) if err.kind() == ErrorKind::NotFound => {
				debug!(path = %self.path.display(), "no config file");
				return Ok(ServerConfigLayer::default());
			}
			Err(source) => {
				return Err(ConfigError::FileRead {
					path: self.path.clone(),
					source,
				})
			}
		};

		let layer = toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
			path: self.path.clone(),
			source,
		})?;
		trace!(path = %self.path.display(), "config file parsed");
		Ok(layer)
	}
}

/// `BUGLINE_SERVER_*` environment variables. Empty values count as unset.
///
/// | Variable | Field |
/// |---|---|
/// | `BUGLINE_SERVER_HOST` | `http.host` |
/// | `BUGLINE_SERVER_PORT` | `http.port` |
/// | `BUGLINE_SERVER_DATABASE_URL` | `database.url` |
/// | `BUGLINE_SERVER_DATABASE_MAX_CONNECTIONS` | `database.max_connections` |
/// | `BUGLINE_SERVER_LOG_LEVEL` | `logging.level` |
/// | `BUGLINE_SERVER_LOG_JSON` | `logging.json` |
pub struct EnvSource {
	vars: Option<HashMap<String, String>>,
}

impl EnvSource {
	/// Read from the process environment.
	pub fn process() -> Self {
		Self { vars: None }
	}

	/// Read from a fixed set of variables instead of the process environment.
	pub fn from_vars<I, K, V>(vars: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		Self {
			vars: Some(
				vars.into_iter()
					.map(|(key, value)| (key.into(), value.into()))
					.collect(),
			),
		}
	}

	fn get(&self, suffix: &str) -> Option<String> {
		let key = format!("{ENV_PREFIX}{suffix}");
		let value = match &self.vars {
			Some(vars) => vars.get(&key).cloned(),
			None => std::env::var(&key).ok(),
		};
		value.filter(|value| !value.trim().is_empty())
	}

	fn parse<T: std::str::FromStr>(&self, suffix: &str, expected: &str) -> Result<Option<T>, ConfigError> {
		let Some(raw) = self.get(suffix) else {
			return Ok(None);
		};
		raw.trim()
			.parse()
			.map(Some)
			.map_err(|_| ConfigError::InvalidValue {
				key: format!("{ENV_PREFIX}{suffix}"),
				message: format!("expected {expected}, got '{raw}'"),
			})
	}

	fn flag(&self, suffix: &str) -> Result<Option<bool>, ConfigError> {
		let Some(raw) = self.get(suffix) else {
			return Ok(None);
		};
		match raw.trim().to_ascii_lowercase().as_str() {
			"1" | "true" | "yes" | "on" => Ok(Some(true)),
			"0" | "false" | "no" | "off" => Ok(Some(false)),
			_ => Err(ConfigError::InvalidValue {
				key: format!("{ENV_PREFIX}{suffix}"),
				message: format!("expected a boolean, got '{raw}'"),
			}),
		}
	}
}

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		Ok(ServerConfigLayer {
			http: Some(HttpConfigLayer {
				host: self.get("HOST"),
				port: self.parse("PORT", "a port number")?,
			}),
			database: Some(DatabaseConfigLayer {
				url: self.get("DATABASE_URL"),
				max_connections: self.parse("DATABASE_MAX_CONNECTIONS", "a connection count")?,
			}),
			logging: Some(LoggingConfigLayer {
				level: self.get("LOG_LEVEL"),
				json: self.flag("LOG_JSON")?,
			}),
		})
	}
}
