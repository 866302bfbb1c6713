// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Interfaces for parsing configuration files and working with a labeld
//! server configuration

use camino::Utf8Path;
use camino::Utf8PathBuf;
use dropshot::ConfigDropshot;
use dropshot::ConfigLogging;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// The external authn scheme names that can appear in the configuration file
///
/// The order of the `authn_schemes_external` list is significant: schemes are
/// tried in order until one of them applies to the incoming request.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemeName {
    Spoof,
}

/// Configuration for a labeld server
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Config {
    /// Unique id for this server
    pub id: Uuid,
    /// Dropshot configuration for the external API server
    pub dropshot_external: ConfigDropshot,
    /// Server-wide logging configuration
    pub log: ConfigLogging,
    /// Authentication schemes accepted for external HTTP requests
    pub authn_schemes_external: Vec<SchemeName>,
}

impl Config {
    /// Load a `Config` from the given TOML file
    ///
    /// This config object can then be used to create a new labeld server.
    pub fn from_file(path: &Utf8Path) -> Result<Config, LoadError> {
        let file_contents = std::fs::read_to_string(path)
            .map_err(|err| LoadError::Io { path: path.into(), err })?;
        let config_parsed: Config = toml::from_str(&file_contents)
            .map_err(|err| LoadError::Parse { path: path.into(), err })?;
        Ok(config_parsed)
    }
}

/// The error message here deliberately omits the underlying error: callers
/// print these with the full `anyhow` chain, which appends the source.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("read \"{path}\"")]
    Io {
        path: Utf8PathBuf,
        #[source]
        err: std::io::Error,
    },
    #[error("parse \"{path}\"")]
    Parse {
        path: Utf8PathBuf,
        #[source]
        err: toml::de::Error,
    },
}
