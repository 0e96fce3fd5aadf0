//! Configuration loading and validation.
//!
//! [`load`] reads a config file asynchronously, picks the parser from the
//! file extension via [`parse_config_str`], applies environment overrides,
//! and validates the result. The loaded [`Config`](model::Config) is
//! immutable for the lifetime of the process.

pub mod model;
pub mod validation;

use std::path::Path;

use url::Url;

use crate::error::ClientError;
use model::Config;
use validation::validate;

/// Environment variable overriding `application.name`.
pub const APPLICATION_NAME_ENV: &str = "APPLICATION_NAME";
/// Environment variable overriding `pdl.base_uri`.
pub const PDL_BASE_URI_ENV: &str = "PDL_BASE_URI";

/// Parse a config string based on file extension.
pub fn parse_config_str(
    ext: &str,
    content: &str,
    path_display: &str,
) -> Result<Config, ClientError> {
    match ext {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => serde_yml::from_str(content).map_err(|e| ClientError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        #[cfg(feature = "json")]
        "json" => serde_json::from_str(content).map_err(|e| ClientError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        #[cfg(feature = "toml")]
        "toml" => toml::from_str(content).map_err(|e| ClientError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        other => Err(ClientError::UnsupportedFormat(other.to_string())),
    }
}

/// Apply environment overrides to a parsed config.
///
/// Takes a lookup function so tests do not have to touch the process
/// environment.
pub fn apply_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ClientError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(name) = lookup(APPLICATION_NAME_ENV) {
        config.application.name = name;
    }
    if let Some(uri) = lookup(PDL_BASE_URI_ENV) {
        config.pdl.base_uri = Url::parse(&uri).map_err(|e| ClientError::UriParse {
            source: Box::new(e),
        })?;
    }
    Ok(())
}

/// Read, parse, override, and validate the config file at `path`.
pub async fn load(path: &Path) -> Result<Config, ClientError> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ClientError::ConfigFileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ClientError::Io(e)
        }
    })?;

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    let mut config = parse_config_str(ext, &content, &path.display().to_string())?;
    apply_overrides(&mut config, |key| std::env::var(key).ok())?;

    if let Err(errors) = validate(&config) {
        return Err(ClientError::ConfigValidation { errors });
    }

    tracing::debug!(
        path = %path.display(),
        pdl = %config.pdl.base_uri,
        registrations = config.token_x.registration.len(),
        "config loaded"
    );
    Ok(config)
}
