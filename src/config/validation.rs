//! Configuration validation with detailed error reporting.
//!
//! The [`validate`] function checks a parsed [`Config`] for structural
//! errors such as non-HTTP base URIs, zero timeouts, credentials without a
//! client id, and a system credential key that is not registered.
//! Returns a list of [`ValidationError`] values with per-field suggestions.

use http::HeaderValue;
use url::Url;

use super::model::{Config, CredentialConfig, GrantType};
use crate::error::ValidationError;

/// Validate an absolute HTTP(S) URL. Returns `Ok(())` or a human-readable error.
pub fn validate_http_url(url: &Url) -> Result<(), String> {
    let scheme = url.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(format!(
            "unsupported scheme '{scheme}' (expected http or https)"
        ));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(format!("'{url}' has no host"));
    }
    Ok(())
}

fn validate_credential(key: &str, cred: &CredentialConfig, errors: &mut Vec<ValidationError>) {
    let field = |name: &str| format!("registration.{key}.{name}");

    if key.contains('.') {
        errors.push(ValidationError {
            section: "token_x".into(),
            field: format!("registration.{key}"),
            message: "registration keys are matched against the first DNS label only".into(),
            suggestion: key
                .split('.')
                .next()
                .map(|label| format!("did you mean '{label}'?")),
        });
    }

    if let Err(message) = validate_http_url(&cred.token_endpoint) {
        errors.push(ValidationError {
            section: "token_x".into(),
            field: field("token_endpoint"),
            message,
            suggestion: None,
        });
    }

    if cred.client_id.trim().is_empty() {
        errors.push(ValidationError {
            section: "token_x".into(),
            field: field("client_id"),
            message: "client_id cannot be empty".into(),
            suggestion: None,
        });
    }

    if cred.grant_type == GrantType::TokenExchange && cred.audience.is_none() {
        errors.push(ValidationError {
            section: "token_x".into(),
            field: field("audience"),
            message: "token_exchange requires an audience".into(),
            suggestion: Some("e.g. 'dev-fss:pdl:pdl-api'".into()),
        });
    }
}

pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.application.name.trim().is_empty() {
        errors.push(ValidationError {
            section: "application".into(),
            field: "name".into(),
            message: "name cannot be empty; it is the fallback consumer id".into(),
            suggestion: None,
        });
    } else if HeaderValue::from_str(&config.application.name).is_err() {
        errors.push(ValidationError {
            section: "application".into(),
            field: "name".into(),
            message: "name is sent as Nav-Consumer-Id and must be a valid header value".into(),
            suggestion: Some("remove control characters".into()),
        });
    }

    if let Err(message) = validate_http_url(&config.pdl.base_uri) {
        errors.push(ValidationError {
            section: "pdl".into(),
            field: "base_uri".into(),
            message,
            suggestion: None,
        });
    }

    if !config.pdl.ping_path.starts_with('/') {
        errors.push(ValidationError {
            section: "pdl".into(),
            field: "ping_path".into(),
            message: "ping_path must start with '/'".into(),
            suggestion: Some(format!("did you mean '/{}'?", config.pdl.ping_path)),
        });
    }

    if config.pdl.timeout == 0 {
        errors.push(ValidationError {
            section: "pdl".into(),
            field: "timeout".into(),
            message: "timeout must be greater than zero".into(),
            suggestion: Some("the default is 5000".into()),
        });
    }

    let mut keys: Vec<&String> = config.token_x.registration.keys().collect();
    keys.sort();
    for key in keys {
        validate_credential(key, &config.token_x.registration[key], &mut errors);
    }

    if let Some(ref key) = config.system_credentials {
        if !config.token_x.registration.contains_key(key) {
            errors.push(ValidationError {
                section: "(root)".into(),
                field: "system_credentials".into(),
                message: format!("'{key}' is not a token_x registration"),
                suggestion: None,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
