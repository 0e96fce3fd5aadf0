//! Integration tests for config loading across all file formats.

use pdl_client::config::model::{Config, GrantType};
use pdl_client::config::validation::validate;
use pdl_client::config::{load, parse_config_str};
use pdl_client::error::ClientError;
use pdl_client::tokenx::find_match;

fn load_example(name: &str) -> String {
    let path = format!("example/{name}");
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("failed to read {path}: {e}"))
}

fn assert_example_shape(config: &Config) {
    assert_eq!(config.application.name, "aap-soknad-api");
    assert_eq!(config.token_x.registration.len(), 2);
    assert_eq!(
        config.system_credentials().map(|c| c.grant_type),
        Some(GrantType::ClientCredentials)
    );
    // The first DNS label of the PDL host selects the token-exchange registration.
    let matched = find_match(&config.token_x.registration, &config.pdl.base_uri).unwrap();
    assert_eq!(matched.audience.as_deref(), Some("dev-fss:pdl:pdl-api"));
}

#[test]
fn yaml_example_loads_and_validates() {
    let content = load_example("pdl-client.yaml");
    let config = parse_config_str("yaml", &content, "pdl-client.yaml").unwrap();
    validate(&config).unwrap();
    assert_example_shape(&config);
    assert_eq!(
        config.pdl.ping_endpoint().as_str(),
        "https://pdl-api.dev-fss-pub.nais.io/graphql/internal/health/liveness"
    );
}

#[cfg(feature = "json")]
#[test]
fn json_example_loads_and_validates() {
    let content = load_example("pdl-client.json");
    let config = parse_config_str("json", &content, "pdl-client.json").unwrap();
    validate(&config).unwrap();
    assert_example_shape(&config);
}

#[cfg(feature = "toml")]
#[test]
fn toml_example_loads_and_validates() {
    let content = load_example("pdl-client.toml");
    let config = parse_config_str("toml", &content, "pdl-client.toml").unwrap();
    validate(&config).unwrap();
    assert_example_shape(&config);
}

#[cfg(all(feature = "json", feature = "toml"))]
#[test]
fn all_formats_produce_equivalent_configs() {
    let yaml = parse_config_str("yaml", &load_example("pdl-client.yaml"), "yaml").unwrap();
    let json = parse_config_str("json", &load_example("pdl-client.json"), "json").unwrap();
    let toml = parse_config_str("toml", &load_example("pdl-client.toml"), "toml").unwrap();

    let as_value = |c: &Config| serde_json::to_value(c).unwrap();
    assert_eq!(as_value(&yaml), as_value(&json));
    assert_eq!(as_value(&yaml), as_value(&toml));
}

#[test]
fn minimal_yaml_uses_defaults() {
    let config = parse_config_str(
        "yaml",
        "pdl:\n  base_uri: https://pdl.example.com\n",
        "minimal.yaml",
    )
    .unwrap();
    validate(&config).unwrap();

    assert!(config.pdl.enabled);
    assert_eq!(config.pdl.ping_path, "/");
    assert!(config.token_x.registration.is_empty());
    assert!(config.system_credentials().is_none());
}

#[test]
fn unknown_field_is_rejected() {
    let result = parse_config_str(
        "yaml",
        "pdl:\n  base_uri: https://pdl.example.com\n  retries: 3\n",
        "typo.yaml",
    );
    assert!(matches!(result, Err(ClientError::ConfigParse { .. })));
}

#[tokio::test]
async fn load_reports_missing_file() {
    let err = load(std::path::Path::new("example/does-not-exist.yaml"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::ConfigFileNotFound { .. }));
}

#[tokio::test]
async fn load_reads_and_validates_example() {
    let config = load(std::path::Path::new("example/pdl-client.yaml"))
        .await
        .unwrap();
    assert_example_shape(&config);
}
