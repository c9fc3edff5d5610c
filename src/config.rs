use std::path::Path;

use anyhow::Result;
use clap::ValueEnum;
use clap_serde_derive::ClapSerde;
use serde::Deserialize;
use url::Url;

use crate::error::{RelayError, RelayResult};

pub const DEFAULT_CONFIG_FILE: &str = "ChatRelay.toml";
pub const DEFAULT_MODEL_ID: &str = "us.amazon.nova-lite-v1:0";

#[derive(ClapSerde, Debug, Clone)]
pub struct Config {
    /// Base URL of the text generation endpoint, `/generate` is appended to it
    #[arg(long, env = "FASTAPI_ENDPOINT")]
    pub(crate) fastapi_endpoint: String,

    /// Model identifier, only used for logging
    #[default(DEFAULT_MODEL_ID.to_string())]
    #[arg(long, env = "MODEL_ID")]
    pub(crate) model_id: String,

    /// Format of the emitted log lines
    #[default(LogFormat::Text)]
    #[arg(long, env = "LOG_FORMAT", value_enum)]
    pub(crate) log_format: LogFormat,
}

#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl Config {
    /// Resolves the configuration from the TOML file, the environment and the command line, in
    /// that order of priority. A missing default file is not an error.
    pub fn load(config_file: &str, opt: <Config as ClapSerde>::Opt) -> RelayResult<Self> {
        let config = match Self::from_toml(config_file) {
            Ok(file_opt) => Config::from(file_opt).merge(opt),
            Err(_) if config_file == DEFAULT_CONFIG_FILE && !Path::new(config_file).exists() => {
                Config::from(opt)
            }
            Err(err) => {
                return Err(RelayError::Config(format!(
                    "Failed to read configuration file {} with error: {}",
                    config_file, err
                )))
            }
        };
        config.validated()
    }

    pub fn from_toml(path: &str) -> Result<<Config as ClapSerde>::Opt> {
        let str = std::fs::read_to_string(path)?;
        let opt = toml::from_str(&str)?;
        Ok(opt)
    }

    /// Default configuration pointed at the given endpoint.
    pub fn with_endpoint(endpoint: &str) -> RelayResult<Self> {
        Config {
            fastapi_endpoint: endpoint.to_string(),
            ..Config::default()
        }
        .validated()
    }

    /// Checks that the endpoint is an absolute http(s) URL and drops a trailing slash so that
    /// `/generate` can be appended as is.
    pub fn validated(mut self) -> RelayResult<Self> {
        let endpoint = self.fastapi_endpoint.trim();
        if endpoint.is_empty() {
            return Err(RelayError::Config(
                "Environment variable 'FASTAPI_ENDPOINT' is not set".into(),
            ));
        }

        let url = Url::parse(endpoint).map_err(|e| {
            RelayError::Config(format!("Invalid FASTAPI_ENDPOINT '{}': {}", endpoint, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(RelayError::Config(format!(
                "Unsupported scheme '{}' in FASTAPI_ENDPOINT",
                url.scheme()
            )));
        }

        self.fastapi_endpoint = endpoint.strip_suffix('/').unwrap_or(endpoint).to_string();
        Ok(self)
    }

    pub fn fastapi_endpoint(&self) -> &str {
        &self.fastapi_endpoint
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    type ConfigOpt = <Config as ClapSerde>::Opt;

    fn opt(toml: &str) -> ConfigOpt {
        toml::from_str(toml).unwrap()
    }

    #[test]
    fn missing_endpoint_is_a_config_error() {
        let err = Config::default().validated().unwrap_err();
        assert_eq!(err.kind(), "config");
        assert!(err.to_string().contains("FASTAPI_ENDPOINT"));
    }

    #[test]
    fn endpoint_must_be_http() {
        assert!(Config::with_endpoint("not a url").is_err());
        assert!(Config::with_endpoint("ftp://example.com").is_err());
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let config = Config::with_endpoint("https://abc.ngrok.io/").unwrap();
        assert_eq!(config.fastapi_endpoint(), "https://abc.ngrok.io");
    }

    #[test]
    fn defaults_apply() {
        let config = Config::with_endpoint("http://localhost:8000").unwrap();
        assert_eq!(config.model_id(), DEFAULT_MODEL_ID);
        assert_eq!(config.log_format(), LogFormat::Text);
    }

    #[test]
    fn toml_values_are_read() {
        let opt: <Config as ClapSerde>::Opt = toml::from_str(
            r#"
            fastapi_endpoint = "http://10.0.0.1:8000"
            model_id = "local-phi"
            log_format = "json"
            "#,
        )
        .unwrap();
        let config = Config::from(opt).validated().unwrap();
        assert_eq!(config.fastapi_endpoint(), "http://10.0.0.1:8000");
        assert_eq!(config.model_id(), "local-phi");
        assert_eq!(config.log_format(), LogFormat::Json);
    }

    #[test]
    fn absent_default_file_is_ignored() {
        assert!(!Path::new(DEFAULT_CONFIG_FILE).exists());
        let config = Config::load(
            DEFAULT_CONFIG_FILE,
            opt(r#"fastapi_endpoint = "http://localhost:8000/""#),
        )
        .unwrap();
        assert_eq!(config.fastapi_endpoint(), "http://localhost:8000");
        assert_eq!(config.model_id(), DEFAULT_MODEL_ID);
    }

    #[test]
    fn absent_explicit_file_is_fatal() {
        let err = Config::load(
            "does-not-exist/relay.toml",
            opt(r#"fastapi_endpoint = "http://localhost:8000""#),
        )
        .unwrap_err();
        assert_eq!(err.kind(), "config");
        assert!(err.to_string().contains("does-not-exist/relay.toml"));
    }

    #[test]
    fn file_values_are_overridden_by_options() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "fastapi_endpoint = \"https://abc.ngrok.io/\"\nmodel_id = \"from-file\"\nlog_format = \"json\""
        )
        .unwrap();
        let path = file.path().to_str().unwrap();

        let config = Config::load(path, opt(r#"model_id = "from-cli""#)).unwrap();
        assert_eq!(config.fastapi_endpoint(), "https://abc.ngrok.io");
        assert_eq!(config.model_id(), "from-cli");
        assert_eq!(config.log_format(), LogFormat::Json);
    }

    #[test]
    fn file_without_endpoint_fails_validation() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "model_id = \"from-file\"").unwrap();

        let err = Config::load(file.path().to_str().unwrap(), opt("")).unwrap_err();
        assert_eq!(err.kind(), "config");
        assert!(err.to_string().contains("FASTAPI_ENDPOINT"));
    }
}
