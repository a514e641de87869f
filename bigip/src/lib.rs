pub mod api;
pub mod config;
pub mod logging;
pub mod resources;
pub mod validators;

pub use config::{ClientError, Config};

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tfplug::{validate_all, Diagnostics, Provider, TfplugError, Validator};

use api::{Client, ConfigOptions, TlsMode};
use logging::{Logger, TracingLogger};

/// Login provider used for token auth when none is configured.
pub const DEFAULT_LOGIN_REF: &str = "tmos";

pub struct BigipProvider {
    client: Option<Client>,
    logger: Box<dyn Logger>,
}

impl Default for BigipProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl BigipProvider {
    pub fn new() -> Self {
        Self::with_logger(Box::new(TracingLogger))
    }

    pub fn with_logger(logger: Box<dyn Logger>) -> Self {
        Self {
            client: None,
            logger,
        }
    }

    /// Client built by the last successful `configure`.
    pub fn client(&self) -> tfplug::Result<&Client> {
        self.client.as_ref().ok_or(TfplugError::ProviderNotConfigured)
    }
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn string_setting(config: &tfplug::Config, key: &str, env: &str) -> Option<String> {
    config
        .get_string(key)
        .map(|s| s.to_string())
        .or_else(|| env_string(env))
}

fn bool_setting(config: &tfplug::Config, key: &str, env: &str) -> Option<bool> {
    config
        .get_bool(key)
        .or_else(|| env_string(env).and_then(|v| v.parse::<bool>().ok()))
}

fn seconds_setting(config: &tfplug::Config, key: &str, env: &str) -> Option<Duration> {
    config
        .get_number(key)
        .filter(|n| *n > 0.0)
        .map(|n| n as u64)
        .or_else(|| env_string(env).and_then(|v| v.parse::<u64>().ok()))
        .map(Duration::from_secs)
}

/// Connection settings from provider configuration, falling back to
/// `BIGIP_*` environment variables.
pub fn connection_config(config: &tfplug::Config) -> Config {
    let token_auth = bool_setting(config, "token_auth", "BIGIP_TOKEN_AUTH").unwrap_or(false);
    let login_reference = token_auth.then(|| {
        string_setting(config, "login_ref", "BIGIP_LOGIN_REF")
            .unwrap_or_else(|| DEFAULT_LOGIN_REF.to_string())
    });

    let mut options = ConfigOptions::default();
    if let Some(timeout) = seconds_setting(config, "api_timeout", "BIGIP_API_TIMEOUT") {
        options.api_call_timeout = timeout;
    }
    options.token_timeout = seconds_setting(config, "token_timeout", "BIGIP_TOKEN_TIMEOUT");
    let verify_disabled =
        bool_setting(config, "validate_certs_disable", "BIGIP_VERIFY_CERT_DISABLE").unwrap_or(true);
    options.tls = match string_setting(config, "trusted_cert_path", "BIGIP_TRUSTED_CERT_PATH") {
        Some(path) if !verify_disabled => TlsMode::CustomCa(PathBuf::from(path)),
        _ if !verify_disabled => TlsMode::System,
        _ => TlsMode::DangerAcceptInvalid,
    };

    Config {
        address: string_setting(config, "address", "BIGIP_HOST").unwrap_or_default(),
        port: string_setting(config, "port", "BIGIP_PORT").unwrap_or_default(),
        username: string_setting(config, "username", "BIGIP_USER").unwrap_or_default(),
        password: string_setting(config, "password", "BIGIP_PASSWORD").unwrap_or_default(),
        login_reference,
        config_options: Some(options),
    }
}

#[async_trait]
impl Provider for BigipProvider {
    async fn configure(&mut self, config: tfplug::Config) -> Diagnostics {
        let mut diags = Diagnostics::new();
        let connection = connection_config(&config);
        tracing::debug!("Configuring provider with {:?}", connection);

        match connection.client(self.logger.as_ref()).await {
            Ok(client) => {
                self.client = Some(client);
            }
            Err(e) => {
                self.client = None;
                diags.add_error("Failed to create BigIP client", Some(e.to_string()));
            }
        }

        diags
    }

    fn resource_types(&self) -> Vec<String> {
        resources::resource_types().map(str::to_string).collect()
    }

    fn validate_resource_config(&self, resource_type: &str, config: &tfplug::Config) -> Diagnostics {
        let mut diags = Diagnostics::new();

        let Some(rules) = resources::attribute_rules(resource_type) else {
            diags.add_error(format!("Unknown resource: {}", resource_type), None::<String>);
            return diags;
        };

        for (attribute, rule) in rules {
            if let Some(value) = config.get(attribute) {
                diags.extend(validate_all(&[rule as &dyn Validator], value, attribute));
            }
        }

        diags
    }
}
