//! Connection configuration and the session factory.

use std::fmt;
use thiserror::Error;

use crate::api::{
    ApiError, AuthenticatedSession, Client, ConfigOptions, HttpConnector, SessionConnector,
};
use crate::logging::Logger;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("BigIP provider requires address, username and password")]
    MissingRequiredFields,

    /// Token login rejected or unreachable
    #[error(transparent)]
    Authentication(ApiError),

    /// The HTTP client for a basic session could not be built
    #[error("Failed to build BigIP session: {0}")]
    Transport(ApiError),

    /// Post-login self-IP probe failed
    #[error(transparent)]
    ConnectionValidation(ApiError),
}

/// Parameters for one BigIP connection.
#[derive(Clone, Default)]
pub struct Config {
    pub address: String,
    pub port: String,
    pub username: String,
    pub password: String,
    /// Identity provider name; switches the factory to token login.
    pub login_reference: Option<String>,
    pub config_options: Option<ConfigOptions>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("address", &self.address)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("login_reference", &self.login_reference)
            .field("config_options", &self.config_options)
            .finish()
    }
}

impl Config {
    pub fn new(
        address: impl Into<String>,
        port: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            port: port.into(),
            username: username.into(),
            password: password.into(),
            login_reference: None,
            config_options: None,
        }
    }

    pub fn with_login_reference(mut self, reference: impl Into<String>) -> Self {
        self.login_reference = Some(reference.into());
        self
    }

    pub fn with_options(mut self, options: ConfigOptions) -> Self {
        self.config_options = Some(options);
        self
    }

    /// Transport options, falling back to the defaults.
    pub fn options(&self) -> ConfigOptions {
        self.config_options.clone().unwrap_or_default()
    }

    fn login_reference(&self) -> Option<&str> {
        self.login_reference.as_deref().filter(|r| !r.is_empty())
    }

    /// Authenticated HTTP client for this configuration.
    pub async fn client(&self, logger: &dyn Logger) -> Result<Client, ClientError> {
        self.client_with(&HttpConnector, logger).await
    }

    /// Session factory over an arbitrary connector.
    ///
    /// Token login is used when a login reference is set, basic auth
    /// otherwise. The new session is then probed by listing self IPs; an
    /// empty list only logs a warning.
    pub async fn client_with<C: SessionConnector>(
        &self,
        connector: &C,
        logger: &dyn Logger,
    ) -> Result<C::Session, ClientError> {
        if self.address.is_empty() || self.username.is_empty() || self.password.is_empty() {
            return Err(ClientError::MissingRequiredFields);
        }

        logger.info("Initializing BigIP connection");

        let session = match self.login_reference() {
            Some(reference) => connector
                .token_session(self, reference)
                .await
                .map_err(|e| {
                    logger.error(&format!("Error creating New Token Session {}", e));
                    ClientError::Authentication(e)
                })?,
            None => connector
                .basic_session(self)
                .map_err(ClientError::Transport)?,
        };

        validate_connection(&session, logger).await?;
        Ok(session)
    }
}

async fn validate_connection<S: AuthenticatedSession>(
    session: &S,
    logger: &dyn Logger,
) -> Result<(), ClientError> {
    match session.self_ips().await {
        Ok(ips) if ips.is_empty() => {
            logger.warn("Could not validate connection to BigIP");
            Ok(())
        }
        Ok(_) => Ok(()),
        Err(e) => {
            logger.error(&format!(
                "Connection to BigIP device could not have been validated: {}",
                e
            ));
            Err(ClientError::ConnectionValidation(e))
        }
    }
}
