//! Capabilities the session factory needs from a BigIP client.

use async_trait::async_trait;

use super::client::Client;
use super::error::ApiError;
use super::net::SelfIp;
use crate::config::Config;

/// An authenticated handle that can be probed for reachability.
#[async_trait]
pub trait AuthenticatedSession: Send + Sync {
    async fn self_ips(&self) -> Result<Vec<SelfIp>, ApiError>;
}

#[async_trait]
impl AuthenticatedSession for Client {
    async fn self_ips(&self) -> Result<Vec<SelfIp>, ApiError> {
        self.net().self_ips().await
    }
}

/// Builds sessions of either authentication mode.
#[async_trait]
pub trait SessionConnector: Send + Sync {
    type Session: AuthenticatedSession;

    async fn token_session(
        &self,
        config: &Config,
        login_reference: &str,
    ) -> Result<Self::Session, ApiError>;

    fn basic_session(&self, config: &Config) -> Result<Self::Session, ApiError>;
}

/// Connector producing real HTTP sessions.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpConnector;

#[async_trait]
impl SessionConnector for HttpConnector {
    type Session = Client;

    async fn token_session(
        &self,
        config: &Config,
        login_reference: &str,
    ) -> Result<Client, ApiError> {
        Client::new_token_session(
            &config.address,
            &config.port,
            &config.username,
            &config.password,
            login_reference,
            &config.options(),
        )
        .await
    }

    fn basic_session(&self, config: &Config) -> Result<Client, ApiError> {
        Client::new_session(
            &config.address,
            &config.port,
            &config.username,
            &config.password,
            &config.options(),
        )
    }
}
