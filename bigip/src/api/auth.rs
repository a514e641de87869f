//! Token-based login through an identity provider reference

use serde::{Deserialize, Serialize};

use super::client::{base_url, token_header, Auth, Client, ConfigOptions};
use super::error::ApiError;
use super::response::BigipResponseHandler;

pub const LOGIN_PATH: &str = "/mgmt/shared/authn/login";
pub const TOKENS_PATH: &str = "/mgmt/shared/authz/tokens";

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
    #[serde(rename = "loginProviderName")]
    pub login_provider_name: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: AuthToken,
}

#[derive(Debug, Deserialize)]
pub struct AuthToken {
    pub token: String,
    #[serde(default)]
    pub timeout: Option<u64>,
}

#[derive(Debug, Serialize)]
struct TokenTimeout {
    timeout: u64,
}

impl Client {
    /// Log in with `login_reference` as the provider name and build a session
    /// that authenticates with the issued token.
    pub async fn new_token_session(
        address: &str,
        port: &str,
        username: &str,
        password: &str,
        login_reference: &str,
        options: &ConfigOptions,
    ) -> Result<Self, ApiError> {
        let http_client = options.build_http_client()?;
        let base_url = base_url(address, port);
        let url = format!("{}{}", base_url, LOGIN_PATH);
        tracing::debug!("POST request to: {}", url);

        let response = http_client
            .post(&url)
            .json(&LoginRequest {
                username,
                password,
                login_provider_name: login_reference,
            })
            .send()
            .await?;
        let login: LoginResponse = BigipResponseHandler::extract_response(response).await?;
        tracing::debug!(
            "Issued token via {} with timeout {:?}",
            login_reference,
            login.token.timeout
        );

        token_header(&login.token.token)?;
        let client = Client::from_parts(http_client, base_url, Auth::Token(login.token.token));

        if let Some(timeout) = options.token_timeout {
            client.set_token_timeout(timeout.as_secs()).await?;
        }

        Ok(client)
    }

    /// Extend the lifetime of this session's token, in seconds.
    pub async fn set_token_timeout(&self, seconds: u64) -> Result<(), ApiError> {
        let token = self
            .token()
            .ok_or_else(|| ApiError::AuthError("session has no login token".to_string()))?;
        let path = format!("{}/{}", TOKENS_PATH, token);
        self.patch(&path, &TokenTimeout { timeout: seconds }).await
    }
}
