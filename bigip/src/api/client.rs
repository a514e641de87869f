use reqwest::header::HeaderValue;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::net::Ipv6Addr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use super::error::ApiError;
use super::response::BigipResponseHandler;
use crate::validators::device_uri;

/// Header carrying the token issued by `/mgmt/shared/authn/login`
pub const AUTH_TOKEN_HEADER: &str = "X-F5-Auth-Token";

/// Certificate verification mode for the management interface.
#[derive(Debug, Clone, PartialEq)]
pub enum TlsMode {
    /// Use the system certificate store.
    System,
    /// Trust the CA certificate in the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (self-signed management certs).
    DangerAcceptInvalid,
}

/// Transport options for a BigIP session.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigOptions {
    pub api_call_timeout: Duration,
    /// Lifetime to request for a login token right after it is issued.
    pub token_timeout: Option<Duration>,
    pub tls: TlsMode,
}

impl Default for ConfigOptions {
    fn default() -> Self {
        Self {
            api_call_timeout: Duration::from_secs(60),
            token_timeout: None,
            tls: TlsMode::DangerAcceptInvalid,
        }
    }
}

impl ConfigOptions {
    pub fn build_http_client(&self) -> Result<reqwest::Client, ApiError> {
        let mut builder = reqwest::Client::builder().timeout(self.api_call_timeout);

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let pem = std::fs::read(path).map_err(|e| {
                    ApiError::Tls(format!("failed to read {}: {}", path.display(), e))
                })?;
                let cert = reqwest::Certificate::from_pem(&pem)
                    .map_err(|e| ApiError::Tls(format!("invalid CA certificate: {}", e)))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        Ok(builder.build()?)
    }
}

#[derive(Clone)]
pub(crate) enum Auth {
    Basic { username: String, password: String },
    Token(String),
}

/// BigIP iControl REST client
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: reqwest::Client,
    base_url: String,
    auth: Auth,
}

impl Client {
    /// Basic-auth session. Credentials are only checked by the device on the
    /// first request.
    pub fn new_session(
        address: &str,
        port: &str,
        username: &str,
        password: &str,
        options: &ConfigOptions,
    ) -> Result<Self, ApiError> {
        let http_client = options.build_http_client()?;
        Ok(Self::from_parts(
            http_client,
            base_url(address, port),
            Auth::Basic {
                username: username.to_string(),
                password: password.to_string(),
            },
        ))
    }

    pub(crate) fn from_parts(http_client: reqwest::Client, base_url: String, auth: Auth) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                http_client,
                base_url,
                auth,
            }),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Login token, for token sessions
    pub fn token(&self) -> Option<&str> {
        match &self.inner.auth {
            Auth::Token(token) => Some(token),
            Auth::Basic { .. } => None,
        }
    }

    /// Network API operations
    pub fn net(&self) -> crate::api::net::NetApi<'_> {
        crate::api::net::NetApi::new(self)
    }

    /// Execute an authenticated GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = format!("{}{}", self.inner.base_url, path);
        tracing::debug!("GET request to: {}", url);

        let response = self
            .authorize(self.inner.http_client.get(&url))?
            .send()
            .await?;
        BigipResponseHandler::extract_response(response).await
    }

    /// Execute an authenticated PATCH request, ignoring the response body
    pub async fn patch<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let url = format!("{}{}", self.inner.base_url, path);
        tracing::debug!("PATCH request to: {}", url);

        let response = self
            .authorize(self.inner.http_client.patch(&url))?
            .json(body)
            .send()
            .await?;
        BigipResponseHandler::extract_empty_response(response).await
    }

    fn authorize(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder, ApiError> {
        match &self.inner.auth {
            Auth::Basic { username, password } => {
                Ok(request.basic_auth(username, Some(password)))
            }
            Auth::Token(token) => Ok(request.header(AUTH_TOKEN_HEADER, token_header(token)?)),
        }
    }
}

/// `X-F5-Auth-Token` value for a login token.
pub(crate) fn token_header(token: &str) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(token)
        .map_err(|_| ApiError::AuthError("login token is not a valid header value".to_string()))
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let auth = match self.inner.auth {
            Auth::Basic { .. } => "basic",
            Auth::Token(_) => "token",
        };
        f.debug_struct("Client")
            .field("base_url", &self.inner.base_url)
            .field("auth", &auth)
            .finish()
    }
}

/// Management URL for an address that may or may not carry a scheme.
///
/// `10.1.1.1` + `8443` gives `https://10.1.1.1:8443`; a port embedded in a
/// scheme-qualified address wins over the configured one.
pub fn base_url(address: &str, port: &str) -> String {
    let address = address.trim().trim_end_matches('/');
    let port = Some(port.trim()).filter(|p| !p.is_empty());

    match device_uri(address) {
        Some(uri) => {
            let port = uri.port.as_deref().or(port);
            match port {
                Some(port) => format!("{}://{}:{}", uri.scheme, uri.host, port),
                None => format!("{}://{}", uri.scheme, uri.host),
            }
        }
        None => {
            let host = match address.parse::<Ipv6Addr>() {
                Ok(_) => format!("[{}]", address),
                Err(_) => address.to_string(),
            };
            match port {
                Some(port) => format!("https://{}:{}", host, port),
                None => format!("https://{}", host),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[test]
    fn base_url_defaults_to_https() {
        assert_eq!(base_url("10.1.1.1", ""), "https://10.1.1.1");
        assert_eq!(base_url("bigip.example.com", "8443"), "https://bigip.example.com:8443");
    }

    #[test]
    fn base_url_keeps_scheme_and_embedded_port() {
        assert_eq!(base_url("http://127.0.0.1:1234/", ""), "http://127.0.0.1:1234");
        assert_eq!(base_url("https://10.1.1.1:443", "8443"), "https://10.1.1.1:443");
        assert_eq!(base_url("https://10.1.1.1", "8443"), "https://10.1.1.1:8443");
    }

    #[test]
    fn base_url_brackets_ipv6_hosts() {
        assert_eq!(base_url("2001:db8::1", "443"), "https://[2001:db8::1]:443");
        assert_eq!(base_url("2001:db8::1", ""), "https://[2001:db8::1]");
        assert_eq!(base_url("[2001:db8::1]", "8443"), "https://[2001:db8::1]:8443");
    }

    #[test]
    fn custom_ca_must_be_readable() {
        let options = ConfigOptions {
            tls: TlsMode::CustomCa(PathBuf::from("/nonexistent/ca.pem")),
            ..Default::default()
        };

        let result = options.build_http_client();
        assert!(matches!(result, Err(ApiError::Tls(_))));
    }

    #[test]
    fn default_options_match_device_defaults() {
        let options = ConfigOptions::default();
        assert_eq!(options.api_call_timeout, Duration::from_secs(60));
        assert_eq!(options.token_timeout, None);
        assert_eq!(options.tls, TlsMode::DangerAcceptInvalid);
    }

    #[tokio::test]
    async fn basic_session_sends_credentials() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/mgmt/tm/sys/version")
            .match_header("authorization", "Basic YWRtaW46c2VjcmV0")
            .with_body(r#"{"kind":"tm:sys:version:versionstats"}"#)
            .create_async()
            .await;

        let client =
            Client::new_session(&server.url(), "", "admin", "secret", &ConfigOptions::default())
                .unwrap();
        assert!(client.token().is_none());

        let body: serde_json::Value = client.get("/mgmt/tm/sys/version").await.unwrap();
        assert_eq!(body["kind"], "tm:sys:version:versionstats");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn client_handles_network_errors() {
        let client = Client::new_session(
            "http://127.0.0.1:1",
            "",
            "admin",
            "secret",
            &ConfigOptions::default(),
        )
        .unwrap();

        let result: Result<serde_json::Value, _> = client.get("/mgmt/tm/net/self").await;
        assert!(matches!(result, Err(ApiError::RequestError(_))));
    }

    #[test]
    fn debug_output_hides_credentials() {
        let client = Client::new_session(
            "10.1.1.1",
            "",
            "admin",
            "hunter2",
            &ConfigOptions::default(),
        )
        .unwrap();

        let rendered = format!("{:?}", client);
        assert!(rendered.contains("https://10.1.1.1"));
        assert!(!rendered.contains("hunter2"));
    }
}
