pub mod auth;
pub mod client;
pub mod error;
pub mod net;
pub mod response;
pub mod session;

pub use client::{base_url, Client, ConfigOptions, TlsMode, AUTH_TOKEN_HEADER};
pub use error::ApiError;
pub use net::SelfIp;
pub use session::{AuthenticatedSession, HttpConnector, SessionConnector};
