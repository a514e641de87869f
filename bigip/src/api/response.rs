//! Response handling utilities for the BigIP iControl REST API

use super::ApiError;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Error body returned by iControl REST, e.g.
/// `{"code":401,"message":"Authentication failed.","errorStack":[]}`
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub code: Option<u16>,
    pub message: Option<String>,
}

pub struct BigipResponseHandler;

impl BigipResponseHandler {
    pub async fn extract_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        let text = response.text().await?;
        tracing::debug!("Response status: {}", status);

        if status.is_success() {
            serde_json::from_str::<T>(&text).map_err(|e| {
                tracing::error!("Failed to parse response: {}, body: {}", e, text);
                ApiError::ParseError(format!("Failed to parse response: {}", e))
            })
        } else {
            Err(Self::extract_error(status.as_u16(), text))
        }
    }

    pub async fn extract_empty_response(response: reqwest::Response) -> Result<(), ApiError> {
        let status = response.status();

        if status.is_success() {
            Ok(())
        } else {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(Self::extract_error(status.as_u16(), text))
        }
    }

    fn extract_error(status: u16, text: String) -> ApiError {
        let message = serde_json::from_str::<ApiErrorResponse>(&text)
            .ok()
            .and_then(|body| body.message)
            .unwrap_or(text);

        tracing::error!("API error response ({}): {}", status, message);

        if status == 401 {
            return ApiError::AuthError(message);
        }

        ApiError::ApiError { status, message }
    }
}
