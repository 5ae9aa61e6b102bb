use crate::{
    common::API_ERROR_HEADER,
    error::{ApiError, Error},
};
use async_trait::async_trait;
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next};
use task_local_extensions::Extensions;

/// Reqwest middleware which translates error responses returned from Twikey APIs
/// into [`Error::ApiError`](crate::error::Error)s.
pub struct ErrorHandlingMiddleware;

#[async_trait]
impl Middleware for ErrorHandlingMiddleware {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        let response = next.run(req, extensions).await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let header_message = response
                .headers()
                .get(API_ERROR_HEADER)
                .and_then(|v| v.to_str().ok())
                .filter(|v| !v.trim().is_empty())
                .map(str::to_string);
            let bytes = response.bytes().await?;

            tracing::debug!("Failed HTTP request. Status code: {}", status);

            // Bodies that are not JSON, or not shaped like an error, are ignored
            let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap_or_default();

            return Err(Error::ApiError(body.into_api_error(status, header_message)).into());
        }

        Ok(response)
    }
}

/// Error body returned by Twikey APIs.
#[derive(serde::Deserialize, Debug, Default)]
#[serde(default)]
struct ErrorResponse {
    code: Option<String>,
    message: Option<String>,
    extra: Option<serde_json::Value>,
}

impl ErrorResponse {
    fn into_api_error(self, status: u16, header_message: Option<String>) -> ApiError {
        let message = header_message
            .or_else(|| self.message.clone())
            .or_else(|| self.code.clone())
            .unwrap_or_else(|| format!("status={}", status));

        ApiError {
            status,
            message,
            code: self.code,
            extra: self.extra.and_then(|extra| match extra {
                serde_json::Value::Null => None,
                serde_json::Value::String(s) => Some(s),
                other => Some(other.to_string()),
            }),
        }
    }
}
