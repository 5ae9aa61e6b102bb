//! Standard errors used by all functions in the crate.

use std::fmt;

/// Error collecting all possible failures of the Twikey client.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Reqwest error.
    ///
    /// Covers transport failures as well as response bodies that could not be decoded.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    /// Error returned by a Twikey API endpoint.
    #[error("{0}")]
    ApiError(#[from] ApiError),
    /// The login exchange did not yield a session token.
    #[error("Not authenticated")]
    Unauthenticated,
    /// The configured private key is not a valid hex string.
    #[error("Invalid private key: expected a hex encoded string")]
    InvalidPrivateKey,
    /// Account information could not be decrypted.
    #[error("Unable to decrypt account information: {0}")]
    DecryptionError(String),
    /// Catch-all variant for unexpected errors.
    #[error(transparent)]
    Other(anyhow::Error),
}

impl From<reqwest_middleware::Error> for Error {
    fn from(e: reqwest_middleware::Error) -> Self {
        match e {
            reqwest_middleware::Error::Reqwest(e) => Error::HttpError(e),
            reqwest_middleware::Error::Middleware(e) => {
                e.downcast::<Error>().unwrap_or_else(Error::Other)
            }
        }
    }
}

impl From<Error> for reqwest_middleware::Error {
    fn from(e: Error) -> Self {
        reqwest_middleware::Error::Middleware(e.into())
    }
}

/// Twikey HTTP APIs error.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status returned by the server.
    pub status: u16,
    /// Message describing the failure.
    ///
    /// Taken from the `ApiError` response header when present, then from the `message` or `code`
    /// field of the JSON body, and finally falls back to `status=<code>`.
    pub message: String,
    /// Machine readable error code, if the server returned one.
    pub code: Option<String>,
    /// Additional context returned by the server (e.g. the offending field).
    pub extra: Option<String>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Twikey HTTP error {}: {}", self.status, self.message)?;

        if let Some(ref code) = self.code {
            if code != &self.message {
                write!(f, " ({})", code)?;
            }
        }

        if let Some(ref extra) = self.extra {
            write!(f, "\nAdditional details: {}", extra)?;
        }

        Ok(())
    }
}
