use crate::{
    apis::{
        auth::{SessionToken, Token},
        FormParams,
    },
    common::{API_ERROR_HEADER, FORM_CONTENT_TYPE},
    error::Error,
};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use reqwest::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    Url,
};
use reqwest_middleware::ClientWithMiddleware;
use sha2::Sha256;
use std::{
    fmt::{Debug, Formatter},
    sync::Arc,
};
use tokio::sync::Mutex;

type HmacSha256 = Hmac<Sha256>;

/// Salt prepended to the private key when deriving the OTP key.
static OTP_SALT: &str = "own";

/// Length of an OTP time window, in milliseconds.
const OTP_WINDOW_MILLIS: i64 = 30_000;

/// Manager for the API key and the session token derived from it.
///
/// Clones share the same session.
#[derive(Clone)]
pub struct Authenticator {
    client: ClientWithMiddleware,
    login_url: Url,
    api_key: Token,
    private_key: Option<Token>,
    max_session_age: Duration,
    session: Arc<Mutex<Option<SessionToken>>>,
}

impl Authenticator {
    /// Creates a new authenticator with an empty session.
    pub fn new(
        client: ClientWithMiddleware,
        login_url: Url,
        api_key: Token,
        private_key: Option<Token>,
        max_session_age: Duration,
    ) -> Self {
        Self {
            client,
            login_url,
            api_key,
            private_key,
            max_session_age,
            session: Arc::new(Mutex::new(None)),
        }
    }

    /// Returns the API key this authenticator logs in with.
    pub fn api_key(&self) -> &Token {
        &self.api_key
    }

    /// Returns the current session token used for authentication against the Twikey APIs.
    ///
    /// If there's no session yet, or the current one is older than the maximum session age,
    /// a new login is performed with the API key (and an OTP if a private key is configured).
    ///
    /// The check and the refresh happen under a single lock, so concurrent callers
    /// trigger at most one login.
    #[tracing::instrument(name = "Get Session Token", level = "debug", skip(self))]
    pub async fn get_session_token(&self) -> Result<SessionToken, Error> {
        let mut session = self.session.lock().await;

        if let Some(current) = session.as_ref() {
            if !self.is_expired(current) {
                tracing::debug!("Reusing existing session token");
                return Ok(current.clone());
            }
        }

        let mut form = FormParams::new();
        form.push("apiToken", self.api_key.expose_secret());
        if let Some(private_key) = &self.private_key {
            let otp = generate_otp(private_key.expose_secret(), otp_counter(now()))?;
            form.push("otp", otp);
        }

        let res = match self
            .client
            .post(self.login_url.clone())
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(form.encode())
            .send()
            .await
        {
            Ok(res) => res,
            Err(e) => {
                *session = None;
                return Err(e.into());
            }
        };

        let token = res
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(Token::new);

        match token {
            Some(token) => {
                let new_session = SessionToken {
                    token,
                    last_login: now(),
                };
                *session = Some(new_session.clone());

                tracing::info!("Got new session token");

                Ok(new_session)
            }
            None => {
                *session = None;

                tracing::warn!(
                    status = res.status().as_u16(),
                    api_error = res
                        .headers()
                        .get(API_ERROR_HEADER)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default(),
                    "Login did not return a session token"
                );

                Err(Error::Unauthenticated)
            }
        }
    }

    /// Drops the current session, if any.
    pub async fn invalidate(&self) {
        *self.session.lock().await = None;
    }

    fn is_expired(&self, session: &SessionToken) -> bool {
        now() - session.last_login > self.max_session_age
    }
}

impl Debug for Authenticator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("login_url", &self.login_url)
            .field("api_key", &self.api_key)
            .field("private_key", &self.private_key)
            .field("max_session_age", &self.max_session_age)
            .finish_non_exhaustive()
    }
}

/// Number of 30 seconds windows elapsed since the Unix epoch.
fn otp_counter(at: DateTime<Utc>) -> u64 {
    (at.timestamp_millis() / OTP_WINDOW_MILLIS) as u64
}

/// Computes the one-time password sent along with the API key when enhanced security is enabled.
///
/// The HMAC-SHA256 key is the `own` salt followed by the hex decoded private key, the message
/// is the big-endian counter. The truncation offset is read from byte 19 of the digest, which is
/// what the Twikey servers expect.
pub(crate) fn generate_otp(private_key: &str, counter: u64) -> Result<u32, Error> {
    let secret = hex::decode(private_key).map_err(|_| Error::InvalidPrivateKey)?;

    let mut key = OTP_SALT.as_bytes().to_vec();
    key.extend_from_slice(&secret);

    let mut mac = HmacSha256::new_from_slice(&key).map_err(|_| Error::InvalidPrivateKey)?;
    mac.update(&counter.to_be_bytes());
    let hash = mac.finalize().into_bytes();

    let offset = (hash[19] & 0x0f) as usize;
    let value = u32::from_be_bytes([
        hash[offset] & 0x7f,
        hash[offset + 1],
        hash[offset + 2],
        hash[offset + 3],
    ]);

    Ok(value % 100_000_000)
}

// Select an implementation of `now()` depending on whether we are testing or not
#[cfg(not(test))]
fn now() -> DateTime<Utc> {
    Utc::now()
}
#[cfg(test)]
use tests::mocked_time::now;
