use crate::{
    apis::{auth::SessionToken, TwikeyClientInner},
    Error,
};
use std::sync::Arc;

/// Twikey authentication API client.
#[derive(Debug, Clone)]
pub struct AuthApi {
    inner: Arc<TwikeyClientInner>,
}

impl AuthApi {
    pub(crate) fn new(inner: Arc<TwikeyClientInner>) -> Self {
        Self { inner }
    }

    /// Returns the [`SessionToken`](crate::apis::auth::SessionToken) used to authenticate to the Twikey APIs.
    ///
    /// If the client has not logged in yet, or the current session is older than the configured
    /// maximum session age, a new login using the configured API key (and OTP) is performed.
    pub async fn get_session_token(&self) -> Result<SessionToken, Error> {
        self.inner.authenticator.get_session_token().await
    }

    /// Discards the current session, forcing a new login on the next call.
    pub async fn logout(&self) {
        self.inner.authenticator.invalidate().await
    }
}
