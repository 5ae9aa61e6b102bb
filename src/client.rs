//! Module containing the main Twikey API client.

use crate::{
    apis::{
        auth::{AuthApi, Token},
        documents::DocumentsApi,
        invoices::InvoicesApi,
        paylinks::PaylinksApi,
        refunds::RefundsApi,
        transactions::TransactionsApi,
        TwikeyClientInner,
    },
    authenticator::Authenticator,
    common::{DEFAULT_PRODUCTION_URL, DEFAULT_TEST_URL},
    middlewares::{
        authentication::AuthenticationMiddleware,
        error_handling::ErrorHandlingMiddleware,
        inject_user_agent::{InjectUserAgentMiddleware, DEFAULT_USER_AGENT},
    },
    signature,
};
use chrono::Duration;
use reqwest::{header::HeaderValue, Url};
use reqwest_middleware::ClientWithMiddleware;
use reqwest_tracing::TracingMiddleware;
use std::sync::Arc;

/// Twikey environment the client talks to.
///
/// All endpoints are resolved relative to the base URL of the environment,
/// and the login call is sent to the base URL itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    base_url: Url,
}

impl Environment {
    /// Live environment, at `https://api.twikey.com/creditor`.
    pub fn production() -> Self {
        Self::from_base_url(static_url(DEFAULT_PRODUCTION_URL))
    }

    /// Beta environment, at `https://api.beta.twikey.com/creditor`.
    pub fn test() -> Self {
        Self::from_base_url(static_url(DEFAULT_TEST_URL))
    }

    /// Custom environment, e.g. a proxy or a mock server.
    pub fn from_base_url(base_url: Url) -> Self {
        Self { base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves `path` (starting with `/`) below the base URL.
    pub(crate) fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        let full_path = format!("{}{}", self.base_url.path().trim_end_matches('/'), path);
        url.set_path(&full_path);
        url.set_query(None);
        url
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::production()
    }
}

fn static_url(url: &'static str) -> Url {
    Url::parse(url).expect("hardcoded Twikey URLs are valid")
}

/// Client for the Twikey creditor APIs.
///
/// Clones are cheap and share the same session: the first call of any clone logs in,
/// and the session token is then reused until it reaches the maximum session age.
#[derive(Debug, Clone)]
pub struct TwikeyClient {
    /// Session APIs client.
    pub auth: AuthApi,
    /// Mandates (documents) APIs client.
    pub documents: DocumentsApi,
    /// Invoices APIs client.
    pub invoices: InvoicesApi,
    /// Transactions APIs client.
    pub transactions: TransactionsApi,
    /// Paylinks APIs client.
    pub paylinks: PaylinksApi,
    /// Refunds and beneficiaries APIs client.
    pub refunds: RefundsApi,
    inner: Arc<TwikeyClientInner>,
}

impl TwikeyClient {
    /// Builds a new [`TwikeyClient`](crate::client::TwikeyClient) for the production environment.
    pub fn new(api_key: impl Into<Token>) -> TwikeyClient {
        TwikeyClientBuilder::new(api_key).build()
    }

    /// Returns a new builder to configure a new [`TwikeyClient`](crate::client::TwikeyClient).
    pub fn builder(api_key: impl Into<Token>) -> TwikeyClientBuilder {
        TwikeyClientBuilder::new(api_key)
    }

    pub fn environment(&self) -> &Environment {
        &self.inner.environment
    }

    /// Verifies the `X-SIGNATURE` header of a webhook call against the API key of this client.
    ///
    /// `query_string` is the raw, still encoded, query string of the webhook request.
    pub fn verify_webhook_signature(&self, signature: &str, query_string: &str) -> bool {
        signature::verify_webhook_signature(
            self.inner.authenticator.api_key().expose_secret(),
            signature,
            query_string,
        )
    }
}

/// Builder for a [`TwikeyClient`](crate::client::TwikeyClient).
#[derive(Debug)]
pub struct TwikeyClientBuilder {
    client: reqwest::Client,
    environment: Environment,
    api_key: Token,
    private_key: Option<Token>,
    user_agent: HeaderValue,
    max_session_age: Duration,
}

impl TwikeyClientBuilder {
    /// Creates a new builder to configure a [`TwikeyClient`](crate::client::TwikeyClient).
    pub fn new(api_key: impl Into<Token>) -> Self {
        Self {
            client: reqwest::Client::new(),
            environment: Environment::production(),
            api_key: api_key.into(),
            private_key: None,
            user_agent: HeaderValue::from_static(DEFAULT_USER_AGENT),
            max_session_age: Duration::hours(23),
        }
    }

    /// Consumes the builder and builds a new [`TwikeyClient`](crate::client::TwikeyClient).
    pub fn build(self) -> TwikeyClient {
        // The login call must not go through the authentication middleware
        let authenticator = Authenticator::new(
            build_client_with_middleware(self.client.clone(), self.user_agent.clone(), None),
            self.environment.base_url().clone(),
            self.api_key,
            self.private_key,
            self.max_session_age,
        );

        let auth_middleware = Some(AuthenticationMiddleware {
            authenticator: authenticator.clone(),
        });

        let inner = Arc::new(TwikeyClientInner {
            client: build_client_with_middleware(self.client, self.user_agent, auth_middleware),
            authenticator,
            environment: self.environment,
        });

        TwikeyClient {
            auth: AuthApi::new(inner.clone()),
            documents: DocumentsApi::new(inner.clone()),
            invoices: InvoicesApi::new(inner.clone()),
            transactions: TransactionsApi::new(inner.clone()),
            paylinks: PaylinksApi::new(inner.clone()),
            refunds: RefundsApi::new(inner.clone()),
            inner,
        }
    }

    /// Sets a specific reqwest [`Client`](reqwest::Client) to use.
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Sets the environment to talk to.
    ///
    /// Defaults to [`Environment::production`].
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Enables enhanced security: every login also sends an OTP derived from this private key.
    pub fn with_private_key(mut self, private_key: impl Into<Token>) -> Self {
        self.private_key = Some(private_key.into());
        self
    }

    /// Sets the `User-Agent` sent with every request.
    ///
    /// Defaults to `twikey-rust/<version>`.
    pub fn with_user_agent(mut self, user_agent: HeaderValue) -> Self {
        self.user_agent = user_agent;
        self
    }

    /// Sets how long a session token is reused before logging in again.
    ///
    /// Defaults to 23 hours. Older Twikey SDKs computed this limit as `23 * 60 * 60 * 60`
    /// milliseconds (82 minutes and 48 seconds); pass
    /// `Duration::milliseconds(23 * 60 * 60 * 60)` to renew sessions as often as they do.
    pub fn with_max_session_age(mut self, max_session_age: Duration) -> Self {
        self.max_session_age = max_session_age;
        self
    }
}

fn build_client_with_middleware(
    client: reqwest::Client,
    user_agent: HeaderValue,
    auth_middleware: Option<AuthenticationMiddleware>,
) -> ClientWithMiddleware {
    let mut builder = reqwest_middleware::ClientBuilder::new(client)
        .with(TracingMiddleware)
        .with(InjectUserAgentMiddleware::new(user_agent));

    if let Some(auth_middleware) = auth_middleware {
        builder = builder.with(ErrorHandlingMiddleware).with(auth_middleware);
    }

    builder.build()
}
