//! Clients for the various Twikey APIs.

use crate::{
    authenticator::Authenticator,
    client::Environment,
    common::FORM_CONTENT_TYPE,
};
use reqwest::header::CONTENT_TYPE;
use reqwest_middleware::{ClientWithMiddleware, RequestBuilder};
use std::fmt::{Debug, Formatter};

pub mod auth;
pub mod documents;
mod form;
pub mod invoices;
mod model;
pub mod paylinks;
pub mod refunds;
pub mod transactions;

pub use form::FormParams;
pub use model::{Account, Customer, CustomerBuilder, CustomerBuilderError, Language, PdfDocument};
pub(crate) use model::Entries;

pub(crate) struct TwikeyClientInner {
    pub(crate) client: ClientWithMiddleware,
    pub(crate) authenticator: Authenticator,
    pub(crate) environment: Environment,
}

impl Debug for TwikeyClientInner {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwikeyClientInner")
            .field("environment", &self.environment)
            .finish_non_exhaustive()
    }
}

/// Attaches `form` as an `application/x-www-form-urlencoded` body.
pub(crate) fn with_form(builder: RequestBuilder, form: &FormParams) -> RequestBuilder {
    builder
        .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
        .body(form.encode())
}

/// Builds a client pointed at a wiremock server, for the API tests.
#[cfg(test)]
pub(crate) async fn mock_client_and_server() -> (crate::TwikeyClient, wiremock::MockServer) {
    use wiremock::{matchers::method, matchers::path, Mock, MockServer, ResponseTemplate};

    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).insert_header("Authorization", MOCK_SESSION_TOKEN))
        .mount(&mock_server)
        .await;

    let client = crate::TwikeyClient::builder("mock-api-key")
        .with_environment(Environment::from_base_url(
            reqwest::Url::parse(&mock_server.uri()).unwrap(),
        ))
        .build();

    (client, mock_server)
}

#[cfg(test)]
pub(crate) static MOCK_SESSION_TOKEN: &str = "mock-session-token";
