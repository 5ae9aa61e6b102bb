use crate::authenticator::Authenticator;
use async_trait::async_trait;
use reqwest::{
    header::{HeaderValue, AUTHORIZATION},
    Request, Response,
};
use reqwest_middleware::{Middleware, Next};
use task_local_extensions::Extensions;

/// Reqwest middleware to inject the session token into outgoing HTTP requests.
/// On the first request, an additional HTTP request will be fired to log in.
pub struct AuthenticationMiddleware {
    pub(crate) authenticator: Authenticator,
}

#[async_trait]
impl Middleware for AuthenticationMiddleware {
    async fn handle(
        &self,
        mut req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        let session = self.authenticator.get_session_token().await?;

        // Twikey expects the raw token, without any scheme
        let mut header_value = HeaderValue::from_str(session.expose_secret())
            .map_err(|e| reqwest_middleware::Error::Middleware(e.into()))?;
        header_value.set_sensitive(true);
        req.headers_mut().insert(AUTHORIZATION, header_value);

        next.run(req, extensions).await
    }
}
