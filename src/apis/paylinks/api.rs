use crate::{
    apis::{
        paylinks::{
            model::{PaylinkFeedPage, PaylinkStatusResponse},
            Paylink, PaylinkRequest,
        },
        with_form, FormParams, TwikeyClientInner,
    },
    feed::{self, FeedOptions},
    Error,
};
use std::sync::Arc;

/// Twikey paylinks APIs client.
#[derive(Clone, Debug)]
pub struct PaylinksApi {
    inner: Arc<TwikeyClientInner>,
}

impl PaylinksApi {
    pub(crate) fn new(inner: Arc<TwikeyClientInner>) -> Self {
        Self { inner }
    }

    #[tracing::instrument(
        name = "Create Paylink",
        skip(self, request),
        fields(ct = request.ct, amount = request.amount)
    )]
    pub async fn create(&self, request: &PaylinkRequest) -> Result<Paylink, Error> {
        let res = with_form(
            self.inner
                .client
                .post(self.inner.environment.endpoint("/payment/link")),
            &request.to_form(),
        )
        .send()
        .await?
        .json()
        .await?;

        Ok(res)
    }

    /// Gets the current state of a paylink, looked up by id or by reference.
    #[tracing::instrument(name = "Get Paylink Status", skip(self))]
    pub async fn status(&self, id: Option<u64>, reference: Option<&str>) -> Result<Paylink, Error> {
        let mut query = FormParams::new();
        query.push_opt("id", id).push_opt("ref", reference);

        let res: PaylinkStatusResponse = self
            .inner
            .client
            .get(self.inner.environment.endpoint("/payment/link"))
            .query(query.pairs())
            .send()
            .await?
            .json()
            .await?;

        match res {
            PaylinkStatusResponse::Single(link) => Ok(link),
            PaylinkStatusResponse::Links { links } => links
                .into_iter()
                .next()
                .ok_or_else(|| Error::Other(anyhow::anyhow!("Twikey returned no paylink"))),
        }
    }

    /// Delivers every updated paylink since the last call to `callback`, until the feed is drained.
    pub async fn feed<F>(&self, options: &FeedOptions, callback: F) -> Result<usize, Error>
    where
        F: FnMut(Paylink),
    {
        feed::drain::<PaylinkFeedPage, _>(
            &self.inner.client,
            self.inner.environment.endpoint("/payment/link/feed"),
            options,
            callback,
        )
        .await
    }
}
