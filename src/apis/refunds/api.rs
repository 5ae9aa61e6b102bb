use crate::{
    apis::{
        refunds::{
            AddBeneficiaryRequest, Beneficiary, CreditTransferBatch, CreditTransferBatchSelector,
            NewCreditTransferRequest, Refund,
        },
        with_form, Entries, FormParams, TwikeyClientInner,
    },
    feed::{self, FeedOptions},
    Error,
};
use std::sync::Arc;
use urlencoding::encode;

/// Twikey refunds (credit transfers) APIs client.
#[derive(Clone, Debug)]
pub struct RefundsApi {
    inner: Arc<TwikeyClientInner>,
}

impl RefundsApi {
    pub(crate) fn new(inner: Arc<TwikeyClientInner>) -> Self {
        Self { inner }
    }

    /// Creates a credit transfer to a beneficiary account of the customer.
    #[tracing::instrument(
        name = "Create Refund",
        skip(self, request),
        fields(customer_number = %request.customer_number, amount = request.amount)
    )]
    pub async fn create(&self, request: &NewCreditTransferRequest) -> Result<Refund, Error> {
        let res: Entries<Refund> = with_form(
            self.inner
                .client
                .post(self.inner.environment.endpoint("/transfer")),
            &request.to_form(),
        )
        .send()
        .await?
        .json()
        .await?;

        res.into_first()
    }

    #[tracing::instrument(name = "Add Beneficiary", skip(self, request))]
    pub async fn add_beneficiary(&self, request: &AddBeneficiaryRequest) -> Result<Beneficiary, Error> {
        let res = with_form(
            self.inner
                .client
                .post(self.inner.environment.endpoint("/transfers/beneficiaries")),
            &request.to_form(),
        )
        .send()
        .await?
        .json()
        .await?;

        Ok(res)
    }

    /// Disables a beneficiary account, optionally only for the given customer.
    #[tracing::instrument(name = "Disable Beneficiary", skip(self))]
    pub async fn disable_beneficiary(
        &self,
        iban: &str,
        customer_number: Option<&str>,
    ) -> Result<(), Error> {
        let mut query = FormParams::new();
        query.push_opt("customerNumber", customer_number);

        self.inner
            .client
            .delete(
                self.inner
                    .environment
                    .endpoint(&format!("/transfers/beneficiaries/{}", encode(iban))),
            )
            .query(query.pairs())
            .send()
            .await?;

        Ok(())
    }

    /// Bundles the open credit transfers of a template into a batch to be sent to the bank.
    #[tracing::instrument(name = "Complete Credit Transfers", skip(self))]
    pub async fn complete(&self, ct: u64, iban: Option<&str>) -> Result<CreditTransferBatch, Error> {
        let mut form = FormParams::new();
        form.push("ct", ct).push_opt("iban", iban);

        let res = with_form(
            self.inner
                .client
                .post(self.inner.environment.endpoint("/transfer/complete")),
            &form,
        )
        .send()
        .await?
        .json()
        .await?;

        Ok(res)
    }

    #[tracing::instrument(name = "Get Credit Transfer Batch", skip(self))]
    pub async fn batch_details(
        &self,
        selector: &CreditTransferBatchSelector,
    ) -> Result<CreditTransferBatch, Error> {
        let res = self
            .inner
            .client
            .get(self.inner.environment.endpoint("/transfer/complete"))
            .query(selector.to_query().pairs())
            .send()
            .await?
            .json()
            .await?;

        Ok(res)
    }

    /// Delivers every updated refund since the last call to `callback`, until the feed is drained.
    pub async fn feed<F>(&self, options: &FeedOptions, callback: F) -> Result<usize, Error>
    where
        F: FnMut(Refund),
    {
        feed::drain::<Entries<Refund>, _>(
            &self.inner.client,
            self.inner.environment.endpoint("/transfer"),
            options,
            callback,
        )
        .await
    }
}
