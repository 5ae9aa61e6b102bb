use crate::{
    apis::{
        transactions::{
            NewTransactionRequest, RefundRequest, StatusRequest, Transaction, TransactionAction,
            TransactionQuery, TransactionRefund, TransactionSelector, UpdateTransactionRequest,
        },
        with_form, Entries, FormParams, TwikeyClientInner,
    },
    feed::{self, FeedOptions},
    Error,
};
use std::sync::Arc;

/// Twikey transactions APIs client.
///
/// Transactions are collections on a mandate. They are sent to the bank in batches, so most
/// changes are only possible before that happens.
#[derive(Clone, Debug)]
pub struct TransactionsApi {
    inner: Arc<TwikeyClientInner>,
}

impl TransactionsApi {
    pub(crate) fn new(inner: Arc<TwikeyClientInner>) -> Self {
        Self { inner }
    }

    /// Adds a new collection to a mandate.
    #[tracing::instrument(
        name = "Create Transaction",
        skip(self, request),
        fields(mandate_number = %request.mandate_number, amount = request.amount)
    )]
    pub async fn create(&self, request: &NewTransactionRequest) -> Result<Transaction, Error> {
        let res: Entries<Transaction> = with_form(
            self.inner
                .client
                .post(self.inner.environment.endpoint("/transaction")),
            &request.to_form(),
        )
        .send()
        .await?
        .json()
        .await?;

        res.into_first()
    }

    /// Gets the status of the first transaction matching the request.
    #[tracing::instrument(name = "Get Transaction Status", skip(self, request))]
    pub async fn status(&self, request: &StatusRequest) -> Result<Transaction, Error> {
        let res: Entries<Transaction> = self
            .inner
            .client
            .get(self.inner.environment.endpoint("/transaction/detail"))
            .query(request.to_query().pairs())
            .send()
            .await?
            .json()
            .await?;

        res.into_first()
    }

    #[tracing::instrument(name = "Transaction Action", skip(self))]
    pub async fn action(&self, id: &str, action: TransactionAction) -> Result<(), Error> {
        let mut form = FormParams::new();
        form.push("id", id).push("action", action);

        with_form(
            self.inner
                .client
                .post(self.inner.environment.endpoint("/transaction/action")),
            &form,
        )
        .send()
        .await?;

        Ok(())
    }

    #[tracing::instrument(name = "Update Transaction", skip(self, request), fields(id = %request.id))]
    pub async fn update(&self, request: &UpdateTransactionRequest) -> Result<(), Error> {
        with_form(
            self.inner
                .client
                .put(self.inner.environment.endpoint("/transaction")),
            &request.to_form(),
        )
        .send()
        .await?;

        Ok(())
    }

    /// Refunds (part of) a paid transaction. The beneficiary account is registered on the fly if needed.
    #[tracing::instrument(
        name = "Refund Transaction",
        skip(self, request),
        fields(id = %request.id, amount = request.amount)
    )]
    pub async fn refund(&self, request: &RefundRequest) -> Result<TransactionRefund, Error> {
        let res: Entries<TransactionRefund> = with_form(
            self.inner
                .client
                .post(self.inner.environment.endpoint("/transaction/refund")),
            &request.to_form(),
        )
        .send()
        .await?
        .json()
        .await?;

        res.into_first()
    }

    /// Removes transactions which have not been sent to the bank yet.
    #[tracing::instrument(name = "Delete Transaction", skip(self))]
    pub async fn delete(&self, selector: &TransactionSelector) -> Result<(), Error> {
        self.inner
            .client
            .delete(self.inner.environment.endpoint("/transaction"))
            .query(selector.to_query().pairs())
            .send()
            .await?;

        Ok(())
    }

    #[tracing::instrument(name = "Query Transactions", skip(self))]
    pub async fn query(&self, query: &TransactionQuery) -> Result<Vec<Transaction>, Error> {
        let res: Entries<Transaction> = self
            .inner
            .client
            .get(self.inner.environment.endpoint("/transaction/query"))
            .query(query.to_query().pairs())
            .send()
            .await?
            .json()
            .await?;

        Ok(res.entries)
    }

    /// Delivers every updated transaction since the last call to `callback`, until the feed is drained.
    pub async fn feed<F>(&self, options: &FeedOptions, callback: F) -> Result<usize, Error>
    where
        F: FnMut(Transaction),
    {
        feed::drain::<Entries<Transaction>, _>(
            &self.inner.client,
            self.inner.environment.endpoint("/transaction"),
            options,
            callback,
        )
        .await
    }
}
