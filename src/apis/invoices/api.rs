use crate::{
    apis::{
        invoices::{
            model::{BulkInvoiceEntry, InvoiceFeedPage, PaymentFeedPage},
            BatchId, BulkInvoiceStatus, CreateInvoiceRequest, Invoice, InvoiceAction,
            InvoiceInclude, PaymentEvent, UblUploadRequest, UpdateInvoiceRequest,
        },
        with_form, PdfDocument, TwikeyClientInner,
    },
    common::{INVOICE_ID_HEADER, MANUAL_HEADER, XML_CONTENT_TYPE},
    feed::{self, FeedOptions},
    Error,
};
use reqwest::{header::CONTENT_TYPE, StatusCode};
use std::sync::Arc;
use urlencoding::encode;

/// Twikey invoices APIs client.
#[derive(Clone, Debug)]
pub struct InvoicesApi {
    inner: Arc<TwikeyClientInner>,
}

impl InvoicesApi {
    pub(crate) fn new(inner: Arc<TwikeyClientInner>) -> Self {
        Self { inner }
    }

    #[tracing::instrument(
        name = "Create Invoice",
        skip(self, request),
        fields(number = %request.number, amount = request.amount)
    )]
    pub async fn create(&self, request: &CreateInvoiceRequest) -> Result<Invoice, Error> {
        let res = self
            .inner
            .client
            .post(self.inner.environment.endpoint("/invoice"))
            .json(request)
            .send()
            .await?
            .json()
            .await?;

        Ok(res)
    }

    #[tracing::instrument(name = "Update Invoice", skip(self, request), fields(id = %request.id))]
    pub async fn update(&self, request: &UpdateInvoiceRequest) -> Result<Invoice, Error> {
        let res = self
            .inner
            .client
            .put(
                self.inner
                    .environment
                    .endpoint(&format!("/invoice/{}", encode(&request.id))),
            )
            .json(request)
            .send()
            .await?
            .json()
            .await?;

        Ok(res)
    }

    /// Deletes an invoice which has not been paid yet.
    #[tracing::instrument(name = "Delete Invoice", skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), Error> {
        self.inner
            .client
            .delete(
                self.inner
                    .environment
                    .endpoint(&format!("/invoice/{}", encode(id))),
            )
            .send()
            .await?;

        Ok(())
    }

    /// Gets the details of an invoice, sideloading the requested objects.
    #[tracing::instrument(name = "Get Invoice Details", skip(self))]
    pub async fn details(&self, id: &str, includes: &[InvoiceInclude]) -> Result<Invoice, Error> {
        let includes = includes
            .iter()
            .map(|include| ("include", include.as_str()))
            .collect::<Vec<_>>();

        let res = self
            .inner
            .client
            .get(
                self.inner
                    .environment
                    .endpoint(&format!("/invoice/{}", encode(id))),
            )
            .query(&includes)
            .send()
            .await?
            .json()
            .await?;

        Ok(res)
    }

    #[tracing::instrument(name = "Invoice Action", skip(self), fields(action = %action))]
    pub async fn action(&self, id: &str, action: &InvoiceAction) -> Result<(), Error> {
        let url = self
            .inner
            .environment
            .endpoint(&format!("/invoice/{}/action", encode(id)));

        with_form(self.inner.client.post(url), &action.to_form())
            .send()
            .await?;

        Ok(())
    }

    /// Creates an invoice from a UBL document.
    #[tracing::instrument(
        name = "Upload UBL Invoice",
        skip(self, request),
        fields(manual = request.manual, invoice_id = ?request.invoice_id)
    )]
    pub async fn upload_ubl(&self, request: &UblUploadRequest) -> Result<Invoice, Error> {
        let mut builder = self
            .inner
            .client
            .post(self.inner.environment.endpoint("/invoice/ubl"))
            .header(CONTENT_TYPE, XML_CONTENT_TYPE)
            .body(request.xml.clone());
        if request.manual {
            builder = builder.header(MANUAL_HEADER, "true");
        }
        if let Some(invoice_id) = request.invoice_id.as_deref().filter(|id| !id.is_empty()) {
            builder = builder.header(INVOICE_ID_HEADER, invoice_id);
        }

        let res = builder.send().await?.json().await?;

        Ok(res)
    }

    /// Submits several invoices at once. They are created asynchronously, see [`batch_details`](Self::batch_details).
    #[tracing::instrument(name = "Create Invoice Batch", skip(self, requests), fields(size = requests.len()))]
    pub async fn create_batch(&self, requests: &[CreateInvoiceRequest]) -> Result<BatchId, Error> {
        let res = self
            .inner
            .client
            .post(self.inner.environment.endpoint("/invoice/bulk"))
            .json(requests)
            .send()
            .await?
            .json()
            .await?;

        Ok(res)
    }

    #[tracing::instrument(name = "Get Invoice Batch Details", skip(self))]
    pub async fn batch_details(&self, batch_id: &str) -> Result<BulkInvoiceStatus, Error> {
        let res = self
            .inner
            .client
            .get(self.inner.environment.endpoint("/invoice/bulk"))
            .query(&[("batchId", batch_id)])
            .send()
            .await?;

        if res.status() == StatusCode::ACCEPTED {
            return Ok(BulkInvoiceStatus::Pending);
        }

        let entries: Vec<BulkInvoiceEntry> = res.json().await?;
        Ok(BulkInvoiceStatus::Done(
            entries
                .into_iter()
                .map(|entry| (entry.id, entry.status))
                .collect(),
        ))
    }

    /// Downloads the invoice as a PDF.
    #[tracing::instrument(name = "Retrieve Invoice PDF", skip(self))]
    pub async fn pdf(&self, id: &str) -> Result<PdfDocument, Error> {
        let res = self
            .inner
            .client
            .get(
                self.inner
                    .environment
                    .endpoint(&format!("/invoice/{}/pdf", encode(id))),
            )
            .send()
            .await?;

        PdfDocument::from_response(res, "invoice.pdf").await
    }

    /// Delivers every updated invoice since the last call to `callback`, until the feed is drained.
    pub async fn feed<F>(&self, options: &FeedOptions, callback: F) -> Result<usize, Error>
    where
        F: FnMut(Invoice),
    {
        feed::drain::<InvoiceFeedPage, _>(
            &self.inner.client,
            self.inner.environment.endpoint("/invoice"),
            options,
            callback,
        )
        .await
    }

    /// Delivers every payment event on invoices since the last call to `callback`.
    pub async fn payment_feed<F>(&self, options: &FeedOptions, callback: F) -> Result<usize, Error>
    where
        F: FnMut(PaymentEvent),
    {
        feed::drain::<PaymentFeedPage, _>(
            &self.inner.client,
            self.inner.environment.endpoint("/invoice/payment/feed"),
            options,
            callback,
        )
        .await
    }
}
