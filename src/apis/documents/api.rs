use crate::{
    apis::{
        documents::{
            model::{ContractsResponse, MandateDetailResponse, MandateFeedPage},
            Contract, CustomerAccessResponse, Document, DocumentEvent, InviteRequest,
            MandateActionRequest, MandateCreationResponse, MandateDetailRequest, MandateQuery,
            SignRequest, UpdateMandateRequest, UploadPdfRequest,
        },
        with_form, FormParams, PdfDocument, TwikeyClientInner,
    },
    common::{PDF_CONTENT_TYPE, STATE_HEADER},
    feed::{self, FeedOptions},
    Error,
};
use reqwest::header::CONTENT_TYPE;
use std::sync::Arc;
use urlencoding::encode;

/// Twikey documents (mandates) APIs client.
#[derive(Clone, Debug)]
pub struct DocumentsApi {
    inner: Arc<TwikeyClientInner>,
}

impl DocumentsApi {
    pub(crate) fn new(inner: Arc<TwikeyClientInner>) -> Self {
        Self { inner }
    }

    /// Invites a debtor to sign a new mandate.
    #[tracing::instrument(name = "Invite Mandate", skip(self, request), fields(ct = request.ct))]
    pub async fn invite(&self, request: &InviteRequest) -> Result<MandateCreationResponse, Error> {
        let res = with_form(
            self.inner
                .client
                .post(self.inner.environment.endpoint("/invite")),
            &request.to_form(),
        )
        .send()
        .await?
        .json()
        .await?;

        Ok(res)
    }

    /// Creates a mandate which is signed in the same call.
    #[tracing::instrument(
        name = "Sign Mandate",
        skip(self, request),
        fields(ct = request.invite.ct, method = %request.method)
    )]
    pub async fn sign(&self, request: &SignRequest) -> Result<MandateCreationResponse, Error> {
        let res = with_form(
            self.inner.client.post(self.inner.environment.endpoint("/sign")),
            &request.to_form(),
        )
        .send()
        .await?
        .json()
        .await?;

        Ok(res)
    }

    /// Triggers an action (reminder, new invite, ...) on an existing mandate.
    #[tracing::instrument(
        name = "Mandate Action",
        skip(self, request),
        fields(mandate_number = %request.mandate_number, action = %request.action)
    )]
    pub async fn action(&self, request: &MandateActionRequest) -> Result<(), Error> {
        let url = self
            .inner
            .environment
            .endpoint(&format!("/mandate/{}/action", encode(&request.mandate_number)));

        with_form(self.inner.client.post(url), &request.to_form())
            .send()
            .await?;

        Ok(())
    }

    /// Searches the contracts matching the given debtor details.
    #[tracing::instrument(name = "Query Mandates", skip(self, query))]
    pub async fn query(&self, query: &MandateQuery) -> Result<Vec<Contract>, Error> {
        let res: ContractsResponse = self
            .inner
            .client
            .get(self.inner.environment.endpoint("/mandate/query"))
            .query(query.to_query().pairs())
            .send()
            .await?
            .json()
            .await?;

        Ok(res.contracts)
    }

    /// Gets the details of a mandate, including its current state.
    #[tracing::instrument(
        name = "Get Mandate Details",
        skip(self, request),
        fields(mandate_number = %request.mandate_number)
    )]
    pub async fn details(&self, request: &MandateDetailRequest) -> Result<Document, Error> {
        let res = self
            .inner
            .client
            .get(self.inner.environment.endpoint("/mandate/detail"))
            .query(request.to_query().pairs())
            .send()
            .await?;

        let state = res
            .headers()
            .get(STATE_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let mut document = res.json::<MandateDetailResponse>().await?.mndt;
        document.state = state;

        Ok(document)
    }

    /// Updates the debtor, account or state of an existing mandate.
    #[tracing::instrument(
        name = "Update Mandate",
        skip(self, request),
        fields(mandate_number = %request.mandate_number)
    )]
    pub async fn update(&self, request: &UpdateMandateRequest) -> Result<(), Error> {
        with_form(
            self.inner
                .client
                .post(self.inner.environment.endpoint("/mandate/update")),
            &request.to_form(),
        )
        .send()
        .await?;

        Ok(())
    }

    /// Cancels a mandate. When `notify` is set, the debtor is informed by e-mail.
    #[tracing::instrument(name = "Cancel Mandate", skip(self))]
    pub async fn cancel(&self, mandate_number: &str, reason: &str, notify: bool) -> Result<(), Error> {
        let mut query = FormParams::new();
        query
            .push("mndtId", mandate_number)
            .push("rsn", reason)
            .push_opt("notify", notify.then_some(true));

        self.inner
            .client
            .delete(self.inner.environment.endpoint("/mandate"))
            .query(query.pairs())
            .send()
            .await?;

        Ok(())
    }

    /// Downloads the signed mandate as a PDF.
    #[tracing::instrument(name = "Retrieve Mandate PDF", skip(self))]
    pub async fn retrieve_pdf(&self, mandate_number: &str) -> Result<PdfDocument, Error> {
        let res = self
            .inner
            .client
            .get(self.inner.environment.endpoint("/mandate/pdf"))
            .query(&[("mndtId", mandate_number)])
            .send()
            .await?;

        PdfDocument::from_response(res, "mandate.pdf").await
    }

    /// Uploads a signed mandate document for an existing (e.g. imported) mandate.
    #[tracing::instrument(name = "Upload Mandate PDF", skip(self, request), fields(mandate_number = %request.mandate_number))]
    pub async fn upload_pdf(&self, request: &UploadPdfRequest) -> Result<(), Error> {
        self.inner
            .client
            .post(self.inner.environment.endpoint("/mandate/pdf"))
            .query(request.to_query().pairs())
            .header(CONTENT_TYPE, PDF_CONTENT_TYPE)
            .body(request.pdf.clone())
            .send()
            .await?;

        Ok(())
    }

    /// Returns a link through which the debtor can manage the mandate without logging in.
    #[tracing::instrument(name = "Customer Access", skip(self))]
    pub async fn customer_access(&self, mandate_number: &str) -> Result<CustomerAccessResponse, Error> {
        let mut form = FormParams::new();
        form.push("mndtId", mandate_number);

        let res = with_form(
            self.inner
                .client
                .post(self.inner.environment.endpoint("/customeraccess")),
            &form,
        )
        .send()
        .await?
        .json()
        .await?;

        Ok(res)
    }

    /// Delivers every mandate change since the last call to `callback`, until the feed is drained.
    ///
    /// Returns the number of delivered events.
    pub async fn feed<F>(&self, options: &FeedOptions, callback: F) -> Result<usize, Error>
    where
        F: FnMut(DocumentEvent),
    {
        feed::drain::<MandateFeedPage, _>(
            &self.inner.client,
            self.inner.environment.endpoint("/mandate"),
            options,
            callback,
        )
        .await
    }
}
