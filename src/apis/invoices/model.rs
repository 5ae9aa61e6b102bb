use crate::{
    apis::{Customer, FormParams},
    feed::FeedPage,
};
use chrono::{DateTime, Utc};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Builder)]
#[builder(setter(into, strip_option))]
pub struct CreateInvoiceRequest {
    /// Invoice number, unique per creditor.
    pub number: String,
    pub amount: f64,
    /// Invoice date, as `YYYY-MM-DD`.
    pub date: String,
    /// Due date, as `YYYY-MM-DD`.
    pub duedate: String,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
    /// Identifier to assign to the invoice, generated by Twikey when missing.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remittance: Option<String>,
    #[builder(default)]
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Template to use for the invoice.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ct: Option<u64>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    /// Do not collect the invoice automatically.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual: Option<bool>,
    /// Invoice in PDF, base64 encoded.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf: Option<String>,
    #[builder(default)]
    #[serde(rename = "pdfUrl", skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,
    #[builder(default)]
    #[serde(rename = "redirectUrl", skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Invoice this one is a credit note for.
    #[builder(default)]
    #[serde(rename = "relatedInvoiceNumber", skip_serializing_if = "Option::is_none")]
    pub related_invoice_number: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cc: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub lines: Vec<LineItem>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Builder)]
#[builder(default, setter(into, strip_option))]
pub struct LineItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    /// Unit of measure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unitprice: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vatcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vatsum: Option<f64>,
}

/// Changes to an existing invoice. Fields left unset are not changed.
#[derive(Serialize, Debug, Clone, Default, Eq, PartialEq, Builder)]
#[builder(setter(into, strip_option))]
pub struct UpdateInvoiceRequest {
    pub id: String,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duedate: Option<String>,
    #[builder(default)]
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf: Option<String>,
    /// New state, e.g. `booked` or `archived`.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,
}

/// Extra objects that can be sideloaded with the details of an invoice.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceInclude {
    LastPayment,
    Meta,
    Customer,
}

impl InvoiceInclude {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceInclude::LastPayment => "lastpayment",
            InvoiceInclude::Meta => "meta",
            InvoiceInclude::Customer => "customer",
        }
    }
}

/// Action to trigger on an invoice.
#[derive(Debug, Clone, PartialEq)]
pub enum InvoiceAction {
    /// Sends the invoice (again) by e-mail.
    Email,
    /// Sends the invoice by SMS.
    Sms,
    /// Sends a reminder.
    Reminder,
    /// Sends the invoice by letter.
    Letter,
    /// Sends a reminder by letter.
    LetterWithReminder,
    /// Spreads the payment over a plan, collected through the given mandate.
    PaymentPlan {
        initial_amount: f64,
        recurring_amount: f64,
        terms: u32,
        mandate_number: String,
    },
}

impl InvoiceAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceAction::Email => "email",
            InvoiceAction::Sms => "sms",
            InvoiceAction::Reminder => "reminder",
            InvoiceAction::Letter => "letter",
            InvoiceAction::LetterWithReminder => "letterWithReminder",
            InvoiceAction::PaymentPlan { .. } => "paymentplan",
        }
    }

    pub fn to_form(&self) -> FormParams {
        let mut form = FormParams::new();
        form.push("type", self.as_str());
        if let InvoiceAction::PaymentPlan {
            initial_amount,
            recurring_amount,
            terms,
            mandate_number,
        } = self
        {
            form.push("initialAmount", initial_amount)
                .push("recurringAmount", recurring_amount)
                .push("terms", terms)
                .push("mndtId", mandate_number);
        }
        form
    }
}

impl fmt::Display for InvoiceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upload of an invoice in UBL format.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct UblUploadRequest {
    pub xml: String,
    /// Do not collect the invoice automatically.
    pub manual: bool,
    /// Identifier to assign to the created invoice.
    pub invoice_id: Option<String>,
}

impl UblUploadRequest {
    pub fn new(xml: impl Into<String>) -> Self {
        Self {
            xml: xml.into(),
            manual: false,
            invoice_id: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Invoice {
    pub id: String,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub remittance: Option<String>,
    #[serde(default)]
    pub r#ref: Option<String>,
    #[serde(default)]
    pub ct: Option<u64>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub duedate: Option<String>,
    /// `BOOKED`, `PENDING`, `PAID`, ...
    #[serde(default)]
    pub state: Option<String>,
    /// Link to the payment page of the invoice.
    #[serde(default)]
    pub url: Option<String>,
    /// Sideloaded with [`InvoiceInclude::LastPayment`].
    #[serde(default)]
    pub lastpayment: Option<serde_json::Value>,
    /// Sideloaded with [`InvoiceInclude::Meta`].
    #[serde(default)]
    pub meta: Option<serde_json::Value>,
    /// Sideloaded with [`InvoiceInclude::Customer`].
    #[serde(default)]
    pub customer: Option<serde_json::Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
pub struct BatchId {
    #[serde(rename = "batchId")]
    pub batch_id: String,
}

/// Outcome of a bulk invoice creation.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum BulkInvoiceStatus {
    /// The batch is still being processed.
    Pending,
    /// Status of every invoice of the batch, by invoice id.
    Done(HashMap<String, String>),
}

#[derive(Deserialize, Debug)]
pub(crate) struct BulkInvoiceEntry {
    #[serde(default)]
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) status: String,
}

#[derive(Deserialize, Debug)]
pub(crate) struct InvoiceFeedPage {
    #[serde(rename = "Invoices")]
    invoices: Vec<Invoice>,
}

impl FeedPage for InvoiceFeedPage {
    type Entry = Invoice;

    fn into_entries(self) -> Vec<Invoice> {
        self.invoices
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentEventType {
    Payment,
    PaymentFailure,
    Refund,
    #[serde(other)]
    Unknown,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum GatewayType {
    Bank,
    Psp,
    #[serde(other)]
    Unknown,
}

/// Object a payment event relates to.
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
pub struct PaymentOrigin {
    /// Always `invoice` for this feed.
    pub object: String,
    pub id: String,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub r#ref: Option<String>,
}

/// Bank or payment service provider through which the payment happened.
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
pub struct PaymentGateway {
    pub id: u64,
    pub name: String,
    pub r#type: GatewayType,
    #[serde(default)]
    pub iban: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentEventError {
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub external_code: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub action_step: Option<u32>,
}

/// A payment, failed payment or refund of an invoice.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentEvent {
    pub event_id: String,
    pub event_type: PaymentEventType,
    pub occurred_at: DateTime<Utc>,
    pub amount: f64,
    pub currency: String,
    pub origin: PaymentOrigin,
    pub gateway: PaymentGateway,
    #[serde(default)]
    pub details: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub error: Option<PaymentEventError>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct PaymentFeedPage {
    #[serde(rename = "Payments")]
    payments: Vec<PaymentEvent>,
}

impl FeedPage for PaymentFeedPage {
    type Entry = PaymentEvent;

    fn into_entries(self) -> Vec<PaymentEvent> {
        self.payments
    }
}
