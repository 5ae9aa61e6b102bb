//! APIs and models related to invoices.

mod api;
mod model;

pub use crate::feed::FeedOptions;
pub use api::InvoicesApi;
pub use model::{
    BatchId, BulkInvoiceStatus, CreateInvoiceRequest, CreateInvoiceRequestBuilder,
    CreateInvoiceRequestBuilderError, GatewayType, Invoice, InvoiceAction, InvoiceInclude,
    LineItem, LineItemBuilder, LineItemBuilderError, PaymentEvent, PaymentEventError,
    PaymentEventType, PaymentGateway, PaymentOrigin, UblUploadRequest, UpdateInvoiceRequest,
    UpdateInvoiceRequestBuilder, UpdateInvoiceRequestBuilderError,
};
