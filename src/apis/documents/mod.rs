//! APIs and models related to documents (mandates).

mod api;
mod model;

pub use crate::feed::FeedOptions;
pub use api::DocumentsApi;
pub use model::{
    Contract, CustomerAccessResponse, Document, DocumentEvent, InviteRequest,
    InviteRequestBuilder, InviteRequestBuilderError, MandateActionRequest,
    MandateActionRequestBuilder, MandateActionRequestBuilderError, MandateActionType,
    MandateCreationResponse, MandateDetailRequest, MandateDetailRequestBuilder,
    MandateDetailRequestBuilderError, MandateQuery, MandateQueryBuilder, MandateQueryBuilderError,
    SignMethod, SignRequest, SignRequestBuilder, SignRequestBuilderError, UpdateMandateRequest,
    UpdateMandateRequestBuilder, UpdateMandateRequestBuilderError, UploadPdfRequest,
};
