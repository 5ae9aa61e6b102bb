//! APIs and models related to paylinks.

mod api;
mod model;

pub use crate::feed::FeedOptions;
pub use api::PaylinksApi;
pub use model::{Paylink, PaylinkRequest, PaylinkRequestBuilder, PaylinkRequestBuilderError};
