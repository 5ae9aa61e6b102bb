//! APIs and models related to refunds, credit transfers and beneficiary accounts.

mod api;
mod model;

pub use crate::feed::FeedOptions;
pub use api::RefundsApi;
pub use model::*;
