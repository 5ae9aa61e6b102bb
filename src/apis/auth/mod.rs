//! Session management APIs and models.

mod api;
mod model;

pub use api::AuthApi;
pub use model::*;
