//! Rust client for the [Twikey](https://www.twikey.com) creditor APIs: mandates, invoices,
//! transactions, paylinks and refunds.
//!
//! Check out also the official Twikey [API documentation](https://www.twikey.com/api/).
//!
//! # Usage
//!
//! ## Prerequisites
//!
//! Generate an API key in the Twikey dashboard (Settings > Api). If enhanced security is enabled
//! for the key, also copy the private key: it is used to compute the one-time password sent along
//! with every login.
//!
//! ## Initialize a new `TwikeyClient`
//!
//! ```rust,no_run
//! # use twikey_rust::{TwikeyClient, client::Environment};
//! let twikey = TwikeyClient::builder("my-api-key")
//!     .with_private_key("0123456789ABCDEF")
//!     .with_environment(Environment::test())
//!     .build();
//! ```
//!
//! By default, a `TwikeyClient` connects to the production environment.
//! The session token is obtained on the first call and renewed transparently once it gets too old.
//!
//! ## Invite a customer to sign a mandate
//!
//! ```rust,no_run
//! # use twikey_rust::{TwikeyClient, Error, apis::{CustomerBuilder, documents::*}};
//! #
//! # #[tokio::main]
//! # async fn main() -> Result<(), Error> {
//! # let twikey: TwikeyClient = unreachable!();
//! #
//! let invite = InviteRequestBuilder::default()
//!     .ct(1420u64)
//!     .customer(
//!         CustomerBuilder::default()
//!             .customer_number("customer-123")
//!             .email("john@doe.com")
//!             .build()
//!             .unwrap(),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let res = twikey.documents.invite(&invite).await?;
//! if let Some(url) = res.url {
//!     println!("Mandate {} can be signed at {}", res.mandate_number, url);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Read the mandate feed
//!
//! Feeds return every change since the previous call. Each entry is handed to the callback,
//! until the server returns an empty page.
//!
//! ```rust,no_run
//! # use twikey_rust::{TwikeyClient, Error, apis::documents::*};
//! #
//! # #[tokio::main]
//! # async fn main() -> Result<(), Error> {
//! # let twikey: TwikeyClient = unreachable!();
//! #
//! twikey
//!     .documents
//!     .feed(&FeedOptions::new(), |event| match event {
//!         DocumentEvent::New { document, .. } => {
//!             tracing::info!("New mandate {}", document.mandate_number)
//!         }
//!         DocumentEvent::Updated { document, .. } => {
//!             tracing::info!("Updated mandate {}", document.mandate_number)
//!         }
//!         DocumentEvent::Cancelled { mandate_number, .. } => {
//!             tracing::info!("Cancelled mandate {}", mandate_number)
//!         }
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Verify a webhook
//!
//! ```rust,no_run
//! # use twikey_rust::TwikeyClient;
//! # let twikey: TwikeyClient = unreachable!();
//! # let (x_signature, raw_query_string) = ("", "");
//! if !twikey.verify_webhook_signature(x_signature, raw_query_string) {
//!     // reject the call
//! }
//! ```
//!
//! ## More examples
//!
//! Look into the [`demos`](../demos) for more example usages of this library.
//!
//! ```shell
//! cargo run --example mandate_feed
//! ```

#![deny(missing_debug_implementations)]
#![forbid(unsafe_code)]

pub mod apis;
pub(crate) mod authenticator;
pub mod client;
mod common;
pub mod error;
pub mod feed;
mod middlewares;
pub mod signature;

pub use client::TwikeyClient;
pub use error::Error;
