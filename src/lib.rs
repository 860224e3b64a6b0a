//! # Async client for the Porkbun API.
//!
//! Implements a client for the DNS and SSL parts of the [Porkbun API]: every
//! call is one authenticated JSON POST, and every response is checked for the
//! API's own `SUCCESS` status before its contents are handed back.
//!
//! ## Examples
//!
//! ```no_run
//! use porkbun::record::{Record, RecordType};
//! use porkbun::{Client, Context};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new("<APIKEY>", "<SECRETAPIKEY>")?;
//! let ctx = Context::new();
//!
//! let my_ip = client.ping(&ctx).await?;
//!
//! let record = Record::new(RecordType::A, my_ip).with_name("home");
//! let record_id = client.create_record(&ctx, "example.com", &record).await?;
//! # Ok(())
//! # }
//! ```
//!
//! Failures come back as a [`ClientError`], with one variant per kind of
//! failure. A call the API itself rejected, for example because the domain
//! doesn't belong to the account, is a [`ClientError::Status`].
//!
//! [Porkbun API]: https://porkbun.com/api/json/v3/documentation

mod client;
mod context;
mod errors;
pub mod logging;
mod payload;
pub mod record;
mod ssl;

pub use client::*;
pub use context::*;
pub use errors::*;
pub use ssl::*;
