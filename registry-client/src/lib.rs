//! # Registry Client
//!
//! `registry-client` submits documents to a remote registry while honouring one global
//! admission rate, shared by every task that holds a clone of the client.
//!
//! ## The Submission Stack
//! Every [`RegistryClient::submit`] call flows through a small [Tower](https://github.com/tower-rs/tower)
//! stack:
//!
//! 1. **Admission**: The [`QuotaLayer`] suspends the call on a shared
//!    [`quota_gate::QuotaGate`] until a token is available. Admission is spent on the
//!    *attempt*, so every submission costs exactly one unit whatever happens next.
//! 2. **Transport**: [`HttpTransport`] serializes the document to JSON and issues a single
//!    `POST` to the configured endpoint. Any other `Service<Submission<T>>` can stand in.
//! 3. **Classification**: The response or failure is folded into an [`Outcome`]. Remote
//!    rejections and transport failures are values, never retried by the client.
//!
//! ## Example
//!
//! ```rust,no_run
//! use registry_client::ClientConfig;
//! use registry_client::Outcome;
//! use registry_client::RegistryClient;
//! use registry_client::TimeUnit;
//!
//! # async fn run() -> Result<(), registry_client::ClientError> {
//! let config = ClientConfig::new("https://registry.example.com/api/v3/lk/", TimeUnit::Minutes, 10)?;
//! let client = RegistryClient::new(config)?;
//!
//! match client.submit(serde_json::json!({ "doc_id": "42" }), "signature").await {
//!     Outcome::Success { body } => println!("accepted: {body}"),
//!     other => eprintln!("not accepted: {other}"),
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod document;
mod error;
mod layer;
mod outcome;
mod service;
mod transport;


pub use client::RegistryClient;
pub use config::ClientConfig;
pub use config::DEFAULT_PATH;
pub use document::CreateDocumentRequest;
pub use document::CreateDocumentResponse;
pub use document::Description;
pub use document::Product;
pub use error::ClientError;
pub use error::TransportError;
pub use layer::QuotaLayer;
pub use outcome::Outcome;
pub use quota_gate::QuotaGate;
pub use quota_gate::RateLimit;
pub use quota_gate::TimeUnit;
pub use service::QuotaService;
pub use transport::HttpTransport;
pub use transport::RawResponse;
pub use transport::Submission;
