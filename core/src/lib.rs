//! Blocking client for the Referoo reference-checking API.
//!
//! # Overview
//! Candidate and referee management over Referoo's REST API: list, fetch,
//! create and update referees, trigger reference-request emails and download
//! completed references.
//!
//! # Design
//! - `RefereeClient` is stateless. It only holds the base URL and token, and
//!   splits every operation into `build_*` (produces an `HttpRequest`) and
//!   `parse_*` (consumes an `HttpResponse`), so the I/O boundary is explicit.
//! - `RefereeApi` runs those halves through a `Transport`; `UreqTransport`
//!   is the default blocking implementation.
//! - Create/update payloads always write unset string fields as `""`.
//! - Only HTTP 200 counts as success.
//!
//! ```no_run
//! use referoo_core::{ClientConfig, RefereeApi};
//!
//! # fn main() -> Result<(), referoo_core::ApiError> {
//! let config = ClientConfig::from_env()?;
//! let api = RefereeApi::from_config(&config);
//! let page = api.list_referees(Some(0), Some(20))?;
//! for referee in &page.data {
//!     println!("{} {:?}", referee.id, referee.name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod pagination;
pub mod serde_ext;
pub mod transport;
pub mod types;

pub use api::RefereeApi;
pub use client::RefereeClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use pagination::{Page, MAX_LIMIT};
pub use transport::{Transport, UreqTransport};
pub use types::{
    Candidate, CandidateWithRefereesResponse, CreateCandidateWithReferees, CreateReferee,
    NewCandidate, Referee, RefereePayload, RefereesResponse, UpdateReferee,
};
