//! Stateless HTTP request builder and response parser for the Referoo API.
//!
//! # Design
//! `RefereeClient` holds only the base URL and access token and carries no
//! mutable state between calls. Each operation is split into a `build_*`
//! method that produces an `HttpRequest` and a `parse_*` method that consumes
//! an `HttpResponse`. `RefereeApi` glues the two halves to a `Transport`;
//! callers that bring their own HTTP stack can use the halves directly.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::pagination::{trim_separators, Page};
use crate::types::{
    CandidateWithRefereesResponse, CreateCandidateWithReferees, CreateReferee, RefereesResponse,
    UpdateReferee,
};

const JSON: &str = "application/json";

/// Synchronous, stateless client for the Referoo API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network.
#[derive(Clone)]
pub struct RefereeClient {
    base_url: String,
    access_token: String,
}

impl std::fmt::Debug for RefereeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefereeClient")
            .field("base_url", &self.base_url)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

impl RefereeClient {
    pub fn new(base_url: &str, access_token: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.base_url, &config.access_token)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -----------------------------------------------------------------------
    // Build
    // -----------------------------------------------------------------------

    /// `GET referees/?offset={o}&limit={l}`, see [`Page`] for the clamping rules.
    pub fn build_list_referees(&self, offset: Option<i64>, limit: Option<i64>) -> HttpRequest {
        let path = Page::new(offset, limit).apply("referees/?");
        self.request(HttpMethod::Get, &path, None)
    }

    pub fn build_candidate_referees(&self, candidate_id: u64) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("candidate/{candidate_id}/referees"), None)
    }

    pub fn build_get_referee(&self, id: u64) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("referee/{id}"), None)
    }

    pub fn build_download_reference(&self, id: u64) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("referee/{id}/reference"), None)
    }

    pub fn build_create_referee(
        &self,
        candidate_id: u64,
        input: &CreateReferee,
    ) -> Result<HttpRequest, ApiError> {
        let body = to_json(input)?;
        Ok(self.request(
            HttpMethod::Post,
            &format!("candidate/{candidate_id}/referee"),
            Some(body),
        ))
    }

    pub fn build_create_candidate_with_referees(
        &self,
        input: &CreateCandidateWithReferees,
    ) -> Result<HttpRequest, ApiError> {
        let body = to_json(input)?;
        Ok(self.request(HttpMethod::Post, "referee/quick", Some(body)))
    }

    pub fn build_update_referee(
        &self,
        id: u64,
        input: &UpdateReferee,
    ) -> Result<HttpRequest, ApiError> {
        let body = to_json(input)?;
        Ok(self.request(HttpMethod::Put, &format!("referee/{id}"), Some(body)))
    }

    /// `PUT referee/{id}/email` with no body.
    pub fn build_send_reference_email(&self, id: u64) -> HttpRequest {
        self.request(HttpMethod::Put, &format!("referee/{id}/email"), None)
    }

    // -----------------------------------------------------------------------
    // Parse
    // -----------------------------------------------------------------------

    pub fn parse_list_referees(&self, response: HttpResponse) -> Result<RefereesResponse, ApiError> {
        parse_json(&response, HttpMethod::Get, "list_referees")
    }

    pub fn parse_candidate_referees(
        &self,
        response: HttpResponse,
    ) -> Result<RefereesResponse, ApiError> {
        parse_json(&response, HttpMethod::Get, "candidate_referees")
    }

    pub fn parse_get_referee(&self, response: HttpResponse) -> Result<RefereesResponse, ApiError> {
        parse_json(&response, HttpMethod::Get, "get_referee")
    }

    /// Raw reference document, usually a PDF.
    pub fn parse_download_reference(&self, response: HttpResponse) -> Result<Vec<u8>, ApiError> {
        check_status(&response, HttpMethod::Get, "download_reference")?;
        debug!(bytes = response.body.len(), "reference downloaded");
        Ok(response.body)
    }

    pub fn parse_create_referee(&self, response: HttpResponse) -> Result<RefereesResponse, ApiError> {
        parse_json(&response, HttpMethod::Post, "create_referee")
    }

    pub fn parse_create_candidate_with_referees(
        &self,
        response: HttpResponse,
    ) -> Result<CandidateWithRefereesResponse, ApiError> {
        parse_json(&response, HttpMethod::Post, "create_candidate_with_referees")
    }

    pub fn parse_update_referee(&self, response: HttpResponse) -> Result<RefereesResponse, ApiError> {
        parse_json(&response, HttpMethod::Put, "update_referee")
    }

    /// Raw confirmation text from the service, passed through unparsed.
    pub fn parse_send_reference_email(&self, response: HttpResponse) -> Result<String, ApiError> {
        check_status(&response, HttpMethod::Put, "send_reference_email")?;
        debug!(bytes = response.body.len(), "reference request email triggered");
        Ok(response.text())
    }

    fn request(&self, method: HttpMethod, path: &str, body: Option<String>) -> HttpRequest {
        let mut headers = vec![
            ("Accept".to_string(), JSON.to_string()),
            (
                "Authorization".to_string(),
                format!("Bearer {}", self.access_token),
            ),
        ];
        if body.is_some() {
            headers.push(("Content-Type".to_string(), JSON.to_string()));
        }
        HttpRequest {
            method,
            path: format!("{}/{}", self.base_url, trim_separators(path)),
            headers,
            body,
        }
    }
}

fn to_json<T: Serialize>(input: &T) -> Result<String, ApiError> {
    serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))
}

fn parse_json<T: DeserializeOwned>(
    response: &HttpResponse,
    method: HttpMethod,
    operation: &str,
) -> Result<T, ApiError> {
    check_status(response, method, operation)?;
    serde_json::from_slice(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Anything but 200 is a transport error; write operations keep the body.
fn check_status(response: &HttpResponse, method: HttpMethod, operation: &str) -> Result<(), ApiError> {
    if response.status == 200 {
        return Ok(());
    }
    warn!(operation, status = response.status, "unexpected HTTP status");
    Err(ApiError::Transport {
        status: response.status,
        body: method.is_write().then(|| response.text()),
    })
}
