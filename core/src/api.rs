//! One method per Referoo endpoint.
//!
//! `RefereeApi` pairs a `RefereeClient` with a `Transport` and runs
//! build, execute and parse for each call. It holds no per-call state, so a
//! single instance can be cloned or shared across threads freely.

use crate::client::RefereeClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::transport::{Transport, UreqTransport};
use crate::types::{
    CandidateWithRefereesResponse, CreateCandidateWithReferees, CreateReferee, RefereesResponse,
    UpdateReferee,
};

#[derive(Debug, Clone)]
pub struct RefereeApi<T = UreqTransport> {
    client: RefereeClient,
    transport: T,
}

impl RefereeApi<UreqTransport> {
    /// Blocking client over ureq using the configured timeout.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::with_transport(
            RefereeClient::from_config(config),
            UreqTransport::new(config.timeout()),
        )
    }
}

impl<T: Transport> RefereeApi<T> {
    pub fn with_transport(client: RefereeClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &RefereeClient {
        &self.client
    }

    /// Referees on the account in creation order, at most 50 per page.
    pub fn list_referees(
        &self,
        offset: Option<i64>,
        limit: Option<i64>,
    ) -> Result<RefereesResponse, ApiError> {
        let response = self
            .transport
            .execute(self.client.build_list_referees(offset, limit))?;
        self.client.parse_list_referees(response)
    }

    /// All referees of one candidate.
    pub fn candidate_referees(&self, candidate_id: u64) -> Result<RefereesResponse, ApiError> {
        let response = self
            .transport
            .execute(self.client.build_candidate_referees(candidate_id))?;
        self.client.parse_candidate_referees(response)
    }

    pub fn get_referee(&self, id: u64) -> Result<RefereesResponse, ApiError> {
        let response = self.transport.execute(self.client.build_get_referee(id))?;
        self.client.parse_get_referee(response)
    }

    /// The referee's completed reference, as served (normally PDF bytes).
    pub fn download_reference(&self, id: u64) -> Result<Vec<u8>, ApiError> {
        let response = self
            .transport
            .execute(self.client.build_download_reference(id))?;
        self.client.parse_download_reference(response)
    }

    pub fn create_referee(
        &self,
        candidate_id: u64,
        input: &CreateReferee,
    ) -> Result<RefereesResponse, ApiError> {
        let request = self.client.build_create_referee(candidate_id, input)?;
        let response = self.transport.execute(request)?;
        self.client.parse_create_referee(response)
    }

    /// Create a candidate and their referees in one call. The service emails
    /// each referee a reference request.
    pub fn create_candidate_with_referees(
        &self,
        input: &CreateCandidateWithReferees,
    ) -> Result<CandidateWithRefereesResponse, ApiError> {
        let request = self.client.build_create_candidate_with_referees(input)?;
        let response = self.transport.execute(request)?;
        self.client.parse_create_candidate_with_referees(response)
    }

    pub fn update_referee(
        &self,
        id: u64,
        input: &UpdateReferee,
    ) -> Result<RefereesResponse, ApiError> {
        let request = self.client.build_update_referee(id, input)?;
        let response = self.transport.execute(request)?;
        self.client.parse_update_referee(response)
    }

    /// Ask the service to email the referee a reference request.
    pub fn send_reference_email(&self, id: u64) -> Result<String, ApiError> {
        let response = self
            .transport
            .execute(self.client.build_send_reference_email(id))?;
        self.client.parse_send_reference_email(response)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};
    use crate::types::RefereePayload;

    /// Transport that records requests and replies with a canned response.
    fn canned(
        status: u16,
        body: &'static str,
    ) -> (
        impl Fn(HttpRequest) -> Result<HttpResponse, ApiError> + Send + Sync,
        Arc<Mutex<Vec<HttpRequest>>>,
    ) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        let transport = move |req: HttpRequest| -> Result<HttpResponse, ApiError> {
            log.lock().unwrap().push(req);
            Ok(HttpResponse {
                status,
                headers: Vec::new(),
                body: body.as_bytes().to_vec(),
            })
        };
        (transport, seen)
    }

    fn api<T: Transport>(transport: T) -> RefereeApi<T> {
        RefereeApi::with_transport(RefereeClient::new("http://referoo.test", "tok"), transport)
    }

    #[test]
    fn from_config_uses_configured_base_url() {
        let config = ClientConfig::new("http://referoo.test/", "tok");
        let api = RefereeApi::from_config(&config);
        assert_eq!(api.client().base_url(), "http://referoo.test");
    }

    #[test]
    fn list_referees_sends_clamped_query() {
        let (transport, seen) = canned(200, r#"{"data":[]}"#);
        let result = api(transport).list_referees(Some(-5), Some(100)).unwrap();
        assert!(result.data.is_empty());

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].path, "http://referoo.test/referees/?limit=50");
    }

    #[test]
    fn create_referee_round_trip() {
        let (transport, seen) = canned(200, r#"{"data":[{"id":99,"name":"Jane"}]}"#);
        let input = RefereePayload {
            name: Some("Jane".to_string()),
            ..RefereePayload::default()
        };
        let result = api(transport).create_referee(42, &input).unwrap();
        assert_eq!(result.first().unwrap().id, 99);

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].method, HttpMethod::Post);
        assert_eq!(seen[0].path, "http://referoo.test/candidate/42/referee");
        let body: serde_json::Value =
            serde_json::from_str(seen[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body["phone"], "");
    }

    #[test]
    fn non_200_from_get_is_transport_error() {
        let (transport, _) = canned(503, "unavailable");
        let err = api(transport).candidate_referees(1).unwrap_err();
        assert!(matches!(err, ApiError::Transport { status: 503, body: None }));
    }

    #[test]
    fn connection_failure_propagates() {
        let transport = |_: HttpRequest| -> Result<HttpResponse, ApiError> {
            Err(ApiError::Connection("refused".into()))
        };
        let err = api(transport).get_referee(1).unwrap_err();
        assert!(matches!(err, ApiError::Connection(_)));
    }
}
