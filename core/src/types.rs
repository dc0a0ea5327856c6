//! Domain DTOs for the Referoo API.
//!
//! # Design
//! Records coming back from the service are read leniently: every field but
//! the id is optional, so a partially filled referee still parses. Payloads
//! going out are strict in the other direction: every string field is always
//! present and an unset one is written as `""`.
//!
//! The mock-server crate defines its own copies of these shapes; the
//! integration tests catch any drift between the two.

use serde::{Deserialize, Serialize};

use crate::serde_ext::{bool_as_int, none_as_empty, one_or_many, opt_string_or_number};

/// A person asked to provide a reference for a candidate.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Referee {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate_id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub relationship: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub candidate_job_title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(
        rename = "questionnairesNum",
        default,
        deserialize_with = "opt_string_or_number"
    )]
    pub questionnaires_num: Option<String>,
    #[serde(default, with = "bool_as_int")]
    pub send_email_reminders: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// A candidate as returned by the quick-create endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Candidate {
    pub id: u64,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Referee fields sent when creating or updating a referee.
///
/// Unset fields go out as `""`, never as `null` or a missing key.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefereePayload {
    #[serde(with = "none_as_empty", default)]
    pub name: Option<String>,
    #[serde(with = "none_as_empty", default)]
    pub email: Option<String>,
    #[serde(with = "none_as_empty", default)]
    pub phone: Option<String>,
    #[serde(with = "none_as_empty", default)]
    pub relationship: Option<String>,
    #[serde(with = "none_as_empty", default)]
    pub notes: Option<String>,
    #[serde(with = "none_as_empty", default)]
    pub job_title: Option<String>,
    #[serde(with = "none_as_empty", default)]
    pub candidate_job_title: Option<String>,
    #[serde(with = "none_as_empty", default)]
    pub company: Option<String>,
    #[serde(with = "none_as_empty", default)]
    pub start: Option<String>,
    #[serde(with = "none_as_empty", default)]
    pub end: Option<String>,
    #[serde(rename = "questionnairesNum", with = "none_as_empty", default)]
    pub questionnaires_num: Option<String>,
    #[serde(with = "bool_as_int", default)]
    pub send_email_reminders: bool,
}

impl RefereePayload {
    /// Payload with only a name and email set, the minimum the service needs.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            ..Self::default()
        }
    }
}

/// Body of `POST candidate/{id}/referee`.
pub type CreateReferee = RefereePayload;

/// Body of `PUT referee/{id}`.
pub type UpdateReferee = RefereePayload;

/// Candidate fields for the quick-create endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewCandidate {
    #[serde(with = "none_as_empty", default)]
    pub first_name: Option<String>,
    #[serde(with = "none_as_empty", default)]
    pub last_name: Option<String>,
    #[serde(with = "none_as_empty", default)]
    pub email: Option<String>,
    #[serde(with = "none_as_empty", default)]
    pub phone: Option<String>,
}

/// Body of `POST referee/quick`.
///
/// The service accepts up to five referees and emails each of them a
/// reference request on creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateCandidateWithReferees {
    pub candidate: NewCandidate,
    #[serde(default)]
    pub referees: Vec<RefereePayload>,
}

/// Envelope returned by every referee endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefereesResponse {
    #[serde(default, deserialize_with = "one_or_many")]
    pub data: Vec<Referee>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

impl RefereesResponse {
    /// First referee in the envelope, for single-record endpoints.
    pub fn first(&self) -> Option<&Referee> {
        self.data.first()
    }
}

/// Envelope returned by `POST referee/quick`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CandidateWithRefereesResponse {
    pub candidate: Candidate,
    #[serde(default)]
    pub referees: Vec<Referee>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_payload_fields_serialize_as_empty_strings() {
        let payload = RefereePayload {
            name: Some("Jane".to_string()),
            ..RefereePayload::default()
        };
        let json = serde_json::to_value(&payload).unwrap();
        let obj = json.as_object().unwrap();

        assert_eq!(obj.len(), 12);
        assert_eq!(json["name"], "Jane");
        for key in [
            "email",
            "phone",
            "relationship",
            "notes",
            "job_title",
            "candidate_job_title",
            "company",
            "start",
            "end",
            "questionnairesNum",
        ] {
            assert_eq!(json[key], "", "{key} should be an empty string");
        }
        assert_eq!(json["send_email_reminders"], 0);
    }

    #[test]
    fn quick_create_candidate_fields_are_never_null() {
        let payload = CreateCandidateWithReferees {
            candidate: NewCandidate {
                first_name: Some("Sam".to_string()),
                ..NewCandidate::default()
            },
            referees: vec![RefereePayload::new("Jane", "jane@example.com")],
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["candidate"]["first_name"], "Sam");
        assert_eq!(json["candidate"]["last_name"], "");
        assert_eq!(json["candidate"]["phone"], "");
        assert_eq!(json["referees"][0]["email"], "jane@example.com");
        assert_eq!(json["referees"][0]["company"], "");
    }

    #[test]
    fn referee_parses_partial_record() {
        let referee: Referee = serde_json::from_str(
            r#"{"id":7,"name":"Jane","phone":null,"questionnairesNum":2,"send_email_reminders":1}"#,
        )
        .unwrap();
        assert_eq!(referee.id, 7);
        assert_eq!(referee.name.as_deref(), Some("Jane"));
        assert_eq!(referee.phone, None);
        assert_eq!(referee.questionnaires_num.as_deref(), Some("2"));
        assert!(referee.send_email_reminders);
        assert_eq!(referee.candidate_id, None);
    }

    #[test]
    fn envelope_accepts_single_object() {
        let response: RefereesResponse =
            serde_json::from_str(r#"{"data":{"id":3,"name":"Lee"}}"#).unwrap();
        assert_eq!(response.data.len(), 1);
        assert_eq!(response.first().unwrap().id, 3);
    }

    #[test]
    fn envelope_tolerates_missing_data() {
        let response: RefereesResponse = serde_json::from_str(r#"{"total":0}"#).unwrap();
        assert!(response.data.is_empty());
        assert_eq!(response.total, Some(0));
    }
}
