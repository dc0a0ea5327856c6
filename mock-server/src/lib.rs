use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

/// The service pages in windows of at most this many records.
pub const MAX_LIMIT: usize = 50;

/// Referees accepted by a single quick-create call.
pub const MAX_QUICK_REFEREES: usize = 5;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Referee {
    pub id: u64,
    pub candidate_id: u64,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub relationship: Option<String>,
    pub notes: Option<String>,
    pub job_title: Option<String>,
    pub candidate_job_title: Option<String>,
    pub company: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    #[serde(rename = "questionnairesNum")]
    pub questionnaires_num: Option<u32>,
    pub send_email_reminders: u8,
    pub status: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Candidate {
    pub id: u64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Referee fields as the service expects them: every key present, `""` for
/// unset. A `null` or missing key is rejected with 422.
#[derive(Debug, Deserialize)]
pub struct RefereeInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub relationship: String,
    pub notes: String,
    pub job_title: String,
    pub candidate_job_title: String,
    pub company: String,
    pub start: String,
    pub end: String,
    #[serde(rename = "questionnairesNum")]
    pub questionnaires_num: String,
    pub send_email_reminders: u8,
}

#[derive(Debug, Deserialize)]
pub struct CandidateInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Deserialize)]
pub struct QuickInput {
    pub candidate: CandidateInput,
    pub referees: Vec<RefereeInput>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub offset: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RefereesEnvelope {
    pub data: Vec<Referee>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuickEnvelope {
    pub candidate: Candidate,
    pub referees: Vec<Referee>,
}

#[derive(Debug, Default)]
pub struct Store {
    referees: BTreeMap<u64, Referee>,
    candidates: BTreeMap<u64, Candidate>,
    next_id: u64,
    /// Referee ids that were sent a reference request, in order.
    pub emails_sent: Vec<u64>,
}

impl Store {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn insert_referee(&mut self, candidate_id: u64, input: RefereeInput) -> Referee {
        let id = self.next_id();
        let mut referee = Referee {
            id,
            candidate_id,
            name: None,
            email: None,
            phone: None,
            relationship: None,
            notes: None,
            job_title: None,
            candidate_job_title: None,
            company: None,
            start: None,
            end: None,
            questionnaires_num: None,
            send_email_reminders: 0,
            status: "pending".to_string(),
        };
        apply(&mut referee, input);
        self.referees.insert(id, referee.clone());
        referee
    }
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Clone)]
pub struct AppState {
    token: Arc<str>,
    pub db: Db,
}

impl AppState {
    pub fn new(token: &str) -> Self {
        Self {
            token: Arc::from(token),
            db: Arc::new(RwLock::new(Store::default())),
        }
    }
}

pub fn app(token: &str) -> Router {
    router(AppState::new(token))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/referees", get(list_referees))
        .route("/referees/", get(list_referees))
        .route("/candidate/{id}/referees", get(candidate_referees))
        .route("/candidate/{id}/referee", post(create_referee))
        .route("/referee/quick", post(quick_create))
        .route("/referee/{id}", get(get_referee).put(update_referee))
        .route("/referee/{id}/reference", get(download_reference))
        .route("/referee/{id}/email", put(send_email))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer))
        .with_state(state)
}

pub async fn run(listener: TcpListener, token: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(token)).await
}

async fn require_bearer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let expected = format!("Bearer {}", state.token);
    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    if presented != Some(expected.as_str()) {
        tracing::warn!(path = %request.uri().path(), "rejected request without valid bearer token");
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(next.run(request).await)
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Copy set fields from `input`; `""` leaves the stored value untouched.
fn apply(referee: &mut Referee, input: RefereeInput) {
    let fields = [
        (&mut referee.name, input.name),
        (&mut referee.email, input.email),
        (&mut referee.phone, input.phone),
        (&mut referee.relationship, input.relationship),
        (&mut referee.notes, input.notes),
        (&mut referee.job_title, input.job_title),
        (&mut referee.candidate_job_title, input.candidate_job_title),
        (&mut referee.company, input.company),
        (&mut referee.start, input.start),
        (&mut referee.end, input.end),
    ];
    for (slot, value) in fields {
        if let Some(value) = non_empty(value) {
            *slot = Some(value);
        }
    }
    if let Ok(n) = input.questionnaires_num.parse() {
        referee.questionnaires_num = Some(n);
    }
    referee.send_email_reminders = input.send_email_reminders.min(1);
}

async fn list_referees(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Json<RefereesEnvelope> {
    let store = state.db.read().await;
    let limit = params.limit.unwrap_or(MAX_LIMIT).min(MAX_LIMIT);
    let data = store
        .referees
        .values()
        .skip(params.offset.unwrap_or(0))
        .take(limit)
        .cloned()
        .collect();
    Json(RefereesEnvelope {
        data,
        total: Some(store.referees.len()),
    })
}

async fn candidate_referees(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<RefereesEnvelope>, StatusCode> {
    let store = state.db.read().await;
    if !store.candidates.contains_key(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    let data: Vec<Referee> = store
        .referees
        .values()
        .filter(|r| r.candidate_id == id)
        .cloned()
        .collect();
    Ok(Json(RefereesEnvelope {
        total: Some(data.len()),
        data,
    }))
}

async fn get_referee(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<RefereesEnvelope>, StatusCode> {
    let store = state.db.read().await;
    let referee = store.referees.get(&id).cloned().ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(RefereesEnvelope {
        data: vec![referee],
        total: None,
    }))
}

async fn download_reference(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<impl IntoResponse, StatusCode> {
    let store = state.db.read().await;
    let referee = store.referees.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    let mut pdf = b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n".to_vec();
    pdf.extend_from_slice(
        format!(
            "% reference from {}\n%%EOF\n",
            referee.name.as_deref().unwrap_or("unknown")
        )
        .as_bytes(),
    );
    Ok(([(header::CONTENT_TYPE, "application/pdf")], pdf))
}

async fn create_referee(
    State(state): State<AppState>,
    Path(candidate_id): Path<u64>,
    Json(input): Json<RefereeInput>,
) -> Result<Json<RefereesEnvelope>, StatusCode> {
    let mut store = state.db.write().await;
    if !store.candidates.contains_key(&candidate_id) {
        return Err(StatusCode::NOT_FOUND);
    }
    let referee = store.insert_referee(candidate_id, input);
    Ok(Json(RefereesEnvelope {
        data: vec![referee],
        total: None,
    }))
}

async fn quick_create(
    State(state): State<AppState>,
    Json(input): Json<QuickInput>,
) -> Result<Json<QuickEnvelope>, (StatusCode, Json<serde_json::Value>)> {
    if input.referees.len() > MAX_QUICK_REFEREES {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({
                "error": format!("at most {MAX_QUICK_REFEREES} referees per candidate")
            })),
        ));
    }

    let mut store = state.db.write().await;
    let candidate = Candidate {
        id: store.next_id(),
        first_name: non_empty(input.candidate.first_name),
        last_name: non_empty(input.candidate.last_name),
        email: non_empty(input.candidate.email),
        phone: non_empty(input.candidate.phone),
    };
    store.candidates.insert(candidate.id, candidate.clone());

    let mut referees = Vec::with_capacity(input.referees.len());
    for referee_input in input.referees {
        let mut referee = store.insert_referee(candidate.id, referee_input);
        referee.status = "emailed".to_string();
        store.referees.insert(referee.id, referee.clone());
        store.emails_sent.push(referee.id);
        referees.push(referee);
    }

    Ok(Json(QuickEnvelope {
        candidate,
        referees,
    }))
}

async fn update_referee(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(input): Json<RefereeInput>,
) -> Result<Json<RefereesEnvelope>, StatusCode> {
    let mut store = state.db.write().await;
    let referee = store.referees.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    apply(referee, input);
    Ok(Json(RefereesEnvelope {
        data: vec![referee.clone()],
        total: None,
    }))
}

async fn send_email(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let mut store = state.db.write().await;
    let referee = store.referees.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    referee.status = "emailed".to_string();
    store.emails_sent.push(id);
    Ok(Json(serde_json::json!({ "message": "Reference request sent" })))
}
