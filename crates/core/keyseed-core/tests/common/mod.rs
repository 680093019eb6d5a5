//! Mock autocomplete upstream for integration tests

#![allow(dead_code)]

use axum::{
    extract::{Query, State},
    http::{header::USER_AGENT, HeaderMap, StatusCode},
    routing::get,
    Router,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Canned answer for one search phrase
#[derive(Clone)]
pub struct Canned {
    pub status: StatusCode,
    pub body: String,
    pub delay: Duration,
}

impl Canned {
    pub fn ok(body: &str) -> Self {
        Self {
            status: StatusCode::OK,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn status(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn slow(delay: Duration, body: &str) -> Self {
        Self {
            status: StatusCode::OK,
            body: body.to_string(),
            delay,
        }
    }
}

#[derive(Clone, Default)]
struct MockState {
    answers: Arc<HashMap<String, Canned>>,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

/// A request observed by the mock server
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub params: HashMap<String, String>,
    pub user_agent: Option<String>,
}

/// Running mock upstream
pub struct MockUpstream {
    pub addr: SocketAddr,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl MockUpstream {
    /// Endpoint URL to point the fetcher at
    pub fn endpoint(&self) -> String {
        format!("http://{}/complete/search", self.addr)
    }

    /// Requests received so far
    pub fn seen(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }
}

async fn suggest(
    State(state): State<MockState>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> (StatusCode, String) {
    state.seen.lock().unwrap().push(SeenRequest {
        params: params.clone(),
        user_agent: headers
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });

    let phrase = params.get("q").cloned().unwrap_or_default();
    match state.answers.get(&phrase) {
        Some(canned) => {
            if !canned.delay.is_zero() {
                tokio::time::sleep(canned.delay).await;
            }
            (canned.status, canned.body.clone())
        }
        None => (StatusCode::NOT_FOUND, String::new()),
    }
}

/// Start a mock upstream on an ephemeral local port
pub async fn start_mock_upstream(answers: Vec<(&str, Canned)>) -> MockUpstream {
    let state = MockState {
        answers: Arc::new(
            answers
                .into_iter()
                .map(|(phrase, canned)| (phrase.to_string(), canned))
                .collect(),
        ),
        seen: Arc::new(Mutex::new(Vec::new())),
    };
    let seen = Arc::clone(&state.seen);

    let app = Router::new()
        .route("/complete/search", get(suggest))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock upstream");
    let addr = listener.local_addr().expect("mock upstream address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock upstream server");
    });

    MockUpstream { addr, seen }
}
