//! Throwaway moderation endpoint for exercising the HTTP client.

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

pub struct Canned {
    status: u16,
    body: String,
    delay: Duration,
}

impl Canned {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, ms: u64) -> Self {
        self.delay = Duration::from_millis(ms);
        self
    }
}

/// What the endpoint saw for one call.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

struct Fixture {
    responses: Mutex<VecDeque<Canned>>,
    requests: Mutex<Vec<Recorded>>,
}

pub struct TestServer {
    pub base_url: String,
    fixture: Arc<Fixture>,
}

impl TestServer {
    pub fn requests(&self) -> Vec<Recorded> {
        self.fixture.requests.lock().unwrap().clone()
    }
}

/// Serves the moderation route, answering calls with `responses` in order.
pub async fn serve(responses: Vec<Canned>) -> TestServer {
    let fixture = Arc::new(Fixture {
        responses: Mutex::new(responses.into()),
        requests: Mutex::new(Vec::new()),
    });

    let app = Router::new()
        .route(common::MODERATION_PATH, post(moderate))
        .with_state(fixture.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    TestServer { base_url, fixture }
}

async fn moderate(State(fixture): State<Arc<Fixture>>, headers: HeaderMap, body: String) -> Response {
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    fixture.requests.lock().unwrap().push(Recorded {
        authorization: header_value(header::AUTHORIZATION),
        content_type: header_value(header::CONTENT_TYPE),
        body,
    });

    let next = fixture.responses.lock().unwrap().pop_front();
    let Some(canned) = next else {
        return (StatusCode::INTERNAL_SERVER_ERROR, "no canned response left").into_response();
    };

    tokio::time::sleep(canned.delay).await;
    let status = StatusCode::from_u16(canned.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [(header::CONTENT_TYPE, "application/json")], canned.body).into_response()
}
