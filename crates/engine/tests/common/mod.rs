//! Mock collector endpoints for engine integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::{CONTENT_TYPE, USER_AGENT};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::Router;
use phantomflow_engine::RunConfig;
use phantomflow_events::EventRecord;
use tokio::net::TcpListener;

#[derive(Debug, Clone, Copy)]
pub enum Behavior {
    AlwaysOk,
    AlwaysError,
    /// 200 for even arrivals, 500 for odd ones.
    Alternate,
    /// 200 after holding the request open for the given time.
    Delayed(Duration),
}

struct MockState {
    behavior: Behavior,
    hits: AtomicU64,
    malformed: AtomicU64,
}

pub struct MockCollector {
    pub url: String,
    state: Arc<MockState>,
}

impl MockCollector {
    pub async fn spawn(behavior: Behavior) -> Self {
        let state = Arc::new(MockState {
            behavior,
            hits: AtomicU64::new(0),
            malformed: AtomicU64::new(0),
        });
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new()
            .route("/collect", post(collect))
            .with_state(Arc::clone(&state));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{addr}/collect"),
            state,
        }
    }

    /// Requests the collector has answered.
    pub fn hits(&self) -> u64 {
        self.state.hits.load(Ordering::SeqCst)
    }

    /// Requests whose body or headers did not match the event schema.
    pub fn malformed(&self) -> u64 {
        self.state.malformed.load(Ordering::SeqCst)
    }
}

async fn collect(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let arrival = state.hits.fetch_add(1, Ordering::SeqCst);

    let json_content = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        == Some("application/json");
    let agent_matches = serde_json::from_slice::<EventRecord>(&body)
        .ok()
        .map(|event| {
            headers.get(USER_AGENT).and_then(|value| value.to_str().ok())
                == Some(event.user_agent.as_str())
        })
        .unwrap_or(false);
    if !(json_content && agent_matches) {
        state.malformed.fetch_add(1, Ordering::SeqCst);
    }

    match state.behavior {
        Behavior::AlwaysOk => StatusCode::OK,
        Behavior::Delayed(hold) => {
            tokio::time::sleep(hold).await;
            StatusCode::OK
        }
        Behavior::AlwaysError => StatusCode::INTERNAL_SERVER_ERROR,
        Behavior::Alternate if arrival % 2 == 0 => StatusCode::OK,
        Behavior::Alternate => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// An address nothing listens on, so every connect is refused.
pub fn refused_endpoint() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/collect")
}

/// Defaults with short timeouts so failing runs finish quickly.
pub fn test_config() -> RunConfig {
    let mut config = RunConfig::default();
    config.pool.connect_timeout_ms = 500;
    config.pool.request_timeout_ms = 1_000;
    config.report.timezone = "UTC".to_string();
    config.diagnostics.enabled = false;
    config
}
