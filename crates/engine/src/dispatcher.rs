use std::sync::Arc;

use phantomflow_events::EventRecord;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, StatusCode, Url};
use tokio::time::Instant;
use tracing::debug;

use crate::counters::{Counters, Outcome};
use crate::errors::Result;
use crate::pool::ConnectionGate;

/// Metric incremented once per completed attempt, labelled by outcome.
pub const REQUESTS_METRIC: &str = "phantomflow_requests_total";

/// Sends one event per call and tallies the result.
///
/// Cloning is cheap: the client, gate and counters are shared handles.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: Client,
    endpoint: Url,
    gate: ConnectionGate,
    counters: Arc<Counters>,
}

impl Dispatcher {
    pub fn new(client: Client, endpoint: Url, gate: ConnectionGate, counters: Arc<Counters>) -> Self {
        Self {
            client,
            endpoint,
            gate,
            counters,
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// POST `event` once, with no retry.
    ///
    /// Exactly one of the shared counters moves per call. Only an encode
    /// failure returns `Err`, and it leaves the counters untouched. Waiting
    /// for a pool slot ends at `cutoff`, which then counts as a failure.
    pub async fn dispatch(&self, event: &EventRecord, cutoff: Option<Instant>) -> Result<Outcome> {
        let body = serde_json::to_vec(event)?;
        let outcome = self.send(body, &event.user_agent, cutoff).await;

        self.counters.record(outcome);
        metrics::counter!(REQUESTS_METRIC, "outcome" => outcome.as_str()).increment(1);
        Ok(outcome)
    }

    async fn send(&self, body: Vec<u8>, user_agent: &str, cutoff: Option<Instant>) -> Outcome {
        let Some(_slot) = self.gate.admit(cutoff).await else {
            return Outcome::Fail;
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(USER_AGENT, user_agent)
            .body(body)
            .send()
            .await;

        match response {
            Ok(response) => {
                let status = response.status();
                // Drain so the connection goes back to the idle pool.
                if let Err(err) = response.bytes().await {
                    debug!(%status, error = %err, "failed to drain response body");
                }
                if status == StatusCode::OK {
                    Outcome::Success
                } else {
                    Outcome::Fail
                }
            }
            Err(err) => {
                debug!(error = %err, "transport failure");
                Outcome::Fail
            }
        }
    }
}
