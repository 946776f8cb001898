//! # Contract Probe
//!
//! Fires the adversarial [`cases::catalog`] at a live API and reports every
//! case where the server broke its side of the request contract.
//!
//! A case fails when:
//! - the status is outside the case's accepted set,
//! - [`audit_response`] finds a disclosure (5xx, stack trace, internal path,
//!   `x-powered-by` on 404, result fields in a rejection),
//! - the body carries a field or substring the case forbids,
//! - no response arrives at all.
//!
//! A case with a [`FollowUp`] sends one more request addressed by the first
//! 200 it got; that response is judged against the follow-up's own rule and
//! its violations are prefixed with its request line.
//!
//! Boundaries run one after another; the cases of a boundary run
//! concurrently.

// region: --- Modules
pub mod cases;
pub mod report;
// endregion: --- Modules

use std::time::Duration;

use futures_util::future::join_all;
use lib_core::contract::{audit_response, ResponseSnapshot};
use lib_core::{Boundary, ClientConfig, ClientError, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::{info, warn};
use url::Url;

pub use cases::{catalog, Accept, Body, FollowUp, Method, ProbeCase};
pub use report::{CaseOutcome, ProbeReport, Tally};

use crate::api::client::transport_error;

pub struct ContractProbe {
    http: Client,
    base_url: Url,
}

impl ContractProbe {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ClientError::Config(format!("API_BASE_URL must be a valid URL: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Config("API_BASE_URL must be a base URL".to_string()));
        }
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { http, base_url })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(&config.api_base_url, config.timeout())
    }

    fn url_for(&self, case: &ProbeCase) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Config("API base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(&case.segments);
        url.set_query(case.query.as_deref());
        Ok(url)
    }

    async fn send(&self, case: &ProbeCase) -> Result<ResponseSnapshot> {
        let mut builder = self.http.request(case.method.as_reqwest(), self.url_for(case)?);
        for (name, value) in &case.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match &case.body {
            Body::Empty => builder,
            Body::Json(value) => builder.json(value),
            Body::Raw { content_type, data } => builder.header(CONTENT_TYPE, *content_type).body(data.clone()),
        };

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| Some((name.as_str().to_string(), value.to_str().ok()?.to_string())))
            .collect();
        let body = response.text().await.map_err(transport_error)?;

        Ok(ResponseSnapshot { status, headers, body })
    }

    /// Violations in one response.
    pub fn judge(case: &ProbeCase, response: &ResponseSnapshot) -> Vec<String> {
        let mut violations = Vec::new();

        if !case.accept.allows(response.status) {
            violations.push(format!("status {} not accepted ({:?})", response.status, case.accept));
        }

        violations.extend(audit_response(response).iter().map(ToString::to_string));

        if let Some(map) = response.json().as_ref().and_then(|v| v.as_object()) {
            for field in case.forbidden_fields {
                let violation = format!("forbidden field `{field}` in response");
                if map.contains_key(*field) && !violations.contains(&violation) {
                    violations.push(violation);
                }
            }
        }

        for text in case.forbidden_text {
            if response.body.contains(text) {
                violations.push(format!("forbidden text `{text}` in body"));
            }
        }

        violations
    }

    pub async fn run_case(&self, case: &ProbeCase) -> CaseOutcome {
        let responses = join_all((0..case.repeat).map(|_| self.send(case))).await;

        let mut statuses = Vec::with_capacity(responses.len());
        let mut violations = Vec::new();
        let mut next = None;
        for response in responses {
            match response {
                Ok(snapshot) => {
                    statuses.push(snapshot.status);
                    for violation in Self::judge(case, &snapshot) {
                        if !violations.contains(&violation) {
                            violations.push(violation);
                        }
                    }
                    if next.is_none() {
                        next = case.follow_up.as_ref().and_then(|f| f.case_for(case, &snapshot));
                    }
                }
                Err(err) => violations.push(format!("no response: {}", err)),
            }
        }

        if let Some(next) = next {
            let target = next.target();
            match self.send(&next).await {
                Ok(snapshot) => {
                    statuses.push(snapshot.status);
                    violations.extend(Self::judge(&next, &snapshot).into_iter().map(|v| format!("{target}: {v}")));
                }
                Err(err) => violations.push(format!("{target}: no response: {}", err)),
            }
        }

        if violations.is_empty() {
            info!(case = %case.name, boundary = %case.boundary, ?statuses, "probe case passed");
        } else {
            warn!(case = %case.name, boundary = %case.boundary, ?statuses, ?violations, "contract violation");
        }

        CaseOutcome {
            name: case.name.clone(),
            boundary: case.boundary,
            target: case.target(),
            statuses,
            violations,
        }
    }

    /// Run the given cases, boundary by boundary.
    pub async fn run_cases(&self, cases: &[ProbeCase]) -> ProbeReport {
        let mut report = ProbeReport::default();
        for boundary in Boundary::ALL {
            let group: Vec<&ProbeCase> = cases.iter().filter(|c| c.boundary == boundary).collect();
            if group.is_empty() {
                continue;
            }
            info!(%boundary, cases = group.len(), "probing boundary");
            report.outcomes.extend(join_all(group.into_iter().map(|c| self.run_case(c))).await);
        }
        report
    }

    /// Run the full catalog.
    pub async fn run(&self) -> ProbeReport {
        self.run_cases(&catalog()).await
    }
}
