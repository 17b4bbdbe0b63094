//! Remote quantum annealing service client.
//!
//! Speaks a JSON dialect of the D-Wave Solver API: a problem is submitted
//! with `POST {endpoint}/problems/`, then polled with
//! `GET {endpoint}/problems/{id}/` until it completes. The token travels in
//! the `X-Auth-Token` header.
//!
//! Credentials are validated before any request is made. The whole exchange
//! runs under the `timeout` of the [`SolverConfig`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

use crate::domain::{Assignment, Qubo, Sample};
use crate::error::{ConfigError, Error, OptimizerError, Result};
use crate::port::{QuboOptimizer, SolverConfig};

/// Solver API endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "https://cloud.dwavesys.com/sapi";

/// Solver used when none is configured.
pub const DEFAULT_SOLVER: &str = "Advantage_system4.1";

/// Authentication header carrying the API token.
const AUTH_HEADER: &str = "X-Auth-Token";

const BACKEND: &str = "sapi";

/// Default qubit count a remote solver accepts.
pub const DEFAULT_MAX_VARIABLES: usize = 5_000;

/// Default coupler count a remote solver accepts.
pub const DEFAULT_MAX_INTERACTIONS: usize = 40_000;

/// Default delay between status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Remote annealing service client.
#[derive(Debug, Clone)]
pub struct SapiOptimizer {
    client: Client,
    poll_interval: Duration,
    max_variables: usize,
    max_interactions: usize,
}

impl SapiOptimizer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_variables: DEFAULT_MAX_VARIABLES,
            max_interactions: DEFAULT_MAX_INTERACTIONS,
        }
    }

    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Override the variable and interaction limits of the target solver.
    #[must_use]
    pub fn with_limits(mut self, max_variables: usize, max_interactions: usize) -> Self {
        self.max_variables = max_variables;
        self.max_interactions = max_interactions;
        self
    }

    fn check_capacity(&self, qubo: &Qubo) -> Result<()> {
        let limits = [
            ("variables", qubo.num_vars(), self.max_variables),
            ("interactions", qubo.num_interactions(), self.max_interactions),
        ];
        for (dimension, actual, limit) in limits {
            if actual > limit {
                return Err(OptimizerError::CapacityExceeded {
                    backend: BACKEND,
                    dimension,
                    actual,
                    limit: Some(limit),
                }
                .into());
            }
        }
        Ok(())
    }

    async fn run(&self, connection: &Connection<'_>, qubo: &Qubo, num_reads: u32) -> Result<Sample> {
        let request = SubmitRequest::new(connection.solver, qubo, num_reads);
        let submit = self
            .client
            .post(connection.problems_url()?)
            .header(AUTH_HEADER, connection.token)
            .json(&request);
        let mut problem = send(submit, qubo.num_vars()).await?;
        info!(
            problem_id = %problem.id,
            solver = connection.solver,
            variables = qubo.num_vars(),
            num_reads,
            "problem submitted"
        );

        loop {
            match problem.status.as_str() {
                "COMPLETED" => break,
                "FAILED" | "CANCELLED" => {
                    return Err(OptimizerError::Backend {
                        backend: BACKEND,
                        reason: format!(
                            "problem {} {}: {}",
                            problem.id,
                            problem.status.to_lowercase(),
                            problem.error_message.as_deref().unwrap_or("no details")
                        ),
                    }
                    .into());
                }
                status => {
                    debug!(problem_id = %problem.id, status, "waiting for problem");
                    tokio::time::sleep(self.poll_interval).await;
                    let poll = self
                        .client
                        .get(connection.problem_url(&problem.id)?)
                        .header(AUTH_HEADER, connection.token);
                    problem = send(poll, qubo.num_vars()).await?;
                }
            }
        }

        let answer = problem.answer.ok_or_else(|| OptimizerError::InvalidResponse {
            backend: BACKEND,
            reason: format!("problem {} completed without an answer", problem.id),
        })?;
        best_sample(qubo, answer)
    }
}

impl Default for SapiOptimizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuboOptimizer for SapiOptimizer {
    fn name(&self) -> &'static str {
        BACKEND
    }

    async fn solve(&self, qubo: &Qubo, config: &SolverConfig) -> Result<Sample> {
        let connection = Connection::from_config(config)?;
        self.check_capacity(qubo)?;
        if qubo.is_empty() {
            return Ok(Sample::empty());
        }

        let budget = config.timeout();
        match tokio::time::timeout(budget, self.run(&connection, qubo, config.num_reads())).await {
            Ok(result) => result,
            Err(_) => {
                warn!(budget = ?budget, "remote solve timed out");
                Err(OptimizerError::Timeout {
                    backend: BACKEND,
                    budget,
                }
                .into())
            }
        }
    }
}

/// Validated connection parameters.
#[derive(Debug)]
struct Connection<'a> {
    token: &'a str,
    base: Url,
    solver: &'a str,
}

impl<'a> Connection<'a> {
    fn from_config(config: &'a SolverConfig) -> Result<Self> {
        let token = config
            .token()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingField {
                field: "DWAVE_TOKEN",
            })?;

        let endpoint = config.endpoint().unwrap_or(DEFAULT_ENDPOINT);
        let base = Url::parse(endpoint).map_err(|e| ConfigError::InvalidValue {
            field: "endpoint",
            reason: format!("{endpoint}: {e}"),
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                field: "endpoint",
                reason: format!("unsupported scheme '{}'", base.scheme()),
            }
            .into());
        }

        let solver = config.solver().unwrap_or(DEFAULT_SOLVER).trim();
        if solver.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "solver",
                reason: "solver name cannot be empty".into(),
            }
            .into());
        }

        Ok(Self {
            token,
            base,
            solver,
        })
    }

    fn problems_url(&self) -> Result<Url> {
        self.join(&["problems"])
    }

    /// Problem ids come from the service and are escaped as a single segment.
    fn problem_url(&self, id: &str) -> Result<Url> {
        self.join(&["problems", id])
    }

    fn join(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ConfigError::InvalidValue {
                field: "endpoint",
                reason: format!("{} cannot carry a path", self.base),
            })?
            .pop_if_empty()
            .extend(segments)
            .push("");
        Ok(url)
    }
}

#[derive(Debug, Serialize)]
struct SubmitRequest<'a> {
    solver: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    data: ProblemData,
    params: Params,
}

impl<'a> SubmitRequest<'a> {
    fn new(solver: &'a str, qubo: &Qubo, num_reads: u32) -> Self {
        Self {
            solver,
            kind: "qubo",
            data: ProblemData {
                format: "sparse",
                num_variables: qubo.num_vars(),
                linear: qubo.linear_terms().filter(|(_, c)| *c != 0.0).collect(),
                quadratic: qubo.quadratic_terms().filter(|(_, _, c)| *c != 0.0).collect(),
            },
            params: Params { num_reads },
        }
    }
}

#[derive(Debug, Serialize)]
struct ProblemData {
    format: &'static str,
    num_variables: usize,
    linear: Vec<(usize, f64)>,
    quadratic: Vec<(usize, usize, f64)>,
}

#[derive(Debug, Serialize)]
struct Params {
    num_reads: u32,
}

#[derive(Debug, Deserialize)]
struct ProblemStatus {
    id: String,
    status: String,
    #[serde(default)]
    answer: Option<Answer>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Answer {
    samples: Vec<Vec<u8>>,
    #[serde(default)]
    energies: Vec<f64>,
}

async fn send(request: RequestBuilder, variables: usize) -> Result<ProblemStatus> {
    let response = request.send().await.map_err(|e| OptimizerError::Connectivity {
        backend: BACKEND,
        reason: e.to_string(),
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(status_error(status, &body, variables));
    }

    response
        .json::<ProblemStatus>()
        .await
        .map_err(|e| {
            OptimizerError::InvalidResponse {
                backend: BACKEND,
                reason: e.to_string(),
            }
            .into()
        })
}

/// Map a non-success HTTP status onto the error taxonomy.
///
/// `variables` is the size of the submitted problem, reported when the
/// service rejects it as too large.
fn status_error(status: StatusCode, body: &str, variables: usize) -> Error {
    let detail = if body.is_empty() {
        status.to_string()
    } else {
        format!("{status}: {}", body.trim())
    };
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ConfigError::InvalidValue {
            field: "token",
            reason: format!("rejected by solver service ({detail})"),
        }
        .into(),
        StatusCode::PAYLOAD_TOO_LARGE => {
            warn!(variables, detail = %detail, "solver service rejected problem size");
            OptimizerError::CapacityExceeded {
                backend: BACKEND,
                dimension: "variables",
                actual: variables,
                limit: None,
            }
            .into()
        }
        StatusCode::TOO_MANY_REQUESTS => OptimizerError::Connectivity {
            backend: BACKEND,
            reason: detail,
        }
        .into(),
        s if s.is_server_error() => OptimizerError::Connectivity {
            backend: BACKEND,
            reason: detail,
        }
        .into(),
        _ => OptimizerError::Backend {
            backend: BACKEND,
            reason: detail,
        }
        .into(),
    }
}

/// Pick the lowest-energy sample, re-evaluated against the submitted QUBO.
fn best_sample(qubo: &Qubo, answer: Answer) -> Result<Sample> {
    let invalid = |reason: String| -> Error {
        OptimizerError::InvalidResponse {
            backend: BACKEND,
            reason,
        }
        .into()
    };

    let mut best: Option<Sample> = None;
    for (index, bits) in answer.samples.into_iter().enumerate() {
        if bits.len() != qubo.num_vars() {
            return Err(invalid(format!(
                "sample {index} has {} bits, expected {}",
                bits.len(),
                qubo.num_vars()
            )));
        }
        let assignment = Assignment::try_new(bits).map_err(|e| invalid(e.to_string()))?;
        let energy = qubo.evaluate(&assignment)?;
        if let Some(reported) = answer.energies.get(index) {
            if (reported - energy).abs() > 1e-6 {
                warn!(index, reported, energy, "reported energy differs from local evaluation");
            }
        }
        if best.as_ref().map_or(true, |b| energy < b.energy) {
            best = Some(Sample { assignment, energy });
        }
    }

    best.ok_or_else(|| invalid("answer contains no samples".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{QuboFormulator, TradeGraph};

    fn triangle() -> Qubo {
        let mut graph = TradeGraph::new();
        graph.add_trade_desire("A", "B").unwrap();
        graph.add_trade_desire("B", "C").unwrap();
        graph.add_trade_desire("C", "A").unwrap();
        QuboFormulator::build(&graph)
    }

    // ==================== Connection Validation Tests ====================

    #[test]
    fn test_missing_token_is_config_error() {
        let config = SolverConfig::new();
        let err = Connection::from_config(&config).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::MissingField { field: "DWAVE_TOKEN" })
        ));
    }

    #[test]
    fn test_blank_token_is_config_error() {
        let config = SolverConfig::new().with_token("   ");
        assert!(Connection::from_config(&config).is_err());
    }

    #[test]
    fn test_endpoint_scheme_validated() {
        let config = SolverConfig::new()
            .with_token("t")
            .with_endpoint("ftp://example.com/sapi");
        let err = Connection::from_config(&config).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue { field: "endpoint", .. })
        ));
    }

    #[test]
    fn test_malformed_endpoint_rejected() {
        let config = SolverConfig::new().with_token("t").with_endpoint("not a url");
        assert!(Connection::from_config(&config).is_err());
    }

    #[test]
    fn test_empty_solver_rejected() {
        let config = SolverConfig::new().with_token("t").with_solver("");
        let err = Connection::from_config(&config).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue { field: "solver", .. })
        ));
    }

    #[test]
    fn test_defaults_and_urls() {
        let config = SolverConfig::new().with_token("t");
        let connection = Connection::from_config(&config).unwrap();
        assert_eq!(connection.solver, DEFAULT_SOLVER);
        assert_eq!(
            connection.problems_url().unwrap().as_str(),
            "https://cloud.dwavesys.com/sapi/problems/"
        );
        assert_eq!(
            connection.problem_url("abc").unwrap().as_str(),
            "https://cloud.dwavesys.com/sapi/problems/abc/"
        );
    }

    #[test]
    fn test_problem_id_is_escaped() {
        let config = SolverConfig::new().with_token("t");
        let connection = Connection::from_config(&config).unwrap();
        assert_eq!(
            connection.problem_url("a/b?c#d").unwrap().as_str(),
            "https://cloud.dwavesys.com/sapi/problems/a%2Fb%3Fc%23d/"
        );
    }

    #[test]
    fn test_endpoint_without_trailing_slash() {
        let config = SolverConfig::new()
            .with_token("t")
            .with_endpoint("http://localhost:8080/sapi");
        let connection = Connection::from_config(&config).unwrap();
        assert_eq!(
            connection.problems_url().unwrap().as_str(),
            "http://localhost:8080/sapi/problems/"
        );
    }

    // ==================== Request/Response Serialization Tests ====================

    #[test]
    fn test_request_serialization() {
        let qubo = triangle();
        let request = SubmitRequest::new("Advantage_system4.1", &qubo, 1000);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["solver"], "Advantage_system4.1");
        assert_eq!(json["type"], "qubo");
        assert_eq!(json["data"]["format"], "sparse");
        assert_eq!(json["data"]["num_variables"], 3);
        assert_eq!(json["data"]["linear"][0], serde_json::json!([0, -2.0]));
        assert_eq!(json["data"]["quadratic"][0], serde_json::json!([0, 1, 2.0]));
        assert_eq!(json["params"]["num_reads"], 1000);
    }

    #[test]
    fn test_response_deserialization() {
        let json = r#"{
            "id": "p-1",
            "status": "COMPLETED",
            "answer": {"samples": [[0, 1, 1], [1, 0, 0]], "energies": [-2.0, -2.0]}
        }"#;
        let status: ProblemStatus = serde_json::from_str(json).unwrap();
        assert_eq!(status.id, "p-1");
        assert_eq!(status.answer.unwrap().samples.len(), 2);
    }

    #[test]
    fn test_pending_response_has_no_answer() {
        let status: ProblemStatus =
            serde_json::from_str(r#"{"id": "p-2", "status": "PENDING"}"#).unwrap();
        assert!(status.answer.is_none());
    }

    // ==================== Status Mapping Tests ====================

    #[test]
    fn test_auth_failures_are_config_errors() {
        for status in [StatusCode::UNAUTHORIZED, StatusCode::FORBIDDEN] {
            let err = status_error(status, "bad token", 3);
            assert!(matches!(
                err,
                Error::Config(ConfigError::InvalidValue { field: "token", .. })
            ));
        }
    }

    #[test]
    fn test_transient_statuses_are_retryable() {
        for status in [
            StatusCode::TOO_MANY_REQUESTS,
            StatusCode::BAD_GATEWAY,
            StatusCode::SERVICE_UNAVAILABLE,
        ] {
            assert!(status_error(status, "", 3).is_retryable(), "{status}");
        }
    }

    #[test]
    fn test_payload_too_large_is_capacity_error() {
        let err = status_error(StatusCode::PAYLOAD_TOO_LARGE, "too many qubits", 6000);
        assert!(matches!(
            err,
            Error::Optimizer(OptimizerError::CapacityExceeded {
                dimension: "variables",
                actual: 6000,
                limit: None,
                ..
            })
        ));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_client_errors_are_not_retryable() {
        let err = status_error(StatusCode::BAD_REQUEST, "malformed", 3);
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("malformed"));
    }

    // ==================== Sample Selection Tests ====================

    #[test]
    fn test_best_sample_uses_local_energy() {
        let answer = Answer {
            samples: vec![vec![0, 0, 0], vec![0, 1, 1]],
            energies: vec![-9.0, -2.0],
        };
        let sample = best_sample(&triangle(), answer).unwrap();
        assert_eq!(sample.assignment.bits(), &[0, 1, 1]);
        assert_eq!(sample.energy, -2.0);
    }

    #[test]
    fn test_wrong_sample_length_rejected() {
        let answer = Answer {
            samples: vec![vec![0, 1]],
            energies: vec![],
        };
        let err = best_sample(&triangle(), answer).unwrap_err();
        assert!(matches!(
            err,
            Error::Optimizer(OptimizerError::InvalidResponse { .. })
        ));
    }

    #[test]
    fn test_non_binary_sample_rejected() {
        let answer = Answer {
            samples: vec![vec![0, 2, 1]],
            energies: vec![],
        };
        assert!(best_sample(&triangle(), answer).is_err());
    }

    #[test]
    fn test_empty_answer_rejected() {
        let answer = Answer {
            samples: vec![],
            energies: vec![],
        };
        assert!(best_sample(&triangle(), answer).is_err());
    }

    // ==================== Pre-flight Tests ====================

    #[test]
    fn test_capacity_checked_before_network() {
        let optimizer = SapiOptimizer::new().with_limits(2, 10);
        let config = SolverConfig::new()
            .with_token("t")
            .with_endpoint("http://127.0.0.1:9/sapi");
        let err = tokio_test::block_on(optimizer.solve(&triangle(), &config)).unwrap_err();
        assert!(matches!(
            err,
            Error::Optimizer(OptimizerError::CapacityExceeded {
                dimension: "variables",
                ..
            })
        ));
    }

    #[test]
    fn test_interaction_capacity() {
        let optimizer = SapiOptimizer::new().with_limits(10, 2);
        let config = SolverConfig::new().with_token("t");
        let err = tokio_test::block_on(optimizer.solve(&triangle(), &config)).unwrap_err();
        assert!(matches!(
            err,
            Error::Optimizer(OptimizerError::CapacityExceeded {
                dimension: "interactions",
                actual: 3,
                limit: Some(2),
                ..
            })
        ));
    }

    #[test]
    fn test_missing_token_fails_before_network() {
        let err = tokio_test::block_on(SapiOptimizer::new().solve(&triangle(), &SolverConfig::new()))
            .unwrap_err();
        assert!(err.to_string().contains("DWAVE_TOKEN"));
    }
}
