//! Routers resource client and training-job lifecycle.
//!
//! Epistemic foundation:
//! - K_i: A training job is RUNNING until the server reports SUCCESS,
//!   FAILURE, or FAILURE_WITHOUT_RETRY; terminal states never transition
//! - K_i: Waiting is a passive client-side poll; it does not cancel the job
//! - B_i: Constraint validation happens before any network call
//! - I^B: Job duration unknowable → caller-controlled interval and deadline

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

use crate::client::{CompletionGateway, Transport};
use crate::models::{
    validate_job_id, ChatCompletion, ClientConfig, CompletionCreateParams, Judge, MeridianError,
    Result, Router, RouterSpec, RouterTrainingJob, RoutingConstraint, TrainingRequest,
};

const RESOURCE: &str = "router";
const JOB_RESOURCE: &str = "training job";

#[derive(Deserialize)]
struct ListRoutersResponse {
    #[serde(default)]
    routers: Vec<Router>,
}

/// Client for the routers API, including constrained execution and
/// training jobs.
#[derive(Clone)]
pub struct RoutersClient {
    transport: Arc<dyn Transport>,
    gateway: Arc<dyn CompletionGateway>,
    config: ClientConfig,
}

impl RoutersClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        gateway: Arc<dyn CompletionGateway>,
        config: ClientConfig,
    ) -> Self {
        Self {
            transport,
            gateway,
            config,
        }
    }

    /// Whether a router with `router_id` currently exists.
    pub async fn exists(&self, router_id: &str) -> Result<bool> {
        let resp = self
            .transport
            .get(&format!("routers/{router_id}"), &[])
            .await?;
        match resp.status {
            404 => Ok(false),
            _ if resp.is_success() => Ok(true),
            _ => Err(resp.into_request_failed()),
        }
    }

    /// Create a router that routes everything to `base_model`.
    ///
    /// The trivial two-point spec pins both ends of the routing curve to the
    /// base model; genuine routing requires a successful training job.
    /// Fails with `AlreadyExists` when `router_id` is taken (preliminary
    /// existence probe; advisory, not transactional).
    pub async fn create(
        &self,
        router_id: &str,
        base_model: &str,
        description: Option<&str>,
    ) -> Result<Router> {
        if self.exists(router_id).await? {
            return Err(MeridianError::already_exists(RESOURCE, router_id));
        }

        let payload = spec_payload(&RouterSpec::base_model(base_model), description)?;
        let query = vec![("routerId".to_string(), router_id.to_string())];
        let resp = self
            .transport
            .post("routers", &query, Some(payload), None)
            .await?;
        if !resp.is_success() {
            return Err(resp.into_request_failed());
        }

        let router: Router = resp.decode()?;
        info!(router_id = %router.id, base_model = base_model, "Created router");
        Ok(router)
    }

    /// Update a router's spec, producing a new immutable version.
    pub async fn update(
        &self,
        router_id: &str,
        spec: &RouterSpec,
        description: Option<&str>,
    ) -> Result<Router> {
        if !self.exists(router_id).await? {
            return Err(MeridianError::not_found(RESOURCE, router_id));
        }

        let payload = spec_payload(spec, description)?;
        let resp = self
            .transport
            .patch(&format!("routers/{router_id}"), Some(payload))
            .await?;
        if !resp.is_success() {
            return Err(resp.into_request_failed());
        }

        let router: Router = resp.decode()?;
        info!(router_id = %router.id, version = router.version, "Updated router");
        Ok(router)
    }

    /// Fetch a router at `version`, or the latest when `version` is `None`.
    pub async fn get(&self, router_id: &str, version: Option<u32>) -> Result<Router> {
        let query: Vec<(String, String)> = version
            .map(|v| vec![("version".to_string(), v.to_string())])
            .unwrap_or_default();
        let resp = self
            .transport
            .get(&format!("routers/{router_id}"), &query)
            .await?;
        if resp.status == 404 {
            return Err(MeridianError::not_found(RESOURCE, router_id));
        }
        if !resp.is_success() {
            return Err(resp.into_request_failed());
        }
        resp.decode()
    }

    /// List all routers, in server order.
    pub async fn list(&self) -> Result<Vec<Router>> {
        let resp = self.transport.get("routers", &[]).await?;
        if !resp.is_success() {
            return Err(resp.into_request_failed());
        }
        let list: ListRoutersResponse = resp.decode()?;
        Ok(list.routers)
    }

    /// Run a completion through a router under a routing constraint.
    ///
    /// The effective version is the explicit `version` parameter, else the
    /// snapshot's own version. The constraint rides in the request's
    /// `extra_body`; which underlying model served the request is opaque
    /// beyond what the returned completion states.
    pub async fn run(
        &self,
        router: &Router,
        constraint: &RoutingConstraint,
        request: &CompletionCreateParams,
        version: Option<u32>,
    ) -> Result<ChatCompletion> {
        // Validation precedes every network call.
        let extra_body = constraint.render_extra_body()?;

        if !self.exists(&router.id).await? {
            return Err(MeridianError::not_found(RESOURCE, router.id.as_str()));
        }

        let effective_version = version.unwrap_or(router.version);
        let model = format!("{}/versions/{}", router.name, effective_version);

        debug!(router_id = %router.id, version = effective_version, "Running router");
        self.gateway
            .complete(
                &model,
                request,
                &extra_body,
                Some(Duration::from_secs(self.config.evaluation_timeout_secs)),
            )
            .await
    }

    /// Submit a training job fitting `router`'s policy across `llms` using
    /// `judge` for feedback.
    ///
    /// Fails with `InvalidParameter` before any HTTP call when `llms` is
    /// empty. Duplicate model ids are dropped, keeping first-occurrence
    /// order. Returns the job snapshot in its initial state.
    pub async fn create_training_job(
        &self,
        router: &Router,
        judge: &Judge,
        llms: &[String],
        requests: &[TrainingRequest],
    ) -> Result<RouterTrainingJob> {
        if llms.is_empty() {
            return Err(MeridianError::InvalidParameter(format!(
                "llms must not be empty for training router {}",
                router.id
            )));
        }

        let mut deduped: Vec<&String> = Vec::with_capacity(llms.len());
        for llm in llms {
            if !deduped.contains(&llm) {
                deduped.push(llm);
            }
        }

        let payload = json!({
            "routerName": router.name,
            "judgeName": judge.name,
            "llms": deduped,
            "requests": requests,
        });

        let resp = self
            .transport
            .post("router_training_jobs", &[], Some(payload), None)
            .await?;
        if !resp.is_success() {
            return Err(resp.into_request_failed());
        }

        let job: RouterTrainingJob = resp.decode()?;
        info!(
            job_id = %job.id(),
            router = %router.name,
            judge = %judge.name,
            llms = ?deduped,
            "Started training job"
        );
        Ok(job)
    }

    /// Fetch the current status of a training job. No waiting.
    ///
    /// Accepts either a bare job id or a full hierarchical name.
    pub async fn poll_once(&self, job_name_or_id: &str) -> Result<RouterTrainingJob> {
        let job_id = validate_job_id(job_name_or_id)?;
        let resp = self
            .transport
            .get(&format!("router_training_jobs/{job_id}"), &[])
            .await?;
        if resp.status == 404 {
            return Err(MeridianError::not_found(JOB_RESOURCE, job_id));
        }
        if !resp.is_success() {
            return Err(resp.into_request_failed());
        }
        resp.decode()
    }

    /// Poll a training job until it reaches a terminal state or the
    /// deadline elapses.
    ///
    /// Success and failure are both normal returns; a terminal failure is
    /// data about the job, not a fault of the client. Only exceeding
    /// `poll_timeout` is an error; a timed-out job keeps running
    /// server-side and the caller may resume polling later.
    ///
    /// The deadline check precedes each status fetch, so a zero
    /// `poll_timeout` fails immediately without issuing a single request.
    pub async fn wait(
        &self,
        job_name_or_id: &str,
        poll_interval: Duration,
        poll_timeout: Duration,
    ) -> Result<RouterTrainingJob> {
        let job_id = validate_job_id(job_name_or_id)?.to_string();
        let start = Instant::now();
        let deadline = start + poll_timeout;

        loop {
            if Instant::now() >= deadline {
                return Err(MeridianError::Timeout {
                    job_id,
                    waited: start.elapsed(),
                });
            }

            let job = self.poll_once(&job_id).await?;
            info!(
                job_id = %job_id,
                status = %job.status,
                elapsed_secs = start.elapsed().as_secs(),
                "Training job polled"
            );

            if job.status.is_terminal() {
                if job.status.is_failure() {
                    warn!(
                        job_id = %job_id,
                        status = %job.status,
                        retry_count = job.retry_count,
                        error = job.error_message.as_deref().unwrap_or("(none reported)"),
                        "Training job failed"
                    );
                }
                return Ok(job);
            }

            tokio::time::sleep(poll_interval).await;
        }
    }
}

/// Create/update body: `routerSpec` plus an optional description.
fn spec_payload(spec: &RouterSpec, description: Option<&str>) -> Result<Value> {
    let spec_value = serde_json::to_value(spec)
        .map_err(|e| MeridianError::Parse(format!("serializing router spec: {e}")))?;

    let mut payload = Map::new();
    payload.insert("routerSpec".to_string(), spec_value);
    if let Some(description) = description {
        payload.insert(
            "description".to_string(),
            Value::String(description.to_string()),
        );
    }
    Ok(Value::Object(payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::{
        completion_answering, job_body, judge_body, router_body, MockGateway, MockTransport,
    };
    use crate::models::{ChatMessage, ConstraintValue, TrainingJobStatus};

    fn client(transport: Arc<MockTransport>, gateway: Arc<MockGateway>) -> RoutersClient {
        let config = ClientConfig::new("https://api.example.test", "org-1");
        RoutersClient::new(transport, gateway, config)
    }

    fn router_fixture(version: u32) -> Router {
        serde_json::from_value(router_body("my-router", version)).unwrap()
    }

    fn judge_fixture() -> Judge {
        serde_json::from_value(judge_body("my-judge", 1)).unwrap()
    }

    fn request_fixture() -> CompletionCreateParams {
        CompletionCreateParams::from_messages(vec![ChatMessage::user("hello")])
    }

    #[tokio::test]
    async fn test_create_posts_two_point_spec() {
        let transport = Arc::new(MockTransport::new());
        let gateway = Arc::new(MockGateway::new());
        transport.push_response(404, serde_json::json!({}));
        transport.push_response(200, router_body("my-router", 1));

        let router = client(transport.clone(), gateway)
            .create("my-router", "openai/openai/gpt-4o-mini", Some("demo"))
            .await
            .unwrap();

        assert_eq!(router.id, "my-router");
        assert_eq!(router.version, 1);

        let calls = transport.calls();
        assert_eq!(calls[1].path, "routers");
        assert_eq!(
            calls[1].query,
            vec![("routerId".to_string(), "my-router".to_string())]
        );
        let body = calls[1].body.as_ref().unwrap();
        let points = body["routerSpec"]["points"].as_array().unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0]["point"], serde_json::json!({"x": 0.0, "y": 0.0}));
        assert_eq!(points[1]["point"], serde_json::json!({"x": 1.0, "y": 1.0}));
        for point in points {
            assert_eq!(
                point["executor"]["spec"],
                serde_json::json!({
                    "executor_type": "ModelExecutor",
                    "model_name": "openai/openai/gpt-4o-mini"
                })
            );
        }
        assert_eq!(body["description"], "demo");
    }

    #[tokio::test]
    async fn test_create_rejects_existing_router() {
        let transport = Arc::new(MockTransport::new());
        transport.push_response(200, router_body("my-router", 1));

        let err = client(transport.clone(), Arc::new(MockGateway::new()))
            .create("my-router", "openai/openai/gpt-4o-mini", None)
            .await
            .unwrap_err();

        assert!(matches!(err, MeridianError::AlreadyExists { .. }));
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_run_attaches_constraint_and_versioned_model() {
        let transport = Arc::new(MockTransport::new());
        let gateway = Arc::new(MockGateway::new());
        transport.push_response(200, router_body("my-router", 4));
        gateway.push_completion(completion_answering("hi"));

        let completion = client(transport.clone(), gateway.clone())
            .run(
                &router_fixture(4),
                &RoutingConstraint::cost(ConstraintValue::numeric(0.01)),
                &request_fixture(),
                None,
            )
            .await
            .unwrap();

        assert_eq!(completion.first_message().unwrap().content, "hi");

        let calls = gateway.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].model,
            "organizations/org-1/routers/my-router/versions/4"
        );
        assert_eq!(calls[0].params.messages, request_fixture().messages);
        assert_eq!(
            calls[0].extra_body,
            serde_json::json!({
                "routing_constraint": {"cost_constraint": {"numeric_value": 0.01}}
            })
        );
    }

    #[tokio::test]
    async fn test_run_explicit_version_wins() {
        let transport = Arc::new(MockTransport::new());
        let gateway = Arc::new(MockGateway::new());
        transport.push_response(200, router_body("my-router", 4));
        gateway.push_completion(completion_answering("hi"));

        client(transport, gateway.clone())
            .run(
                &router_fixture(4),
                &RoutingConstraint::quality(ConstraintValue::numeric(0.9)),
                &request_fixture(),
                Some(2),
            )
            .await
            .unwrap();

        assert_eq!(
            gateway.calls()[0].model,
            "organizations/org-1/routers/my-router/versions/2"
        );
    }

    #[tokio::test]
    async fn test_run_invalid_constraint_precedes_network() {
        let transport = Arc::new(MockTransport::new());
        let gateway = Arc::new(MockGateway::new());

        let err = client(transport.clone(), gateway.clone())
            .run(
                &router_fixture(1),
                &RoutingConstraint::default(),
                &request_fixture(),
                None,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, MeridianError::InvalidConstraint(_)));
        assert_eq!(transport.call_count(), 0);
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_create_training_job_rejects_empty_llms() {
        let transport = Arc::new(MockTransport::new());

        let err = client(transport.clone(), Arc::new(MockGateway::new()))
            .create_training_job(&router_fixture(1), &judge_fixture(), &[], &[])
            .await
            .unwrap_err();

        assert!(matches!(err, MeridianError::InvalidParameter(_)));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_create_training_job_dedupes_llms() {
        let transport = Arc::new(MockTransport::new());
        transport.push_response(200, job_body("tj-1", "RUNNING"));

        let llms = vec!["a".to_string(), "a".to_string(), "b".to_string()];
        let requests = vec![TrainingRequest::new(vec![ChatMessage::user("hello")])];

        let job = client(transport.clone(), Arc::new(MockGateway::new()))
            .create_training_job(&router_fixture(1), &judge_fixture(), &llms, &requests)
            .await
            .unwrap();

        assert_eq!(job.status, TrainingJobStatus::Running);

        let calls = transport.calls();
        let body = calls[0].body.as_ref().unwrap();
        assert_eq!(body["llms"], serde_json::json!(["a", "b"]));
        assert_eq!(body["routerName"], "organizations/org-1/routers/my-router");
        assert_eq!(body["judgeName"], "organizations/org-1/judges/my-judge");
        assert_eq!(
            body["requests"],
            serde_json::json!([{"messages": [{"role": "user", "content": "hello"}]}])
        );
    }

    #[tokio::test]
    async fn test_poll_once_accepts_full_name() {
        let transport = Arc::new(MockTransport::new());
        transport.push_response(200, job_body("tj-1", "RUNNING"));

        let job = client(transport.clone(), Arc::new(MockGateway::new()))
            .poll_once("organizations/org-1/router_training_jobs/tj-1")
            .await
            .unwrap();

        assert_eq!(job.id(), "tj-1");
        assert_eq!(transport.calls()[0].path, "router_training_jobs/tj-1");
    }

    #[tokio::test]
    async fn test_wait_zero_timeout_never_polls() {
        let transport = Arc::new(MockTransport::new());
        // A terminal response is queued, but the deadline check comes first:
        // it must never be fetched.
        transport.push_response(200, job_body("tj-1", "SUCCESS"));

        let err = client(transport.clone(), Arc::new(MockGateway::new()))
            .wait("tj-1", Duration::from_secs(10), Duration::ZERO)
            .await
            .unwrap_err();

        assert!(matches!(err, MeridianError::Timeout { .. }));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_wait_polls_until_terminal() {
        let transport = Arc::new(MockTransport::new());
        transport.push_response(200, job_body("tj-1", "RUNNING"));
        transport.push_response(200, job_body("tj-1", "RUNNING"));
        transport.push_response(200, job_body("tj-1", "SUCCESS"));

        let job = client(transport.clone(), Arc::new(MockGateway::new()))
            .wait("tj-1", Duration::ZERO, Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(job.status, TrainingJobStatus::Success);
        assert_eq!(transport.call_count(), 3);
    }

    #[tokio::test]
    async fn test_wait_returns_terminal_failure_as_data() {
        let transport = Arc::new(MockTransport::new());
        let mut body = job_body("tj-1", "FAILURE_WITHOUT_RETRY");
        body["errorMessage"] = serde_json::json!("judge quota exhausted");
        body["retryCount"] = serde_json::json!(3);
        transport.push_response(200, body);

        let job = client(transport.clone(), Arc::new(MockGateway::new()))
            .wait("tj-1", Duration::ZERO, Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(job.status, TrainingJobStatus::FailureWithoutRetry);
        assert_eq!(job.error_message.as_deref(), Some("judge quota exhausted"));
        assert_eq!(job.retry_count, 3);
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_poll_once_missing_job_is_not_found() {
        let transport = Arc::new(MockTransport::new());
        transport.push_response(404, serde_json::json!({"error": "no such job"}));

        let err = client(transport, Arc::new(MockGateway::new()))
            .poll_once("tj-ghost")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            MeridianError::NotFound { resource: "training job", .. }
        ));
    }
}
