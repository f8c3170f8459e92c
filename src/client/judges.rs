//! Judges resource client.
//!
//! Epistemic foundation:
//! - K_i: Judges are immutable versioned resources; updates create versions
//! - B_i: A pre-flight existence probe precedes create/update. The probe is
//!   a best-effort advisory precondition (TOCTOU window), not transactional
//! - B_i: Evaluation blocks on a server-side LLM call → longer timeout

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use crate::client::Transport;
use crate::models::{
    ChatCompletion, ClientConfig, CompletionCreateParams, Judge, JudgeEvaluation, JudgeSpec,
    MeridianError, Result,
};

const RESOURCE: &str = "judge";

#[derive(Deserialize)]
struct ListJudgesResponse {
    #[serde(default)]
    judges: Vec<Judge>,
}

/// Client for the judges API.
///
/// Stateless aside from its transport handle and configuration; every
/// returned [`Judge`] is a fresh snapshot of server state.
#[derive(Clone)]
pub struct JudgesClient {
    transport: Arc<dyn Transport>,
    config: ClientConfig,
}

impl JudgesClient {
    pub fn new(transport: Arc<dyn Transport>, config: ClientConfig) -> Self {
        Self { transport, config }
    }

    fn evaluation_timeout(&self) -> Duration {
        Duration::from_secs(self.config.evaluation_timeout_secs)
    }

    /// Whether a judge with `judge_id` currently exists.
    pub async fn exists(&self, judge_id: &str) -> Result<bool> {
        let resp = self.transport.get(&format!("judges/{judge_id}"), &[]).await?;
        match resp.status {
            404 => Ok(false),
            _ if resp.is_success() => Ok(true),
            _ => Err(resp.into_request_failed()),
        }
    }

    /// Create a judge.
    ///
    /// Fails with `AlreadyExists` when a judge with `judge_id` is already
    /// present (checked by a preliminary existence probe).
    pub async fn create(
        &self,
        judge_id: &str,
        spec: &JudgeSpec,
        description: Option<&str>,
    ) -> Result<Judge> {
        if self.exists(judge_id).await? {
            return Err(MeridianError::already_exists(RESOURCE, judge_id));
        }

        let payload = spec_payload(spec, description)?;
        let query = vec![("judgeId".to_string(), judge_id.to_string())];
        let resp = self
            .transport
            .post("judges", &query, Some(payload), None)
            .await?;
        if !resp.is_success() {
            return Err(resp.into_request_failed());
        }

        let judge: Judge = resp.decode()?;
        info!(judge_id = %judge.id, version = judge.version, "Created judge");
        Ok(judge)
    }

    /// Update a judge, producing a new immutable version.
    ///
    /// The returned snapshot has `version + 1`; previous versions stay
    /// retrievable via [`get`](Self::get).
    pub async fn update(
        &self,
        judge_id: &str,
        spec: &JudgeSpec,
        description: Option<&str>,
    ) -> Result<Judge> {
        if !self.exists(judge_id).await? {
            return Err(MeridianError::not_found(RESOURCE, judge_id));
        }

        let payload = spec_payload(spec, description)?;
        let resp = self
            .transport
            .patch(&format!("judges/{judge_id}"), Some(payload))
            .await?;
        if !resp.is_success() {
            return Err(resp.into_request_failed());
        }

        let judge: Judge = resp.decode()?;
        info!(judge_id = %judge.id, version = judge.version, "Updated judge");
        Ok(judge)
    }

    /// Fetch a judge at `version`, or the latest when `version` is `None`.
    ///
    /// Fails with `NotFound` when the judge (or version) is absent.
    pub async fn get(&self, judge_id: &str, version: Option<u32>) -> Result<Judge> {
        let query: Vec<(String, String)> = version
            .map(|v| vec![("version".to_string(), v.to_string())])
            .unwrap_or_default();
        let resp = self
            .transport
            .get(&format!("judges/{judge_id}"), &query)
            .await?;
        if resp.status == 404 {
            return Err(MeridianError::not_found(RESOURCE, judge_id));
        }
        if !resp.is_success() {
            return Err(resp.into_request_failed());
        }
        resp.decode()
    }

    /// List all judges, in server order.
    pub async fn list(&self) -> Result<Vec<Judge>> {
        let resp = self.transport.get("judges", &[]).await?;
        if !resp.is_success() {
            return Err(resp.into_request_failed());
        }
        let list: ListJudgesResponse = resp.decode()?;
        Ok(list.judges)
    }

    /// All versions of a judge, newest first.
    ///
    /// Fails with `NotFound` when zero versions exist.
    pub async fn get_versions(&self, judge_id: &str) -> Result<Vec<Judge>> {
        let resp = self
            .transport
            .get(&format!("judges/{judge_id}/versions"), &[])
            .await?;
        if resp.status == 404 {
            return Err(MeridianError::not_found(RESOURCE, judge_id));
        }
        if !resp.is_success() {
            return Err(resp.into_request_failed());
        }

        let list: ListJudgesResponse = resp.decode()?;
        if list.judges.is_empty() {
            return Err(MeridianError::not_found(RESOURCE, judge_id));
        }

        let mut versions = list.judges;
        versions.sort_by(|a, b| b.version.cmp(&a.version));
        Ok(versions)
    }

    /// Evaluate a stored judge against a completion.
    ///
    /// The evaluation endpoint requires a `cost` field and a denormalized
    /// `response` field the raw completion does not carry; both are
    /// synthesized here (cost defaults to 0.0 when unknown, response is the
    /// first choice's message).
    pub async fn evaluate(
        &self,
        judge: &Judge,
        request: &CompletionCreateParams,
        completion: &ChatCompletion,
    ) -> Result<JudgeEvaluation> {
        let body = json!({
            "judgeVersion": judge.version,
            "completionCreateParams": {"jsonPayload": request_payload(request)?},
            "chatCompletion": {"jsonPayload": completion_payload(completion)?},
        });

        debug!(judge_id = %judge.id, version = judge.version, "Evaluating judge");
        let resp = self
            .transport
            .post(
                &format!("judges/{}:evaluate", judge.id),
                &[],
                Some(body),
                Some(self.evaluation_timeout()),
            )
            .await?;
        if !resp.is_success() {
            return Err(resp.into_request_failed());
        }
        resp.decode()
    }

    /// Evaluate a spec that has not been persisted as a judge.
    ///
    /// Useful for trying out specs before [`create`](Self::create).
    pub async fn evaluate_with_spec(
        &self,
        spec: &JudgeSpec,
        request: &CompletionCreateParams,
        completion: &ChatCompletion,
    ) -> Result<JudgeEvaluation> {
        let body = json!({
            "judgeSpec": serde_json::to_value(spec)
                .map_err(|e| MeridianError::Parse(format!("serializing judge spec: {e}")))?,
            "completionCreateParams": {"jsonPayload": request_payload(request)?},
            "chatCompletion": {"jsonPayload": completion_payload(completion)?},
        });

        let resp = self
            .transport
            .post(
                "judges:evaluate",
                &[],
                Some(body),
                Some(self.evaluation_timeout()),
            )
            .await?;
        if !resp.is_success() {
            return Err(resp.into_request_failed());
        }
        resp.decode()
    }

    /// The exact prompt text the judge model would be sent, for debugging.
    ///
    /// No side effects; nothing leaves the process.
    pub fn render_prompt(
        &self,
        judge: &Judge,
        request: &CompletionCreateParams,
        completion: &ChatCompletion,
    ) -> Result<String> {
        let spec = judge.judge_spec.as_ref().ok_or_else(|| {
            MeridianError::InvalidParameter(format!("judge {} carries no spec", judge.id))
        })?;
        spec.render_prompt(&conversation_transcript(request, completion))
    }
}

/// Create/update body: the spec nested under a double `judgeSpec` key, plus
/// an optional description. The nesting is what the API expects.
fn spec_payload(spec: &JudgeSpec, description: Option<&str>) -> Result<Value> {
    let spec_value = serde_json::to_value(spec)
        .map_err(|e| MeridianError::Parse(format!("serializing judge spec: {e}")))?;

    let mut payload = Map::new();
    payload.insert("judgeSpec".to_string(), json!({ "judgeSpec": spec_value }));
    if let Some(description) = description {
        payload.insert(
            "description".to_string(),
            Value::String(description.to_string()),
        );
    }
    Ok(Value::Object(payload))
}

fn request_payload(request: &CompletionCreateParams) -> Result<String> {
    serde_json::to_string(request)
        .map_err(|e| MeridianError::Parse(format!("serializing completion request: {e}")))
}

/// Serialize a completion with the `cost` and `response` fields the
/// evaluation endpoint requires.
fn completion_payload(completion: &ChatCompletion) -> Result<String> {
    let first_message = completion.first_message().ok_or_else(|| {
        MeridianError::InvalidParameter("completion has no choices to evaluate".to_string())
    })?;
    let response = serde_json::to_value(first_message)
        .map_err(|e| MeridianError::Parse(format!("serializing completion message: {e}")))?;

    let mut value = serde_json::to_value(completion)
        .map_err(|e| MeridianError::Parse(format!("serializing completion: {e}")))?;
    let obj = value
        .as_object_mut()
        .ok_or_else(|| MeridianError::Internal("completion must serialize to an object".to_string()))?;
    obj.insert("cost".to_string(), json!(completion.cost.unwrap_or(0.0)));
    obj.insert("response".to_string(), response);

    serde_json::to_string(&value)
        .map_err(|e| MeridianError::Parse(format!("serializing evaluation payload: {e}")))
}

/// Flatten the request messages plus the assistant's answer into the
/// `${content}` transcript the judge prompt embeds.
fn conversation_transcript(
    request: &CompletionCreateParams,
    completion: &ChatCompletion,
) -> String {
    let mut lines: Vec<String> = request
        .messages
        .iter()
        .map(|m| format!("{}: {}", m.role, m.content))
        .collect();
    if let Some(message) = completion.first_message() {
        lines.push(format!("{}: {}", message.role, message.content));
    }
    lines.join("\n")
}
