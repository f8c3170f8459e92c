//! In-crate mocks for exercising the resource clients without a network.
//!
//! The mock transport replays a queued response per call and records every
//! call it served, so tests can assert both payload shapes and exact call
//! counts.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::client::{CompletionGateway, HttpResponse, Transport};
use crate::models::{ChatCompletion, CompletionCreateParams, MeridianError, Result};

/// One call served by the mock transport.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: &'static str,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub timeout: Option<Duration>,
}

/// Transport replaying queued responses in FIFO order.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<HttpResponse>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_response(&self, status: u16, body: Value) {
        self.responses
            .lock()
            .unwrap()
            .push_back(HttpResponse { status, body });
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn serve(&self, call: RecordedCall) -> Result<HttpResponse> {
        self.calls.lock().unwrap().push(call);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| MeridianError::Internal("mock transport queue exhausted".to_string()))
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, path: &str, query: &[(String, String)]) -> Result<HttpResponse> {
        self.serve(RecordedCall {
            method: "GET",
            path: path.to_string(),
            query: query.to_vec(),
            body: None,
            timeout: None,
        })
    }

    async fn post(
        &self,
        path: &str,
        query: &[(String, String)],
        body: Option<Value>,
        timeout: Option<Duration>,
    ) -> Result<HttpResponse> {
        self.serve(RecordedCall {
            method: "POST",
            path: path.to_string(),
            query: query.to_vec(),
            body,
            timeout,
        })
    }

    async fn patch(&self, path: &str, body: Option<Value>) -> Result<HttpResponse> {
        self.serve(RecordedCall {
            method: "PATCH",
            path: path.to_string(),
            query: Vec::new(),
            body,
            timeout: None,
        })
    }
}

/// One call served by the mock gateway.
#[derive(Debug, Clone)]
pub struct RecordedCompletion {
    pub model: String,
    pub params: CompletionCreateParams,
    pub extra_body: Value,
}

/// Gateway replaying queued completions in FIFO order.
#[derive(Default)]
pub struct MockGateway {
    responses: Mutex<VecDeque<ChatCompletion>>,
    calls: Mutex<Vec<RecordedCompletion>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_completion(&self, completion: ChatCompletion) {
        self.responses.lock().unwrap().push_back(completion);
    }

    pub fn calls(&self) -> Vec<RecordedCompletion> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionGateway for MockGateway {
    async fn complete(
        &self,
        model: &str,
        params: &CompletionCreateParams,
        extra_body: &Value,
        _timeout: Option<Duration>,
    ) -> Result<ChatCompletion> {
        self.calls.lock().unwrap().push(RecordedCompletion {
            model: model.to_string(),
            params: params.clone(),
            extra_body: extra_body.clone(),
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| MeridianError::Internal("mock gateway queue exhausted".to_string()))
    }
}

/// Wire-shaped judge resource for mock responses.
pub fn judge_body(id: &str, version: u32) -> Value {
    json!({
        "name": format!("organizations/org-1/judges/{id}"),
        "version": version,
        "description": "test judge",
        "createTime": "2025-04-02T10:00:00Z",
        "judgeSpec": {
            "model_type": "rubric_judge",
            "rubric": "Score the answer.",
            "model": "openai/openai/gpt-4o",
            "min_score": 1.0,
            "max_score": 5.0
        }
    })
}

/// Wire-shaped router resource for mock responses.
pub fn router_body(id: &str, version: u32) -> Value {
    json!({
        "name": format!("organizations/org-1/routers/{id}"),
        "version": version,
        "description": "test router",
        "createTime": "2025-04-02T10:00:00Z",
        "routerSpec": {
            "points": [
                {"point": {"x": 0.0, "y": 0.0},
                 "executor": {"spec": {"executor_type": "ModelExecutor",
                                        "model_name": "openai/openai/gpt-4o-mini"}}},
                {"point": {"x": 1.0, "y": 1.0},
                 "executor": {"spec": {"executor_type": "ModelExecutor",
                                        "model_name": "openai/openai/gpt-4o-mini"}}}
            ]
        }
    })
}

/// Wire-shaped training job for mock responses.
pub fn job_body(id: &str, status: &str) -> Value {
    json!({
        "name": format!("organizations/org-1/router_training_jobs/{id}"),
        "routerName": "organizations/org-1/routers/my-router",
        "judgeName": "organizations/org-1/judges/my-judge",
        "judgeVersion": 1,
        "status": status,
        "createTime": "2025-04-02T10:00:00Z",
        "updateTime": "2025-04-02T10:05:00Z",
        "llms": ["openai/openai/gpt-4o", "openai/openai/gpt-4o-mini"]
    })
}

/// A completion whose first choice answers with `content`.
pub fn completion_answering(content: &str) -> ChatCompletion {
    serde_json::from_value(json!({
        "id": "cmpl-1",
        "model": "openai/openai/gpt-4o",
        "choices": [{
            "index": 0,
            "finish_reason": "stop",
            "message": {"role": "assistant", "content": content}
        }]
    }))
    .unwrap()
}
