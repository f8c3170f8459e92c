//! Judge and Router resource snapshots.
//!
//! Epistemic foundation:
//! - K_i: Resources are immutable snapshots of server state; updates create
//!   new versions server-side, old versions stay retrievable
//! - K_i: The short id is the trailing segment of the hierarchical name,
//!   derived once at construction
//! - B_i: A name without a separator is malformed → fail fast

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{JudgeSpec, MeridianError, Result};

/// Derive the short id from a hierarchical resource name.
///
/// `organizations/o1/judges/abc` → `abc`. Names with no separator or an
/// empty trailing segment are rejected with `MalformedResourceName`.
pub fn derive_id(name: &str) -> Result<&str> {
    match name.rsplit_once('/') {
        Some((_, id)) if !id.is_empty() => Ok(id),
        _ => Err(MeridianError::MalformedResourceName(name.to_string())),
    }
}

/// A judge resource: a server-side evaluator scoring completions against a
/// rubric.
///
/// Snapshots are returned by [`JudgesClient`](crate::client::JudgesClient)
/// operations and never mutated in place; an update produces a new snapshot
/// with `version + 1`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "JudgeWire")]
pub struct Judge {
    /// Short id, derived from the trailing segment of `name`
    pub id: String,

    /// Server-assigned version, monotonically increasing per judge id
    pub version: u32,

    /// Human-readable description
    pub description: String,

    /// Creation timestamp
    pub create_time: DateTime<Utc>,

    /// Full hierarchical resource name
    /// (format: `organizations/{org}/judges/{judge_id}`)
    pub name: String,

    /// The judge's specification
    pub judge_spec: Option<JudgeSpec>,
}

impl Judge {
    /// Build a snapshot, deriving the short id from `name`.
    pub fn new(
        name: impl Into<String>,
        version: u32,
        description: impl Into<String>,
        create_time: DateTime<Utc>,
        judge_spec: Option<JudgeSpec>,
    ) -> Result<Self> {
        let name = name.into();
        let id = derive_id(&name)?.to_string();
        Ok(Self {
            id,
            version,
            description: description.into(),
            create_time,
            name,
            judge_spec,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JudgeWire {
    name: String,
    version: u32,
    #[serde(default)]
    description: String,
    create_time: DateTime<Utc>,
    #[serde(default)]
    judge_spec: Option<JudgeSpec>,
}

impl TryFrom<JudgeWire> for Judge {
    type Error = MeridianError;

    fn try_from(wire: JudgeWire) -> Result<Self> {
        Judge::new(
            wire.name,
            wire.version,
            wire.description,
            wire.create_time,
            wire.judge_spec,
        )
    }
}

/// A router resource: a server-side policy selecting among candidate models
/// per request, subject to constraints.
///
/// A freshly created router routes everything to its base model; it becomes
/// capable of genuine routing only after a successful training job updates
/// its spec.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RouterWire")]
pub struct Router {
    /// Short id, derived from the trailing segment of `name`
    pub id: String,

    /// Server-assigned version, monotonically increasing per router id
    pub version: u32,

    /// Human-readable description
    pub description: String,

    /// Creation timestamp
    pub create_time: DateTime<Utc>,

    /// Full hierarchical resource name
    /// (format: `organizations/{org}/routers/{router_id}`)
    pub name: String,

    /// The router's point/executor mapping
    pub router_spec: Option<RouterSpec>,
}

impl Router {
    /// Build a snapshot, deriving the short id from `name`.
    pub fn new(
        name: impl Into<String>,
        version: u32,
        description: impl Into<String>,
        create_time: DateTime<Utc>,
        router_spec: Option<RouterSpec>,
    ) -> Result<Self> {
        let name = name.into();
        let id = derive_id(&name)?.to_string();
        Ok(Self {
            id,
            version,
            description: description.into(),
            create_time,
            name,
            router_spec,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RouterWire {
    name: String,
    version: u32,
    #[serde(default)]
    description: String,
    create_time: DateTime<Utc>,
    #[serde(default)]
    router_spec: Option<RouterSpec>,
}

impl TryFrom<RouterWire> for Router {
    type Error = MeridianError;

    fn try_from(wire: RouterWire) -> Result<Self> {
        Router::new(
            wire.name,
            wire.version,
            wire.description,
            wire.create_time,
            wire.router_spec,
        )
    }
}

/// A router's specification: interpolation points mapping a position on the
/// cost/quality curve to an executor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterSpec {
    pub points: Vec<RouterPoint>,
}

impl RouterSpec {
    /// The trivial spec a new router starts with: both ends of the curve
    /// pinned to a single base model.
    pub fn base_model(model: impl Into<String>) -> Self {
        let model = model.into();
        Self {
            points: vec![
                RouterPoint::model_executor(&model, 0.0, 0.0),
                RouterPoint::model_executor(&model, 1.0, 1.0),
            ],
        }
    }
}

/// A single (point → executor) mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterPoint {
    pub point: CurvePoint,
    pub executor: Executor,
}

impl RouterPoint {
    /// A point executing a fixed model.
    pub fn model_executor(model: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            point: CurvePoint { x, y },
            executor: Executor {
                spec: ExecutorSpec {
                    executor_type: "ModelExecutor".to_string(),
                    model_name: model.into(),
                },
            },
        }
    }
}

/// Position on the routing curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub x: f64,
    pub y: f64,
}

/// Executor wrapper as the API expects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Executor {
    pub spec: ExecutorSpec,
}

/// What an executor runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutorSpec {
    pub executor_type: String,
    pub model_name: String,
}

/// Result of evaluating a judge against a completion.
///
/// No identity; produced fresh on every evaluation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeEvaluation {
    /// Score assigned by the judge, within the spec's [min_score, max_score]
    pub score: f64,

    /// The judge's rationale for the score
    pub reason: String,

    /// Cost in USD of running the evaluation, when the server could
    /// compute it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
}

/// Read-only snapshot of an organization's credit balance, in USD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationBalance {
    /// Credits are decimal for precise accounting
    pub credits: Decimal,
}
