//! meridian-sdk - Client library for the Meridian LLM routing and
//! evaluation service.
//!
//! ## Architecture
//!
//! The SDK is three thin resource clients over one shared transport:
//! - **Judges**: create/version rubric and exact-match judges, evaluate
//!   completions against them
//! - **Routers**: create/version routers, run constrained completions,
//!   train routing policies via asynchronous training jobs
//! - **Organization**: read the credit balance
//!
//! Routing decisions, judging, and training all happen server-side; the
//! client marshals requests, un-marshals responses, and polls training
//! jobs to a terminal state.
//!
//! ## Epistemic Design
//!
//! - K_i (Knowledge): Compile-time enforced invariants (types, enums)
//! - B_i (Beliefs): Runtime fallible operations (Result, Option)
//! - I^R (Resolvable): User-configurable parameters (config, timeouts)
//! - I^B (Bounded): Network/API uncertainties (typed errors, deadlines)
//!
//! ## Example
//!
//! ```no_run
//! use meridian_sdk::{ClientConfig, MeridianClient, RubricJudgeSpec, JudgeSpec};
//!
//! # async fn run() -> meridian_sdk::Result<()> {
//! let config = ClientConfig::new("https://api.withmeridian.com", "org-1");
//! let client = MeridianClient::new(config)?;
//!
//! let spec = JudgeSpec::RubricJudge(RubricJudgeSpec::new(
//!     "Score geography answers for correctness.",
//!     meridian_sdk::llm_models::GPT_4O,
//!     1.0,
//!     5.0,
//! )?);
//! let judge = client.judges().create("geo-judge", &spec, None).await?;
//! assert_eq!(judge.version, 1);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod models;

// Re-exports for convenience
pub use client::{
    CompletionGateway, HttpGateway, HttpResponse, JudgesClient, MeridianClient,
    OrganizationClient, ReqwestTransport, RoutersClient, Transport,
};
pub use models::llm_models;
pub use models::{
    derive_id, job_id_of, ChatChoice, ChatCompletion, ChatMessage, ClientConfig,
    CompletionCreateParams, ConfigError, ConstraintValue, CostConstraint, ExactMatchJudgeSpec,
    Judge, JudgeEvaluation, JudgeSpec, MeridianError, OrganizationBalance, QualityConstraint,
    Result, Router, RouterSpec, RouterTrainingJob, RoutingConstraint, RubricJudgeSpec,
    TrainingJobStatus, TrainingRequest,
};
