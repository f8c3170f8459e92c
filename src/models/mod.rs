//! Core data models for the Meridian SDK.
//!
//! Epistemic mapping:
//! - K_i (Knowledge): Concrete types with compile-time guarantees
//! - B_i (Beliefs): Wrapped in Result/Option
//! - I^R (Resolvable): Configuration parameters
//! - I^B (Bounded): Error variants for network/API uncertainties

mod chat;
mod config;
mod constraint;
mod error;
mod judge_spec;
pub mod llm_models;
mod resource;
mod training_job;

pub use chat::*;
pub use config::*;
pub use constraint::*;
pub use error::*;
pub use judge_spec::*;
pub use resource::*;
pub use training_job::*;
