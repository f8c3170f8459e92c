//! Routing constraint models.
//!
//! Epistemic foundation:
//! - K_i: A constraint value is exactly one of {numeric threshold, model reference}
//! - K_i: A routing constraint carries at least one of {cost, quality}
//! - B_i: Rendering may fail → Result, raised before any network call

use serde_json::{json, Map, Value};

use crate::models::{MeridianError, Result};

/// Value for a constraint: either an explicit number or the name of a model
/// whose cost/quality the constraint should mirror.
///
/// Used as a cost constraint, the numeric value is a maximum cost in USD.
/// Used as a quality constraint, it is a minimum quality score from 0 to 1.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstraintValue {
    pub numeric_value: Option<f64>,
    pub model_name: Option<String>,
}

impl ConstraintValue {
    /// An explicit numeric threshold.
    pub fn numeric(value: f64) -> Self {
        Self {
            numeric_value: Some(value),
            model_name: None,
        }
    }

    /// Mirror the cost/quality of a named model.
    pub fn model(name: impl Into<String>) -> Self {
        Self {
            numeric_value: None,
            model_name: Some(name.into()),
        }
    }

    /// Render to the wire shape.
    ///
    /// Fails with `InvalidConstraint` unless exactly one field is set.
    pub fn render(&self) -> Result<Value> {
        match (&self.numeric_value, &self.model_name) {
            (Some(n), None) => Ok(json!({ "numeric_value": n })),
            (None, Some(m)) => Ok(json!({ "model_name": m })),
            (Some(n), Some(m)) => Err(MeridianError::InvalidConstraint(format!(
                "both numeric_value ({n}) and model_name ({m:?}) set; exactly one is allowed"
            ))),
            (None, None) => Err(MeridianError::InvalidConstraint(
                "either numeric_value or model_name must be set".to_string(),
            )),
        }
    }
}

/// Maximum cost bound for routing.
#[derive(Debug, Clone, PartialEq)]
pub struct CostConstraint {
    pub value: ConstraintValue,
}

impl CostConstraint {
    pub fn new(value: ConstraintValue) -> Self {
        Self { value }
    }

    pub fn render(&self) -> Result<Value> {
        self.value.render()
    }
}

/// Minimum quality bound for routing.
#[derive(Debug, Clone, PartialEq)]
pub struct QualityConstraint {
    pub value: ConstraintValue,
}

impl QualityConstraint {
    pub fn new(value: ConstraintValue) -> Self {
        Self { value }
    }

    pub fn render(&self) -> Result<Value> {
        self.value.render()
    }
}

/// Caller-supplied bound steering a router's choice of model.
///
/// At least one sub-constraint must be set; setting both means "apply both".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoutingConstraint {
    pub cost_constraint: Option<CostConstraint>,
    pub quality_constraint: Option<QualityConstraint>,
}

impl RoutingConstraint {
    /// Constraint bounding only cost.
    pub fn cost(value: ConstraintValue) -> Self {
        Self {
            cost_constraint: Some(CostConstraint::new(value)),
            quality_constraint: None,
        }
    }

    /// Constraint bounding only quality.
    pub fn quality(value: ConstraintValue) -> Self {
        Self {
            cost_constraint: None,
            quality_constraint: Some(QualityConstraint::new(value)),
        }
    }

    /// Constraint bounding both cost and quality.
    pub fn cost_and_quality(cost: ConstraintValue, quality: ConstraintValue) -> Self {
        Self {
            cost_constraint: Some(CostConstraint::new(cost)),
            quality_constraint: Some(QualityConstraint::new(quality)),
        }
    }

    /// Render to the wire shape: a mapping with exactly the populated keys.
    ///
    /// Fails with `InvalidConstraint` when neither sub-constraint is set.
    pub fn render(&self) -> Result<Value> {
        let mut result = Map::new();
        if let Some(cost) = &self.cost_constraint {
            result.insert("cost_constraint".to_string(), cost.render()?);
        }
        if let Some(quality) = &self.quality_constraint {
            result.insert("quality_constraint".to_string(), quality.render()?);
        }
        if result.is_empty() {
            return Err(MeridianError::InvalidConstraint(
                "at least one of cost_constraint or quality_constraint must be set".to_string(),
            ));
        }
        Ok(Value::Object(result))
    }

    /// Render the `extra_body` attached to a routed completion request.
    pub fn render_extra_body(&self) -> Result<Value> {
        Ok(json!({ "routing_constraint": self.render()? }))
    }
}
