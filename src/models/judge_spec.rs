//! Judge specifications.
//!
//! Epistemic foundation:
//! - K_i: A judge spec is a tagged union keyed by `model_type`
//! - K_i: Rubric judges score within an inclusive [min_score, max_score] range
//! - B_i: Construction validates the range → Result
//!
//! The wire shape filters unset optional fields, so a spec round-trips
//! through the API modulo None-filtering.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::{MeridianError, Result};

/// Default prescript for rubric judges. `${min_score}` and `${max_score}`
/// are filled from the spec.
pub const DEFAULT_PRESCRIPT: &str = "You are a helpful assistant that scores responses between ${min_score} and ${max_score} according to the following rubric:";

/// Default postscript for rubric judges. `${content}` is filled with the
/// conversation under evaluation.
pub const DEFAULT_POSTSCRIPT: &str = r#"Here's the conversation you are judging:
<content>
${content}
</content>

Please evaluate the assistant's response in the conversation above according to the rubric.
Think step-by-step to produce a score, and please provide a rationale for your score.
Your score should be between ${min_score} and ${max_score}.

Your response MUST include:
1. A <rationale>...</rationale> tag containing your explanation
2. A <score>...</score> tag containing your numerical score"#;

/// Specification of a server-side judge.
///
/// Tagged by `model_type` on the wire so new judge kinds can be added as
/// variants without breaking existing callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model_type", rename_all = "snake_case")]
pub enum JudgeSpec {
    RubricJudge(RubricJudgeSpec),
    ExactMatchJudge(ExactMatchJudgeSpec),
}

impl JudgeSpec {
    /// The exact prompt text the judge model would be sent for `content`.
    ///
    /// Only rubric judges are LLM-backed; asking for the prompt of an
    /// exact-match judge is an `InvalidParameter` error.
    pub fn render_prompt(&self, content: &str) -> Result<String> {
        match self {
            Self::RubricJudge(spec) => Ok(spec.render_prompt(content)),
            Self::ExactMatchJudge(_) => Err(MeridianError::InvalidParameter(
                "prompt rendering is only defined for rubric judges".to_string(),
            )),
        }
    }
}

/// A judge that scores a completion against a rubric using a judge model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricJudgeSpec {
    /// Evaluation criteria the judge model applies
    pub rubric: String,

    /// Identifier of the judge model
    pub model: String,

    /// Minimum assignable score (inclusive)
    pub min_score: f64,

    /// Maximum assignable score (inclusive)
    pub max_score: f64,

    /// Text placed before the rubric in the judging prompt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prescript: Option<String>,

    /// Text placed after the rubric in the judging prompt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postscript: Option<String>,

    /// Variable-extraction configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extract_variables: Option<Map<String, Value>>,

    /// Judgement-extraction configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extract_judgement: Option<Map<String, Value>>,
}

impl RubricJudgeSpec {
    /// Create a rubric judge spec.
    ///
    /// B_i(min_score ≤ max_score) → Result
    pub fn new(
        rubric: impl Into<String>,
        model: impl Into<String>,
        min_score: f64,
        max_score: f64,
    ) -> Result<Self> {
        if min_score > max_score {
            return Err(MeridianError::InvalidParameter(format!(
                "min_score ({min_score}) must not exceed max_score ({max_score})"
            )));
        }
        Ok(Self {
            rubric: rubric.into(),
            model: model.into(),
            min_score,
            max_score,
            prescript: None,
            postscript: None,
            extract_variables: None,
            extract_judgement: None,
        })
    }

    /// Override the default prescript.
    ///
    /// A custom prescript must keep the `${min_score}`/`${max_score}` tags
    /// for the score range to reach the judge model.
    pub fn with_prescript(mut self, prescript: impl Into<String>) -> Self {
        self.prescript = Some(prescript.into());
        self
    }

    /// Override the default postscript. Must keep the `${content}` tag.
    pub fn with_postscript(mut self, postscript: impl Into<String>) -> Self {
        self.postscript = Some(postscript.into());
        self
    }

    /// Fill the prompt template with this spec's rubric and score range.
    ///
    /// Layout: filled prescript, the rubric inside `<rubric>` tags, then the
    /// filled postscript.
    pub fn render_prompt(&self, content: &str) -> String {
        let prescript = self.fill(self.prescript.as_deref().unwrap_or(DEFAULT_PRESCRIPT), content);
        let postscript = self.fill(
            self.postscript.as_deref().unwrap_or(DEFAULT_POSTSCRIPT),
            content,
        );
        format!(
            "{prescript}\n\n<rubric>\n{rubric}\n</rubric>\n\n{postscript}",
            rubric = self.rubric
        )
    }

    fn fill(&self, template: &str, content: &str) -> String {
        template
            .replace("${min_score}", &self.min_score.to_string())
            .replace("${max_score}", &self.max_score.to_string())
            .replace("${content}", content)
    }
}

/// A judge that compares a completion against a list of known answers.
///
/// Scores 1.0 on an exact match with any known answer, 0.0 otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExactMatchJudgeSpec {
    /// Acceptable answers the submission is compared against
    pub known_answers: Vec<String>,

    /// Response-extraction configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extract_response: Option<Map<String, Value>>,
}

impl ExactMatchJudgeSpec {
    /// Create an exact-match judge spec.
    ///
    /// B_i(at least one known answer) → Result
    pub fn new(known_answers: Vec<String>) -> Result<Self> {
        if known_answers.is_empty() {
            return Err(MeridianError::InvalidParameter(
                "known_answers must not be empty".to_string(),
            ));
        }
        Ok(Self {
            known_answers,
            extract_response: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rubric_spec() -> RubricJudgeSpec {
        RubricJudgeSpec::new(
            "Score restaurant recommendations.",
            "openai/openai/gpt-4o",
            1.0,
            5.0,
        )
        .unwrap()
    }

    #[test]
    fn test_inverted_score_range_rejected() {
        let err = RubricJudgeSpec::new("rubric", "gpt-4o", 5.0, 1.0).unwrap_err();
        assert!(matches!(err, MeridianError::InvalidParameter(_)));
        assert!(err.to_string().contains("min_score"));
    }

    #[test]
    fn test_wire_tag_and_none_filtering() {
        let spec = JudgeSpec::RubricJudge(rubric_spec());
        let value = serde_json::to_value(&spec).unwrap();
        assert_eq!(value["model_type"], "rubric_judge");
        let obj = value.as_object().unwrap();
        assert!(!obj.contains_key("prescript"));
        assert!(!obj.contains_key("extract_variables"));
    }

    #[test]
    fn test_tagged_roundtrip() {
        let spec = JudgeSpec::ExactMatchJudge(
            ExactMatchJudgeSpec::new(vec!["Paris".to_string()]).unwrap(),
        );
        let value = serde_json::to_value(&spec).unwrap();
        assert_eq!(value["model_type"], "exact_match_judge");
        let back: JudgeSpec = serde_json::from_value(value).unwrap();
        assert_eq!(back, spec);
    }

    #[test]
    fn test_render_prompt_substitutions() {
        let prompt = rubric_spec().render_prompt("user: What is the capital of France?\nassistant: Paris");
        assert!(prompt.starts_with("You are a helpful assistant that scores responses between 1 and 5"));
        assert!(prompt.contains("<rubric>\nScore restaurant recommendations.\n</rubric>"));
        assert!(prompt.contains("<content>\nuser: What is the capital of France?\nassistant: Paris\n</content>"));
        assert!(prompt.contains("Your score should be between 1 and 5."));
        assert!(!prompt.contains("${"));
    }

    #[test]
    fn test_render_prompt_custom_prescript() {
        let spec = rubric_spec().with_prescript("Score from ${min_score} to ${max_score}.");
        let prompt = spec.render_prompt("c");
        assert!(prompt.starts_with("Score from 1 to 5."));
    }

    #[test]
    fn test_exact_match_prompt_is_invalid() {
        let spec = JudgeSpec::ExactMatchJudge(
            ExactMatchJudgeSpec::new(vec!["42".to_string()]).unwrap(),
        );
        assert!(matches!(
            spec.render_prompt("c"),
            Err(MeridianError::InvalidParameter(_))
        ));
    }
}
