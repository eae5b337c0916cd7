//! Single judge call: send a rendered prompt, read back one number.
//!
//! Unparseable completions score 0.0 rather than failing the evaluation. The
//! [`JudgeOutcome`] keeps that case distinguishable from a genuine zero.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::client::{CompletionClient, JudgeError};
use crate::config::ScorePolicy;
use crate::trace::{report_trace, Trace, TraceVerdict};

pub const JUDGE_SYSTEM_PROMPT: &str = concat!(
    "You are an evaluator LLM. Respond with a number between 0 and 1. ",
    "Just give a number between 0 and 1.\n",
    "Example output: 0.3423",
);

/// Judges decode greedily.
pub const JUDGE_TEMPERATURE: f32 = 0.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("judge output is not a number: {raw:?}")]
pub struct ParseFailure {
    pub raw: String,
}

/// Parse a judge completion as a bare decimal number.
///
/// Surrounding whitespace is ignored. Any number the float grammar accepts is a
/// score, including out-of-range values and infinities ("1e309", "inf"). Words,
/// markup, empty text and NaN are a [`ParseFailure`]; NaN would make the blended
/// overall score NaN.
pub fn parse_score(raw: &str) -> Result<f64, ParseFailure> {
    match raw.trim().parse::<f64>() {
        Ok(v) if !v.is_nan() => Ok(v),
        _ => Err(ParseFailure {
            raw: raw.to_string(),
        }),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum JudgeOutcome {
    Scored(f64),
    ParseFailure(ParseFailure),
}

impl JudgeOutcome {
    /// The score fed into aggregation; parse failures count as 0.0.
    pub fn value(&self) -> f64 {
        match self {
            JudgeOutcome::Scored(v) => *v,
            JudgeOutcome::ParseFailure(_) => 0.0,
        }
    }

    pub fn is_parse_failure(&self) -> bool {
        matches!(self, JudgeOutcome::ParseFailure(_))
    }
}

/// Sends prompts to an injected [`CompletionClient`] with the fixed judge instruction.
#[derive(Clone)]
pub struct JudgeClient {
    client: Arc<dyn CompletionClient>,
    policy: ScorePolicy,
}

impl JudgeClient {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            client,
            policy: ScorePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ScorePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> ScorePolicy {
        self.policy
    }

    pub fn model_name(&self) -> &str {
        self.client.model_name()
    }

    /// Ask the judge to score `prompt`. Only transport failures are errors.
    pub async fn judge(&self, label: &str, prompt: &str) -> Result<JudgeOutcome, JudgeError> {
        let model = self.client.model_name();
        let started =
            Trace::start(label, model).request(JUDGE_SYSTEM_PROMPT, prompt, JUDGE_TEMPERATURE);

        debug!(metric = label, model, "requesting judge score");
        let completion = match self
            .client
            .complete(JUDGE_SYSTEM_PROMPT, prompt, JUDGE_TEMPERATURE)
            .await
        {
            Ok(c) => c,
            Err(err) => {
                report_trace(started.finish_with_error(err.to_string()));
                return Err(err);
            }
        };

        let (outcome, verdict) = match parse_score(&completion.text) {
            Ok(v) => {
                let score = self.policy.apply(v);
                (JudgeOutcome::Scored(score), TraceVerdict::Scored { score })
            }
            Err(failure) => {
                warn!(metric = label, raw = %failure.raw, "unparseable judge output, scoring 0.0");
                (JudgeOutcome::ParseFailure(failure), TraceVerdict::ParseFailure)
            }
        };

        report_trace(started.finish(completion.text, completion.usage, verdict));

        Ok(outcome)
    }

    /// Like [`JudgeClient::judge`], collapsed to the aggregated value.
    pub async fn score(&self, label: &str, prompt: &str) -> Result<f64, JudgeError> {
        Ok(self.judge(label, prompt).await?.value())
    }
}
