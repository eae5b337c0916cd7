use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use anyhow::Result;
use async_trait::async_trait;

use crate::client::{Completion, CompletionClient, JudgeError};
use crate::evaluator::Weights;
use crate::types::{
    MetricVector, FACTUAL_CORRECTNESS_LABEL, FAITHFULNESS_LABEL, RELEVANCY_LABEL,
};

/// One request seen by a [`ScriptedClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub system: String,
    pub user: String,
    pub temperature: f32,
}

enum Script {
    Queue(Mutex<VecDeque<String>>),
    Responder(Box<dyn Fn(&str) -> String + Send + Sync>),
    Fail { status: u16, body: String },
}

/// In-memory judge for tests: replays canned completions instead of calling a model.
pub struct ScriptedClient {
    script: Script,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedClient {
    /// Answers with `responses` in order; errors once they run out.
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_script(Script::Queue(Mutex::new(
            responses.into_iter().map(Into::into).collect(),
        )))
    }

    /// Answers every request by calling `f` with the user prompt.
    ///
    /// Use this when calls run concurrently and their order is not fixed.
    pub fn responding<F>(f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self::with_script(Script::Responder(Box::new(f)))
    }

    /// Fails every request with an HTTP error.
    pub fn failing(status: u16, body: impl Into<String>) -> Self {
        Self::with_script(Script::Fail {
            status,
            body: body.into(),
        })
    }

    fn with_script(script: Script) -> Self {
        Self {
            script,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
    ) -> Result<Completion, JudgeError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedCall {
                system: system.to_string(),
                user: user.to_string(),
                temperature,
            });

        match &self.script {
            Script::Queue(queue) => queue
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pop_front()
                .map(Completion::text)
                .ok_or_else(|| JudgeError::InvalidResponse("script exhausted".into())),
            Script::Responder(f) => Ok(Completion::text(f(user))),
            Script::Fail { status, body } => Err(JudgeError::Api {
                status: *status,
                body: body.clone(),
            }),
        }
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

/// Assert that `overall_score` is exactly the weighted blend of the judged metrics.
pub fn assert_weighted_blend(result: &MetricVector) -> Result<()> {
    let expected = Weights::STANDARD.blend(
        result.faithfulness,
        result.relevancy,
        result.factual_correctness,
    );
    if result.overall_score != expected {
        anyhow::bail!(
            "Overall score {} does not match weighted blend {} of {:?}",
            result.overall_score,
            expected,
            result
        );
    }
    Ok(())
}

/// Assert every judged metric reaches `min_score`.
pub fn assert_judged_at_least(result: &MetricVector, min_score: f64) -> Result<()> {
    for (label, value) in [
        (FAITHFULNESS_LABEL, result.faithfulness),
        (RELEVANCY_LABEL, result.relevancy),
        (FACTUAL_CORRECTNESS_LABEL, result.factual_correctness),
    ] {
        if value < min_score {
            anyhow::bail!("{} {:.3} is below threshold {:.3}", label, value, min_score);
        }
    }
    Ok(())
}
