use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Record of one judge call: the prompt sent, the raw completion and how it parsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trace {
    /// Judged metric identifier, e.g. "faithfulness"
    pub metric: String,
    pub model: String,
    pub start: SystemTime,
    pub end: SystemTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    pub system: String,
    pub prompt: String,
    pub temperature: f32,
    /// Raw completion text, before trimming; absent when the call failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<TraceVerdict>,
    /// Transport error, if the endpoint never produced a completion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// How a completion was read.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceVerdict {
    /// Parsed, after the score policy was applied.
    Scored { score: f64 },
    /// Not a number; aggregated as 0.0.
    ParseFailure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
}

impl Trace {
    /// Start timing a call for `metric` against `model`.
    pub fn start(metric: impl Into<String>, model: impl Into<String>) -> TraceBuilder {
        TraceBuilder {
            start: SystemTime::now(),
            metric: metric.into(),
            model: model.into(),
            system: String::new(),
            prompt: String::new(),
            temperature: 0.0,
        }
    }

    pub fn is_parse_failure(&self) -> bool {
        matches!(self.verdict, Some(TraceVerdict::ParseFailure))
    }
}

pub struct TraceBuilder {
    start: SystemTime,
    metric: String,
    model: String,
    system: String,
    prompt: String,
    temperature: f32,
}

impl TraceBuilder {
    pub fn request(
        mut self,
        system: impl Into<String>,
        prompt: impl Into<String>,
        temperature: f32,
    ) -> Self {
        self.system = system.into();
        self.prompt = prompt.into();
        self.temperature = temperature;
        self
    }

    pub fn finish(
        self,
        completion: impl Into<String>,
        usage: Option<TokenUsage>,
        verdict: TraceVerdict,
    ) -> Trace {
        self.into_trace(Some(completion.into()), usage, Some(verdict), None)
    }

    pub fn finish_with_error(self, error: impl Into<String>) -> Trace {
        self.into_trace(None, None, None, Some(error.into()))
    }

    fn into_trace(
        self,
        completion: Option<String>,
        usage: Option<TokenUsage>,
        verdict: Option<TraceVerdict>,
        error: Option<String>,
    ) -> Trace {
        let end = SystemTime::now();
        Trace {
            metric: self.metric,
            model: self.model,
            start: self.start,
            end,
            duration_ms: end.duration_since(self.start).ok().map(|d| d.as_millis() as u64),
            system: self.system,
            prompt: self.prompt,
            temperature: self.temperature,
            completion,
            usage,
            verdict,
            error,
        }
    }
}

/// One answer to grade: the question, the gold answer, the generated answer and the
/// retrieved context it was generated from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationItem {
	pub query: String,
	pub reference: String,
	pub prediction: String,
	pub context: String,
}

impl EvaluationItem {
	pub fn new(
		query: impl Into<String>,
		reference: impl Into<String>,
		prediction: impl Into<String>,
		context: impl Into<String>,
	) -> Self {
		Self {
			query: query.into(),
			reference: reference.into(),
			prediction: prediction.into(),
			context: context.into(),
		}
	}
}

pub const FAITHFULNESS_LABEL: &str = "Faithfulness";
pub const RELEVANCY_LABEL: &str = "Relevancy";
pub const FACTUAL_CORRECTNESS_LABEL: &str = "Factual Correctness";
pub const BLEU_SCORE_LABEL: &str = "BLEU Score";
pub const OVERALL_SCORE_LABEL: &str = "Overall Score";

/// Scores produced for one [`EvaluationItem`].
///
/// Serializes as a flat map keyed by the display labels above.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricVector {
	#[serde(rename = "Faithfulness")]
	pub faithfulness: f64,
	#[serde(rename = "Relevancy")]
	pub relevancy: f64,
	#[serde(rename = "Factual Correctness")]
	pub factual_correctness: f64,
	#[serde(rename = "BLEU Score")]
	pub bleu_score: f64,
	#[serde(rename = "Overall Score")]
	pub overall_score: f64,
}

impl MetricVector {
	/// The five scores in output order, paired with their labels.
	pub fn entries(&self) -> [(&'static str, f64); 5] {
		[
			(FAITHFULNESS_LABEL, self.faithfulness),
			(RELEVANCY_LABEL, self.relevancy),
			(FACTUAL_CORRECTNESS_LABEL, self.factual_correctness),
			(BLEU_SCORE_LABEL, self.bleu_score),
			(OVERALL_SCORE_LABEL, self.overall_score),
		]
	}

	pub fn get(&self, label: &str) -> Option<f64> {
		self.entries()
			.into_iter()
			.find(|(name, _)| *name == label)
			.map(|(_, value)| value)
	}
}
