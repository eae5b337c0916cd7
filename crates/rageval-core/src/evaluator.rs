use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::client::{CompletionClient, JudgeError, OpenAiCompatClient};
use crate::config::{JudgeConfig, ScorePolicy};
use crate::judge::{JudgeClient, JudgeOutcome};
use crate::metrics::bleu::bleu;
use crate::metrics::factual_correctness::factual_correctness_prompt;
use crate::metrics::faithfulness::faithfulness_prompt;
use crate::metrics::relevancy::relevancy_prompt;
use crate::types::{
	EvaluationItem, MetricVector, FACTUAL_CORRECTNESS_LABEL, FAITHFULNESS_LABEL, RELEVANCY_LABEL,
};

/// Blend of the three judged metrics into the overall score.
///
/// Only [`Weights::STANDARD`] exists; its components sum to exactly 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
	faithfulness: f64,
	relevancy: f64,
	factual_correctness: f64,
}

impl Weights {
	pub const STANDARD: Weights = Weights {
		faithfulness: 0.3,
		relevancy: 0.3,
		factual_correctness: 0.4,
	};

	pub fn faithfulness(&self) -> f64 {
		self.faithfulness
	}

	pub fn relevancy(&self) -> f64 {
		self.relevancy
	}

	pub fn factual_correctness(&self) -> f64 {
		self.factual_correctness
	}

	pub fn sum(&self) -> f64 {
		self.faithfulness + self.relevancy + self.factual_correctness
	}

	pub fn blend(&self, faithfulness: f64, relevancy: f64, factual_correctness: f64) -> f64 {
		self.faithfulness * faithfulness
			+ self.relevancy * relevancy
			+ self.factual_correctness * factual_correctness
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JudgedMetric {
	Faithfulness,
	Relevancy,
	FactualCorrectness,
}

impl JudgedMetric {
	pub const ALL: [JudgedMetric; 3] = [
		JudgedMetric::Faithfulness,
		JudgedMetric::Relevancy,
		JudgedMetric::FactualCorrectness,
	];

	/// Key used in [`MetricVector`] output.
	pub fn label(self) -> &'static str {
		match self {
			JudgedMetric::Faithfulness => FAITHFULNESS_LABEL,
			JudgedMetric::Relevancy => RELEVANCY_LABEL,
			JudgedMetric::FactualCorrectness => FACTUAL_CORRECTNESS_LABEL,
		}
	}

	/// Identifier used for logs and traces.
	pub fn id(self) -> &'static str {
		match self {
			JudgedMetric::Faithfulness => "faithfulness",
			JudgedMetric::Relevancy => "relevancy",
			JudgedMetric::FactualCorrectness => "factual_correctness",
		}
	}

	pub fn prompt(self, item: &EvaluationItem) -> String {
		match self {
			JudgedMetric::Faithfulness => faithfulness_prompt(&item.prediction, &item.context),
			JudgedMetric::Relevancy => relevancy_prompt(&item.query, &item.prediction),
			JudgedMetric::FactualCorrectness => {
				factual_correctness_prompt(&item.prediction, &item.reference)
			}
		}
	}
}

/// Metric vector plus the per-metric judge outcomes behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailedEvaluation {
	pub metrics: MetricVector,
	pub faithfulness: JudgeOutcome,
	pub relevancy: JudgeOutcome,
	pub factual_correctness: JudgeOutcome,
}

impl DetailedEvaluation {
	pub fn outcome(&self, metric: JudgedMetric) -> &JudgeOutcome {
		match metric {
			JudgedMetric::Faithfulness => &self.faithfulness,
			JudgedMetric::Relevancy => &self.relevancy,
			JudgedMetric::FactualCorrectness => &self.factual_correctness,
		}
	}

	/// Judged metrics whose completion could not be parsed.
	pub fn parse_failures(&self) -> Vec<JudgedMetric> {
		JudgedMetric::ALL
			.into_iter()
			.filter(|m| self.outcome(*m).is_parse_failure())
			.collect()
	}
}

pub struct EvaluatorBuilder {
	client: Option<Arc<dyn CompletionClient>>,
	policy: ScorePolicy,
}

impl EvaluatorBuilder {
	pub fn new() -> Self {
		Self {
			client: None,
			policy: ScorePolicy::default(),
		}
	}

	pub fn client(mut self, client: Arc<dyn CompletionClient>) -> Self {
		self.client = Some(client);
		self
	}

	pub fn score_policy(mut self, policy: ScorePolicy) -> Self {
		self.policy = policy;
		self
	}

	pub fn build(self) -> Result<Evaluator> {
		let client = self.client.ok_or_else(|| anyhow::anyhow!("client must be set"))?;
		Ok(Evaluator {
			judge: JudgeClient::new(client).with_policy(self.policy),
		})
	}
}

impl Default for EvaluatorBuilder {
	fn default() -> Self {
		Self::new()
	}
}

/// Scores one answer with three judge calls and BLEU.
#[derive(Clone)]
pub struct Evaluator {
	judge: JudgeClient,
}

impl Evaluator {
	pub fn builder() -> EvaluatorBuilder {
		EvaluatorBuilder::new()
	}

	pub fn new(judge: JudgeClient) -> Self {
		Self { judge }
	}

	/// Evaluator backed by an OpenAI-compatible endpoint.
	pub fn from_config(config: &JudgeConfig) -> Result<Self, JudgeError> {
		let client = OpenAiCompatClient::new(config)?;
		Ok(Self::new(
			JudgeClient::new(Arc::new(client)).with_policy(config.score_policy),
		))
	}

	pub fn judge(&self) -> &JudgeClient {
		&self.judge
	}

	pub async fn evaluate(
		&self,
		query: &str,
		reference: &str,
		prediction: &str,
		context: &str,
	) -> Result<MetricVector, JudgeError> {
		let item = EvaluationItem::new(query, reference, prediction, context);
		self.evaluate_item(&item).await
	}

	pub async fn evaluate_item(&self, item: &EvaluationItem) -> Result<MetricVector, JudgeError> {
		Ok(self.evaluate_detailed(item).await?.metrics)
	}

	/// Run all four metrics. The judge calls are independent and joined
	/// concurrently; a transport failure in any of them fails the item.
	pub async fn evaluate_detailed(
		&self,
		item: &EvaluationItem,
	) -> Result<DetailedEvaluation, JudgeError> {
		let (faithfulness, relevancy, factual_correctness) = futures::try_join!(
			self.run_judged(JudgedMetric::Faithfulness, item),
			self.run_judged(JudgedMetric::Relevancy, item),
			self.run_judged(JudgedMetric::FactualCorrectness, item),
		)?;
		let bleu_score = bleu(&item.prediction, &item.reference);

		let metrics = combine(
			faithfulness.value(),
			relevancy.value(),
			factual_correctness.value(),
			bleu_score,
		);
		debug!(
			faithfulness = metrics.faithfulness,
			relevancy = metrics.relevancy,
			factual_correctness = metrics.factual_correctness,
			bleu = metrics.bleu_score,
			overall = metrics.overall_score,
			"evaluation complete"
		);

		Ok(DetailedEvaluation {
			metrics,
			faithfulness,
			relevancy,
			factual_correctness,
		})
	}

	async fn run_judged(
		&self,
		metric: JudgedMetric,
		item: &EvaluationItem,
	) -> Result<JudgeOutcome, JudgeError> {
		let prompt = metric.prompt(item);
		self.judge.judge(metric.id(), &prompt).await
	}
}

/// Assemble a [`MetricVector`]; BLEU is reported but not blended.
pub fn combine(
	faithfulness: f64,
	relevancy: f64,
	factual_correctness: f64,
	bleu_score: f64,
) -> MetricVector {
	MetricVector {
		faithfulness,
		relevancy,
		factual_correctness,
		bleu_score,
		overall_score: Weights::STANDARD.blend(faithfulness, relevancy, factual_correctness),
	}
}
