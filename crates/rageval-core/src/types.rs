pub use rageval_types::{
	EvaluationItem, MetricVector, BLEU_SCORE_LABEL, FACTUAL_CORRECTNESS_LABEL, FAITHFULNESS_LABEL,
	OVERALL_SCORE_LABEL, RELEVANCY_LABEL,
};
