//! rageval-core: score retrieval-augmented answers.
//! Three LLM-judged metrics (faithfulness, relevancy, factual correctness) are
//! blended 0.3 / 0.3 / 0.4 into an overall score; BLEU is reported alongside.
//! See `examples/evaluate_single.rs` for a quickstart.

pub mod client;
pub mod config;
pub mod evaluator;
pub mod judge;
pub mod testing;
pub mod trace;
pub mod types;

pub mod metrics {
    pub mod bleu;
    pub mod factual_correctness;
    pub mod faithfulness;
    pub mod relevancy;
}

pub use client::{Completion, CompletionClient, JudgeError, OpenAiCompatClient};
pub use config::{ConfigError, JudgeConfig, ScorePolicy};
pub use evaluator::{
    combine, DetailedEvaluation, Evaluator, EvaluatorBuilder, JudgedMetric, Weights,
};
pub use judge::{parse_score, JudgeClient, JudgeOutcome, ParseFailure, JUDGE_SYSTEM_PROMPT};
pub use metrics::{
    bleu::{bleu, bleu_with, BleuOptions},
    factual_correctness::factual_correctness_prompt,
    faithfulness::faithfulness_prompt,
    relevancy::relevancy_prompt,
};
pub use trace::{scope_traces, Trace, TraceVerdict};
pub use types::{EvaluationItem, MetricVector};
