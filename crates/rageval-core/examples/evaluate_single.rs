// Scores one answer against a live judge endpoint.
//
// Configure through the environment:
//   RAGEVAL_API_KEY   credential for the endpoint (omit for local servers)
//   RAGEVAL_BASE_URL  OpenAI-compatible base URL (default: DeepInfra)
//   RAGEVAL_MODEL     judge model identifier
//
// Or pass a YAML config path as the first argument.
//
// Run from the workspace root:
//   RUST_LOG=rageval_core=debug cargo run -p rageval-core --example evaluate_single

use rageval_core::{scope_traces, EvaluationItem, Evaluator, JudgeConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => JudgeConfig::from_file(path).await?,
        None => JudgeConfig::from_env(),
    };
    if config.api_key.is_none() {
        eprintln!("warning: {} is not set; sending requests without a key", config.api_key_env);
    }

    let evaluator = Evaluator::from_config(&config)?;

    let item = EvaluationItem::new(
        "What are the main attractions in Sultanahmet?",
        "Sultanahmet's main attractions are the Blue Mosque, Hagia Sophia, and Topkapi Palace.",
        "Sultanahmet has landmarks like the Blue Mosque, Hagia Sophia, and Topkapi Palace.",
        "Sultanahmet contains the Blue Mosque, Hagia Sophia, and Topkapi Palace.",
    );

    let (result, traces) = scope_traces(evaluator.evaluate_detailed(&item)).await;
    let result = result?;

    for (label, value) in result.metrics.entries() {
        println!("{label}: {value:.4}");
    }
    for metric in result.parse_failures() {
        println!("note: {} judge output was not a number, scored 0.0", metric.label());
    }

    println!("\nJudge calls:");
    for trace in &traces {
        let took = trace
            .duration_ms
            .map(|d| format!("{d}ms"))
            .unwrap_or_else(|| "-".to_string());
        match (&trace.completion, &trace.error) {
            (Some(raw), _) => println!("  {}: {raw:?} ({took})", trace.metric),
            (None, Some(err)) => println!("  {}: failed: {err} ({took})", trace.metric),
            (None, None) => println!("  {}: - ({took})", trace.metric),
        }
    }

    println!("\n{}", serde_json::to_string_pretty(&result.metrics)?);
    Ok(())
}
