//! Per-task log of judge calls.
//!
//! [`JudgeClient`](crate::judge::JudgeClient) reports one [`Trace`] per request.
//! Callers that want the raw completions wrap an evaluation in [`scope_traces`];
//! everywhere else reporting is dropped.

use std::cell::RefCell;
use std::future::Future;

pub use rageval_types::{TokenUsage, Trace, TraceBuilder, TraceVerdict};

tokio::task_local! {
    static JUDGE_CALLS: RefCell<Vec<Trace>>;
}

/// Await `f` and return its output with every judge call it made, in completion order.
pub async fn scope_traces<F, R>(f: F) -> (R, Vec<Trace>)
where
    F: Future<Output = R>,
{
    JUDGE_CALLS
        .scope(RefCell::new(Vec::new()), async move {
            let output = f.await;
            (output, JUDGE_CALLS.with(|calls| calls.take()))
        })
        .await
}

pub fn report_trace(trace: Trace) {
    let _ = JUDGE_CALLS.try_with(|calls| calls.borrow_mut().push(trace));
}

/// Judge calls recorded so far in the enclosing scope; empty outside one.
pub fn get_traces() -> Vec<Trace> {
    JUDGE_CALLS
        .try_with(|calls| calls.borrow().clone())
        .unwrap_or_default()
}

pub fn clear_traces() {
    let _ = JUDGE_CALLS.try_with(|calls| calls.borrow_mut().clear());
}

/// Metric identifiers whose completion could not be read as a number.
pub fn parse_failures(traces: &[Trace]) -> Vec<&str> {
    traces
        .iter()
        .filter(|t| t.is_parse_failure())
        .map(|t| t.metric.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(metric: &str, raw: &str, score: f64) -> Trace {
        Trace::start(metric, "judge")
            .request("sys", "prompt", 0.0)
            .finish(raw, None, TraceVerdict::Scored { score })
    }

    #[test]
    fn report_outside_scope_is_noop() {
        report_trace(scored("faithfulness", "0.9", 0.9));
        assert!(get_traces().is_empty());
    }

    #[tokio::test]
    async fn report_and_clear_within_scope() {
        let (_, traces) = scope_traces(async {
            report_trace(scored("faithfulness", "0.9", 0.9));
            clear_traces();
            assert!(get_traces().is_empty());

            report_trace(scored("relevancy", "1.0", 1.0));
            assert_eq!(get_traces().len(), 1);
        })
        .await;

        assert_eq!(traces.len(), 1);
        assert_eq!(traces[0].metric, "relevancy");
        assert_eq!(traces[0].completion.as_deref(), Some("1.0"));
    }

    #[test]
    fn lists_parse_failures_by_metric() {
        let traces = vec![
            scored("faithfulness", "0.9", 0.9),
            Trace::start("relevancy", "judge").finish("yes", None, TraceVerdict::ParseFailure),
            Trace::start("factual_correctness", "judge").finish_with_error("timeout"),
        ];
        assert_eq!(parse_failures(&traces), vec!["relevancy"]);
    }
}
