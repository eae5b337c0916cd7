/// Prompt asking whether `prediction` answers `query`.
pub fn relevancy_prompt(query: &str, prediction: &str) -> String {
    format!(
        r#"Evaluate whether the given answer directly addresses the question.

**Instructions**:
- Give a score between **0 and 1** based on relevance.
- Score **1.0** if the answer **fully answers** the question.
- Score **0.5** if the answer **partially addresses** the question but lacks details.
- Score **0.0** if the answer is **irrelevant** or **off-topic**.

**Examples**:
Question: "What are the main attractions in Sultanahmet?"
Answer: "Sultanahmet has landmarks like the Blue Mosque, Hagia Sophia, and Topkapi Palace."
Score: **1.0**

Question: "What are the main attractions in Sultanahmet?"
Answer: "Istanbul has many historical places, including the Galata Tower."
Score: **0.3**

**Evaluation**:
Question: {query}
Answer: {prediction}
Score:"#
    )
}
