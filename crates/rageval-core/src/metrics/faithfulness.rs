/// Prompt asking whether `prediction` is supported by `context`.
pub fn faithfulness_prompt(prediction: &str, context: &str) -> String {
    format!(
        r#"Evaluate whether the given answer is supported by the provided context.

**Instructions**:
- Give a score between **0 and 1** based on how well the answer matches the information in the context.
- Score **1.0** if the answer is **fully supported** by the context.
- Score **0.5** if the answer is **partially supported** but contains some inaccuracies.
- Score **0.0** if the answer **contradicts** the context or is **unsupported**.

**Examples**:
Context: "The Hagia Sophia, located in Istanbul, was originally built as a church in 537 AD. It was later converted into a mosque and now serves as a museum and mosque."
Answer: "Hagia Sophia was built in the 6th century and has always been a mosque."
Score: **0.5**

Context: "Topkapi Palace served as the administrative center of the Ottoman Empire until the 19th century."
Answer: "Topkapi Palace was the residence of Ottoman sultans for 400 years."
Score: **1.0**

**Evaluation**:
Context: {context}
Answer: {prediction}
Score:"#
    )
}
