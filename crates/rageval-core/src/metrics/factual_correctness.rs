/// Prompt asking whether `prediction` agrees with `reference` on the facts.
pub fn factual_correctness_prompt(prediction: &str, reference: &str) -> String {
    format!(
        r#"Evaluate whether the given prediction is factually correct based on the provided reference.

**Instructions**:
- Give a score between **0 and 1** based on factual accuracy.
- Score **1.0** if the prediction is **entirely correct**.
- Score **0.5** if the prediction is **partially correct** but has **minor errors**.
- Score **0.0** if the prediction contains **factual errors** or **false information**.

**Examples**:
Reference: "The Galata Tower offers panoramic views of Istanbul and dates back to the medieval period."
Prediction: "Galata Tower is a medieval structure with great views of Istanbul."
Score: **1.0**

Reference: "Topkapi Palace served as the administrative center of the Ottoman Empire until the 19th century."
Prediction: "Topkapi Palace is a modern government building in Istanbul."
Score: **0.0**

**Evaluation**:
Reference: {reference}
Prediction: {prediction}
Score:"#
    )
}
