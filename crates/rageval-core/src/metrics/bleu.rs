//! Sentence-level BLEU between a prediction and a single reference.
//!
//! BLEU = BP × exp(∑ wₙ log pₙ), with uniform weights over orders 1..=N.
//! Zero-match orders are smoothed by adding epsilon to the numerator so a short
//! sentence with no 4-gram overlap keeps a non-zero score. A prediction that
//! shares no unigram with the reference scores exactly 0.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BleuOptions {
    /// Highest n-gram order.
    pub max_order: usize,
    /// Numerator used for orders with no matching n-gram.
    pub epsilon: f64,
}

impl Default for BleuOptions {
    fn default() -> Self {
        Self {
            max_order: 4,
            epsilon: 0.1,
        }
    }
}

/// BLEU-4 with the default smoothing. Tokens are whitespace-separated and
/// compared verbatim, so case and punctuation matter.
pub fn bleu(prediction: &str, reference: &str) -> f64 {
    bleu_with(prediction, reference, BleuOptions::default())
}

pub fn bleu_with(prediction: &str, reference: &str, options: BleuOptions) -> f64 {
    let hyp: Vec<&str> = prediction.split_whitespace().collect();
    let refr: Vec<&str> = reference.split_whitespace().collect();

    let max_order = options.max_order.max(1);
    let weight = 1.0 / max_order as f64;
    let mut log_sum = 0.0;

    for n in 1..=max_order {
        let (matches, total) = clipped_matches(&hyp, &refr, n);
        if n == 1 && matches == 0 {
            return 0.0;
        }
        let denominator = total.max(1) as f64;
        let precision = if matches == 0 {
            options.epsilon / denominator
        } else {
            matches as f64 / denominator
        };
        log_sum += weight * precision.ln();
    }

    brevity_penalty(refr.len(), hyp.len()) * log_sum.exp()
}

/// Matched n-grams (each capped at its reference count) and total prediction n-grams.
fn clipped_matches(hyp: &[&str], refr: &[&str], n: usize) -> (usize, usize) {
    let hyp_counts = ngram_counts(hyp, n);
    let ref_counts = ngram_counts(refr, n);

    let total = hyp_counts.values().sum();
    let matches = hyp_counts
        .iter()
        .map(|(gram, count)| (*count).min(ref_counts.get(gram).copied().unwrap_or(0)))
        .sum();
    (matches, total)
}

fn ngram_counts<'a>(tokens: &'a [&'a str], n: usize) -> HashMap<&'a [&'a str], usize> {
    let mut counts = HashMap::new();
    if tokens.len() >= n {
        for gram in tokens.windows(n) {
            *counts.entry(gram).or_insert(0) += 1;
        }
    }
    counts
}

fn brevity_penalty(ref_len: usize, hyp_len: usize) -> f64 {
    if hyp_len > ref_len {
        1.0
    } else if hyp_len == 0 {
        0.0
    } else {
        (1.0 - ref_len as f64 / hyp_len as f64).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_sentences_score_one() {
        let text =
            "Sultanahmet has landmarks like the Blue Mosque, Hagia Sophia, and Topkapi Palace.";
        assert!((bleu(text, text) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn disjoint_vocabulary_scores_near_zero() {
        let score = bleu("alpha beta gamma delta epsilon", "one two three four five");
        assert!(score < 0.1);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn strong_overlap_scores_high() {
        let reference =
            "Sultanahmet's main attractions are the Blue Mosque, Hagia Sophia, and Topkapi Palace.";
        let prediction =
            "Sultanahmet has landmarks like the Blue Mosque, Hagia Sophia, and Topkapi Palace.";
        let score = bleu(prediction, reference);
        assert!(score > 0.5, "got {score}");
        assert!(score < 1.0);
    }

    #[test]
    fn short_prediction_is_smoothed_and_penalized() {
        let score = bleu("the cat sat", "the cat sat on the mat");
        let expected = (-1.0f64).exp() * 0.1f64.powf(0.25);
        assert!((score - expected).abs() < 1e-12, "got {score}");
    }

    #[test]
    fn short_identical_sentence_is_not_zero() {
        let score = bleu("Blue Mosque", "Blue Mosque");
        assert!(score > 0.0);
        assert!(score < 1.0);
    }

    #[test]
    fn is_not_symmetric() {
        let forward = bleu("the cat sat", "the cat sat on the mat");
        let backward = bleu("the cat sat on the mat", "the cat sat");
        assert_ne!(forward, backward);
    }

    #[test]
    fn is_deterministic() {
        let a = bleu("a b c d e f", "a b x d e f");
        let b = bleu("a b c d e f", "a b x d e f");
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn tokens_are_case_and_punctuation_sensitive() {
        assert_eq!(bleu("Palace.", "palace"), 0.0);
    }

    #[test]
    fn repeated_tokens_are_clipped() {
        // "the" appears twice in the prediction but once in the reference.
        let (matches, total) = clipped_matches(&["the", "the"], &["the", "cat"], 1);
        assert_eq!((matches, total), (1, 2));
    }

    #[test]
    fn empty_inputs_score_zero() {
        assert_eq!(bleu("", "a reference"), 0.0);
        assert_eq!(bleu("a prediction", ""), 0.0);
        assert_eq!(bleu("", ""), 0.0);
    }

    #[test]
    fn lower_order_option() {
        let options = BleuOptions {
            max_order: 1,
            ..BleuOptions::default()
        };
        assert_eq!(bleu_with("a b", "b a", options), 1.0);
    }
}
