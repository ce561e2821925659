/// Ranking-quality metrics: Recall@K, Precision@K, and mean average precision.
///
/// Pure functions over ordered prediction lists and relevant-URL sets. This is
/// the one part of the system with a crisp mathematical contract, so the edge
/// cases are pinned down here:
/// - recall is 0 when the relevant set is empty
/// - precision is 0 when nothing was predicted, and divides by min(k, |P|)
/// - MAP skips queries with an empty relevant set entirely
use std::collections::HashSet;

use serde::Serialize;

/// One evaluated query: the labeled relevant URLs and what the service returned.
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    pub relevant: Vec<String>,
    pub predicted: Vec<String>,
}

/// Aggregate metrics written to the output JSON file.
#[derive(Debug, Serialize)]
pub struct EvaluationMetrics {
    pub mean_recall_at_k: f64,
    pub mean_precision_at_k: f64,
    pub mean_average_precision: f64,
    pub k: usize,
    pub num_queries: usize,
}

/// `|P[:k] ∩ R| / |R|`, or 0 when R is empty.
pub fn recall_at_k(predicted: &[String], relevant: &[String], k: usize) -> f64 {
    let relevant_set: HashSet<&str> = relevant.iter().map(|s| s.as_str()).collect();
    if relevant_set.is_empty() {
        return 0.0;
    }
    hits_at_k(predicted, &relevant_set, k) as f64 / relevant_set.len() as f64
}

/// `|P[:k] ∩ R| / min(k, |P|)`, or 0 when P is empty.
pub fn precision_at_k(predicted: &[String], relevant: &[String], k: usize) -> f64 {
    if predicted.is_empty() || k == 0 {
        return 0.0;
    }
    let relevant_set: HashSet<&str> = relevant.iter().map(|s| s.as_str()).collect();
    let denominator = k.min(predicted.len());
    hits_at_k(predicted, &relevant_set, k) as f64 / denominator as f64
}

fn hits_at_k(predicted: &[String], relevant_set: &HashSet<&str>, k: usize) -> usize {
    let top_k: HashSet<&str> = predicted
        .iter()
        .take(k)
        .map(|s| s.as_str())
        .collect();
    top_k.iter().filter(|p| relevant_set.contains(*p)).count()
}

/// Average precision for one query: on each relevant hit at 1-indexed rank i,
/// accumulate hits/i; divide by |R|. Returns `None` when R is empty.
pub fn average_precision(predicted: &[String], relevant: &[String]) -> Option<f64> {
    let relevant_set: HashSet<&str> = relevant.iter().map(|s| s.as_str()).collect();
    if relevant_set.is_empty() {
        return None;
    }

    let mut score = 0.0;
    let mut hits = 0usize;
    for (i, pred) in predicted.iter().enumerate() {
        if relevant_set.contains(pred.as_str()) {
            hits += 1;
            score += hits as f64 / (i + 1) as f64;
        }
    }
    Some(score / relevant_set.len() as f64)
}

/// Mean of per-query average precision, skipping queries with an empty
/// relevant set; 0 when no query qualifies.
pub fn mean_average_precision(outcomes: &[QueryOutcome]) -> f64 {
    let aps: Vec<f64> = outcomes
        .iter()
        .filter_map(|o| average_precision(&o.predicted, &o.relevant))
        .collect();
    mean(&aps)
}

pub fn mean_recall_at_k(outcomes: &[QueryOutcome], k: usize) -> f64 {
    let recalls: Vec<f64> = outcomes
        .iter()
        .map(|o| recall_at_k(&o.predicted, &o.relevant, k))
        .collect();
    mean(&recalls)
}

pub fn mean_precision_at_k(outcomes: &[QueryOutcome], k: usize) -> f64 {
    let precisions: Vec<f64> = outcomes
        .iter()
        .map(|o| precision_at_k(&o.predicted, &o.relevant, k))
        .collect();
    mean(&precisions)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn recall_and_precision_reference_example() {
        // predicted = [a,b,c,d,e], relevant = {b,d,f}, k=5
        let predicted = strings(&["a", "b", "c", "d", "e"]);
        let relevant = strings(&["b", "d", "f"]);
        assert_close(recall_at_k(&predicted, &relevant, 5), 2.0 / 3.0);
        assert_close(precision_at_k(&predicted, &relevant, 5), 2.0 / 5.0);
    }

    #[test]
    fn recall_is_zero_for_empty_relevant_set() {
        let predicted = strings(&["a", "b"]);
        assert_close(recall_at_k(&predicted, &[], 10), 0.0);
    }

    #[test]
    fn precision_is_zero_for_empty_predictions() {
        let relevant = strings(&["a"]);
        assert_close(precision_at_k(&[], &relevant, 10), 0.0);
    }

    #[test]
    fn precision_divides_by_predicted_count_when_fewer_than_k() {
        // Only 2 predictions but k=10: denominator is 2, not 10.
        let predicted = strings(&["a", "x"]);
        let relevant = strings(&["a"]);
        assert_close(precision_at_k(&predicted, &relevant, 10), 0.5);
    }

    #[test]
    fn recall_respects_the_cutoff() {
        let predicted = strings(&["x", "y", "a"]);
        let relevant = strings(&["a"]);
        assert_close(recall_at_k(&predicted, &relevant, 2), 0.0);
        assert_close(recall_at_k(&predicted, &relevant, 3), 1.0);
    }

    #[test]
    fn average_precision_reference_example() {
        // predicted=[a,b,c], relevant={a,c} -> (1/1 + 2/3)/2 = 0.8333...
        let predicted = strings(&["a", "b", "c"]);
        let relevant = strings(&["a", "c"]);
        let ap = average_precision(&predicted, &relevant).unwrap();
        assert_close(ap, (1.0 + 2.0 / 3.0) / 2.0);
    }

    #[test]
    fn average_precision_is_none_for_empty_relevant_set() {
        let predicted = strings(&["a"]);
        assert!(average_precision(&predicted, &[]).is_none());
    }

    #[test]
    fn map_skips_queries_without_relevant_urls() {
        let outcomes = vec![
            QueryOutcome {
                relevant: strings(&["a", "c"]),
                predicted: strings(&["a", "b", "c"]),
            },
            QueryOutcome {
                relevant: Vec::new(),
                predicted: strings(&["a"]),
            },
        ];
        // Only q1 counts.
        assert_close(mean_average_precision(&outcomes), (1.0 + 2.0 / 3.0) / 2.0);
    }

    #[test]
    fn map_is_zero_when_no_query_qualifies() {
        let outcomes = vec![QueryOutcome {
            relevant: Vec::new(),
            predicted: strings(&["a"]),
        }];
        assert_close(mean_average_precision(&outcomes), 0.0);
    }

    #[test]
    fn means_average_across_queries() {
        let outcomes = vec![
            QueryOutcome {
                relevant: strings(&["a"]),
                predicted: strings(&["a"]),
            },
            QueryOutcome {
                relevant: strings(&["b"]),
                predicted: strings(&["x"]),
            },
        ];
        assert_close(mean_recall_at_k(&outcomes, 10), 0.5);
        assert_close(mean_precision_at_k(&outcomes, 10), 0.5);
    }
}
