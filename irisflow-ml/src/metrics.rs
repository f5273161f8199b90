//! Evaluation metrics.

/// Fraction of labels matched by the prediction at the same position.
///
/// The score is taken over `labels`: predictions past the end of the
/// labels are ignored and absent predictions count as misses. Empty
/// labels score 0.0.
pub fn accuracy(labels: &[i64], predictions: &[i64]) -> f64 {
    if labels.is_empty() {
        return 0.0;
    }
    let hits = labels
        .iter()
        .zip(predictions)
        .filter(|(label, prediction)| label == prediction)
        .count();
    hits as f64 / labels.len() as f64
}
