//! Small scoring helpers shared by the grid search, examples and tests.

/// Fraction of predictions matching the true labels.
///
/// # Arguments
///
/// * `predictions` - Predicted labels.
/// * `truth` - Ground-truth labels, same length.
///
/// # Returns
///
/// The accuracy in [0, 1]. An empty input scores 0.
pub fn accuracy(predictions: &[i32], truth: &[i32]) -> f32 {
    assert_eq!(
        predictions.len(),
        truth.len(),
        "Predictions and truth must have equal length"
    );
    if predictions.is_empty() {
        return 0.0;
    }
    let hits = predictions
        .iter()
        .zip(truth.iter())
        .filter(|(p, t)| p == t)
        .count();
    hits as f32 / predictions.len() as f32
}

/// Confusion counts for +/-1 labels: (true positive, true negative,
/// false positive, false negative).
pub fn confusion_counts(predictions: &[i32], truth: &[i32]) -> (usize, usize, usize, usize) {
    assert_eq!(
        predictions.len(),
        truth.len(),
        "Predictions and truth must have equal length"
    );
    let mut tp = 0;
    let mut tn = 0;
    let mut fp = 0;
    let mut fn_ = 0;
    for (&p, &t) in predictions.iter().zip(truth.iter()) {
        match (p, t) {
            (1, 1) => tp += 1,
            (-1, -1) => tn += 1,
            (1, -1) => fp += 1,
            _ => fn_ += 1,
        }
    }
    (tp, tn, fp, fn_)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy() {
        assert_eq!(accuracy(&[1, -1, 1, -1], &[1, -1, -1, -1]), 0.75);
        assert_eq!(accuracy(&[], &[]), 0.0);
    }

    #[test]
    fn test_confusion_counts() {
        let predictions = [1, 1, -1, -1, 1];
        let truth = [1, -1, -1, 1, 1];
        assert_eq!(confusion_counts(&predictions, &truth), (2, 1, 1, 1));
    }
}
