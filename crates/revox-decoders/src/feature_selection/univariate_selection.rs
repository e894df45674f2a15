//! Univariate feature selection methods following scikit-learn's API.
//!
//! See: https://scikit-learn.org/stable/modules/feature_selection.html#univariate-feature-selection

use ndarray::{Array1, Array2};
use statrs::distribution::{ContinuousCDF, FisherSnedecor};

/// Compute the one-way ANOVA F statistic for each feature.
///
/// This tests the individual effect of each feature on the class label.
/// It is a scoring function used in feature screening procedures before
/// fitting a decoder on high-dimensional voxel data.
///
/// # Parameters
///
/// * `x` - A 2D array of shape (n_samples, n_features) representing the
///   data matrix (features).
/// * `y` - Class labels, one per sample, using the crate convention
///   (1 for the positive condition, -1 for the negative condition).
///
/// # Returns
///
/// A pair of arrays of shape (n_features,): the F statistics and the
/// associated p-values. Features with no within-group variance score 0
/// when they are constant, and infinity when they separate the groups
/// perfectly.
pub fn f_classif(x: &Array2<f32>, y: &[i32]) -> (Array1<f64>, Array1<f64>) {
    assert_eq!(
        x.nrows(),
        y.len(),
        "f_classif requires one label per sample"
    );

    let classes: Vec<i32> = {
        let mut cs: Vec<i32> = y.to_vec();
        cs.sort_unstable();
        cs.dedup();
        cs
    };
    let k = classes.len();
    let n = y.len();
    assert!(k >= 2, "f_classif requires at least two classes");
    assert!(n > k, "f_classif requires more samples than classes");

    let d1 = (k - 1) as f64;
    let d2 = (n - k) as f64;
    let f_dist = FisherSnedecor::new(d1, d2).expect("valid F distribution dof");

    let mut f_scores = Array1::zeros(x.ncols());
    let mut p_values = Array1::ones(x.ncols());

    for j in 0..x.ncols() {
        let column = x.column(j);
        let grand_mean = column.iter().map(|&v| v as f64).sum::<f64>() / n as f64;

        let mut ss_between = 0.0f64;
        let mut ss_within = 0.0f64;
        for &class in &classes {
            let values: Vec<f64> = column
                .iter()
                .zip(y.iter())
                .filter(|(_, &l)| l == class)
                .map(|(&v, _)| v as f64)
                .collect();
            let group_mean = values.iter().sum::<f64>() / values.len() as f64;
            ss_between += values.len() as f64 * (group_mean - grand_mean).powi(2);
            ss_within += values.iter().map(|v| (v - group_mean).powi(2)).sum::<f64>();
        }

        let f = if ss_within == 0.0 {
            if ss_between == 0.0 {
                0.0
            } else {
                f64::INFINITY
            }
        } else {
            (ss_between / d1) / (ss_within / d2)
        };

        f_scores[j] = f;
        p_values[j] = if f.is_finite() { 1.0 - f_dist.cdf(f) } else { 0.0 };
    }

    (f_scores, p_values)
}

/// Indices of the features with the highest scores, keeping the top
/// `percentile` percent (at least one feature). Ties are broken by the
/// lower feature index. The returned indices are sorted ascending so the
/// selected sub-matrix keeps the original column order.
pub fn select_percentile(scores: &Array1<f64>, percentile: f64) -> Vec<usize> {
    assert!(
        percentile > 0.0 && percentile <= 100.0,
        "percentile must be within (0, 100]"
    );

    let n = scores.len();
    let n_keep = ((percentile / 100.0 * n as f64).ceil() as usize).clamp(1, n);

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });

    let mut kept: Vec<usize> = order.into_iter().take(n_keep).collect();
    kept.sort_unstable();
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_f_classif_ranks_the_informative_feature_first() {
        let x = Array2::from_shape_vec(
            (6, 3),
            vec![
                1.0, 5.0, 0.1, 1.0, -5.1, 0.2, 1.0, 4.9, 0.15, 1.0, -4.8, 0.1, 1.0, 5.2, 0.2,
                1.0, -5.0, 0.12,
            ],
        )
        .unwrap();
        let y = vec![1, -1, 1, -1, 1, -1];

        let (f_scores, p_values) = f_classif(&x, &y);
        assert_eq!(f_scores[0], 0.0); // constant feature
        assert!(f_scores[1] > f_scores[2]);
        assert!(p_values[1] < p_values[2]);
    }

    #[test]
    fn test_select_percentile_keeps_order_and_at_least_one() {
        let scores = Array1::from_vec(vec![0.0, 9.0, 3.0, 7.0]);
        assert_eq!(select_percentile(&scores, 50.0), vec![1, 3]);
        assert_eq!(select_percentile(&scores, 1.0), vec![1]);
        assert_eq!(select_percentile(&scores, 100.0), vec![0, 1, 2, 3]);
    }
}
