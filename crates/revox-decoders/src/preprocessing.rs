//! Small preprocessing utilities shared by maskers, examples and models.
//!
//! Provides a simple Scaler for mean/std standardization and a score
//! normalization helper. The API operates on `ndarray` matrices with rows as
//! samples and plain slices for scores so it can be reused by different
//! model implementations.

use ndarray::Array2;

/// Simple standard scaler (per-column mean/std).
#[derive(Clone, Debug)]
pub struct Scaler {
    pub mean: Vec<f32>,
    pub std: Vec<f32>,
}

impl Scaler {
    /// Minimum stddev to avoid division by zero when transforming.
    const MIN_STD: f32 = 1e-6;
}

/// Fit a `Scaler` from an `Array2<f32>` where rows are samples and
/// columns are features.
pub fn fit_scaler(x: &Array2<f32>) -> Scaler {
    let (nrows, ncols) = x.dim();
    assert!(
        nrows > 0 && ncols > 0,
        "fit_scaler requires non-empty matrix"
    );

    let mut mean = vec![0.0f32; ncols];
    for r in 0..nrows {
        for c in 0..ncols {
            mean[c] += x[(r, c)];
        }
    }
    let nrows_f = nrows as f32;
    for v in mean.iter_mut() {
        *v /= nrows_f;
    }

    let mut var = vec![0.0f32; ncols];
    for r in 0..nrows {
        for c in 0..ncols {
            let d = x[(r, c)] - mean[c];
            var[c] += d * d;
        }
    }
    for v in var.iter_mut() {
        *v = (*v / nrows_f).sqrt().max(Scaler::MIN_STD);
    }

    Scaler { mean, std: var }
}

/// Transform all rows using the provided `Scaler` and return a new `Array2<f32>`.
pub fn transform_all(x: &Array2<f32>, sc: &Scaler) -> Array2<f32> {
    let (nrows, ncols) = x.dim();
    let mut out = Vec::with_capacity(nrows * ncols);

    for r in 0..nrows {
        for c in 0..ncols {
            let v = (x[(r, c)] - sc.mean[c]) / sc.std[c];
            out.push(v);
        }
    }

    Array2::from_shape_vec((nrows, ncols), out).expect("transform_all: shape mismatch")
}

/// Normalize a slice of scores to zero-mean, unit-variance in-place.
pub fn normalize_scores(scores: &mut [f32]) {
    let n = scores.len() as f32;
    if n == 0.0 {
        return;
    }
    let mean = scores.iter().copied().sum::<f32>() / n;
    let mut var = 0f32;
    for &s in scores.iter() {
        let d = s - mean;
        var += d * d;
    }
    let std = (var / n).sqrt().max(1e-6);
    for s in scores.iter_mut() {
        *s = (*s - mean) / std;
    }
}

/// Optional convenience: fit scaler and return transformed matrix in one call.
pub fn fit_transform(x: &Array2<f32>) -> Array2<f32> {
    let sc = fit_scaler(x);
    transform_all(x, &sc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_transform_centers_columns() {
        let x = Array2::from_shape_vec((3, 2), vec![0.0, 10.0, 1.0, 20.0, 2.0, 30.0]).unwrap();
        let z = fit_transform(&x);
        for c in 0..2 {
            let col_mean: f32 = z.column(c).iter().sum::<f32>() / 3.0;
            assert!(col_mean.abs() < 1e-5);
        }
    }

    #[test]
    fn test_constant_column_does_not_blow_up() {
        let x = Array2::from_shape_vec((2, 1), vec![5.0, 5.0]).unwrap();
        let z = fit_transform(&x);
        assert!(z.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_normalize_scores() {
        let mut scores = vec![1.0, 2.0, 3.0];
        normalize_scores(&mut scores);
        assert!(scores.iter().sum::<f32>().abs() < 1e-5);
    }
}
