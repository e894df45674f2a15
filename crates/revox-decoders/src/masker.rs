//! Maskers convert between volume space and flat feature space.
//!
//! A `Masker` owns the two directional conversions a decoder needs: turning
//! a stack of volumes into a (samples x features) matrix before fitting, and
//! turning a learned coefficient vector back into a volume for inspection.
//! Both conversions are stateless per call, so a masker can be shared across
//! repeated fit/predict cycles.

use ndarray::{Array1, Array2, Array3, Array4};

use crate::error::DecodeError;
use crate::preprocessing;

/// Two-way converter between an image representation and a flat feature matrix.
pub trait Masker {
    /// The per-sample image collection this masker accepts.
    type Image;
    /// The coefficient-map representation this masker produces.
    type Map;

    /// Convert images into a (samples x features) matrix.
    fn forward(&self, images: &Self::Image) -> Result<Array2<f32>, DecodeError>;

    /// Convert a coefficient vector back into image space.
    fn inverse(&self, coef: &Array1<f32>) -> Result<Self::Map, DecodeError>;

    /// Short human-readable description of the masker configuration.
    fn describe(&self) -> String;

    /// Short human-readable description of a coefficient map.
    fn describe_map(&self, map: &Self::Map) -> String;
}

/// Masker over 3D volumes using a boolean voxel mask.
///
/// `forward` takes a 4D stack of shape (samples, x, y, z) and extracts the
/// in-mask voxels of each sample, in a fixed voxel order, into a
/// (samples x n_voxels) matrix. `inverse` scatters a vector of length
/// n_voxels back into a volume, zero outside the mask.
#[derive(Debug, Clone)]
pub struct VolumeMasker {
    mask: Array3<bool>,
    in_mask: Vec<(usize, usize, usize)>,
    standardize: bool,
}

impl VolumeMasker {
    pub fn new(mask: Array3<bool>) -> Self {
        let mut in_mask = Vec::new();
        let (nx, ny, nz) = mask.dim();
        for i in 0..nx {
            for j in 0..ny {
                for k in 0..nz {
                    if mask[(i, j, k)] {
                        in_mask.push((i, j, k));
                    }
                }
            }
        }
        VolumeMasker {
            mask,
            in_mask,
            standardize: false,
        }
    }

    /// Derive a crude background mask from a mean volume: keep voxels whose
    /// mean intensity reaches `fraction` of the maximum mean intensity.
    pub fn from_background(mean: &Array3<f32>, fraction: f32) -> Self {
        let max = mean.iter().cloned().fold(f32::MIN, f32::max);
        let threshold = max * fraction;
        Self::new(mean.mapv(|v| v >= threshold))
    }

    /// Standardize each extracted voxel column to zero mean, unit variance.
    ///
    /// Standardization uses the statistics of the matrix each `forward` call
    /// sees; the masker keeps no fitted state between calls.
    pub fn standardize(mut self, on: bool) -> Self {
        self.standardize = on;
        self
    }

    pub fn n_voxels(&self) -> usize {
        self.in_mask.len()
    }

    pub fn mask(&self) -> &Array3<bool> {
        &self.mask
    }
}

impl Masker for VolumeMasker {
    type Image = Array4<f32>;
    type Map = Array3<f32>;

    fn forward(&self, images: &Array4<f32>) -> Result<Array2<f32>, DecodeError> {
        let (n_samples, nx, ny, nz) = images.dim();
        if (nx, ny, nz) != self.mask.dim() {
            return Err(DecodeError::ShapeMismatch {
                expected: format!("volumes of shape {:?}", self.mask.dim()),
                found: format!("{:?}", (nx, ny, nz)),
            });
        }

        let mut out = Array2::zeros((n_samples, self.in_mask.len()));
        for s in 0..n_samples {
            for (v, &(i, j, k)) in self.in_mask.iter().enumerate() {
                out[(s, v)] = images[(s, i, j, k)];
            }
        }

        if self.standardize {
            out = preprocessing::fit_transform(&out);
        }
        Ok(out)
    }

    fn inverse(&self, coef: &Array1<f32>) -> Result<Array3<f32>, DecodeError> {
        if coef.len() != self.in_mask.len() {
            return Err(DecodeError::ShapeMismatch {
                expected: format!("coefficient vector of length {}", self.in_mask.len()),
                found: format!("length {}", coef.len()),
            });
        }

        let mut volume = Array3::zeros(self.mask.dim());
        for (v, &(i, j, k)) in self.in_mask.iter().enumerate() {
            volume[(i, j, k)] = coef[v];
        }
        Ok(volume)
    }

    fn describe(&self) -> String {
        format!(
            "VolumeMasker(shape={:?}, voxels={}, standardize={})",
            self.mask.dim(),
            self.in_mask.len(),
            self.standardize
        )
    }

    fn describe_map(&self, map: &Array3<f32>) -> String {
        format!("volume {:?}", map.dim())
    }
}

/// Identity masker for data that is already tabular.
///
/// `forward` hands the feature matrix through unchanged and `inverse` copies
/// the coefficient vector, so wrapping a learner with a `TableMasker` behaves
/// exactly like calling the learner directly.
#[derive(Debug, Clone, Default)]
pub struct TableMasker;

impl TableMasker {
    pub fn new() -> Self {
        TableMasker
    }
}

impl Masker for TableMasker {
    type Image = Array2<f32>;
    type Map = Array1<f32>;

    fn forward(&self, images: &Array2<f32>) -> Result<Array2<f32>, DecodeError> {
        Ok(images.clone())
    }

    fn inverse(&self, coef: &Array1<f32>) -> Result<Array1<f32>, DecodeError> {
        Ok(coef.clone())
    }

    fn describe(&self) -> String {
        "TableMasker".to_string()
    }

    fn describe_map(&self, map: &Array1<f32>) -> String {
        format!("vector of length {}", map.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, Array4};

    fn checker_mask() -> Array3<bool> {
        Array3::from_shape_fn((2, 2, 2), |(i, j, k)| (i + j + k) % 2 == 0)
    }

    #[test]
    fn test_forward_extracts_in_mask_voxels() {
        let mask = checker_mask();
        let masker = VolumeMasker::new(mask);
        assert_eq!(masker.n_voxels(), 4);

        let images = Array4::from_shape_fn((3, 2, 2, 2), |(s, i, j, k)| {
            (s * 100 + i * 4 + j * 2 + k) as f32
        });
        let x = masker.forward(&images).unwrap();
        assert_eq!(x.dim(), (3, 4));
        // voxel order is row-major over the mask: (0,0,0), (0,1,1), (1,0,1), (1,1,0)
        assert_eq!(x.row(0).to_vec(), vec![0.0, 3.0, 5.0, 6.0]);
        assert_eq!(x.row(2).to_vec(), vec![200.0, 203.0, 205.0, 206.0]);
    }

    #[test]
    fn test_inverse_scatters_and_zeroes_outside() {
        let masker = VolumeMasker::new(checker_mask());
        let volume = masker.inverse(&arr1(&[1.0, 2.0, 3.0, 4.0])).unwrap();
        assert_eq!(volume[(0, 0, 0)], 1.0);
        assert_eq!(volume[(0, 1, 1)], 2.0);
        assert_eq!(volume[(1, 0, 1)], 3.0);
        assert_eq!(volume[(1, 1, 0)], 4.0);
        assert_eq!(volume[(0, 0, 1)], 0.0);
        assert_eq!(volume[(1, 1, 1)], 0.0);
    }

    #[test]
    fn test_shape_mismatch_is_an_error() {
        let masker = VolumeMasker::new(checker_mask());
        let images = Array4::<f32>::zeros((2, 3, 2, 2));
        assert!(matches!(
            masker.forward(&images),
            Err(DecodeError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            masker.inverse(&arr1(&[1.0, 2.0])),
            Err(DecodeError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_background_mask_keeps_bright_voxels() {
        let mut mean = Array3::zeros((2, 2, 2));
        mean[(0, 0, 0)] = 10.0;
        mean[(1, 1, 1)] = 8.0;
        mean[(0, 1, 0)] = 1.0;
        let masker = VolumeMasker::from_background(&mean, 0.5);
        assert_eq!(masker.n_voxels(), 2);
        assert!(masker.mask()[(0, 0, 0)]);
        assert!(masker.mask()[(1, 1, 1)]);
        assert!(!masker.mask()[(0, 1, 0)]);
    }

    #[test]
    fn test_table_masker_is_identity() {
        let masker = TableMasker::new();
        let x = Array2::from_shape_vec((2, 3), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(masker.forward(&x).unwrap(), x);
        let coef = arr1(&[0.5, -0.5, 1.5]);
        assert_eq!(masker.inverse(&coef).unwrap(), coef);
    }
}
