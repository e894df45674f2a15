//! Data structures and helpers for decoding sessions.
//!
//! This module defines `Session`, a stack of recorded volumes with
//! row-aligned condition and run metadata, and contains the helpers for
//! restricting a session to conditions of interest, splitting it by run,
//! and encoding conditions as binary targets.

use ndarray::{Array3, Array4, Axis};

use crate::error::DecodeError;
use crate::io::session_targets::SessionTargets;

/// A stack of recorded volumes with one condition and run label per sample.
#[derive(Debug, Clone)]
pub struct Session {
    pub volumes: Array4<f32>,
    pub conditions: Vec<String>,
    pub runs: Vec<i32>,
}

impl Session {
    pub fn new(
        volumes: Array4<f32>,
        conditions: Vec<String>,
        runs: Vec<i32>,
    ) -> Result<Self, DecodeError> {
        let n_samples = volumes.len_of(Axis(0));
        if conditions.len() != n_samples {
            return Err(DecodeError::LengthMismatch {
                samples: n_samples,
                labels: conditions.len(),
            });
        }
        if runs.len() != n_samples {
            return Err(DecodeError::LengthMismatch {
                samples: n_samples,
                labels: runs.len(),
            });
        }
        Ok(Session {
            volumes,
            conditions,
            runs,
        })
    }

    /// Pair a volume stack with a loaded target table.
    pub fn from_targets(volumes: Array4<f32>, targets: SessionTargets) -> Result<Self, DecodeError> {
        Session::new(volumes, targets.conditions, targets.runs)
    }

    pub fn n_samples(&self) -> usize {
        self.volumes.len_of(Axis(0))
    }

    pub fn log_summary(&self) {
        let mut names: Vec<&String> = self.conditions.iter().collect();
        names.sort();
        names.dedup();
        for name in names {
            log::info!(
                "{} samples of condition '{}'",
                self.conditions.iter().filter(|c| *c == name).count(),
                name
            );
        }
        log::info!(
            "{} samples across {} runs, volume shape {:?}",
            self.n_samples(),
            {
                let mut runs = self.runs.clone();
                runs.sort_unstable();
                runs.dedup();
                runs.len()
            },
            (
                self.volumes.len_of(Axis(1)),
                self.volumes.len_of(Axis(2)),
                self.volumes.len_of(Axis(3)),
            )
        );
    }

    /// Keep only the samples whose condition is one of `wanted`.
    pub fn restrict(&self, wanted: &[&str]) -> Session {
        let selected: Vec<usize> = self
            .conditions
            .iter()
            .enumerate()
            .filter_map(|(i, c)| wanted.contains(&c.as_str()).then_some(i))
            .collect();
        self.select(&selected)
    }

    /// Split into (train, test): train takes runs up to and including
    /// `max_train_run`, test takes the rest.
    pub fn split_by_run(&self, max_train_run: i32) -> (Session, Session) {
        let train: Vec<usize> = (0..self.n_samples())
            .filter(|&i| self.runs[i] <= max_train_run)
            .collect();
        let test: Vec<usize> = (0..self.n_samples())
            .filter(|&i| self.runs[i] > max_train_run)
            .collect();
        (self.select(&train), self.select(&test))
    }

    /// Encode conditions as binary targets: `pos` maps to 1, `neg` to -1.
    /// Any other condition present in the session is an error, so restrict
    /// the session first.
    pub fn binary_targets(&self, pos: &str, neg: &str) -> Result<Vec<i32>, DecodeError> {
        self.conditions
            .iter()
            .map(|c| {
                if c == pos {
                    Ok(1)
                } else if c == neg {
                    Ok(-1)
                } else {
                    Err(DecodeError::UnknownCondition(c.clone()))
                }
            })
            .collect()
    }

    /// Mean volume across samples, typically used as a plotting background.
    pub fn mean_volume(&self) -> Option<Array3<f32>> {
        self.volumes.mean_axis(Axis(0))
    }

    fn select(&self, indices: &[usize]) -> Session {
        Session {
            volumes: self.volumes.select(Axis(0), indices),
            conditions: indices.iter().map(|&i| self.conditions[i].clone()).collect(),
            runs: indices.iter().map(|&i| self.runs[i]).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array4;

    fn session() -> Session {
        let volumes = Array4::from_shape_fn((6, 2, 2, 2), |(s, _, _, _)| s as f32);
        let conditions = vec!["face", "house", "rest", "face", "house", "rest"]
            .into_iter()
            .map(String::from)
            .collect();
        let runs = vec![0, 0, 0, 1, 1, 1];
        Session::new(volumes, conditions, runs).unwrap()
    }

    #[test]
    fn test_new_validates_lengths() {
        let volumes = Array4::<f32>::zeros((3, 2, 2, 2));
        assert!(matches!(
            Session::new(volumes, vec!["face".to_string()], vec![0, 0, 0]),
            Err(DecodeError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_restrict_drops_other_conditions() {
        let restricted = session().restrict(&["face", "house"]);
        assert_eq!(restricted.n_samples(), 4);
        assert!(restricted.conditions.iter().all(|c| c != "rest"));
        // volumes stay row-aligned with the metadata
        assert_eq!(restricted.volumes[(2, 0, 0, 0)], 3.0);
    }

    #[test]
    fn test_split_by_run() {
        let (train, test) = session().split_by_run(0);
        assert_eq!(train.n_samples(), 3);
        assert_eq!(test.n_samples(), 3);
        assert!(train.runs.iter().all(|&r| r == 0));
        assert!(test.runs.iter().all(|&r| r == 1));
    }

    #[test]
    fn test_binary_targets() {
        let restricted = session().restrict(&["face", "house"]);
        let y = restricted.binary_targets("face", "house").unwrap();
        assert_eq!(y, vec![1, -1, 1, -1]);

        // a stray condition is an error rather than a silent skip
        assert!(matches!(
            session().binary_targets("face", "house"),
            Err(DecodeError::UnknownCondition(_))
        ));
    }

    #[test]
    fn test_mean_volume() {
        let mean = session().mean_volume().unwrap();
        assert_eq!(mean.dim(), (2, 2, 2));
        assert!((mean[(0, 0, 0)] - 2.5).abs() < 1e-6);
    }
}
