use std::str::FromStr;

use ndarray::Array2;

use revox_decoders::config::{LearnerConfig, LearnerKind};
use revox_decoders::error::DecodeError;
use revox_decoders::models::factory;

#[test]
fn test_factory_builds_and_predicts() {
    // tiny dataset
    let x = Array2::from_shape_vec(
        (6, 2),
        vec![
            1.0, 0.0, // class 1
            0.0, 1.0, // class -1
            1.0, 0.1, // class 1
            0.0, 0.9, // class -1
            1.1, 0.0, // class 1
            0.0, 1.2, // class -1
        ],
    )
    .expect("failed to create feature matrix");

    let y = vec![1i32, -1i32, 1i32, -1i32, 1i32, -1i32];

    let config = LearnerConfig::default();
    let mut model = factory::build_learner(&config).unwrap();
    model.fit(&x, &y).unwrap();

    let preds = model.predict(&x).unwrap();
    assert_eq!(preds.len(), x.nrows());
    assert!(preds.iter().all(|&p| p == 1 || p == -1));
}

#[test]
fn test_factory_builds_from_parsed_kind() {
    let kind = LearnerKind::from_str("logistic").unwrap();
    let model = factory::build_learner(&LearnerConfig::new(200, kind)).unwrap();
    assert_eq!(model.name(), "LogisticClassifier");
}

#[test]
fn test_factory_rejects_invalid_parameters() {
    let config = LearnerConfig::new(
        100,
        LearnerKind::SparseLinear {
            penalty: -1.0,
            l1_ratio: 1.0,
            screening_percentile: 100.0,
        },
    );
    assert!(matches!(
        factory::build_learner(&config),
        Err(DecodeError::InvalidParameter(_))
    ));
}
