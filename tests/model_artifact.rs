//! 모델 파일 로드 테스트. 로드 실패는 치명 오류로 돌려줘야 한다.
use std::fs;

use corrosion_toolbox::corrosion::{
    CorrosionRateModel, FeatureRecord, MassFormula, ModelArtifact, ModelError, SpecimenInputs,
};

#[test]
fn bundled_demo_model_loads() {
    let model = ModelArtifact::load("corrosion_rate_model.toml").expect("demo model");
    assert_eq!(model.kind(), "tree_ensemble");
    let inputs = SpecimenInputs {
        steel_diameter_mm: 10.0,
        duration_years: 5.0,
        wc_ratio: 0.4,
        chloride_content_pct: 0.3,
        temperature_k: 300.0,
        relative_humidity_pct: 60.0,
    };
    let rate = model
        .predict(&FeatureRecord::derive(&inputs, MassFormula::Exponential))
        .unwrap();
    // tree1: 0.06 > 0.05 → 300 <= 305 → 1.35, tree2: 5 > 2.5 → 1.10, tree3: 10 <= 14 → 1.25
    assert!((rate - (1.35 + 1.10 + 1.25) / 3.0).abs() < 1e-12);
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ModelArtifact::load(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ModelError::Io { .. }));
}

#[test]
fn garbage_file_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.toml");
    fs::write(&path, "kind = \"svm\"\n").unwrap();
    assert!(matches!(
        ModelArtifact::load(&path).unwrap_err(),
        ModelError::Parse(_)
    ));
}

#[test]
fn wrong_feature_count_is_shape_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.toml");
    fs::write(
        &path,
        "kind = \"linear\"\nintercept = 0.0\ncoefficients = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]\n",
    )
    .unwrap();
    assert!(matches!(
        ModelArtifact::load(&path).unwrap_err(),
        ModelError::ShapeMismatch { model: 8, record: 6 }
    ));
}
