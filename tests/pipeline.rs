//! 예측 파이프라인 회귀 테스트.
use corrosion_toolbox::corrosion::{
    self, chloride_diffusion_rate, FeatureRecord, FormulaPreset, InputError, MassFormula,
    ModelArtifact, PipelineError, PipelineSettings, RateMode, Session, SpecimenInputs,
    Condition, FEATURE_COUNT,
};
use corrosion_toolbox::logging;

fn scenario() -> SpecimenInputs {
    SpecimenInputs {
        steel_diameter_mm: 10.0,
        duration_years: 5.0,
        wc_ratio: 0.4,
        chloride_content_pct: 0.3,
        temperature_k: 300.0,
        relative_humidity_pct: 60.0,
    }
}

/// 모든 특성에 가중치를 주는 선형 모델
fn linear_model() -> ModelArtifact {
    ModelArtifact::Linear {
        intercept: 0.2,
        coefficients: vec![0.01, 0.001, 0.005, 0.1, 3.0, 50.0],
    }
}

#[test]
fn scenario_features_match_closed_form() {
    let f = FeatureRecord::derive(&scenario(), MassFormula::Exponential);
    assert!((f.chloride_diffusion_rate - 0.06).abs() < 1e-15);
    // w/1 + w 그대로: 1 + 0.8
    let expected_mass = (-5.0_f64).exp() / (1.0 + 0.8);
    assert!((f.mass_of_corroded_substance - expected_mass).abs() < 1e-15);
    assert!((chloride_diffusion_rate(0.3, 5.0) - 0.06).abs() < 1e-15);
}

#[test]
fn classic_preset_end_to_end() {
    let model = linear_model();
    let inputs = scenario();
    let p = corrosion::predict(&model, &inputs, &FormulaPreset::Classic.settings()).unwrap();
    let x = p.features.as_array();
    assert_eq!(x.len(), FEATURE_COUNT);
    let rate = 0.2 + 0.01 * 10.0 + 0.001 * 300.0 + 0.005 * 60.0 + 0.1 * 5.0 + 3.0 * 0.06
        + 50.0 * x[5];
    assert!((p.corrosion_rate - rate).abs() < 1e-12);
    let degree = 0.046 * rate * 5.0 / 10.0;
    assert!((p.degree_of_corrosion_pct - degree).abs() < 1e-12);
}

#[test]
fn same_inputs_same_outputs() {
    logging::init_test();
    let model = ModelArtifact::from_toml_str(include_str!("../corrosion_rate_model.toml")).unwrap();
    for preset in FormulaPreset::ALL {
        let settings = preset.settings();
        let a = corrosion::predict(&model, &scenario(), &settings).unwrap();
        let b = corrosion::predict(&model, &scenario(), &settings).unwrap();
        assert_eq!(a, b, "preset {}", preset.label());
    }
}

#[test]
fn reduction_is_half_of_degree_for_every_preset() {
    let model = linear_model();
    for preset in FormulaPreset::ALL {
        let p = corrosion::predict(&model, &scenario(), &preset.settings()).unwrap();
        assert_eq!(
            p.residual_strength_reduction_pct,
            0.5 * p.degree_of_corrosion_pct,
            "preset {}",
            preset.label()
        );
    }
}

#[test]
fn percent_factor_is_hundred_times_fraction_factor() {
    let model = linear_model();
    let base = PipelineSettings {
        mass_formula: MassFormula::Electrochemical,
        ..FormulaPreset::Classic.settings()
    };
    let small = corrosion::predict(&model, &scenario(), &base).unwrap();
    let big = corrosion::predict(&model, &scenario(), &FormulaPreset::Electrochemical.settings())
        .unwrap();
    assert!((big.degree_of_corrosion_pct - 100.0 * small.degree_of_corrosion_pct).abs() < 1e-9);
}

#[test]
fn zero_duration_is_a_defined_error() {
    let model = linear_model();
    let mut inputs = scenario();
    inputs.duration_years = 0.0;
    for preset in FormulaPreset::ALL {
        let err = corrosion::predict(&model, &inputs, &preset.settings()).unwrap_err();
        assert!(matches!(err, PipelineError::Input(InputError::ZeroDuration)));
    }
}

#[test]
fn zero_diameter_is_a_defined_error() {
    let model = linear_model();
    let mut inputs = scenario();
    inputs.steel_diameter_mm = 0.0;
    let err = corrosion::predict(&model, &inputs, &PipelineSettings::default()).unwrap_err();
    assert!(matches!(err, PipelineError::Input(InputError::ZeroDiameter)));
}

#[test]
fn averaged_rate_collapses_to_point_at_grid_start() {
    let model = linear_model();
    let mut inputs = scenario();
    inputs.duration_years = 0.01;
    let averaged = FormulaPreset::TimeAveraged.settings();
    let point = PipelineSettings {
        rate_mode: RateMode::Point,
        ..averaged
    };
    let a = corrosion::predict(&model, &inputs, &averaged).unwrap();
    let p = corrosion::predict(&model, &inputs, &point).unwrap();
    assert!((a.corrosion_rate - p.corrosion_rate).abs() < 1e-9);
}

#[test]
fn averaged_rate_is_mean_over_grid() {
    let model = linear_model();
    let inputs = scenario();
    let settings = FormulaPreset::TimeAveraged.settings();
    let rate = corrosion::corrosion_rate(&model, &inputs, &settings).unwrap();
    let mut total = 0.0;
    for d in corrosion::duration_grid(inputs.duration_years) {
        let f = FeatureRecord::derive_at(&inputs, d, settings.mass_formula);
        total += corrosion::CorrosionRateModel::predict(&model, &f).unwrap();
    }
    assert!((rate - total / 15.0).abs() < 1e-12);
}

#[test]
fn condition_change_rewrites_only_ambient_fields() {
    let mut session = Session::new(Condition::Mild);
    session.inputs.steel_diameter_mm = 16.0;
    session.inputs.duration_years = 7.5;
    session.inputs.wc_ratio = 0.55;
    for c in [Condition::Severe, Condition::Moderate, Condition::Mild] {
        session.select_condition(c);
        let d = c.defaults();
        assert_eq!(session.inputs.chloride_content_pct, d.chloride_content_pct);
        assert_eq!(session.inputs.temperature_k, d.temperature_k);
        assert_eq!(session.inputs.relative_humidity_pct, d.relative_humidity_pct);
        assert_eq!(session.inputs.steel_diameter_mm, 16.0);
        assert_eq!(session.inputs.duration_years, 7.5);
        assert_eq!(session.inputs.wc_ratio, 0.55);
    }
}
