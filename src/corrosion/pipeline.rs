//! 입력 → 특성 유도 → 모델 예측 → 부식도/잔존강도 환산 파이프라인.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::assessment::{degree_of_corrosion, residual_strength_reduction, DegreeFormula};
use super::features::{duration_grid, FeatureRecord, MassFormula, AVERAGING_SAMPLES};
use super::model::{CorrosionRateModel, ModelError};
use super::specimen::{InputError, SpecimenInputs};

/// 파이프라인 오류. 어떤 경우에도 기본값으로 대체하지 않고 사용자에게 보여준다.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("입력 오류: {0}")]
    Input(#[from] InputError),
    #[error("모델 예측 오류: {0}")]
    Model(#[from] ModelError),
}

/// 부식속도 산출 방식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateMode {
    /// 입력 기간 한 점에서 예측
    Point,
    /// [0.01, d] 15점 예측의 산술평균
    Averaged,
}

/// 파이프라인 설정 묶음.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineSettings {
    pub mass_formula: MassFormula,
    pub degree_formula: DegreeFormula,
    pub rate_mode: RateMode,
    /// 결과 표시 소수 자릿수
    pub decimals: usize,
}

/// 이름 붙은 식 조합. 배포본별로 섞지 않고 하나를 골라 쓴다.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum FormulaPreset {
    /// 지수 감쇠 질량식 + 0.046 계수, 소수 2자리
    #[default]
    Classic,
    /// 전기화학 질량식 + 4.6 계수, 소수 3자리
    Electrochemical,
    /// 전기화학 질량식 + 4.6 계수 + 15점 평균 부식속도, 소수 3자리
    TimeAveraged,
}

impl FormulaPreset {
    pub const ALL: [FormulaPreset; 3] = [
        FormulaPreset::Classic,
        FormulaPreset::Electrochemical,
        FormulaPreset::TimeAveraged,
    ];

    pub fn settings(self) -> PipelineSettings {
        match self {
            FormulaPreset::Classic => PipelineSettings {
                mass_formula: MassFormula::Exponential,
                degree_formula: DegreeFormula::Fraction0046,
                rate_mode: RateMode::Point,
                decimals: 2,
            },
            FormulaPreset::Electrochemical => PipelineSettings {
                mass_formula: MassFormula::Electrochemical,
                degree_formula: DegreeFormula::Percent46,
                rate_mode: RateMode::Point,
                decimals: 3,
            },
            FormulaPreset::TimeAveraged => PipelineSettings {
                mass_formula: MassFormula::Electrochemical,
                degree_formula: DegreeFormula::Percent46,
                rate_mode: RateMode::Averaged,
                decimals: 3,
            },
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormulaPreset::Classic => "classic",
            FormulaPreset::Electrochemical => "electrochemical",
            FormulaPreset::TimeAveraged => "time-averaged",
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        FormulaPreset::default().settings()
    }
}

/// 한 번의 제출 결과. 화면 표시용이며 저장하지 않는다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// 입력 기간에서 유도한 특성
    pub features: FeatureRecord,
    pub corrosion_rate: f64,
    pub degree_of_corrosion_pct: f64,
    pub residual_strength_reduction_pct: f64,
}

impl Prediction {
    /// 결과 두 줄을 (라벨, 값 문자열) 형태로 돌려준다.
    pub fn formatted(&self, decimals: usize) -> [(&'static str, String); 2] {
        [
            (
                "Degree of corrosion",
                format!("{:.*}", decimals, self.degree_of_corrosion_pct),
            ),
            (
                "Percentage reduction in strength",
                format!("{:.*}", decimals, self.residual_strength_reduction_pct),
            ),
        ]
    }
}

/// 설정에 따라 부식속도를 구한다.
pub fn corrosion_rate(
    model: &dyn CorrosionRateModel,
    inputs: &SpecimenInputs,
    settings: &PipelineSettings,
) -> Result<f64, ModelError> {
    match settings.rate_mode {
        RateMode::Point => model.predict(&FeatureRecord::derive(inputs, settings.mass_formula)),
        RateMode::Averaged => {
            let mut total = 0.0;
            for d in duration_grid(inputs.duration_years) {
                let record = FeatureRecord::derive_at(inputs, d, settings.mass_formula);
                total += model.predict(&record)?;
            }
            Ok(total / AVERAGING_SAMPLES as f64)
        }
    }
}

/// 입력을 검증한 뒤 전체 파이프라인을 실행한다.
pub fn predict(
    model: &dyn CorrosionRateModel,
    inputs: &SpecimenInputs,
    settings: &PipelineSettings,
) -> Result<Prediction, PipelineError> {
    inputs.validate()?;
    let features = FeatureRecord::derive(inputs, settings.mass_formula);
    tracing::debug!(
        chloride_diffusion_rate = features.chloride_diffusion_rate,
        mass_of_corroded_substance = features.mass_of_corroded_substance,
        "features derived"
    );
    let rate = corrosion_rate(model, inputs, settings)?;
    let degree = degree_of_corrosion(
        rate,
        inputs.duration_years,
        inputs.steel_diameter_mm,
        settings.degree_formula,
    );
    let prediction = Prediction {
        features,
        corrosion_rate: rate,
        degree_of_corrosion_pct: degree,
        residual_strength_reduction_pct: residual_strength_reduction(degree),
    };
    tracing::info!(
        rate = prediction.corrosion_rate,
        degree = prediction.degree_of_corrosion_pct,
        mode = ?settings.rate_mode,
        "prediction complete"
    );
    Ok(prediction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 호출 횟수를 세는 고정값 모델
    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    impl Counting {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl CorrosionRateModel for Counting {
        fn predict(&self, _features: &FeatureRecord) -> Result<f64, ModelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(2.0)
        }
    }

    fn inputs() -> SpecimenInputs {
        SpecimenInputs {
            steel_diameter_mm: 10.0,
            duration_years: 5.0,
            wc_ratio: 0.4,
            chloride_content_pct: 0.3,
            temperature_k: 300.0,
            relative_humidity_pct: 60.0,
        }
    }

    #[test]
    fn averaged_mode_calls_model_fifteen_times() {
        let model = Counting::default();
        let settings = FormulaPreset::TimeAveraged.settings();
        let rate = corrosion_rate(&model, &inputs(), &settings).unwrap();
        assert_eq!(model.calls(), AVERAGING_SAMPLES);
        assert!((rate - 2.0).abs() < 1e-12);
    }

    #[test]
    fn invalid_input_never_reaches_model() {
        let model = Counting::default();
        let mut bad = inputs();
        bad.duration_years = 0.0;
        let err = predict(&model, &bad, &PipelineSettings::default()).unwrap_err();
        assert!(matches!(err, PipelineError::Input(InputError::ZeroDuration)));
        assert_eq!(model.calls(), 0);
    }

    #[test]
    fn formatted_uses_requested_decimals() {
        let model = Counting::default();
        let p = predict(&model, &inputs(), &PipelineSettings::default()).unwrap();
        // 0.046 * 2 * 5 / 10 = 0.046
        let lines = p.formatted(2);
        assert_eq!(lines[0].1, "0.05");
        assert_eq!(lines[1].1, "0.02");
        assert_eq!(p.formatted(3)[0].1, "0.046");
    }
}
