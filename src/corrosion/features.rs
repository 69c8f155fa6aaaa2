//! 입력값에서 모델 입력 특성(feature) 레코드를 유도한다.

use serde::{Deserialize, Serialize};

use super::specimen::SpecimenInputs;

/// 모델이 받는 특성 개수.
pub const FEATURE_COUNT: usize = 6;

/// 모델 학습 시의 열 순서.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "steel_diameter",
    "temperature",
    "relative_humidity",
    "duration",
    "chloride_diffusion_rate",
    "mass_of_corroded_substance",
];

/// 평균 부식속도 계산 시 샘플 개수.
pub const AVERAGING_SAMPLES: usize = 15;
/// 평균 부식속도 계산 시 시작 기간 [년].
pub const AVERAGING_START_YEARS: f64 = 0.01;

const SECONDS_PER_YEAR: f64 = 365.0 * 86400.0;
/// 패러데이 상수 [C/mol]
const FARADAY: f64 = 96485.0;
/// 철 산화 시 전자 수
const IRON_VALENCE: f64 = 2.0;

/// 부식 생성물 질량 근사식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MassFormula {
    /// exp(-d) / (1 + (w + w))
    Exponential,
    /// d·365·86400·exp(-d) / ((1 + w + w)·2·96485)
    Electrochemical,
}

impl MassFormula {
    /// 부식 생성물 질량을 계산한다.
    ///
    /// 분모의 `w + w`는 원래 식 `w/1 + w`를 그대로 옮긴 것이다.
    /// `w/(1+w)` 의도였을 가능성이 높지만 기존 모델이 이 값으로 학습되었으므로 바꾸지 않는다.
    pub fn mass_of_corroded_substance(self, duration_years: f64, wc_ratio: f64) -> f64 {
        let w_term = wc_ratio / 1.0 + wc_ratio;
        let decay = (-duration_years).exp();
        match self {
            MassFormula::Exponential => decay / (1.0 + w_term),
            MassFormula::Electrochemical => {
                duration_years * SECONDS_PER_YEAR * decay
                    / ((1.0 + w_term) * IRON_VALENCE * FARADAY)
            }
        }
    }
}

/// 염화물 함량 / 노출 기간. 기간이 0이면 무한대가 되므로 호출 전에 검증해야 한다.
pub fn chloride_diffusion_rate(chloride_content_pct: f64, duration_years: f64) -> f64 {
    chloride_content_pct / duration_years
}

/// 모델 입력 레코드.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub steel_diameter_mm: f64,
    pub temperature_k: f64,
    pub relative_humidity_pct: f64,
    pub duration_years: f64,
    pub chloride_diffusion_rate: f64,
    pub mass_of_corroded_substance: f64,
}

impl FeatureRecord {
    pub fn derive(inputs: &SpecimenInputs, formula: MassFormula) -> Self {
        Self::derive_at(inputs, inputs.duration_years, formula)
    }

    /// 다른 입력은 고정하고 주어진 기간에서 유도 특성을 다시 계산한다.
    pub fn derive_at(inputs: &SpecimenInputs, duration_years: f64, formula: MassFormula) -> Self {
        Self {
            steel_diameter_mm: inputs.steel_diameter_mm,
            temperature_k: inputs.temperature_k,
            relative_humidity_pct: inputs.relative_humidity_pct,
            duration_years,
            chloride_diffusion_rate: chloride_diffusion_rate(
                inputs.chloride_content_pct,
                duration_years,
            ),
            mass_of_corroded_substance: formula
                .mass_of_corroded_substance(duration_years, inputs.wc_ratio),
        }
    }

    /// `FEATURE_NAMES` 순서의 배열.
    pub fn as_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.steel_diameter_mm,
            self.temperature_k,
            self.relative_humidity_pct,
            self.duration_years,
            self.chloride_diffusion_rate,
            self.mass_of_corroded_substance,
        ]
    }
}

/// `[0.01, d]` 구간을 양 끝 포함 15개 등간격으로 나눈다.
pub fn duration_grid(duration_years: f64) -> [f64; AVERAGING_SAMPLES] {
    let step = (duration_years - AVERAGING_START_YEARS) / (AVERAGING_SAMPLES - 1) as f64;
    let mut grid = [AVERAGING_START_YEARS; AVERAGING_SAMPLES];
    for (i, slot) in grid.iter_mut().enumerate() {
        *slot = AVERAGING_START_YEARS + step * i as f64;
    }
    grid[AVERAGING_SAMPLES - 1] = duration_years;
    grid
}
