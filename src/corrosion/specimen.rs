use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 노출 환경 프리셋. 염화물/온도/습도 기본값을 채우는 용도로만 쓰인다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    #[default]
    Mild,
    Moderate,
    Severe,
}

/// 조건별 기본값 묶음.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConditionDefaults {
    /// 염화물 함량 [%]
    pub chloride_content_pct: f64,
    /// 온도 [K]
    pub temperature_k: f64,
    /// 상대습도 [%]
    pub relative_humidity_pct: f64,
}

impl Condition {
    pub const ALL: [Condition; 3] = [Condition::Mild, Condition::Moderate, Condition::Severe];

    pub fn defaults(self) -> ConditionDefaults {
        match self {
            Condition::Mild => ConditionDefaults {
                chloride_content_pct: 0.1,
                temperature_k: 300.0,
                relative_humidity_pct: 50.0,
            },
            Condition::Moderate => ConditionDefaults {
                chloride_content_pct: 0.3,
                temperature_k: 310.0,
                relative_humidity_pct: 60.0,
            },
            Condition::Severe => ConditionDefaults {
                chloride_content_pct: 0.5,
                temperature_k: 320.0,
                relative_humidity_pct: 70.0,
            },
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Condition::Mild => "mild",
            Condition::Moderate => "moderate",
            Condition::Severe => "severe",
        }
    }

    /// 라벨 문자열(mild/moderate/severe)을 조건으로 변환한다. 대소문자는 무시한다.
    pub fn parse(label: &str) -> Result<Self, InputError> {
        match label.trim().to_lowercase().as_str() {
            "mild" => Ok(Condition::Mild),
            "moderate" => Ok(Condition::Moderate),
            "severe" => Ok(Condition::Severe),
            other => Err(InputError::UnknownCondition(other.to_string())),
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// 입력값 검증 오류.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("{field} 값은 0 이상이어야 합니다 (입력: {value})")]
    Negative { field: &'static str, value: f64 },
    #[error("{field} 값이 유한한 숫자가 아닙니다")]
    NotFinite { field: &'static str },
    #[error("노출 기간이 0이면 염화물 확산율을 계산할 수 없습니다")]
    ZeroDuration,
    #[error("철근 직경이 0이면 부식도를 계산할 수 없습니다")]
    ZeroDiameter,
    #[error("알 수 없는 조건: {0} (mild/moderate/severe)")]
    UnknownCondition(String),
}

/// 시편 입력값 6개. 내부 기준 단위는 mm, 년, K, % 이다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpecimenInputs {
    /// 철근 직경 [mm]
    pub steel_diameter_mm: f64,
    /// 노출 기간 [년]
    pub duration_years: f64,
    /// 물/시멘트 비
    pub wc_ratio: f64,
    /// 염화물 함량 [%]
    pub chloride_content_pct: f64,
    /// 온도 [K]
    pub temperature_k: f64,
    /// 상대습도 [%]
    pub relative_humidity_pct: f64,
}

impl SpecimenInputs {
    /// 폼 초기 상태. 직경/기간/수시멘트비는 0, 나머지는 조건 기본값.
    pub fn with_condition(condition: Condition) -> Self {
        let mut inputs = Self {
            steel_diameter_mm: 0.0,
            duration_years: 0.0,
            wc_ratio: 0.0,
            chloride_content_pct: 0.0,
            temperature_k: 0.0,
            relative_humidity_pct: 0.0,
        };
        inputs.apply_condition(condition);
        inputs
    }

    /// 조건 기본값으로 염화물/온도/습도 세 필드만 덮어쓴다.
    pub fn apply_condition(&mut self, condition: Condition) {
        let d = condition.defaults();
        self.chloride_content_pct = d.chloride_content_pct;
        self.temperature_k = d.temperature_k;
        self.relative_humidity_pct = d.relative_humidity_pct;
    }

    fn fields(&self) -> [(&'static str, f64); 6] {
        [
            ("steel_diameter", self.steel_diameter_mm),
            ("duration", self.duration_years),
            ("wc_ratio", self.wc_ratio),
            ("chloride_content", self.chloride_content_pct),
            ("temperature", self.temperature_k),
            ("relative_humidity", self.relative_humidity_pct),
        ]
    }

    /// 모든 필드가 유한한 0 이상 값인지, 0으로 나누는 필드가 없는지 확인한다.
    pub fn validate(&self) -> Result<(), InputError> {
        for (field, value) in self.fields() {
            if !value.is_finite() {
                return Err(InputError::NotFinite { field });
            }
            if value < 0.0 {
                return Err(InputError::Negative { field, value });
            }
        }
        if self.duration_years == 0.0 {
            return Err(InputError::ZeroDuration);
        }
        if self.steel_diameter_mm == 0.0 {
            return Err(InputError::ZeroDiameter);
        }
        Ok(())
    }
}

impl Default for SpecimenInputs {
    fn default() -> Self {
        Self::with_condition(Condition::default())
    }
}

/// 한 사용자의 폼 상태. 전역 대신 명시적으로 들고 다닌다.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub condition: Condition,
    pub inputs: SpecimenInputs,
}

impl Session {
    pub fn new(condition: Condition) -> Self {
        Self {
            condition,
            inputs: SpecimenInputs::with_condition(condition),
        }
    }

    /// 조건을 바꾸고 해당 기본값을 반영한다.
    pub fn select_condition(&mut self, condition: Condition) {
        self.condition = condition;
        self.inputs.apply_condition(condition);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Condition::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SpecimenInputs {
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
    fn condition_defaults_table() {
        assert_eq!(Condition::Mild.defaults().chloride_content_pct, 0.1);
        assert_eq!(Condition::Moderate.defaults().temperature_k, 310.0);
        assert_eq!(Condition::Severe.defaults().relative_humidity_pct, 70.0);
    }

    #[test]
    fn parse_condition_labels() {
        assert_eq!(Condition::parse(" Severe ").unwrap(), Condition::Severe);
        assert!(matches!(
            Condition::parse("extreme"),
            Err(InputError::UnknownCondition(_))
        ));
    }

    #[test]
    fn zero_duration_rejected() {
        let mut inputs = sample();
        inputs.duration_years = 0.0;
        assert_eq!(inputs.validate(), Err(InputError::ZeroDuration));
    }

    #[test]
    fn zero_diameter_rejected() {
        let mut inputs = sample();
        inputs.steel_diameter_mm = 0.0;
        assert_eq!(inputs.validate(), Err(InputError::ZeroDiameter));
    }

    #[test]
    fn negative_and_nan_rejected() {
        let mut inputs = sample();
        inputs.wc_ratio = -0.1;
        assert!(matches!(
            inputs.validate(),
            Err(InputError::Negative { field: "wc_ratio", .. })
        ));
        inputs.wc_ratio = f64::NAN;
        assert_eq!(
            inputs.validate(),
            Err(InputError::NotFinite { field: "wc_ratio" })
        );
    }

    #[test]
    fn session_starts_from_condition_defaults() {
        let s = Session::new(Condition::Moderate);
        assert_eq!(s.inputs.chloride_content_pct, 0.3);
        assert_eq!(s.inputs.steel_diameter_mm, 0.0);
    }
}
