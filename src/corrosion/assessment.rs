use serde::{Deserialize, Serialize};

/// 부식도 환산식. 배포본마다 계수가 달랐으므로 둘 다 이름을 붙여 둔다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DegreeFormula {
    /// 0.046 · rate · d / D
    Fraction0046,
    /// 4.6 · rate · d / D
    Percent46,
}

impl DegreeFormula {
    pub fn factor(self) -> f64 {
        match self {
            DegreeFormula::Fraction0046 => 0.046,
            DegreeFormula::Percent46 => 4.6,
        }
    }
}

/// 부식속도, 노출 기간[년], 철근 직경[mm]으로 부식도[%]를 계산한다.
///
/// 직경이 0이면 무한대가 되므로 입력 검증을 먼저 거쳐야 한다.
pub fn degree_of_corrosion(
    corrosion_rate: f64,
    duration_years: f64,
    steel_diameter_mm: f64,
    formula: DegreeFormula,
) -> f64 {
    formula.factor() * corrosion_rate * duration_years / steel_diameter_mm
}

/// 잔존강도 감소율[%]. 모든 환산식에서 부식도의 절반이다.
pub fn residual_strength_reduction(degree_of_corrosion_pct: f64) -> f64 {
    0.5 * degree_of_corrosion_pct
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factors_differ_by_hundred() {
        let a = degree_of_corrosion(2.0, 5.0, 10.0, DegreeFormula::Fraction0046);
        let b = degree_of_corrosion(2.0, 5.0, 10.0, DegreeFormula::Percent46);
        assert!((a - 0.046).abs() < 1e-12);
        assert!((b - 4.6).abs() < 1e-12);
    }

    #[test]
    fn reduction_is_half() {
        assert_eq!(residual_strength_reduction(3.2), 1.6);
    }
}
