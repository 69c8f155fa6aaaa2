use serde::{Deserialize, Serialize};

/// 철근 직경 입력 단위. 내부 기준은 밀리미터이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DiameterUnit {
    #[default]
    Millimeter,
    Centimeter,
    Inch,
}

impl DiameterUnit {
    pub const ALL: [DiameterUnit; 3] = [
        DiameterUnit::Millimeter,
        DiameterUnit::Centimeter,
        DiameterUnit::Inch,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            DiameterUnit::Millimeter => "mm",
            DiameterUnit::Centimeter => "cm",
            DiameterUnit::Inch => "in",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "mm" => Some(DiameterUnit::Millimeter),
            "cm" => Some(DiameterUnit::Centimeter),
            "in" | "inch" | "\"" => Some(DiameterUnit::Inch),
            _ => None,
        }
    }
}

pub fn to_millimeter(value: f64, unit: DiameterUnit) -> f64 {
    match unit {
        DiameterUnit::Millimeter => value,
        DiameterUnit::Centimeter => value * 10.0,
        DiameterUnit::Inch => value * 25.4,
    }
}

pub fn from_millimeter(value_mm: f64, unit: DiameterUnit) -> f64 {
    match unit {
        DiameterUnit::Millimeter => value_mm,
        DiameterUnit::Centimeter => value_mm / 10.0,
        DiameterUnit::Inch => value_mm / 25.4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebar_sizes() {
        // #4 철근 = 0.5 in = 12.7 mm
        assert!((to_millimeter(0.5, DiameterUnit::Inch) - 12.7).abs() < 1e-12);
        assert!((from_millimeter(16.0, DiameterUnit::Centimeter) - 1.6).abs() < 1e-12);
    }
}
