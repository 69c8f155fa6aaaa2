use serde::{Deserialize, Serialize};

/// 온도 입력 단위. 모델은 켈빈 값으로 학습되었다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TemperatureUnit {
    #[default]
    Kelvin,
    Celsius,
    Fahrenheit,
    Rankine,
}

impl TemperatureUnit {
    pub const ALL: [TemperatureUnit; 4] = [
        TemperatureUnit::Kelvin,
        TemperatureUnit::Celsius,
        TemperatureUnit::Fahrenheit,
        TemperatureUnit::Rankine,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            TemperatureUnit::Kelvin => "K",
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
            TemperatureUnit::Rankine => "R",
        }
    }

    /// 단위 문자열(K, C, F, R 등)을 해석한다.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().trim_start_matches('°').to_lowercase().as_str() {
            "k" | "kelvin" => Some(TemperatureUnit::Kelvin),
            "c" | "celsius" => Some(TemperatureUnit::Celsius),
            "f" | "fahrenheit" => Some(TemperatureUnit::Fahrenheit),
            "r" | "rankine" => Some(TemperatureUnit::Rankine),
            _ => None,
        }
    }
}

/// 주어진 값을 켈빈으로 변환한다.
pub fn to_kelvin(value: f64, unit: TemperatureUnit) -> f64 {
    match unit {
        TemperatureUnit::Kelvin => value,
        TemperatureUnit::Celsius => value + 273.15,
        TemperatureUnit::Fahrenheit => (value + 459.67) * 5.0 / 9.0,
        TemperatureUnit::Rankine => value * 5.0 / 9.0,
    }
}

/// 켈빈 값을 원하는 단위로 변환한다.
pub fn from_kelvin(value_k: f64, unit: TemperatureUnit) -> f64 {
    match unit {
        TemperatureUnit::Kelvin => value_k,
        TemperatureUnit::Celsius => value_k - 273.15,
        TemperatureUnit::Fahrenheit => value_k * 9.0 / 5.0 - 459.67,
        TemperatureUnit::Rankine => value_k * 9.0 / 5.0,
    }
}

/// 온도를 서로 다른 단위로 변환한다.
pub fn convert_temperature(value: f64, from: TemperatureUnit, to: TemperatureUnit) -> f64 {
    from_kelvin(to_kelvin(value, from), to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn celsius_preset_value() {
        // moderate 조건 310 K
        let c = from_kelvin(310.0, TemperatureUnit::Celsius);
        assert!((c - 36.85).abs() < 1e-9);
        assert!((to_kelvin(c, TemperatureUnit::Celsius) - 310.0).abs() < 1e-9);
    }

    #[test]
    fn fahrenheit_freezing_point() {
        let k = to_kelvin(32.0, TemperatureUnit::Fahrenheit);
        assert!((k - 273.15).abs() < 1e-9);
    }

    #[test]
    fn parse_symbols() {
        assert_eq!(TemperatureUnit::parse("°C"), Some(TemperatureUnit::Celsius));
        assert_eq!(TemperatureUnit::parse("k"), Some(TemperatureUnit::Kelvin));
        assert_eq!(TemperatureUnit::parse("bar"), None);
    }
}
