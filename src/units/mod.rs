//! 입력 단위 정의 및 변환 모듈 모음. 파이프라인 내부 기준은 K, mm 이다.

pub mod diameter;
pub mod temperature;

pub use diameter::{from_millimeter, to_millimeter, DiameterUnit};
pub use temperature::{convert_temperature, from_kelvin, to_kelvin, TemperatureUnit};
