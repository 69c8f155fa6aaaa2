//! 철근 부식 예측 계산 모듈 모음.

pub mod assessment;
pub mod features;
pub mod model;
pub mod pipeline;
pub mod specimen;

pub use assessment::*;
pub use features::*;
pub use model::*;
pub use pipeline::*;
pub use specimen::*;
