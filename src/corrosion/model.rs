//! 사전 학습된 부식속도 회귀 모델.
//!
//! 학습은 이 크레이트 밖에서 이루어지고, 여기서는 TOML로 내보낸 모델 파일을
//! 시작 시 한 번 읽어 예측만 수행한다. 로드된 모델은 불변이며 공유해서 쓴다.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::features::{FeatureRecord, FEATURE_COUNT};

/// 기본 모델 파일명.
pub const DEFAULT_MODEL_FILE: &str = "corrosion_rate_model.toml";

/// 모델 로드/예측 오류.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("모델 파일을 읽을 수 없습니다 ({path}): {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("모델 파일 파싱 오류: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("특성 개수 불일치: 모델 {model}개, 입력 레코드 {record}개")]
    ShapeMismatch { model: usize, record: usize },
    #[error("잘못된 트리 구조 (tree {tree}, node {node}): {reason}")]
    InvalidTree {
        tree: usize,
        node: usize,
        reason: &'static str,
    },
    #[error("유한하지 않은 값: {0}")]
    NonFinite(&'static str),
}

/// 부식속도 예측기. 모델 파일 형식과 무관하게 파이프라인은 이 trait만 본다.
pub trait CorrosionRateModel: Send + Sync {
    fn predict(&self, features: &FeatureRecord) -> Result<f64, ModelError>;
}

/// 회귀 트리의 노드. `x[feature] <= threshold` 이면 왼쪽으로 내려간다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// 노드 배열로 펼친 회귀 트리. 0번이 루트이다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

impl RegressionTree {
    fn validate(&self, tree: usize) -> Result<(), ModelError> {
        if self.nodes.is_empty() {
            return Err(ModelError::InvalidTree {
                tree,
                node: 0,
                reason: "노드가 없음",
            });
        }
        for (node, n) in self.nodes.iter().enumerate() {
            if let TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } = n
            {
                let invalid = |reason| ModelError::InvalidTree { tree, node, reason };
                if *feature >= FEATURE_COUNT {
                    return Err(invalid("특성 인덱스 범위 초과"));
                }
                if !threshold.is_finite() {
                    return Err(invalid("임계값이 유한하지 않음"));
                }
                // 자식은 항상 뒤쪽에 있어야 순환이 생기지 않는다
                if *left <= node || *right <= node {
                    return Err(invalid("자식 인덱스가 부모보다 앞섬"));
                }
                if *left >= self.nodes.len() || *right >= self.nodes.len() {
                    return Err(invalid("자식 인덱스 범위 초과"));
                }
            }
        }
        Ok(())
    }

    fn evaluate(&self, x: &[f64; FEATURE_COUNT]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if x[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }
}

/// 모델 파일에 저장된 회귀 모델.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    /// y = intercept + Σ coefficients[i]·x[i]
    Linear {
        intercept: f64,
        coefficients: Vec<f64>,
    },
    /// 트리 예측값의 산술평균
    TreeEnsemble { trees: Vec<RegressionTree> },
}

impl ModelArtifact {
    /// 모델 파일을 읽고 구조를 검증한다. 실패하면 앱은 예측을 수행할 수 없다.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let artifact = Self::from_toml_str(&content)?;
        tracing::info!(path = %path.display(), kind = artifact.kind(), "corrosion-rate model loaded");
        Ok(artifact)
    }

    pub fn from_toml_str(src: &str) -> Result<Self, ModelError> {
        let artifact: ModelArtifact = toml::from_str(src)?;
        artifact.validate()?;
        Ok(artifact)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ModelArtifact::Linear { .. } => "linear",
            ModelArtifact::TreeEnsemble { .. } => "tree_ensemble",
        }
    }

    fn validate(&self) -> Result<(), ModelError> {
        match self {
            ModelArtifact::Linear {
                intercept,
                coefficients,
            } => {
                if coefficients.len() != FEATURE_COUNT {
                    return Err(ModelError::ShapeMismatch {
                        model: coefficients.len(),
                        record: FEATURE_COUNT,
                    });
                }
                if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
                    return Err(ModelError::NonFinite("선형 모델 계수"));
                }
            }
            ModelArtifact::TreeEnsemble { trees } => {
                if trees.is_empty() {
                    return Err(ModelError::InvalidTree {
                        tree: 0,
                        node: 0,
                        reason: "트리가 없음",
                    });
                }
                for (i, tree) in trees.iter().enumerate() {
                    tree.validate(i)?;
                }
            }
        }
        Ok(())
    }
}

impl CorrosionRateModel for ModelArtifact {
    fn predict(&self, features: &FeatureRecord) -> Result<f64, ModelError> {
        let x = features.as_array();
        if x.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::NonFinite("입력 특성"));
        }
        let y = match self {
            ModelArtifact::Linear {
                intercept,
                coefficients,
            } => {
                intercept
                    + coefficients
                        .iter()
                        .zip(x.iter())
                        .map(|(c, v)| c * v)
                        .sum::<f64>()
            }
            ModelArtifact::TreeEnsemble { trees } => {
                let total: f64 = trees.iter().map(|t| t.evaluate(&x)).sum();
                total / trees.len() as f64
            }
        };
        if !y.is_finite() {
            return Err(ModelError::NonFinite("모델 출력"));
        }
        Ok(y)
    }
}
