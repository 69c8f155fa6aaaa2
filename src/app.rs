use std::path::Path;

use thiserror::Error;

use crate::config::{Config, ConfigError};
use crate::corrosion::{CorrosionRateModel, InputError, ModelError, PipelineError, Session};
use crate::i18n::{self, Translator};
use crate::ui_cli::{self, MenuChoice};

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    #[error("설정 오류: {0}")]
    Config(#[from] ConfigError),
    #[error("모델 오류: {0}")]
    Model(#[from] ModelError),
    #[error("입력 오류: {0}")]
    Input(#[from] InputError),
    #[error("{0}")]
    Pipeline(#[from] PipelineError),
}

/// CLI 애플리케이션의 메인 루프를 실행한다.
///
/// 예측 오류는 화면에 표시하고 다음 입력을 기다린다. 입출력/설정 오류만 루프를 끝낸다.
/// 설정은 불러온 경로(`config_path`)에 다시 저장한다.
pub fn run(
    config: &mut Config,
    config_path: &Path,
    tr: &Translator,
    model: &dyn CorrosionRateModel,
) -> Result<(), AppError> {
    let mut session = Session::new(config.default_condition);
    loop {
        match ui_cli::main_menu(tr)? {
            MenuChoice::Predict => {
                match ui_cli::handle_predict(tr, config, model, &mut session) {
                    Ok(()) => {}
                    Err(e @ (AppError::Pipeline(_) | AppError::Input(_))) => {
                        tracing::warn!(error = %e, "prediction failed");
                        println!("{}: {e}", tr.t(i18n::keys::ERROR_PREFIX));
                    }
                    Err(e) => return Err(e),
                }
                remember_condition(config, config_path, &session)?;
            }
            MenuChoice::Settings => {
                ui_cli::handle_settings(tr, config)?;
                config.save_to(config_path)?;
            }
            MenuChoice::Exit => {
                config.save_to(config_path)?;
                println!("{}", tr.t(i18n::keys::APP_EXIT));
                break;
            }
        }
    }
    Ok(())
}

/// 세션의 마지막 조건이 바뀌었으면 설정에 기록하고 저장한다.
fn remember_condition(
    config: &mut Config,
    config_path: &Path,
    session: &Session,
) -> Result<bool, ConfigError> {
    if config.default_condition == session.condition {
        return Ok(false);
    }
    config.default_condition = session.condition;
    config.save_to(config_path)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config;
    use crate::corrosion::Condition;

    #[test]
    fn condition_is_saved_to_the_loaded_config_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "preset = \"electrochemical\"\n").unwrap();
        let mut cfg = config::load_from(&path).unwrap();

        let mut session = Session::new(cfg.default_condition);
        session.select_condition(Condition::Severe);
        assert!(remember_condition(&mut cfg, &path, &session).unwrap());
        assert!(!remember_condition(&mut cfg, &path, &session).unwrap());

        let reloaded = config::load_from(&path).unwrap();
        assert_eq!(reloaded.default_condition, Condition::Severe);
        assert_eq!(reloaded.preset, crate::corrosion::FormulaPreset::Electrochemical);
        assert!(!dir.path().join(config::CONFIG_FILE).exists());
    }
}
