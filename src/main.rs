use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use corrosion_toolbox::{
    app::{self, AppError},
    config,
    corrosion::{self, Condition, FormulaPreset, ModelArtifact, SpecimenInputs},
    i18n, logging, ui_cli,
    units,
};

/// 철근 부식도/잔존강도 예측 CLI.
#[derive(Debug, Parser)]
#[command(name = "corrosion_toolbox_cli", version, about)]
struct Cli {
    /// 설정 파일 경로
    #[arg(long, default_value = config::CONFIG_FILE)]
    config: PathBuf,
    /// 모델 파일 경로 (설정값 대신 사용)
    #[arg(long)]
    model: Option<PathBuf>,
    /// 식 조합 (설정값 대신 사용)
    #[arg(long, value_enum)]
    preset: Option<FormulaPreset>,
    /// 언어: auto/ko/en
    #[arg(long, short = 'L', default_value = "auto")]
    lang: String,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 대화형 입력 폼 (기본)
    Interactive,
    /// 인자로 받은 값으로 한 번 예측하고 종료한다
    Predict(PredictArgs),
}

#[derive(Debug, clap::Args)]
struct PredictArgs {
    /// 철근 직경 (설정의 직경 단위)
    #[arg(long)]
    steel_diameter: f64,
    /// 노출 기간 [년]
    #[arg(long)]
    duration: f64,
    /// 물/시멘트 비
    #[arg(long)]
    wc_ratio: f64,
    /// 노출 조건 (mild/moderate/severe). 아래 세 값의 기본값을 정한다.
    /// 생략하면 설정에 남은 마지막 조건을 쓴다
    #[arg(long)]
    condition: Option<String>,
    /// 염화물 함량 [%]
    #[arg(long)]
    chloride: Option<f64>,
    /// 온도 (설정의 온도 단위)
    #[arg(long, allow_negative_numbers = true)]
    temperature: Option<f64>,
    /// 상대습도 [%]
    #[arg(long)]
    humidity: Option<f64>,
}

/// 프로그램의 엔트리 포인트. 설정과 모델을 로드한 뒤 CLI 애플리케이션을 실행한다.
fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();
    match try_run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "fatal");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn try_run(cli: Cli) -> Result<(), AppError> {
    let mut cfg = config::load_from(&cli.config)?;
    if let Some(preset) = cli.preset {
        cfg.preset = preset;
    }
    let model_path = cli.model.unwrap_or_else(|| cfg.model_path.clone());
    let lang = i18n::resolve_language(&cli.lang, Some(cfg.language.as_str()));
    let tr = i18n::Translator::new_with_pack(&lang, cfg.language_pack_dir.as_deref());

    // 모델이 없으면 어떤 요청도 처리할 수 없다
    let model = ModelArtifact::load(&model_path)?;

    match cli.command.unwrap_or(Command::Interactive) {
        Command::Interactive => app::run(&mut cfg, &cli.config, &tr, &model),
        Command::Predict(args) => {
            let inputs = predict_inputs(&args, &cfg)?;
            let settings = cfg.preset.settings();
            let prediction = corrosion::predict(&model, &inputs, &settings)?;
            ui_cli::print_prediction(&tr, &prediction, settings.decimals);
            Ok(())
        }
    }
}

/// 인자를 내부 단위(mm, K)의 입력값으로 바꾼다. 조건을 생략하면 설정의 마지막 조건을 쓴다.
fn predict_inputs(args: &PredictArgs, cfg: &config::Config) -> Result<SpecimenInputs, AppError> {
    let condition = match args.condition.as_deref() {
        Some(label) => Condition::parse(label)?,
        None => cfg.default_condition,
    };
    let mut inputs = SpecimenInputs::with_condition(condition);
    inputs.steel_diameter_mm = units::to_millimeter(args.steel_diameter, cfg.diameter_unit);
    inputs.duration_years = args.duration;
    inputs.wc_ratio = args.wc_ratio;
    if let Some(c) = args.chloride {
        inputs.chloride_content_pct = c;
    }
    if let Some(t) = args.temperature {
        inputs.temperature_k = units::to_kelvin(t, cfg.temperature_unit);
    }
    if let Some(h) = args.humidity {
        inputs.relative_humidity_pct = h;
    }
    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> PredictArgs {
        let mut argv = vec![
            "corrosion_toolbox_cli",
            "predict",
            "--steel-diameter",
            "10",
            "--duration",
            "5",
            "--wc-ratio",
            "0.4",
        ];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Some(Command::Predict(a)) => a,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn omitted_condition_uses_cached_default() {
        let cfg = config::Config {
            default_condition: Condition::Moderate,
            ..config::Config::default()
        };
        let inputs = predict_inputs(&args(&[]), &cfg).unwrap();
        assert_eq!(inputs.chloride_content_pct, 0.3);
        assert_eq!(inputs.temperature_k, 310.0);
        assert_eq!(inputs.relative_humidity_pct, 60.0);
    }

    #[test]
    fn explicit_condition_and_overrides_win() {
        let cfg = config::Config {
            default_condition: Condition::Moderate,
            temperature_unit: units::TemperatureUnit::Celsius,
            ..config::Config::default()
        };
        let a = args(&["--condition", "severe", "--temperature", "-10"]);
        let inputs = predict_inputs(&a, &cfg).unwrap();
        assert_eq!(inputs.chloride_content_pct, 0.5);
        assert!((inputs.temperature_k - 263.15).abs() < 1e-9);
        assert!(predict_inputs(&args(&["--condition", "arid"]), &cfg).is_err());
    }
}
