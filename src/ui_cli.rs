use std::io::{self, Write};

use crate::app::AppError;
use crate::config::Config;
use crate::corrosion::{self, Condition, CorrosionRateModel, FormulaPreset, Prediction, Session};
use crate::i18n::{keys, Translator};
use crate::units::{self, DiameterUnit, TemperatureUnit};

/// 메인 메뉴 선택지를 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Predict,
    Settings,
    Exit,
}

/// 메인 메뉴를 표시하고 선택값을 반환한다.
pub fn main_menu(tr: &Translator) -> Result<MenuChoice, AppError> {
    println!("\n=== {} ===", tr.t(keys::APP_TITLE));
    println!("{}", tr.t(keys::MAIN_MENU_PREDICT));
    println!("{}", tr.t(keys::MAIN_MENU_SETTINGS));
    println!("{}", tr.t(keys::MAIN_MENU_EXIT));
    loop {
        let sel = read_line(&tr.t(keys::PROMPT_MENU_SELECT))?;
        match sel.trim() {
            "1" => return Ok(MenuChoice::Predict),
            "2" => return Ok(MenuChoice::Settings),
            "0" => return Ok(MenuChoice::Exit),
            _ => println!("{}", tr.t(keys::INVALID_SELECTION_RETRY)),
        }
    }
}

/// 입력 폼을 진행하고 예측 결과를 출력한다.
///
/// 조건을 고르면 염화물/온도/습도 기본값만 바뀌고, 나머지 값은 세션에 남은 값을 기본값으로 제시한다.
pub fn handle_predict(
    tr: &Translator,
    cfg: &Config,
    model: &dyn CorrosionRateModel,
    session: &mut Session,
) -> Result<(), AppError> {
    println!("\n-- {} --", tr.t(keys::APP_HEADER));
    println!("{} [{}]", tr.t(keys::CONDITION_LABEL), session.condition);
    println!("{}", tr.t(keys::CONDITION_OPTIONS));
    let sel = read_line(&format!("({}): ", tr.t(keys::PROMPT_KEEP_DEFAULT)))?;
    let condition = match sel.trim() {
        "" => session.condition,
        "1" => Condition::Mild,
        "2" => Condition::Moderate,
        "3" => Condition::Severe,
        other => Condition::parse(other)?,
    };
    session.select_condition(condition);

    let d_unit = cfg.diameter_unit;
    let t_unit = cfg.temperature_unit;
    let inputs = &mut session.inputs;
    let diameter = read_non_negative(
        tr,
        &format!("{} [{}]", tr.t(keys::FIELD_STEEL_DIAMETER), d_unit.symbol()),
        units::from_millimeter(inputs.steel_diameter_mm, d_unit),
    )?;
    inputs.steel_diameter_mm = units::to_millimeter(diameter, d_unit);
    inputs.duration_years =
        read_non_negative(tr, &tr.t(keys::FIELD_DURATION), inputs.duration_years)?;
    inputs.wc_ratio = read_non_negative(tr, &tr.t(keys::FIELD_WC_RATIO), inputs.wc_ratio)?;
    inputs.chloride_content_pct =
        read_non_negative(tr, &tr.t(keys::FIELD_CHLORIDE), inputs.chloride_content_pct)?;
    // 최솟값은 0 K이므로 표시 단위로 환산한 하한을 쓴다
    let temperature = read_at_least(
        tr,
        &format!("{} [{}]", tr.t(keys::FIELD_TEMPERATURE), t_unit.symbol()),
        units::from_kelvin(inputs.temperature_k, t_unit),
        units::from_kelvin(0.0, t_unit),
    )?;
    inputs.temperature_k = units::to_kelvin(temperature, t_unit);
    inputs.relative_humidity_pct =
        read_non_negative(tr, &tr.t(keys::FIELD_HUMIDITY), inputs.relative_humidity_pct)?;

    let settings = cfg.preset.settings();
    let prediction = corrosion::predict(model, &session.inputs, &settings)?;
    print_prediction(tr, &prediction, settings.decimals);
    Ok(())
}

/// 예측 결과를 출력한다.
pub fn print_prediction(tr: &Translator, prediction: &Prediction, decimals: usize) {
    let f = &prediction.features;
    println!(
        "{}: chloride_diffusion_rate={:.4}, mass_of_corroded_substance={:.6}",
        tr.t(keys::RESULT_FEATURES),
        f.chloride_diffusion_rate,
        f.mass_of_corroded_substance
    );
    println!(
        "{} : {:.*}",
        tr.t(keys::RESULT_CORROSION_RATE),
        decimals + 1,
        prediction.corrosion_rate
    );
    let [(_, degree), (_, reduction)] = prediction.formatted(decimals);
    println!("{} : {degree}", tr.t(keys::RESULT_DEGREE));
    println!("{} : {reduction}", tr.t(keys::RESULT_REDUCTION));
}

/// 설정 메뉴를 처리한다.
pub fn handle_settings(tr: &Translator, cfg: &mut Config) -> Result<(), AppError> {
    println!("{}", tr.t(keys::SETTINGS_HEADING));
    println!(
        "{} {} / {} / {}",
        tr.t(keys::SETTINGS_CURRENT_PRESET),
        cfg.preset.label(),
        cfg.temperature_unit.symbol(),
        cfg.diameter_unit.symbol()
    );
    println!("{}", tr.t(keys::SETTINGS_PRESET_OPTIONS));
    println!("{}", tr.t(keys::SETTINGS_UNIT_OPTIONS));
    let sel = read_line(&tr.t(keys::SETTINGS_PROMPT_CHANGE))?;
    if sel.trim().is_empty() {
        return Ok(());
    }
    if !apply_settings_choice(cfg, sel.trim()) {
        println!("{}", tr.t(keys::SETTINGS_INVALID));
        return Ok(());
    }
    println!(
        "{} {} / {} / {}",
        tr.t(keys::SETTINGS_SAVED),
        cfg.preset.label(),
        cfg.temperature_unit.symbol(),
        cfg.diameter_unit.symbol()
    );
    Ok(())
}

/// 설정 메뉴 번호를 설정값에 반영한다. 알 수 없는 번호면 false.
fn apply_settings_choice(cfg: &mut Config, sel: &str) -> bool {
    match sel {
        "1" => cfg.preset = FormulaPreset::Classic,
        "2" => cfg.preset = FormulaPreset::Electrochemical,
        "3" => cfg.preset = FormulaPreset::TimeAveraged,
        "4" => cfg.temperature_unit = TemperatureUnit::Kelvin,
        "5" => cfg.temperature_unit = TemperatureUnit::Celsius,
        "6" => cfg.temperature_unit = TemperatureUnit::Fahrenheit,
        "7" => cfg.temperature_unit = TemperatureUnit::Rankine,
        "8" => cfg.diameter_unit = DiameterUnit::Millimeter,
        "9" => cfg.diameter_unit = DiameterUnit::Centimeter,
        "10" => cfg.diameter_unit = DiameterUnit::Inch,
        _ => return false,
    }
    true
}

fn read_line(prompt: &str) -> Result<String, AppError> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut buf = String::new();
    io::stdin().read_line(&mut buf)?;
    Ok(buf)
}

/// 0 이상의 숫자를 읽는다. 빈 입력이면 현재 값을 유지한다.
fn read_non_negative(tr: &Translator, label: &str, current: f64) -> Result<f64, AppError> {
    read_at_least(tr, label, current, 0.0)
}

/// `min` 이상의 숫자를 읽는다. 빈 입력이면 현재 값을 유지한다.
fn read_at_least(tr: &Translator, label: &str, current: f64, min: f64) -> Result<f64, AppError> {
    loop {
        let s = read_line(&format!(
            "{label} ({} {current:.2}): ",
            tr.t(keys::PROMPT_KEEP_DEFAULT)
        ))?;
        let s = s.trim();
        if s.is_empty() {
            return Ok(current);
        }
        match parse_field(s, min) {
            Ok(v) => return Ok(v),
            Err(FieldError::NotNumber) => println!("{}", tr.t(keys::ERROR_INVALID_NUMBER)),
            Err(FieldError::BelowMinimum) if min == 0.0 => {
                println!("{}", tr.t(keys::ERROR_NEGATIVE))
            }
            Err(FieldError::BelowMinimum) => {
                println!("{} {min:.2}", tr.t(keys::ERROR_BELOW_MINIMUM))
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum FieldError {
    NotNumber,
    BelowMinimum,
}

/// 숫자 필드 하나를 해석한다. 폼과 같이 하한 `min`을 강제한다.
fn parse_field(s: &str, min: f64) -> Result<f64, FieldError> {
    let v: f64 = s.parse().map_err(|_| FieldError::NotNumber)?;
    if !v.is_finite() {
        return Err(FieldError::NotNumber);
    }
    if v < min {
        return Err(FieldError::BelowMinimum);
    }
    Ok(v)
}
