use std::collections::HashMap;
use std::fs;
use std::path::Path;
use sys_locale::get_locale;

/// 문자열 키를 모아두는 네임스페이스.
pub mod keys {
    pub const ERROR_PREFIX: &str = "general.error_prefix";
    pub const APP_EXIT: &str = "general.app_exit";
    pub const APP_TITLE: &str = "general.title";
    pub const APP_HEADER: &str = "general.header";

    pub const MAIN_MENU_PREDICT: &str = "main_menu.predict";
    pub const MAIN_MENU_SETTINGS: &str = "main_menu.settings";
    pub const MAIN_MENU_EXIT: &str = "main_menu.exit";
    pub const PROMPT_MENU_SELECT: &str = "prompt.menu_select";
    pub const INVALID_SELECTION_RETRY: &str = "error.invalid_selection_retry";
    pub const ERROR_INVALID_NUMBER: &str = "error.invalid_number";
    pub const ERROR_NEGATIVE: &str = "error.negative";
    pub const ERROR_BELOW_MINIMUM: &str = "error.below_minimum";

    pub const CONDITION_LABEL: &str = "condition.label";
    pub const CONDITION_OPTIONS: &str = "condition.options";
    pub const CONDITION_MILD: &str = "condition.mild";
    pub const CONDITION_MODERATE: &str = "condition.moderate";
    pub const CONDITION_SEVERE: &str = "condition.severe";

    pub const FIELD_STEEL_DIAMETER: &str = "field.steel_diameter";
    pub const FIELD_DURATION: &str = "field.duration";
    pub const FIELD_WC_RATIO: &str = "field.wc_ratio";
    pub const FIELD_CHLORIDE: &str = "field.chloride_content";
    pub const FIELD_TEMPERATURE: &str = "field.temperature";
    pub const FIELD_HUMIDITY: &str = "field.relative_humidity";
    pub const PROMPT_KEEP_DEFAULT: &str = "prompt.keep_default";

    pub const SUBMIT: &str = "form.submit";
    pub const RESULT_CORROSION_RATE: &str = "result.corrosion_rate";
    pub const RESULT_DEGREE: &str = "result.degree_of_corrosion";
    pub const RESULT_REDUCTION: &str = "result.strength_reduction";
    pub const RESULT_FEATURES: &str = "result.features";

    pub const MODEL_LOADED: &str = "model.loaded";
    pub const MODEL_MISSING: &str = "model.missing";
    pub const MODEL_CHOOSE: &str = "model.choose";

    pub const SETTINGS_HEADING: &str = "settings.heading";
    pub const SETTINGS_OPEN: &str = "settings.open";
    pub const SETTINGS_CURRENT_PRESET: &str = "settings.current_preset";
    pub const SETTINGS_PRESET_OPTIONS: &str = "settings.preset_options";
    pub const SETTINGS_UNIT_OPTIONS: &str = "settings.unit_options";
    pub const SETTINGS_PROMPT_CHANGE: &str = "settings.prompt_change";
    pub const SETTINGS_INVALID: &str = "settings.invalid";
    pub const SETTINGS_SAVED: &str = "settings.saved";
    pub const SETTINGS_LANGUAGE: &str = "settings.language";
    pub const SETTINGS_SAVE: &str = "settings.save";

    pub const FORMULA_HEADING: &str = "formula.heading";
    pub const FORMULA_DIFFUSION: &str = "formula.diffusion";
    pub const FORMULA_MASS: &str = "formula.mass";
    pub const FORMULA_DEGREE: &str = "formula.degree";
    pub const FORMULA_NOTE_WC: &str = "formula.note_wc";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Ko,
    En,
}

impl Language {
    fn from_code(code: &str) -> Self {
        let c = code.to_lowercase();
        if c.starts_with("ko") {
            Language::Ko
        } else {
            Language::En
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Language::Ko => "ko",
            Language::En => "en",
        }
    }
}

/// 런타임 언어 번들을 제공한다.
#[derive(Debug, Clone)]
pub struct Translator {
    lang: Language,
    overrides: Option<HashMap<String, String>>,
}

impl Translator {
    /// 언어 코드(ko/en)에 따라 번역기를 생성한다. 알 수 없는 코드는 en으로 폴백한다.
    pub fn new(lang_code: &str) -> Self {
        Self {
            lang: Language::from_code(lang_code),
            overrides: None,
        }
    }

    /// 언어 코드 + 언어팩 디렉터리(locales/ 등)를 받아서 번역기를 생성한다.
    /// 디렉터리가 없거나 파일이 없으면 내장 문자열만 사용한다.
    pub fn new_with_pack(lang_code: &str, pack_dir: Option<&str>) -> Self {
        let overrides = pack_dir
            .and_then(|dir| load_overrides(dir, lang_code))
            .or_else(|| load_overrides("locales", lang_code));
        Self {
            lang: Language::from_code(lang_code),
            overrides,
        }
    }

    pub fn language(&self) -> Language {
        self.lang
    }

    pub fn language_code(&self) -> &'static str {
        self.lang.as_code()
    }

    /// 번역을 가져온다. 언어팩 → 선택 언어 → 영어 순으로 찾고, 없으면 키를 그대로 돌려준다.
    pub fn t(&self, key: &str) -> String {
        if let Some(v) = self.overrides.as_ref().and_then(|m| m.get(key)) {
            return v.clone();
        }
        let built_in = match self.lang {
            Language::Ko => ko(key).or_else(|| en(key)),
            Language::En => en(key),
        };
        built_in.map(str::to_string).unwrap_or_else(|| key.to_string())
    }
}

/// CLI 플래그/설정/시스템 순으로 언어 코드를 결정한다.
pub fn resolve_language(cli_arg: &str, config_lang: Option<&str>) -> String {
    normalize_lang(cli_arg)
        .or_else(|| config_lang.and_then(normalize_lang))
        .or_else(detect_system_language)
        .unwrap_or_else(|| "en".to_string())
}

fn normalize_lang(code: &str) -> Option<String> {
    let c = code.trim().to_lowercase();
    match c.as_str() {
        "auto" | "" => None,
        other if other.starts_with("ko") => Some("ko".into()),
        other if other.starts_with("en") => Some("en".into()),
        _ => None,
    }
}

fn normalize_locale_string(loc: &str) -> Option<String> {
    let lang = loc
        .split(['.', '_', '-'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    match lang.as_str() {
        "ko" => Some("ko".into()),
        "en" => Some("en".into()),
        _ => None,
    }
}

/// 시스템 로케일에서 언어를 추정한다.
pub fn detect_system_language() -> Option<String> {
    if let Some(lang) = get_locale().as_deref().and_then(normalize_locale_string) {
        return Some(lang);
    }
    ["LANG", "LC_ALL"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find_map(|v| normalize_locale_string(&v))
}

/// TOML 기반 언어팩을 로드한다. 형식: 섹션/키 조합이 번역 키가 되는 맵.
fn load_overrides(dir: &str, lang: &str) -> Option<HashMap<String, String>> {
    let path = Path::new(dir).join(format!("{lang}.toml"));
    let content = fs::read_to_string(path).ok()?;
    parse_toml_to_map(&content)
}

fn parse_toml_to_map(src: &str) -> Option<HashMap<String, String>> {
    let value: toml::Value = toml::from_str(src).ok()?;
    let table = value.as_table()?;
    let mut map = HashMap::new();

    fn walk(prefix: &str, val: &toml::Value, out: &mut HashMap<String, String>) {
        match val {
            toml::Value::String(s) => {
                out.insert(prefix.to_string(), s.to_string());
            }
            toml::Value::Table(t) => {
                for (k, v) in t {
                    let key = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{prefix}.{k}")
                    };
                    walk(&key, v, out);
                }
            }
            _ => {}
        }
    }

    for (k, v) in table {
        walk(k, v, &mut map);
    }

    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

fn ko(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        ERROR_PREFIX => "오류",
        APP_EXIT => "프로그램을 종료합니다.",
        APP_TITLE => "잔존강도",
        APP_HEADER => "다음 값을 입력하세요:",
        MAIN_MENU_PREDICT => "1) 부식도/잔존강도 예측",
        MAIN_MENU_SETTINGS => "2) 설정",
        MAIN_MENU_EXIT => "0) 종료",
        PROMPT_MENU_SELECT => "메뉴 선택: ",
        INVALID_SELECTION_RETRY => "잘못된 입력입니다. 다시 선택하세요.",
        ERROR_INVALID_NUMBER => "숫자를 입력하세요.",
        ERROR_NEGATIVE => "0 이상의 값을 입력하세요.",
        ERROR_BELOW_MINIMUM => "허용 최솟값 이상을 입력하세요:",
        CONDITION_LABEL => "노출 조건 선택",
        CONDITION_OPTIONS => "1) mild  2) moderate  3) severe",
        CONDITION_MILD => "mild (경미)",
        CONDITION_MODERATE => "moderate (보통)",
        CONDITION_SEVERE => "severe (심각)",
        FIELD_STEEL_DIAMETER => "철근 직경",
        FIELD_DURATION => "노출 기간 (년)",
        FIELD_WC_RATIO => "물/시멘트 비",
        FIELD_CHLORIDE => "염화물 함량 (%)",
        FIELD_TEMPERATURE => "온도",
        FIELD_HUMIDITY => "상대습도 (%)",
        PROMPT_KEEP_DEFAULT => "엔터=기본값",
        SUBMIT => "계산",
        RESULT_CORROSION_RATE => "부식속도",
        RESULT_DEGREE => "부식도",
        RESULT_REDUCTION => "강도 감소율(%)",
        RESULT_FEATURES => "유도 특성",
        MODEL_LOADED => "모델 로드됨",
        MODEL_MISSING => "모델을 불러오지 못했습니다. 모델 파일을 지정하기 전에는 계산할 수 없습니다.",
        MODEL_CHOOSE => "모델 파일 선택...",
        SETTINGS_HEADING => "\n-- 설정 --",
        SETTINGS_OPEN => "설정",
        SETTINGS_CURRENT_PRESET => "현재 식 조합:",
        SETTINGS_PRESET_OPTIONS => "1) classic  2) electrochemical  3) time-averaged",
        SETTINGS_UNIT_OPTIONS => "온도 단위: 4) K  5) °C  6) °F  7) R / 직경 단위: 8) mm  9) cm  10) in",
        SETTINGS_PROMPT_CHANGE => "변경할 번호(취소하려면 엔터): ",
        SETTINGS_INVALID => "잘못된 입력이므로 변경하지 않습니다.",
        SETTINGS_SAVED => "설정이 변경되었습니다:",
        SETTINGS_LANGUAGE => "언어",
        SETTINGS_SAVE => "설정 저장",
        FORMULA_HEADING => "식 참고",
        FORMULA_DIFFUSION => "염화물 확산율 = 염화물 함량 / 기간",
        FORMULA_MASS => "부식 생성물 질량 = exp(-d)/(1+(w+w)) 또는 d·365·86400·exp(-d)/((1+w+w)·2·96485)",
        FORMULA_DEGREE => "부식도 = k·부식속도·기간/직경 (k=0.046 또는 4.6), 강도 감소율 = 0.5·부식도",
        FORMULA_NOTE_WC => "주의: w+w 항은 기존 모델과의 호환을 위해 원식(w/1 + w)을 그대로 사용합니다.",
        _ => return None,
    })
}

fn en(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        ERROR_PREFIX => "Error",
        APP_EXIT => "Exiting.",
        APP_TITLE => "Residual Strength",
        APP_HEADER => "Enter the following parameters:",
        MAIN_MENU_PREDICT => "1) Predict corrosion / residual strength",
        MAIN_MENU_SETTINGS => "2) Settings",
        MAIN_MENU_EXIT => "0) Exit",
        PROMPT_MENU_SELECT => "Select menu: ",
        INVALID_SELECTION_RETRY => "Invalid input. Please try again.",
        ERROR_INVALID_NUMBER => "Please enter a number.",
        ERROR_NEGATIVE => "Please enter a value of 0 or more.",
        ERROR_BELOW_MINIMUM => "Please enter at least the allowed minimum:",
        CONDITION_LABEL => "Choose the condition",
        CONDITION_OPTIONS => "1) mild  2) moderate  3) severe",
        CONDITION_MILD => "mild",
        CONDITION_MODERATE => "moderate",
        CONDITION_SEVERE => "severe",
        FIELD_STEEL_DIAMETER => "Steel diameter",
        FIELD_DURATION => "Duration (years)",
        FIELD_WC_RATIO => "w/c ratio",
        FIELD_CHLORIDE => "Chloride content (%)",
        FIELD_TEMPERATURE => "Temperature",
        FIELD_HUMIDITY => "Relative humidity (%)",
        PROMPT_KEEP_DEFAULT => "enter=default",
        SUBMIT => "Submit",
        RESULT_CORROSION_RATE => "Corrosion rate",
        RESULT_DEGREE => "Degree of corrosion",
        RESULT_REDUCTION => "Percentage reduction in strength",
        RESULT_FEATURES => "Derived features",
        MODEL_LOADED => "Model loaded",
        MODEL_MISSING => "The model could not be loaded. Predictions are disabled until a model file is chosen.",
        MODEL_CHOOSE => "Choose model file...",
        SETTINGS_HEADING => "\n-- Settings --",
        SETTINGS_OPEN => "Settings",
        SETTINGS_CURRENT_PRESET => "Current formula preset:",
        SETTINGS_PRESET_OPTIONS => "1) classic  2) electrochemical  3) time-averaged",
        SETTINGS_UNIT_OPTIONS => "Temperature unit: 4) K  5) °C  6) °F  7) R / Diameter unit: 8) mm  9) cm  10) in",
        SETTINGS_PROMPT_CHANGE => "Enter number to change (enter to cancel): ",
        SETTINGS_INVALID => "Invalid input; settings unchanged.",
        SETTINGS_SAVED => "Settings changed:",
        SETTINGS_LANGUAGE => "Language",
        SETTINGS_SAVE => "Save settings",
        FORMULA_HEADING => "Formula reference",
        FORMULA_DIFFUSION => "Chloride diffusion rate = chloride content / duration",
        FORMULA_MASS => "Mass of corroded substance = exp(-d)/(1+(w+w)) or d·365·86400·exp(-d)/((1+w+w)·2·96485)",
        FORMULA_DEGREE => "Degree of corrosion = k·rate·duration/diameter (k=0.046 or 4.6); strength reduction = 0.5·degree",
        FORMULA_NOTE_WC => "Note: the w+w term keeps the original w/1 + w expression the model was trained with.",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn korean_falls_back_to_english_then_key() {
        let tr = Translator::new("ko-kr");
        assert_eq!(tr.t(keys::APP_TITLE), "잔존강도");
        assert_eq!(tr.t("no.such.key"), "no.such.key");
    }

    #[test]
    fn explicit_language_wins_over_config() {
        assert_eq!(resolve_language("ko", Some("en")), "ko");
        assert_eq!(resolve_language("auto", Some("en-us")), "en");
    }

    #[test]
    fn pack_overrides_builtin() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("en.toml"), "[general]\ntitle = \"Rebar Check\"\n").unwrap();
        let tr = Translator::new_with_pack("en", dir.path().to_str());
        assert_eq!(tr.t(keys::APP_TITLE), "Rebar Check");
        assert_eq!(tr.t(keys::SUBMIT), "Submit");
    }
}
