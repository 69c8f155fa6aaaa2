#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! eframe/egui 기반 데스크톱 GUI 진입점.

use eframe::{egui, App, Frame};
use image::GenericImageView;
use rfd::FileDialog;
use std::sync::Arc;
use std::{env, fs, path::Path, path::PathBuf};
use corrosion_toolbox::{
    config,
    corrosion::{self, Condition, CorrosionRateModel, FormulaPreset, ModelArtifact, Prediction, Session},
    i18n::{self, keys},
    logging,
    units::{self, DiameterUnit, TemperatureUnit},
};

fn main() -> Result<(), eframe::Error> {
    logging::init();
    // CLI 언어 옵션 처리: --lang xx 또는 --lang=xx (xx: auto/en/ko)
    let mut cli_lang: Option<String> = None;
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        let a = &args[i];
        if let Some(val) = a.strip_prefix("--lang=") {
            cli_lang = Some(val.to_string());
        } else if (a == "--lang" || a == "-L") && i + 1 < args.len() {
            cli_lang = Some(args[i + 1].clone());
            i += 1;
        }
        i += 1;
    }

    let mut viewport = egui::ViewportBuilder::default().with_inner_size(egui::vec2(560.0, 640.0));
    if let Some(icon) = load_app_icon() {
        viewport = viewport.with_icon(icon);
    }
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    let mut app_cfg = match config::load_or_default() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!(error = %e, "config load failed, using defaults");
            config::Config::default()
        }
    };
    if let Some(lang_cli) = cli_lang {
        app_cfg.language = i18n::resolve_language(&lang_cli, Some(app_cfg.language.as_str()));
    }
    eframe::run_native(
        "Corrosion Residual Strength",
        options,
        Box::new(move |cc| {
            if let Err(e) = setup_fonts(&cc.egui_ctx) {
                tracing::warn!("font: {e}");
            }
            Box::new(GuiApp::new(app_cfg.clone()))
        }),
    )
}

fn load_app_icon() -> Option<egui::IconData> {
    let search = ["icon.png", "assets/icon.png", "../assets/icon.png"];
    let path = search.iter().find(|p| Path::new(*p).exists())?;
    let bytes = fs::read(path).ok()?;
    let img = image::load_from_memory(&bytes).ok()?;
    let rgba = img.to_rgba8();
    let (w, h) = img.dimensions();
    Some(egui::IconData {
        rgba: rgba.into_raw(),
        width: w,
        height: h,
    })
}

fn apply_font_bytes(ctx: &egui::Context, bytes: Vec<u8>, name: &str) {
    let mut fonts = egui::FontDefinitions::default();
    let font_name = name.to_string();
    fonts
        .font_data
        .insert(font_name.clone(), egui::FontData::from_owned(bytes));
    fonts
        .families
        .entry(egui::FontFamily::Proportional)
        .or_default()
        .insert(0, font_name);
    ctx.set_fonts(fonts);
}

/// 한글을 표시하기 위해 프로젝트 또는 시스템 폰트를 우선 적용한다.
fn setup_fonts(ctx: &egui::Context) -> Result<(), String> {
    let mut candidates = vec![PathBuf::from("assets/fonts/malgun.ttf")];
    if let Some(windir) = env::var_os("WINDIR") {
        let fonts = Path::new(&windir).join("Fonts");
        candidates.extend(["malgun.ttf", "gulim.ttc"].iter().map(|f| fonts.join(f)));
    }
    candidates.push(PathBuf::from("/usr/share/fonts/truetype/nanum/NanumGothic.ttf"));
    candidates.push(PathBuf::from("/System/Library/Fonts/AppleSDGothicNeo.ttc"));
    for p in candidates.iter().filter(|p| p.exists()) {
        let bytes = fs::read(p).map_err(|e| format!("Failed to read font ({}): {e}", p.display()))?;
        apply_font_bytes(ctx, bytes, "korean_font");
        return Ok(());
    }
    Err("Korean font not found; keeping default fonts.".into())
}

/// 모델 파일을 불러와 공유 핸들로 만든다.
fn load_model(path: &Path) -> Result<Arc<dyn CorrosionRateModel>, String> {
    ModelArtifact::load(path)
        .map(|m| Arc::new(m) as Arc<dyn CorrosionRateModel>)
        .map_err(|e| e.to_string())
}

struct GuiApp {
    config: config::Config,
    tr: i18n::Translator,
    lang_input: String,
    save_status: Option<String>,
    window_alpha: f32,
    show_formula_modal: bool,
    show_settings_modal: bool,
    model: Option<Arc<dyn CorrosionRateModel>>,
    model_status: String,
    // 폼
    session: Session,
    /// 설정 단위로 표시하는 철근 직경
    diameter_display: f64,
    /// 설정 단위로 표시하는 온도
    temperature_display: f64,
    result: Option<Result<Prediction, String>>,
}

impl GuiApp {
    fn new(config: config::Config) -> Self {
        let lang_code = i18n::resolve_language("auto", Some(config.language.as_str()));
        let tr = i18n::Translator::new_with_pack(&lang_code, config.language_pack_dir.as_deref());
        let (model, model_status) = match load_model(&config.model_path) {
            Ok(m) => (Some(m), config.model_path.display().to_string()),
            Err(e) => {
                tracing::error!(error = %e, "model load failed");
                (None, e)
            }
        };
        let session = Session::new(config.default_condition);
        let mut s = Self {
            lang_input: config.language.clone(),
            window_alpha: config.window_alpha.clamp(0.3, 1.0),
            config,
            tr,
            save_status: None,
            show_formula_modal: false,
            show_settings_modal: false,
            model,
            model_status,
            session,
            diameter_display: 0.0,
            temperature_display: 0.0,
            result: None,
        };
        s.refresh_display_units();
        s
    }

    /// 세션 값(mm, K)을 설정 단위 표시값으로 다시 채운다.
    fn refresh_display_units(&mut self) {
        self.diameter_display =
            units::from_millimeter(self.session.inputs.steel_diameter_mm, self.config.diameter_unit);
        self.temperature_display =
            units::from_kelvin(self.session.inputs.temperature_k, self.config.temperature_unit);
    }

    fn select_condition(&mut self, condition: Condition) {
        self.session.select_condition(condition);
        self.temperature_display =
            units::from_kelvin(self.session.inputs.temperature_k, self.config.temperature_unit);
        self.config.default_condition = condition;
    }

    fn submit(&mut self) {
        self.session.inputs.steel_diameter_mm =
            units::to_millimeter(self.diameter_display, self.config.diameter_unit);
        self.session.inputs.temperature_k =
            units::to_kelvin(self.temperature_display, self.config.temperature_unit);
        let Some(model) = self.model.clone() else {
            self.result = Some(Err(self.tr.t(keys::MODEL_MISSING)));
            return;
        };
        let settings = self.config.preset.settings();
        self.result = Some(
            corrosion::predict(model.as_ref(), &self.session.inputs, &settings)
                .map_err(|e| e.to_string()),
        );
    }

    fn choose_model(&mut self) {
        let Some(path) = FileDialog::new().add_filter("model", &["toml"]).pick_file() else {
            return;
        };
        match load_model(&path) {
            Ok(m) => {
                self.model = Some(m);
                self.model_status = path.display().to_string();
                self.config.model_path = path;
                self.result = None;
            }
            Err(e) => {
                self.model = None;
                self.model_status = e;
            }
        }
    }

    fn condition_label(&self, c: Condition) -> String {
        let key = match c {
            Condition::Mild => keys::CONDITION_MILD,
            Condition::Moderate => keys::CONDITION_MODERATE,
            Condition::Severe => keys::CONDITION_SEVERE,
        };
        self.tr.t(key)
    }

    fn ui_form(&mut self, ui: &mut egui::Ui) {
        let tr = self.tr.clone();
        ui.heading(tr.t(keys::APP_TITLE));
        ui.label(tr.t(keys::APP_HEADER));
        ui.add_space(8.0);

        let mut condition = self.session.condition;
        egui::ComboBox::from_label(tr.t(keys::CONDITION_LABEL))
            .selected_text(self.condition_label(condition))
            .show_ui(ui, |ui| {
                for c in Condition::ALL {
                    ui.selectable_value(&mut condition, c, self.condition_label(c));
                }
            });
        if condition != self.session.condition {
            self.select_condition(condition);
        }
        ui.separator();

        let d_unit = self.config.diameter_unit.symbol();
        let t_unit = self.config.temperature_unit.symbol();
        // 온도 하한은 0 K를 표시 단위로 환산한 값
        let t_min = units::from_kelvin(0.0, self.config.temperature_unit);
        egui::Grid::new("specimen_form")
            .num_columns(2)
            .spacing([12.0, 6.0])
            .show(ui, |ui| {
                let inputs = &mut self.session.inputs;
                let rows: [(String, &mut f64, f64); 6] = [
                    (format!("{} ({d_unit})", tr.t(keys::FIELD_STEEL_DIAMETER)), &mut self.diameter_display, 0.0),
                    (tr.t(keys::FIELD_DURATION), &mut inputs.duration_years, 0.0),
                    (tr.t(keys::FIELD_WC_RATIO), &mut inputs.wc_ratio, 0.0),
                    (tr.t(keys::FIELD_CHLORIDE), &mut inputs.chloride_content_pct, 0.0),
                    (format!("{} ({t_unit})", tr.t(keys::FIELD_TEMPERATURE)), &mut self.temperature_display, t_min),
                    (tr.t(keys::FIELD_HUMIDITY), &mut inputs.relative_humidity_pct, 0.0),
                ];
                for (label, value, min) in rows {
                    ui.label(label);
                    ui.add(
                        egui::DragValue::new(value)
                            .clamp_range(min..=f64::MAX)
                            .speed(0.01)
                            .fixed_decimals(2),
                    );
                    ui.end_row();
                }
            });
        ui.add_space(8.0);

        let can_submit = self.model.is_some();
        if ui
            .add_enabled(can_submit, egui::Button::new(tr.t(keys::SUBMIT)))
            .clicked()
        {
            self.submit();
        }
        ui.separator();

        let decimals = self.config.preset.settings().decimals;
        match &self.result {
            Some(Ok(p)) => {
                ui.label(format!(
                    "{} : {:.*}",
                    tr.t(keys::RESULT_CORROSION_RATE),
                    decimals + 1,
                    p.corrosion_rate
                ));
                ui.strong(format!(
                    "{} : {:.*}",
                    tr.t(keys::RESULT_DEGREE),
                    decimals,
                    p.degree_of_corrosion_pct
                ));
                ui.strong(format!(
                    "{} : {:.*}",
                    tr.t(keys::RESULT_REDUCTION),
                    decimals,
                    p.residual_strength_reduction_pct
                ));
            }
            Some(Err(msg)) => {
                ui.colored_label(
                    ui.visuals().error_fg_color,
                    format!("{}: {msg}", tr.t(keys::ERROR_PREFIX)),
                );
            }
            None => {}
        }
    }

    fn ui_settings(&mut self, ctx: &egui::Context) {
        let tr = self.tr.clone();
        let mut open = self.show_settings_modal;
        let mut new_preset = self.config.preset;
        let mut new_t_unit = self.config.temperature_unit;
        let mut new_d_unit = self.config.diameter_unit;
        egui::Window::new(tr.t(keys::SETTINGS_OPEN))
            .collapsible(false)
            .resizable(true)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label(tr.t(keys::SETTINGS_CURRENT_PRESET));
                ui.horizontal(|ui| {
                    for p in FormulaPreset::ALL {
                        ui.selectable_value(&mut new_preset, p, p.label());
                    }
                });
                ui.separator();
                ui.horizontal(|ui| {
                    for u in TemperatureUnit::ALL {
                        ui.selectable_value(&mut new_t_unit, u, u.symbol());
                    }
                });
                ui.horizontal(|ui| {
                    for u in DiameterUnit::ALL {
                        ui.selectable_value(&mut new_d_unit, u, u.symbol());
                    }
                });
                ui.separator();
                ui.label(tr.t(keys::SETTINGS_LANGUAGE));
                egui::ComboBox::from_id_source("lang_choice")
                    .selected_text(&self.lang_input)
                    .show_ui(ui, |ui| {
                        ui.selectable_value(&mut self.lang_input, "auto".into(), "System");
                        ui.selectable_value(&mut self.lang_input, "en".into(), "English");
                        ui.selectable_value(&mut self.lang_input, "ko".into(), "한국어");
                    });
                ui.add(egui::Slider::new(&mut self.window_alpha, 0.3..=1.0).text("alpha"));
                if ui.button(tr.t(keys::SETTINGS_SAVE)).clicked() {
                    self.config.language = self.lang_input.clone();
                    self.config.window_alpha = self.window_alpha;
                    let resolved = i18n::resolve_language(&self.config.language, None);
                    self.tr = i18n::Translator::new_with_pack(
                        &resolved,
                        self.config.language_pack_dir.as_deref(),
                    );
                    self.save_status = Some(match self.config.save() {
                        Ok(()) => tr.t(keys::SETTINGS_SAVED),
                        Err(e) => format!("{}: {e}", tr.t(keys::ERROR_PREFIX)),
                    });
                }
                if let Some(msg) = &self.save_status {
                    ui.label(msg);
                }
            });
        self.show_settings_modal = open;
        self.apply_settings(new_preset, new_t_unit, new_d_unit);
    }

    /// 단위가 바뀌면 현재 표시값을 새 단위로 환산한다.
    fn apply_settings(&mut self, preset: FormulaPreset, t_unit: TemperatureUnit, d_unit: DiameterUnit) {
        if preset != self.config.preset {
            self.config.preset = preset;
            self.result = None;
        }
        if t_unit != self.config.temperature_unit || d_unit != self.config.diameter_unit {
            self.session.inputs.steel_diameter_mm =
                units::to_millimeter(self.diameter_display, self.config.diameter_unit);
            self.session.inputs.temperature_k =
                units::to_kelvin(self.temperature_display, self.config.temperature_unit);
            self.config.temperature_unit = t_unit;
            self.config.diameter_unit = d_unit;
            self.refresh_display_units();
        }
    }
}

impl App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        let mut style = (*ctx.style()).clone();
        style.visuals.window_fill = style.visuals.window_fill.linear_multiply(self.window_alpha);
        style.visuals.panel_fill = style.visuals.panel_fill.linear_multiply(self.window_alpha);
        ctx.set_style(style);

        let tr = self.tr.clone();

        // 상단 바
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button(tr.t(keys::MODEL_CHOOSE)).clicked() {
                    self.choose_model();
                }
                if ui.button(tr.t(keys::FORMULA_HEADING)).clicked() {
                    self.show_formula_modal = true;
                }
                if ui.button(tr.t(keys::SETTINGS_OPEN)).clicked() {
                    self.show_settings_modal = true;
                }
            });
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            if self.model.is_some() {
                ui.label(format!("{}: {}", tr.t(keys::MODEL_LOADED), self.model_status));
            } else {
                ui.colored_label(ui.visuals().error_fg_color, tr.t(keys::MODEL_MISSING));
                ui.small(&self.model_status);
            }
        });

        if self.show_settings_modal {
            self.ui_settings(ctx);
        }

        if self.show_formula_modal {
            egui::Window::new(tr.t(keys::FORMULA_HEADING))
                .collapsible(true)
                .resizable(true)
                .open(&mut self.show_formula_modal)
                .show(ctx, |ui| {
                    ui.label(tr.t(keys::FORMULA_DIFFUSION));
                    ui.label(tr.t(keys::FORMULA_MASS));
                    ui.label(tr.t(keys::FORMULA_DEGREE));
                    ui.separator();
                    ui.small(tr.t(keys::FORMULA_NOTE_WC));
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| self.ui_form(ui));
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Err(e) = self.config.save() {
            tracing::warn!(error = %e, "config save on exit failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_without_model() -> GuiApp {
        let cfg = config::Config {
            model_path: PathBuf::from("does/not/exist.toml"),
            ..config::Config::default()
        };
        GuiApp::new(cfg)
    }

    #[test]
    fn condition_change_keeps_specimen_fields() {
        let mut app = app_without_model();
        app.diameter_display = 12.0;
        app.session.inputs.duration_years = 3.0;
        app.session.inputs.wc_ratio = 0.45;
        app.select_condition(Condition::Severe);
        assert_eq!(app.diameter_display, 12.0);
        assert_eq!(app.session.inputs.duration_years, 3.0);
        assert_eq!(app.session.inputs.wc_ratio, 0.45);
        assert_eq!(app.session.inputs.chloride_content_pct, 0.5);
        assert_eq!(app.temperature_display, 320.0);
    }

    #[test]
    fn submit_without_model_shows_error() {
        let mut app = app_without_model();
        assert!(app.model.is_none());
        app.submit();
        assert!(matches!(app.result, Some(Err(_))));
    }

    #[test]
    fn unit_switch_converts_display_values() {
        let mut app = app_without_model();
        app.diameter_display = 25.4;
        app.apply_settings(FormulaPreset::Classic, TemperatureUnit::Celsius, DiameterUnit::Inch);
        assert!((app.diameter_display - 1.0).abs() < 1e-12);
        assert!((app.temperature_display - 26.85).abs() < 1e-9);
    }

    #[test]
    fn sub_zero_celsius_reaches_session_in_kelvin() {
        let mut app = app_without_model();
        app.apply_settings(FormulaPreset::Classic, TemperatureUnit::Celsius, DiameterUnit::Millimeter);
        app.temperature_display = -10.0;
        app.submit();
        assert!((app.session.inputs.temperature_k - 263.15).abs() < 1e-9);
        assert!(app.session.inputs.temperature_k >= 0.0);
    }
}
