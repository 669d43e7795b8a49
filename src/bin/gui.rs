#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! eframe/egui 기반 데스크톱 GUI 진입점.

use clap::Parser;
use eframe::{egui, App, Frame};
use istat_simulator::{
    bloodgas::{InputField, PanelType, ReadoutName},
    cli::Args,
    config,
    export::{self, CaptureRect, ExportFormat, ExportJob, JobStep},
    i18n::{self, keys},
    view_state::ViewState,
};
use rfd::FileDialog;
use std::{path::Path, sync::Arc, time::Instant};

/// 판독 패널 폭(point)
const PANEL_WIDTH: f32 = 420.0;
const PANEL_INK: egui::Color32 = egui::Color32::from_rgb(31, 41, 55);
const PANEL_BORDER: egui::Color32 = egui::Color32::from_rgb(209, 213, 219);
const GENERATE_FILL: egui::Color32 = egui::Color32::from_rgb(37, 99, 235);

/// 공식 참고 창에 표시하는 식.
const FORMULA_LINES: [&str; 16] = [
    "EBV = weight × 70 ml/kg",
    "f = min(bloodLoss / EBV, 1)",
    "lung = 1 − lungFunction / 100",
    "pH = 7.4 − 0.1·f",
    "pCO2 = 5.3 + 0.5·lung  kPa",
    "pO2 = 12 − 4·lung  kPa",
    "Na = 138,  Glukos = 6.2  mmol/L",
    "K = 4 + 0.3·f  mmol/L",
    "iCa = 1.15 − 0.05·f  mmol/L",
    "Laktat = 1 + 5·f  mmol/L",
    "Hct = 40 − 15·f + 5·(transfusedBlood/500)  %",
    "Hb = (13.5 − 5·f + 2·(transfusedBlood/500))·10  g/L",
    "BE = −7·f  mmol/L",
    "HCO3 = 24 − 6·f  mmol/L",
    "SO2 = 98 − 10·lung  %",
    "timeSinceInjury / transfusedPlasma: not used",
];

fn main() -> Result<(), eframe::Error> {
    let args = Args::parse();
    args.init_logging();

    let app_cfg = config::load_or_default().unwrap_or_else(|e| {
        log::warn!("{e}; using default settings");
        config::Config::default()
    });
    let lang_code = i18n::resolve_language(&args.lang, Some(app_cfg.language.as_str()));
    log::info!("GUI language resolved: {lang_code}");

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([720.0, 900.0])
        .with_min_inner_size([520.0, 480.0]);
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    eframe::run_native(
        "i-STAT Simulator",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_pixels_per_point(app_cfg.ui_scale);
            let mut state = ViewState::new(app_cfg.default_panel);
            args.apply_to(&mut state);
            Box::new(GuiApp::new(app_cfg, &lang_code, state))
        }),
    )
}

fn capture_rect(rect: egui::Rect) -> CaptureRect {
    CaptureRect::new(rect.min.x, rect.min.y, rect.width(), rect.height())
}

/// egui 스크린샷을 image 크레이트 버퍼로 옮긴다.
fn capture_to_image(shot: &egui::ColorImage) -> Option<image::RgbaImage> {
    let [w, h] = shot.size;
    let bytes: Vec<u8> = shot.pixels.iter().flat_map(|c| c.to_array()).collect();
    image::RgbaImage::from_raw(w as u32, h as u32, bytes)
}

struct GuiApp {
    config: config::Config,
    tr: i18n::Translator,
    state: ViewState,
    // 내보내기
    panel_rect: Option<egui::Rect>,
    /// 패널을 그릴 때의 클립 영역(스크롤 뷰포트)
    panel_clip: Option<egui::Rect>,
    scroll_panel_into_view: bool,
    pending_export: Option<ExportJob>,
    export_status: Option<String>,
    // 설정
    show_settings_modal: bool,
    show_formula_modal: bool,
    lang_input: String,
    ui_scale: f32,
    default_panel_input: PanelType,
    export_dir_input: String,
    settings_status: Option<String>,
}

impl GuiApp {
    fn new(config: config::Config, lang_code: &str, state: ViewState) -> Self {
        let tr = i18n::Translator::new_with_pack(lang_code, config.language_pack_dir.as_deref());
        Self {
            lang_input: config.language.clone(),
            ui_scale: config.ui_scale,
            default_panel_input: config.default_panel,
            export_dir_input: config.export_dir.clone().unwrap_or_default(),
            config,
            tr,
            state,
            panel_rect: None,
            panel_clip: None,
            scroll_panel_into_view: false,
            pending_export: None,
            export_status: None,
            show_settings_modal: false,
            show_formula_modal: false,
            settings_status: None,
        }
    }

    /// 입력 폼. 입력한 문자열은 검증 없이 그대로 상태에 들어간다.
    fn ui_input_form(&mut self, ui: &mut egui::Ui) {
        ui.heading(self.tr.t(keys::INPUT_HEADING));
        ui.add_space(4.0);
        egui::Grid::new("input_form")
            .num_columns(2)
            .spacing([12.0, 6.0])
            .show(ui, |ui| {
                for field in InputField::ALL {
                    ui.label(self.tr.input_label(field));
                    let mut text = self.state.raw_text(field).to_string();
                    let hint = if field.is_numeric() { "0" } else { "hh:mm" };
                    let resp = ui.add(
                        egui::TextEdit::singleline(&mut text)
                            .hint_text(hint)
                            .desired_width(140.0),
                    );
                    if resp.changed() {
                        self.state.set_input(field, &text);
                    }
                    ui.end_row();
                }
            });
    }

    fn ui_actions(&mut self, ui: &mut egui::Ui) {
        let generate = egui::Button::new(
            egui::RichText::new(self.tr.t(keys::ACTION_GENERATE)).color(egui::Color32::WHITE),
        )
        .fill(GENERATE_FILL);
        if ui.add(generate).clicked() {
            self.state.generate();
        }
        ui.horizontal(|ui| {
            for (panel, key) in [
                (PanelType::Cg8, keys::ACTION_SHOW_CG8),
                (PanelType::Cg4, keys::ACTION_SHOW_CG4),
            ] {
                let selected = self.state.panel() == panel;
                if ui.selectable_label(selected, self.tr.t(key)).clicked() {
                    self.state.select_panel(panel);
                }
            }
            let key = if self.state.edit_mode() {
                keys::ACTION_LOCK
            } else {
                keys::ACTION_EDIT
            };
            if ui.button(self.tr.t(key)).clicked() {
                self.state.toggle_edit();
            }
        });
    }

    /// 분석기 화면 모양의 판독 패널. 캡처를 위해 그려진 영역을 기억한다.
    fn ui_readout_panel(&mut self, ui: &mut egui::Ui) {
        if self.state.readouts().is_none() {
            self.panel_rect = None;
            self.panel_clip = None;
            ui.label(self.tr.t(keys::PANEL_EMPTY));
            return;
        }
        let title = format!(
            "{} {}",
            self.state.panel_title(),
            self.tr.t(keys::PANEL_SCREEN)
        );
        let rows: Vec<(ReadoutName, String)> = self
            .state
            .visible_fields()
            .iter()
            .map(|f| (f.name(), f.value().to_string()))
            .collect();
        let edit_mode = self.state.edit_mode();
        let mut edits: Vec<(ReadoutName, String)> = Vec::new();

        let frame = egui::Frame::none()
            .fill(egui::Color32::WHITE)
            .stroke(egui::Stroke::new(1.0, PANEL_BORDER))
            .rounding(egui::Rounding::same(12.0))
            .inner_margin(egui::Margin::same(16.0));
        let response = ui
            .vertical_centered(|ui| {
                frame
                    .show(ui, |ui| {
                        ui.set_width(PANEL_WIDTH);
                        ui.label(
                            egui::RichText::new(title)
                                .monospace()
                                .strong()
                                .size(20.0)
                                .color(PANEL_INK),
                        );
                        ui.add_space(6.0);
                        for (name, value) in &rows {
                            ui.horizontal(|ui| {
                                ui.label(egui::RichText::new(name.label()).monospace().color(PANEL_INK));
                                ui.with_layout(
                                    egui::Layout::right_to_left(egui::Align::Center),
                                    |ui| {
                                        if edit_mode {
                                            let mut buf = value.clone();
                                            let resp = ui.add(
                                                egui::TextEdit::singleline(&mut buf)
                                                    .id_source(("readout", name.label()))
                                                    .font(egui::TextStyle::Monospace)
                                                    .desired_width(96.0),
                                            );
                                            if resp.changed() {
                                                edits.push((*name, buf));
                                            }
                                        } else {
                                            let unit = name.unit();
                                            let shown = if unit.is_empty() {
                                                value.clone()
                                            } else {
                                                format!("{value} {unit}")
                                            };
                                            ui.label(
                                                egui::RichText::new(shown)
                                                    .monospace()
                                                    .color(PANEL_INK),
                                            );
                                        }
                                    },
                                );
                            });
                            ui.separator();
                        }
                    })
                    .response
            })
            .inner;
        if self.scroll_panel_into_view {
            response.scroll_to_me(Some(egui::Align::Min));
            self.scroll_panel_into_view = false;
        }
        self.panel_rect = Some(response.rect);
        self.panel_clip = Some(ui.clip_rect());

        for (name, value) in edits {
            if let Err(e) = self.state.edit_field(name, value) {
                log::debug!("edit of {name} ignored: {e}");
            }
        }
    }

    fn ui_export_bar(&mut self, ui: &mut egui::Ui) {
        let enabled = self.state.readouts().is_some() && self.pending_export.is_none();
        ui.horizontal(|ui| {
            for (format, key) in [
                (ExportFormat::Png, keys::ACTION_EXPORT_PNG),
                (ExportFormat::Pdf, keys::ACTION_EXPORT_PDF),
            ] {
                let button = egui::Button::new(self.tr.t(key));
                if ui.add_enabled(enabled, button).clicked() {
                    self.request_export(format);
                }
            }
            if self.pending_export.is_some() {
                ui.spinner();
                ui.label(self.tr.t(keys::EXPORT_PENDING));
            } else if let Some(msg) = &self.export_status {
                ui.label(msg);
            }
        });
    }

    /// 내보내기를 예약한다. 패널이 그려지지 않았으면 아무 일도 하지 않는다.
    /// 대기 시간 동안 패널을 스크롤해 보이게 하고 떠 있는 창은 숨긴다.
    fn request_export(&mut self, format: ExportFormat) {
        let Some(rect) = self.panel_rect.map(capture_rect) else {
            log::info!("export requested without a rendered panel");
            return;
        };
        self.scroll_panel_into_view = true;
        self.pending_export = Some(ExportJob::new(
            format,
            self.state.panel(),
            rect,
            Instant::now(),
        ));
        self.export_status = None;
    }

    /// 예약된 내보내기를 진행한다: 대기 → 스크린샷 요청 → 수신 후 저장.
    fn poll_export(&mut self, ctx: &egui::Context) {
        let Some(job) = self.pending_export.as_mut() else {
            return;
        };
        match job.poll(Instant::now()) {
            JobStep::Wait(rest) => ctx.request_repaint_after(rest),
            JobStep::Capture => {
                let visible = match (self.panel_rect, self.panel_clip) {
                    (Some(rect), Some(clip)) => {
                        let rect = capture_rect(rect);
                        capture_rect(clip).contains(&rect).then_some(rect)
                    }
                    _ => None,
                };
                match visible {
                    Some(rect) => {
                        job.retarget(rect);
                        ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot);
                        ctx.request_repaint();
                    }
                    None => {
                        log::warn!("export skipped: panel is not fully visible");
                        self.pending_export = None;
                    }
                }
            }
            JobStep::GiveUp => {
                log::warn!("export skipped: no screenshot within {:?}", export::SCREENSHOT_TIMEOUT);
                self.pending_export = None;
            }
            JobStep::AwaitScreenshot => {
                let shot = ctx.input(|i| {
                    i.raw.events.iter().find_map(|e| match e {
                        egui::Event::Screenshot { image, .. } => Some(Arc::clone(image)),
                        _ => None,
                    })
                });
                match (shot, self.pending_export.take()) {
                    (Some(shot), Some(job)) => {
                        self.finish_export(&job, &shot, ctx.pixels_per_point());
                    }
                    (None, job) => {
                        self.pending_export = job;
                        ctx.request_repaint();
                    }
                    (Some(_), None) => {}
                }
            }
        }
    }

    fn finish_export(&mut self, job: &ExportJob, shot: &egui::ColorImage, pixels_per_point: f32) {
        let image = capture_to_image(shot)
            .and_then(|img| export::crop_and_scale(&img, job.rect(), pixels_per_point));
        let Some(image) = image else {
            log::warn!("export skipped: capture area unavailable");
            return;
        };

        let format = job.format();
        let mut dialog = FileDialog::new()
            .set_file_name(job.file_name())
            .add_filter(format.label(), &[format.extension()]);
        if let Some(dir) = self
            .config
            .export_dir
            .as_deref()
            .filter(|d| Path::new(d).is_dir())
        {
            dialog = dialog.set_directory(dir);
        }
        let Some(path) = dialog.save_file() else {
            log::info!("export cancelled");
            return;
        };
        match export::write_artifact(&path, format, &image) {
            Ok(()) => {
                self.export_status = Some(format!(
                    "{} {}",
                    self.tr.t(keys::EXPORT_DONE),
                    path.display()
                ));
            }
            Err(e) => log::warn!("export to {} failed: {e}", path.display()),
        }
    }

    /// 설정 창 입력값을 설정과 번역기에 반영한다(파일 저장은 하지 않는다).
    fn apply_settings_inputs(&mut self) {
        self.config.language = self.lang_input.clone();
        self.ui_scale = config::clamp_ui_scale(self.ui_scale);
        self.config.ui_scale = self.ui_scale;
        self.config.default_panel = self.default_panel_input;
        let dir = self.export_dir_input.trim();
        self.config.export_dir = (!dir.is_empty()).then(|| dir.to_string());
        let resolved = i18n::resolve_language(&self.config.language, None);
        self.tr = i18n::Translator::new_with_pack(&resolved, self.config.language_pack_dir.as_deref());
    }

    fn ui_settings(&mut self, ctx: &egui::Context) {
        let mut open = self.show_settings_modal;
        egui::Window::new(self.tr.t(keys::SETTINGS_TITLE))
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label(self.tr.t(keys::SETTINGS_LANGUAGE));
                egui::ComboBox::from_id_source("lang_choice")
                    .selected_text(self.lang_input.clone())
                    .show_ui(ui, |ui| {
                        ui.selectable_value(
                            &mut self.lang_input,
                            "auto".to_string(),
                            self.tr.t(keys::SETTINGS_LANGUAGE_AUTO),
                        );
                        ui.selectable_value(&mut self.lang_input, "sv-se".to_string(), "Svenska");
                        ui.selectable_value(&mut self.lang_input, "en-us".to_string(), "English");
                    });
                ui.separator();
                ui.label(self.tr.t(keys::SETTINGS_UI_SCALE));
                let slider = egui::Slider::new(&mut self.ui_scale, 0.8..=2.0).suffix(" x");
                if ui.add(slider).changed() {
                    ctx.set_pixels_per_point(self.ui_scale);
                }
                ui.separator();
                ui.label(self.tr.t(keys::SETTINGS_DEFAULT_PANEL));
                ui.horizontal(|ui| {
                    for panel in PanelType::ALL {
                        ui.selectable_value(&mut self.default_panel_input, panel, panel.label());
                    }
                });
                ui.separator();
                ui.label(self.tr.t(keys::SETTINGS_EXPORT_DIR));
                ui.horizontal(|ui| {
                    ui.text_edit_singleline(&mut self.export_dir_input);
                    if ui.button(self.tr.t(keys::SETTINGS_BROWSE)).clicked() {
                        if let Some(dir) = FileDialog::new().pick_folder() {
                            self.export_dir_input = dir.display().to_string();
                        }
                    }
                });
                ui.separator();
                if ui.button(self.tr.t(keys::SETTINGS_SAVE)).clicked() {
                    self.apply_settings_inputs();
                    self.settings_status = Some(match self.config.save() {
                        Ok(()) => self.tr.t(keys::SETTINGS_SAVED),
                        Err(e) => {
                            log::warn!("{e}");
                            format!("{} {e}", self.tr.t(keys::SETTINGS_SAVE_ERROR))
                        }
                    });
                }
                if let Some(msg) = &self.settings_status {
                    ui.label(msg);
                }
            });
        self.show_settings_modal = open;
    }

    fn ui_formulas(&mut self, ctx: &egui::Context) {
        let mut open = self.show_formula_modal;
        egui::Window::new(self.tr.t(keys::FORMULA_TITLE))
            .collapsible(true)
            .resizable(true)
            .open(&mut open)
            .show(ctx, |ui| {
                for line in FORMULA_LINES {
                    ui.monospace(line);
                }
            });
        self.show_formula_modal = open;
    }
}

impl App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.poll_export(ctx);

        // 상단 바
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(self.tr.t(keys::APP_TITLE));
                ui.separator();
                if ui.button(self.tr.t(keys::FORMULA_TITLE)).clicked() {
                    self.show_formula_modal = true;
                }
                if ui.button(self.tr.t(keys::SETTINGS_TITLE)).clicked() {
                    self.show_settings_modal = true;
                }
            });
        });

        // 캡처 중에는 떠 있는 창이 패널을 가리지 않게 한다.
        let capturing = self.pending_export.is_some();
        if self.show_settings_modal && !capturing {
            self.ui_settings(ctx);
        }
        if self.show_formula_modal && !capturing {
            self.ui_formulas(ctx);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    egui::Frame::group(ui.style()).show(ui, |ui| {
                        self.ui_input_form(ui);
                        ui.add_space(8.0);
                        self.ui_actions(ui);
                    });
                    ui.add_space(12.0);
                    self.ui_readout_panel(ui);
                    ui.add_space(8.0);
                    self.ui_export_bar(ui);
                });
        });
    }
}
