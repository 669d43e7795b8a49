use std::collections::HashMap;
use std::fs;
use std::path::Path;
use sys_locale::get_locale;

use crate::bloodgas::InputField;

/// 문자열 키를 모아두는 네임스페이스.
pub mod keys {
    pub const APP_TITLE: &str = "general.app_title";
    pub const ERROR_PREFIX: &str = "general.error_prefix";
    pub const APP_EXIT: &str = "general.app_exit";

    pub const INPUT_HEADING: &str = "input.heading";

    pub const ACTION_GENERATE: &str = "action.generate";
    pub const ACTION_SHOW_CG8: &str = "action.show_cg8";
    pub const ACTION_SHOW_CG4: &str = "action.show_cg4";
    pub const ACTION_EDIT: &str = "action.edit";
    pub const ACTION_LOCK: &str = "action.lock";
    pub const ACTION_EXPORT_PNG: &str = "action.export_png";
    pub const ACTION_EXPORT_PDF: &str = "action.export_pdf";

    pub const PANEL_SCREEN: &str = "panel.screen";
    pub const PANEL_EMPTY: &str = "panel.empty";

    pub const EXPORT_PENDING: &str = "export.pending";
    pub const EXPORT_DONE: &str = "export.done";

    pub const FORMULA_TITLE: &str = "general.formulas";

    pub const SETTINGS_TITLE: &str = "settings.title";
    pub const SETTINGS_LANGUAGE: &str = "settings.language";
    pub const SETTINGS_LANGUAGE_AUTO: &str = "settings.language_auto";
    pub const SETTINGS_UI_SCALE: &str = "settings.ui_scale";
    pub const SETTINGS_DEFAULT_PANEL: &str = "settings.default_panel";
    pub const SETTINGS_EXPORT_DIR: &str = "settings.export_dir";
    pub const SETTINGS_BROWSE: &str = "settings.browse";
    pub const SETTINGS_SAVE: &str = "settings.save";
    pub const SETTINGS_SAVED: &str = "settings.saved";
    pub const SETTINGS_SAVE_ERROR: &str = "settings.save_error";

    pub const MENU_TITLE: &str = "menu.title";
    pub const MENU_SET_INPUT: &str = "menu.set_input";
    pub const MENU_GENERATE: &str = "menu.generate";
    pub const MENU_SHOW_CG8: &str = "menu.show_cg8";
    pub const MENU_SHOW_CG4: &str = "menu.show_cg4";
    pub const MENU_TOGGLE_EDIT: &str = "menu.toggle_edit";
    pub const MENU_EDIT_FIELD: &str = "menu.edit_field";
    pub const MENU_SHOW: &str = "menu.show";
    pub const MENU_EXIT: &str = "menu.exit";

    pub const PROMPT_MENU_SELECT: &str = "prompt.menu_select";
    pub const PROMPT_INPUT_FIELD: &str = "prompt.input_field";
    pub const PROMPT_READOUT_FIELD: &str = "prompt.readout_field";
    pub const PROMPT_VALUE: &str = "prompt.value";

    pub const ERROR_INVALID_SELECTION: &str = "error.invalid_selection";
    pub const ERROR_UNKNOWN_FIELD: &str = "error.unknown_field";

    pub const EDIT_LOCKED: &str = "edit.locked";
    pub const EDIT_NO_READOUTS: &str = "edit.no_readouts";
    pub const EDIT_MODE_ON: &str = "edit.mode_on";
    pub const EDIT_MODE_OFF: &str = "edit.mode_off";
}

/// 지원 언어. 알 수 없는 태그는 스웨덴어로 본다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Sv,
    En,
}

impl Language {
    /// "sv", "sv-SE", "en_US.UTF-8", "se" 같은 태그에서 언어를 읽는다.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag
            .trim()
            .split(['.', '_', '-', '@'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "sv" | "se" => Some(Language::Sv),
            "en" => Some(Language::En),
            _ => None,
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Language::Sv => "sv-se",
            Language::En => "en-us",
        }
    }

    fn built_in_source(self) -> &'static str {
        match self {
            Language::Sv => include_str!("../locales/sv-se.toml"),
            Language::En => include_str!("../locales/en-us.toml"),
        }
    }
}

/// 점으로 이은 키("action.generate") → 문구 표.
type Messages = HashMap<String, String>;

/// 런타임 언어 번들. 언어팩 문구가 내장 문구 위에 덮어써진다.
#[derive(Debug, Clone)]
pub struct Translator {
    lang: Language,
    messages: Messages,
}

impl Translator {
    /// 내장 문구만 쓰는 번역기.
    pub fn new(lang_code: &str) -> Self {
        Self::new_with_pack(lang_code, None)
    }

    /// 언어팩 디렉터리에서 `<code>.toml` 또는 `<base>.toml`을 찾아 내장 문구에 덮어쓴다.
    pub fn new_with_pack(lang_code: &str, pack_dir: Option<&str>) -> Self {
        let lang = Language::from_tag(lang_code).unwrap_or(Language::Sv);
        let mut messages = Messages::new();
        if let Err(e) = merge_toml(&mut messages, lang.built_in_source()) {
            log::error!("built-in {} strings are malformed: {e}", lang.as_code());
        }
        if let Some(dir) = pack_dir {
            match read_pack(Path::new(dir), lang) {
                Some(src) => {
                    if let Err(e) = merge_toml(&mut messages, &src) {
                        log::warn!("ignoring language pack in {dir}: {e}");
                    }
                }
                None => log::warn!("language pack not found for {}", lang.as_code()),
            }
        }
        Self { lang, messages }
    }

    pub fn language(&self) -> Language {
        self.lang
    }

    pub fn language_code(&self) -> &'static str {
        self.lang.as_code()
    }

    pub fn lookup(&self, key: &str) -> Option<String> {
        self.messages.get(key).cloned()
    }

    /// 번역 문구. 없으면 키 자체.
    pub fn t(&self, key: &str) -> String {
        self.lookup(key).unwrap_or_else(|| key.to_string())
    }

    pub fn input_label(&self, field: InputField) -> String {
        self.lookup(&format!("input.{}", field.key()))
            .unwrap_or_else(|| field.key().to_string())
    }
}

/// 언어 결정 순서: 명령줄 → 설정 → 시스템 로케일 → sv-se.
/// "auto"나 빈 값은 건너뛴다.
pub fn resolve_language(cli_arg: &str, config_lang: Option<&str>) -> String {
    let explicit = [Some(cli_arg), config_lang]
        .into_iter()
        .flatten()
        .filter(|tag| !tag.trim().eq_ignore_ascii_case("auto"))
        .find_map(Language::from_tag);
    explicit
        .or_else(|| detect_system_language().as_deref().and_then(Language::from_tag))
        .unwrap_or(Language::Sv)
        .as_code()
        .to_string()
}

/// 시스템 로케일(sys-locale, 없으면 LC_ALL/LANG)에서 지원 언어를 찾는다.
pub fn detect_system_language() -> Option<String> {
    let from_env = || {
        ["LC_ALL", "LANG"]
            .into_iter()
            .filter_map(|var| std::env::var(var).ok())
            .find_map(|v| Language::from_tag(&v))
    };
    get_locale()
        .as_deref()
        .and_then(Language::from_tag)
        .or_else(from_env)
        .map(|lang| lang.as_code().to_string())
}

fn read_pack(dir: &Path, lang: Language) -> Option<String> {
    let code = lang.as_code();
    let base = code.split('-').next().unwrap_or(code);
    [code, base]
        .into_iter()
        .map(|name| dir.join(format!("{name}.toml")))
        .find_map(|path| fs::read_to_string(path).ok())
}

/// TOML 표를 평탄화해 `out`에 합친다. 문자열이 아닌 값은 무시한다.
fn merge_toml(out: &mut Messages, src: &str) -> Result<(), toml::de::Error> {
    fn flatten(out: &mut Messages, prefix: Option<&str>, table: &toml::Table) {
        for (name, value) in table {
            let key = match prefix {
                Some(p) => format!("{p}.{name}"),
                None => name.clone(),
            };
            match value {
                toml::Value::String(text) => {
                    out.insert(key, text.clone());
                }
                toml::Value::Table(inner) => flatten(out, Some(&key), inner),
                _ => {}
            }
        }
    }

    let table: toml::Table = toml::from_str(src)?;
    flatten(out, None, &table);
    Ok(())
}
