use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::bloodgas::PanelType;

/// 설정 파일 기본 경로(작업 디렉터리 기준).
pub const CONFIG_FILE: &str = "config.toml";

/// 애플리케이션 설정을 표현한다. 화면 환경설정만 담고 시뮬레이션 입력/결과는 저장하지 않는다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 언어 코드(auto/sv-se/en-us)
    pub language: String,
    /// 언어팩 디렉터리. `<코드>.toml` 파일로 문자열을 덮어쓴다.
    pub language_pack_dir: Option<String>,
    /// GUI 배율
    pub ui_scale: f32,
    /// 시작 시 선택되는 패널
    pub default_panel: PanelType,
    /// 내보내기 저장 대화상자의 시작 폴더
    pub export_dir: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "auto".to_string(),
            language_pack_dir: None,
            ui_scale: 1.0,
            default_panel: PanelType::Cg8,
            export_dir: None,
        }
    }
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug)]
pub enum ConfigError {
    /// 파일 입출력 오류
    Io(std::io::Error),
    /// TOML 역직렬화 오류
    Serde(toml::de::Error),
    /// TOML 직렬화 오류
    Serialize(toml::ser::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Serde(e) => write!(f, "config parse error: {e}"),
            ConfigError::Serialize(e) => write!(f, "config serialize error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        ConfigError::Io(value)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        ConfigError::Serde(value)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(value: toml::ser::Error) -> Self {
        ConfigError::Serialize(value)
    }
}

/// config.toml을 로드한다. 없으면 기본 설정을 쓰고 파일은 만들지 않는다.
pub fn load_or_default() -> Result<Config, ConfigError> {
    load_from(Path::new(CONFIG_FILE))
}

/// 지정 경로에서 설정을 로드한다. 빠진 키는 기본값으로 채운다.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        log::debug!("{} not found, using defaults", path.display());
        return Ok(Config::default());
    }
    let content = fs::read_to_string(path)?;
    let mut cfg: Config = toml::from_str(&content)?;
    cfg.ui_scale = clamp_ui_scale(cfg.ui_scale);
    Ok(cfg)
}

/// GUI 배율 허용 범위(0.8~2.0)로 맞춘다.
pub fn clamp_ui_scale(scale: f32) -> f32 {
    if scale.is_finite() {
        scale.clamp(0.8, 2.0)
    } else {
        1.0
    }
}

impl Config {
    /// 설정을 config.toml에 저장한다.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(Path::new(CONFIG_FILE))
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        log::info!("settings saved to {}", path.display());
        Ok(())
    }
}
