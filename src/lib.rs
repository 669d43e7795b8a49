//! 판독값 도출과 화면 상태를 라이브러리로 분리하여 GUI와 CLI가 같은 로직을 쓰게 한다.

pub mod app;
pub mod bloodgas;
pub mod cli;
pub mod config;
pub mod export;
pub mod i18n;
pub mod ui_cli;
pub mod view_state;
