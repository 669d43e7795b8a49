use crate::i18n::{self, Translator};
use crate::ui_cli::{self, MenuChoice};
use crate::view_state::{EditError, ViewState};

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug)]
pub enum AppError {
    /// 입출력 오류
    Io(std::io::Error),
    /// 설정 로드/저장 오류
    Config(crate::config::ConfigError),
    /// 판독값 편집 거부
    Edit(EditError),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Io(e) => write!(f, "I/O error: {e}"),
            AppError::Config(e) => write!(f, "{e}"),
            AppError::Edit(e) => write!(f, "edit refused: {e}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        AppError::Io(value)
    }
}

impl From<crate::config::ConfigError> for AppError {
    fn from(value: crate::config::ConfigError) -> Self {
        AppError::Config(value)
    }
}

impl From<EditError> for AppError {
    fn from(value: EditError) -> Self {
        AppError::Edit(value)
    }
}

/// CLI 애플리케이션의 메인 루프를 실행한다.
pub fn run(state: &mut ViewState, tr: &Translator) -> Result<(), AppError> {
    if state.readouts().is_some() {
        ui_cli::print_panel(tr, state);
    }
    loop {
        let choice = match ui_cli::main_menu(tr) {
            Ok(choice) => choice,
            // 입력 스트림이 끝나면 종료로 본다.
            Err(AppError::Io(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                MenuChoice::Exit
            }
            Err(e) => return Err(e),
        };
        match choice {
            MenuChoice::SetInput => ui_cli::handle_set_input(tr, state)?,
            MenuChoice::Generate => {
                state.generate();
                ui_cli::print_panel(tr, state);
            }
            MenuChoice::ShowPanel(panel) => {
                state.select_panel(panel);
                ui_cli::print_panel(tr, state);
            }
            MenuChoice::ToggleEdit => {
                let key = if state.toggle_edit() {
                    i18n::keys::EDIT_MODE_ON
                } else {
                    i18n::keys::EDIT_MODE_OFF
                };
                println!("{}", tr.t(key));
            }
            MenuChoice::EditField => match ui_cli::handle_edit_field(tr, state) {
                Err(AppError::Edit(e)) => println!("{}", ui_cli::edit_error_text(tr, e)),
                other => other?,
            },
            MenuChoice::Show => ui_cli::print_panel(tr, state),
            MenuChoice::Exit => {
                println!("{}", tr.t(i18n::keys::APP_EXIT));
                break;
            }
        }
    }
    Ok(())
}
