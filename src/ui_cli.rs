use std::io::{self, Write};

use crate::app::AppError;
use crate::bloodgas::{InputField, PanelType, ReadoutName};
use crate::i18n::{keys, Translator};
use crate::view_state::{EditError, ViewState};

/// 메인 메뉴 선택지를 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    SetInput,
    Generate,
    ShowPanel(PanelType),
    ToggleEdit,
    EditField,
    Show,
    Exit,
}

/// 메뉴 번호를 선택지로 바꾼다.
pub fn parse_menu_choice(sel: &str) -> Option<MenuChoice> {
    match sel.trim() {
        "1" => Some(MenuChoice::SetInput),
        "2" => Some(MenuChoice::Generate),
        "3" => Some(MenuChoice::ShowPanel(PanelType::Cg8)),
        "4" => Some(MenuChoice::ShowPanel(PanelType::Cg4)),
        "5" => Some(MenuChoice::ToggleEdit),
        "6" => Some(MenuChoice::EditField),
        "7" => Some(MenuChoice::Show),
        "0" => Some(MenuChoice::Exit),
        _ => None,
    }
}

/// 메인 메뉴를 표시하고 선택값을 반환한다.
pub fn main_menu(tr: &Translator) -> Result<MenuChoice, AppError> {
    println!("\n{}", tr.t(keys::MENU_TITLE));
    for key in [
        keys::MENU_SET_INPUT,
        keys::MENU_GENERATE,
        keys::MENU_SHOW_CG8,
        keys::MENU_SHOW_CG4,
        keys::MENU_TOGGLE_EDIT,
        keys::MENU_EDIT_FIELD,
        keys::MENU_SHOW,
        keys::MENU_EXIT,
    ] {
        println!("{}", tr.t(key));
    }
    loop {
        let sel = read_line(&tr.t(keys::PROMPT_MENU_SELECT))?;
        match parse_menu_choice(&sel) {
            Some(choice) => return Ok(choice),
            None => println!("{}", tr.t(keys::ERROR_INVALID_SELECTION)),
        }
    }
}

/// 입력 항목 하나를 받아 상태에 반영한다.
pub fn handle_set_input(tr: &Translator, state: &mut ViewState) -> Result<(), AppError> {
    println!("\n-- {} --", tr.t(keys::INPUT_HEADING));
    for field in InputField::ALL {
        println!(
            "  {:<18} {:<28} = {}",
            field.key(),
            tr.input_label(field),
            state.raw_text(field)
        );
    }
    let key = read_line(&tr.t(keys::PROMPT_INPUT_FIELD))?;
    let Some(field) = InputField::from_key(&key) else {
        println!("{}", tr.t(keys::ERROR_UNKNOWN_FIELD));
        return Ok(());
    };
    let value = read_line(&tr.t(keys::PROMPT_VALUE))?;
    state.set_input(field, value.trim());
    Ok(())
}

/// 판독 항목 하나의 값을 받아 고친다. 편집 거부는 [`AppError::Edit`]로 돌려준다.
pub fn handle_edit_field(tr: &Translator, state: &mut ViewState) -> Result<(), AppError> {
    if !state.edit_mode() {
        return Err(EditError::Locked.into());
    }
    if state.readouts().is_none() {
        return Err(EditError::NoReadouts.into());
    }
    let label = read_line(&tr.t(keys::PROMPT_READOUT_FIELD))?;
    let Some(name) = ReadoutName::from_label(&label) else {
        println!("{}", tr.t(keys::ERROR_UNKNOWN_FIELD));
        return Ok(());
    };
    let value = read_line(&tr.t(keys::PROMPT_VALUE))?;
    state.edit_field(name, value.trim())?;
    print_panel(tr, state);
    Ok(())
}

pub fn edit_error_text(tr: &Translator, err: EditError) -> String {
    match err {
        EditError::Locked => tr.t(keys::EDIT_LOCKED),
        EditError::NoReadouts => tr.t(keys::EDIT_NO_READOUTS),
    }
}

/// 현재 패널을 분석기 화면처럼 텍스트 줄로 만든다.
pub fn panel_lines(tr: &Translator, state: &ViewState) -> Vec<String> {
    let fields = state.visible_fields();
    if fields.is_empty() {
        return vec![tr.t(keys::PANEL_EMPTY)];
    }
    let mut lines = Vec::with_capacity(fields.len() + 2);
    let title = format!("{} {}", state.panel_title(), tr.t(keys::PANEL_SCREEN));
    lines.push(title.clone());
    lines.push("-".repeat(title.chars().count().max(28)));
    for field in fields {
        lines.push(format!("{:<8}{:>20}", field.name().label(), field.display()));
    }
    lines
}

pub fn print_panel(tr: &Translator, state: &ViewState) {
    println!();
    for line in panel_lines(tr, state) {
        println!("{line}");
    }
}

fn read_line(prompt: &str) -> Result<String, AppError> {
    print!("{prompt}");
    io::stdout().flush().map_err(AppError::Io)?;
    let mut buf = String::new();
    let read = io::stdin().read_line(&mut buf).map_err(AppError::Io)?;
    if read == 0 {
        return Err(AppError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "stdin closed",
        )));
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_numbers() {
        assert_eq!(parse_menu_choice(" 4\n"), Some(MenuChoice::ShowPanel(PanelType::Cg4)));
        assert_eq!(parse_menu_choice("0"), Some(MenuChoice::Exit));
        assert_eq!(parse_menu_choice("9"), None);
    }

    #[test]
    fn panel_lines_follow_panel() {
        let tr = Translator::new("en-us");
        let mut state = ViewState::default();
        assert_eq!(panel_lines(&tr, &state), vec!["No values generated yet.".to_string()]);

        state.generate();
        state.select_panel(PanelType::Cg4);
        let lines = panel_lines(&tr, &state);
        assert_eq!(lines[0], "i-STAT CG4 Screen");
        assert_eq!(lines.len(), 2 + 6);
        assert!(lines[2].starts_with("pH"));
        assert!(lines[2].ends_with("7.40"));
        assert!(lines[3].ends_with("5.3 kPa"));
    }

    #[test]
    fn edit_refusal_messages() {
        let tr = Translator::new("sv-se");
        assert_eq!(edit_error_text(&tr, EditError::NoReadouts), "Generera blodgas först.");
    }
}
