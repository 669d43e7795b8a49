use istat_simulator::bloodgas::{InputField, PanelType, ReadoutName};
use istat_simulator::view_state::{EditError, ViewState};

fn generated(panel: PanelType) -> ViewState {
    let mut state = ViewState::new(panel);
    state.set_input(InputField::BloodLoss, "2450");
    state.generate();
    state
}

#[test]
fn switching_panels_keeps_values() {
    let mut state = generated(PanelType::Cg8);
    let before = state.readouts().cloned();
    state.select_panel(PanelType::Cg4);
    assert_eq!(state.visible_fields().len(), 6);
    state.select_panel(PanelType::Cg8);
    assert_eq!(state.visible_fields().len(), 13);
    assert_eq!(state.readouts().cloned(), before);
}

#[test]
fn edited_value_survives_lock_and_panel_switch() {
    let mut state = generated(PanelType::Cg8);
    assert_eq!(state.edit_field(ReadoutName::Ph, "7.01"), Err(EditError::Locked));

    assert!(state.toggle_edit());
    state.edit_field(ReadoutName::Ph, "7.01").unwrap();
    assert!(!state.toggle_edit());
    state.select_panel(PanelType::Cg4);

    let ph = state
        .visible_fields()
        .into_iter()
        .find(|f| f.name() == ReadoutName::Ph)
        .map(|f| f.value().to_string());
    assert_eq!(ph.as_deref(), Some("7.01"));
}

#[test]
fn editing_accepts_any_text() {
    let mut state = generated(PanelType::Cg8);
    state.toggle_edit();
    state.edit_field(ReadoutName::Na, "hög").unwrap();
    assert_eq!(state.readouts().unwrap().value(ReadoutName::Na), "hög");
}

#[test]
fn regenerate_discards_edits() {
    let mut state = generated(PanelType::Cg8);
    state.toggle_edit();
    state.edit_field(ReadoutName::Hb, "60").unwrap();
    state.generate();
    assert_eq!(state.readouts().unwrap().value(ReadoutName::Hb), "110");
    assert!(state.edit_mode());
}

#[test]
fn input_changes_need_generate() {
    let mut state = generated(PanelType::Cg8);
    state.set_input(InputField::BloodLoss, "4900");
    assert_eq!(state.readouts().unwrap().value(ReadoutName::Ph), "7.35");
    state.generate();
    assert_eq!(state.readouts().unwrap().value(ReadoutName::Ph), "7.30");
}

#[test]
fn unparsable_input_generates_nan() {
    let mut state = ViewState::default();
    state.set_input(InputField::BodyWeight, "abc");
    assert_eq!(state.raw_text(InputField::BodyWeight), "abc");
    state.generate();
    assert_eq!(state.readouts().unwrap().value(ReadoutName::K), "NaN");
}

#[test]
fn generate_with_cg4_keeps_all_readouts() {
    let state = generated(PanelType::Cg4);
    assert_eq!(state.readouts().unwrap().len(), 13);
    assert_eq!(state.visible_fields().len(), 6);
}
