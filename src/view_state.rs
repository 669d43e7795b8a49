//! 화면 상태: 현재 입력, 선택 패널, 편집 모드, 판독값.
//! GUI/CLI 모두 이 상태를 통해서만 판독값을 만들고 고친다.

use log::debug;

use crate::bloodgas::{
    self, InputField, PanelType, ReadoutField, ReadoutName, ReadoutSet, SimulationInput,
};

/// 판독값 편집이 거부된 이유.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditError {
    /// 편집 모드가 꺼져 있음
    Locked,
    /// 아직 판독값을 생성하지 않음
    NoReadouts,
}

impl std::fmt::Display for EditError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditError::Locked => write!(f, "edit mode is off"),
            EditError::NoReadouts => write!(f, "no readouts generated yet"),
        }
    }
}

impl std::error::Error for EditError {}

#[derive(Debug, Clone)]
pub struct ViewState {
    input: SimulationInput,
    raw_text: [String; 6],
    panel: PanelType,
    readouts: Option<ReadoutSet>,
    edit_mode: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(PanelType::default())
    }
}

impl ViewState {
    /// 기본 입력과 주어진 패널로 시작한다. 판독값은 비어 있고 편집 모드는 꺼져 있다.
    pub fn new(panel: PanelType) -> Self {
        let input = SimulationInput::default();
        let raw_text = InputField::ALL.map(|f| input.display_value(f));
        Self {
            input,
            raw_text,
            panel,
            readouts: None,
            edit_mode: false,
        }
    }

    pub fn input(&self) -> &SimulationInput {
        &self.input
    }

    /// 폼에 입력된 그대로의 문자열.
    pub fn raw_text(&self, field: InputField) -> &str {
        &self.raw_text[field.index()]
    }

    pub fn panel(&self) -> PanelType {
        self.panel
    }

    pub fn readouts(&self) -> Option<&ReadoutSet> {
        self.readouts.as_ref()
    }

    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    /// 입력 항목 하나를 폼 문자열로 바꾼다. 검증하지 않는다.
    pub fn set_input(&mut self, field: InputField, text: &str) {
        self.input.set_from_text(field, text);
        self.raw_text[field.index()] = text.to_string();
    }

    /// 숫자 항목을 값으로 바로 바꾼다. 시간 항목이면 무시한다.
    pub fn set_input_value(&mut self, field: InputField, value: f64) {
        if self.input.set_numeric(field, value) {
            self.raw_text[field.index()] = self.input.display_value(field);
        }
    }

    /// 현재 입력으로 판독값 13개를 모두 다시 계산해 통째로 교체한다.
    pub fn generate(&mut self) -> &ReadoutSet {
        let set = bloodgas::derive(&self.input);
        debug!("generated readouts for {:?}", self.input);
        self.readouts.insert(set)
    }

    /// 표시 패널만 바꾼다. 판독값은 다시 계산하지 않는다.
    pub fn select_panel(&mut self, panel: PanelType) {
        if self.panel != panel {
            debug!("panel switched {} -> {}", self.panel, panel);
        }
        self.panel = panel;
    }

    /// 편집 모드를 뒤집고 새 상태를 반환한다.
    pub fn toggle_edit(&mut self) -> bool {
        self.edit_mode = !self.edit_mode;
        debug!("edit mode {}", if self.edit_mode { "on" } else { "off" });
        self.edit_mode
    }

    /// 편집 모드에서 판독 항목 하나의 표시 값을 바꾼다.
    pub fn edit_field(
        &mut self,
        name: ReadoutName,
        value: impl Into<String>,
    ) -> Result<(), EditError> {
        if !self.edit_mode {
            return Err(EditError::Locked);
        }
        let set = self.readouts.as_mut().ok_or(EditError::NoReadouts)?;
        set.set_value(name, value);
        Ok(())
    }

    /// 현재 패널에 보이는 항목들. 생성 전이면 비어 있다.
    pub fn visible_fields(&self) -> Vec<&ReadoutField> {
        match &self.readouts {
            Some(set) => self.panel.fields().iter().map(|n| set.get(*n)).collect(),
            None => Vec::new(),
        }
    }

    /// "i-STAT CG8" 형태의 패널 제목 앞부분.
    pub fn panel_title(&self) -> String {
        format!("i-STAT {}", self.panel.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty_and_locked() {
        let state = ViewState::default();
        assert!(state.readouts().is_none());
        assert!(!state.edit_mode());
        assert_eq!(state.panel(), PanelType::Cg8);
        assert!(state.visible_fields().is_empty());
        assert_eq!(state.raw_text(InputField::TimeSinceInjury), "00:00");
    }

    #[test]
    fn edit_refused_when_locked_or_empty() {
        let mut state = ViewState::default();
        state.toggle_edit();
        assert_eq!(state.edit_field(ReadoutName::Ph, "7.0"), Err(EditError::NoReadouts));
        state.toggle_edit();
        state.generate();
        assert_eq!(state.edit_field(ReadoutName::Ph, "7.0"), Err(EditError::Locked));
        assert_eq!(state.readouts().map(|s| s.value(ReadoutName::Ph)), Some("7.40"));
    }

    #[test]
    fn raw_text_is_kept_verbatim() {
        let mut state = ViewState::default();
        state.set_input(InputField::BloodLoss, "12x");
        assert_eq!(state.raw_text(InputField::BloodLoss), "12x");
        assert!(state.input().blood_loss_ml.is_nan());
        state.set_input_value(InputField::BloodLoss, 700.0);
        assert_eq!(state.raw_text(InputField::BloodLoss), "700");
    }
}
