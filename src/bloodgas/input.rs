use serde::{Deserialize, Serialize};

/// 시뮬레이션 입력 폼의 항목. 폼 표시 순서와 같다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputField {
    BloodLoss,
    TimeSinceInjury,
    LungFunction,
    TransfusedBlood,
    TransfusedPlasma,
    BodyWeight,
}

impl InputField {
    pub const ALL: [InputField; 6] = [
        InputField::BloodLoss,
        InputField::TimeSinceInjury,
        InputField::LungFunction,
        InputField::TransfusedBlood,
        InputField::TransfusedPlasma,
        InputField::BodyWeight,
    ];

    /// 폼/언어팩에서 쓰는 고정 키.
    pub fn key(self) -> &'static str {
        match self {
            InputField::BloodLoss => "bloodLoss",
            InputField::TimeSinceInjury => "timeSinceInjury",
            InputField::LungFunction => "lungFunction",
            InputField::TransfusedBlood => "transfusedBlood",
            InputField::TransfusedPlasma => "transfusedPlasma",
            InputField::BodyWeight => "bodyWeight",
        }
    }

    /// 키 문자열로 항목을 찾는다. 대소문자는 구분하지 않는다.
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::ALL
            .into_iter()
            .find(|f| f.key().eq_ignore_ascii_case(key))
    }

    /// 숫자 입력 여부. 부상 후 경과 시간만 HH:MM 문자열이다.
    pub fn is_numeric(self) -> bool {
        !matches!(self, InputField::TimeSinceInjury)
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// 판독값 도출에 쓰는 부상 중증도 입력.
///
/// 범위 검증은 하지 않는다. 잘못된 숫자는 NaN으로 남아 공식에 그대로 전파된다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationInput {
    /// 출혈량 [ml]
    pub blood_loss_ml: f64,
    /// 부상 후 경과 시간 (HH:MM). 도출에는 쓰지 않는다.
    pub time_since_injury: String,
    /// 폐 기능 [%] (0~100)
    pub lung_function_percent: f64,
    /// 수혈한 전혈량 [ml]
    pub transfused_blood_ml: f64,
    /// 수혈한 혈장량 [ml]. 도출에는 쓰지 않는다.
    pub transfused_plasma_ml: f64,
    /// 체중 [kg]
    pub body_weight_kg: f64,
}

impl Default for SimulationInput {
    fn default() -> Self {
        Self {
            blood_loss_ml: 0.0,
            time_since_injury: "00:00".to_string(),
            lung_function_percent: 100.0,
            transfused_blood_ml: 0.0,
            transfused_plasma_ml: 0.0,
            body_weight_kg: 70.0,
        }
    }
}

impl SimulationInput {
    /// 숫자 항목의 현재 값. 시간 항목이면 None.
    pub fn numeric(&self, field: InputField) -> Option<f64> {
        match field {
            InputField::BloodLoss => Some(self.blood_loss_ml),
            InputField::TimeSinceInjury => None,
            InputField::LungFunction => Some(self.lung_function_percent),
            InputField::TransfusedBlood => Some(self.transfused_blood_ml),
            InputField::TransfusedPlasma => Some(self.transfused_plasma_ml),
            InputField::BodyWeight => Some(self.body_weight_kg),
        }
    }

    /// 숫자 항목을 바꾼다. 시간 항목이면 아무 것도 하지 않고 false를 반환한다.
    pub fn set_numeric(&mut self, field: InputField, value: f64) -> bool {
        let slot = match field {
            InputField::BloodLoss => &mut self.blood_loss_ml,
            InputField::TimeSinceInjury => return false,
            InputField::LungFunction => &mut self.lung_function_percent,
            InputField::TransfusedBlood => &mut self.transfused_blood_ml,
            InputField::TransfusedPlasma => &mut self.transfused_plasma_ml,
            InputField::BodyWeight => &mut self.body_weight_kg,
        };
        *slot = value;
        true
    }

    /// 폼 문자열로 항목을 바꾼다. 숫자 항목은 [`parse_number`] 규칙을 따른다.
    pub fn set_from_text(&mut self, field: InputField, text: &str) {
        if field.is_numeric() {
            self.set_numeric(field, parse_number(text));
        } else {
            self.time_since_injury = text.to_string();
        }
    }

    /// 폼에 다시 채울 문자열 표현.
    pub fn display_value(&self, field: InputField) -> String {
        match self.numeric(field) {
            Some(v) => format_number(v),
            None => self.time_since_injury.clone(),
        }
    }
}

/// 브라우저 숫자 입력처럼 해석한다: 빈 문자열은 0, 해석 불가는 NaN.
pub fn parse_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        let text = if value > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_form() {
        let input = SimulationInput::default();
        assert_eq!(input.blood_loss_ml, 0.0);
        assert_eq!(input.time_since_injury, "00:00");
        assert_eq!(input.lung_function_percent, 100.0);
        assert_eq!(input.body_weight_kg, 70.0);
    }

    #[test]
    fn parse_number_like_form() {
        assert_eq!(parse_number(" 1500 "), 1500.0);
        assert_eq!(parse_number(""), 0.0);
        assert!(parse_number("abc").is_nan());
        assert_eq!(parse_number("2.5e3"), 2500.0);
    }

    #[test]
    fn time_field_is_text() {
        let mut input = SimulationInput::default();
        input.set_from_text(InputField::TimeSinceInjury, "01:30");
        assert_eq!(input.time_since_injury, "01:30");
        assert!(!input.set_numeric(InputField::TimeSinceInjury, 3.0));
        assert_eq!(input.numeric(InputField::TimeSinceInjury), None);
    }

    #[test]
    fn key_lookup_is_case_insensitive() {
        assert_eq!(InputField::from_key("BODYWEIGHT"), Some(InputField::BodyWeight));
        assert_eq!(InputField::from_key("pulse"), None);
        assert_eq!(
            SimulationInput::default().display_value(InputField::BodyWeight),
            "70"
        );
    }
}
