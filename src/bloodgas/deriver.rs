use super::format::format_fixed;
use super::input::SimulationInput;
use super::readout::{ReadoutName, ReadoutSet};

/// 체중 1 kg당 추정 혈액량 [ml/kg]
pub const BLOOD_VOLUME_ML_PER_KG: f64 = 70.0;
/// 수혈 효과 환산 단위 [ml] (전혈 1단위)
pub const TRANSFUSION_UNIT_ML: f64 = 500.0;

/// 도출 과정의 중간 지표.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeverityIndex {
    /// 추정 혈액량 [ml]
    pub estimated_blood_volume_ml: f64,
    /// 혈액량 대비 출혈 비율. 상한 1.
    pub blood_loss_fraction: f64,
    /// 호흡 장애 지표 = 1 - 폐기능/100
    pub lung_factor: f64,
    /// 수혈 단위 수 = 수혈량/500
    pub transfusion_units: f64,
}

impl SeverityIndex {
    pub fn from_input(input: &SimulationInput) -> Self {
        let estimated_blood_volume_ml = input.body_weight_kg * BLOOD_VOLUME_ML_PER_KG;
        // f64::min은 NaN을 버리므로 직접 비교해 NaN을 그대로 전파한다.
        let ratio = input.blood_loss_ml / estimated_blood_volume_ml;
        let blood_loss_fraction = if ratio > 1.0 { 1.0 } else { ratio };
        Self {
            estimated_blood_volume_ml,
            blood_loss_fraction,
            lung_factor: 1.0 - input.lung_function_percent / 100.0,
            transfusion_units: input.transfused_blood_ml / TRANSFUSION_UNIT_ML,
        }
    }
}

/// 입력으로부터 13개 판독값 전체를 도출한다.
///
/// 순수 함수이며 실패하지 않는다. 체중 0 같은 입력은 Infinity/NaN이 되어 문자열로 남는다.
pub fn derive(input: &SimulationInput) -> ReadoutSet {
    let idx = SeverityIndex::from_input(input);
    let f = idx.blood_loss_fraction;
    let lung = idx.lung_factor;
    let units = idx.transfusion_units;

    ReadoutSet::from_fn(|name| match name {
        ReadoutName::Ph => format_fixed(7.4 - 0.1 * f, 2),
        ReadoutName::PCo2 => format_fixed(5.3 + 0.5 * lung, 1),
        ReadoutName::PO2 => format_fixed(12.0 - 4.0 * lung, 1),
        ReadoutName::Na => "138".to_string(),
        ReadoutName::K => format_fixed(4.0 + 0.3 * f, 1),
        ReadoutName::ICa => format_fixed(1.15 - 0.05 * f, 2),
        ReadoutName::Glukos => "6.2".to_string(),
        ReadoutName::Laktat => format_fixed(1.0 + 5.0 * f, 1),
        ReadoutName::Hct => format_fixed(40.0 - 15.0 * f + 5.0 * units, 0),
        ReadoutName::Hb => format_fixed((13.5 - 5.0 * f + 2.0 * units) * 10.0, 0),
        ReadoutName::Be => format_fixed(-7.0 * f, 1),
        ReadoutName::Hco3 => format_fixed(24.0 - 6.0 * f, 1),
        ReadoutName::So2 => format_fixed(98.0 - 10.0 * lung, 0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_caps_at_one() {
        let input = SimulationInput {
            blood_loss_ml: 10_000.0,
            ..SimulationInput::default()
        };
        let idx = SeverityIndex::from_input(&input);
        assert_eq!(idx.estimated_blood_volume_ml, 4900.0);
        assert_eq!(idx.blood_loss_fraction, 1.0);
    }

    #[test]
    fn nan_input_propagates() {
        let input = SimulationInput {
            blood_loss_ml: f64::NAN,
            ..SimulationInput::default()
        };
        let idx = SeverityIndex::from_input(&input);
        assert!(idx.blood_loss_fraction.is_nan());
    }

    #[test]
    fn transfusion_raises_hct_and_hb() {
        let input = SimulationInput {
            transfused_blood_ml: 500.0,
            ..SimulationInput::default()
        };
        let set = derive(&input);
        assert_eq!(set.value(ReadoutName::Hct), "45");
        assert_eq!(set.value(ReadoutName::Hb), "155");
    }
}
