//! 두 실행 파일(GUI/CLI)이 공유하는 명령줄 인자.
//!
//! ```bash
//! istat_simulator --lang en --panel cg4
//! istat_simulator_cli --blood-loss 1500 --body-weight 80 --generate
//! istat_simulator_cli --log-level debug
//! ```

use clap::Parser;

use crate::bloodgas::{InputField, PanelType};
use crate::view_state::ViewState;

/// i-STAT 혈액가스 판독 시뮬레이터
#[derive(Parser, Debug, Clone)]
#[command(name = "istat-simulator")]
#[command(version)]
#[command(about = "Simulated i-STAT blood gas readouts for trauma training", long_about = None)]
pub struct Args {
    /// 언어 코드 (auto, sv-se, en-us)
    #[arg(short = 'L', long, default_value = "auto", value_name = "CODE")]
    pub lang: String,

    /// 시작 패널 (설정 파일 값보다 우선)
    #[arg(long, value_enum)]
    pub panel: Option<PanelType>,

    /// 로그 레벨 (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", value_name = "LEVEL")]
    pub log_level: String,

    /// 출혈량 [ml]
    #[arg(long, value_name = "ML", allow_negative_numbers = true)]
    pub blood_loss: Option<f64>,

    /// 부상 후 경과 시간 (hh:mm)
    #[arg(long, value_name = "HH:MM")]
    pub time_since_injury: Option<String>,

    /// 폐 기능 [%]
    #[arg(long, value_name = "PERCENT", allow_negative_numbers = true)]
    pub lung_function: Option<f64>,

    /// 수혈한 전혈량 [ml]
    #[arg(long, value_name = "ML", allow_negative_numbers = true)]
    pub transfused_blood: Option<f64>,

    /// 수혈한 혈장량 [ml]
    #[arg(long, value_name = "ML", allow_negative_numbers = true)]
    pub transfused_plasma: Option<f64>,

    /// 체중 [kg]
    #[arg(long, value_name = "KG", allow_negative_numbers = true)]
    pub body_weight: Option<f64>,

    /// 시작하자마자 판독값을 생성한다
    #[arg(long)]
    pub generate: bool,
}

impl Args {
    /// env_logger를 인자의 로그 레벨로 초기화한다. RUST_LOG가 있으면 그쪽이 우선한다.
    pub fn init_logging(&self) {
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(self.log_level.as_str()),
        )
        .init();
    }

    /// 인자로 넘어온 입력 값을 상태에 채우고, 요청 시 바로 생성한다.
    pub fn apply_to(&self, state: &mut ViewState) {
        let numeric = [
            (InputField::BloodLoss, self.blood_loss),
            (InputField::LungFunction, self.lung_function),
            (InputField::TransfusedBlood, self.transfused_blood),
            (InputField::TransfusedPlasma, self.transfused_plasma),
            (InputField::BodyWeight, self.body_weight),
        ];
        for (field, value) in numeric {
            if let Some(v) = value {
                state.set_input_value(field, v);
            }
        }
        if let Some(t) = &self.time_since_injury {
            state.set_input(InputField::TimeSinceInjury, t);
        }
        if let Some(panel) = self.panel {
            state.select_panel(panel);
        }
        if self.generate {
            state.generate();
        }
    }
}
