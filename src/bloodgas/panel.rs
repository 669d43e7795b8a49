use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::readout::ReadoutName;

/// 분석기 카트리지 종류. 한 번에 보여 줄 판독 항목 묶음을 정한다.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum PanelType {
    /// 13개 항목 전체
    #[default]
    Cg8,
    /// pH, pCO2, pO2, Laktat, BE, HCO3
    Cg4,
}

const CG4_FIELDS: [ReadoutName; 6] = [
    ReadoutName::Ph,
    ReadoutName::PCo2,
    ReadoutName::PO2,
    ReadoutName::Laktat,
    ReadoutName::Be,
    ReadoutName::Hco3,
];

impl PanelType {
    pub const ALL: [PanelType; 2] = [PanelType::Cg8, PanelType::Cg4];

    /// 파일 이름/설정에 쓰는 소문자 코드.
    pub fn code(self) -> &'static str {
        match self {
            PanelType::Cg8 => "cg8",
            PanelType::Cg4 => "cg4",
        }
    }

    /// 화면 제목에 쓰는 대문자 이름.
    pub fn label(self) -> &'static str {
        match self {
            PanelType::Cg8 => "CG8",
            PanelType::Cg4 => "CG4",
        }
    }

    /// 표시 순서대로 나열한 항목.
    pub fn fields(self) -> &'static [ReadoutName] {
        match self {
            PanelType::Cg8 => &ReadoutName::ALL,
            PanelType::Cg4 => &CG4_FIELDS,
        }
    }

    pub fn shows(self, name: ReadoutName) -> bool {
        self.fields().contains(&name)
    }
}

impl fmt::Display for PanelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PanelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cg8" => Ok(PanelType::Cg8),
            "cg4" => Ok(PanelType::Cg4),
            other => Err(format!("unknown panel type: {other}")),
        }
    }
}
