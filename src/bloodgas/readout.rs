use std::fmt;

/// 분석기 화면에 표시되는 판독 항목. CG8 표시 순서와 같다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReadoutName {
    Ph,
    PCo2,
    PO2,
    Na,
    K,
    ICa,
    Glukos,
    Laktat,
    Hct,
    Hb,
    Be,
    Hco3,
    So2,
}

impl ReadoutName {
    pub const ALL: [ReadoutName; 13] = [
        ReadoutName::Ph,
        ReadoutName::PCo2,
        ReadoutName::PO2,
        ReadoutName::Na,
        ReadoutName::K,
        ReadoutName::ICa,
        ReadoutName::Glukos,
        ReadoutName::Laktat,
        ReadoutName::Hct,
        ReadoutName::Hb,
        ReadoutName::Be,
        ReadoutName::Hco3,
        ReadoutName::So2,
    ];

    /// 화면에 찍히는 항목 이름.
    pub fn label(self) -> &'static str {
        match self {
            ReadoutName::Ph => "pH",
            ReadoutName::PCo2 => "pCO2",
            ReadoutName::PO2 => "pO2",
            ReadoutName::Na => "Na",
            ReadoutName::K => "K",
            ReadoutName::ICa => "iCa",
            ReadoutName::Glukos => "Glukos",
            ReadoutName::Laktat => "Laktat",
            ReadoutName::Hct => "Hct",
            ReadoutName::Hb => "Hb",
            ReadoutName::Be => "BE",
            ReadoutName::Hco3 => "HCO3",
            ReadoutName::So2 => "SO2",
        }
    }

    /// 항목별 고정 단위. pH는 단위가 없다.
    pub fn unit(self) -> &'static str {
        match self {
            ReadoutName::Ph => "",
            ReadoutName::PCo2 | ReadoutName::PO2 => "kPa",
            ReadoutName::Na
            | ReadoutName::K
            | ReadoutName::ICa
            | ReadoutName::Glukos
            | ReadoutName::Laktat
            | ReadoutName::Be
            | ReadoutName::Hco3 => "mmol/L",
            ReadoutName::Hct | ReadoutName::So2 => "%",
            ReadoutName::Hb => "g/L",
        }
    }

    /// 이름으로 항목을 찾는다(대소문자 무시).
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|n| n.label().eq_ignore_ascii_case(label))
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ReadoutName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 판독 항목 하나. 값은 사용자가 자유롭게 고칠 수 있는 표시 문자열이고 단위는 고정이다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadoutField {
    name: ReadoutName,
    value: String,
}

impl ReadoutField {
    pub fn new(name: ReadoutName, value: impl Into<String>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }

    pub fn name(&self) -> ReadoutName {
        self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn unit(&self) -> &'static str {
        self.name.unit()
    }

    /// "7.40", "5.3 kPa"처럼 값과 단위를 붙인 표시 문자열.
    pub fn display(&self) -> String {
        let unit = self.unit();
        if unit.is_empty() {
            self.value.clone()
        } else {
            format!("{} {unit}", self.value)
        }
    }
}

/// 13개 판독 항목 전체. 항상 모든 항목을 담으며 패널 종류는 표시만 거른다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadoutSet {
    fields: [ReadoutField; 13],
}

impl ReadoutSet {
    /// 항목마다 값을 만들어 전체 집합을 구성한다.
    pub fn from_fn<F>(mut value_of: F) -> Self
    where
        F: FnMut(ReadoutName) -> String,
    {
        Self {
            fields: ReadoutName::ALL.map(|name| ReadoutField::new(name, value_of(name))),
        }
    }

    pub fn get(&self, name: ReadoutName) -> &ReadoutField {
        &self.fields[name.index()]
    }

    pub fn value(&self, name: ReadoutName) -> &str {
        self.get(name).value()
    }

    /// 한 항목의 표시 값만 바꾼다. 단위와 다른 항목은 그대로다.
    pub fn set_value(&mut self, name: ReadoutName, value: impl Into<String>) {
        self.fields[name.index()].value = value.into();
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReadoutField> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_value_touches_one_field() {
        let mut set = ReadoutSet::from_fn(|n| n.label().to_lowercase());
        let before = set.clone();
        set.set_value(ReadoutName::K, "5.9");
        for name in ReadoutName::ALL {
            if name == ReadoutName::K {
                assert_eq!(set.value(name), "5.9");
                assert_eq!(set.get(name).unit(), "mmol/L");
            } else {
                assert_eq!(set.get(name), before.get(name));
            }
        }
    }

    #[test]
    fn display_joins_unit() {
        assert_eq!(ReadoutField::new(ReadoutName::Ph, "7.40").display(), "7.40");
        assert_eq!(ReadoutField::new(ReadoutName::Hb, "135").display(), "135 g/L");
        assert_eq!(ReadoutName::from_label("hco3"), Some(ReadoutName::Hco3));
    }
}
