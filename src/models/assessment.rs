//! 评估结果模型
//!
//! `Assessment` 固定包含三个评估项，类型层面保证不会缺项；
//! 来自外部服务的 JSON 通过 `Assessment::from_json` 进入，缺项、多项或类型错误
//! 均视为 `ContractViolation`。

use crate::error::ContractViolation;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;

/// 测量值的键
pub mod keys {
    pub const FOUND_RESOLUTIONS: &str = "foundResolutions";
    pub const TOTAL: &str = "total";
    pub const RECORDS: &str = "registros";
    pub const OBJECTIVES: &str = "objetivos";
    pub const MARKERS: &str = "marcadores";
    pub const DATES: &str = "datas";
}

/// 单个测量值：数值或字符串列表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Measurement {
    Count(i64),
    Labels(Vec<String>),
}

/// 单个评估项的结论
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionVerdict {
    pub passed: bool,
    pub details: String,
    #[serde(default)]
    pub measurements: BTreeMap<String, Measurement>,
}

impl CriterionVerdict {
    pub fn new(passed: bool, details: impl Into<String>) -> Self {
        Self {
            passed,
            details: details.into(),
            measurements: BTreeMap::new(),
        }
    }

    pub fn with_count(mut self, key: &str, value: i64) -> Self {
        self.measurements
            .insert(key.to_string(), Measurement::Count(value));
        self
    }

    pub fn with_labels(mut self, key: &str, labels: Vec<String>) -> Self {
        self.measurements
            .insert(key.to_string(), Measurement::Labels(labels));
        self
    }

    pub fn count(&self, key: &str) -> Option<i64> {
        match self.measurements.get(key) {
            Some(Measurement::Count(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn labels(&self, key: &str) -> Option<&[String]> {
        match self.measurements.get(key) {
            Some(Measurement::Labels(labels)) => Some(labels),
            _ => None,
        }
    }
}

/// 评估项
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Criterion {
    RegistroAvaliacao,
    ObjetivosConteudo,
    Frequencias,
}

impl Criterion {
    /// 固定顺序，决定 ressalvas 的排列
    pub const ALL: [Criterion; 3] = [
        Criterion::RegistroAvaliacao,
        Criterion::ObjetivosConteudo,
        Criterion::Frequencias,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Criterion::RegistroAvaliacao => "registroAvaliacao",
            Criterion::ObjetivosConteudo => "objetivosConteudo",
            Criterion::Frequencias => "frequencias",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }
}

/// 一份文档的完整评估
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub registro_avaliacao: CriterionVerdict,
    pub objetivos_conteudo: CriterionVerdict,
    pub frequencias: CriterionVerdict,
}

impl Assessment {
    pub fn verdict(&self, criterion: Criterion) -> &CriterionVerdict {
        match criterion {
            Criterion::RegistroAvaliacao => &self.registro_avaliacao,
            Criterion::ObjetivosConteudo => &self.objetivos_conteudo,
            Criterion::Frequencias => &self.frequencias,
        }
    }

    /// 按固定顺序遍历
    pub fn verdicts(&self) -> impl Iterator<Item = (Criterion, &CriterionVerdict)> + '_ {
        Criterion::ALL.into_iter().map(move |c| (c, self.verdict(c)))
    }

    pub fn failed_count(&self) -> usize {
        self.verdicts().filter(|(_, v)| !v.passed).count()
    }

    /// 从外部服务返回的 JSON 构建评估，严格校验结构
    pub fn from_json(value: &JsonValue) -> Result<Self, ContractViolation> {
        let object = value.as_object().ok_or(ContractViolation::NotAnObject)?;

        if let Some(extra) = object.keys().find(|k| Criterion::from_key(k).is_none()) {
            return Err(ContractViolation::UnexpectedCriterion(extra.clone()));
        }

        Ok(Self {
            registro_avaliacao: parse_verdict(object, Criterion::RegistroAvaliacao)?,
            objetivos_conteudo: parse_verdict(object, Criterion::ObjetivosConteudo)?,
            frequencias: parse_verdict(object, Criterion::Frequencias)?,
        })
    }
}

fn parse_verdict(
    object: &Map<String, JsonValue>,
    criterion: Criterion,
) -> Result<CriterionVerdict, ContractViolation> {
    let name = criterion.key();
    let entry = object
        .get(name)
        .ok_or_else(|| ContractViolation::MissingCriterion(name.to_string()))?
        .as_object()
        .ok_or(ContractViolation::WrongType {
            criterion: name,
            field: "verdict",
            expected: "object",
        })?;

    let field = |field: &'static str| {
        entry.get(field).ok_or(ContractViolation::MissingField {
            criterion: name,
            field,
        })
    };
    let wrong_type = |field: &'static str, expected: &'static str| ContractViolation::WrongType {
        criterion: name,
        field,
        expected,
    };

    let passed = field("passed")?
        .as_bool()
        .ok_or_else(|| wrong_type("passed", "boolean"))?;
    let details = field("details")?
        .as_str()
        .ok_or_else(|| wrong_type("details", "string"))?;

    let mut verdict = CriterionVerdict::new(passed, details);

    match criterion {
        Criterion::RegistroAvaliacao => {
            let found = field(keys::FOUND_RESOLUTIONS)?
                .as_array()
                .ok_or_else(|| wrong_type(keys::FOUND_RESOLUTIONS, "array of strings"))?
                .iter()
                .map(|v| v.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| wrong_type(keys::FOUND_RESOLUTIONS, "array of strings"))?;
            verdict = verdict.with_labels(keys::FOUND_RESOLUTIONS, found);
        }
        Criterion::Frequencias => {
            let total = field(keys::TOTAL)?
                .as_i64()
                .ok_or_else(|| wrong_type(keys::TOTAL, "integer"))?;
            verdict = verdict.with_count(keys::TOTAL, total);
        }
        Criterion::ObjetivosConteudo => {}
    }

    Ok(verdict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_reply() -> JsonValue {
        json!({
            "registroAvaliacao": {
                "passed": true,
                "details": "Resoluções encontradas",
                "foundResolutions": ["3.037/2024", "7.342/2024"]
            },
            "objetivosConteudo": { "passed": false, "details": "Sem objetivos" },
            "frequencias": { "passed": true, "details": "44 registros", "total": 44 }
        })
    }

    #[test]
    fn test_from_json_accepts_exact_shape() {
        let assessment = Assessment::from_json(&valid_reply()).unwrap();
        assert!(assessment.registro_avaliacao.passed);
        assert!(!assessment.objetivos_conteudo.passed);
        assert_eq!(assessment.frequencias.count(keys::TOTAL), Some(44));
        assert_eq!(
            assessment.registro_avaliacao.labels(keys::FOUND_RESOLUTIONS),
            Some(&["3.037/2024".to_string(), "7.342/2024".to_string()][..])
        );
        assert_eq!(assessment.failed_count(), 1);
    }

    #[test]
    fn test_from_json_rejects_missing_criterion() {
        let mut reply = valid_reply();
        reply.as_object_mut().unwrap().remove("frequencias");
        assert_eq!(
            Assessment::from_json(&reply),
            Err(ContractViolation::MissingCriterion("frequencias".into()))
        );
    }

    #[test]
    fn test_from_json_rejects_extra_criterion() {
        let mut reply = valid_reply();
        reply["parecerFinal"] = json!({ "passed": true, "details": "" });
        assert_eq!(
            Assessment::from_json(&reply),
            Err(ContractViolation::UnexpectedCriterion("parecerFinal".into()))
        );
    }

    #[test]
    fn test_from_json_rejects_mistyped_fields() {
        let mut reply = valid_reply();
        reply["objetivosConteudo"]["passed"] = json!("false");
        assert!(matches!(
            Assessment::from_json(&reply),
            Err(ContractViolation::WrongType { field: "passed", .. })
        ));

        let mut reply = valid_reply();
        reply["frequencias"]["total"] = json!(44.5);
        assert!(matches!(
            Assessment::from_json(&reply),
            Err(ContractViolation::WrongType { field: "total", .. })
        ));

        let mut reply = valid_reply();
        reply["registroAvaliacao"]
            .as_object_mut()
            .unwrap()
            .remove("foundResolutions");
        assert!(matches!(
            Assessment::from_json(&reply),
            Err(ContractViolation::MissingField {
                field: "foundResolutions",
                ..
            })
        ));
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        assert_eq!(
            Assessment::from_json(&json!([1, 2, 3])),
            Err(ContractViolation::NotAnObject)
        );
    }

    #[test]
    fn test_serializes_with_rubric_keys() {
        let assessment = Assessment::from_json(&valid_reply()).unwrap();
        let value = serde_json::to_value(&assessment).unwrap();
        assert!(value.get("registroAvaliacao").is_some());
        assert_eq!(value["frequencias"]["measurements"]["total"], json!(44));
    }
}
