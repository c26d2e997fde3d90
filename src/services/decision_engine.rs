//! 决策引擎 - 业务能力层
//!
//! 只根据 `Assessment` 计算结论和 ressalvas，无状态、无 I/O。

use crate::models::assessment::{keys, Assessment, Criterion};
use crate::models::decision::Decision;

/// 根据未通过的评估项数量给出结论
///
/// - 0 项未通过 → `Approve`
/// - 1 项未通过 → `ApproveWithCaveats`
/// - 2 项及以上 → `Reject`
pub fn determine_decision(assessment: &Assessment) -> Decision {
    match assessment.failed_count() {
        0 => Decision::Approve,
        1 => Decision::ApproveWithCaveats,
        _ => Decision::Reject,
    }
}

/// 按固定顺序为每个未通过的评估项生成一条 ressalva
pub fn extract_caveats(assessment: &Assessment) -> Vec<String> {
    assessment
        .verdicts()
        .filter(|(_, verdict)| !verdict.passed)
        .map(|(criterion, verdict)| match criterion {
            Criterion::RegistroAvaliacao => {
                "Registro de avaliação não conforme com o padrão exigido".to_string()
            }
            Criterion::ObjetivosConteudo => {
                "Objetivos ausentes ou insuficientes nos registros de conteúdo".to_string()
            }
            Criterion::Frequencias => {
                let total = verdict
                    .count(keys::TOTAL)
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "?".to_string());
                format!("Frequências inválidas (total: {})", total)
            }
        })
        .collect()
}
