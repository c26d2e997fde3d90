//! Validação por regras - 业务能力层
//!
//! 三个评估项各对应一个纯函数：输入完整文本，输出 `CriterionVerdict`。
//! 所有函数不做 I/O、不会 panic，同样的输入总是得到同样的输出。

pub mod frequencias;
pub mod objetivos;
pub mod registro;

pub use frequencias::{validate_frequencias, MAX_ATTENDANCE_TOTAL, MIN_ATTENDANCE_TOTAL};
pub use objetivos::validate_objetivos_conteudo;
pub use registro::validate_registro_avaliacao;

use crate::models::assessment::Assessment;

/// 用三条规则评估整段文本
pub fn assess_text(text: &str) -> Assessment {
    Assessment {
        registro_avaliacao: validate_registro_avaliacao(text),
        objetivos_conteudo: validate_objetivos_conteudo(text),
        frequencias: validate_frequencias(text),
    }
}
