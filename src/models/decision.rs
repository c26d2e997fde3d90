use serde::{Deserialize, Serialize};
use std::fmt;

/// 最终审核结论
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    /// 全部通过：提交 SERE
    Approve,
    /// 一项未通过：附 ressalvas 提交
    ApproveWithCaveats,
    /// 两项及以上未通过：退回导师
    Reject,
}

impl Decision {
    /// 结果卡片上显示的文字
    pub fn label(self) -> &'static str {
        match self {
            Decision::Approve => "Enviar para SERE",
            Decision::ApproveWithCaveats => "Enviar com ressalvas",
            Decision::Reject => "Devolver para tutora",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Decision::Approve => "✅",
            Decision::ApproveWithCaveats => "⚠️",
            Decision::Reject => "❌",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.icon(), self.label())
    }
}
