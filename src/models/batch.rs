//! 批次运行的结果与进度模型

use crate::error::{DocumentError, ErrorKind};
use crate::models::assessment::Assessment;
use crate::models::decision::Decision;
use serde::Serialize;

/// 单个文档的处理结果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    /// 在批次中的位置（从 0 开始）
    pub index: usize,
    pub name: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Outcome {
    Reviewed {
        decision: Decision,
        assessment: Assessment,
        caveats: Vec<String>,
    },
    Failed {
        kind: ErrorKind,
        message: String,
    },
}

impl BatchResult {
    pub fn reviewed(
        index: usize,
        name: impl Into<String>,
        decision: Decision,
        assessment: Assessment,
        caveats: Vec<String>,
    ) -> Self {
        Self {
            index,
            name: name.into(),
            outcome: Outcome::Reviewed {
                decision,
                assessment,
                caveats,
            },
        }
    }

    pub fn failed(index: usize, name: impl Into<String>, error: &DocumentError) -> Self {
        Self {
            index,
            name: name.into(),
            outcome: Outcome::Failed {
                kind: error.kind(),
                message: error.to_string(),
            },
        }
    }

    pub fn cancelled(index: usize, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
            outcome: Outcome::Failed {
                kind: ErrorKind::Cancelled,
                message: "批次已取消，文档未处理".to_string(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Reviewed { .. })
    }

    pub fn decision(&self) -> Option<Decision> {
        match &self.outcome {
            Outcome::Reviewed { decision, .. } => Some(*decision),
            Outcome::Failed { .. } => None,
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match &self.outcome {
            Outcome::Failed { kind, .. } => Some(*kind),
            Outcome::Reviewed { .. } => None,
        }
    }
}

/// 批次进度
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressState {
    pub completed_count: usize,
    pub total_count: usize,
    pub current_document: Option<String>,
}

impl ProgressState {
    pub fn new(total_count: usize) -> Self {
        Self {
            completed_count: 0,
            total_count,
            current_document: None,
        }
    }

    pub(crate) fn mark_completed(&mut self) {
        self.completed_count = (self.completed_count + 1).min(self.total_count);
    }

    pub fn is_finished(&self) -> bool {
        self.completed_count == self.total_count
    }
}

/// 批次状态机: Idle → Running → {Completed, Failed}
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BatchState {
    #[default]
    Idle,
    Running,
    Completed,
    Failed,
}

/// 结果汇总
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub total: usize,
    pub approved: usize,
    pub approved_with_caveats: usize,
    pub rejected: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_results(results: &[BatchResult]) -> Self {
        let mut summary = Self {
            total: results.len(),
            ..Default::default()
        };
        for result in results {
            match result.decision() {
                Some(Decision::Approve) => summary.approved += 1,
                Some(Decision::ApproveWithCaveats) => summary.approved_with_caveats += 1,
                Some(Decision::Reject) => summary.rejected += 1,
                None => summary.failed += 1,
            }
        }
        summary
    }

    pub fn succeeded(&self) -> usize {
        self.total - self.failed
    }
}
