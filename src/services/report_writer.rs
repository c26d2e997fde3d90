//! 报告写入服务 - 业务能力层
//!
//! 只负责"写 JSON 报告"能力，不关心流程

use crate::models::batch::{BatchResult, BatchSummary};
use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

/// 报告文件内容
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report<'a> {
    generated_at: String,
    summary: &'a BatchSummary,
    results: &'a [BatchResult],
}

/// 报告写入服务
///
/// 每次写入覆盖整个文件。
pub struct ReportWriter {
    report_file_path: String,
}

impl ReportWriter {
    pub fn new() -> Self {
        Self {
            report_file_path: "report.json".to_string(),
        }
    }

    /// 使用自定义文件路径创建
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            report_file_path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.report_file_path
    }

    /// 写入报告
    ///
    /// # 参数
    /// - `results`: 批次结果（提交顺序）
    /// - `summary`: 结论汇总
    pub async fn write(&self, results: &[BatchResult], summary: &BatchSummary) -> Result<()> {
        debug!(
            "写入报告: {} | {} 条结果",
            self.report_file_path,
            results.len()
        );

        let report = Report {
            generated_at: chrono::Local::now().to_rfc3339(),
            summary,
            results,
        };
        let content = serde_json::to_string_pretty(&report).context("无法序列化报告")?;

        tokio::fs::write(&self.report_file_path, content)
            .await
            .with_context(|| format!("无法写入报告文件: {}", self.report_file_path))?;

        Ok(())
    }
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DocumentError, ExtractionError};
    use crate::models::assessment::{Assessment, CriterionVerdict};
    use crate::models::decision::Decision;
    use serde_json::Value as JsonValue;

    #[tokio::test]
    async fn test_write_report() {
        let dir = std::env::temp_dir().join(format!("lrco_report_{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("report.json");

        let assessment = Assessment {
            registro_avaliacao: CriterionVerdict::new(true, "ok"),
            objetivos_conteudo: CriterionVerdict::new(true, "ok"),
            frequencias: CriterionVerdict::new(true, "ok"),
        };
        let results = vec![
            BatchResult::reviewed(0, "a.pdf", Decision::Approve, assessment, vec![]),
            BatchResult::failed(
                1,
                "b.pdf",
                &DocumentError::Extraction(ExtractionError::new("b.pdf", "corrompido")),
            ),
        ];
        let summary = BatchSummary::from_results(&results);

        let writer = ReportWriter::with_path(path.to_string_lossy());
        writer.write(&results, &summary).await.unwrap();

        let content = tokio::fs::read_to_string(&path).await.unwrap();
        let json: JsonValue = serde_json::from_str(&content).unwrap();
        assert!(json["generatedAt"].is_string());
        assert_eq!(json["summary"]["total"], 2);
        assert_eq!(json["summary"]["failed"], 1);
        assert_eq!(json["results"][0]["status"], "reviewed");
        assert_eq!(json["results"][0]["decision"], "APPROVE");
        assert_eq!(json["results"][1]["status"], "failed");
        assert_eq!(json["results"][1]["kind"], "extraction");

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
