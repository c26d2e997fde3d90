//! 文档处理流程 - 流程层
//!
//! 核心职责：定义"一份文档"的完整处理流程
//!
//! 流程顺序：
//! 1. 提取文本
//! 2. 评估（本地规则或外部服务）
//! 3. 决策 + ressalvas

use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{CredentialError, DocumentError};
use crate::infrastructure::TextExtractor;
use crate::models::assessment::Assessment;
use crate::models::decision::Decision;
use crate::models::document::{Credential, Document};
use crate::services::analyzer::AssessmentAnalyzer;
use crate::services::decision_engine::{determine_decision, extract_caveats};
use crate::workflow::document_ctx::DocumentCtx;

/// 审核通过流程的文档
#[derive(Debug, Clone)]
pub struct ReviewedDocument {
    pub decision: Decision,
    pub assessment: Assessment,
    pub caveats: Vec<String>,
}

/// 文档处理流程
///
/// - 只处理单个文档，不知道批次、窗口或并发
/// - 不持有稀缺资源，能力通过 trait 对象注入
/// - 可以安全地在多个任务间共享（`Arc<DocumentFlow>`）
pub struct DocumentFlow {
    extractor: Arc<dyn TextExtractor>,
    analyzer: Arc<dyn AssessmentAnalyzer>,
}

impl DocumentFlow {
    pub fn new(extractor: Arc<dyn TextExtractor>, analyzer: Arc<dyn AssessmentAnalyzer>) -> Self {
        Self {
            extractor,
            analyzer,
        }
    }

    /// 在处理任何文档之前校验凭证
    ///
    /// 评估器不需要凭证时返回 `None`，空字符串也允许。
    pub fn resolve_credential(&self, raw: &str) -> Result<Option<Credential>, CredentialError> {
        if self.analyzer.requires_credential() {
            Credential::parse(raw).map(Some)
        } else {
            Ok(Credential::parse(raw).ok())
        }
    }

    pub async fn process(
        &self,
        ctx: &DocumentCtx,
        document: &Document,
        credential: Option<&Credential>,
    ) -> Result<ReviewedDocument, DocumentError> {
        info!("{} 📄 提取文本...", ctx);
        let text = self.extractor.extract(document).await?;
        debug!("{} 文本长度: {} 字符", ctx, text.chars().count());

        info!("{} 🔍 评估中 ({})...", ctx, self.analyzer.name());
        let assessment = self.analyzer.assess(&text, credential).await?;

        let decision = determine_decision(&assessment);
        let caveats = extract_caveats(&assessment);
        info!("{} ✓ 结论: {}", ctx, decision);
        for caveat in &caveats {
            debug!("{}   - {}", ctx, caveat);
        }

        Ok(ReviewedDocument {
            decision,
            assessment,
            caveats,
        })
    }
}
