//! 评估能力 - 业务能力层
//!
//! 两种实现共用同一个 trait：
//! - `LocalRuleAnalyzer` - 本地规则（正则 + 计数），不需要凭证
//! - `DelegatedAnalyzer` - 委托给外部 LLM 服务，需要凭证
//!
//! 编排层只依赖 `Arc<dyn AssessmentAnalyzer>`，不关心具体实现。

pub mod delegated;
pub mod local;
pub mod prompts;

pub use delegated::DelegatedAnalyzer;
pub use local::LocalRuleAnalyzer;

use crate::config::{AnalyzerMode, Config};
use crate::error::{AnalysisError, AssessError};
use crate::models::assessment::Assessment;
use crate::models::document::Credential;
use async_trait::async_trait;
use std::sync::Arc;

/// 对一份文档的完整文本给出三项评估
#[async_trait]
pub trait AssessmentAnalyzer: Send + Sync {
    /// 名称，用于日志
    fn name(&self) -> &'static str;

    /// 是否需要凭证；为 true 时编排层在处理任何文档前先校验凭证
    fn requires_credential(&self) -> bool {
        false
    }

    async fn assess(
        &self,
        text: &str,
        credential: Option<&Credential>,
    ) -> Result<Assessment, AssessError>;
}

/// 按配置构建评估器
pub fn build_analyzer(config: &Config) -> Result<Arc<dyn AssessmentAnalyzer>, AnalysisError> {
    let analyzer: Arc<dyn AssessmentAnalyzer> = match config.analyzer_mode {
        AnalyzerMode::Local => Arc::new(LocalRuleAnalyzer),
        AnalyzerMode::Delegated => Arc::new(DelegatedAnalyzer::from_config(config)?),
    };
    Ok(analyzer)
}
