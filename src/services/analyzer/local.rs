//! 本地规则评估器

use super::AssessmentAnalyzer;
use crate::error::AssessError;
use crate::models::assessment::Assessment;
use crate::models::document::Credential;
use crate::services::rules;
use async_trait::async_trait;
use tracing::debug;

/// 纯本地评估，忽略凭证，永远不会失败
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalRuleAnalyzer;

#[async_trait]
impl AssessmentAnalyzer for LocalRuleAnalyzer {
    fn name(&self) -> &'static str {
        "local-rules"
    }

    async fn assess(
        &self,
        text: &str,
        _credential: Option<&Credential>,
    ) -> Result<Assessment, AssessError> {
        let assessment = rules::assess_text(text);
        debug!(
            "本地规则评估完成: {} 项未通过",
            assessment.failed_count()
        );
        Ok(assessment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_analyzer_ignores_credential() {
        let analyzer = LocalRuleAnalyzer;
        let text = "Sem nada de relevante aqui.";
        let without = analyzer.assess(text, None).await.unwrap();
        let credential = Credential::parse("gsk_qualquer").unwrap();
        let with = analyzer.assess(text, Some(&credential)).await.unwrap();
        assert_eq!(without, with);
        assert_eq!(without.failed_count(), 3);
    }
}
