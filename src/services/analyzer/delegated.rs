//! 委托评估器
//!
//! 把文本（截断后）连同评估规则发给兼容 OpenAI 的服务，解析返回的 JSON 对象。

use super::prompts::{build_assessment_prompt, SYSTEM_MESSAGE};
use super::AssessmentAnalyzer;
use crate::clients::LlmClient;
use crate::config::Config;
use crate::error::{AnalysisError, AssessError};
use crate::models::assessment::Assessment;
use crate::models::document::Credential;
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

pub struct DelegatedAnalyzer {
    client: LlmClient,
    max_prompt_chars: usize,
}

impl DelegatedAnalyzer {
    pub fn new(client: LlmClient, max_prompt_chars: usize) -> Self {
        Self {
            client,
            max_prompt_chars,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, AnalysisError> {
        Ok(Self::new(LlmClient::new(config)?, config.max_prompt_chars))
    }
}

#[async_trait]
impl AssessmentAnalyzer for DelegatedAnalyzer {
    fn name(&self) -> &'static str {
        "delegated-llm"
    }

    fn requires_credential(&self) -> bool {
        true
    }

    async fn assess(
        &self,
        text: &str,
        credential: Option<&Credential>,
    ) -> Result<Assessment, AssessError> {
        let credential = credential.ok_or_else(|| AnalysisError::Unauthorized {
            message: "未提供 API 密钥".to_string(),
        })?;

        let sent = truncate_chars(text, self.max_prompt_chars);
        if sent.len() < text.len() {
            debug!(
                "文本已截断: {} → {} 字符",
                text.chars().count(),
                self.max_prompt_chars
            );
        }

        let prompt = build_assessment_prompt(sent);
        let reply = self
            .client
            .chat_json(&prompt, Some(SYSTEM_MESSAGE), credential)
            .await?;

        parse_reply(&reply)
    }
}

/// 按字符（而非字节）截断
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// 部分模型会把 JSON 包在 ``` 代码块里
fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// 解析返回内容
///
/// 不是 JSON 对象 → `MalformedResponse`；是对象但不符合约定 → `ContractViolation`。
pub(crate) fn parse_reply(reply: &str) -> Result<Assessment, AssessError> {
    let body = strip_code_fence(reply);
    let value: JsonValue = serde_json::from_str(body).map_err(|e| {
        warn!("返回内容不是有效 JSON: {}", e);
        AnalysisError::MalformedResponse {
            message: format!("返回内容不是有效 JSON: {}", e),
        }
    })?;

    if !value.is_object() {
        return Err(AnalysisError::MalformedResponse {
            message: "返回内容不是 JSON 对象".to_string(),
        }
        .into());
    }

    Ok(Assessment::from_json(&value)?)
}
