//! LLM API 客户端
//!
//! 兼容 OpenAI 的 chat completions 接口（Groq 等）。请求体用 `async-openai` 的类型构建，
//! 通过 `reqwest` 发送，以便按 HTTP 状态码区分错误类别。
use crate::config::Config;
use crate::error::AnalysisError;
use crate::models::document::Credential;
use async_openai::types::chat::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use std::time::Duration;
use tracing::{debug, warn};

/// LLM 客户端
pub struct LlmClient {
    http: reqwest::Client,
    api_base_url: String,
    model_name: String,
    temperature: f32,
}

impl LlmClient {
    /// 创建新的 LLM 客户端
    pub fn new(config: &Config) -> Result<Self, AnalysisError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AnalysisError::Unknown {
                message: format!("无法创建 HTTP 客户端: {}", e),
            })?;

        Ok(Self {
            http,
            api_base_url: config.llm_api_base_url.clone(),
            model_name: config.llm_model_name.clone(),
            temperature: config.llm_temperature,
        })
    }

    /// 发送聊天请求，要求返回 JSON 对象
    ///
    /// # 返回
    /// 返回第一个 choice 的文本内容（未解析）
    pub async fn chat_json(
        &self,
        user_message: &str,
        system_message: Option<&str>,
        credential: &Credential,
    ) -> Result<String, AnalysisError> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", user_message.chars().count());

        let body = self.build_request_body(user_message, system_message)?;
        let url = format!(
            "{}/chat/completions",
            self.api_base_url.trim_end_matches('/')
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(credential.expose())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!("LLM API 请求失败: {}", e);
                AnalysisError::Unknown {
                    message: if e.is_timeout() {
                        format!("请求超时: {}", e)
                    } else {
                        e.to_string()
                    },
                }
            })?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());

        let text = response
            .text()
            .await
            .map_err(|e| AnalysisError::MalformedResponse {
                message: format!("无法读取响应体: {}", e),
            })?;

        if !status.is_success() {
            let err = classify_failure(status.as_u16(), retry_after, &text);
            warn!("LLM API 返回错误 (HTTP {}): {}", status.as_u16(), err);
            return Err(err);
        }

        debug!("LLM API 调用成功");
        extract_content(&text)
    }

    /// 构建请求体
    fn build_request_body(
        &self,
        user_message: &str,
        system_message: Option<&str>,
    ) -> Result<JsonValue, AnalysisError> {
        let mut messages = Vec::new();

        if let Some(sys_msg) = system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()
                .map_err(invalid_request)?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()
            .map_err(invalid_request)?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(self.temperature)
            .build()
            .map_err(invalid_request)?;

        let mut body = serde_json::to_value(&request).map_err(invalid_request)?;
        if let Some(object) = body.as_object_mut() {
            object.insert(
                "response_format".to_string(),
                json!({ "type": "json_object" }),
            );
        }
        Ok(body)
    }
}

fn invalid_request(err: impl std::fmt::Display) -> AnalysisError {
    AnalysisError::MalformedRequest {
        message: format!("无法构建请求: {}", err),
    }
}

/// 根据 HTTP 状态码和错误信息归类
pub(crate) fn classify_failure(status: u16, retry_after: Option<u64>, body: &str) -> AnalysisError {
    let message = error_message(body).unwrap_or_else(|| format!("HTTP {}", status));
    let lower = message.to_lowercase();

    match status {
        401 | 403 => AnalysisError::Unauthorized { message },
        429 => AnalysisError::RateLimited {
            retry_after,
            message,
        },
        // 部分服务用 400 表示密钥无效
        _ if lower.contains("api key") || lower.contains("api_key") => {
            AnalysisError::Unauthorized { message }
        }
        400..=499 => AnalysisError::MalformedRequest { message },
        _ => AnalysisError::Unknown { message },
    }
}

fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    let from_json = serde_json::from_str::<JsonValue>(trimmed).ok().and_then(|v| {
        v.pointer("/error/message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
    });
    Some(from_json.unwrap_or_else(|| trimmed.chars().take(200).collect()))
}

#[derive(Deserialize)]
struct ChatCompletionBody {
    choices: Vec<ChoiceBody>,
}

#[derive(Deserialize)]
struct ChoiceBody {
    message: MessageBody,
}

#[derive(Deserialize)]
struct MessageBody {
    content: Option<String>,
}

/// 从成功响应中取出第一个 choice 的内容
pub(crate) fn extract_content(body: &str) -> Result<String, AnalysisError> {
    let parsed: ChatCompletionBody =
        serde_json::from_str(body).map_err(|e| AnalysisError::MalformedResponse {
            message: format!("响应不是有效的 chat completion: {}", e),
        })?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or_else(|| AnalysisError::MalformedResponse {
            message: "LLM 返回内容为空".to_string(),
        })
}
