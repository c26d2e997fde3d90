//! 错误类型
//!
//! 按照传播范围划分：
//! - `CredentialError`：批次开始前即失败，整个批次不会启动
//! - `ExtractionError` / `AnalysisError` / `ContractViolation`：单个文档级别，
//!   在编排层的文档边界被捕获并记录为失败结果
//! - `BatchError`：`run_batch` 本身的失败

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// 凭据错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    /// 未提供凭据
    #[error("缺少 API 凭据")]
    Missing,
    /// 凭据格式不合法
    #[error("API 凭据格式无效: {reason}")]
    Malformed { reason: String },
}

/// 文本提取错误
#[derive(Debug, Clone, Error)]
#[error("文档 {document_name} 文本提取失败: {cause}")]
pub struct ExtractionError {
    pub document_name: String,
    pub cause: String,
}

impl ExtractionError {
    pub fn new(document_name: impl Into<String>, cause: impl fmt::Display) -> Self {
        Self {
            document_name: document_name.into(),
            cause: cause.to_string(),
        }
    }
}

/// 外部评估服务调用错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// 请求频率限制
    #[error("请求频率超限, 建议等待: {retry_after:?}秒 ({message})")]
    RateLimited {
        retry_after: Option<u64>,
        message: String,
    },
    /// 凭据无效或已过期
    #[error("凭据无效或无权限: {message}")]
    Unauthorized { message: String },
    /// 请求被服务端拒绝（参数、模型、大小等）
    #[error("请求无效: {message}")]
    MalformedRequest { message: String },
    /// 响应体无法解析
    #[error("响应无法解析: {message}")]
    MalformedResponse { message: String },
    /// 其他错误（网络、5xx 等）
    #[error("评估服务调用失败: {message}")]
    Unknown { message: String },
}

/// 评估结果违反契约
///
/// 属于集成错误，不重试、不修正。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractViolation {
    #[error("评估结果不是 JSON 对象")]
    NotAnObject,
    #[error("缺少评估项: {0}")]
    MissingCriterion(String),
    #[error("出现未定义的评估项: {0}")]
    UnexpectedCriterion(String),
    #[error("评估项 {criterion} 缺少字段 {field}")]
    MissingField {
        criterion: &'static str,
        field: &'static str,
    },
    #[error("评估项 {criterion} 的字段 {field} 类型错误, 期望 {expected}")]
    WrongType {
        criterion: &'static str,
        field: &'static str,
        expected: &'static str,
    },
}

/// `AssessmentAnalyzer::assess` 的错误
#[derive(Debug, Clone, Error)]
pub enum AssessError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error(transparent)]
    Contract(#[from] ContractViolation),
}

/// 单个文档处理流程中的错误
#[derive(Debug, Clone, Error)]
pub enum DocumentError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error("分析器违反契约: {0}")]
    Contract(#[from] ContractViolation),
    /// 任务异常终止（panic）
    #[error("任务执行失败: {0}")]
    Internal(String),
}

impl From<AssessError> for DocumentError {
    fn from(err: AssessError) -> Self {
        match err {
            AssessError::Analysis(e) => DocumentError::Analysis(e),
            AssessError::Contract(e) => DocumentError::Contract(e),
        }
    }
}

impl DocumentError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DocumentError::Extraction(_) => ErrorKind::Extraction,
            DocumentError::Analysis(e) => match e {
                AnalysisError::RateLimited { .. } => ErrorKind::RateLimited,
                AnalysisError::Unauthorized { .. } => ErrorKind::Unauthorized,
                AnalysisError::MalformedRequest { .. } => ErrorKind::MalformedRequest,
                AnalysisError::MalformedResponse { .. } => ErrorKind::MalformedResponse,
                AnalysisError::Unknown { .. } => ErrorKind::Unknown,
            },
            DocumentError::Contract(_) => ErrorKind::ContractViolation,
            DocumentError::Internal(_) => ErrorKind::Internal,
        }
    }
}

/// 失败结果中记录的错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    Extraction,
    RateLimited,
    Unauthorized,
    MalformedRequest,
    MalformedResponse,
    Unknown,
    ContractViolation,
    Cancelled,
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Extraction => "extraction",
            ErrorKind::RateLimited => "rateLimited",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::MalformedRequest => "malformedRequest",
            ErrorKind::MalformedResponse => "malformedResponse",
            ErrorKind::Unknown => "unknown",
            ErrorKind::ContractViolation => "contractViolation",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::Internal => "internal",
        };
        f.write_str(name)
    }
}

/// 批次运行错误
#[derive(Debug, Error)]
pub enum BatchError {
    /// 凭据校验失败，批次未启动
    #[error("批次未启动: {0}")]
    Credential(#[from] CredentialError),
    /// fail-fast 策略下首个文档失败后中止
    #[error("批次已中止: 文档 #{index} ({name}) 处理失败: {source}")]
    Aborted {
        index: usize,
        name: String,
        #[source]
        source: DocumentError,
    },
    /// 并发许可获取失败（信号量已关闭）
    #[error("并发许可获取失败: {0}")]
    Permit(#[from] tokio::sync::AcquireError),
}
