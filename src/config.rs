use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

/// 单个文档失败时的批次策略
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// 记录失败并继续处理其余文档
    #[default]
    Isolated,
    /// 首个失败所在批次结束后中止整个运行
    FailFast,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "isolated" | "fail-isolated" => Ok(FailurePolicy::Isolated),
            "fail-fast" | "failfast" => Ok(FailurePolicy::FailFast),
            other => Err(format!("未知的失败策略: {}", other)),
        }
    }
}

/// 评估器实现选择
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalyzerMode {
    /// 本地规则校验
    Local,
    /// 委托外部 LLM 服务
    #[default]
    Delegated,
}

impl FromStr for AnalyzerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" | "rules" => Ok(AnalyzerMode::Local),
            "delegated" | "llm" => Ok(AnalyzerMode::Delegated),
            other => Err(format!("未知的评估模式: {}", other)),
        }
    }
}

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 每个窗口同时处理的文档数量
    pub max_concurrent_documents: usize,
    /// 窗口之间的等待时间（毫秒）
    pub pacing_delay_ms: u64,
    pub failure_policy: FailurePolicy,
    pub analyzer_mode: AnalyzerMode,
    /// PDF 文件存放目录
    pub pdf_folder: String,
    /// 输出报告文件
    pub report_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub llm_temperature: f32,
    /// 发送给 LLM 的文本最大字符数
    pub max_prompt_chars: usize,
    pub request_timeout_secs: u64,
    // --- 上传限制 ---
    pub max_files: usize,
    pub max_file_size_mb: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_concurrent_documents: 1,
            pacing_delay_ms: 3000,
            failure_policy: FailurePolicy::Isolated,
            analyzer_mode: AnalyzerMode::Delegated,
            pdf_folder: "input_pdfs".to_string(),
            report_file: "report.json".to_string(),
            verbose_logging: false,
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.groq.com/openai/v1".to_string(),
            llm_model_name: "llama-3.1-70b-versatile".to_string(),
            llm_temperature: 0.1,
            max_prompt_chars: 15_000,
            request_timeout_secs: 120,
            max_files: 10,
            max_file_size_mb: 50,
        }
    }
}

impl Config {
    /// 读取 `LRCO_CONFIG` 指定的 TOML 文件（如果有），再叠加环境变量
    pub fn load() -> Result<Self> {
        let base = match std::env::var("LRCO_CONFIG") {
            Ok(path) => Self::from_toml_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        Ok(base.with_env_overrides())
    }

    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("无法读取配置文件: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("无法解析配置文件: {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn with_env_overrides(self) -> Self {
        let d = self;
        Self {
            max_concurrent_documents: env_parse("MAX_CONCURRENT_DOCUMENTS").unwrap_or(d.max_concurrent_documents),
            pacing_delay_ms: env_parse("PACING_DELAY_MS").unwrap_or(d.pacing_delay_ms),
            failure_policy: env_parse("FAILURE_POLICY").unwrap_or(d.failure_policy),
            analyzer_mode: env_parse("ANALYZER_MODE").unwrap_or(d.analyzer_mode),
            pdf_folder: std::env::var("PDF_FOLDER").unwrap_or(d.pdf_folder),
            report_file: std::env::var("REPORT_FILE").unwrap_or(d.report_file),
            verbose_logging: env_parse("VERBOSE_LOGGING").unwrap_or(d.verbose_logging),
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(d.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(d.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(d.llm_model_name),
            llm_temperature: env_parse("LLM_TEMPERATURE").unwrap_or(d.llm_temperature),
            max_prompt_chars: env_parse("MAX_PROMPT_CHARS").unwrap_or(d.max_prompt_chars),
            request_timeout_secs: env_parse("REQUEST_TIMEOUT_SECS").unwrap_or(d.request_timeout_secs),
            max_files: env_parse("MAX_FILES").unwrap_or(d.max_files),
            max_file_size_mb: env_parse("MAX_FILE_SIZE_MB").unwrap_or(d.max_file_size_mb),
        }
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb * 1024 * 1024
    }
}

fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sequential_and_paced() {
        let config = Config::default();
        assert_eq!(config.max_concurrent_documents, 1);
        assert_eq!(config.pacing_delay_ms, 3000);
        assert_eq!(config.failure_policy, FailurePolicy::Isolated);
        assert_eq!(config.max_prompt_chars, 15_000);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            max_concurrent_documents = 3
            failure_policy = "fail-fast"
            analyzer_mode = "local"
            "#,
        )
        .unwrap();
        assert_eq!(config.max_concurrent_documents, 3);
        assert_eq!(config.failure_policy, FailurePolicy::FailFast);
        assert_eq!(config.analyzer_mode, AnalyzerMode::Local);
        assert_eq!(config.pacing_delay_ms, 3000);
        assert_eq!(config.max_files, 10);
    }

    #[test]
    fn test_policy_and_mode_parse() {
        assert_eq!("fail-fast".parse::<FailurePolicy>(), Ok(FailurePolicy::FailFast));
        assert_eq!("Isolated".parse::<FailurePolicy>(), Ok(FailurePolicy::Isolated));
        assert_eq!("llm".parse::<AnalyzerMode>(), Ok(AnalyzerMode::Delegated));
        assert!("sometimes".parse::<FailurePolicy>().is_err());
    }
}
