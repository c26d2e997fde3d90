//! # LRCO Review
//!
//! 批量审核 LRCO（Livro de Registro de Classe Online）PDF 的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 只暴露"文档 → 文本"能力
//! - `PdfTextExtractor` - 基于 lopdf，在阻塞线程池中解析
//! - `clients/` - `LlmClient`，兼容 OpenAI 的 chat completions 客户端
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单份文档
//! - `rules` - 三个评估项的本地规则
//! - `analyzer` - `AssessmentAnalyzer`（本地规则 / 委托 LLM）
//! - `decision_engine` - 结论与 ressalvas
//! - `ReportWriter` - 写 JSON 报告能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一份文档"的完整处理流程
//! - `DocumentCtx` - 上下文封装（index + total + name）
//! - `DocumentFlow` - 流程编排（extract → assess → decide）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量处理器，管理窗口、并发、节奏和失败策略
//! - `orchestrator/app` - 应用入口
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::{AnalyzerMode, Config, FailurePolicy};
pub use error::{BatchError, DocumentError, ErrorKind};
pub use infrastructure::{PdfTextExtractor, TextExtractor};
pub use models::{Assessment, BatchResult, BatchState, Credential, Decision, Document};
pub use orchestrator::{App, BatchOptions, BatchOrchestrator, CancelToken};
pub use services::{AssessmentAnalyzer, DelegatedAnalyzer, LocalRuleAnalyzer};
pub use workflow::{DocumentCtx, DocumentFlow};
