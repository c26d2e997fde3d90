//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 组装能力对象（提取器、评估器）
//! - 加载 PDF、写报告、输出全局统计
//!
//! ### `batch_processor` - 批量文档处理器
//! - 凭证前置校验
//! - 按窗口分批，Semaphore 控制并发
//! - 窗口间节奏控制与取消
//! - 失败策略（Isolated / FailFast）
//!
//! ## 层次关系
//!
//! ```text
//! app
//!     ↓
//! batch_processor (处理 Vec<Document>)
//!     ↓
//! workflow::DocumentFlow (处理单个 Document)
//!     ↓
//! services (能力层：rules / analyzer / decision_engine / report_writer)
//!     ↓
//! infrastructure (基础设施：PdfTextExtractor) + clients (LlmClient)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：batch_processor 管批量，DocumentFlow 管单个
//! 2. **向下依赖**：编排层 → workflow → services → infrastructure
//! 3. **无业务逻辑**：只做调度和统计，不做具体业务判断

pub mod app;
pub mod batch_processor;

pub use app::App;
pub use batch_processor::{BatchOptions, BatchOrchestrator, CancelToken};
