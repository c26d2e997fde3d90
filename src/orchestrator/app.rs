//! 应用入口 - 编排层
//!
//! 初始化能力对象，加载 PDF，运行批次，写报告，输出统计。

use crate::config::Config;
use crate::infrastructure::PdfTextExtractor;
use crate::models::batch::BatchSummary;
use crate::models::loaders::{load_all_pdf_files, UploadLimits};
use crate::orchestrator::batch_processor::{BatchOptions, BatchOrchestrator, CancelToken};
use crate::services::analyzer::build_analyzer;
use crate::services::ReportWriter;
use crate::utils::logging::{log_documents_loaded, log_startup, print_final_stats};
use crate::workflow::DocumentFlow;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    flow: Arc<DocumentFlow>,
    report_writer: ReportWriter,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        let extractor = Arc::new(PdfTextExtractor::new(
            config.max_file_size_bytes() as usize,
        ));
        let analyzer = build_analyzer(&config).context("无法创建评估器")?;

        log_startup(config.max_concurrent_documents, analyzer.name());

        let flow = Arc::new(DocumentFlow::new(extractor, analyzer));
        let report_writer = ReportWriter::with_path(&config.report_file);

        Ok(Self {
            config,
            flow,
            report_writer,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        info!("\n📁 正在扫描待审核的 PDF...");
        let limits = UploadLimits {
            max_files: self.config.max_files,
            max_file_size_bytes: self.config.max_file_size_bytes(),
        };
        let documents = load_all_pdf_files(&self.config.pdf_folder, &limits).await?;

        if documents.is_empty() {
            warn!("⚠️ 没有找到待审核的 PDF 文件，程序结束");
            return Ok(());
        }

        log_documents_loaded(documents.len(), self.config.max_concurrent_documents);

        let cancel = CancelToken::new();
        spawn_ctrl_c_listener(cancel.clone());

        let mut orchestrator =
            BatchOrchestrator::new(Arc::clone(&self.flow), BatchOptions::from_config(&self.config))
                .with_cancel_token(cancel);

        let results = orchestrator
            .run_batch(documents, &self.config.llm_api_key, |index, total, name| {
                info!("⏳ [{}/{}] 正在审核: {}", index + 1, total, name);
            })
            .await?;

        let summary = BatchSummary::from_results(&results);
        self.report_writer.write(&results, &summary).await?;
        print_final_stats(&summary, self.report_writer.path());

        Ok(())
    }
}

/// Ctrl-C 只设置取消标记，正在处理的文档会正常完成
fn spawn_ctrl_c_listener(cancel: CancelToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("⚠️ 收到中断信号，当前批次完成后停止");
            cancel.cancel();
        }
    });
}
