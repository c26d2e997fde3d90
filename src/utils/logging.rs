//! 日志工具模块
//!
//! 提供日志初始化和批次横幅输出的辅助函数

use crate::models::batch::BatchSummary;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// 初始化 tracing
///
/// `RUST_LOG` 优先；否则默认 `info`，详细模式下为 `debug`。
/// 重复调用不会 panic。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `max_concurrent`: 每个窗口的文档数
/// - `analyzer`: 评估器名称
pub fn log_startup(max_concurrent: usize, analyzer: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - LRCO 批量审核");
    info!("📊 最大并发数: {}", max_concurrent);
    info!("🧠 评估方式: {}", analyzer);
    info!("{}", "=".repeat(60));
}

/// 记录文档加载信息
pub fn log_documents_loaded(total: usize, max_concurrent: usize) {
    info!("✓ 找到 {} 个待审核的文档", total);
    info!("📋 将以每批 {} 个的方式处理", max_concurrent);
    info!("💡 每批完成后再开始下一批\n");
}

/// 记录窗口开始信息
///
/// # 参数
/// - `window_num`: 窗口编号（从 1 开始）
/// - `total_windows`: 窗口总数
/// - `start`: 起始文档编号（从 1 开始）
/// - `end`: 结束文档编号
/// - `total`: 文档总数
pub fn log_window_start(
    window_num: usize,
    total_windows: usize,
    start: usize,
    end: usize,
    total: usize,
) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始处理第 {}/{} 批", window_num, total_windows);
    info!("📄 本批文档: {}-{} / 共 {} 个", start, end, total);
    info!("{}", "=".repeat(60));
}

pub fn log_window_complete(window_num: usize, success: usize, total: usize) {
    info!("\n{}", "─".repeat(60));
    info!("✓ 第 {} 批完成: 成功 {}/{}", window_num, success, total);
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
pub fn print_final_stats(summary: &BatchSummary, report_file: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ Enviar para SERE: {}", summary.approved);
    info!("⚠️ Enviar com ressalvas: {}", summary.approved_with_caveats);
    info!("❌ Devolver para tutora: {}", summary.rejected);
    info!("💥 处理失败: {}", summary.failed);
    info!("📄 合计: {}", summary.total);
    info!("{}", "=".repeat(60));
    info!("\n报告已保存至: {}", report_file);
}
