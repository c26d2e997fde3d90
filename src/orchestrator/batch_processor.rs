//! 批量文档处理器 - 编排层
//!
//! ## 职责
//!
//! 把一批文档交给 `DocumentFlow`，控制并发与节奏，收集结果。
//!
//! ## 核心功能
//!
//! 1. **凭证前置校验**：凭证无效时不处理任何文档
//! 2. **分批处理**：按 `concurrency_limit` 切成连续窗口，每个窗口完成后再开始下一个
//! 3. **并发控制**：Semaphore 保证同时运行的流程不超过上限
//! 4. **节奏控制**：窗口之间等待 `pacing_delay`；等待前后都检查取消标记
//! 5. **失败策略**：`Isolated` 记录失败并继续；`FailFast` 在首个失败所在窗口结束后中止
//!
//! 结果顺序与提交顺序一致，与完成先后无关。

use crate::config::{Config, FailurePolicy};
use crate::error::{BatchError, DocumentError};
use crate::models::batch::{BatchResult, BatchState, ProgressState};
use crate::models::document::Document;
use crate::utils::logging::{log_window_complete, log_window_start};
use crate::workflow::{DocumentCtx, DocumentFlow, ReviewedDocument};
use futures::future::join_all;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// 批次运行参数
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// 每个窗口的文档数，同时也是在途流程的硬上限
    pub concurrency_limit: usize,
    /// 窗口之间的等待时间
    pub pacing_delay: Duration,
    pub failure_policy: FailurePolicy,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            concurrency_limit: 1,
            pacing_delay: Duration::from_secs(3),
            failure_policy: FailurePolicy::Isolated,
        }
    }
}

impl BatchOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            concurrency_limit: config.max_concurrent_documents,
            pacing_delay: Duration::from_millis(config.pacing_delay_ms),
            failure_policy: config.failure_policy,
        }
    }
}

/// 取消标记
///
/// 克隆后共享同一个标志位；在每个窗口边界检查。
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

type PipelineHandle = JoinHandle<Result<ReviewedDocument, DocumentError>>;

/// 批量编排器
///
/// 进度和状态只在两次 await 之间由编排器自身修改，不需要锁。
pub struct BatchOrchestrator {
    flow: Arc<DocumentFlow>,
    options: BatchOptions,
    cancel: CancelToken,
    state: BatchState,
    progress: ProgressState,
}

impl BatchOrchestrator {
    pub fn new(flow: Arc<DocumentFlow>, options: BatchOptions) -> Self {
        Self {
            flow,
            options,
            cancel: CancelToken::new(),
            state: BatchState::Idle,
            progress: ProgressState::default(),
        }
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> BatchState {
        self.state
    }

    pub fn progress(&self) -> &ProgressState {
        &self.progress
    }

    /// 运行一个批次
    ///
    /// # 参数
    /// - `documents`: 待审核文档，顺序即提交顺序
    /// - `credential`: 原始 API 密钥，评估器需要时在处理前校验
    /// - `on_progress`: 每个文档开始前调用 `(index, total, name)`，index 从 0 开始
    ///
    /// # 返回
    /// 每个文档恰好一条结果，按提交顺序排列
    pub async fn run_batch<F>(
        &mut self,
        documents: Vec<Document>,
        credential: &str,
        mut on_progress: F,
    ) -> Result<Vec<BatchResult>, BatchError>
    where
        F: FnMut(usize, usize, &str),
    {
        let total = documents.len();
        self.state = BatchState::Running;
        self.progress = ProgressState::new(total);

        let credential = match self.flow.resolve_credential(credential) {
            Ok(credential) => credential,
            Err(e) => {
                error!("❌ 凭证校验失败，批次未启动: {}", e);
                self.state = BatchState::Failed;
                return Err(e.into());
            }
        };

        let limit = self.options.concurrency_limit.max(1);
        let semaphore = Arc::new(Semaphore::new(limit));
        let total_windows = total.div_ceil(limit);
        let mut results: Vec<BatchResult> = Vec::with_capacity(total);

        for (window_idx, window) in documents.chunks(limit).enumerate() {
            let window_start = window_idx * limit;

            if window_idx > 0 && !self.cancel.is_cancelled() {
                tokio::time::sleep(self.options.pacing_delay).await;
            }
            if self.cancel.is_cancelled() {
                self.skip_remaining(&documents[window_start..], window_start, &mut results);
                break;
            }

            log_window_start(
                window_idx + 1,
                total_windows,
                window_start + 1,
                window_start + window.len(),
                total,
            );

            let mut contexts = Vec::with_capacity(window.len());
            let mut handles: Vec<PipelineHandle> = Vec::with_capacity(window.len());

            for (offset, document) in window.iter().enumerate() {
                let ctx = DocumentCtx::new(window_start + offset, total, document.name());

                self.progress.current_document = Some(ctx.name.clone());
                on_progress(ctx.index, total, &ctx.name);

                let permit = match Arc::clone(&semaphore).acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => {
                        error!("{} 获取并发许可失败: {}", ctx, e);
                        self.state = BatchState::Failed;
                        return Err(e.into());
                    }
                };
                let flow = Arc::clone(&self.flow);
                let document = document.clone();
                let credential = credential.clone();
                let task_ctx = ctx.clone();

                handles.push(tokio::spawn(async move {
                    let _permit = permit;
                    flow.process(&task_ctx, &document, credential.as_ref())
                        .await
                }));
                contexts.push(ctx);
            }

            let mut first_failure: Option<(DocumentCtx, DocumentError)> = None;
            let mut window_success = 0;

            for (ctx, joined) in contexts.into_iter().zip(join_all(handles).await) {
                let outcome = joined.unwrap_or_else(|e| {
                    error!("{} 任务执行失败: {}", ctx, e);
                    Err(DocumentError::Internal(e.to_string()))
                });

                match outcome {
                    Ok(reviewed) => {
                        window_success += 1;
                        results.push(BatchResult::reviewed(
                            ctx.index,
                            ctx.name.clone(),
                            reviewed.decision,
                            reviewed.assessment,
                            reviewed.caveats,
                        ));
                    }
                    Err(e) => {
                        log_document_failure(&ctx, &e);
                        results.push(BatchResult::failed(ctx.index, ctx.name.clone(), &e));
                        if first_failure.is_none() {
                            first_failure = Some((ctx, e));
                        }
                    }
                }
                self.progress.mark_completed();
            }

            log_window_complete(window_idx + 1, window_success, window.len());

            if self.options.failure_policy == FailurePolicy::FailFast {
                if let Some((ctx, source)) = first_failure {
                    error!("❌ fail-fast: {} 失败，批次中止", ctx);
                    self.state = BatchState::Failed;
                    self.progress.current_document = None;
                    return Err(BatchError::Aborted {
                        index: ctx.index,
                        name: ctx.name,
                        source,
                    });
                }
            }
        }

        self.progress.current_document = None;
        self.state = BatchState::Completed;
        info!(
            "✓ 批次完成: {}/{} 个文档已处理",
            self.progress.completed_count, self.progress.total_count
        );
        Ok(results)
    }

    /// 取消后剩余文档逐个记为已取消
    fn skip_remaining(
        &mut self,
        remaining: &[Document],
        first_index: usize,
        results: &mut Vec<BatchResult>,
    ) {
        warn!("⚠️ 批次已取消，剩余 {} 个文档不再处理", remaining.len());
        for (offset, doc) in remaining.iter().enumerate() {
            results.push(BatchResult::cancelled(first_index + offset, doc.name()));
            self.progress.mark_completed();
        }
    }
}

fn log_document_failure(ctx: &DocumentCtx, err: &DocumentError) {
    match err {
        DocumentError::Contract(violation) => {
            error!("{} ❌ 评估结果违反契约: {}", ctx, violation);
        }
        other => {
            warn!("{} ⚠️ 处理失败 [{}]: {}", ctx, other.kind(), other);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_token_is_shared_between_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[tokio::test]
    async fn test_closed_semaphore_becomes_batch_error() {
        let semaphore = Arc::new(Semaphore::new(1));
        semaphore.close();
        let err: BatchError = Arc::clone(&semaphore)
            .acquire_owned()
            .await
            .unwrap_err()
            .into();
        assert!(matches!(err, BatchError::Permit(_)));
    }

    #[test]
    fn test_options_from_config() {
        let mut config = Config::default();
        config.max_concurrent_documents = 4;
        config.pacing_delay_ms = 250;
        config.failure_policy = FailurePolicy::FailFast;

        let options = BatchOptions::from_config(&config);
        assert_eq!(options.concurrency_limit, 4);
        assert_eq!(options.pacing_delay, Duration::from_millis(250));
        assert_eq!(options.failure_policy, FailurePolicy::FailFast);

        let defaults = BatchOptions::default();
        assert_eq!(defaults.concurrency_limit, 1);
        assert_eq!(defaults.pacing_delay, Duration::from_secs(3));
        assert_eq!(defaults.failure_policy, FailurePolicy::Isolated);
    }
}
