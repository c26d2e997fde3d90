//! PDF 文本提取 - 基础设施层
//!
//! 只暴露"文档 → 文本"的能力，不认识评估规则

use crate::error::ExtractionError;
use crate::models::document::Document;
use async_trait::async_trait;
use lopdf::Document as PdfDocument;
use tracing::debug;

/// 文本提取能力
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// 提取文档全部文本；每页前加页码标记
    async fn extract(&self, document: &Document) -> Result<String, ExtractionError>;
}

/// 基于 lopdf 的 PDF 文本提取器
///
/// 解析在阻塞线程池中执行，不占用异步调度线程。
pub struct PdfTextExtractor {
    max_document_bytes: usize,
}

impl PdfTextExtractor {
    pub fn new(max_document_bytes: usize) -> Self {
        Self { max_document_bytes }
    }
}

impl Default for PdfTextExtractor {
    fn default() -> Self {
        Self::new(50 * 1024 * 1024)
    }
}

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract(&self, document: &Document) -> Result<String, ExtractionError> {
        let name = document.name().to_string();

        if document.size() > self.max_document_bytes {
            return Err(ExtractionError::new(
                name,
                format!(
                    "文件过大 ({} 字节, 上限 {} 字节)",
                    document.size(),
                    self.max_document_bytes
                ),
            ));
        }

        debug!(
            "处理PDF: {}, 大小: {:.2} KB",
            name,
            document.size() as f64 / 1024.0
        );

        let bytes = document.shared_bytes();
        let task_name = name.clone();
        let text = tokio::task::spawn_blocking(move || extract_pages(&task_name, &bytes))
            .await
            .map_err(|e| ExtractionError::new(name.clone(), format!("提取任务异常终止: {}", e)))??;

        debug!("文本提取完成: {}, {} 字符", name, text.chars().count());
        Ok(text)
    }
}

/// 逐页提取并拼接
fn extract_pages(name: &str, bytes: &[u8]) -> Result<String, ExtractionError> {
    let pdf = PdfDocument::load_mem(bytes).map_err(|e| ExtractionError::new(name, e))?;

    let mut full_text = String::new();
    for page_number in pdf.get_pages().keys() {
        let page_text = pdf
            .extract_text(&[*page_number])
            .map_err(|e| ExtractionError::new(name, format!("第 {} 页: {}", page_number, e)))?;
        full_text.push_str(&page_marker(*page_number));
        full_text.push_str(&page_text);
    }

    Ok(full_text)
}

fn page_marker(page_number: u32) -> String {
    format!("\n\n--- Página {} ---\n", page_number)
}
