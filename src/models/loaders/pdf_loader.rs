use crate::models::document::Document;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// 上传限制（文件数量、单个文件大小）
#[derive(Debug, Clone, Copy)]
pub struct UploadLimits {
    pub max_files: usize,
    pub max_file_size_bytes: u64,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_files: 10,
            max_file_size_bytes: 50 * 1024 * 1024,
        }
    }
}

/// 从文件读取单个 PDF 文档
pub async fn load_pdf_document(pdf_path: &Path) -> Result<Document> {
    let data = fs::read(pdf_path)
        .await
        .with_context(|| format!("无法读取PDF文件: {}", pdf_path.display()))?;

    if !data.starts_with(PDF_MAGIC) {
        anyhow::bail!("不是有效的PDF文件: {}", pdf_path.display());
    }

    let name = pdf_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| pdf_path.display().to_string());

    Ok(Document::new(name, data))
}

/// 从文件夹中加载所有 PDF 文件，按文件名排序
///
/// 超过大小限制或不是 PDF 的文件会被跳过；文件数量超过上限时整体拒绝。
pub async fn load_all_pdf_files(folder_path: &str, limits: &UploadLimits) -> Result<Vec<Document>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path);
    }

    let mut pdf_paths = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_pdf = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if !is_pdf {
            continue;
        }

        let size = entry.metadata().await?.len();
        if size > limits.max_file_size_bytes {
            tracing::warn!(
                "文件过大，已跳过 {} ({:.2} MB)",
                path.display(),
                size as f64 / (1024.0 * 1024.0)
            );
            continue;
        }
        pdf_paths.push(path);
    }

    if pdf_paths.len() > limits.max_files {
        anyhow::bail!(
            "最多只能处理 {} 个文件，当前选择了 {} 个",
            limits.max_files,
            pdf_paths.len()
        );
    }

    pdf_paths.sort();

    let mut documents = Vec::with_capacity(pdf_paths.len());
    for path in pdf_paths {
        match load_pdf_document(&path).await {
            Ok(document) => {
                tracing::info!(
                    "正在加载: {} ({:.2} KB)",
                    document.name(),
                    document.size() as f64 / 1024.0
                );
                documents.push(document);
            }
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {}", path.display(), e);
            }
        }
    }

    Ok(documents)
}
