//! 文档处理上下文
//!
//! 封装"我正在处理批次中的第几份文档"这一信息

use std::fmt::Display;

/// 文档处理上下文
#[derive(Debug, Clone)]
pub struct DocumentCtx {
    /// 在批次中的位置（从 0 开始）
    pub index: usize,

    /// 批次文档总数
    pub total: usize,

    /// 文件名
    pub name: String,
}

impl DocumentCtx {
    pub fn new(index: usize, total: usize, name: impl Into<String>) -> Self {
        Self {
            index,
            total,
            name: name.into(),
        }
    }
}

impl Display for DocumentCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[文档 {}/{} {}]", self.index + 1, self.total, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_one_based() {
        let ctx = DocumentCtx::new(0, 3, "lrco_maria.pdf");
        assert_eq!(ctx.to_string(), "[文档 1/3 lrco_maria.pdf]");
    }
}
