//! 题目处理上下文
//!
//! 封装"我正在处理哪份文档的第几题"这一信息

use std::fmt::Display;

/// 题目处理上下文
#[derive(Debug, Clone)]
pub struct QuestionCtx {
    /// 文档名
    pub document: String,

    /// 文档索引（仅用于日志显示，从1开始）
    pub document_index: usize,

    /// 题号
    pub ordinal: u32,
}

impl QuestionCtx {
    /// 创建新的题目上下文
    pub fn new(document: impl Into<String>, document_index: usize, ordinal: u32) -> Self {
        Self {
            document: document.into(),
            document_index,
            ordinal,
        }
    }
}

impl Display for QuestionCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[文档 {} 题目#{}]", self.document, self.ordinal)
    }
}
